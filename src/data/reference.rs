//! Loading the reference classification (e.g. a taxonomy table).

use crate::data::identifier::normalize_id;
use crate::data::table::{Column, LabelTable, ID_COLUMN};
use crate::data::tsv::read_lines;
use crate::data::value::parse_column;
use crate::error::{CongruenceError, Result};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::Path;

impl LabelTable {
    /// Load a reference label table from a TSV file.
    ///
    /// Expected format:
    /// - First row: header; the first column is the identifier (any name),
    ///   the rest are rank labels
    /// - Subsequent rows: identifier followed by labels
    ///
    /// Lines with more fields than the header are skipped with a warning;
    /// shorter lines are padded with missing values. Identifiers are passed
    /// through [`normalize_id`].
    pub fn from_reference_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut lines = read_lines(path)?.into_iter();

        let header = lines
            .next()
            .ok_or_else(|| CongruenceError::EmptyData("Empty taxonomy file".to_string()))?;
        let width = header.fields.len();
        let label_names: Vec<String> = header.fields[1..].to_vec();

        let mut raw_ids: Vec<Option<String>> = Vec::new();
        let mut raw_labels: Vec<Vec<Option<String>>> = vec![Vec::new(); label_names.len()];
        let mut n_skipped = 0usize;

        for line in lines {
            if line.fields.len() > width {
                warn!(
                    "Skipping line {}: expected {} fields, saw {}",
                    line.number,
                    width,
                    line.fields.len()
                );
                n_skipped += 1;
                continue;
            }
            let mut fields = line.fields.into_iter();
            raw_ids.push(fields.next());
            for column in raw_labels.iter_mut() {
                column.push(fields.next());
            }
        }

        if raw_ids.is_empty() {
            return Err(CongruenceError::EmptyData(
                "No sequences in taxonomy file".to_string(),
            ));
        }
        if n_skipped > 0 {
            warn!("{} malformed taxonomy lines skipped", n_skipped);
        }

        let ids: Vec<_> = parse_column(&raw_ids).iter().map(normalize_id).collect();
        report_duplicate_ids(&ids);

        let columns = label_names
            .into_iter()
            .zip(raw_labels)
            .map(|(name, raw)| Column::new(name, parse_column(&raw)))
            .collect();

        let table = LabelTable::new(ids, columns)?;
        debug!(
            "Identifier column '{}' renamed to '{}'",
            header.fields[0], ID_COLUMN
        );
        info!("Loaded taxonomy reference: {} sequences.", table.n_rows());
        Ok(table)
    }
}

/// Load the reference table from `path`.
///
/// Any failure is fatal for the run and is reported with the path.
pub fn load_reference<P: AsRef<Path>>(path: P) -> Result<LabelTable> {
    let path = path.as_ref();
    LabelTable::from_reference_tsv(path).map_err(|e| CongruenceError::Taxonomy {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

fn report_duplicate_ids(ids: &[crate::data::Value]) {
    let mut seen = HashSet::new();
    let n_duplicates = ids
        .iter()
        .filter_map(|id| id.key())
        .filter(|key| !seen.insert(key.to_string()))
        .count();
    if n_duplicates > 0 {
        warn!(
            "{} duplicate identifiers in taxonomy; each row is scored separately",
            n_duplicates
        );
    }
}
