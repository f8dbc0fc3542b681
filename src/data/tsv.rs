//! Tab-separated record reading shared by the loaders.

use crate::error::Result;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;

/// A non-blank line split into fields, with its 1-based line number.
#[derive(Debug, Clone)]
pub(crate) struct Line {
    pub number: u64,
    pub fields: Vec<String>,
}

/// Read every non-blank line of a tab-separated file.
///
/// Records may have differing field counts; shape checks are left to the
/// caller so malformed lines can be reported and skipped.
pub(crate) fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<Line>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut lines = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let number = record.position().map(|p| p.line()).unwrap_or(0);
        lines.push(Line {
            number,
            fields: record.iter().map(String::from).collect(),
        });
    }
    Ok(lines)
}
