//! Pivoting score records into a rank × (mode, threshold) summary matrix.

use crate::data::{ScoreRecord, ScoreTable};
use crate::error::{CongruenceError, Result};
use csv::{Terminator, WriterBuilder};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Decimal places kept in the summary.
pub const SUMMARY_DECIMALS: i32 = 4;

/// One column of the summary: a coverage mode at a threshold.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SummaryColumn {
    pub coverage_mode: String,
    pub aai_threshold: String,
}

/// ARI scores pivoted to rows = rank, columns = (mode, threshold).
///
/// Rows and columns are sorted lexicographically. A row or column is only
/// present if at least one of its cells has a defined score; remaining
/// undefined cells are NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMatrix {
    pub ranks: Vec<String>,
    pub columns: Vec<SummaryColumn>,
    /// `values[rank][column]`, rounded to [`SUMMARY_DECIMALS`].
    pub values: Vec<Vec<f64>>,
}

impl SummaryMatrix {
    /// Concatenate per-mode score tables and pivot them.
    ///
    /// Several records for the same cell are averaged, ignoring undefined
    /// scores. Fails when there are no tables or no records at all.
    pub fn from_tables(tables: &[ScoreTable]) -> Result<Self> {
        if tables.is_empty() {
            return Err(CongruenceError::NoResults(
                "no coverage mode produced any data; please check input paths".to_string(),
            ));
        }
        let all = ScoreTable::concat(tables);
        if all.is_empty() {
            return Err(CongruenceError::NoResults(
                "no configured rank matched a taxonomy column".to_string(),
            ));
        }
        Ok(Self::pivot(all.iter()))
    }

    fn pivot<'a>(records: impl Iterator<Item = &'a ScoreRecord>) -> Self {
        let mut cells: BTreeMap<String, BTreeMap<SummaryColumn, (f64, usize)>> = BTreeMap::new();
        for r in records.filter(|r| r.is_defined()) {
            let column = SummaryColumn {
                coverage_mode: r.coverage_mode.clone(),
                aai_threshold: r.aai_threshold.clone(),
            };
            let cell = cells
                .entry(r.taxonomic_rank.clone())
                .or_default()
                .entry(column)
                .or_insert((0.0, 0));
            cell.0 += r.ari_score;
            cell.1 += 1;
        }

        let columns: Vec<SummaryColumn> = cells
            .values()
            .flat_map(|row| row.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if columns.is_empty() {
            warn!("Every ARI score is undefined; the summary matrix is empty");
        }

        let values = cells
            .values()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| match row.get(c) {
                        Some(&(sum, n)) => round_to(sum / n as f64, SUMMARY_DECIMALS),
                        None => f64::NAN,
                    })
                    .collect()
            })
            .collect();

        Self {
            ranks: cells.into_keys().collect(),
            columns,
            values,
        }
    }

    pub fn n_ranks(&self) -> usize {
        self.ranks.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Score for a cell, `None` if the row or column is absent.
    pub fn get(&self, rank: &str, coverage_mode: &str, aai_threshold: &str) -> Option<f64> {
        let row = self.ranks.iter().position(|r| r == rank)?;
        let col = self.columns.iter().position(|c| {
            c.coverage_mode == coverage_mode && c.aai_threshold == aai_threshold
        })?;
        Some(self.values[row][col])
    }

    /// Write the matrix as TSV with a three-line header.
    ///
    /// ```text
    /// Coverage_Mode   cov_short_80  cov_short_80
    /// AAI_Threshold   0.30          0.90
    /// Taxonomic_Rank
    /// Genus           0.8123        1.0
    /// ```
    /// Undefined cells are left empty.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_tsv(BufWriter::new(file))
    }

    /// Write the TSV form to any writer.
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);

        writer.write_record(self.header_row("Coverage_Mode", |c| c.coverage_mode.clone()))?;
        writer.write_record(self.header_row("AAI_Threshold", |c| c.aai_threshold.clone()))?;
        writer.write_record(self.header_row("Taxonomic_Rank", |_| String::new()))?;

        for (rank, row) in self.ranks.iter().zip(&self.values) {
            let record: Vec<String> = std::iter::once(rank.clone())
                .chain(row.iter().map(|&v| format_score(v)))
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn header_row(&self, name: &str, cell: impl Fn(&SummaryColumn) -> String) -> Vec<String> {
        std::iter::once(name.to_string())
            .chain(self.columns.iter().map(cell))
            .collect()
    }

    /// Write the matrix as pretty-printed JSON; undefined cells become `null`.
    pub fn to_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for SummaryMatrix {
    /// Aligned text table for console inspection; undefined cells show `NaN`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = ["Coverage_Mode", "AAI_Threshold", "Taxonomic_Rank"];
        let label_width = labels
            .iter()
            .map(|s| s.len())
            .chain(self.ranks.iter().map(|r| r.len()))
            .max()
            .unwrap_or(0);

        let cells: Vec<Vec<String>> = self
            .values
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| if v.is_nan() { "NaN".to_string() } else { format_score(v) })
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, c)| {
                cells
                    .iter()
                    .map(|row| row[j].len())
                    .chain([c.coverage_mode.len(), c.aai_threshold.len()])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:<w$}", labels[0], w = label_width)?;
        for (c, w) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>w$}", c.coverage_mode, w = *w)?;
        }
        writeln!(f)?;
        write!(f, "{:<w$}", labels[1], w = label_width)?;
        for (c, w) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>w$}", c.aai_threshold, w = *w)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", labels[2])?;
        for (rank, row) in self.ranks.iter().zip(&cells) {
            write!(f, "{:<w$}", rank, w = label_width)?;
            for (cell, w) in row.iter().zip(&widths) {
                write!(f, "  {:>w$}", cell, w = *w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Round half-to-even at `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Shortest decimal form that keeps a fractional part (`1.0`, `0.5`, `-0.0625`).
///
/// Undefined scores format as an empty string.
pub fn format_score(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
