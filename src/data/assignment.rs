//! Per-threshold cluster assignments produced by an external clustering tool.

use crate::data::identifier::normalize_id;
use crate::data::tsv::read_lines;
use crate::data::value::parse_column;
use crate::data::{Threshold, Value};
use crate::error::Result;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Cluster label per normalized identifier for one (mode, threshold) pair.
#[derive(Debug, Clone, Default)]
pub struct ClusterAssignments {
    labels: HashMap<String, Value>,
}

impl ClusterAssignments {
    /// Build from (identifier key, label) pairs; the first label per identifier wins.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut labels = HashMap::new();
        for (id, label) in pairs {
            labels.entry(id).or_insert(label);
        }
        Self { labels }
    }

    /// Load a headerless two-column TSV: identifier, cluster label.
    ///
    /// A line with only an identifier gets a missing label; lines with more
    /// than two fields are skipped with a warning. Identifiers are passed
    /// through [`normalize_id`]. When an identifier repeats, the first
    /// assignment is kept.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut raw_ids = Vec::new();
        let mut raw_labels = Vec::new();

        for line in read_lines(path)? {
            if line.fields.len() > 2 {
                warn!(
                    "Skipping line {} of {:?}: expected 2 fields, saw {}",
                    line.number,
                    path,
                    line.fields.len()
                );
                continue;
            }
            let mut fields = line.fields.into_iter();
            raw_ids.push(fields.next());
            raw_labels.push(fields.next());
        }

        let ids = parse_column(&raw_ids);
        let labels = parse_column(&raw_labels);

        let mut n_duplicates = 0usize;
        let mut map = HashMap::with_capacity(ids.len());
        for (id, label) in ids.iter().map(normalize_id).zip(labels) {
            let Some(key) = id.key() else {
                continue;
            };
            if map.contains_key(&*key) {
                n_duplicates += 1;
                continue;
            }
            map.insert(key.into_owned(), label);
        }
        if n_duplicates > 0 {
            warn!(
                "{} duplicate identifiers in {:?}; keeping the first assignment",
                n_duplicates, path
            );
        }
        debug!("Loaded {} cluster assignments from {:?}", map.len(), path);

        Ok(Self { labels: map })
    }

    /// Cluster label for an identifier key.
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.labels.get(id)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Directory holding one coverage mode's label files.
pub fn mode_dir(base_cluster_dir: &Path, mode: &str) -> PathBuf {
    base_cluster_dir.join(mode)
}

/// Expected path of the label file for `threshold` inside a mode directory.
///
/// Follows `<mode_dir>/labels_id_<X.XX>.tsv`.
pub fn assignment_path(mode_dir: &Path, threshold: &Threshold) -> PathBuf {
    mode_dir.join(threshold.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cat(s: &str) -> Value {
        Value::Categorical(s.to_string())
    }

    #[test]
    fn test_load_assignments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "A.\tc1").unwrap();
        writeln!(file, "B \tc1").unwrap();
        writeln!(file, "C:\tc2").unwrap();
        file.flush().unwrap();

        let assignments = ClusterAssignments::from_tsv(file.path()).unwrap();
        assert_eq!(assignments.len(), 3);
        assert_eq!(assignments.get("A"), Some(&cat("c1")));
        assert_eq!(assignments.get("C"), Some(&cat("c2")));
        assert_eq!(assignments.get("A."), None);
    }

    #[test]
    fn test_numeric_cluster_labels() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "A\t0").unwrap();
        writeln!(file, "B\t7").unwrap();
        file.flush().unwrap();

        let assignments = ClusterAssignments::from_tsv(file.path()).unwrap();
        assert_eq!(assignments.get("B"), Some(&Value::Continuous(7.0)));
    }

    #[test]
    fn test_first_assignment_wins() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "A\tc1").unwrap();
        writeln!(file, "A.\tc2").unwrap();
        file.flush().unwrap();

        let assignments = ClusterAssignments::from_tsv(file.path()).unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments.get("A"), Some(&cat("c1")));
    }

    #[test]
    fn test_malformed_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "A\tc1\textra").unwrap();
        writeln!(file, "B").unwrap();
        writeln!(file, "C\tc2").unwrap();
        file.flush().unwrap();

        let assignments = ClusterAssignments::from_tsv(file.path()).unwrap();
        assert_eq!(assignments.get("A"), None);
        assert_eq!(assignments.get("B"), Some(&Value::Missing));
        assert_eq!(assignments.get("C"), Some(&cat("c2")));
    }

    #[test]
    fn test_assignment_path() {
        let dir = mode_dir(Path::new("/data/clusters"), "cov_short_80");
        let t = Threshold::new(0.9).unwrap();
        assert_eq!(
            assignment_path(&dir, &t),
            PathBuf::from("/data/clusters/cov_short_80/labels_id_0.90.tsv")
        );
    }
}
