//! Data structures for congruence analysis.

mod assignment;
mod identifier;
mod reference;
mod score;
mod table;
mod threshold;
mod tsv;
mod value;

pub use assignment::{assignment_path, mode_dir, ClusterAssignments};
pub use identifier::{normalize_id, normalize_id_str};
pub use reference::load_reference;
pub use score::{ScoreRecord, ScoreTable};
pub use table::{normalize_column_name, Column, ColumnIndex, LabelTable, ID_COLUMN};
pub use threshold::Threshold;
pub use value::{is_missing_token, parse_column, Value, MISSING_TOKENS};
