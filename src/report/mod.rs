//! Result Merger Module
//!
//! Folds the per-member rankings of one fetch into the global top-N and records
//! coverage: which members contributed, how long each scan took, and which members
//! failed or departed. Members without a ranking never abort the merge; they are
//! listed as missing so gaps in the ranking stay visible.

pub mod merge;
pub mod types;

pub use merge::merge_outcomes;
pub use types::{GlobalReport, NodeReport, NodeStatus};
