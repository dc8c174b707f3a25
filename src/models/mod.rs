//! Core data models for the fencing statistics engine.

mod filter;
mod ids;
mod match_record;
mod metric;
mod ranking_record;
mod stats;

pub use filter::*;
pub use ids::*;
pub use match_record::*;
pub use metric::*;
pub use ranking_record::*;
pub use stats::*;
