//! # Fencing Stats
//!
//! Query and ranking engine over fencing match results and competition
//! placements.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, rankings, filters, results)
//! - **calculate**: Statistics engine (normalization, aggregates, rankings)
//! - **storage**: JSONL dataset loading
//! - **query**: Filter parameters shared by the CLI and the API
//! - **api**: Read-only REST API
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod query;
pub mod storage;

pub use models::*;

/// Split a comma-separated list, trimming items and dropping empty ones.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("Alice,Bea"), vec!["Alice", "Bea"]);
    }

    #[test]
    fn test_parse_list_trims() {
        assert_eq!(parse_list(" CN Paris , CN Lyon "), vec!["CN Paris", "CN Lyon"]);
    }

    #[test]
    fn test_parse_list_drops_empty() {
        assert_eq!(parse_list("Alice,,Bea,"), vec!["Alice", "Bea"]);
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ").is_empty());
    }
}
