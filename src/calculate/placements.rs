//! Competition placements from the ranking table.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use super::filter;
use crate::models::{FilterContext, PlacementEntry, PlacementSummary, RankingRecord};

type GroupKey<'a> = (NaiveDate, &'a str, &'a str);

/// Field size of every (date, competition, category) group: its max placement.
///
/// Always computed over the full table so a filter on fencers cannot shrink
/// the field.
fn field_sizes(rankings: &[RankingRecord]) -> HashMap<GroupKey<'_>, u32> {
    let mut sizes = HashMap::new();
    for r in rankings {
        let size = sizes.entry(r.group_key()).or_insert(0);
        *size = (*size).max(r.placement);
    }
    sizes
}

/// Every placement of `fencer` matching `ctx`, oldest first.
pub fn placement_history(
    rankings: &[RankingRecord],
    fencer: &str,
    ctx: &FilterContext,
) -> Vec<PlacementEntry> {
    let sizes = field_sizes(rankings);

    let mut entries: Vec<PlacementEntry> = filter::apply_rankings(rankings, ctx)
        .into_iter()
        .filter(|r| r.fencer == fencer)
        .map(|r| {
            let field_size = sizes.get(&r.group_key()).copied().unwrap_or(r.placement);
            PlacementEntry {
                date: r.date,
                season: r.season,
                competition: r.competition.clone(),
                category: r.category.clone(),
                competition_type: r.competition_type,
                placement: r.placement,
                field_size,
                percentile: field_percentile(r.placement, field_size),
            }
        })
        .collect();

    entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.competition.cmp(&b.competition)));
    debug!("{} placements for {}", entries.len(), fencer);
    entries
}

/// Counts and means over `fencer`'s placements matching `ctx`.
pub fn placement_summary(
    rankings: &[RankingRecord],
    fencer: &str,
    ctx: &FilterContext,
) -> PlacementSummary {
    let history = placement_history(rankings, fencer, ctx);
    let mut summary = PlacementSummary {
        fencer: fencer.to_string(),
        competitions: history.len() as u32,
        ..Default::default()
    };
    if history.is_empty() {
        return summary;
    }

    let mut placement_sum = 0u64;
    let mut percentile_sum = 0.0;
    for entry in &history {
        let rank = entry.placement;
        if entry.is_title() {
            summary.titles += 1;
        }
        if entry.is_podium() {
            summary.podiums += 1;
        }
        if rank <= 8 {
            summary.top_8 += 1;
        }
        if entry.is_top_half() {
            summary.top_half += 1;
        }
        summary.best = Some(summary.best.map_or(rank, |b| b.min(rank)));
        placement_sum += rank as u64;
        percentile_sum += entry.percentile;
    }

    let n = history.len() as f64;
    summary.mean_placement = placement_sum as f64 / n;
    summary.mean_percentile = percentile_sum / n;
    summary
}

/// Share of the field placed at or behind `placement`, 0 to 100.
fn field_percentile(placement: u32, field_size: u32) -> f64 {
    if field_size == 0 || placement > field_size {
        return 0.0;
    }
    (field_size - placement + 1) as f64 / field_size as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(day: u32, competition: &str, fencer: &str, placement: u32) -> RankingRecord {
        RankingRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            2024,
            fencer.to_string(),
            competition.to_string(),
            "U20 H".to_string(),
            placement,
        )
    }

    fn rankings() -> Vec<RankingRecord> {
        vec![
            placed(20, "CN Lyon", "Alice", 4),
            placed(20, "CN Lyon", "Bea", 8),
            placed(6, "CN Paris", "Alice", 1),
            placed(6, "CN Paris", "Bea", 2),
            placed(6, "CN Paris", "Chloe", 3),
            placed(6, "CN Paris", "Dana", 10),
        ]
    }

    #[test]
    fn test_history_sorted_with_field_size() {
        let history = placement_history(&rankings(), "Alice", &FilterContext::default());

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].competition, "CN Paris");
        assert_eq!(history[0].field_size, 10);
        assert_eq!(history[0].percentile, 100.0);
        assert_eq!(history[1].competition, "CN Lyon");
        assert_eq!(history[1].field_size, 8);
        assert_eq!(history[1].percentile, 62.5);
    }

    #[test]
    fn test_field_size_ignores_fencer_filter() {
        let ctx = FilterContext::new().with_fencers(["Alice"]);
        let history = placement_history(&rankings(), "Alice", &ctx);
        assert_eq!(history[0].field_size, 10);
    }

    #[test]
    fn test_summary_counts() {
        let summary = placement_summary(&rankings(), "Alice", &FilterContext::default());

        assert_eq!(summary.competitions, 2);
        assert_eq!(summary.best, Some(1));
        assert_eq!(summary.titles, 1);
        assert_eq!(summary.podiums, 1);
        assert_eq!(summary.top_8, 2);
        assert_eq!(summary.top_half, 2);
        assert_eq!(summary.mean_placement, 2.5);
        assert_eq!(summary.mean_percentile, (100.0 + 62.5) / 2.0);
    }

    #[test]
    fn test_summary_respects_context() {
        let ctx = FilterContext::new().with_competitions(["CN Lyon"]);
        let summary = placement_summary(&rankings(), "Bea", &ctx);
        assert_eq!(summary.competitions, 1);
        assert_eq!(summary.best, Some(8));
        assert_eq!(summary.top_half, 0);
    }

    #[test]
    fn test_unknown_fencer_empty_summary() {
        let summary = placement_summary(&rankings(), "Zoe", &FilterContext::default());
        assert_eq!(summary.competitions, 0);
        assert_eq!(summary.best, None);
        assert_eq!(summary.mean_placement, 0.0);
    }
}
