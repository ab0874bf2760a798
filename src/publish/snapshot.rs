//! Per-week ranking snapshot files

use crate::error::Result;
use crate::rating::StoredRating;
use crate::types::{Season, TeamRating, Week};

/// File name of the snapshot for a season and week
pub fn snapshot_file_name(season: Season, week: Week) -> String {
    format!("{}.{}.json", season, week)
}

/// JSON array of team ratings in the order given
pub fn render(rankings: &[StoredRating]) -> Result<String> {
    let records: Vec<&TeamRating> = rankings.iter().map(|row| &row.record).collect();
    Ok(serde_json::to_string(&records)?)
}
