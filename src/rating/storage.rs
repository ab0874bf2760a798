//! Rating storage interface and implementations
//!
//! This module defines the interface for persisting and retrieving computed
//! ratings per season and week, with in-memory and JSON file implementations.

use crate::error::{RankingError, Result};
use crate::types::{Season, TeamId, TeamRating, Week};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// A persisted team rating for one season and week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRating {
    pub season: Season,
    pub week: Week,
    pub team_id: TeamId,
    /// Copy of `record.rating`, kept for ordering
    pub rating: f64,
    pub record: TeamRating,
    pub stored_at: DateTime<Utc>,
}

impl StoredRating {
    pub fn new(season: Season, week: Week, record: &TeamRating) -> Self {
        Self {
            season,
            week,
            team_id: record.id.clone(),
            rating: record.rating,
            record: record.clone(),
            stored_at: Utc::now(),
        }
    }
}

/// Trait for rating storage operations
pub trait RatingStorage: Send + Sync {
    /// Whether any ratings are stored for the season and week
    fn ratings_exist(&self, season: Season, week: Week) -> Result<bool>;

    /// Remove all ratings for the season and week, returning how many were removed
    fn clear_ratings(&self, season: Season, week: Week) -> Result<usize>;

    /// Store one team's rating, replacing an earlier one for the same team
    fn insert_rating(&self, season: Season, week: Week, rating: &TeamRating) -> Result<()>;

    /// Stored ratings for the season and week, best first
    fn get_rankings(&self, season: Season, week: Week) -> Result<Vec<StoredRating>>;
}

/// Highest rating first; equal ratings ordered by team id.
fn ranking_order(a: &StoredRating, b: &StoredRating) -> Ordering {
    b.rating
        .partial_cmp(&a.rating)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.team_id.cmp(&b.team_id))
}

fn lock_error(kind: &str) -> RankingError {
    RankingError::InternalError {
        message: format!("Failed to acquire ratings {} lock", kind),
    }
}

type RatingTable = BTreeMap<(Season, Week), Vec<StoredRating>>;

fn upsert(table: &mut RatingTable, entry: StoredRating) {
    let rows = table.entry((entry.season, entry.week)).or_default();
    match rows.iter_mut().find(|row| row.team_id == entry.team_id) {
        Some(existing) => *existing = entry,
        None => rows.push(entry),
    }
}

fn ranked(table: &RatingTable, season: Season, week: Week) -> Vec<StoredRating> {
    let mut rows = table.get(&(season, week)).cloned().unwrap_or_default();
    rows.sort_by(ranking_order);
    rows
}

/// In-memory rating storage implementation
#[derive(Debug, Default)]
pub struct InMemoryRatingStorage {
    ratings: RwLock<RatingTable>,
}

impl InMemoryRatingStorage {
    /// Create a new in-memory rating storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored ratings across all weeks
    pub fn len(&self) -> Result<usize> {
        let ratings = self.ratings.read().map_err(|_| lock_error("read"))?;
        Ok(ratings.values().map(Vec::len).sum())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl RatingStorage for InMemoryRatingStorage {
    fn ratings_exist(&self, season: Season, week: Week) -> Result<bool> {
        let ratings = self.ratings.read().map_err(|_| lock_error("read"))?;
        Ok(ratings
            .get(&(season, week))
            .is_some_and(|rows| !rows.is_empty()))
    }

    fn clear_ratings(&self, season: Season, week: Week) -> Result<usize> {
        let mut ratings = self.ratings.write().map_err(|_| lock_error("write"))?;
        Ok(ratings.remove(&(season, week)).map_or(0, |rows| rows.len()))
    }

    fn insert_rating(&self, season: Season, week: Week, rating: &TeamRating) -> Result<()> {
        let mut ratings = self.ratings.write().map_err(|_| lock_error("write"))?;
        upsert(&mut ratings, StoredRating::new(season, week, rating));
        Ok(())
    }

    fn get_rankings(&self, season: Season, week: Week) -> Result<Vec<StoredRating>> {
        let ratings = self.ratings.read().map_err(|_| lock_error("read"))?;
        Ok(ranked(&ratings, season, week))
    }
}

/// Rating storage kept in a single JSON document on disk
///
/// The whole document is rewritten after every mutation.
#[derive(Debug)]
pub struct JsonFileRatingStorage {
    path: PathBuf,
    ratings: RwLock<RatingTable>,
}

impl JsonFileRatingStorage {
    /// Open the store at `path`, starting empty if the file does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut table = RatingTable::new();

        if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| RankingError::StorageError {
                message: format!("Failed to read {}: {}", path.display(), e),
            })?;
            let rows: Vec<StoredRating> =
                serde_json::from_str(&contents).map_err(|e| RankingError::StorageError {
                    message: format!("Failed to parse {}: {}", path.display(), e),
                })?;
            debug!("Loaded {} stored ratings from {}", rows.len(), path.display());
            for row in rows {
                upsert(&mut table, row);
            }
        }

        Ok(Self {
            path,
            ratings: RwLock::new(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, table: &RatingTable) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RankingError::StorageError {
                message: format!("Failed to create {}: {}", parent.display(), e),
            })?;
        }

        let rows: Vec<&StoredRating> = table.values().flatten().collect();
        let json = serde_json::to_string_pretty(&rows)?;

        let staging = self.path.with_extension("tmp");
        fs::write(&staging, json).map_err(|e| RankingError::StorageError {
            message: format!("Failed to write {}: {}", staging.display(), e),
        })?;
        fs::rename(&staging, &self.path).map_err(|e| RankingError::StorageError {
            message: format!("Failed to replace {}: {}", self.path.display(), e),
        })?;

        Ok(())
    }
}

impl RatingStorage for JsonFileRatingStorage {
    fn ratings_exist(&self, season: Season, week: Week) -> Result<bool> {
        let ratings = self.ratings.read().map_err(|_| lock_error("read"))?;
        Ok(ratings
            .get(&(season, week))
            .is_some_and(|rows| !rows.is_empty()))
    }

    fn clear_ratings(&self, season: Season, week: Week) -> Result<usize> {
        let mut ratings = self.ratings.write().map_err(|_| lock_error("write"))?;
        let removed = ratings.remove(&(season, week)).map_or(0, |rows| rows.len());
        if removed > 0 {
            self.persist(&ratings)?;
        }
        Ok(removed)
    }

    fn insert_rating(&self, season: Season, week: Week, rating: &TeamRating) -> Result<()> {
        let mut ratings = self.ratings.write().map_err(|_| lock_error("write"))?;
        upsert(&mut ratings, StoredRating::new(season, week, rating));
        self.persist(&ratings)
    }

    fn get_rankings(&self, season: Season, week: Week) -> Result<Vec<StoredRating>> {
        let ratings = self.ratings.read().map_err(|_| lock_error("read"))?;
        Ok(ranked(&ratings, season, week))
    }
}

/// Calls recorded by [`MockRatingStorage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    RatingsExist(Season, Week),
    ClearRatings(Season, Week),
    InsertRating(Season, Week, TeamId),
    GetRankings(Season, Week),
}

/// Mock rating storage for testing
#[derive(Debug, Default)]
pub struct MockRatingStorage {
    inner: InMemoryRatingStorage,
    calls: RwLock<Vec<StorageCall>>,
}

impl MockRatingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all calls made (for testing)
    pub fn get_calls(&self) -> Vec<StorageCall> {
        self.calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Clear recorded calls (for testing)
    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.write() {
            calls.clear();
        }
    }

    fn record(&self, call: StorageCall) {
        if let Ok(mut calls) = self.calls.write() {
            calls.push(call);
        }
    }
}

impl RatingStorage for MockRatingStorage {
    fn ratings_exist(&self, season: Season, week: Week) -> Result<bool> {
        self.record(StorageCall::RatingsExist(season, week));
        self.inner.ratings_exist(season, week)
    }

    fn clear_ratings(&self, season: Season, week: Week) -> Result<usize> {
        self.record(StorageCall::ClearRatings(season, week));
        self.inner.clear_ratings(season, week)
    }

    fn insert_rating(&self, season: Season, week: Week, rating: &TeamRating) -> Result<()> {
        self.record(StorageCall::InsertRating(season, week, rating.id.clone()));
        self.inner.insert_rating(season, week, rating)
    }

    fn get_rankings(&self, season: Season, week: Week) -> Result<Vec<StoredRating>> {
        self.record(StorageCall::GetRankings(season, week));
        self.inner.get_rankings(season, week)
    }
}
