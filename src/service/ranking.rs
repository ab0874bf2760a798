//! Ranking run coordination
//!
//! Computes ratings for a season and week, stores them, and publishes the
//! ranked snapshot and index.

use crate::config::AppConfig;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::publish::RankingPublisher;
use crate::rating::{JsonFileRatingStorage, RankingEngine, RankingOutcome, RatingStorage};
use crate::teams::TeamDirectory;
use crate::types::{RatingsMap, Season, Team, Week};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Result of storing a week's ratings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Ratings for this season and week were already stored and overwrite was off
    AlreadyExists,
    /// Ratings were stored and the snapshot written
    Stored { teams: usize, snapshot: PathBuf },
}

/// Runs the engine and hands its output to storage and publishing
pub struct RankingService {
    engine: RankingEngine,
    storage: Arc<dyn RatingStorage>,
    directory: Arc<dyn TeamDirectory>,
    publisher: RankingPublisher,
    metrics: Option<Arc<MetricsCollector>>,
}

impl RankingService {
    pub fn new(
        engine: RankingEngine,
        storage: Arc<dyn RatingStorage>,
        directory: Arc<dyn TeamDirectory>,
        publisher: RankingPublisher,
    ) -> Self {
        Self {
            engine,
            storage,
            directory,
            publisher,
            metrics: None,
        }
    }

    /// Wire up file-backed storage and publishing from configuration
    pub fn from_config(config: &AppConfig, directory: Arc<dyn TeamDirectory>) -> Result<Self> {
        let engine = RankingEngine::new(config.engine_config())?;
        let storage = Arc::new(JsonFileRatingStorage::open(
            &config.storage.ratings_db_path,
        )?);
        let publisher = RankingPublisher::new(config.output.rankings_dir.clone());

        Ok(Self::new(engine, storage, directory, publisher))
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn metrics(&self) -> Option<&Arc<MetricsCollector>> {
        self.metrics.as_ref()
    }

    /// Compute converged ratings for the given score histories
    pub fn build(&self, season: Season, week: Week, teams: &[Team]) -> Result<RankingOutcome> {
        info!(
            "Building rankings for season {} week {} ({} teams)",
            season,
            week,
            teams.len()
        );

        let started = Instant::now();
        match self.engine.build(teams) {
            Ok(outcome) => {
                let elapsed = started.elapsed();
                if let Some(metrics) = &self.metrics {
                    metrics.record_build(teams.len(), outcome.sweeps, elapsed);
                }
                Ok(outcome)
            }
            Err(e) => {
                let elapsed = started.elapsed();
                error!(
                    "Ranking build failed for season {} week {}: {}",
                    season, week, e
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_build_failure(teams.len(), elapsed);
                }
                Err(e)
            }
        }
    }

    /// Persist ratings for a season and week and publish the ranked snapshot.
    ///
    /// Existing ratings are left alone unless `overwrite` is set.
    pub fn store(
        &self,
        season: Season,
        week: Week,
        ratings: &RatingsMap,
        overwrite: bool,
    ) -> Result<StoreOutcome> {
        if !overwrite && self.storage.ratings_exist(season, week)? {
            warn!(
                "Ratings for season {} week {} already exist, not overwriting",
                season, week
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_store_skipped();
            }
            return Ok(StoreOutcome::AlreadyExists);
        }

        let removed = self.storage.clear_ratings(season, week)?;
        if removed > 0 {
            debug!(
                "Cleared {} existing ratings for season {} week {}",
                removed, season, week
            );
        }

        for rating in ratings.values() {
            self.storage.insert_rating(season, week, rating)?;
        }

        let rankings = self.storage.get_rankings(season, week)?;
        let snapshot = self.publisher.write_snapshot(season, week, &rankings)?;
        self.publisher.write_index(self.directory.as_ref())?;

        if let Some(metrics) = &self.metrics {
            metrics.record_store(ratings.len());
        }

        info!(
            "Stored {} ratings for season {} week {}",
            ratings.len(),
            season,
            week
        );

        Ok(StoreOutcome::Stored {
            teams: ratings.len(),
            snapshot,
        })
    }

    /// Build and store in one go
    pub fn run(
        &self,
        season: Season,
        week: Week,
        teams: &[Team],
        overwrite: bool,
    ) -> Result<(RankingOutcome, StoreOutcome)> {
        let outcome = self.build(season, week, teams)?;
        let stored = self.store(season, week, &outcome.ratings, overwrite)?;
        Ok((outcome, stored))
    }
}
