//! Metrics collection using Prometheus
//!
//! This module provides metrics for ranking runs: how many sweeps the engine
//! needed, how long it took, and what was stored.

use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for ranking runs
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Rating engine metrics
    engine_metrics: EngineMetrics,

    /// Storage and publishing metrics
    output_metrics: OutputMetrics,
}

/// Rating engine metrics
#[derive(Clone)]
pub struct EngineMetrics {
    /// Total ranking builds by outcome
    pub builds_total: IntCounterVec,

    /// Sweeps needed per converged build
    pub sweeps: Histogram,

    /// Number of teams in the last build
    pub teams: IntGauge,

    /// Wall time of a build
    pub build_duration_seconds: Histogram,
}

/// Storage and publishing metrics
#[derive(Clone)]
pub struct OutputMetrics {
    /// Total team ratings written to storage
    pub ratings_stored_total: IntCounter,

    /// Store attempts skipped because ratings already existed
    pub stores_skipped_total: IntCounter,

    /// Snapshot files written
    pub snapshots_written_total: IntCounter,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let engine_metrics = EngineMetrics::new(&registry)?;
        let output_metrics = OutputMetrics::new(&registry)?;

        Ok(Self {
            registry,
            engine_metrics,
            output_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get engine metrics
    pub fn engine(&self) -> &EngineMetrics {
        &self.engine_metrics
    }

    /// Get output metrics
    pub fn output(&self) -> &OutputMetrics {
        &self.output_metrics
    }

    /// Record a build that converged
    pub fn record_build(&self, teams: usize, sweeps: usize, duration: Duration) {
        self.engine_metrics
            .builds_total
            .with_label_values(&["converged"])
            .inc();
        self.engine_metrics.sweeps.observe(sweeps as f64);
        self.engine_metrics.teams.set(teams as i64);
        self.engine_metrics
            .build_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Record a build that failed (e.g. hit the sweep cap)
    pub fn record_build_failure(&self, teams: usize, duration: Duration) {
        self.engine_metrics
            .builds_total
            .with_label_values(&["failed"])
            .inc();
        self.engine_metrics.teams.set(teams as i64);
        self.engine_metrics
            .build_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Record ratings written and the snapshot published for them
    pub fn record_store(&self, ratings: usize) {
        self.output_metrics
            .ratings_stored_total
            .inc_by(ratings as u64);
        self.output_metrics.snapshots_written_total.inc();
    }

    /// Record a store skipped because the week was already stored
    pub fn record_store_skipped(&self) {
        self.output_metrics.stores_skipped_total.inc();
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> Result<String> {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Write metrics to a file for a textfile collector
    pub fn write_textfile(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render()?)?;
        Ok(())
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl EngineMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let builds_total = IntCounterVec::new(
            Opts::new("league_ranker_builds_total", "Total ranking builds"),
            &["outcome"],
        )?;
        registry.register(Box::new(builds_total.clone()))?;

        let sweeps = Histogram::with_opts(
            HistogramOpts::new("league_ranker_sweeps", "Sweeps needed to converge")
                .buckets(vec![1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0, 100.0]),
        )?;
        registry.register(Box::new(sweeps.clone()))?;

        let teams = IntGauge::new("league_ranker_teams", "Teams in the last ranking build")?;
        registry.register(Box::new(teams.clone()))?;

        let build_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "league_ranker_build_duration_seconds",
            "Time spent computing ratings",
        ))?;
        registry.register(Box::new(build_duration_seconds.clone()))?;

        Ok(Self {
            builds_total,
            sweeps,
            teams,
            build_duration_seconds,
        })
    }
}

impl OutputMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let ratings_stored_total = IntCounter::new(
            "league_ranker_ratings_stored_total",
            "Total team ratings written to storage",
        )?;
        registry.register(Box::new(ratings_stored_total.clone()))?;

        let stores_skipped_total = IntCounter::new(
            "league_ranker_stores_skipped_total",
            "Stores skipped because ratings already existed",
        )?;
        registry.register(Box::new(stores_skipped_total.clone()))?;

        let snapshots_written_total = IntCounter::new(
            "league_ranker_snapshots_written_total",
            "Ranking snapshot files written",
        )?;
        registry.register(Box::new(snapshots_written_total.clone()))?;

        Ok(Self {
            ratings_stored_total,
            stores_skipped_total,
            snapshots_written_total,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}
