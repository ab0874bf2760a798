//! Metrics and monitoring for league-ranker
//!
//! Runs are short-lived, so metrics are exported by writing a Prometheus
//! text file rather than serving an endpoint.

pub mod collector;

pub use collector::{EngineMetrics, MetricsCollector, MetricsTimer, OutputMetrics};
