//! The consumed API boundary: analyzers fetch deployment data through
//! this trait and are responsible for degrading gracefully when a call
//! fails. Transport and auth live outside this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::ProductTag;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,
}

/// A worker node as reported by the deployment API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub cpu_pct: f64,
    pub memory_pct: f64,
    pub disk_pct: f64,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub id: String,
    pub kind: String,
    /// Reported state, e.g. "healthy", "degraded", "error".
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: String,
    #[serde(default)]
    pub routed: bool,
    #[serde(default)]
    pub functions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub version: String,
    #[serde(default)]
    pub uptime_seconds: u64,
}

/// One sampled metric series over the requested time range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSample {
    pub name: String,
    pub values: Vec<f64>,
}

/// Time range for metrics queries, in minutes back from now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub minutes: u32,
}

impl TimeRange {
    pub fn last_minutes(minutes: u32) -> Self {
        Self { minutes }
    }
}

/// Async deployment API consumed by analyzers and the orchestrator.
///
/// The call counter is the one piece of shared mutable state in a run.
/// It is owned by the client, monotonically increasing, and only read
/// between analyzers, so no locking is needed under the strictly
/// sequential execution model.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn get_workers(&self) -> Result<Vec<Worker>, ClientError>;

    async fn get_outputs(&self) -> Result<Vec<Output>, ClientError>;

    async fn get_pipelines(&self) -> Result<Vec<Pipeline>, ClientError>;

    async fn get_system_info(&self) -> Result<SystemInfo, ClientError>;

    async fn get_metrics(&self, range: TimeRange) -> Result<Vec<MetricsSample>, ClientError>;

    /// Cumulative calls charged so far in this run.
    fn api_calls_used(&self) -> u32;

    fn api_calls_remaining(&self) -> u32;

    fn is_cloud(&self) -> bool;

    fn product_type(&self) -> ProductTag;
}
