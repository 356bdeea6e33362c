//! File-backed [`ApiClient`] serving a captured deployment snapshot.
//!
//! A snapshot is a single JSON document exported from a live deployment.
//! Each data method charges the call counter once, so budget accounting
//! behaves exactly as it would against the live API.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{
    ApiClient, ClientError, MetricsSample, Output, Pipeline, SystemInfo, TimeRange, Worker,
};
use crate::model::ProductTag;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub deployment: DeploymentInfo,
    #[serde(default)]
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
    pub system: SystemInfo,
    #[serde(default)]
    pub metrics: Vec<MetricsSample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub id: String,
    #[serde(default)]
    pub is_cloud: bool,
    pub product: ProductTag,
}

pub struct SnapshotClient {
    snapshot: Snapshot,
    budget: u32,
    calls: AtomicU32,
}

impl SnapshotClient {
    pub fn new(snapshot: Snapshot, budget: u32) -> Self {
        Self {
            snapshot,
            budget,
            calls: AtomicU32::new(0),
        }
    }

    pub fn load(path: &Path, budget: u32) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse snapshot {}", path.display()))?;
        Ok(Self::new(snapshot, budget))
    }

    pub fn deployment_id(&self) -> &str {
        &self.snapshot.deployment.id
    }

    fn charge(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ApiClient for SnapshotClient {
    async fn get_workers(&self) -> Result<Vec<Worker>, ClientError> {
        self.charge();
        Ok(self.snapshot.workers.clone())
    }

    async fn get_outputs(&self) -> Result<Vec<Output>, ClientError> {
        self.charge();
        Ok(self.snapshot.outputs.clone())
    }

    async fn get_pipelines(&self) -> Result<Vec<Pipeline>, ClientError> {
        self.charge();
        Ok(self.snapshot.pipelines.clone())
    }

    async fn get_system_info(&self) -> Result<SystemInfo, ClientError> {
        self.charge();
        Ok(self.snapshot.system.clone())
    }

    async fn get_metrics(&self, _range: TimeRange) -> Result<Vec<MetricsSample>, ClientError> {
        self.charge();
        Ok(self.snapshot.metrics.clone())
    }

    fn api_calls_used(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn api_calls_remaining(&self) -> u32 {
        self.budget.saturating_sub(self.api_calls_used())
    }

    fn is_cloud(&self) -> bool {
        self.snapshot.deployment.is_cloud
    }

    fn product_type(&self) -> ProductTag {
        self.snapshot.deployment.product
    }
}
