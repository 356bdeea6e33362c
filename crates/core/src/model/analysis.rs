use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::model::{Finding, HealthScore, Recommendation};

/// Hard ceiling on remote API calls per analysis run.
pub const API_CALL_BUDGET: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Partial,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Partial => "partial",
            RunStatus::Failed => "failed",
        }
    }
}

/// Inputs for constructing a validated [`AnalysisRun`].
#[derive(Debug, Clone)]
pub struct NewAnalysisRun {
    pub deployment_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub status: RunStatus,
    pub objectives_analyzed: Vec<String>,
    pub api_calls_used: u32,
    pub health_score: Option<HealthScore>,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<Recommendation>,
    pub errors: Vec<String>,
    pub partial_completion: bool,
}

/// Aggregate record of one orchestration pass. Built once from the
/// accumulated results at the end of a run, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub id: String,
    pub deployment_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub status: RunStatus,
    pub objectives_analyzed: Vec<String>,
    pub api_calls_used: u32,
    pub health_score: Option<HealthScore>,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<Recommendation>,
    pub errors: Vec<String>,
    pub partial_completion: bool,
}

impl AnalysisRun {
    pub fn new(run: NewAnalysisRun) -> Result<Self, ValidationError> {
        if run.deployment_id.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "deployment_id",
            });
        }
        if run.objectives_analyzed.is_empty() {
            return Err(ValidationError::NoObjectives);
        }
        if run.completed_at < run.started_at {
            return Err(ValidationError::CompletedBeforeStarted);
        }
        if run.api_calls_used > API_CALL_BUDGET {
            return Err(ValidationError::ApiBudgetExceeded(run.api_calls_used));
        }

        // Target is five minutes; longer runs are accepted, negative
        // durations cannot occur once the timestamp ordering holds.
        let duration_seconds =
            (run.completed_at - run.started_at).num_milliseconds() as f64 / 1000.0;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            deployment_id: run.deployment_id,
            started_at: run.started_at,
            completed_at: run.completed_at,
            duration_seconds,
            status: run.status,
            objectives_analyzed: run.objectives_analyzed,
            api_calls_used: run.api_calls_used,
            health_score: run.health_score,
            findings: run.findings,
            recommendations: run.recommendations,
            errors: run.errors,
            partial_completion: run.partial_completion,
        })
    }
}
