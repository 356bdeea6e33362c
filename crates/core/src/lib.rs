pub mod analyzer;
pub mod analyzers;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod report;
pub mod scorer;
pub mod snapshot;

use std::sync::Arc;

use anyhow::Context;

use crate::analyzers::builtin_registry;
use crate::client::ApiClient;
use crate::model::AnalysisRun;
use crate::orchestrator::{Orchestrator, ProgressCallback};

#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Objectives to run; `None` runs every registered analyzer.
    pub objectives: Option<Vec<String>>,
    pub max_api_calls: u32,
    pub continue_on_error: bool,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            objectives: None,
            max_api_calls: 100,
            continue_on_error: true,
        }
    }
}

/// Run the built-in analyzer battery against one deployment and return
/// the aggregated, validated run record.
pub async fn run_audit(
    client: Arc<dyn ApiClient>,
    deployment_id: &str,
    opts: AuditOptions,
    progress_callback: Option<ProgressCallback<'_>>,
) -> anyhow::Result<AnalysisRun> {
    let mut orchestrator = Orchestrator::new(client, builtin_registry())
        .with_max_api_calls(opts.max_api_calls)
        .with_continue_on_error(opts.continue_on_error);

    let results = orchestrator
        .run_analysis(opts.objectives.as_deref(), progress_callback)
        .await
        .context("analysis failed")?;

    let run = orchestrator
        .create_analysis_run(&results, deployment_id)
        .context("failed to aggregate analysis results")?;

    Ok(run)
}
