//! Budget-constrained sequential execution of analyzers, with failure
//! isolation, progress reporting, and aggregation into an
//! [`AnalysisRun`].
//!
//! Analyzers run strictly one at a time. The call budget is a single
//! global counter owned by the API client; running sequentially means it
//! can be checked and charged between analyzers without locking.

use std::collections::{BTreeMap, HashMap};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::analyzer::{AnalyzerRegistry, AnalyzerResult};
use crate::client::ApiClient;
use crate::error::{OrchestratorError, ValidationError};
use crate::model::{
    AnalysisRun, ComponentScore, Finding, HealthScore, NewAnalysisRun, RunStatus, Severity,
};

/// Penalty applied per finding when an analyzer reports no score of its own.
static SEVERITY_PENALTIES: Lazy<HashMap<Severity, f64>> = Lazy::new(|| {
    HashMap::from([
        (Severity::Critical, 20.0),
        (Severity::High, 10.0),
        (Severity::Medium, 3.0),
        (Severity::Low, 0.5),
        (Severity::Info, 0.0),
    ])
});

/// Raw category weights; normalized over the categories present in a run.
static COMPONENT_WEIGHTS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("health", 0.25),
        ("security", 0.20),
        ("config", 0.15),
        ("resource", 0.15),
        ("fleet", 0.10),
        ("alerting", 0.05),
        ("other", 0.10),
    ])
});

fn categorize(objective: &str) -> &'static str {
    match objective {
        "health" => "health",
        "security" => "security",
        "config" | "schema_quality" | "dataflow_topology" => "config",
        "resource" | "storage" | "backpressure" | "pipeline_performance" => "resource",
        "fleet" => "fleet",
        "alerting" => "alerting",
        _ => "other",
    }
}

/// Progress of one orchestration pass, handed to the progress callback
/// after each objective.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisProgress {
    pub total_objectives: usize,
    pub completed_objectives: usize,
    pub current_objective: Option<String>,
    pub api_calls_used: u32,
    pub api_calls_remaining: u32,
}

impl AnalysisProgress {
    fn new(total_objectives: usize, api_call_budget: u32) -> Self {
        Self {
            total_objectives,
            completed_objectives: 0,
            current_objective: None,
            api_calls_used: 0,
            api_calls_remaining: api_call_budget,
        }
    }

    fn start_objective(&mut self, objective: &str) {
        self.current_objective = Some(objective.to_string());
    }

    fn complete_objective(&mut self) {
        self.completed_objectives += 1;
        self.current_objective = None;
    }

    fn update_api_calls(&mut self, used: u32, remaining: u32) {
        self.api_calls_used = used;
        self.api_calls_remaining = remaining;
    }

    pub fn percentage(&self) -> f64 {
        if self.total_objectives == 0 {
            return 100.0;
        }
        self.completed_objectives as f64 / self.total_objectives as f64 * 100.0
    }
}

/// Summary of API budget consumption for one run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ApiUsageSummary {
    pub used: u32,
    pub remaining: u32,
    pub budget: u32,
}

/// Invoked once per handled objective. Panics are caught and logged so a
/// misbehaving observer can never abort orchestration.
pub type ProgressCallback<'a> = &'a (dyn Fn(&AnalysisProgress) + Send + Sync);

pub struct Orchestrator {
    client: Arc<dyn ApiClient>,
    registry: AnalyzerRegistry,
    max_api_calls: u32,
    continue_on_error: bool,
    progress: Option<AnalysisProgress>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn ApiClient>, registry: AnalyzerRegistry) -> Self {
        Self {
            client,
            registry,
            max_api_calls: 100,
            continue_on_error: true,
            progress: None,
            started_at: None,
            ended_at: None,
        }
    }

    pub fn with_max_api_calls(mut self, max_api_calls: u32) -> Self {
        self.max_api_calls = max_api_calls;
        self
    }

    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Run the requested objectives (all registered objectives when
    /// `None`) and return one result per handled objective.
    ///
    /// An unknown objective name is a caller error and fails fast before
    /// any analyzer runs.
    pub async fn run_analysis(
        &mut self,
        objectives: Option<&[String]>,
        progress_callback: Option<ProgressCallback<'_>>,
    ) -> Result<BTreeMap<String, AnalyzerResult>, OrchestratorError> {
        self.started_at = Some(Utc::now());

        let objectives: Vec<String> = match objectives {
            Some(list) => list.to_vec(),
            None => self.registry.objectives(),
        };

        if objectives.is_empty() {
            tracing::warn!("no analyzers registered, nothing to run");
            self.ended_at = Some(Utc::now());
            return Ok(BTreeMap::new());
        }

        for objective in &objectives {
            if !self.registry.contains(objective) {
                return Err(OrchestratorError::UnknownObjective {
                    objective: objective.clone(),
                    available: self.registry.objectives().join(", "),
                });
            }
        }

        self.progress = Some(AnalysisProgress::new(objectives.len(), self.max_api_calls));

        tracing::info!(
            objectives = ?objectives,
            api_call_budget = self.max_api_calls,
            "analysis started"
        );

        let mut results: BTreeMap<String, AnalyzerResult> = BTreeMap::new();

        for objective in &objectives {
            let used = self.client.api_calls_used();
            let remaining = self.max_api_calls.saturating_sub(used);

            if used >= self.max_api_calls {
                tracing::error!(
                    objective = %objective,
                    used,
                    budget = self.max_api_calls,
                    "API call budget exceeded"
                );
                results.insert(
                    objective.clone(),
                    AnalyzerResult::failed(objective, "API call budget exceeded"),
                );
                if !self.continue_on_error {
                    break;
                }
                self.finish_objective(progress_callback);
                continue;
            }

            if let Some(progress) = self.progress.as_mut() {
                progress.start_objective(objective);
                progress.update_api_calls(used, remaining);
            }

            match self.run_single_analyzer(objective).await {
                Ok(result) => {
                    results.insert(objective.clone(), result);
                }
                Err(error) => {
                    tracing::error!(objective = %objective, error = %error, "analyzer failed");
                    results.insert(
                        objective.clone(),
                        AnalyzerResult::failed(objective, format!("Analyzer failed: {error:#}")),
                    );
                    if !self.continue_on_error {
                        break;
                    }
                }
            }

            self.finish_objective(progress_callback);
        }

        self.ended_at = Some(Utc::now());

        tracing::info!(
            objectives_completed = results.len(),
            objectives_total = objectives.len(),
            api_calls_used = self.client.api_calls_used(),
            "analysis completed"
        );

        Ok(results)
    }

    async fn run_single_analyzer(&self, objective: &str) -> anyhow::Result<AnalyzerResult> {
        // Membership was validated before the loop.
        let analyzer = self
            .registry
            .get(objective)
            .ok_or_else(|| anyhow::anyhow!("no analyzer found for objective '{objective}'"))?;

        tracing::info!(
            objective = %objective,
            estimated_api_calls = analyzer.estimated_api_calls(),
            "analyzer started"
        );

        if !analyzer.pre_analyze_check(self.client.as_ref()).await {
            tracing::warn!(objective = %objective, "analyzer pre-flight check failed");
            return Ok(AnalyzerResult::failed(
                objective,
                "Pre-flight check failed - analyzer cannot run",
            ));
        }

        let started = Utc::now();
        let result = analyzer.analyze(self.client.as_ref()).await?;
        let elapsed = (Utc::now() - started).num_milliseconds() as f64 / 1000.0;

        tracing::info!(
            objective = %objective,
            success = result.success,
            findings = result.findings.len(),
            recommendations = result.recommendations.len(),
            duration_seconds = elapsed,
            "analyzer completed"
        );

        Ok(result)
    }

    /// Advance progress after an objective is handled (succeeded, failed,
    /// or synthesized) and notify the callback.
    fn finish_objective(&mut self, progress_callback: Option<ProgressCallback<'_>>) {
        let used = self.client.api_calls_used();
        let remaining = self.max_api_calls.saturating_sub(used);

        if let Some(progress) = self.progress.as_mut() {
            progress.complete_objective();
            progress.update_api_calls(used, remaining);
        }

        if let (Some(callback), Some(progress)) = (progress_callback, self.progress.as_ref()) {
            if catch_unwind(AssertUnwindSafe(|| callback(progress))).is_err() {
                tracing::warn!("progress callback panicked; continuing");
            }
        }
    }

    /// Fold per-objective results into one validated [`AnalysisRun`].
    pub fn create_analysis_run(
        &self,
        results: &BTreeMap<String, AnalyzerResult>,
        deployment_id: &str,
    ) -> Result<AnalysisRun, ValidationError> {
        let mut findings: Vec<Finding> = Vec::new();
        let mut recommendations = Vec::new();
        let mut errors = Vec::new();

        for (objective, result) in results {
            findings.extend(result.findings.iter().cloned());
            recommendations.extend(result.recommendations.iter().cloned());
            if !result.success {
                if let Some(error) = &result.error {
                    errors.push(format!("{objective}: {error}"));
                }
            }
        }

        let failed_count = results.values().filter(|r| !r.success).count();
        let status = if failed_count == 0 {
            RunStatus::Completed
        } else if failed_count < results.len() {
            RunStatus::Partial
        } else {
            RunStatus::Failed
        };

        let health_score = self.calculate_overall_health_score(results, &findings)?;

        let started_at = self.started_at.unwrap_or_else(Utc::now);
        let completed_at = self.ended_at.unwrap_or(started_at);

        AnalysisRun::new(NewAnalysisRun {
            deployment_id: deployment_id.to_string(),
            started_at,
            completed_at,
            status,
            objectives_analyzed: results.keys().cloned().collect(),
            api_calls_used: self.client.api_calls_used(),
            health_score: Some(health_score),
            findings,
            recommendations,
            errors,
            partial_completion: failed_count > 0 && failed_count < results.len(),
        })
    }

    /// Hierarchical scoring: per-objective scores come from analyzer
    /// metadata where available, otherwise from severity penalties over
    /// that objective's findings; objectives are grouped into weighted
    /// categories, and the weights of the categories present are
    /// normalized so the constructed [`HealthScore`] always satisfies its
    /// weight-sum invariant.
    fn calculate_overall_health_score(
        &self,
        results: &BTreeMap<String, AnalyzerResult>,
        findings: &[Finding],
    ) -> Result<HealthScore, ValidationError> {
        struct CategoryData {
            scores: Vec<f64>,
            objectives: Vec<String>,
            weight: f64,
        }

        let mut categories: BTreeMap<&'static str, CategoryData> = BTreeMap::new();

        for (objective, result) in results {
            let category = categorize(objective);

            let score = metadata_score(result).unwrap_or_else(|| {
                let penalty: f64 = findings
                    .iter()
                    .filter(|f| f.category == *objective)
                    .map(|f| SEVERITY_PENALTIES[&f.severity])
                    .sum();
                (100.0 - penalty).max(0.0)
            });

            let entry = categories.entry(category).or_insert_with(|| CategoryData {
                scores: Vec::new(),
                objectives: Vec::new(),
                weight: COMPONENT_WEIGHTS.get(category).copied().unwrap_or(0.05),
            });
            entry.scores.push(score);
            entry.objectives.push(objective.clone());
        }

        let total_weight: f64 = categories.values().map(|c| c.weight).sum();

        let mut components = BTreeMap::new();
        let mut weighted_sum = 0.0;

        for (category, data) in &categories {
            let avg = data.scores.iter().sum::<f64>() / data.scores.len() as f64;
            weighted_sum += avg * data.weight;

            components.insert(
                (*category).to_string(),
                ComponentScore::new(
                    title_case(category),
                    avg.clamp(0.0, 100.0) as u8,
                    data.weight / total_weight,
                    format!("Based on: {}", data.objectives.join(", ")),
                )?,
            );
        }

        let overall = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            let penalty: f64 = findings
                .iter()
                .map(|f| SEVERITY_PENALTIES[&f.severity])
                .sum();
            (100.0 - penalty).max(0.0)
        };

        HealthScore::new(overall.clamp(0.0, 100.0) as u8, components)
    }

    pub fn get_progress(&self) -> Option<&AnalysisProgress> {
        self.progress.as_ref()
    }

    pub fn get_api_usage_summary(&self) -> ApiUsageSummary {
        let used = self.client.api_calls_used();
        ApiUsageSummary {
            used,
            remaining: self.max_api_calls.saturating_sub(used),
            budget: self.max_api_calls,
        }
    }
}

/// Pull a numeric score out of analyzer metadata, trying the common key
/// names in order.
fn metadata_score(result: &AnalyzerResult) -> Option<f64> {
    let keyed = format!("{}_health_score", result.objective);
    for key in ["health_score", keyed.as_str(), "score", "overall_score"] {
        if let Some(value) = result.metadata.get(key).and_then(|v| v.as_f64()) {
            return Some(value.clamp(0.0, 100.0));
        }
    }
    None
}

fn title_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use crate::analyzer::Analyzer;
    use crate::client::{
        ClientError, MetricsSample, Output, Pipeline, SystemInfo, TimeRange, Worker,
    };
    use crate::error::ValidationError;
    use crate::model::{Confidence, ProductTag, Severity};

    struct FakeClient {
        calls: AtomicU32,
        budget: u32,
    }

    impl FakeClient {
        fn new(budget: u32) -> Self {
            Self {
                calls: AtomicU32::new(0),
                budget,
            }
        }

        fn with_calls_used(budget: u32, used: u32) -> Self {
            Self {
                calls: AtomicU32::new(used),
                budget,
            }
        }
    }

    #[async_trait]
    impl ApiClient for FakeClient {
        async fn get_workers(&self) -> Result<Vec<Worker>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn get_outputs(&self) -> Result<Vec<Output>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn get_pipelines(&self) -> Result<Vec<Pipeline>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn get_system_info(&self) -> Result<SystemInfo, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SystemInfo {
                version: "4.2.1".to_string(),
                uptime_seconds: 0,
            })
        }

        async fn get_metrics(&self, _range: TimeRange) -> Result<Vec<MetricsSample>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        fn api_calls_used(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        fn api_calls_remaining(&self) -> u32 {
            self.budget.saturating_sub(self.api_calls_used())
        }

        fn is_cloud(&self) -> bool {
            false
        }

        fn product_type(&self) -> ProductTag {
            ProductTag::Stream
        }
    }

    enum Behavior {
        Succeed,
        Fail,
        RefusePreflight,
    }

    struct ScriptedAnalyzer {
        objective: &'static str,
        behavior: Behavior,
        invocations: AtomicU32,
    }

    impl ScriptedAnalyzer {
        fn new(objective: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                objective,
                behavior,
                invocations: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl Analyzer for ScriptedAnalyzer {
        fn objective_name(&self) -> &str {
            self.objective
        }

        async fn pre_analyze_check(&self, _client: &dyn ApiClient) -> bool {
            !matches!(self.behavior, Behavior::RefusePreflight)
        }

        async fn analyze(&self, client: &dyn ApiClient) -> anyhow::Result<AnalyzerResult> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Fail => anyhow::bail!("upstream exploded"),
                _ => {
                    client.get_workers().await?;
                    let mut result = AnalyzerResult::new(self.objective);
                    result
                        .metadata
                        .insert("health_score".to_string(), serde_json::json!(85.0));
                    Ok(result)
                }
            }
        }
    }

    fn orchestrator_with(
        client: Arc<dyn ApiClient>,
        analyzers: Vec<Arc<ScriptedAnalyzer>>,
    ) -> Orchestrator {
        let registry = AnalyzerRegistry::new(
            analyzers
                .into_iter()
                .map(|a| a as Arc<dyn Analyzer>)
                .collect(),
        )
        .unwrap();
        Orchestrator::new(client, registry)
    }

    fn names(objectives: &[&str]) -> Vec<String> {
        objectives.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn unknown_objective_fails_fast() {
        let health = ScriptedAnalyzer::new("health", Behavior::Succeed);
        let invocations = Arc::clone(&health);
        let mut orch = orchestrator_with(Arc::new(FakeClient::new(100)), vec![health]);

        let err = orch
            .run_analysis(Some(&names(&["health", "bogus"])), None)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::UnknownObjective { ref objective, .. } if objective == "bogus"));
        assert_eq!(invocations.invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_stops_the_loop_when_not_continuing() {
        let mut orch = orchestrator_with(
            Arc::new(FakeClient::new(100)),
            vec![
                ScriptedAnalyzer::new("health", Behavior::Fail),
                ScriptedAnalyzer::new("config", Behavior::Succeed),
            ],
        )
        .with_continue_on_error(false);

        let results = orch
            .run_analysis(Some(&names(&["health", "config"])), None)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(!results["health"].success);
        assert!(results["health"].error.as_deref().unwrap().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn failure_is_isolated_when_continuing() {
        let mut orch = orchestrator_with(
            Arc::new(FakeClient::new(100)),
            vec![
                ScriptedAnalyzer::new("health", Behavior::Fail),
                ScriptedAnalyzer::new("config", Behavior::Succeed),
            ],
        );

        let results = orch
            .run_analysis(Some(&names(&["health", "config"])), None)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(!results["health"].success);
        assert!(results["config"].success);
    }

    #[tokio::test]
    async fn exhausted_budget_synthesizes_failures_without_invoking_analyzers() {
        let health = ScriptedAnalyzer::new("health", Behavior::Succeed);
        let config = ScriptedAnalyzer::new("config", Behavior::Succeed);
        let health_ref = Arc::clone(&health);
        let config_ref = Arc::clone(&config);

        let mut orch = orchestrator_with(
            Arc::new(FakeClient::with_calls_used(100, 100)),
            vec![health, config],
        );

        let results = orch.run_analysis(None, None).await.unwrap();
        assert_eq!(results.len(), 2);
        for result in results.values() {
            assert!(!result.success);
            assert!(result.error.as_deref().unwrap().contains("budget exceeded"));
        }
        assert_eq!(health_ref.invocations.load(Ordering::SeqCst), 0);
        assert_eq!(config_ref.invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn preflight_rejection_becomes_a_failed_result() {
        let mut orch = orchestrator_with(
            Arc::new(FakeClient::new(100)),
            vec![
                ScriptedAnalyzer::new("health", Behavior::RefusePreflight),
                ScriptedAnalyzer::new("config", Behavior::Succeed),
            ],
        );

        let results = orch.run_analysis(None, None).await.unwrap();
        assert!(!results["health"].success);
        assert!(results["health"]
            .error
            .as_deref()
            .unwrap()
            .contains("Pre-flight check failed"));
        assert!(results["config"].success);
    }

    #[tokio::test]
    async fn progress_callback_fires_per_objective_and_panics_are_swallowed() {
        let seen: Arc<Mutex<Vec<(usize, u32)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_ref = Arc::clone(&seen);

        let mut orch = orchestrator_with(
            Arc::new(FakeClient::new(100)),
            vec![
                ScriptedAnalyzer::new("health", Behavior::Succeed),
                ScriptedAnalyzer::new("config", Behavior::Succeed),
            ],
        );

        let callback = move |progress: &AnalysisProgress| {
            seen_ref
                .lock()
                .unwrap()
                .push((progress.completed_objectives, progress.api_calls_used));
            panic!("observer bug");
        };

        let results = orch.run_analysis(None, Some(&callback)).await.unwrap();
        assert_eq!(results.len(), 2);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, 1);
        assert_eq!(seen[1].0, 2);
        assert!(orch.get_progress().unwrap().percentage() >= 100.0);
    }

    #[tokio::test]
    async fn create_analysis_run_aggregates_and_scores() {
        let mut orch = orchestrator_with(
            Arc::new(FakeClient::new(100)),
            vec![
                ScriptedAnalyzer::new("health", Behavior::Succeed),
                ScriptedAnalyzer::new("config", Behavior::Fail),
            ],
        );

        let mut results = orch.run_analysis(None, None).await.unwrap();

        // attach a finding to the successful objective
        let finding = Finding::builder("f-1", "health", Severity::Medium, "t", "d")
            .remediation_steps(["step"])
            .confidence(Confidence::High)
            .build()
            .unwrap();
        results.get_mut("health").unwrap().add_finding(finding);

        let run = orch.create_analysis_run(&results, "prod-cluster").unwrap();
        assert_eq!(run.status, RunStatus::Partial);
        assert!(run.partial_completion);
        assert_eq!(run.findings.len(), 1);
        assert_eq!(run.errors.len(), 1);
        assert!(run.errors[0].starts_with("config:"));
        assert_eq!(run.objectives_analyzed.len(), 2);

        let score = run.health_score.unwrap();
        let weight_total: f64 = score.components.values().map(|c| c.weight).sum();
        assert!((weight_total - 1.0).abs() < 0.01);
        // health metadata reported 85; config had no metadata and no findings
        assert!(score.components.contains_key("health"));
        assert!(score.components.contains_key("config"));
    }

    #[tokio::test]
    async fn run_status_failed_when_everything_fails() {
        let mut orch = orchestrator_with(
            Arc::new(FakeClient::new(100)),
            vec![ScriptedAnalyzer::new("health", Behavior::Fail)],
        );
        let results = orch.run_analysis(None, None).await.unwrap();
        let run = orch.create_analysis_run(&results, "prod").unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert!(!run.partial_completion);
    }

    #[tokio::test]
    async fn empty_results_cannot_form_a_run() {
        let orch = orchestrator_with(Arc::new(FakeClient::new(100)), vec![]);
        let err = orch.create_analysis_run(&BTreeMap::new(), "prod").unwrap_err();
        assert!(matches!(err, ValidationError::NoObjectives));
    }

    #[tokio::test]
    async fn api_usage_summary_reflects_client_counter() {
        let mut orch = orchestrator_with(
            Arc::new(FakeClient::new(100)),
            vec![ScriptedAnalyzer::new("health", Behavior::Succeed)],
        )
        .with_max_api_calls(10);

        orch.run_analysis(None, None).await.unwrap();
        let summary = orch.get_api_usage_summary();
        assert_eq!(summary.budget, 10);
        assert_eq!(summary.used, 1);
        assert_eq!(summary.remaining, 9);
    }

    #[test]
    fn metadata_score_tries_known_keys() {
        let mut result = AnalyzerResult::new("storage");
        assert_eq!(metadata_score(&result), None);

        result
            .metadata
            .insert("storage_health_score".to_string(), serde_json::json!(120));
        assert_eq!(metadata_score(&result), Some(100.0));

        result
            .metadata
            .insert("health_score".to_string(), serde_json::json!(55.5));
        assert_eq!(metadata_score(&result), Some(55.5));
    }

    #[test]
    fn categories_cover_known_objectives() {
        assert_eq!(categorize("health"), "health");
        assert_eq!(categorize("schema_quality"), "config");
        assert_eq!(categorize("backpressure"), "resource");
        assert_eq!(categorize("predictive"), "other");
    }
}
