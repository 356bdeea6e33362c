use async_trait::async_trait;
use serde_json::json;

use crate::analyzer::{Analyzer, AnalyzerResult};
use crate::client::{ApiClient, Worker};
use crate::model::{Confidence, Finding, ImpactEstimate, Priority, Recommendation, Effort, Severity};
use crate::scorer::{self, ComponentHealth};

/// Overall health assessment: worker resource monitoring and critical
/// issue identification.
pub struct HealthAnalyzer;

#[async_trait]
impl Analyzer for HealthAnalyzer {
    fn objective_name(&self) -> &str {
        "health"
    }

    fn estimated_api_calls(&self) -> u32 {
        2
    }

    fn required_permissions(&self) -> Vec<String> {
        vec!["read:workers".to_string(), "read:system".to_string()]
    }

    fn description(&self) -> String {
        "Overall health assessment, worker monitoring, and critical issue identification"
            .to_string()
    }

    async fn analyze(&self, client: &dyn ApiClient) -> anyhow::Result<AnalyzerResult> {
        let mut result = AnalyzerResult::new(self.objective_name());

        let workers = match client.get_workers().await {
            Ok(workers) => workers,
            Err(error) => {
                // Expected condition: report, do not raise.
                return Ok(AnalyzerResult::failed(
                    self.objective_name(),
                    format!("failed to fetch workers: {error}"),
                ));
            }
        };

        // System info is best-effort context, not a hard dependency.
        let version = match client.get_system_info().await {
            Ok(info) => info.version,
            Err(error) => {
                tracing::warn!(error = %error, "system info unavailable, degrading");
                "unknown".to_string()
            }
        };

        let assessments: Vec<ComponentHealth> = workers
            .iter()
            .map(|w| scorer::score_worker_health(&w.id, w.cpu_pct, w.memory_pct, w.disk_pct))
            .collect();

        for (worker, health) in workers.iter().zip(&assessments) {
            if let Some(finding) = worker_finding(worker, health)? {
                result.add_finding(finding);
            }
        }

        let overall = scorer::score_overall_health(&assessments);
        let critical: Vec<&ComponentHealth> =
            assessments.iter().filter(|h| h.is_critical()).collect();

        if !critical.is_empty() {
            result.add_recommendation(scale_recommendation(&critical, &result)?);
        }

        result.metadata.insert("worker_count".to_string(), json!(workers.len()));
        result.metadata.insert(
            "unhealthy_workers".to_string(),
            json!(assessments.iter().filter(|h| !h.is_healthy()).count()),
        );
        result.metadata.insert("health_score".to_string(), json!(overall.score));
        result.metadata.insert(
            "health_status".to_string(),
            json!(overall.status.as_str()),
        );
        result.metadata.insert("version".to_string(), json!(version));

        result.sort_findings_by_severity();
        Ok(result)
    }
}

fn worker_finding(
    worker: &Worker,
    health: &ComponentHealth,
) -> anyhow::Result<Option<Finding>> {
    if health.is_healthy() {
        return Ok(None);
    }

    let severity = if health.is_critical() {
        Severity::High
    } else {
        Severity::Medium
    };

    let mut builder = Finding::builder(
        format!("health-worker-{}", worker.id),
        "health",
        severity,
        format!("Worker {} under resource pressure", worker.id),
        format!(
            "Worker {} scored {:.0}/100: {}",
            worker.id,
            health.score,
            health.issues.join("; ")
        ),
    )
    .affected_components([worker.id.clone()])
    .remediation_steps([
        "Review pipelines assigned to this worker".to_string(),
        format!("Consider vertical scaling for worker {}", worker.id),
    ])
    .confidence(Confidence::High)
    .metadata("cpu_pct", json!(worker.cpu_pct))
    .metadata("memory_pct", json!(worker.memory_pct))
    .metadata("disk_pct", json!(worker.disk_pct));

    if severity == Severity::High {
        builder = builder
            .estimated_impact("Risk of worker crash and data loss under sustained load");
    }

    Ok(Some(builder.build()?))
}

fn scale_recommendation(
    critical: &[&ComponentHealth],
    result: &AnalyzerResult,
) -> anyhow::Result<Recommendation> {
    let ids: Vec<String> = critical.iter().map(|h| h.name.clone()).collect();
    let related: Vec<String> = result.findings.iter().map(|f| f.id.clone()).collect();

    Ok(Recommendation::builder(
        "health-rec-scale",
        "scaling",
        Priority::P1,
        "Scale out the worker group",
        format!(
            "{} worker(s) are in a critical state ({}); the group is running hot",
            ids.len(),
            ids.join(", ")
        ),
        "Critically loaded workers drop throughput before they crash",
        Effort::Medium,
    )
    .implementation_steps([
        "Add at least one worker node to the group".to_string(),
        "Rebalance pipelines once the new worker joins".to_string(),
    ])
    .impact_estimate(ImpactEstimate {
        performance_improvement: Some("Restores processing headroom across the group".to_string()),
        ..ImpactEstimate::default()
    })
    .related_findings(related)
    .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::client::{ClientError, MetricsSample, Output, Pipeline, SystemInfo, TimeRange};
    use crate::model::ProductTag;

    struct WorkerClient {
        workers: Vec<Worker>,
        fail_workers: bool,
        calls: AtomicU32,
    }

    impl WorkerClient {
        fn with_workers(workers: Vec<Worker>) -> Self {
            Self {
                workers,
                fail_workers: false,
                calls: AtomicU32::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                workers: vec![],
                fail_workers: true,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ApiClient for WorkerClient {
        async fn get_workers(&self) -> Result<Vec<Worker>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_workers {
                return Err(ClientError::Transport("connection refused".to_string()));
            }
            Ok(self.workers.clone())
        }

        async fn get_outputs(&self) -> Result<Vec<Output>, ClientError> {
            Ok(vec![])
        }

        async fn get_pipelines(&self) -> Result<Vec<Pipeline>, ClientError> {
            Ok(vec![])
        }

        async fn get_system_info(&self) -> Result<SystemInfo, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::NotFound("system".to_string()))
        }

        async fn get_metrics(&self, _range: TimeRange) -> Result<Vec<MetricsSample>, ClientError> {
            Ok(vec![])
        }

        fn api_calls_used(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        fn api_calls_remaining(&self) -> u32 {
            100 - self.api_calls_used()
        }

        fn is_cloud(&self) -> bool {
            false
        }

        fn product_type(&self) -> ProductTag {
            ProductTag::Stream
        }
    }

    fn worker(id: &str, cpu: f64, mem: f64, disk: f64) -> Worker {
        Worker {
            id: id.to_string(),
            cpu_pct: cpu,
            memory_pct: mem,
            disk_pct: disk,
            group: None,
        }
    }

    #[tokio::test]
    async fn healthy_fleet_yields_no_findings() {
        let client = WorkerClient::with_workers(vec![worker("w1", 20.0, 30.0, 10.0)]);
        let result = HealthAnalyzer.analyze(&client).await.unwrap();

        assert!(result.success);
        assert!(result.findings.is_empty());
        assert_eq!(result.metadata["worker_count"], serde_json::json!(1));
        assert_eq!(result.metadata["health_score"], serde_json::json!(100.0));
        // system info failed but analysis degraded instead of failing
        assert_eq!(result.metadata["version"], serde_json::json!("unknown"));
    }

    #[tokio::test]
    async fn critical_worker_produces_high_finding_and_recommendation() {
        let client = WorkerClient::with_workers(vec![
            worker("w1", 95.0, 92.0, 91.0),
            worker("w2", 85.0, 10.0, 10.0),
        ]);
        let result = HealthAnalyzer.analyze(&client).await.unwrap();

        assert_eq!(result.findings.len(), 2);
        // sorted: the critical worker's high finding first
        assert_eq!(result.findings[0].severity, Severity::High);
        assert_eq!(result.findings[0].affected_components, vec!["w1".to_string()]);
        assert_eq!(result.findings[1].severity, Severity::Medium);

        assert_eq!(result.recommendations.len(), 1);
        let rec = &result.recommendations[0];
        assert_eq!(rec.priority, Priority::P1);
        assert!(rec.impact_estimate.has_impact_metrics());
        assert!(rec.related_findings.contains(&"health-worker-w1".to_string()));
    }

    #[tokio::test]
    async fn worker_fetch_failure_degrades_to_failed_result() {
        let client = WorkerClient::failing();
        let result = HealthAnalyzer.analyze(&client).await.unwrap();

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("connection refused"));
    }

    #[test]
    fn declares_its_contract() {
        assert_eq!(HealthAnalyzer.objective_name(), "health");
        assert_eq!(HealthAnalyzer.estimated_api_calls(), 2);
        assert!(HealthAnalyzer
            .required_permissions()
            .contains(&"read:workers".to_string()));
    }
}
