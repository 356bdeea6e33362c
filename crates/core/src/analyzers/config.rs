use async_trait::async_trait;
use serde_json::json;

use crate::analyzer::{Analyzer, AnalyzerResult};
use crate::client::ApiClient;
use crate::model::{Confidence, Effort, Finding, Priority, Recommendation, Severity};

/// Configuration hygiene: failing outputs and pipelines no route sends
/// data to.
pub struct ConfigAnalyzer;

#[async_trait]
impl Analyzer for ConfigAnalyzer {
    fn objective_name(&self) -> &str {
        "config"
    }

    fn estimated_api_calls(&self) -> u32 {
        2
    }

    fn required_permissions(&self) -> Vec<String> {
        vec!["read:outputs".to_string(), "read:pipelines".to_string()]
    }

    fn description(&self) -> String {
        "Configuration validation: output destinations and pipeline routing".to_string()
    }

    async fn analyze(&self, client: &dyn ApiClient) -> anyhow::Result<AnalyzerResult> {
        let mut result = AnalyzerResult::new(self.objective_name());

        let outputs = match client.get_outputs().await {
            Ok(outputs) => outputs,
            Err(error) => {
                return Ok(AnalyzerResult::failed(
                    self.objective_name(),
                    format!("failed to fetch outputs: {error}"),
                ));
            }
        };

        let pipelines = match client.get_pipelines().await {
            Ok(pipelines) => pipelines,
            Err(error) => {
                return Ok(AnalyzerResult::failed(
                    self.objective_name(),
                    format!("failed to fetch pipelines: {error}"),
                ));
            }
        };

        let failing: Vec<_> = outputs.iter().filter(|o| o.status == "error").collect();
        for output in &failing {
            result.add_finding(
                Finding::builder(
                    format!("config-output-{}", output.id),
                    "config",
                    Severity::High,
                    format!("Output {} is failing", output.id),
                    format!("Destination {} ({}) reports an error state", output.id, output.kind),
                )
                .affected_components([output.id.clone()])
                .remediation_steps([
                    format!("Inspect the connection settings for output {}", output.id),
                    "Verify destination credentials and reachability".to_string(),
                ])
                .estimated_impact("Events routed to this destination are not being delivered")
                .confidence(Confidence::High)
                .build()?,
            );
        }

        let unrouted: Vec<_> = pipelines.iter().filter(|p| !p.routed).collect();
        for pipeline in &unrouted {
            result.add_finding(
                Finding::builder(
                    format!("config-pipeline-{}", pipeline.id),
                    "config",
                    Severity::Low,
                    format!("Pipeline {} has no route", pipeline.id),
                    format!(
                        "Pipeline {} ({} functions) is not referenced by any route",
                        pipeline.id, pipeline.functions
                    ),
                )
                .affected_components([pipeline.id.clone()])
                .confidence(Confidence::Medium)
                .build()?,
            );
        }

        if !unrouted.is_empty() {
            result.add_recommendation(
                Recommendation::builder(
                    "config-rec-cleanup",
                    "hygiene",
                    Priority::P3,
                    "Remove or route orphaned pipelines",
                    format!("{} pipeline(s) receive no data", unrouted.len()),
                    "Unrouted pipelines accumulate drift and confuse operators",
                    Effort::Low,
                )
                .implementation_steps(["Delete unused pipelines or attach them to a route"])
                .related_findings(unrouted.iter().map(|p| format!("config-pipeline-{}", p.id)))
                .build()?,
            );
        }

        let score = (100.0 - 10.0 * failing.len() as f64 - 2.0 * unrouted.len() as f64)
            .clamp(0.0, 100.0);
        result.metadata.insert("output_count".to_string(), json!(outputs.len()));
        result.metadata.insert("pipeline_count".to_string(), json!(pipelines.len()));
        result.metadata.insert("failing_outputs".to_string(), json!(failing.len()));
        result.metadata.insert("unrouted_pipelines".to_string(), json!(unrouted.len()));
        result.metadata.insert("health_score".to_string(), json!(score));

        result.sort_findings_by_severity();
        Ok(result)
    }
}
