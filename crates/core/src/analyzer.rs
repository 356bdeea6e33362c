//! The analyzer plugin contract and the immutable registry that maps
//! objective names to implementations.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::RegistryError;
use crate::model::{Finding, ProductTag, Recommendation, Severity};

/// One analyzer's output for its objective.
///
/// A result with `success == false` carries the failure reason in
/// `error`; it still participates in aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerResult {
    pub objective: String,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<Recommendation>,
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub success: bool,
    pub error: Option<String>,
}

impl AnalyzerResult {
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            findings: Vec::new(),
            recommendations: Vec::new(),
            metadata: BTreeMap::new(),
            success: true,
            error: None,
        }
    }

    pub fn failed(objective: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            findings: Vec::new(),
            recommendations: Vec::new(),
            metadata: BTreeMap::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    pub fn add_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn add_recommendation(&mut self, recommendation: Recommendation) {
        self.recommendations.push(recommendation);
    }

    pub fn critical_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Critical)
    }

    pub fn high_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::High)
    }

    /// Critical first; ties keep insertion order.
    pub fn sort_findings_by_severity(&mut self) {
        self.findings.sort_by_key(|f| f.severity);
    }

    /// P0 first; ties keep insertion order.
    pub fn sort_recommendations_by_priority(&mut self) {
        self.recommendations.sort_by_key(|r| r.priority);
    }

    /// Finding and recommendation counts per product tag.
    pub fn product_summary(&self) -> BTreeMap<ProductTag, (usize, usize)> {
        let mut summary: BTreeMap<ProductTag, (usize, usize)> =
            ProductTag::all().into_iter().map(|p| (p, (0, 0))).collect();
        for finding in &self.findings {
            for tag in &finding.product_tags {
                if let Some(entry) = summary.get_mut(tag) {
                    entry.0 += 1;
                }
            }
        }
        for rec in &self.recommendations {
            for tag in &rec.product_tags {
                if let Some(entry) = summary.get_mut(tag) {
                    entry.1 += 1;
                }
            }
        }
        summary
    }
}

/// Capability set every pluggable analyzer implements.
///
/// `analyze` must not fail for expected conditions: data-fetch errors are
/// caught inside the analyzer and reported as a `success = false` result,
/// or degraded into partial output. An `Err` from `analyze` is a genuine
/// runtime failure and is isolated by the orchestrator.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Unique registry key, e.g. "health".
    fn objective_name(&self) -> &str;

    fn supported_products(&self) -> Vec<ProductTag> {
        ProductTag::all()
    }

    /// Declared budget cost, used for pre-flight planning.
    fn estimated_api_calls(&self) -> u32 {
        5
    }

    fn required_permissions(&self) -> Vec<String> {
        Vec::new()
    }

    fn description(&self) -> String {
        format!("Analyzer for the {} objective", self.objective_name())
    }

    /// Optional gate checked before `analyze`.
    async fn pre_analyze_check(&self, _client: &dyn ApiClient) -> bool {
        true
    }

    async fn analyze(&self, client: &dyn ApiClient) -> anyhow::Result<AnalyzerResult>;
}

/// Immutable lookup table mapping objective names to analyzers.
///
/// Built once at startup from a fixed list and injected into the
/// orchestrator; never mutated during a run.
pub struct AnalyzerRegistry {
    analyzers: Vec<Arc<dyn Analyzer>>,
    by_objective: HashMap<String, usize>,
}

impl std::fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerRegistry")
            .field("objectives", &self.objectives())
            .finish()
    }
}

impl AnalyzerRegistry {
    pub fn new(analyzers: Vec<Arc<dyn Analyzer>>) -> Result<Self, RegistryError> {
        let mut by_objective = HashMap::with_capacity(analyzers.len());
        for (idx, analyzer) in analyzers.iter().enumerate() {
            let objective = analyzer.objective_name().to_string();
            if by_objective.insert(objective.clone(), idx).is_some() {
                return Err(RegistryError::DuplicateObjective(objective));
            }
        }
        Ok(Self {
            analyzers,
            by_objective,
        })
    }

    pub fn get(&self, objective: &str) -> Option<&Arc<dyn Analyzer>> {
        self.by_objective.get(objective).map(|&idx| &self.analyzers[idx])
    }

    pub fn contains(&self, objective: &str) -> bool {
        self.by_objective.contains_key(objective)
    }

    /// Objective names in registration order.
    pub fn objectives(&self) -> Vec<String> {
        self.analyzers
            .iter()
            .map(|a| a.objective_name().to_string())
            .collect()
    }

    pub fn analyzers(&self) -> &[Arc<dyn Analyzer>] {
        &self.analyzers
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }
}
