use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::ProductTag;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P0 => "p0",
            Priority::P1 => "p1",
            Priority::P2 => "p2",
            Priority::P3 => "p3",
        }
    }

    /// Priorities that must be backed by a quantified impact estimate.
    pub fn requires_impact_metrics(&self) -> bool {
        matches!(self, Priority::P0 | Priority::P1)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

/// Estimated impact of implementing a recommendation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactEstimate {
    pub cost_savings_annual: Option<f64>,
    pub performance_improvement: Option<String>,
    pub storage_reduction_gb: Option<f64>,
    pub time_to_implement: Option<String>,
}

impl ImpactEstimate {
    /// True iff at least one quantifiable metric is present.
    pub fn has_impact_metrics(&self) -> bool {
        self.cost_savings_annual.is_some()
            || self.performance_improvement.is_some()
            || self.storage_reduction_gb.is_some()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(v) = self.cost_savings_annual {
            if v < 0.0 {
                return Err(ValidationError::OutOfRange {
                    field: "cost_savings_annual",
                    value: v,
                });
            }
        }
        if let Some(v) = self.storage_reduction_gb {
            if v < 0.0 {
                return Err(ValidationError::OutOfRange {
                    field: "storage_reduction_gb",
                    value: v,
                });
            }
        }
        Ok(())
    }
}

/// An actionable improvement suggestion, optionally linked to findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub kind: String,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub rationale: String,
    pub implementation_steps: Vec<String>,
    pub before_state: String,
    pub after_state: String,
    pub impact_estimate: ImpactEstimate,
    pub implementation_effort: Effort,
    /// Finding ids this addresses. Weak references, no ownership.
    pub related_findings: Vec<String>,
    pub product_tags: Vec<ProductTag>,
    pub documentation_links: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    #[allow(clippy::too_many_arguments)]
    pub fn builder(
        id: impl Into<String>,
        kind: impl Into<String>,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
        rationale: impl Into<String>,
        effort: Effort,
    ) -> RecommendationBuilder {
        RecommendationBuilder {
            rec: Recommendation {
                id: id.into(),
                kind: kind.into(),
                priority,
                title: title.into(),
                description: description.into(),
                rationale: rationale.into(),
                implementation_steps: Vec::new(),
                before_state: String::new(),
                after_state: String::new(),
                impact_estimate: ImpactEstimate::default(),
                implementation_effort: effort,
                related_findings: Vec::new(),
                product_tags: ProductTag::all(),
                documentation_links: Vec::new(),
                created_at: Utc::now(),
            },
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("id", &self.id),
            ("kind", &self.kind),
            ("title", &self.title),
            ("description", &self.description),
            ("rationale", &self.rationale),
        ] {
            if value.is_empty() {
                return Err(ValidationError::EmptyField { field });
            }
        }
        if self.title.chars().count() > 255 {
            return Err(ValidationError::TitleTooLong);
        }
        if self.implementation_steps.is_empty() {
            return Err(ValidationError::NoImplementationSteps);
        }
        self.impact_estimate.validate()?;
        if self.priority.requires_impact_metrics() && !self.impact_estimate.has_impact_metrics() {
            return Err(ValidationError::MissingImpactMetrics {
                priority: self.priority,
            });
        }
        if self.kind == "optimization" && (self.before_state.is_empty() || self.after_state.is_empty())
        {
            return Err(ValidationError::MissingOptimizationStates);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct RecommendationBuilder {
    rec: Recommendation,
}

impl RecommendationBuilder {
    pub fn implementation_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rec.implementation_steps = steps.into_iter().map(Into::into).collect();
        self
    }

    pub fn states(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.rec.before_state = before.into();
        self.rec.after_state = after.into();
        self
    }

    pub fn impact_estimate(mut self, estimate: ImpactEstimate) -> Self {
        self.rec.impact_estimate = estimate;
        self
    }

    pub fn related_findings<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rec.related_findings = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn product_tags(mut self, tags: Vec<ProductTag>) -> Self {
        self.rec.product_tags = tags;
        self
    }

    pub fn documentation_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rec.documentation_links = links.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<Recommendation, ValidationError> {
        self.rec.validate()?;
        Ok(self.rec)
    }
}
