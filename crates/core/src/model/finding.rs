use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    /// Severities that must ship remediation steps.
    pub fn requires_remediation(&self) -> bool {
        matches!(self, Severity::Critical | Severity::High | Severity::Medium)
    }

    /// Severities that must explain their impact.
    pub fn requires_impact(&self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProductTag {
    Stream,
    Edge,
    Lake,
    Search,
}

impl ProductTag {
    pub fn all() -> Vec<ProductTag> {
        vec![
            ProductTag::Stream,
            ProductTag::Edge,
            ProductTag::Lake,
            ProductTag::Search,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductTag::Stream => "stream",
            ProductTag::Edge => "edge",
            ProductTag::Lake => "lake",
            ProductTag::Search => "search",
        }
    }
}

impl fmt::Display for ProductTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete issue detected by an analyzer, immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub category: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub affected_components: Vec<String>,
    pub remediation_steps: Vec<String>,
    pub documentation_links: Vec<String>,
    pub estimated_impact: String,
    pub confidence_level: Confidence,
    pub product_tags: Vec<ProductTag>,
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub detected_at: DateTime<Utc>,
}

impl Finding {
    pub fn builder(
        id: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> FindingBuilder {
        FindingBuilder {
            finding: Finding {
                id: id.into(),
                category: category.into(),
                severity,
                title: title.into(),
                description: description.into(),
                affected_components: Vec::new(),
                remediation_steps: Vec::new(),
                documentation_links: Vec::new(),
                estimated_impact: String::new(),
                confidence_level: Confidence::Medium,
                product_tags: ProductTag::all(),
                metadata: BTreeMap::new(),
                detected_at: Utc::now(),
            },
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("id", &self.id),
            ("category", &self.category),
            ("title", &self.title),
            ("description", &self.description),
        ] {
            if value.is_empty() {
                return Err(ValidationError::EmptyField { field });
            }
        }
        if self.title.chars().count() > 255 {
            return Err(ValidationError::TitleTooLong);
        }
        if self.severity.requires_remediation() && self.remediation_steps.is_empty() {
            return Err(ValidationError::MissingRemediation {
                severity: self.severity,
            });
        }
        if self.severity.requires_impact() && self.estimated_impact.is_empty() {
            return Err(ValidationError::MissingImpact {
                severity: self.severity,
            });
        }
        for link in &self.documentation_links {
            if !link.starts_with("http://") && !link.starts_with("https://") {
                return Err(ValidationError::InvalidDocumentationLink(link.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct FindingBuilder {
    finding: Finding,
}

impl FindingBuilder {
    pub fn affected_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.finding.affected_components = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn remediation_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.finding.remediation_steps = steps.into_iter().map(Into::into).collect();
        self
    }

    pub fn documentation_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.finding.documentation_links = links.into_iter().map(Into::into).collect();
        self
    }

    pub fn estimated_impact(mut self, impact: impl Into<String>) -> Self {
        self.finding.estimated_impact = impact.into();
        self
    }

    pub fn confidence(mut self, confidence: Confidence) -> Self {
        self.finding.confidence_level = confidence;
        self
    }

    pub fn product_tags(mut self, tags: Vec<ProductTag>) -> Self {
        self.finding.product_tags = tags;
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.finding.metadata.insert(key.into(), value);
        self
    }

    pub fn detected_at(mut self, at: DateTime<Utc>) -> Self {
        self.finding.detected_at = at;
        self
    }

    pub fn build(self) -> Result<Finding, ValidationError> {
        self.finding.validate()?;
        Ok(self.finding)
    }
}
