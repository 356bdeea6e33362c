use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

/// Score for a single weighted component of the overall health score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentScore {
    pub name: String,
    pub score: u8,
    pub weight: f64,
    pub details: String,
}

impl ComponentScore {
    pub fn new(
        name: impl Into<String>,
        score: u8,
        weight: f64,
        details: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let details = details.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        if details.is_empty() {
            return Err(ValidationError::EmptyField { field: "details" });
        }
        if score > 100 {
            return Err(ValidationError::OutOfRange {
                field: "score",
                value: score as f64,
            });
        }
        if !(0.0..=1.0).contains(&weight) {
            return Err(ValidationError::OutOfRange {
                field: "weight",
                value: weight,
            });
        }
        Ok(Self {
            name,
            score,
            weight,
            details,
        })
    }
}

/// Weighted overall health score for one deployment at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScore {
    pub overall_score: u8,
    pub components: BTreeMap<String, ComponentScore>,
    pub timestamp: DateTime<Utc>,
    pub trend_direction: Option<TrendDirection>,
    pub previous_score: Option<u8>,
}

impl HealthScore {
    pub fn new(
        overall_score: u8,
        components: BTreeMap<String, ComponentScore>,
    ) -> Result<Self, ValidationError> {
        Self::build(overall_score, components, None, None)
    }

    pub fn with_trend(
        overall_score: u8,
        components: BTreeMap<String, ComponentScore>,
        trend_direction: TrendDirection,
        previous_score: Option<u8>,
    ) -> Result<Self, ValidationError> {
        Self::build(overall_score, components, Some(trend_direction), previous_score)
    }

    fn build(
        overall_score: u8,
        components: BTreeMap<String, ComponentScore>,
        trend_direction: Option<TrendDirection>,
        previous_score: Option<u8>,
    ) -> Result<Self, ValidationError> {
        if overall_score > 100 {
            return Err(ValidationError::OutOfRange {
                field: "overall_score",
                value: overall_score as f64,
            });
        }
        if let Some(previous) = previous_score {
            if previous > 100 {
                return Err(ValidationError::OutOfRange {
                    field: "previous_score",
                    value: previous as f64,
                });
            }
        }
        if !components.is_empty() {
            let total: f64 = components.values().map(|c| c.weight).sum();
            if !(0.99..=1.01).contains(&total) {
                return Err(ValidationError::WeightSum(total));
            }
        }
        if trend_direction.is_some() && previous_score.is_none() {
            return Err(ValidationError::TrendWithoutPrevious);
        }
        Ok(Self {
            overall_score,
            components,
            timestamp: Utc::now(),
            trend_direction,
            previous_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, score: u8, weight: f64) -> ComponentScore {
        ComponentScore::new(name, score, weight, format!("{name} assessment")).unwrap()
    }

    #[test]
    fn weights_must_sum_to_one() {
        let mut components = BTreeMap::new();
        components.insert("workers".to_string(), component("Workers", 85, 0.5));
        components.insert("security".to_string(), component("Security", 70, 0.6));

        let err = HealthScore::new(78, components).unwrap_err();
        assert!(matches!(err, ValidationError::WeightSum(total) if (total - 1.1).abs() < 1e-9));
    }

    #[test]
    fn weight_sum_tolerates_rounding() {
        let mut components = BTreeMap::new();
        components.insert("a".to_string(), component("A", 90, 0.333));
        components.insert("b".to_string(), component("B", 80, 0.333));
        components.insert("c".to_string(), component("C", 70, 0.333));

        assert!(HealthScore::new(80, components).is_ok());
    }

    #[test]
    fn empty_component_map_is_allowed() {
        assert!(HealthScore::new(100, BTreeMap::new()).is_ok());
    }

    #[test]
    fn trend_requires_previous_score() {
        let err =
            HealthScore::with_trend(80, BTreeMap::new(), TrendDirection::Improving, None)
                .unwrap_err();
        assert!(matches!(err, ValidationError::TrendWithoutPrevious));

        let score =
            HealthScore::with_trend(80, BTreeMap::new(), TrendDirection::Improving, Some(74))
                .unwrap();
        assert_eq!(score.previous_score, Some(74));
    }

    #[test]
    fn component_score_bounds_are_enforced() {
        assert!(ComponentScore::new("Workers", 101, 0.5, "d").is_err());
        assert!(ComponentScore::new("Workers", 50, 1.5, "d").is_err());
        assert!(ComponentScore::new("", 50, 0.5, "d").is_err());
    }

    #[test]
    fn overall_score_bound_is_enforced() {
        let err = HealthScore::new(101, BTreeMap::new()).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "overall_score", .. }));
    }
}
