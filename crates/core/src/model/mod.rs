//! Validated value objects produced by analyzers and the orchestrator.
//!
//! Construction fails closed: an object violating a cross-field rule is
//! rejected with a [`crate::error::ValidationError`] instead of being
//! normalized.

mod analysis;
mod finding;
mod health;
mod recommendation;

pub use analysis::{AnalysisRun, NewAnalysisRun, RunStatus};
pub use finding::{Confidence, Finding, FindingBuilder, ProductTag, Severity};
pub use health::{ComponentScore, HealthScore, TrendDirection};
pub use recommendation::{
    Effort, ImpactEstimate, Priority, Recommendation, RecommendationBuilder,
};
