use crate::model::{Priority, Severity};

/// Raised when a model invariant is violated at construction time.
///
/// These are contract violations by the producing analyzer and are never
/// silently coerced into a normalized value.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("title must be at most 255 characters")]
    TitleTooLong,

    #[error("remediation steps required for {severity} severity findings")]
    MissingRemediation { severity: Severity },

    #[error("estimated impact required for {severity} severity findings")]
    MissingImpact { severity: Severity },

    #[error("documentation link must be a valid URL: {0}")]
    InvalidDocumentationLink(String),

    #[error("at least one implementation step is required")]
    NoImplementationSteps,

    #[error("impact estimate must have at least one metric for {priority} priority")]
    MissingImpactMetrics { priority: Priority },

    #[error("before_state and after_state required for optimization recommendations")]
    MissingOptimizationStates,

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("component weights must sum to 1.0 (got {0:.3})")]
    WeightSum(f64),

    #[error("trend_direction requires previous_score to be set")]
    TrendWithoutPrevious,

    #[error("completed_at must not be earlier than started_at")]
    CompletedBeforeStarted,

    #[error("at least one objective must be analyzed")]
    NoObjectives,

    #[error("API calls used ({0}) exceeds the budget of 100 per analysis")]
    ApiBudgetExceeded(u32),
}

/// Caller errors raised by the orchestrator before any analyzer runs.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("unknown objective '{objective}'; available: {available}")]
    UnknownObjective { objective: String, available: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Raised when building an analyzer registry from an invalid set.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("objective '{0}' is already registered")]
    DuplicateObjective(String),
}
