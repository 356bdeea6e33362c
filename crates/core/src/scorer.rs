//! Pure health-scoring functions shared by all analyzers.
//!
//! Thresholds and deductions are fixed so every analyzer scores the same
//! way; nothing here touches the network or any shared state.

use std::fmt;

use serde::{Deserialize, Serialize};

const HEALTHY_THRESHOLD: f64 = 90.0;
const DEGRADED_THRESHOLD: f64 = 70.0;
const UNHEALTHY_THRESHOLD: f64 = 50.0;

const RESOURCE_WARNING_PCT: f64 = 80.0;
const RESOURCE_CRITICAL_PCT: f64 = 90.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    Critical,
    Unknown,
}

impl HealthStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= HEALTHY_THRESHOLD {
            HealthStatus::Healthy
        } else if score >= DEGRADED_THRESHOLD {
            HealthStatus::Degraded
        } else if score >= UNHEALTHY_THRESHOLD {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Critical => "critical",
            HealthStatus::Unknown => "unknown",
        }
    }

    /// ANSI color for terminal display.
    pub fn color(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "\x1b[92m",
            HealthStatus::Degraded => "\x1b[93m",
            HealthStatus::Unhealthy => "\x1b[91m",
            HealthStatus::Critical => "\x1b[95m",
            HealthStatus::Unknown => "\x1b[90m",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health assessment for one named entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub score: f64,
    pub status: HealthStatus,
    pub issues: Vec<String>,
}

impl ComponentHealth {
    pub fn is_healthy(&self) -> bool {
        self.score >= HEALTHY_THRESHOLD
    }

    pub fn is_critical(&self) -> bool {
        self.score < UNHEALTHY_THRESHOLD
    }
}

/// Score a worker node from its resource utilization percentages.
///
/// Starts at 100 and deducts per resource: 15 points above the warning
/// threshold (80%), 40 points (CPU, memory) or 30 points (disk) above the
/// critical threshold (90%). The final score is clamped to [0, 100].
pub fn score_worker_health(
    worker_id: &str,
    cpu_pct: f64,
    memory_pct: f64,
    disk_pct: f64,
) -> ComponentHealth {
    let mut score: f64 = 100.0;
    let mut issues = Vec::new();

    if cpu_pct >= RESOURCE_CRITICAL_PCT {
        score -= 40.0;
        issues.push(format!("CPU critical: {cpu_pct:.1}%"));
    } else if cpu_pct >= RESOURCE_WARNING_PCT {
        score -= 15.0;
        issues.push(format!("CPU high: {cpu_pct:.1}%"));
    }

    if memory_pct >= RESOURCE_CRITICAL_PCT {
        score -= 40.0;
        issues.push(format!("Memory critical: {memory_pct:.1}%"));
    } else if memory_pct >= RESOURCE_WARNING_PCT {
        score -= 15.0;
        issues.push(format!("Memory high: {memory_pct:.1}%"));
    }

    if disk_pct >= RESOURCE_CRITICAL_PCT {
        score -= 30.0;
        issues.push(format!("Disk critical: {disk_pct:.1}%"));
    } else if disk_pct >= RESOURCE_WARNING_PCT {
        score -= 15.0;
        issues.push(format!("Disk high: {disk_pct:.1}%"));
    }

    let score = score.clamp(0.0, 100.0);

    ComponentHealth {
        name: worker_id.to_string(),
        score,
        status: HealthStatus::from_score(score),
        issues,
    }
}

/// Aggregate component assessments into one overall assessment.
///
/// The overall score is the arithmetic mean of the component scores minus
/// a penalty of `critical_fraction * 20`, where a component is critical
/// when its own score is below 50.
pub fn score_overall_health(components: &[ComponentHealth]) -> ComponentHealth {
    if components.is_empty() {
        return ComponentHealth {
            name: "overall".to_string(),
            score: 0.0,
            status: HealthStatus::Unknown,
            issues: vec!["No components to assess".to_string()],
        };
    }

    let total: f64 = components.iter().map(|c| c.score).sum();
    let avg = total / components.len() as f64;

    let critical_count = components.iter().filter(|c| c.is_critical()).count();
    let critical_penalty = (critical_count as f64 / components.len() as f64) * 20.0;
    let score = (avg - critical_penalty).max(0.0);

    let issues: Vec<String> = components
        .iter()
        .flat_map(|c| c.issues.iter().map(move |issue| format!("{}: {issue}", c.name)))
        .collect();

    ComponentHealth {
        name: "overall".to_string(),
        score,
        status: HealthStatus::from_score(score),
        issues,
    }
}

/// Score a whole deployment from worker counts and finding counts.
///
/// Base score is the healthy-worker ratio scaled to 100, minus 15 points
/// per critical finding and 5 per high finding, clamped once after all
/// deductions and before the status is derived.
pub fn score_deployment_health(
    healthy_workers: u32,
    total_workers: u32,
    critical_findings: u32,
    high_findings: u32,
) -> ComponentHealth {
    if total_workers == 0 {
        return ComponentHealth {
            name: "deployment".to_string(),
            score: 0.0,
            status: HealthStatus::Unknown,
            issues: vec!["No workers detected".to_string()],
        };
    }

    let base = healthy_workers as f64 / total_workers as f64 * 100.0;
    let score = (base - 15.0 * critical_findings as f64 - 5.0 * high_findings as f64)
        .clamp(0.0, 100.0);

    let mut issues = Vec::new();
    let unhealthy = total_workers - healthy_workers;
    if unhealthy > 0 {
        issues.push(format!("{unhealthy}/{total_workers} workers unhealthy"));
    }
    if critical_findings > 0 {
        issues.push(format!("{critical_findings} critical findings"));
    }
    if high_findings > 0 {
        issues.push(format!("{high_findings} high severity findings"));
    }

    ComponentHealth {
        name: "deployment".to_string(),
        score,
        status: HealthStatus::from_score(score),
        issues,
    }
}

/// One-line colored summary, e.g. `HEALTHY (95/100)`.
pub fn format_health_summary(health: &ComponentHealth) -> String {
    format!(
        "{}{}\x1b[0m ({:.0}/100)",
        health.status.color(),
        health.status.as_str().to_uppercase(),
        health.score,
    )
}
