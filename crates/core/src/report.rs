//! Markdown rendering of a completed analysis run. JSON output is plain
//! serde serialization of [`AnalysisRun`].

use crate::model::AnalysisRun;

pub fn render_markdown(run: &AnalysisRun) -> String {
    let mut s = String::new();
    s.push_str("# pulsecheck report\n\n");
    s.push_str(&format!("- run_id: `{}`\n", run.id));
    s.push_str(&format!("- deployment_id: `{}`\n", run.deployment_id));
    s.push_str(&format!("- status: `{}`\n", run.status.as_str()));
    s.push_str(&format!("- objectives: `{}`\n", run.objectives_analyzed.join(", ")));
    s.push_str(&format!("- api_calls_used: `{}`\n", run.api_calls_used));
    s.push_str(&format!("- duration_seconds: `{:.1}`\n", run.duration_seconds));
    s.push('\n');

    if let Some(score) = &run.health_score {
        s.push_str("## Health score\n\n");
        s.push_str(&format!("- overall: `{}/100`\n", score.overall_score));
        for (key, component) in &score.components {
            s.push_str(&format!(
                "- {key}: `{}/100` (weight `{:.2}`) — {}\n",
                component.score, component.weight, component.details
            ));
        }
        s.push('\n');
    }

    s.push_str("## Findings\n\n");
    if run.findings.is_empty() {
        s.push_str("- (none)\n");
    } else {
        for finding in &run.findings {
            s.push_str(&format!("### {}\n", finding.id));
            s.push_str(&format!("- severity: `{}`\n", finding.severity));
            s.push_str(&format!("- title: {}\n", finding.title));
            s.push_str(&format!("- description: {}\n", finding.description));
            if !finding.affected_components.is_empty() {
                s.push_str(&format!(
                    "- affected: {}\n",
                    finding.affected_components.join(", ")
                ));
            }
            if !finding.remediation_steps.is_empty() {
                s.push_str("- remediation:\n");
                for step in &finding.remediation_steps {
                    s.push_str(&format!("  - {step}\n"));
                }
            }
            if !finding.estimated_impact.is_empty() {
                s.push_str(&format!("- impact: {}\n", finding.estimated_impact));
            }
            s.push('\n');
        }
    }
    s.push('\n');

    s.push_str("## Recommendations\n\n");
    if run.recommendations.is_empty() {
        s.push_str("- (none)\n");
    } else {
        for rec in &run.recommendations {
            s.push_str(&format!("### {} ({})\n", rec.id, rec.priority));
            s.push_str(&format!("- title: {}\n", rec.title));
            s.push_str(&format!("- rationale: {}\n", rec.rationale));
            s.push_str("- steps:\n");
            for step in &rec.implementation_steps {
                s.push_str(&format!("  - {step}\n"));
            }
            s.push('\n');
        }
    }
    s.push('\n');

    if !run.errors.is_empty() {
        s.push_str("## Errors\n\n");
        for error in &run.errors {
            s.push_str(&format!("- {error}\n"));
        }
        s.push('\n');
    }

    s
}
