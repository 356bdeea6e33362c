use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use pulsecheck_core::analyzers::builtin_registry;
use pulsecheck_core::config::Config;
use pulsecheck_core::model::{AnalysisRun, RunStatus, Severity};
use pulsecheck_core::orchestrator::AnalysisProgress;
use pulsecheck_core::report::render_markdown;
use pulsecheck_core::scorer::HealthStatus;
use pulsecheck_core::snapshot::SnapshotClient;
use pulsecheck_core::{run_audit, AuditOptions};

#[derive(Parser, Debug)]
#[command(
    name = "pulsecheck",
    version,
    about = "Deployment health audit over a captured API snapshot"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the analyzer battery and write a report
    Audit {
        #[arg(long)]
        snapshot: PathBuf,

        /// Comma-separated objectives; defaults to every analyzer
        #[arg(long, value_delimiter = ',')]
        objectives: Option<Vec<String>>,

        #[arg(long)]
        deployment_id: Option<String>,

        #[arg(long, default_value = "pulsecheck-out")]
        out: PathBuf,

        #[arg(long)]
        max_api_calls: Option<u32>,

        /// Stop at the first analyzer failure
        #[arg(long)]
        fail_fast: bool,

        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List registered analyzers
    ListAnalyzers,
}

struct Style {
    bold: &'static str,
    dim: &'static str,
    red: &'static str,
    green: &'static str,
    yellow: &'static str,
    magenta: &'static str,
    reset: &'static str,
}

const COLOR: Style = Style {
    bold: "\x1b[1m",
    dim: "\x1b[2m",
    red: "\x1b[31m",
    green: "\x1b[32m",
    yellow: "\x1b[33m",
    magenta: "\x1b[35m",
    reset: "\x1b[0m",
};

const PLAIN: Style = Style {
    bold: "",
    dim: "",
    red: "",
    green: "",
    yellow: "",
    magenta: "",
    reset: "",
};

fn style() -> &'static Style {
    if std::env::var_os("NO_COLOR").is_some() {
        &PLAIN
    } else {
        &COLOR
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let res = match cli.cmd {
        Commands::Audit {
            snapshot,
            objectives,
            deployment_id,
            out,
            max_api_calls,
            fail_fast,
            config,
        } => {
            let cfg = load_config(config.as_deref());
            let objectives = objectives.or_else(|| {
                (!cfg.objectives.is_empty()).then(|| cfg.objectives.clone())
            });
            let max_api_calls = max_api_calls.or(cfg.max_api_calls).unwrap_or(100);
            let continue_on_error = !fail_fast && cfg.continue_on_error.unwrap_or(true);
            run_audit_cmd(
                &snapshot,
                objectives,
                deployment_id.or(cfg.deployment_id),
                &out,
                max_api_calls,
                continue_on_error,
            )
            .await
        }
        Commands::ListAnalyzers => list_analyzers(),
    };

    match res {
        Ok(code) => code,
        Err(e) => {
            let s = style();
            eprintln!(
                "{}{red}error:{reset} {:#}",
                s.bold,
                e,
                red = s.red,
                reset = s.reset
            );
            std::process::ExitCode::from(1)
        }
    }
}

fn print_banner() {
    let s = style();
    eprintln!(
        "\n  {bold}pulse{reset}{magenta}|{reset}{dim}check{reset}  {dim}deployment audit{reset}\n",
        bold = s.bold,
        magenta = s.magenta,
        dim = s.dim,
        reset = s.reset,
    );
}

fn severity_color(severity: &Severity) -> &'static str {
    let s = style();
    match severity {
        Severity::Critical => s.magenta,
        Severity::High => s.red,
        Severity::Medium => s.yellow,
        Severity::Low | Severity::Info => s.dim,
    }
}

fn status_color(status: RunStatus) -> &'static str {
    let s = style();
    match status {
        RunStatus::Completed => s.green,
        RunStatus::Partial => s.yellow,
        RunStatus::Failed => s.red,
        RunStatus::Running => s.dim,
    }
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(p) => Config::load(p).unwrap_or_else(|e| {
            eprintln!(
                "{}{}warning:{} failed to load config {}: {}",
                style().bold,
                style().yellow,
                style().reset,
                p.display(),
                e
            );
            Config::default()
        }),
        None => Config::discover().unwrap_or_default(),
    }
}

fn list_analyzers() -> anyhow::Result<std::process::ExitCode> {
    let s = style();
    let registry = builtin_registry();
    for analyzer in registry.analyzers() {
        println!(
            "{bold}{}{reset}  {dim}(~{} API calls){reset}\n    {}",
            analyzer.objective_name(),
            analyzer.estimated_api_calls(),
            analyzer.description(),
            bold = s.bold,
            dim = s.dim,
            reset = s.reset,
        );
    }
    Ok(std::process::ExitCode::from(0))
}

fn print_run(run: &AnalysisRun, out: &Path) {
    let s = style();

    if let Some(score) = &run.health_score {
        let status = HealthStatus::from_score(score.overall_score as f64);
        eprintln!(
            "  {dim}health{reset}          {}{bold}{}{reset} ({}/100)",
            status.color(),
            status.as_str().to_uppercase(),
            score.overall_score,
            dim = s.dim,
            bold = s.bold,
            reset = s.reset,
        );
    }
    eprintln!(
        "  {dim}status{reset}          {}{bold}{}{reset}",
        status_color(run.status),
        run.status.as_str(),
        dim = s.dim,
        bold = s.bold,
        reset = s.reset,
    );
    eprintln!(
        "  {dim}api_calls_used{reset}  {bold}{}{reset}",
        run.api_calls_used,
        dim = s.dim,
        bold = s.bold,
        reset = s.reset,
    );

    if !run.findings.is_empty() {
        eprintln!();
        for finding in &run.findings {
            eprintln!(
                "  {col}{}{reset}  {}",
                finding.severity,
                finding.id,
                col = severity_color(&finding.severity),
                reset = s.reset,
            );
        }
    }

    if !run.errors.is_empty() {
        eprintln!();
        for error in &run.errors {
            eprintln!(
                "  {red}!{reset} {}",
                error,
                red = s.red,
                reset = s.reset
            );
        }
    }

    eprintln!();
    eprintln!(
        "  {dim}\u{2192} {}{reset}",
        out.join("report.json").display(),
        dim = s.dim,
        reset = s.reset
    );
    eprintln!(
        "  {dim}\u{2192} {}{reset}",
        out.join("report.md").display(),
        dim = s.dim,
        reset = s.reset
    );
    eprintln!();
}

async fn run_audit_cmd(
    snapshot: &Path,
    objectives: Option<Vec<String>>,
    deployment_id: Option<String>,
    out: &Path,
    max_api_calls: u32,
    continue_on_error: bool,
) -> anyhow::Result<std::process::ExitCode> {
    print_banner();

    let client = SnapshotClient::load(snapshot, max_api_calls)?;
    let deployment_id = deployment_id.unwrap_or_else(|| client.deployment_id().to_string());

    let progress = |p: &AnalysisProgress| {
        let s = style();
        eprintln!(
            "  {dim}[{}/{}] objectives done, {} API calls used{reset}",
            p.completed_objectives,
            p.total_objectives,
            p.api_calls_used,
            dim = s.dim,
            reset = s.reset,
        );
    };

    let run = run_audit(
        Arc::new(client),
        &deployment_id,
        AuditOptions {
            objectives,
            max_api_calls,
            continue_on_error,
        },
        Some(&progress),
    )
    .await?;

    std::fs::create_dir_all(out).with_context(|| format!("create out dir {}", out.display()))?;

    let json_path = out.join("report.json");
    let json = serde_json::to_vec_pretty(&run).context("serialize report json")?;
    std::fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;

    let md_path = out.join("report.md");
    std::fs::write(&md_path, render_markdown(&run))
        .with_context(|| format!("write {}", md_path.display()))?;

    // Machine-parseable line on stdout
    println!(
        "status={} findings={} recommendations={} api_calls_used={}",
        run.status.as_str(),
        run.findings.len(),
        run.recommendations.len(),
        run.api_calls_used,
    );

    // Human-readable output on stderr
    print_run(&run, out);

    let exit = if run.status == RunStatus::Failed {
        std::process::ExitCode::from(2)
    } else {
        std::process::ExitCode::from(0)
    };
    Ok(exit)
}
