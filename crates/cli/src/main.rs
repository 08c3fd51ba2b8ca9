use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};

use loadtrend_core::config::Config;
use loadtrend_core::report::{BuildOutcome, BuildReport};
use loadtrend_core::shift::shift_from;
use loadtrend_core::verdict::Verdict;
use loadtrend_core::{analyze_workspace, AnalyzeOptions};

#[derive(Parser, Debug)]
#[command(
    name = "loadtrend",
    version,
    about = "Load-test report archiver, trend graph linker and build verdict"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Analyze {
        #[arg(long)]
        workspace: PathBuf,

        /// RFC 3339 timestamp; defaults to $BUILD_START_TIME.
        #[arg(long)]
        build_start: Option<String>,

        /// Defaults to $JOB_NAME.
        #[arg(long)]
        project_name: Option<String>,

        /// Trend graph start, e.g. 2024-01-01T00:00:00.
        #[arg(long)]
        from: Option<NaiveDateTime>,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        build_config: Option<PathBuf>,

        #[arg(long, default_value = "loadtrend-out")]
        out: PathBuf,

        #[arg(long)]
        fail_on_verdict: bool,
    },
    Shift {
        #[arg(long)]
        url: String,

        #[arg(long, allow_hyphen_values = true)]
        days: String,
    },
}

struct Style {
    bold: &'static str,
    dim: &'static str,
    red: &'static str,
    green: &'static str,
    yellow: &'static str,
    reset: &'static str,
}

const COLOR: Style = Style {
    bold: "\x1b[1m",
    dim: "\x1b[2m",
    red: "\x1b[31m",
    green: "\x1b[32m",
    yellow: "\x1b[33m",
    reset: "\x1b[0m",
};

const PLAIN: Style = Style {
    bold: "",
    dim: "",
    red: "",
    green: "",
    yellow: "",
    reset: "",
};

fn style() -> &'static Style {
    if std::env::var_os("NO_COLOR").is_some() {
        &PLAIN
    } else {
        &COLOR
    }
}

fn main() -> std::process::ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let res = match cli.cmd {
        Commands::Analyze {
            workspace,
            build_start,
            project_name,
            from,
            config,
            build_config,
            out,
            fail_on_verdict,
        } => {
            let cfg = load_config(config.as_deref());
            resolve_build_start(build_start).and_then(|build_start| {
                let opts = AnalyzeOptions {
                    build_start,
                    project_name: resolve_project_name(project_name),
                    trend_from: from,
                    config: cfg,
                    build_config_path: build_config,
                };
                run_analyze(&workspace, opts, &out, fail_on_verdict)
            })
        }
        Commands::Shift { url, days } => {
            println!("{}", shift_from(&url, &days));
            Ok(std::process::ExitCode::from(0))
        }
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

fn verdict_color(verdict: Verdict) -> &'static str {
    let s = style();
    match verdict {
        Verdict::Clean => s.green,
        Verdict::Performance => s.yellow,
        Verdict::Ko | Verdict::KoAndPerformance => s.red,
    }
}

fn print_report(report: &BuildReport, out: &Path) {
    let s = style();

    for r in &report.reports {
        eprintln!(
            "  {dim}report      {reset}{bold}{}{reset} {dim}({}){reset}",
            r.name,
            r.simulation,
            dim = s.dim,
            bold = s.bold,
            reset = s.reset
        );
    }
    eprintln!(
        "  {dim}assertions  {reset}{bold}{}{reset} {dim}({} failed){reset}",
        report.assertion_count,
        report.failed_count,
        dim = s.dim,
        bold = s.bold,
        reset = s.reset
    );
    eprintln!(
        "  {dim}graphs      {reset}{bold}{}{reset}",
        report.trend_graphs.len(),
        dim = s.dim,
        bold = s.bold,
        reset = s.reset
    );

    if !report.diagnostics.is_empty() {
        eprintln!();
        for d in &report.diagnostics {
            eprintln!("  {yellow}warning{reset}  {}", d, yellow = s.yellow, reset = s.reset);
        }
    }

    eprintln!();
    for name in ["report.json", "report.md", "description.html"] {
        eprintln!(
            "  {dim}\u{2192} {}{reset}",
            out.join(name).display(),
            dim = s.dim,
            reset = s.reset
        );
    }
    eprintln!();
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

fn resolve_build_start(arg: Option<String>) -> anyhow::Result<DateTime<Utc>> {
    let raw = arg
        .or_else(|| std::env::var("BUILD_START_TIME").ok())
        .context("no build start time: pass --build-start or set BUILD_START_TIME")?;
    let parsed = DateTime::parse_from_rfc3339(raw.trim())
        .with_context(|| format!("invalid build start time {raw:?}"))?;
    Ok(parsed.with_timezone(&Utc))
}

fn resolve_project_name(arg: Option<String>) -> String {
    arg.or_else(|| std::env::var("JOB_NAME").ok())
        .unwrap_or_default()
}

fn run_analyze(
    workspace: &Path,
    opts: AnalyzeOptions,
    out: &Path,
    fail_on_verdict: bool,
) -> anyhow::Result<std::process::ExitCode> {
    let s = style();

    eprintln!(
        "\n  {bold}load{reset}{dim}trend{reset}  {dim}archiving load-test reports{reset}\n",
        bold = s.bold,
        dim = s.dim,
        reset = s.reset,
    );

    let report = match analyze_workspace(workspace, opts)? {
        BuildOutcome::Archived(report) => report,
        BuildOutcome::NothingArchived { reason } => {
            eprintln!(
                "  {dim}Nothing archived: {}{reset}\n",
                reason,
                dim = s.dim,
                reset = s.reset
            );
            println!("reports=0 assertions=0 failed=0 verdict=CLEAN");
            return Ok(std::process::ExitCode::from(0));
        }
    };

    std::fs::create_dir_all(out).with_context(|| format!("create out dir {}", out.display()))?;

    let json_path = out.join("report.json");
    let json = serde_json::to_vec_pretty(&report).context("serialize report json")?;
    std::fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;

    let md_path = out.join("report.md");
    std::fs::write(&md_path, report.to_markdown())
        .with_context(|| format!("write {}", md_path.display()))?;

    let html_path = out.join("description.html");
    std::fs::write(&html_path, &report.description)
        .with_context(|| format!("write {}", html_path.display()))?;

    // Machine-parseable line on stdout
    println!(
        "reports={} assertions={} failed={} verdict={}",
        report.reports.len(),
        report.assertion_count,
        report.failed_count,
        serde_json::to_value(report.verdict)?
            .as_str()
            .unwrap_or_default()
    );

    // Human-readable output on stderr
    print_report(&report, out);

    let vc = verdict_color(report.verdict);
    eprintln!(
        "  {vc}{bold}{}{reset}\n",
        report.verdict.label(),
        vc = vc,
        bold = s.bold,
        reset = s.reset
    );

    if fail_on_verdict && report.verdict != Verdict::Clean {
        Ok(std::process::ExitCode::from(2))
    } else {
        Ok(std::process::ExitCode::from(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn verdict_color_by_severity() {
        assert_eq!(verdict_color(Verdict::Clean), style().green);
        assert_eq!(verdict_color(Verdict::Performance), style().yellow);
        assert_eq!(verdict_color(Verdict::Ko), style().red);
        assert_eq!(verdict_color(Verdict::KoAndPerformance), style().red);
    }

    #[test]
    #[serial]
    fn style_respects_no_color() {
        std::env::set_var("NO_COLOR", "1");
        assert_eq!(style().bold, "");
        std::env::remove_var("NO_COLOR");
        assert_ne!(style().bold, "");
    }

    #[test]
    #[serial]
    fn build_start_prefers_cli_arg() {
        std::env::set_var("BUILD_START_TIME", "2020-01-01T00:00:00Z");
        let t = resolve_build_start(Some("2024-05-06T07:08:09+02:00".to_string())).unwrap();
        assert_eq!(t.to_rfc3339(), "2024-05-06T05:08:09+00:00");
        std::env::remove_var("BUILD_START_TIME");
    }

    #[test]
    #[serial]
    fn build_start_falls_back_to_env() {
        std::env::set_var("BUILD_START_TIME", "2020-01-01T00:00:00Z");
        let t = resolve_build_start(None).unwrap();
        assert_eq!(t.to_rfc3339(), "2020-01-01T00:00:00+00:00");
        std::env::remove_var("BUILD_START_TIME");
        assert!(resolve_build_start(None).is_err());
    }

    #[test]
    #[serial]
    fn project_name_falls_back_to_env() {
        std::env::set_var("JOB_NAME", "Perf-kappa-checkout");
        assert_eq!(resolve_project_name(None), "Perf-kappa-checkout");
        assert_eq!(resolve_project_name(Some("x".to_string())), "x");
        std::env::remove_var("JOB_NAME");
        assert_eq!(resolve_project_name(None), "");
    }
}
