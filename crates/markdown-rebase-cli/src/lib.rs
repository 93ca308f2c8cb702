use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use markdown_rebase_core::{
    discover_markdown_files, BaseUrlOptions, BatchSummary, ExitCode, FileReport, RebaseError,
    RebaseOptions, Rebaser,
};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    execute(cli)
}

fn init_tracing(verbose: bool) {
    // --verbose enables DEBUG, otherwise honour RUST_LOG
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

const RULE_WIDTH: usize = 60;

fn execute(cli: Cli) -> Result<i32> {
    if cli.dry_run && cli.overwrite {
        eprintln!("warning: --overwrite has no effect with --dry-run");
    }

    let base_url = match base_url_options(&cli).resolve() {
        Ok(url) => url,
        Err(err) => return Ok(report_fatal(&err)),
    };

    let discovery = match discover_markdown_files(&cli.path) {
        Ok(discovery) => discovery,
        Err(err) => return Ok(report_fatal(&err)),
    };

    if discovery.files.is_empty() {
        emit(&format!("No Markdown files found in {}", cli.path.display()))?;
        return Ok(ExitCode::Success as i32);
    }

    let options = RebaseOptions {
        dry_run: cli.dry_run,
        overwrite: cli.overwrite,
        diff: cli.diff,
    };
    tracing::debug!(base = %base_url, root = %discovery.root.display(), files = discovery.files.len(), "Starting run");

    let rebaser = Rebaser::new(&base_url, discovery.root, options);
    let narrate = !cli.json && !cli.quiet;
    if narrate {
        print_header(&rebaser)?;
    }

    let mut write_error = None;
    let summary = rebaser.process_all(&discovery.files, |report| {
        if write_error.is_none() {
            if let Err(err) = print_report(&cli, report) {
                write_error = Some(err);
            }
        }
    });
    if let Some(err) = write_error {
        return Err(err);
    }

    if cli.json {
        let payload = summary_json(&summary);
        emit(&serde_json::to_string_pretty(&payload)?)?;
    } else {
        if narrate {
            emit(&"-".repeat(RULE_WIDTH))?;
        }
        emit(&summary.to_string())?;
    }

    // Per-file failures are counted in the summary, not surfaced as a failing status.
    Ok(ExitCode::Success as i32)
}

fn base_url_options(cli: &Cli) -> BaseUrlOptions {
    let mut options = BaseUrlOptions::default().with_env();
    options.base_url = cli.base_url.clone();
    options.repo = cli.repo.clone();
    options.release = cli.release.clone();
    options
}

fn report_fatal(err: &RebaseError) -> i32 {
    eprintln!("error: {err}");
    err.exit_code() as i32
}

fn print_header(rebaser: &Rebaser) -> Result<()> {
    let options = rebaser.options();
    let prefix = if options.dry_run { "DRY RUN - " } else { "" };
    let mode = if options.overwrite && !options.dry_run {
        "Overwrite"
    } else {
        "Create new files"
    };

    emit(&format!("Processing files with base URL: {}", rebaser.base_url()))?;
    emit(&format!("{prefix}Root directory: {}", rebaser.root().display()))?;
    emit(&format!("Mode: {mode}"))?;
    emit(&"-".repeat(RULE_WIDTH))
}

fn print_report(cli: &Cli, report: &FileReport) -> Result<()> {
    if cli.json {
        return Ok(());
    }

    if cli.quiet {
        if report.is_failure() {
            eprintln!("{report}");
        }
        return Ok(());
    }

    emit(&report.to_string())?;
    if let FileReport::Rewritten {
        diff: Some(diff), ..
    } = report
    {
        emit(diff)?;
    }
    Ok(())
}

fn summary_json(summary: &BatchSummary) -> Value {
    json!({
        "dry_run": summary.dry_run,
        "processed": summary.processed(),
        "changed": summary.changed(),
        "unchanged": summary.unchanged(),
        "errors": summary.errors(),
        "files": summary.reports.iter().map(report_json).collect::<Vec<_>>(),
    })
}

fn report_json(report: &FileReport) -> Value {
    let path = report.path().display().to_string();
    match report {
        FileReport::Rewritten {
            output,
            rewrites,
            written,
            diff,
            ..
        } => json!({
            "path": path,
            "status": "rewritten",
            "output": output.display().to_string(),
            "rewrites": rewrites,
            "written": written,
            "diff": diff,
        }),
        FileReport::Unchanged { .. } => json!({
            "path": path,
            "status": "unchanged",
        }),
        FileReport::Failed { error, .. } => json!({
            "path": path,
            "status": "failed",
            "error": error.to_string(),
        }),
    }
}

fn emit(content: &str) -> Result<()> {
    let mut handle = io::stdout().lock();
    write!(handle, "{content}").context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        writeln!(handle).context("Failed to write to stdout")?;
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(
    name = "markdown-rebase",
    author,
    version,
    about = "Rewrite relative Markdown links into absolute URLs",
    long_about = None
)]
struct Cli {
    /// Markdown file or directory to process
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Base URL the target directory is published under (falls back to $BASE_URL)
    #[arg(long = "base-url", value_name = "URL", conflicts_with = "repo")]
    base_url: Option<String>,

    /// GitHub repository used to build a blob URL
    #[arg(long = "repo", value_name = "OWNER/NAME", requires = "release")]
    repo: Option<String>,

    /// Tag or branch name used with --repo
    #[arg(long = "release", value_name = "REF")]
    release: Option<String>,

    /// Report intended changes without writing files
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Write results back to the original files instead of *_converted siblings
    #[arg(long = "overwrite")]
    overwrite: bool,

    /// Print a unified diff for every rewritten file
    #[arg(long = "diff")]
    diff: bool,

    /// Emit a machine-readable JSON summary
    #[arg(long = "json", conflicts_with = "quiet")]
    json: bool,

    /// Suppress per-file lines (errors still printed)
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}
