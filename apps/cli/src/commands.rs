//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use quotebook_core::pipeline::{CompileOptions, ProgressReporter};
use quotebook_core::reference::ReferenceSets;
use quotebook_core::repo;
use quotebook_core::validate::ValidationReport;
use quotebook_shared::{AppConfig, init_config, load_config_for};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Quotebook — compile and validate the quotes dataset.
#[derive(Parser)]
#[command(
    name = "quotebook",
    version,
    about = "Compile per-episode quote fragments into one dataset and validate it.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Dataset root (defaults to the enclosing git repository).
    #[arg(long, env = "QUOTEBOOK_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Config file (defaults to <root>/quotebook.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Report output format for `validate`.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum ReportFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Concatenate all fragments and write the combined dataset.
    Build {
        /// Validate first and refuse to write an invalid dataset.
        #[arg(long)]
        check: bool,
    },

    /// Rebuild the dataset from fragments and run every reference check.
    Validate {
        /// Report format: text or json.
        #[arg(long, default_value = "text")]
        format: ReportFormat,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default quotebook.toml at the dataset root.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "quotebook=info",
        1 => "quotebook=debug",
        _ => "quotebook=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let root = repo::resolve_root(cli.root.as_deref())?;
    let show_progress = matches!(cli.log_format, LogFormat::Text);

    match cli.command {
        Command::Build { check } => cmd_build(&root, cli.config.as_deref(), check, show_progress),
        Command::Validate { format } => {
            cmd_validate(&root, cli.config.as_deref(), &format, show_progress)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&root),
            ConfigAction::Show => cmd_config_show(&root, cli.config.as_deref()),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(root: &Path, config: Option<&Path>, check: bool, show_progress: bool) -> Result<()> {
    let config = load_config_for(root, config)?;
    let options = CompileOptions {
        root: root.to_path_buf(),
        dataset: config.dataset,
        check,
    };

    info!(root = %root.display(), check, "compiling dataset");

    let reporter = CliProgress::new(show_progress);
    let result = quotebook_core::pipeline::compile(&options, &reporter);
    reporter.finish();
    let result = result?;

    println!();
    println!("  Dataset compiled!");
    println!("  Fragments: {}", result.fragment_count);
    println!("  Rows:      {}", result.row_count);
    println!("  Output:    {}", result.output_path.display());
    if result.report.is_some() {
        println!("  Checks:    all passed");
    }
    println!("  Time:      {:.2}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_validate(
    root: &Path,
    config: Option<&Path>,
    format: &ReportFormat,
    show_progress: bool,
) -> Result<()> {
    let config = load_config_for(root, config)?;
    let refs = ReferenceSets::maintained();

    info!(root = %root.display(), checks = refs.rules.len() + 1, "validating dataset");

    let reporter = CliProgress::new(show_progress);
    let result = quotebook_core::pipeline::check(root, &config.dataset, &refs, &reporter);
    reporter.finish();
    let result = result?;

    match format {
        ReportFormat::Text => print_report(&result.report, result.fragment_count),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&result.report)?),
    }

    let failed = result.report.failures().count();
    if failed > 0 {
        return Err(eyre!(
            "{failed} of {} checks failed",
            result.report.outcomes.len()
        ));
    }

    Ok(())
}

fn print_report(report: &ValidationReport, fragment_count: usize) {
    println!();
    println!(
        "  Dataset: {} rows from {fragment_count} fragments",
        report.rows
    );
    println!();
    for outcome in &report.outcomes {
        let status = if outcome.passed() { "PASS" } else { "FAIL" };
        println!("  {status}  {}", outcome.name);
        for finding in &outcome.findings {
            println!("        {finding}");
        }
    }
    println!();
}

fn cmd_config_init(root: &Path) -> Result<()> {
    let path = init_config(root)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path, config: Option<&Path>) -> Result<()> {
    let config: AppConfig = load_config_for(root, config)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif bar over fragment files.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new(visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn fragment_loaded(&self, path: &Path, current: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(name);
    }
}
