use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tripwire_core::Program;

#[derive(Parser)]
#[command(name = "tripwire")]
#[command(about = "tripwire - structural invariant checks for smart contract IR")]
#[command(version = "0.1.0")]
#[command(author = "Gianluca Brigandi <gbrigand@gmail.com>")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log matcher decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List fuzz property tests found by naming convention.
    Scan {
        model: PathBuf,

        #[arg(long, default_value = "echidna_")]
        prefix: String,
    },

    /// Check invariant rules; exits non-zero if any rule fails.
    Verify {
        model: PathBuf,

        /// Rule file, or directory of `*.json` rule files.
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Also run the built-in rules (the default when --rules is absent).
        #[arg(long)]
        builtin: bool,

        #[arg(long, value_enum, default_value = "text")]
        format: Format,

        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the built-in rules as JSON.
    Rules,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for tripwire_emit::OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => tripwire_emit::OutputFormat::Text,
            Format::Json => tripwire_emit::OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Scan { model, prefix } => cmd_scan(&model, prefix, cli.no_color),
        Commands::Verify {
            model,
            rules,
            builtin,
            format,
            quiet,
        } => cmd_verify(
            &model,
            rules.as_deref(),
            builtin,
            format,
            report_config(cli.verbose, quiet, cli.no_color),
        ),
        Commands::Rules => cmd_rules(),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn report_config(verbose: bool, quiet: bool, no_color: bool) -> tripwire_emit::ReportConfig {
    use tripwire_emit::{ReportConfig, VerbosityLevel};

    let verbosity = match (verbose, quiet) {
        (true, _) => VerbosityLevel::Verbose,
        (false, true) => VerbosityLevel::Quiet,
        (false, false) => VerbosityLevel::Normal,
    };
    ReportConfig {
        use_colors: !no_color,
        verbosity,
        ..ReportConfig::default()
    }
}

fn load_model(path: &Path) -> Result<Program> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read model {}", path.display()))?;
    Program::from_json(&json).with_context(|| format!("Invalid model {}", path.display()))
}

fn cmd_scan(model: &Path, prefix: String, no_color: bool) -> Result<()> {
    use tripwire_emit::{ReportConfig, ScanReportEmitter};
    use tripwire_verify::{EntryPointScanner, ScanConfig};

    let program = load_model(model)?;
    let found = EntryPointScanner::new(ScanConfig { prefix }).scan(&program);

    let config = ReportConfig {
        use_colors: !no_color,
        ..ReportConfig::default()
    };
    print!(
        "{}",
        ScanReportEmitter::new(&found)
            .with_config(config)
            .emit_to_string()
    );
    Ok(())
}

fn cmd_verify(
    model: &Path,
    rules: Option<&Path>,
    builtin: bool,
    format: Format,
    config: tripwire_emit::ReportConfig,
) -> Result<()> {
    use tripwire_emit::VerificationEmitter;
    use tripwire_verify::{RuleSet, Verifier};

    let program = load_model(model)?;

    let mut rule_set = match rules {
        Some(path) => RuleSet::load(path)?,
        None => RuleSet::default(),
    };
    if builtin || rules.is_none() {
        rule_set.extend(RuleSet::new(tripwire_verify::builtin::all()));
    }
    if rule_set.is_empty() {
        anyhow::bail!("No rules to check");
    }
    debug!(rules = rule_set.len(), model = %model.display(), "verifying");

    let outcomes = Verifier::new().verify_all(&program, &rule_set.rules);
    let report = VerificationEmitter::new(&outcomes)
        .with_config(config)
        .emit(format.into())?;
    print!("{}", report);

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    if failed > 0 {
        anyhow::bail!(
            "{} of {} invariant rule(s) failed",
            failed,
            outcomes.len()
        );
    }
    Ok(())
}

fn cmd_rules() -> Result<()> {
    let rules = tripwire_verify::builtin::all();
    println!("{}", serde_json::to_string_pretty(&rules)?);
    Ok(())
}
