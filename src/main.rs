mod checker;
mod config;
mod discovery;
mod error;
mod markdown;
mod paths;
mod report;
mod schema;
mod types;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::checker::{LinkChecker, SchemaChecker};
use crate::config::Config;
use crate::types::CheckKind;

#[derive(Parser)]
#[command(
    name = "speclint",
    version,
    about = "Check cross-references in a specification tree"
)]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Print the report as JSON.
    #[arg(long, global = true)]
    json: bool,
    /// Repository root (default: nearest ancestor with .speclint.toml or specification/).
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify markdown links resolve to existing files and anchors
    Links(Inputs),
    /// Verify JSON Schema $ref targets exist inside the schema directory
    Schemas(Inputs),
}

/// Either `--all` or an explicit list of files; exactly one is required.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Inputs {
    /// Check every file of this kind under the configured root.
    #[arg(long)]
    all: bool,
    /// Files to check.
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        },
    };

    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Locate the repository, pick the input files, run the chosen checker, print the report.
///
/// # Errors
///
/// Returns errors from root discovery or config loading.
fn run(cli: &Cli) -> Result<ExitCode, error::Error> {
    let cwd = std::env::current_dir()?;
    let root = paths::find_root(cli.root.as_deref(), &cwd)?;
    let config = Config::load(&root)?;
    tracing::info!(root = %root.display(), "repository root");

    let report = match &cli.command {
        Commands::Links(inputs) => {
            let spec_root = canonical_or_joined(&root, &config.spec_dir);
            tracing::info!(spec_root = %spec_root.display(), "markdown root");
            let files = select_files(&root, &cwd, &spec_root, CheckKind::Links, &config, inputs);
            checker::run(&mut LinkChecker::new(&root), &root, &files)
        },
        Commands::Schemas(inputs) => {
            let schema_root = canonical_or_joined(&root, &config.schema_dir);
            tracing::info!(schema_root = %schema_root.display(), "schema root");
            let files = select_files(&root, &cwd, &schema_root, CheckKind::Schemas, &config, inputs);
            checker::run(&mut SchemaChecker::new(&root, &schema_root), &root, &files)
        },
    };

    if cli.json {
        println!("{}", report.render_json());
    } else {
        print!("{}", report.render_text());
    }
    Ok(report.exit_code())
}

/// Discovered files under `--all`, otherwise the command-line files.
fn select_files(
    root: &Path,
    cwd: &Path,
    dir: &Path,
    kind: CheckKind,
    config: &Config,
    inputs: &Inputs,
) -> Vec<PathBuf> {
    if inputs.all {
        discovery::discover_all(root, dir, kind, config)
    } else {
        discovery::from_args(cwd, &inputs.files)
    }
}

/// `root/relative`, canonicalized when it exists.
fn canonical_or_joined(root: &Path, relative: &str) -> PathBuf {
    let joined = root.join(relative);
    joined.canonicalize().unwrap_or_else(|_err| paths::normalize_path(&joined))
}
