mod check;
mod output;
mod root;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dss-frontmatter",
    about = "Validate and auto-correct YAML frontmatter in DSS markdown and Python files",
    version
)]
struct Cli {
    /// Files or directories to check
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Fix invalid frontmatter in place
    #[arg(short = 'a', long)]
    auto_correct: bool,

    /// Show what auto-correct would change without writing
    #[arg(short = 'd', long)]
    dry_run: bool,

    /// Descend into subdirectories
    #[arg(short = 'r', long)]
    recursive: bool,

    /// List passing and skipped files and enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Config file (default: nearest meta/dss_config.yml)
    #[arg(short = 'c', long, env = "DSS_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(short = 'j', long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = check::CheckArgs {
        paths: cli.paths,
        config: cli.config,
        auto_correct: cli.auto_correct,
        dry_run: cli.dry_run,
        recursive: cli.recursive,
        verbose: cli.verbose,
        json: cli.json,
    };

    match check::run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
