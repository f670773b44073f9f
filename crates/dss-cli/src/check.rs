use crate::output::{print_json, print_report, print_summary};
use crate::root;
use anyhow::{bail, Context};
use dss_core::config::{Config, WarnLevel};
use dss_core::discover::discover;
use dss_core::process::{ProcessOptions, Processor};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct CheckArgs {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub auto_correct: bool,
    pub dry_run: bool,
    pub recursive: bool,
    pub verbose: bool,
    pub json: bool,
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let config = match root::resolve_config(explicit) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            Config::load(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => {
            debug!("no config file found, using built-in defaults");
            Config::default()
        }
    };

    let warnings = config.validate();
    for w in warnings.iter().filter(|w| w.level == WarnLevel::Warning) {
        warn!("config: {}", w.message);
    }
    if Config::has_errors(&warnings) {
        let errors: Vec<&str> = warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Error)
            .map(|w| w.message.as_str())
            .collect();
        bail!("invalid config: {}", errors.join("; "));
    }
    Ok(config)
}

/// Check (and optionally fix) every file under `args.paths`. Returns
/// whether all processed files passed.
pub fn run(args: &CheckArgs) -> anyhow::Result<bool> {
    let config = load_config(args.config.as_deref())?;

    // A dry run previews corrections, so it implies auto-correct.
    let options = ProcessOptions {
        auto_correct: args.auto_correct || args.dry_run,
        dry_run: args.dry_run,
    };
    let processor = Processor::new(&config, options).context("failed to compile glob rules")?;

    let discovery = discover(&args.paths, args.recursive, processor.classifier());
    debug!(
        count = discovery.files.len(),
        unreachable = discovery.failures.len(),
        "files discovered"
    );

    let base = std::env::current_dir().context("cannot determine current directory")?;
    let run = processor.run_discovery(&discovery, &base);

    if args.json {
        print_json(&run)?;
    } else {
        for report in &run.files {
            print_report(report, args.verbose, args.dry_run);
        }
        print_summary(&run.summary);
    }

    Ok(run.summary.all_passed())
}
