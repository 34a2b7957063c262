//! propsweep: run discovered property tests and report failures
//!
//! ## Example Usage
//!
//! ```bash
//! # Run every class source with the default pattern and 100 repetitions
//! propsweep
//!
//! # Run the arithmetic module 500 times per property, persisting the summary
//! propsweep -s arithmetic -n 500 -r out/report.txt
//!
//! # List what would run
//! propsweep --list --classes
//! ```
//!
//! Exit codes: 0 when every property held, 1 when any property failed,
//! 2 for configuration errors and aborted runs.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use propsweep_core::config::{Config, LogFormat};
use propsweep_core::logging::init_logging;
use propsweep_core::{Catalog, Tester};

mod suites;

#[derive(Parser, Debug)]
#[command(
    name = "propsweep",
    author,
    version,
    about = "Discover and run property tests",
    long_about = "Discovers properties whose names match a pattern, runs each one against \
                  freshly generated arguments for a fixed number of repetitions and reports \
                  which properties failed."
)]
struct Cli {
    /// TOML config file; flags override its values
    #[arg(long, env = "PROPSWEEP_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Naming pattern for candidates (regex, case-insensitive, start-anchored)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Repetitions per property
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    iterations: Option<i64>,

    /// Write the summary block to this file
    #[arg(short, long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Source to scan, by catalog name (repeatable)
    #[arg(short, long = "source", value_name = "NAME")]
    sources: Vec<String>,

    /// Resolve --source names against class sources instead of modules
    #[arg(long)]
    classes: bool,

    /// Print the discovered properties per group and exit
    #[arg(long)]
    list: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log format for stderr
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

/// Where the sources of a run come from once flags and file are merged.
#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Modules(Vec<String>),
    Classes(Vec<String>),
    AllClasses,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::default(),
        };
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        Ok(config)
    }

    fn selection(&self, config: &Config) -> Selection {
        if !self.sources.is_empty() {
            return if self.classes {
                Selection::Classes(self.sources.clone())
            } else {
                Selection::Modules(self.sources.clone())
            };
        }
        if self.classes {
            return Selection::AllClasses;
        }
        if !config.tester.modules.is_empty() {
            return Selection::Modules(config.tester.modules.clone());
        }
        if !config.tester.classes.is_empty() {
            return Selection::Classes(config.tester.classes.clone());
        }
        Selection::AllClasses
    }

    fn build_tester(&self, config: &Config, catalog: &Catalog) -> Result<Tester> {
        let mut tester = Tester::from_config(&config.tester)?;
        if let Some(pattern) = &self.pattern {
            tester.set_pattern(pattern)?;
        }
        if let Some(iterations) = self.iterations {
            tester.set_iterations(iterations)?;
        }
        if self.report.is_some() {
            tester.set_report_path(self.report.clone());
        }
        match self.selection(config) {
            Selection::Modules(names) => tester.load_from_modules(catalog.modules(&names)?),
            Selection::Classes(names) => tester.load_from_classes(catalog.classes(&names)?),
            Selection::AllClasses => tester.load_from_classes(catalog.all_classes()),
        }
        Ok(tester)
    }
}

fn list(tester: &Tester) -> Result<()> {
    let groups = tester.discover()?;
    if groups.is_empty() {
        println!("no sources selected");
    }
    for group in &groups {
        println!("{} {} ({} propert(ies)):", group.kind, group.name, group.len());
        for binding in &group.bindings {
            println!("\t{} [{} argument(s)]", binding.name, binding.arity());
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = cli.load_config()?;
    init_logging(&config.logging).context("failed to initialize logging")?;

    let catalog = suites::catalog();
    let tester = cli.build_tester(&config, &catalog)?;
    tracing::debug!(
        pattern = %tester.pattern(),
        iterations = tester.iterations(),
        sources = tester.sources().len(),
        "Tester configured"
    );

    if cli.list {
        list(&tester)?;
        return Ok(ExitCode::SUCCESS);
    }

    let report = tester.run_tests()?;
    if report.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            let hint = err
                .downcast_ref::<propsweep_core::Error>()
                .map(propsweep_core::Error::hint)
                .or_else(|| {
                    err.downcast_ref::<propsweep_core::ConfigError>()
                        .map(propsweep_core::ConfigError::hint)
                });
            if let Some(hint) = hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(2)
        }
    }
}
