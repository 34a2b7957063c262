//! Tester: configuration plus the discover -> run -> report sequence.
//!
//! Every setter validates its input and fails fast. Configuration errors
//! surface before the first `testing ...` line is written. The report
//! destination is only touched once the whole run has finished.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::TesterConfig;
use crate::discovery::{Group, discover};
use crate::error::{ConfigError, Result};
use crate::pattern::NamePattern;
use crate::report::{
    GroupOutcomes, Report, create_report_file, write_binding_start, write_group_header,
    write_outcome,
};
use crate::runner;
use crate::source::{ClassSource, ModuleSource, Sources};

/// Default number of repetitions per property.
pub const DEFAULT_ITERATIONS: u32 = 100;

#[derive(Debug)]
pub struct Tester {
    pattern: NamePattern,
    iterations: u32,
    sources: Sources,
    report_path: Option<PathBuf>,
}

impl Default for Tester {
    fn default() -> Self {
        Self {
            pattern: NamePattern::default(),
            iterations: DEFAULT_ITERATIONS,
            sources: Sources::None,
            report_path: None,
        }
    }
}

impl Tester {
    /// A tester with the default pattern (`prop_`), 100 iterations, no
    /// sources and no report file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tester from a validated config section. Named sources are
    /// resolved by the caller; see [`crate::source::Catalog`].
    pub fn from_config(config: &TesterConfig) -> Result<Self> {
        let mut tester = Self::new();
        tester.set_pattern(&config.pattern)?;
        tester.set_iterations(config.iterations)?;
        tester.set_report_path(config.report.clone());
        Ok(tester)
    }

    /// Set the naming pattern. It must compile as a regular expression.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<()> {
        self.pattern = NamePattern::new(pattern)?;
        Ok(())
    }

    /// Set the number of repetitions per property. Must be positive.
    pub fn set_iterations(&mut self, iterations: i64) -> Result<()> {
        self.iterations = u32::try_from(iterations)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidIterations(iterations))?;
        Ok(())
    }

    /// Scan these modules. Clears any configured classes.
    pub fn load_from_modules(&mut self, modules: Vec<ModuleSource>) {
        self.sources = Sources::Modules(modules);
    }

    /// Scan these classes. Clears any configured modules.
    pub fn load_from_classes(&mut self, classes: Vec<ClassSource>) {
        self.sources = Sources::Classes(classes);
    }

    /// Where to mirror the summary block; `None` disables the report file.
    pub fn set_report_path(&mut self, path: Option<PathBuf>) {
        self.report_path = path;
    }

    pub fn pattern(&self) -> &NamePattern {
        &self.pattern
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.report_path.as_deref()
    }

    /// Discover and validate bindings without running them.
    pub fn discover(&self) -> Result<Vec<Group>> {
        Ok(discover(self.sources.iter(), &self.pattern)?)
    }

    /// Run every discovered property, printing progress and the summary to
    /// stdout.
    pub fn run_tests(&self) -> Result<Report> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_tests_with(&mut out)
    }

    /// Like [`Tester::run_tests`], writing console output to `out`.
    pub fn run_tests_with<W: Write>(&self, out: &mut W) -> Result<Report> {
        let groups = self.discover()?;

        info!(
            groups = groups.len(),
            iterations = self.iterations,
            report = ?self.report_path,
            "Running properties"
        );

        let mut results = Vec::with_capacity(groups.len());
        for group in groups {
            write_group_header(out, &group.name)?;
            let mut outcomes = Vec::with_capacity(group.bindings.len());
            for binding in &group.bindings {
                write_binding_start(out, &binding.name)?;
                let outcome = runner::run(binding, self.iterations)?;
                write_outcome(out, &outcome)?;
                outcomes.push(outcome);
            }
            results.push(GroupOutcomes {
                name: group.name,
                kind: group.kind,
                outcomes,
            });
        }

        let report = Report::new(results);
        report.write_summary(out)?;
        out.flush()?;

        // written only after a complete run
        if let Some(path) = &self.report_path {
            let mut file = create_report_file(path)?;
            report.write_summary(&mut file)?;
            file.flush()?;
        }

        info!(
            total = report.total(),
            failing = report.failing(),
            success_rate = ?report.success_rate(),
            "Run complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::generators::int_arb;
    use crate::property::{Property, PropertyDef};

    fn passing() -> PropertyDef {
        PropertyDef::new(vec![int_arb(0, 9)], Property::unary(|x: &i64| *x <= 9))
    }

    fn failing() -> PropertyDef {
        PropertyDef::new(vec![int_arb(0, 9)], Property::unary(|_: &i64| false))
    }

    #[test]
    fn defaults() {
        let tester = Tester::new();
        assert_eq!(tester.pattern().as_str(), "prop_");
        assert_eq!(tester.iterations(), DEFAULT_ITERATIONS);
        assert!(tester.sources().is_empty());
        assert!(tester.report_path().is_none());
    }

    #[test]
    fn non_positive_iterations_rejected() {
        let mut tester = Tester::new();
        for bad in [0, -1, -100, i64::from(u32::MAX) + 1] {
            let err = tester.set_iterations(bad).unwrap_err();
            assert!(matches!(err, Error::Config(ConfigError::InvalidIterations(n)) if n == bad));
        }
        // failed setters leave the previous value in place
        assert_eq!(tester.iterations(), DEFAULT_ITERATIONS);
        tester.set_iterations(5).unwrap();
        assert_eq!(tester.iterations(), 5);
    }

    #[test]
    fn malformed_pattern_rejected() {
        let mut tester = Tester::new();
        assert!(tester.set_pattern("[unclosed").is_err());
        assert_eq!(tester.pattern().as_str(), "prop_");
    }

    #[test]
    fn modules_and_classes_are_exclusive() {
        let mut tester = Tester::new();
        tester.load_from_modules(vec![ModuleSource::new("m")]);
        assert!(matches!(tester.sources(), Sources::Modules(_)));
        tester.load_from_classes(vec![ClassSource::new("C")]);
        assert!(matches!(tester.sources(), Sources::Classes(c) if c.len() == 1));
        tester.load_from_modules(Vec::new());
        assert!(matches!(tester.sources(), Sources::Modules(m) if m.is_empty()));
    }

    #[test]
    fn run_collects_outcomes_per_group() {
        let mut tester = Tester::new();
        tester.set_iterations(3).unwrap();
        tester.load_from_modules(vec![
            ModuleSource::new("first").function("prop_pass", passing),
            ModuleSource::new("second")
                .function("prop_fail", failing)
                .function("prop_pass", passing),
        ]);

        let mut out = Vec::new();
        let report = tester.run_tests_with(&mut out).unwrap();
        assert_eq!(report.total(), 3);
        assert_eq!(report.failing(), 1);
        assert_eq!(report.groups[1].outcomes[0].failures.len(), 3);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("testing first:\n"));
        assert!(text.contains("testing second:\n"));
        assert!(text.contains("1 test(s) failed (66.67%):"));
        assert!(text.contains("Failed tests in module - second:\n\t* prop_fail\n"));
    }

    #[test]
    fn no_sources_reports_nothing_discovered() {
        let mut out = Vec::new();
        let report = Tester::new().run_tests_with(&mut out).unwrap();
        assert_eq!(report.total(), 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("no properties discovered"));
        assert!(!text.contains("testing"));
    }

    #[test]
    fn from_config_validates() {
        let config = TesterConfig {
            iterations: 0,
            ..TesterConfig::default()
        };
        assert!(Tester::from_config(&config).is_err());

        let config = TesterConfig {
            pattern: "law_".to_string(),
            iterations: 7,
            report: Some(PathBuf::from("out.txt")),
            ..TesterConfig::default()
        };
        let tester = Tester::from_config(&config).unwrap();
        assert_eq!(tester.pattern().as_str(), "law_");
        assert_eq!(tester.iterations(), 7);
        assert_eq!(tester.report_path(), Some(Path::new("out.txt")));
    }
}
