//! Reporting.
//!
//! Two text surfaces: the progress stream written while properties run,
//! and the summary block written once at the end. The summary block is
//! written to the console and, when a destination is configured, to a
//! plain-text report file with identical content.
//!
//! Groups with no failing properties are left out of the summary listing.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::runner::Outcome;
use crate::source::SourceKind;

/// Width of the `=` separator around the summary block.
pub const SEPARATOR_WIDTH: usize = 50;

/// Outcomes of one group, in run order.
#[derive(Debug)]
pub struct GroupOutcomes {
    pub name: String,
    pub kind: SourceKind,
    pub outcomes: Vec<Outcome>,
}

impl GroupOutcomes {
    pub fn failing(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

/// Aggregate view over every outcome of a run.
#[derive(Debug, Default)]
pub struct Report {
    pub groups: Vec<GroupOutcomes>,
}

impl Report {
    pub fn new(groups: Vec<GroupOutcomes>) -> Self {
        Self { groups }
    }

    /// Number of properties run (not repetitions).
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.outcomes.len()).sum()
    }

    /// Number of properties with at least one failing repetition.
    pub fn failing(&self) -> usize {
        self.groups.iter().map(|g| g.failing().count()).sum()
    }

    /// Percentage of passing properties rounded to two decimals, or `None`
    /// when nothing was run.
    pub fn success_rate(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let rate = 100.0 * (total - self.failing()) as f64 / total as f64;
        Some((rate * 100.0).round() / 100.0)
    }

    pub fn all_passed(&self) -> bool {
        self.failing() == 0
    }

    /// Failing property names per group, skipping groups without failures.
    pub fn failing_names(&self) -> Vec<(&str, Vec<&str>)> {
        self.groups
            .iter()
            .filter_map(|group| {
                let names: Vec<&str> = group.failing().map(|o| o.name.as_str()).collect();
                (!names.is_empty()).then_some((group.name.as_str(), names))
            })
            .collect()
    }

    /// The summary block, separators included.
    pub fn render_summary(&self) -> String {
        let separator = "=".repeat(SEPARATOR_WIDTH);
        let mut out = String::new();
        out.push_str(&separator);
        out.push('\n');

        match self.success_rate() {
            None => out.push_str("0 test(s) run: no properties discovered\n"),
            Some(rate) => {
                out.push_str(&format!(
                    "{} test(s) failed ({}%):\n",
                    self.failing(),
                    format_rate(rate)
                ));
                for group in &self.groups {
                    let mut failing = group.failing().peekable();
                    if failing.peek().is_none() {
                        continue;
                    }
                    out.push_str(&format!("Failed tests in {} - {}:\n", group.kind, group.name));
                    for outcome in failing {
                        out.push_str(&format!("\t* {}\n", outcome.name));
                        for case in outcome.shown_failures() {
                            out.push_str(&format!("\t\t->\t{}\n", case.render()));
                        }
                    }
                }
            }
        }

        out.push_str(&separator);
        out.push('\n');
        out
    }

    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.render_summary().as_bytes())
    }
}

/// Render a rounded percentage with at most two and at least one decimal.
pub fn format_rate(rate: f64) -> String {
    let fixed = format!("{rate:.2}");
    let mut trimmed = fixed.trim_end_matches('0').to_string();
    if trimmed.ends_with('.') {
        trimmed.push('0');
    }
    trimmed
}

/// `testing <group>:` line opening a group in the progress stream.
pub fn write_group_header<W: Write>(out: &mut W, group: &str) -> io::Result<()> {
    writeln!(out, "testing {group}:")
}

/// Start of a property line; completed by [`write_outcome`].
pub fn write_binding_start<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    write!(out, "\ttesting {name}:\t\t")?;
    out.flush()
}

/// Finish a property line with its counts and the first failing cases.
pub fn write_outcome<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    writeln!(
        out,
        "ran {} test(s), with {} failure(s)",
        outcome.iterations,
        outcome.failures.len()
    )?;
    if !outcome.passed() {
        writeln!(out, "\t\tThese include (args displayed as a list):")?;
        for case in outcome.shown_failures() {
            writeln!(out, "\t\t->\t{}", case.render())?;
        }
    }
    Ok(())
}

/// Open a report destination, creating parent directories as needed.
pub fn create_report_file(path: &Path) -> io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}
