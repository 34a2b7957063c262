//! Runs one binding for a fixed number of repetitions.
//!
//! Each repetition pulls exactly one value from every generator stream in
//! declared order and invokes the property with them. A failing
//! repetition is recorded and sampling continues, so the outcome reflects
//! how often a property fails rather than only whether it does.
//!
//! A generator that cannot produce a value aborts the run with
//! [`Error::Generator`]. A property that fails, including by panicking,
//! only marks its own repetition.

use tracing::{debug, error, info_span};

use crate::arg::{Arg, render_args};
use crate::error::{Error, Result};
use crate::property::Verdict;
use crate::source::PropertyBinding;

/// Number of failing cases shown per property in console and report output.
pub const MAX_SHOWN_FAILURES: usize = 5;

/// One failing repetition: the arguments used and how the property failed.
#[derive(Debug)]
pub struct FailureCase {
    pub args: Vec<Arg>,
    pub verdict: Verdict,
}

impl FailureCase {
    /// `[a, b]`, followed by the reason unless it was a plain `false`.
    pub fn render(&self) -> String {
        let args = render_args(&self.args);
        match &self.verdict {
            Verdict::Held | Verdict::Falsified => args,
            other => format!("{args} ({other})"),
        }
    }
}

/// Result of running one binding.
#[derive(Debug)]
pub struct Outcome {
    pub name: String,
    pub iterations: u32,
    pub failures: Vec<FailureCase>,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// The failing cases that get displayed.
    pub fn shown_failures(&self) -> &[FailureCase] {
        &self.failures[..self.failures.len().min(MAX_SHOWN_FAILURES)]
    }
}

/// Run `binding` for `iterations` repetitions.
pub fn run(binding: &PropertyBinding, iterations: u32) -> Result<Outcome> {
    let span = info_span!("run_property", property = %binding.name, iterations);
    let _guard = span.enter();

    let mut streams: Vec<_> = binding.generators.iter().map(|g| g.stream()).collect();
    let mut failures = Vec::new();

    for repetition in 0..iterations {
        let mut args = Vec::with_capacity(streams.len());
        for (position, stream) in streams.iter_mut().enumerate() {
            let value = stream.next_value().map_err(|source| {
                error!(repetition, position, error = %source, "Generator failed");
                Error::Generator {
                    property: binding.name.clone(),
                    position,
                    source,
                }
            })?;
            args.push(value);
        }

        let verdict = binding.property.check(&args);
        if !verdict.held() {
            debug!(repetition, args = %render_args(&args), %verdict, "Property failed");
            failures.push(FailureCase { args, verdict });
        }
    }

    debug!(failures = failures.len(), "Property finished");
    Ok(Outcome {
        name: binding.name.clone(),
        iterations,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use crate::generator::Generator;
    use crate::generators::int_arb;
    use crate::property::{Property, PropertyDef};
    use std::cell::Cell;
    use std::rc::Rc;

    fn binding(generators: Vec<Generator>, property: Property) -> PropertyBinding {
        PropertyBinding::new("prop_under_test", PropertyDef::new(generators, property))
    }

    #[test]
    fn always_true_has_no_failures() {
        let b = binding(vec![int_arb(-5, 5)], Property::unary(|x: &i64| x.abs() <= 5));
        let outcome = run(&b, 50).unwrap();
        assert!(outcome.passed());
        assert_eq!(outcome.iterations, 50);
        assert_eq!(outcome.name, "prop_under_test");
    }

    #[test]
    fn always_false_fails_every_repetition() {
        let b = binding(vec![int_arb(0, 9)], Property::unary(|_: &i64| false));
        let outcome = run(&b, 7).unwrap();
        assert_eq!(outcome.failures.len(), 7);
        assert!(
            outcome
                .failures
                .iter()
                .all(|f| f.verdict == Verdict::Falsified)
        );
    }

    #[test]
    fn panicking_property_is_recorded_not_propagated() {
        let b = binding(
            vec![int_arb(0, 9)],
            Property::unary(|x: &i64| -> bool { panic!("bad input {x}") }),
        );
        let outcome = run(&b, 4).unwrap();
        assert_eq!(outcome.failures.len(), 4);
        assert!(matches!(outcome.failures[0].verdict, Verdict::Panicked(_)));
    }

    #[test]
    fn does_not_short_circuit() {
        let seen = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&seen);
        let b = binding(
            vec![Generator::sequence("count", || 0_i64..)],
            Property::unary(move |x: &i64| {
                counter.set(counter.get() + 1);
                x % 2 == 0
            }),
        );
        let outcome = run(&b, 10).unwrap();
        assert_eq!(seen.get(), 10);
        assert_eq!(outcome.failures.len(), 5);
        let failing: Vec<i64> = outcome
            .failures
            .iter()
            .map(|f| *f.args[0].downcast_ref::<i64>().unwrap())
            .collect();
        assert_eq!(failing, vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn arguments_follow_declared_order() {
        let b = binding(
            vec![
                Generator::sequence("tens", || (0_i64..).map(|n| n * 10)),
                Generator::sequence("ones", || 0_i64..),
            ],
            Property::binary(|a: &i64, b: &i64| a < b),
        );
        let outcome = run(&b, 3).unwrap();
        // (0,0) (10,1) (20,2): every pair fails a < b
        assert_eq!(outcome.failures.len(), 3);
        assert_eq!(outcome.failures[1].render(), "[10, 1]");
    }

    #[test]
    fn each_run_restarts_streams() {
        let b = binding(
            vec![Generator::sequence("count", || 0_i64..)],
            Property::unary(|x: &i64| *x > 0),
        );
        assert_eq!(run(&b, 3).unwrap().failures.len(), 1);
        // a second run starts from zero again
        assert_eq!(run(&b, 3).unwrap().failures.len(), 1);
    }

    #[test]
    fn exhausted_generator_aborts() {
        let b = binding(
            vec![Generator::sequence("three", || vec![1_i64, 2, 3].into_iter())],
            Property::unary(|_: &i64| true),
        );
        let err = run(&b, 5).unwrap_err();
        match err {
            Error::Generator {
                property,
                position,
                source,
            } => {
                assert_eq!(property, "prop_under_test");
                assert_eq!(position, 0);
                assert_eq!(source, GeneratorError::Exhausted("three".to_string()));
            }
            other => panic!("expected generator error, got {other:?}"),
        }
    }

    #[test]
    fn shown_failures_are_capped() {
        let b = binding(vec![int_arb(0, 9)], Property::unary(|_: &i64| false));
        let outcome = run(&b, 12).unwrap();
        assert_eq!(outcome.failures.len(), 12);
        assert_eq!(outcome.shown_failures().len(), MAX_SHOWN_FAILURES);
    }

    #[test]
    fn render_includes_reason_for_errors() {
        let case = FailureCase {
            args: vec![Arg::new(3_i64)],
            verdict: Verdict::Errored("overflow".to_string()),
        };
        assert_eq!(case.render(), "[3] (error: overflow)");
        let plain = FailureCase {
            args: vec![Arg::new(3_i64)],
            verdict: Verdict::Falsified,
        };
        assert_eq!(plain.render(), "[3]");
    }
}
