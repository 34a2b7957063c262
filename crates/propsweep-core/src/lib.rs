//! propsweep-core: property discovery, validation, running and reporting
//!
//! Given sources of candidate properties, the engine finds the members
//! whose names match a naming pattern, checks that each property has one
//! generator per parameter, runs every property for a fixed number of
//! repetitions and reports which properties failed.
//!
//! # Architecture
//!
//! ```text
//! Tester ─→ Discovery & Validator ─→ Groups of PropertyBindings
//!                                          ↓
//!                                   Runner (per binding) ─→ Outcomes
//!                                                              ↓
//!                                              Reporter ─→ console / report file
//! ```
//!
//! # Modules
//!
//! - `arg`: type-erased argument values
//! - `generator`: the generator contract (factory of independent streams)
//! - `generators`: built-in integer, list, float, bool and string generators
//! - `property`: properties, arity and verdicts
//! - `pattern`: case-insensitive, start-anchored naming pattern
//! - `source`: module-like and class-like property sources, catalog
//! - `discovery`: discovery and arity validation
//! - `runner`: the generate-invoke-record loop
//! - `report`: aggregation and text rendering
//! - `tester`: configuration and orchestration
//! - `config`: `propsweep.toml` loading
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```
//! use propsweep_core::generators::int_list_arb;
//! use propsweep_core::{ClassSource, Property, PropertyDef, Tester};
//!
//! let sorting = ClassSource::new("sortingTests").method("prop_sortedResult", || {
//!     PropertyDef::new(
//!         vec![int_list_arb(10, -100, 100)],
//!         Property::unary(|v: &Vec<i64>| {
//!             let mut sorted = v.clone();
//!             sorted.sort_unstable();
//!             sorted.windows(2).all(|w| w[0] <= w[1])
//!         }),
//!     )
//! });
//!
//! let mut tester = Tester::new();
//! tester.load_from_classes(vec![sorting]);
//! let mut console = Vec::new();
//! let report = tester.run_tests_with(&mut console).unwrap();
//! assert!(report.all_passed());
//! ```
//!
//! # Safety
//!
//! This crate forbids unsafe code.

#![forbid(unsafe_code)]

pub mod arg;
pub mod config;
pub mod discovery;
pub mod error;
pub mod generator;
pub mod generators;
pub mod logging;
pub mod pattern;
pub mod property;
pub mod report;
pub mod runner;
pub mod source;
pub mod tester;

pub use arg::Arg;
pub use error::{ConfigError, Error, GeneratorError, Result};
pub use generator::{Generator, ValueStream};
pub use property::{IntoVerdict, Property, PropertyDef, Verdict};
pub use report::Report;
pub use runner::Outcome;
pub use source::{Catalog, ClassSource, ModuleSource, PropertyBinding, PropertySource, SourceKind};
pub use tester::Tester;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
