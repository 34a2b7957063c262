//! Error types for propsweep-core
//!
//! Only conditions that stop a run are errors. A property that does not
//! hold is an ordinary result and lives in [`crate::runner::Outcome`].

use thiserror::Error;

/// Result type alias using the library's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for propsweep-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors, raised before any property runs
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A generator failed while producing an argument; aborts the whole run
    #[error("Generator error in `{property}` (argument {position}): {source}")]
    Generator {
        property: String,
        position: usize,
        #[source]
        source: GeneratorError,
    },

    /// Console or report write failures
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// One-line remediation hint for human-readable output.
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Config(err) => err.hint(),
            Self::Generator { .. } => {
                "Fix the generator: every sequence must keep producing values for the whole run."
            }
            Self::Io(_) => "Check that the report destination is writable, then retry.",
        }
    }

    /// Whether this error was raised before any property was run.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid naming pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid number of iterations: {0} (must be a positive integer)")]
    InvalidIterations(i64),

    #[error("source not found: {0}")]
    SourceNotFound(String),

    #[error(
        "invalid number of generators provided for `{group}::{property}`: \
         {generators} generator(s) for {arity} parameter(s)"
    )]
    GeneratorCountMismatch {
        group: String,
        property: String,
        generators: usize,
        arity: usize,
    },

    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file {0}: {1}")]
    ReadFailed(String, String),

    #[error("Failed to parse config: {0}")]
    ParseFailed(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// One-line remediation hint for human-readable output.
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => {
                "Use a valid regular expression; it is matched case-insensitively at the start of each name."
            }
            Self::InvalidIterations(_) => "Set iterations to a positive integer such as 100.",
            Self::SourceNotFound(_) => "Use --list to see the sources known to the catalog.",
            Self::GeneratorCountMismatch { .. } => {
                "Give the property exactly one generator per parameter."
            }
            Self::FileNotFound(_) | Self::ReadFailed(..) => {
                "Check the --config path and its permissions."
            }
            Self::ParseFailed(_) | Self::ValidationError(_) => {
                "Fix the config file; unknown keys are rejected."
            }
        }
    }
}

/// Failures raised by a generator's value stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// A finite sequence ran out of values before the run finished
    #[error("sequence `{0}` exhausted")]
    Exhausted(String),

    /// The generator could not produce a value
    #[error("{0}")]
    Failed(String),
}
