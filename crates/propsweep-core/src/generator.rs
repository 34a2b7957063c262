//! Generator contract.
//!
//! A [`Generator`] is a factory. Every call to [`Generator::stream`] yields
//! a fresh [`ValueStream`] with its own cursor, so restarting a generator
//! means asking the factory again. Streams are treated as infinite: the
//! runner decides how many values to pull. A stream that runs dry reports
//! [`GeneratorError::Exhausted`], which aborts the run.

use std::any::Any;
use std::fmt;

use crate::arg::Arg;
use crate::error::GeneratorError;

/// A lazily evaluated sequence of argument values.
pub trait ValueStream {
    /// Produce the next value.
    fn next_value(&mut self) -> Result<Arg, GeneratorError>;
}

type Factory = Box<dyn Fn() -> Box<dyn ValueStream>>;

/// A named factory of independent value streams.
pub struct Generator {
    label: String,
    factory: Factory,
}

impl Generator {
    /// Wrap a stream factory.
    pub fn new<S, F>(label: impl Into<String>, factory: F) -> Self
    where
        S: ValueStream + 'static,
        F: Fn() -> S + 'static,
    {
        Self {
            label: label.into(),
            factory: Box::new(move || -> Box<dyn ValueStream> { Box::new(factory()) }),
        }
    }

    /// Build a generator from a factory of plain iterators.
    ///
    /// Each stream is a new iterator from `make`. If the iterator ends,
    /// the stream reports [`GeneratorError::Exhausted`].
    pub fn sequence<T, I, F>(label: impl Into<String>, make: F) -> Self
    where
        T: Any + fmt::Debug,
        I: Iterator<Item = T> + 'static,
        F: Fn() -> I + 'static,
    {
        let label = label.into();
        let stream_label = label.clone();
        Self::new(label, move || IterStream {
            label: stream_label.clone(),
            iter: make(),
        })
    }

    /// Build a generator from a factory of fallible iterators.
    ///
    /// An `Err` item is surfaced as [`GeneratorError::Failed`].
    pub fn try_sequence<T, E, I, F>(label: impl Into<String>, make: F) -> Self
    where
        T: Any + fmt::Debug,
        E: fmt::Display,
        I: Iterator<Item = Result<T, E>> + 'static,
        F: Fn() -> I + 'static,
    {
        let label = label.into();
        let stream_label = label.clone();
        Self::new(label, move || TryIterStream {
            label: stream_label.clone(),
            iter: make(),
        })
    }

    /// Start a fresh, independent stream.
    pub fn stream(&self) -> Box<dyn ValueStream> {
        (self.factory)()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

struct IterStream<I> {
    label: String,
    iter: I,
}

impl<T, I> ValueStream for IterStream<I>
where
    T: Any + fmt::Debug,
    I: Iterator<Item = T>,
{
    fn next_value(&mut self) -> Result<Arg, GeneratorError> {
        self.iter
            .next()
            .map(Arg::new)
            .ok_or_else(|| GeneratorError::Exhausted(self.label.clone()))
    }
}

struct TryIterStream<I> {
    label: String,
    iter: I,
}

impl<T, E, I> ValueStream for TryIterStream<I>
where
    T: Any + fmt::Debug,
    E: fmt::Display,
    I: Iterator<Item = Result<T, E>>,
{
    fn next_value(&mut self) -> Result<Arg, GeneratorError> {
        match self.iter.next() {
            Some(Ok(value)) => Ok(Arg::new(value)),
            Some(Err(err)) => Err(GeneratorError::Failed(err.to_string())),
            None => Err(GeneratorError::Exhausted(self.label.clone())),
        }
    }
}
