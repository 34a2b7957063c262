//! Built-in generators.
//!
//! Every stream owns its own `StdRng`, seeded from the thread RNG when the
//! factory is invoked. Two streams from one generator never share state.

use std::any::Any;
use std::fmt;

use rand::distr::{Alphanumeric, SampleString};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::arg::Arg;
use crate::error::GeneratorError;
use crate::generator::{Generator, ValueStream};

struct RngStream<F> {
    rng: StdRng,
    draw: F,
}

impl<T, F> ValueStream for RngStream<F>
where
    T: Any + fmt::Debug,
    F: FnMut(&mut StdRng) -> T,
{
    fn next_value(&mut self) -> Result<Arg, GeneratorError> {
        Ok(Arg::new((self.draw)(&mut self.rng)))
    }
}

/// Generator drawing each value from a fresh RNG with `draw`.
pub fn from_fn<T, F>(label: impl Into<String>, draw: F) -> Generator
where
    T: Any + fmt::Debug,
    F: Fn(&mut StdRng) -> T + Clone + 'static,
{
    Generator::new(label, move || RngStream {
        rng: StdRng::from_rng(&mut rand::rng()),
        draw: draw.clone(),
    })
}

/// Uniform integers in `[min, max]`. Bounds are swapped if reversed.
pub fn int_arb(min: i64, max: i64) -> Generator {
    let (lo, hi) = ordered(min, max);
    from_fn(format!("int[{lo}, {hi}]"), move |rng| rng.random_range(lo..=hi))
}

/// Uniform integers over the whole `i64` range.
pub fn int_any() -> Generator {
    int_arb(i64::MIN, i64::MAX)
}

/// Lists of exactly `len` integers, each uniform in `[min, max]`.
pub fn int_list_arb(len: usize, min: i64, max: i64) -> Generator {
    let (lo, hi) = ordered(min, max);
    from_fn(format!("int_list[{len}; {lo}, {hi}]"), move |rng| {
        (0..len)
            .map(|_| rng.random_range(lo..=hi))
            .collect::<Vec<i64>>()
    })
}

/// Uniform floats in `[min, max)`. Returns `min` when the range is empty.
pub fn float_arb(min: f64, max: f64) -> Generator {
    from_fn(format!("float[{min}, {max})"), move |rng| {
        if min < max {
            rng.random_range(min..max)
        } else {
            min
        }
    })
}

pub fn bool_arb() -> Generator {
    from_fn("bool", |rng| rng.random::<bool>())
}

/// Alphanumeric strings of length `0..=max_len`.
pub fn string_arb(max_len: usize) -> Generator {
    from_fn(format!("string[..={max_len}]"), move |rng| {
        let len = rng.random_range(0..=max_len);
        Alphanumeric.sample_string(rng, len)
    })
}

/// The same value forever.
pub fn constant<T>(value: T) -> Generator
where
    T: Any + fmt::Debug + Clone,
{
    let label = format!("constant({value:?})");
    Generator::sequence(label, move || std::iter::repeat(value.clone()))
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b { (a, b) } else { (b, a) }
}
