//! Properties and their verdicts.
//!
//! A property receives one argument per generator and answers with a
//! [`Verdict`]. Returning `false`, returning `None`, returning `Err` and
//! panicking all count as failure; they are kept apart only so reports can
//! say which one happened.

use std::any::{Any, type_name};
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe, catch_unwind};
use std::sync::Once;

use crate::arg::Arg;
use crate::generator::Generator;

/// Result of one property invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Held,
    Falsified,
    Errored(String),
    Panicked(String),
}

impl Verdict {
    pub fn held(&self) -> bool {
        matches!(self, Self::Held)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Held => f.write_str("held"),
            Self::Falsified => f.write_str("falsified"),
            Self::Errored(msg) => write!(f, "error: {msg}"),
            Self::Panicked(msg) => write!(f, "panicked: {msg}"),
        }
    }
}

/// Conversion from a property's return value into a [`Verdict`].
pub trait IntoVerdict {
    fn into_verdict(self) -> Verdict;
}

impl IntoVerdict for Verdict {
    fn into_verdict(self) -> Verdict {
        self
    }
}

impl IntoVerdict for bool {
    fn into_verdict(self) -> Verdict {
        if self { Verdict::Held } else { Verdict::Falsified }
    }
}

/// `None` is "nothing truthy" and fails.
impl<T: IntoVerdict> IntoVerdict for Option<T> {
    fn into_verdict(self) -> Verdict {
        self.map_or(Verdict::Falsified, IntoVerdict::into_verdict)
    }
}

impl<T: IntoVerdict, E: fmt::Display> IntoVerdict for Result<T, E> {
    fn into_verdict(self) -> Verdict {
        match self {
            Ok(value) => value.into_verdict(),
            Err(err) => Verdict::Errored(err.to_string()),
        }
    }
}

type Body = Box<dyn Fn(&[Arg]) -> Verdict>;

/// A property function with a declared parameter count.
pub struct Property {
    arity: usize,
    body: Body,
}

impl Property {
    /// Property over a raw argument slice with an explicit arity.
    pub fn nary<R, F>(arity: usize, f: F) -> Self
    where
        R: IntoVerdict,
        F: Fn(&[Arg]) -> R + 'static,
    {
        Self {
            arity,
            body: Box::new(move |args: &[Arg]| f(args).into_verdict()),
        }
    }

    pub fn unary<A, R, F>(f: F) -> Self
    where
        A: Any,
        R: IntoVerdict,
        F: Fn(&A) -> R + 'static,
    {
        Self::nary(1, move |args| -> Verdict {
            match arg::<A>(args, 0) {
                Ok(a) => f(a).into_verdict(),
                Err(verdict) => verdict,
            }
        })
    }

    pub fn binary<A, B, R, F>(f: F) -> Self
    where
        A: Any,
        B: Any,
        R: IntoVerdict,
        F: Fn(&A, &B) -> R + 'static,
    {
        Self::nary(2, move |args| -> Verdict {
            match (arg::<A>(args, 0), arg::<B>(args, 1)) {
                (Ok(a), Ok(b)) => f(a, b).into_verdict(),
                (Err(verdict), _) | (_, Err(verdict)) => verdict,
            }
        })
    }

    pub fn ternary<A, B, C, R, F>(f: F) -> Self
    where
        A: Any,
        B: Any,
        C: Any,
        R: IntoVerdict,
        F: Fn(&A, &B, &C) -> R + 'static,
    {
        Self::nary(3, move |args| -> Verdict {
            match (arg::<A>(args, 0), arg::<B>(args, 1), arg::<C>(args, 2)) {
                (Ok(a), Ok(b), Ok(c)) => f(a, b, c).into_verdict(),
                (Err(verdict), _, _) | (_, Err(verdict), _) | (_, _, Err(verdict)) => verdict,
            }
        })
    }

    /// Number of parameters the property takes.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invoke the property, converting a panic into [`Verdict::Panicked`].
    ///
    /// The panic hook stays silent for the duration of the call; the
    /// message is kept in the verdict instead of going to stderr.
    pub fn check(&self, args: &[Arg]) -> Verdict {
        install_quiet_hook();
        let was_quiet = QUIET_PANICS.replace(true);
        let result = catch_unwind(AssertUnwindSafe(|| (self.body)(args)));
        QUIET_PANICS.set(was_quiet);
        match result {
            Ok(verdict) => verdict,
            Err(payload) => Verdict::Panicked(panic_message(payload.as_ref())),
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

fn arg<T: Any>(args: &[Arg], index: usize) -> Result<&T, Verdict> {
    let Some(value) = args.get(index) else {
        return Err(Verdict::Errored(format!("missing argument {index}")));
    };
    value.downcast_ref::<T>().ok_or_else(|| {
        Verdict::Errored(format!(
            "argument {index} is {}, expected {}",
            value.type_label(),
            type_name::<T>()
        ))
    })
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Wrap the current panic hook once per process. Panics on threads that
/// are inside [`Property::check`] are not reported; all others reach the
/// previous hook unchanged.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET_PANICS.get() {
                previous(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// What a candidate yields when asked for its definition: the generators
/// in parameter order and the property they feed.
#[derive(Debug)]
pub struct PropertyDef {
    pub generators: Vec<Generator>,
    pub property: Property,
}

impl PropertyDef {
    pub fn new(generators: Vec<Generator>, property: Property) -> Self {
        Self {
            generators,
            property,
        }
    }
}
