//! Type-erased argument values.
//!
//! The engine never looks inside a generated value. It only moves values
//! from generators to properties by position and renders them with
//! `Debug` when a case fails.

use std::any::{Any, type_name};
use std::fmt;

trait ArgValue: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn type_label(&self) -> &'static str;
}

impl<T: Any + fmt::Debug> ArgValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_label(&self) -> &'static str {
        type_name::<T>()
    }
}

/// One generated argument.
pub struct Arg(Box<dyn ArgValue>);

impl Arg {
    pub fn new<T: Any + fmt::Debug>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Borrow the value as `T`, or `None` if it holds another type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    /// Name of the concrete type held.
    pub fn type_label(&self) -> &'static str {
        (*self.0).type_label()
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Render an argument tuple as a bracketed list: `[1, [2, 3]]`.
pub fn render_args(args: &[Arg]) -> String {
    let items: Vec<String> = args.iter().map(|arg| format!("{arg:?}")).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_to_stored_type() {
        let arg = Arg::new(42_i64);
        assert_eq!(arg.downcast_ref::<i64>(), Some(&42));
        assert!(arg.downcast_ref::<i32>().is_none());
        assert_eq!(arg.type_label(), "i64");
    }

    #[test]
    fn debug_is_transparent() {
        let arg = Arg::new(vec![1, 2, 3]);
        assert_eq!(format!("{arg:?}"), "[1, 2, 3]");
        let arg = Arg::new("hi".to_string());
        assert_eq!(format!("{arg:?}"), "\"hi\"");
    }

    #[test]
    fn render_args_as_list() {
        let args = vec![Arg::new(5_i64), Arg::new(vec![-1_i64, 2]), Arg::new(true)];
        assert_eq!(render_args(&args), "[5, [-1, 2], true]");
        assert_eq!(render_args(&[]), "[]");
    }
}
