//! Normalized handler results.

use std::any::Any;
use std::fmt;

/// What a handler produced.
///
/// `Void` is the marker for "handled, no payload". It is distinct from any
/// value a handler can return, including `()` wrapped in `Value` or an
/// `Option::None`.
pub enum Outcome {
    /// The handler declares no result.
    Void,
    /// The handler's return value, unmodified.
    Value(Box<dyn Any + Send>),
}

impl Outcome {
    /// Wrap a handler's return value.
    pub fn value<R: Any + Send>(value: R) -> Self {
        Outcome::Value(Box::new(value))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Outcome::Void)
    }

    /// Whether this is a value of type `R`.
    pub fn is<R: Any>(&self) -> bool {
        match self {
            Outcome::Void => false,
            Outcome::Value(value) => value.is::<R>(),
        }
    }

    pub fn downcast_ref<R: Any>(&self) -> Option<&R> {
        match self {
            Outcome::Void => None,
            Outcome::Value(value) => value.downcast_ref::<R>(),
        }
    }

    /// Take the value as `R`. A void outcome or a type mismatch is returned
    /// unchanged.
    pub fn downcast<R: Any>(self) -> Result<R, Self> {
        match self {
            Outcome::Void => Err(Outcome::Void),
            Outcome::Value(value) => value
                .downcast::<R>()
                .map(|value| *value)
                .map_err(Outcome::Value),
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Void => f.write_str("Void"),
            Outcome::Value(_) => f.write_str("Value(..)"),
        }
    }
}
