//! Error types for bus operations.

use std::error::Error;
use std::fmt;

/// Error type for subscription bookkeeping on a bus.
#[derive(Debug)]
pub enum BusError {
    /// The bus's internal lock was poisoned (a thread panicked while holding it).
    LockPoisoned(&'static str),
    /// The bus refused the (un)subscription.
    Rejected(String),
    /// Other error.
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::LockPoisoned(operation) => {
                write!(f, "bus lock poisoned during {}", operation)
            }
            BusError::Rejected(msg) => write!(f, "subscription rejected: {}", msg),
            BusError::Other(e) => write!(f, "bus error: {}", e),
        }
    }
}

impl Error for BusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BusError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
