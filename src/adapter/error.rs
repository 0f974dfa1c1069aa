use std::fmt;

use crate::bus::BusError;

/// Error type for adapter subscription bookkeeping.
#[derive(Debug)]
pub enum SubscriptionError {
    /// The adapter was unsubscribed before; it cannot subscribe again.
    AlreadyUnsubscribed,
    /// The adapter is being dropped and can no longer hand itself to a bus.
    Detached,
    /// Every handle to the bus was dropped; its registrations went with it.
    BusDropped,
    /// The bus refused a (un)subscription.
    Bus(BusError),
}

impl fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionError::AlreadyUnsubscribed => {
                write!(f, "adapter was unsubscribed and cannot subscribe again")
            }
            SubscriptionError::Detached => write!(f, "adapter is no longer shared"),
            SubscriptionError::BusDropped => write!(f, "command bus was dropped"),
            SubscriptionError::Bus(e) => write!(f, "bus error: {}", e),
        }
    }
}

impl std::error::Error for SubscriptionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubscriptionError::Bus(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BusError> for SubscriptionError {
    fn from(err: BusError) -> Self {
        SubscriptionError::Bus(err)
    }
}
