use std::fmt;

use crate::adapter::SubscriptionError;
use crate::registry::InvalidHandlerDefinition;

/// Error type for registering handler objects.
#[derive(Debug)]
pub enum RegistrationError {
    /// The target's handler declarations are invalid.
    InvalidDefinition(InvalidHandlerDefinition),
    /// The adapter could not be (un)subscribed.
    Subscription(SubscriptionError),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::InvalidDefinition(e) => {
                write!(f, "invalid handler definition: {}", e)
            }
            RegistrationError::Subscription(e) => write!(f, "subscription failed: {}", e),
        }
    }
}

impl std::error::Error for RegistrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistrationError::InvalidDefinition(e) => Some(e),
            RegistrationError::Subscription(e) => Some(e),
        }
    }
}

impl From<InvalidHandlerDefinition> for RegistrationError {
    fn from(err: InvalidHandlerDefinition) -> Self {
        RegistrationError::InvalidDefinition(err)
    }
}

impl From<SubscriptionError> for RegistrationError {
    fn from(err: SubscriptionError) -> Self {
        RegistrationError::Subscription(err)
    }
}
