use std::error::Error;
use std::fmt;

use crate::command::CommandType;

/// A failure raised by a handler body, kept exactly as the handler
/// produced it.
pub type HandlerFailure = Box<dyn Error + Send + Sync>;

/// Error type for dispatching a command.
///
/// Callers can tell a routing problem (`NoHandlerForCommand`) apart from
/// a business rejection (`Handler`) and from a broken binding
/// (`Invocation`).
#[derive(Debug)]
pub enum DispatchError {
    /// No binding exists for the command's exact runtime type.
    NoHandlerForCommand(CommandType),
    /// The handler body failed. The original error is carried unwrapped.
    Handler(HandlerFailure),
    /// The dispatch plumbing itself failed to call the handler.
    Invocation {
        command_type: CommandType,
        method: &'static str,
        reason: String,
    },
}

impl DispatchError {
    pub fn is_no_handler(&self) -> bool {
        matches!(self, DispatchError::NoHandlerForCommand(_))
    }

    /// Borrow the handler's own error as `E`, if this is a handler failure
    /// of that type.
    pub fn handler_error<E: Error + 'static>(&self) -> Option<&E> {
        match self {
            DispatchError::Handler(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Take the handler's original error. Other categories are returned
    /// unchanged.
    pub fn into_handler_error(self) -> Result<HandlerFailure, Self> {
        match self {
            DispatchError::Handler(err) => Ok(err),
            other => Err(other),
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NoHandlerForCommand(command_type) => {
                write!(f, "no handler for command: {}", command_type)
            }
            DispatchError::Handler(err) => write!(f, "{}", err),
            DispatchError::Invocation {
                command_type,
                method,
                reason,
            } => write!(
                f,
                "failed to invoke handler {} for command {}: {}",
                method, command_type, reason
            ),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchError::Handler(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
