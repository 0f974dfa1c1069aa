use std::fmt;

use crate::command::CommandType;

/// A target's handler declarations cannot be turned into a registry.
///
/// Shape problems in methods marked `#[command_handler]` (arity, receiver,
/// context parameter) are rejected by the macro at compile time. What is
/// left for build time is listed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidHandlerDefinition {
    /// Two handler methods accept the same command type.
    DuplicateCommandType {
        command_type: CommandType,
        first: &'static str,
        second: &'static str,
    },
    /// The command parameter uses a type reserved by the dispatcher.
    ReservedCommandType {
        command_type: CommandType,
        method: &'static str,
    },
}

impl fmt::Display for InvalidHandlerDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidHandlerDefinition::DuplicateCommandType {
                command_type,
                first,
                second,
            } => write!(
                f,
                "handlers {} and {} both accept command type {}",
                first, second, command_type
            ),
            InvalidHandlerDefinition::ReservedCommandType {
                command_type,
                method,
            } => write!(
                f,
                "handler {} cannot accept reserved type {} as its command",
                method, command_type
            ),
        }
    }
}

impl std::error::Error for InvalidHandlerDefinition {}
