//! Core traits for the command bus.

use std::sync::Arc;

use crate::command::{CommandContext, CommandMessage, CommandType, Outcome};
use crate::error::DispatchError;

use super::error::BusError;

/// Something a bus can route commands to.
///
/// Dispatch is synchronous: `handle` runs the handler to completion (or
/// failure) before returning.
pub trait CommandHandler: Send + Sync {
    fn handle(
        &self,
        command: CommandMessage,
        context: &CommandContext,
    ) -> Result<Outcome, DispatchError>;
}

/// Trait for a bus that routes commands to handlers by command type.
///
/// Implementations decide what a duplicate subscription or the removal of
/// an unknown one means. Handlers are identified by `Arc` identity.
pub trait CommandBus: Send + Sync {
    /// Register `handler` as the dispatch target for `command_type`.
    ///
    /// Returns the handler this registration displaced, if the bus replaces
    /// rather than adds.
    fn subscribe(
        &self,
        command_type: CommandType,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<Option<Arc<dyn CommandHandler>>, BusError>;

    /// Remove a registration made with `subscribe`.
    fn unsubscribe(
        &self,
        command_type: CommandType,
        handler: &Arc<dyn CommandHandler>,
    ) -> Result<(), BusError>;

    /// Route a command to the handler subscribed for its type.
    fn dispatch(
        &self,
        command: CommandMessage,
        context: CommandContext,
    ) -> Result<Outcome, DispatchError>;
}
