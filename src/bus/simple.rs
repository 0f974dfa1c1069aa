//! In-process command bus.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::command::{CommandContext, CommandMessage, CommandType, Outcome};
use crate::error::DispatchError;

use super::command_bus::{CommandBus, CommandHandler};
use super::error::BusError;

/// A command bus that dispatches on the calling thread.
///
/// Holds at most one handler per command type. Subscribing a second handler
/// for a type replaces the first; unsubscribing only removes the handler if
/// it is the one currently registered.
///
/// ## Example
///
/// ```ignore
/// let bus = Arc::new(SimpleCommandBus::new());
/// let adapter = AnnotationCommandHandlerAdapter::new(Arc::new(Inventory::default()), bus.clone())?;
/// adapter.subscribe()?;
///
/// let outcome = bus.dispatch(CommandMessage::new(Restock { sku: "A1".into() }), CommandContext::new())?;
/// assert!(outcome.is_void());
/// ```
#[derive(Default)]
pub struct SimpleCommandBus {
    subscriptions: RwLock<HashMap<CommandType, Arc<dyn CommandHandler>>>,
}

impl SimpleCommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any handler is subscribed for `command_type`.
    pub fn is_subscribed(&self, command_type: CommandType) -> Result<bool, BusError> {
        let subscriptions = self
            .subscriptions
            .read()
            .map_err(|_| BusError::LockPoisoned("read"))?;
        Ok(subscriptions.contains_key(&command_type))
    }

    /// Number of command types with a subscribed handler.
    pub fn subscription_count(&self) -> Result<usize, BusError> {
        let subscriptions = self
            .subscriptions
            .read()
            .map_err(|_| BusError::LockPoisoned("read"))?;
        Ok(subscriptions.len())
    }
}

impl CommandBus for SimpleCommandBus {
    fn subscribe(
        &self,
        command_type: CommandType,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<Option<Arc<dyn CommandHandler>>, BusError> {
        let mut subscriptions = self
            .subscriptions
            .write()
            .map_err(|_| BusError::LockPoisoned("subscribe"))?;
        let displaced = subscriptions.insert(command_type, handler);
        if displaced.is_some() {
            tracing::warn!(%command_type, "replaced existing command handler subscription");
        }
        Ok(displaced)
    }

    fn unsubscribe(
        &self,
        command_type: CommandType,
        handler: &Arc<dyn CommandHandler>,
    ) -> Result<(), BusError> {
        let mut subscriptions = self
            .subscriptions
            .write()
            .map_err(|_| BusError::LockPoisoned("unsubscribe"))?;
        let registered = subscriptions
            .get(&command_type)
            .is_some_and(|current| Arc::ptr_eq(current, handler));
        if registered {
            subscriptions.remove(&command_type);
        }
        Ok(())
    }

    fn dispatch(
        &self,
        command: CommandMessage,
        context: CommandContext,
    ) -> Result<Outcome, DispatchError> {
        let command_type = command.command_type();
        // Clone the handler out so the lock is not held while it runs.
        let handler = match self.subscriptions.read() {
            Ok(subscriptions) => subscriptions.get(&command_type).cloned(),
            Err(_) => {
                return Err(DispatchError::Invocation {
                    command_type,
                    method: "SimpleCommandBus::dispatch",
                    reason: "bus lock poisoned".to_string(),
                })
            }
        };

        match handler {
            Some(handler) => handler.handle(command, &context),
            None => {
                tracing::debug!(%command_type, "no handler subscribed for command");
                Err(DispatchError::NoHandlerForCommand(command_type))
            }
        }
    }
}
