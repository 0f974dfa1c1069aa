//! `AnnotationCommandHandlerAdapter` — registry-backed dispatch plus bus bookkeeping.

use std::any::{type_name, Any};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::bus::{CommandBus, CommandHandler};
use crate::command::{CommandContext, CommandMessage, CommandType, Outcome};
use crate::error::DispatchError;
use crate::registry::{CommandHandlers, HandlerBinding, HandlerRegistry, InvalidHandlerDefinition};

use super::error::SubscriptionError;

/// Where an adapter is in its subscription lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Built,
    Subscribed,
    Unsubscribed,
}

/// Exposes the command handlers of a target object as a single
/// `CommandHandler` a bus can subscribe.
///
/// The adapter holds the target by `Arc`. Code that needs the target's own
/// methods keeps its own clone of that `Arc` (or calls `target()`).
///
/// The bus is held weakly. A subscribed bus owns the adapter, so dropping
/// the last handle to the bus releases the adapter and its target even if
/// `unsubscribe` was never called.
///
/// ## Example
///
/// ```ignore
/// let inventory = Arc::new(Inventory::default());
/// let adapter = AnnotationCommandHandlerAdapter::new(inventory.clone(), bus.clone())?;
/// adapter.subscribe()?;
///
/// let outcome = adapter.dispatch(CommandMessage::new(Restock::new("A1", 3)), &CommandContext::new())?;
/// assert!(outcome.is_void());
///
/// adapter.unsubscribe()?;
/// ```
pub struct AnnotationCommandHandlerAdapter<T> {
    registry: HandlerRegistry<T>,
    bus: Weak<dyn CommandBus>,
    state: Mutex<AdapterState>,
    this: Weak<Self>,
}

impl<T: CommandHandlers> AnnotationCommandHandlerAdapter<T> {
    /// Wrap `target`, building the registry it declares.
    pub fn new(
        target: Arc<T>,
        bus: Arc<dyn CommandBus>,
    ) -> Result<Arc<Self>, InvalidHandlerDefinition> {
        Ok(Self::from_registry(HandlerRegistry::build(target)?, bus))
    }
}

impl<T: Send + Sync + 'static> AnnotationCommandHandlerAdapter<T> {
    /// Wrap a registry built by hand.
    pub fn from_registry(registry: HandlerRegistry<T>, bus: Arc<dyn CommandBus>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            registry,
            bus: Arc::downgrade(&bus),
            state: Mutex::new(AdapterState::Built),
            this: this.clone(),
        })
    }

    /// Dispatch a command to the handler for its exact runtime type.
    ///
    /// Void handlers yield `Outcome::Void`; value handlers yield their value
    /// unmodified. A failing handler's error comes back as
    /// `DispatchError::Handler` holding the original error.
    pub fn dispatch(
        &self,
        command: CommandMessage,
        context: &CommandContext,
    ) -> Result<Outcome, DispatchError> {
        let command_type = command.command_type();
        tracing::trace!(%command_type, target_type = type_name::<T>(), "dispatching command");
        self.registry.dispatch(command, context)
    }

    /// Dispatch a plain command value.
    pub fn dispatch_command<C: Any + Send>(
        &self,
        command: C,
        context: &CommandContext,
    ) -> Result<Outcome, DispatchError> {
        self.dispatch(CommandMessage::new(command), context)
    }

    /// The binding that would handle `command`, probed by its runtime type.
    pub fn find_handler_for(&self, command: &dyn Any) -> Option<&HandlerBinding<T>> {
        self.registry.find_handler_for(command)
    }

    /// Every command type this adapter can dispatch.
    pub fn accepted_types(&self) -> HashSet<CommandType> {
        self.registry.command_types().collect()
    }

    /// The wrapped object.
    pub fn target(&self) -> &Arc<T> {
        self.registry.target()
    }

    pub fn registry(&self) -> &HandlerRegistry<T> {
        &self.registry
    }

    pub fn state(&self) -> AdapterState {
        *self.lock_state()
    }

    /// Register this adapter with the bus for every accepted type.
    ///
    /// Calling it again registers again; what that means is up to the bus.
    /// If the bus fails on a first subscription, the registrations already
    /// made are removed and any handlers they displaced are subscribed back
    /// before the error is returned.
    pub fn subscribe(&self) -> Result<(), SubscriptionError> {
        let mut state = self.lock_state();
        if *state == AdapterState::Unsubscribed {
            return Err(SubscriptionError::AlreadyUnsubscribed);
        }

        let bus = self.bus.upgrade().ok_or(SubscriptionError::BusDropped)?;
        let handler = self.as_handler()?;
        let mut subscribed = Vec::new();
        for command_type in self.registry.command_types() {
            match bus.subscribe(command_type, handler.clone()) {
                Ok(displaced) => subscribed.push((command_type, displaced)),
                Err(err) => {
                    if *state == AdapterState::Built {
                        rollback(&*bus, subscribed, &handler);
                    }
                    return Err(SubscriptionError::Bus(err));
                }
            }
        }

        *state = AdapterState::Subscribed;
        tracing::debug!(
            target_type = type_name::<T>(),
            command_types = subscribed.len(),
            "subscribed command handler adapter"
        );
        Ok(())
    }

    /// Remove this adapter from the bus for every accepted type.
    ///
    /// Every type is attempted even if the bus fails on one; the first error
    /// is returned. The adapter ends up `Unsubscribed` either way, including
    /// when the bus is already gone.
    pub fn unsubscribe(&self) -> Result<(), SubscriptionError> {
        let mut state = self.lock_state();
        *state = AdapterState::Unsubscribed;

        let bus = self.bus.upgrade().ok_or(SubscriptionError::BusDropped)?;
        let handler = self.as_handler()?;
        let mut first_error = None;
        for command_type in self.registry.command_types() {
            if let Err(err) = bus.unsubscribe(command_type, &handler) {
                tracing::warn!(%command_type, error = %err, "failed to unsubscribe command handler");
                first_error.get_or_insert(err);
            }
        }

        tracing::debug!(target_type = type_name::<T>(), "unsubscribed command handler adapter");

        match first_error {
            Some(err) => Err(SubscriptionError::Bus(err)),
            None => Ok(()),
        }
    }

    // The state is a plain value, so a panic elsewhere cannot leave it torn.
    fn lock_state(&self) -> MutexGuard<'_, AdapterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn as_handler(&self) -> Result<Arc<dyn CommandHandler>, SubscriptionError> {
        let this: Arc<dyn CommandHandler> =
            self.this.upgrade().ok_or(SubscriptionError::Detached)?;
        Ok(this)
    }
}

fn rollback(
    bus: &dyn CommandBus,
    subscribed: Vec<(CommandType, Option<Arc<dyn CommandHandler>>)>,
    handler: &Arc<dyn CommandHandler>,
) {
    for (command_type, displaced) in subscribed {
        if let Err(err) = bus.unsubscribe(command_type, handler) {
            tracing::warn!(%command_type, error = %err, "failed to roll back subscription");
        }
        if let Some(displaced) = displaced {
            if let Err(err) = bus.subscribe(command_type, displaced) {
                tracing::warn!(%command_type, error = %err, "failed to restore displaced handler");
            }
        }
    }
}

impl<T: Send + Sync + 'static> CommandHandler for AnnotationCommandHandlerAdapter<T> {
    fn handle(
        &self,
        command: CommandMessage,
        context: &CommandContext,
    ) -> Result<Outcome, DispatchError> {
        self.dispatch(command, context)
    }
}

impl<T> fmt::Debug for AnnotationCommandHandlerAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationCommandHandlerAdapter")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
