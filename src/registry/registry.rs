//! The built registry and the trait targets implement to describe themselves.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::command::{CommandContext, CommandMessage, CommandType, Outcome};
use crate::error::DispatchError;

use super::binding::HandlerBinding;
use super::builder::HandlerRegistryBuilder;
use super::error::InvalidHandlerDefinition;

/// Implemented by types that declare their own command handlers.
///
/// Usually generated by `#[command_handlers]` from the methods marked
/// `#[command_handler]`, but can be written by hand:
///
/// ```ignore
/// impl CommandHandlers for Inventory {
///     fn register_handlers(handlers: HandlerRegistryBuilder<Self>) -> HandlerRegistryBuilder<Self> {
///         handlers.void_command("restock", Inventory::restock)
///     }
/// }
/// ```
pub trait CommandHandlers: Send + Sync + Sized + 'static {
    fn register_handlers(handlers: HandlerRegistryBuilder<Self>) -> HandlerRegistryBuilder<Self>;
}

/// Immutable mapping from command type to the binding that handles it,
/// tied to one target instance.
pub struct HandlerRegistry<T> {
    target: Arc<T>,
    bindings: HashMap<TypeId, HandlerBinding<T>>,
}

impl<T: CommandHandlers> HandlerRegistry<T> {
    /// Build the registry `T` declares for itself.
    pub fn build(target: Arc<T>) -> Result<Self, InvalidHandlerDefinition> {
        T::register_handlers(HandlerRegistryBuilder::new()).build(target)
    }
}

impl<T: Send + Sync + 'static> HandlerRegistry<T> {
    /// Start an explicit registration table.
    pub fn builder() -> HandlerRegistryBuilder<T> {
        HandlerRegistryBuilder::new()
    }

    pub(crate) fn new(target: Arc<T>, bindings: HashMap<TypeId, HandlerBinding<T>>) -> Self {
        Self { target, bindings }
    }

    /// The object every binding is invoked on.
    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    /// The binding for an exact command type.
    pub fn get(&self, command_type: CommandType) -> Option<&HandlerBinding<T>> {
        self.bindings.get(&command_type.id())
    }

    /// The binding that would handle `command`.
    pub fn find_handler(&self, command: &CommandMessage) -> Option<&HandlerBinding<T>> {
        self.get(command.command_type())
    }

    /// The binding that would handle a plain command value, probed by the
    /// value's own runtime type.
    pub fn find_handler_for(&self, command: &dyn Any) -> Option<&HandlerBinding<T>> {
        self.bindings.get(&command.type_id())
    }

    /// Every command type with a binding, in no particular order.
    pub fn command_types(&self) -> impl Iterator<Item = CommandType> + '_ {
        self.bindings.values().map(HandlerBinding::command_type)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &HandlerBinding<T>> {
        self.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Resolve `command` by its exact type and invoke the binding on the
    /// registry's target.
    pub fn dispatch(
        &self,
        command: CommandMessage,
        context: &CommandContext,
    ) -> Result<Outcome, DispatchError> {
        let binding = self
            .find_handler(&command)
            .ok_or_else(|| DispatchError::NoHandlerForCommand(command.command_type()))?;
        binding.invoke(&self.target, command, context)
    }
}

impl<T> fmt::Debug for HandlerRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("target", &std::any::type_name::<T>())
            .field("bindings", &self.bindings.values().collect::<Vec<_>>())
            .finish()
    }
}
