//! Explicit handler registration.

use std::any::{type_name, Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use crate::command::{CommandContext, CommandMessage, CommandType, Outcome};
use crate::error::{DispatchError, HandlerFailure};

use super::binding::{HandlerBinding, HandlerShape};
use super::error::InvalidHandlerDefinition;
use super::registry::HandlerRegistry;

/// Collects handler bindings for a target type `T`.
///
/// Uses builder pattern — every registration returns `self` for chaining.
/// Nothing is validated until `build()`.
pub struct HandlerRegistryBuilder<T> {
    bindings: Vec<HandlerBinding<T>>,
}

impl<T: Send + Sync + 'static> HandlerRegistryBuilder<T> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Register a handler with an explicit shape.
    ///
    /// This is the form `#[command_handlers]` expands to. The handler always
    /// receives a context; if `shape.accepts_context` is false it is an
    /// empty one. For void shapes the returned outcome is discarded.
    pub fn bind<C, F>(mut self, method: &'static str, shape: HandlerShape, handler: F) -> Self
    where
        C: Any + Send,
        F: Fn(&T, C, &CommandContext) -> Result<Outcome, HandlerFailure> + Send + Sync + 'static,
    {
        let command_type = CommandType::of::<C>();
        let invoker = move |target: &T,
                            command: CommandMessage,
                            ctx: &CommandContext|
              -> Result<Outcome, DispatchError> {
            let command = command
                .downcast::<C>()
                .map_err(|message| DispatchError::Invocation {
                    command_type: message.command_type(),
                    method,
                    reason: format!("expected command of type {}", command_type),
                })?;
            handler(target, command, ctx).map_err(DispatchError::Handler)
        };
        self.bindings.push(HandlerBinding::new(
            command_type,
            method,
            shape,
            Box::new(invoker),
        ));
        self
    }

    /// Register a handler that returns a value.
    pub fn command<C, R, E, F>(self, method: &'static str, handler: F) -> Self
    where
        C: Any + Send,
        R: Any + Send,
        E: Into<HandlerFailure>,
        F: Fn(&T, C) -> Result<R, E> + Send + Sync + 'static,
    {
        self.bind(method, HandlerShape::new(false, true), move |target, command: C, _ctx| {
            handler(target, command).map(Outcome::value).map_err(Into::into)
        })
    }

    /// Register a handler that returns a value and reads the context.
    pub fn command_with_context<C, R, E, F>(self, method: &'static str, handler: F) -> Self
    where
        C: Any + Send,
        R: Any + Send,
        E: Into<HandlerFailure>,
        F: Fn(&T, C, &CommandContext) -> Result<R, E> + Send + Sync + 'static,
    {
        self.bind(method, HandlerShape::new(true, true), move |target, command: C, ctx| {
            handler(target, command, ctx).map(Outcome::value).map_err(Into::into)
        })
    }

    /// Register a handler without a result.
    pub fn void_command<C, E, F>(self, method: &'static str, handler: F) -> Self
    where
        C: Any + Send,
        E: Into<HandlerFailure>,
        F: Fn(&T, C) -> Result<(), E> + Send + Sync + 'static,
    {
        self.bind(method, HandlerShape::new(false, false), move |target, command: C, _ctx| {
            handler(target, command).map(|()| Outcome::Void).map_err(Into::into)
        })
    }

    /// Register a handler without a result that reads the context.
    pub fn void_command_with_context<C, E, F>(self, method: &'static str, handler: F) -> Self
    where
        C: Any + Send,
        E: Into<HandlerFailure>,
        F: Fn(&T, C, &CommandContext) -> Result<(), E> + Send + Sync + 'static,
    {
        self.bind(method, HandlerShape::new(true, false), move |target, command: C, ctx| {
            handler(target, command, ctx).map(|()| Outcome::Void).map_err(Into::into)
        })
    }

    /// Validate the collected bindings and tie them to `target`.
    pub fn build(self, target: Arc<T>) -> Result<HandlerRegistry<T>, InvalidHandlerDefinition> {
        let mut bindings: HashMap<TypeId, HandlerBinding<T>> =
            HashMap::with_capacity(self.bindings.len());

        for binding in self.bindings {
            let command_type = binding.command_type();
            if command_type.is::<CommandContext>() || command_type.is::<CommandMessage>() {
                return Err(InvalidHandlerDefinition::ReservedCommandType {
                    command_type,
                    method: binding.method_name(),
                });
            }

            match bindings.entry(command_type.id()) {
                Entry::Occupied(existing) => {
                    return Err(InvalidHandlerDefinition::DuplicateCommandType {
                        command_type,
                        first: existing.get().method_name(),
                        second: binding.method_name(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(binding);
                }
            }
        }

        tracing::debug!(
            target_type = type_name::<T>(),
            handlers = bindings.len(),
            "built command handler registry"
        );

        Ok(HandlerRegistry::new(target, bindings))
    }
}

impl<T: Send + Sync + 'static> Default for HandlerRegistryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
