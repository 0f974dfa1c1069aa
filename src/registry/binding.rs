//! A single resolved handler method.

use std::fmt;

use crate::command::{CommandContext, CommandMessage, CommandType, Outcome};
use crate::error::{DispatchError, HandlerFailure};

/// How a handler method is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandlerShape {
    /// The method takes a `&CommandContext` after the command.
    pub accepts_context: bool,
    /// The method declares a result. Void handlers dispatch to `Outcome::Void`.
    pub has_return_value: bool,
}

impl HandlerShape {
    pub const fn new(accepts_context: bool, has_return_value: bool) -> Self {
        Self {
            accepts_context,
            has_return_value,
        }
    }
}

/// The `Result` a fallible handler method returns, under whatever alias it
/// is spelled with (`io::Result<T>`, `fmt::Result`, a crate's own alias).
///
/// Generated handler tables call this on every return type named like a
/// `Result`, so only real `Result`s are accepted there.
pub trait IntoHandlerResult {
    type Ok;

    fn into_handler_result(self) -> Result<Self::Ok, HandlerFailure>;
}

impl<R, E> IntoHandlerResult for Result<R, E>
where
    E: Into<HandlerFailure>,
{
    type Ok = R;

    fn into_handler_result(self) -> Result<R, HandlerFailure> {
        self.map_err(Into::into)
    }
}

type Invoker<T> =
    Box<dyn Fn(&T, CommandMessage, &CommandContext) -> Result<Outcome, DispatchError> + Send + Sync>;

/// The association between one command type and the method handling it.
///
/// Bindings are created by `HandlerRegistryBuilder` and owned by the
/// registry they were built into. They never change afterwards.
pub struct HandlerBinding<T> {
    command_type: CommandType,
    method_name: &'static str,
    shape: HandlerShape,
    invoker: Invoker<T>,
}

impl<T> HandlerBinding<T> {
    pub(crate) fn new(
        command_type: CommandType,
        method_name: &'static str,
        shape: HandlerShape,
        invoker: Invoker<T>,
    ) -> Self {
        Self {
            command_type,
            method_name,
            shape,
            invoker,
        }
    }

    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    /// Name of the handler method. Informational only, never used for routing.
    pub fn method_name(&self) -> &'static str {
        self.method_name
    }

    pub fn shape(&self) -> HandlerShape {
        self.shape
    }

    pub fn accepts_context(&self) -> bool {
        self.shape.accepts_context
    }

    pub fn has_return_value(&self) -> bool {
        self.shape.has_return_value
    }

    /// Call the handler method on `target`.
    ///
    /// The context only reaches handlers that declare it; others see an
    /// empty one. A command of the wrong type is an invocation failure, not
    /// a handler failure.
    pub fn invoke(
        &self,
        target: &T,
        command: CommandMessage,
        context: &CommandContext,
    ) -> Result<Outcome, DispatchError> {
        if command.command_type() != self.command_type {
            return Err(DispatchError::Invocation {
                command_type: command.command_type(),
                method: self.method_name,
                reason: format!("binding accepts {}", self.command_type),
            });
        }

        let outcome = if self.shape.accepts_context {
            (self.invoker)(target, command, context)?
        } else {
            (self.invoker)(target, command, &CommandContext::default())?
        };

        match (self.shape.has_return_value, outcome) {
            (false, _) => Ok(Outcome::Void),
            (true, Outcome::Void) => Err(DispatchError::Invocation {
                command_type: self.command_type,
                method: self.method_name,
                reason: "handler declares a result but produced none".to_string(),
            }),
            (true, value) => Ok(value),
        }
    }
}

impl<T> fmt::Debug for HandlerBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("command_type", &self.command_type)
            .field("method_name", &self.method_name)
            .field("shape", &self.shape)
            .finish()
    }
}
