//! Type-erased command values.

use std::any::Any;
use std::fmt;

use super::CommandType;

/// An owned command value whose concrete type is only known at runtime.
///
/// ```ignore
/// let message = CommandMessage::new(CreateOrder { id: "o1".into() });
/// assert!(message.is::<CreateOrder>());
/// let command: CreateOrder = message.downcast().unwrap();
/// ```
pub struct CommandMessage {
    command_type: CommandType,
    payload: Box<dyn Any + Send>,
}

impl CommandMessage {
    /// Wrap a command value.
    pub fn new<C: Any + Send>(command: C) -> Self {
        Self {
            command_type: CommandType::of::<C>(),
            payload: Box::new(command),
        }
    }

    /// The exact runtime type of the wrapped command.
    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    pub fn is<C: Any>(&self) -> bool {
        self.payload.is::<C>()
    }

    /// Borrow the command as `C`, if that is its type.
    pub fn downcast_ref<C: Any>(&self) -> Option<&C> {
        self.payload.downcast_ref::<C>()
    }

    /// Take the command back as `C`. Returns the message unchanged on a
    /// type mismatch.
    pub fn downcast<C: Any>(self) -> Result<C, Self> {
        let command_type = self.command_type;
        match self.payload.downcast::<C>() {
            Ok(command) => Ok(*command),
            Err(payload) => Err(Self {
                command_type,
                payload,
            }),
        }
    }

    /// The erased value as `&dyn Any`, carrying the command's own type.
    pub fn as_any(&self) -> &(dyn Any + Send) {
        self.payload.as_ref()
    }
}

impl fmt::Debug for CommandMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandMessage")
            .field("command_type", &self.command_type)
            .finish_non_exhaustive()
    }
}
