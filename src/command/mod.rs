//! Command values and the side channels that travel with them.
//!
//! Commands are plain Rust values. They are dispatched by their exact
//! runtime type, so before crossing a handler boundary they are erased into
//! a `CommandMessage` that remembers its `CommandType`.

mod command_type;
mod context;
mod message;
mod outcome;

pub use command_type::CommandType;
pub use context::CommandContext;
pub use message::CommandMessage;
pub use outcome::Outcome;
