//! Type-keyed command handler adapters.
//!
//! Mark the command handling methods of a plain struct, wrap it in an
//! adapter, and subscribe the adapter to a command bus. Commands are routed
//! by their exact runtime type.
//!
//! ```ignore
//! use command_adapter::{command_handlers, CommandContext};
//!
//! #[derive(Default)]
//! struct Inventory { stock: Mutex<HashMap<String, u32>> }
//!
//! #[command_handlers]
//! impl Inventory {
//!     #[command_handler]
//!     fn restock(&self, command: Restock) { /* ... */ }
//!
//!     #[command_handler]
//!     fn reserve(&self, command: Reserve, ctx: &CommandContext) -> Result<u32, OutOfStock> { /* ... */ }
//! }
//!
//! let bus = Arc::new(SimpleCommandBus::new());
//! let adapter = AnnotationCommandHandlerAdapter::new(Arc::new(Inventory::default()), bus.clone())?;
//! adapter.subscribe()?;
//!
//! let outcome = bus.dispatch(CommandMessage::new(Restock::new("A1", 5)), CommandContext::new())?;
//! assert!(outcome.is_void());
//! ```

mod adapter;
pub mod bus;
mod command;
mod error;
mod registrar;
mod registry;

pub use adapter::{AdapterState, AnnotationCommandHandlerAdapter, SubscriptionError};
#[cfg(feature = "bus")]
pub use bus::SimpleCommandBus;
pub use bus::{BusError, CommandBus, CommandHandler};
pub use command::{CommandContext, CommandMessage, CommandType, Outcome};
pub use error::{DispatchError, HandlerFailure};
pub use registrar::{HandlerRegistrar, RegistrationError};
pub use registry::{
    CommandHandlers, HandlerBinding, HandlerRegistry, HandlerRegistryBuilder, HandlerShape,
    IntoHandlerResult, InvalidHandlerDefinition,
};

// Re-export the handler declaration macros (requires "macros" feature)
#[cfg(feature = "macros")]
pub use command_adapter_macros::{command_handler, command_handlers};
