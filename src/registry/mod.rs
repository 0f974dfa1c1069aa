//! Handler registry — the immutable table from command type to handler.
//!
//! A registry is built once per target object, either from the table
//! generated by `#[command_handlers]` or from explicit registration calls:
//!
//! ```ignore
//! let registry = HandlerRegistry::builder()
//!     .void_command("rename", |inventory: &Inventory, cmd: Rename| inventory.rename(cmd))
//!     .command_with_context("reserve", |inventory: &Inventory, cmd: Reserve, ctx: &CommandContext| {
//!         inventory.reserve(cmd, ctx.correlation_id())
//!     })
//!     .build(Arc::new(Inventory::default()))?;
//! ```

mod binding;
mod builder;
mod error;
mod registry;

pub use binding::{HandlerBinding, HandlerShape, IntoHandlerResult};
pub use builder::HandlerRegistryBuilder;
pub use error::InvalidHandlerDefinition;
pub use registry::{CommandHandlers, HandlerRegistry};
