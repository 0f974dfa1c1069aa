//! Command Bus - the publish/subscribe contract adapters plug into.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   CommandBus (per process)                  │
//! │  subscribe(type, handler) / unsubscribe(type, handler)      │
//! │  dispatch(command, context)                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                            │  one handler per command type
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  CommandHandler (trait object)              │
//! │  handle(command, context) -> Outcome                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │        AnnotationCommandHandlerAdapter<T> → HandlerRegistry │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The adapter only relies on `subscribe`/`unsubscribe`. How a bus routes
//! and delivers is up to the implementation; `SimpleCommandBus` is the
//! in-process one shipped with the crate.

mod command_bus;
mod error;
#[cfg(feature = "bus")]
mod simple;

pub use command_bus::{CommandBus, CommandHandler};
pub use error::BusError;
#[cfg(feature = "bus")]
pub use simple::SimpleCommandBus;
