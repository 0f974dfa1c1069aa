//! Handler registrar — explicit wiring of handler objects to a bus.
//!
//! The registrar owns the startup/shutdown half of an adapter's life:
//! `register` wraps and subscribes, `deregister` unsubscribes, and dropping
//! the registrar unsubscribes whatever is still registered.
//!
//! ```ignore
//! let mut registrar = HandlerRegistrar::new(bus.clone());
//! let orders = registrar.register(Arc::new(OrderHandlers::new(repo)))?;
//! let payments = registrar.register(Arc::new(PaymentHandlers::default()))?;
//!
//! bus.dispatch(CommandMessage::new(PlaceOrder { .. }), CommandContext::new())?;
//!
//! registrar.shutdown()?;
//! ```

mod error;
mod registrar;

pub use error::RegistrationError;
pub use registrar::HandlerRegistrar;
