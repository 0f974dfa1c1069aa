//! Dispatch adapter — wraps a target object so a command bus can route to it.
//!
//! ## Lifecycle
//!
//! ```text
//! Built ──subscribe()──▶ Subscribed ──unsubscribe()──▶ Unsubscribed
//! ```
//!
//! There is no way back from `Unsubscribed`; build a new adapter instead.

mod adapter;
mod error;

pub use adapter::{AdapterState, AnnotationCommandHandlerAdapter};
pub use error::SubscriptionError;
