use std::any::type_name;
use std::sync::Arc;

use crate::adapter::{AnnotationCommandHandlerAdapter, SubscriptionError};
use crate::bus::CommandBus;
use crate::registry::{CommandHandlers, HandlerRegistry};

use super::error::RegistrationError;

/// Type-erased view of an adapter the registrar has to tear down.
trait ManagedAdapter: Send + Sync {
    fn unsubscribe(&self) -> Result<(), SubscriptionError>;
    fn target_type(&self) -> &'static str;
}

impl<T: Send + Sync + 'static> ManagedAdapter for AnnotationCommandHandlerAdapter<T> {
    fn unsubscribe(&self) -> Result<(), SubscriptionError> {
        AnnotationCommandHandlerAdapter::unsubscribe(self)
    }

    fn target_type(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Wraps handler objects into adapters and keeps them subscribed to one bus
/// until they are deregistered or the registrar is dropped.
pub struct HandlerRegistrar {
    bus: Arc<dyn CommandBus>,
    adapters: Vec<Arc<dyn ManagedAdapter>>,
}

impl HandlerRegistrar {
    pub fn new(bus: Arc<dyn CommandBus>) -> Self {
        Self {
            bus,
            adapters: Vec::new(),
        }
    }

    /// The bus adapters are subscribed to.
    pub fn bus(&self) -> &Arc<dyn CommandBus> {
        &self.bus
    }

    /// Wrap `target` in an adapter and subscribe it.
    ///
    /// The caller keeps its own `Arc` to `target` for calling the target's
    /// own methods.
    pub fn register<T: CommandHandlers>(
        &mut self,
        target: Arc<T>,
    ) -> Result<Arc<AnnotationCommandHandlerAdapter<T>>, RegistrationError> {
        let registry = HandlerRegistry::build(target)?;
        self.register_registry(registry)
    }

    /// Subscribe a registry built by hand.
    pub fn register_registry<T: Send + Sync + 'static>(
        &mut self,
        registry: HandlerRegistry<T>,
    ) -> Result<Arc<AnnotationCommandHandlerAdapter<T>>, RegistrationError> {
        let adapter = AnnotationCommandHandlerAdapter::from_registry(registry, self.bus.clone());
        adapter.subscribe()?;
        self.adapters.push(adapter.clone());
        tracing::debug!(target_type = type_name::<T>(), "registered command handlers");
        Ok(adapter)
    }

    /// Unsubscribe an adapter created by this registrar.
    ///
    /// Returns `false` if the adapter is not (or no longer) registered here.
    pub fn deregister<T: Send + Sync + 'static>(
        &mut self,
        adapter: &Arc<AnnotationCommandHandlerAdapter<T>>,
    ) -> Result<bool, RegistrationError> {
        let address = Arc::as_ptr(adapter) as *const ();
        let position = self
            .adapters
            .iter()
            .position(|managed| Arc::as_ptr(managed) as *const () == address);

        match position {
            Some(index) => {
                let managed = self.adapters.remove(index);
                managed.unsubscribe()?;
                tracing::debug!(target_type = managed.target_type(), "deregistered command handlers");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of adapters currently registered.
    pub fn registered(&self) -> usize {
        self.adapters.len()
    }

    /// Unsubscribe every registered adapter.
    ///
    /// All adapters are attempted; the first failure is returned.
    pub fn shutdown(&mut self) -> Result<(), RegistrationError> {
        let mut first_error = None;
        for managed in self.adapters.drain(..) {
            if let Err(err) = managed.unsubscribe() {
                tracing::warn!(
                    target_type = managed.target_type(),
                    error = %err,
                    "failed to unsubscribe command handlers"
                );
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(RegistrationError::Subscription(err)),
            None => Ok(()),
        }
    }
}

impl Drop for HandlerRegistrar {
    fn drop(&mut self) {
        // Failures are already logged by shutdown.
        let _ = self.shutdown();
    }
}
