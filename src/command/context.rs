//! Invocation context handed to handlers that ask for one.
//!
//! Carries metadata about the dispatch request (correlation IDs, the
//! acting user, tracing headers) alongside the command itself. Handlers
//! opt in by declaring a second `&CommandContext` parameter.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const CORRELATION_ID: &str = "correlation-id";

/// Metadata about a single dispatch request.
///
/// ## Example
///
/// ```ignore
/// let ctx = CommandContext::new()
///     .with("correlation-id", "req-42")
///     .with("attempt", 1);
///
/// assert_eq!(ctx.correlation_id(), Some("req-42"));
/// let attempt: Option<u32> = ctx.get_as("attempt")?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandContext {
    #[serde(default)]
    metadata: HashMap<String, Value>,
}

impl CommandContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context from string metadata, e.g. transport headers.
    pub fn from_map(metadata: HashMap<String, String>) -> Self {
        Self {
            metadata: metadata
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        }
    }

    /// Add a metadata entry. Builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a metadata entry, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Get a raw metadata value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Deserialize a metadata value into a typed value.
    ///
    /// Returns `Ok(None)` when the key is absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        self.metadata
            .get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }

    pub fn has(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.metadata.keys().map(|k| k.as_str())
    }

    /// The `correlation-id` entry, when it is a string.
    pub fn correlation_id(&self) -> Option<&str> {
        self.get(CORRELATION_ID).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }
}
