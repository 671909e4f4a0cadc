use std::collections::HashMap;
use std::sync::Arc;

use crate::connector::ExchangeConnector;
use crate::types::CandelaError;

/// Holds one upstream client per exchange and routes by exchange name.
#[derive(Default)]
pub struct ConnectorRegistry {
    connectors: HashMap<String, Arc<dyn ExchangeConnector>>,
}

impl ConnectorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connector under its own name. Registering a second
    /// connector with the same name replaces the first.
    pub fn register(&mut self, connector: Arc<dyn ExchangeConnector>) {
        let name = connector.name().to_string();
        #[cfg(feature = "tracing")]
        if self.connectors.contains_key(&name) {
            tracing::warn!(exchange = %name, "replacing already-registered connector");
        }
        self.connectors.insert(name, connector);
    }

    /// Resolve a connector by exchange name.
    ///
    /// # Errors
    /// Returns `CandelaError::UnknownExchange` when no connector is
    /// registered under the name.
    pub fn get(&self, exchange: &str) -> Result<Arc<dyn ExchangeConnector>, CandelaError> {
        self.connectors
            .get(exchange)
            .cloned()
            .ok_or_else(|| CandelaError::unknown_exchange(exchange))
    }

    /// Registered exchange names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.connectors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered connectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}
