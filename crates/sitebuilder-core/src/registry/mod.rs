//! Plugin-based provider registry
//!
//! The registry allows website builder providers to be registered
//! dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sitebuilder_core::registry::ProviderRegistry;
//! use sitebuilder_core::config::{DudaConfig, ProviderConfig};
//!
//! let registry = ProviderRegistry::new();
//! sitebuilder_provider_duda::register(&registry);
//!
//! let config = ProviderConfig::Duda(DudaConfig::new("apiuser", "secret123"));
//! let provider = registry.create_provider(&config)?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{SiteBuilderProvider, SiteBuilderProviderFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Provider registry for plugin-based provider creation
///
/// The registry maintains a map of provider type names to factory objects,
/// allowing dynamic instantiation of providers based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered provider factories
    providers: RwLock<HashMap<String, Box<dyn SiteBuilderProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "duda")
    /// - `factory`: Factory object for creating provider instances
    pub fn register_provider(
        &self,
        name: impl Into<String>,
        factory: Box<dyn SiteBuilderProviderFactory>,
    ) {
        let name = name.into();
        tracing::debug!("Registering provider factory: {}", name);
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        providers.insert(name, factory);
    }

    /// Create a provider from configuration
    ///
    /// The configuration is validated before the factory is invoked.
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn SiteBuilderProvider>)`: Created provider instance
    /// - `Err(Error)`: If the configuration is invalid, the provider type
    ///   is not registered, or creation fails
    pub fn create_provider(&self, config: &ProviderConfig) -> Result<Box<dyn SiteBuilderProvider>> {
        config.validate()?;

        let provider_type = config.type_name();
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);

        let factory = providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config)
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProviderFactory;

    impl SiteBuilderProviderFactory for MockProviderFactory {
        fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn SiteBuilderProvider>> {
            Err(Error::config("Mock provider not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        assert!(!registry.has_provider("mock"));

        registry.register_provider("mock", Box::new(MockProviderFactory));

        assert!(registry.has_provider("mock"));
        assert_eq!(registry.list_providers(), vec!["mock".to_string()]);
    }

    #[test]
    fn test_unknown_provider_type() {
        let registry = ProviderRegistry::new();
        let config = ProviderConfig::Custom {
            factory: "wix".to_string(),
            config: serde_json::json!({}),
        };

        let err = registry.create_provider(&config).err().unwrap();
        assert_eq!(err.to_string(), "Configuration error: Unknown provider type: wix");
    }
}
