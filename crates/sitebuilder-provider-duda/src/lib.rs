// # Duda Website Builder Provider
//
// This crate implements the site builder lifecycle contract on top of the
// Duda REST API.
//
// ## Layers
//
// - `client`: authenticated JSON transport (Basic auth, timeouts, response
//   classification)
// - `api`: typed wrappers for the individual endpoints
// - `normalize`: plan/template lookup, permission and language negotiation
// - `translate`: raw API failures into the uniform `Error`
// - `provider`: the lifecycle orchestration (`DudaProvider`)
//
// ## Platform Mapping
//
// - Account: a Duda customer account, named after the customer's email
// - Site: a Duda multiscreen site, identified by its `site_name`
// - Suspension: unpublishing the site (Duda has no suspension flag)
// - Login: a single-use SSO link to a configurable dashboard destination
//
// ## Security Requirements
//
// - API password NEVER appears in logs or Debug output
// - Credentials are validated before any request is made
//
// ## API Reference
//
// - Duda API: https://developer.duda.co/reference
// - Base URL: https://api.duda.co/api/

pub mod api;
pub mod client;
pub mod model;
pub mod normalize;
pub mod provider;
mod translate;

pub use client::{ApiError, DUDA_API_BASE, DudaClient};
pub use provider::DudaProvider;

use sitebuilder_core::{
    Error, ProviderConfig, ProviderRegistry, Result, SiteBuilderProvider,
    SiteBuilderProviderFactory,
};

/// Factory for creating Duda providers
pub struct DudaFactory;

impl SiteBuilderProviderFactory for DudaFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn SiteBuilderProvider>> {
        match config {
            ProviderConfig::Duda(duda) => {
                if duda.delete_on_terminate {
                    tracing::warn!("Duda provider will delete customer accounts on termination");
                }

                Ok(Box::new(DudaProvider::new(duda.clone())?))
            }
            _ => Err(Error::config("Invalid config for Duda provider")),
        }
    }
}

/// Register the Duda provider with a registry
///
/// # Example
///
/// ```rust
/// use sitebuilder_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// sitebuilder_provider_duda::register(&registry);
/// assert!(registry.has_provider("duda"));
/// ```
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider("duda", Box::new(DudaFactory));
}
