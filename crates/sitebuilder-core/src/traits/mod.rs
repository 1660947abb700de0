//! Core traits for the provisioning adapters
//!
//! - [`SiteBuilderProvider`]: the uniform account-lifecycle contract
//! - [`SiteBuilderProviderFactory`]: builds providers from configuration

pub mod site_builder;

pub use site_builder::{SiteBuilderProvider, SiteBuilderProviderFactory};
