// # sitebuilder-core
//
// Core library for website builder provisioning adapters.
//
// ## Architecture Overview
//
// An upstream provisioning/billing system drives the lifecycle of
// customer sites hosted on third-party website builder platforms. This
// crate defines the contract every platform adapter implements:
//
// - **SiteBuilderProvider**: Uniform account-lifecycle operations
//   (create, get_info, login, change_package, suspend, unsuspend, terminate)
// - **data**: Parameter objects and normalized result shapes
// - **Error**: Uniform error taxonomy with diagnostic payloads
// - **ProviderConfig**: Per-platform configuration and validation
// - **ProviderRegistry**: Plugin-based registry of provider factories
//
// ## Design Principles
//
// 1. **One contract, many backends**: each platform lives in its own crate
// 2. **Stateless adapters**: the remote platform is the only source of truth
// 3. **Normalize what has a shape**: interpretable failures become uniform
//    errors, everything else propagates unchanged

pub mod config;
pub mod data;
pub mod error;
pub mod registry;
pub mod traits;
pub mod validation;

pub use config::{DudaConfig, ProviderConfig, SsoTarget, TemplateRef};
pub use data::{
    AboutData, AccountIdentifier, AccountInfo, ChangePackageParams, CreateParams, LoginResult,
    ResultData, UnsuspendParams,
};
pub use error::{Error, Result};
pub use registry::ProviderRegistry;
pub use traits::{SiteBuilderProvider, SiteBuilderProviderFactory};
