// # Site Builder Provider Trait
//
// Defines the uniform account-lifecycle contract implemented once per
// website builder platform.
//
// ## Implementations
//
// - Duda: `sitebuilder-provider-duda` crate
//
// ## Usage
//
// ```rust,ignore
// use sitebuilder_core::{AccountIdentifier, SiteBuilderProvider};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* SiteBuilderProvider implementation */;
//
//     let info = provider
//         .get_info(&AccountIdentifier::new(Some("x@y.com".into()), "site123"))
//         .await?;
//     println!("{}", info.package_reference);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::config::ProviderConfig;
use crate::data::{
    AboutData, AccountIdentifier, AccountInfo, ChangePackageParams, CreateParams, LoginResult,
    ResultData, UnsuspendParams,
};
use crate::error::Result;

/// Trait for website builder provider implementations
///
/// Each operation issues a bounded sequence of remote calls and returns a
/// normalized result. Operations are independent of each other: the remote
/// platform is the only source of truth, and implementations hold no cache.
///
/// # Errors
///
/// Failures with an interpretable shape are returned as normalized
/// [`Error`](crate::Error) variants. Transport failures are propagated as
/// [`Error::Transport`](crate::Error::Transport).
///
/// # Partial failure
///
/// Multi-step operations are not transactional. A failure halfway through
/// `create` leaves the remote account/site in whatever state the completed
/// steps produced; callers reconcile with `get_info` or `terminate`.
#[async_trait]
pub trait SiteBuilderProvider: Send + Sync {
    /// Create a site (and the owning account, if not given) and publish it
    async fn create(&self, params: &CreateParams) -> Result<AccountInfo>;

    /// Fetch the normalized state of an account/site pair
    async fn get_info(&self, params: &AccountIdentifier) -> Result<AccountInfo>;

    /// Obtain a single-use SSO URL for the account's site
    async fn login(&self, params: &AccountIdentifier) -> Result<LoginResult>;

    /// Move the site to a different plan and refresh its permissions
    async fn change_package(&self, params: &ChangePackageParams) -> Result<AccountInfo>;

    /// Take the site offline
    ///
    /// # Idempotency
    ///
    /// Calling this on an already suspended site must not issue another
    /// remote mutation.
    async fn suspend(&self, params: &AccountIdentifier) -> Result<AccountInfo>;

    /// Bring the site back online
    ///
    /// # Idempotency
    ///
    /// Calling this on an already active site must not issue another
    /// remote mutation.
    async fn unsuspend(&self, params: &UnsuspendParams) -> Result<AccountInfo>;

    /// Delete the site
    async fn terminate(&self, params: &AccountIdentifier) -> Result<ResultData>;

    /// Descriptive metadata for this provider
    fn about(&self) -> AboutData;

    /// Get the provider name (for logging/debugging)
    ///
    /// A static string identifying the provider (e.g., "duda")
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing providers from configuration
pub trait SiteBuilderProviderFactory: Send + Sync {
    /// Create a provider instance from configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) when the configuration
    /// is invalid or belongs to another provider type.
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn SiteBuilderProvider>>;
}
