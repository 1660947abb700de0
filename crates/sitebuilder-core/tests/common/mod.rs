//! Test doubles for contract tests
//!
//! This module provides a minimal in-memory provider that records calls
//! without talking to any remote platform.

use async_trait::async_trait;
use sitebuilder_core::config::ProviderConfig;
use sitebuilder_core::error::{Error, Result};
use sitebuilder_core::{
    AboutData, AccountIdentifier, AccountInfo, ChangePackageParams, CreateParams, LoginResult,
    ResultData, SiteBuilderProvider, SiteBuilderProviderFactory, UnsuspendParams,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A mock provider that tracks calls
pub struct MockSiteBuilderProvider {
    /// Call counter for every operation
    call_count: Arc<AtomicUsize>,
}

impl MockSiteBuilderProvider {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a new provider that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            call_count: Arc::clone(&other.call_count),
        }
    }

    /// Get the number of operations invoked
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn info(&self, id: &AccountIdentifier) -> AccountInfo {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        AccountInfo {
            site_builder_user_id: id.site_builder_user_id.clone(),
            account_reference: id.account_reference.clone(),
            domain_name: Some("a.example.com".to_string()),
            package_reference: "Pro".to_string(),
            suspended: None,
            ip_address: None,
            is_published: Some(true),
            has_ssl: None,
            permissions: "EDIT".to_string(),
            message: None,
        }
    }
}

#[async_trait]
impl SiteBuilderProvider for MockSiteBuilderProvider {
    async fn create(&self, params: &CreateParams) -> Result<AccountInfo> {
        let id = AccountIdentifier::new(params.site_builder_user_id.clone(), "site-new");
        Ok(self.info(&id).with_message("Website created"))
    }

    async fn get_info(&self, params: &AccountIdentifier) -> Result<AccountInfo> {
        Ok(self.info(params).with_message("Account data obtained"))
    }

    async fn login(&self, params: &AccountIdentifier) -> Result<LoginResult> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if params.site_builder_user_id.is_none() {
            return Err(Error::invalid_input("Site builder user id is required"));
        }
        Ok(LoginResult::new("https://sso.example.com/abc"))
    }

    async fn change_package(&self, params: &ChangePackageParams) -> Result<AccountInfo> {
        let id = AccountIdentifier::new(
            params.site_builder_user_id.clone(),
            &params.account_reference,
        );
        Ok(self.info(&id).with_message("Package changed"))
    }

    async fn suspend(&self, params: &AccountIdentifier) -> Result<AccountInfo> {
        Ok(self.info(params).with_is_published(false))
    }

    async fn unsuspend(&self, params: &UnsuspendParams) -> Result<AccountInfo> {
        Ok(self.info(&params.identifier()).with_is_published(true))
    }

    async fn terminate(&self, _params: &AccountIdentifier) -> Result<ResultData> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(ResultData::ok("Account Terminated"))
    }

    fn about(&self) -> AboutData {
        AboutData {
            name: "Mock".to_string(),
            description: "In-memory test provider".to_string(),
            logo_url: None,
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Factory handing out mock providers that share one call counter
pub struct MockFactory {
    pub shared: Arc<MockSiteBuilderProvider>,
}

impl SiteBuilderProviderFactory for MockFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn SiteBuilderProvider>> {
        match config {
            ProviderConfig::Custom { factory, .. } if factory == "mock" => Ok(Box::new(
                MockSiteBuilderProvider::sharing_counters_with(&self.shared),
            )),
            _ => Err(Error::config("Invalid config for mock provider")),
        }
    }
}
