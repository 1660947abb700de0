//! Lifecycle orchestration for Duda sites
//!
//! Duda has no suspension flag of its own: suspend and unsuspend are
//! mapped onto unpublish and publish. Both check the current publish state
//! first, so repeating them does not issue further remote mutations.

use async_trait::async_trait;
use sitebuilder_core::validation::require;
use sitebuilder_core::{
    AboutData, AccountIdentifier, AccountInfo, ChangePackageParams, CreateParams, DudaConfig,
    Error, LoginResult, Result, ResultData, SiteBuilderProvider, SsoTarget, TemplateRef,
    UnsuspendParams,
};

use crate::api::DudaApi;
use crate::client::{ApiError, DudaClient};
use crate::normalize::{PermissionPolicy, supported_language};

/// Template id sent when no default template is configured
const DEFAULT_TEMPLATE_ID: i64 = 0;

/// Duda website builder provider
///
/// Composes the API client, the permission policy and the configuration.
/// Holds no mutable state: every operation reads the current remote state
/// it needs.
#[derive(Debug)]
pub struct DudaProvider {
    config: DudaConfig,
    api: DudaApi,
    permissions: PermissionPolicy,
}

impl DudaProvider {
    /// Create a provider talking to the production API
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the credentials are invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: DudaConfig) -> Result<Self> {
        config.validate()?;
        let client = DudaClient::new(&config)
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(config, client))
    }

    /// Create a provider with an injected client
    pub fn with_client(config: DudaConfig, client: DudaClient) -> Self {
        let permissions = PermissionPolicy::new(config.default_permissions.as_deref());

        Self {
            config,
            api: DudaApi::new(client),
            permissions,
        }
    }

    /// Fetch and normalize the state of an account/site pair
    ///
    /// Account and permissions are only fetched when the account id is known.
    async fn account_info(
        &self,
        site_builder_user_id: Option<&str>,
        site_id: &str,
        message: &str,
    ) -> Result<AccountInfo> {
        require("account_reference", site_id)?;

        let account_name = match site_builder_user_id {
            Some(id) => Some(self.api.account(id).await?.account_name),
            None => None,
        };

        let site = self.api.site(site_id).await?;
        let plan = self.api.site_plan(site_id).await?;

        let permissions = match account_name.as_deref() {
            Some(name) => self.api.site_permissions(name, site_id).await?,
            None => Vec::new(),
        };

        Ok(AccountInfo {
            site_builder_user_id: account_name,
            account_reference: site_id.to_string(),
            domain_name: site.domain(),
            package_reference: plan
                .name
                .unwrap_or_else(|| AccountInfo::UNKNOWN_PACKAGE.to_string()),
            suspended: None,
            ip_address: None,
            is_published: Some(site.is_published()),
            has_ssl: None,
            permissions: permissions.join(","),
            message: Some(message.to_string()),
        })
    }

    /// Template id for new sites
    async fn template_id(&self) -> Result<i64> {
        match &self.config.template {
            None => Ok(DEFAULT_TEMPLATE_ID),
            Some(TemplateRef::Id(id)) => i64::try_from(*id)
                .map_err(|_| Error::config(format!("Template id {} is out of range", id))),
            Some(TemplateRef::Name(name)) => Ok(self.api.template_id_by_name(name).await?),
        }
    }

    /// SSO destination for a site
    ///
    /// The site is only fetched when the published and unpublished
    /// overrides differ.
    async fn sso_target(&self, site_id: &str) -> Result<SsoTarget> {
        let unpublished = self.config.unpublished_sso_target_destination;
        let published = self.config.published_sso_target_destination;

        let target = if unpublished == published {
            unpublished
        } else if self.api.site(site_id).await?.is_published() {
            published
        } else {
            unpublished
        };

        Ok(target.unwrap_or(SsoTarget::Editor))
    }
}

#[async_trait]
impl SiteBuilderProvider for DudaProvider {
    async fn create(&self, params: &CreateParams) -> Result<AccountInfo> {
        let domain = params
            .domain_name
            .as_deref()
            .map(str::trim)
            .filter(|domain| !domain.is_empty())
            .ok_or_else(|| Error::invalid_input("Domain name is required!"))?;

        tracing::info!(
            "Creating Duda site for {} (package: {})",
            domain,
            params.package_reference
        );

        let plan = self.api.plan(&params.package_reference).await?;
        let lang = supported_language(params.language_code.as_deref());

        let account = match params.site_builder_user_id.as_deref() {
            Some(id) => self.api.account(id).await?,
            None => {
                tracing::info!("Creating Duda account for customer {}", params.customer_id);
                self.api
                    .create_account(&params.customer_email, Some(&params.customer_name), lang)
                    .await?
            }
        };

        let template_id = self.template_id().await?;
        let site_id = self.api.create_site(template_id, lang, domain).await?;
        tracing::info!("Created Duda site {} for {}", site_id, domain);

        let permissions = self
            .permissions
            .resolve(params.permissions.as_deref(), &plan);

        self.api
            .set_site_permissions(&account.account_name, &site_id, &permissions)
            .await?;
        self.api.publish(&site_id).await?;
        self.api.change_plan(&site_id, plan.id).await?;

        self.account_info(Some(&account.account_name), &site_id, "Website created")
            .await
    }

    async fn get_info(&self, params: &AccountIdentifier) -> Result<AccountInfo> {
        self.account_info(
            params.site_builder_user_id.as_deref(),
            &params.account_reference,
            "Account data obtained",
        )
        .await
    }

    async fn login(&self, params: &AccountIdentifier) -> Result<LoginResult> {
        params.validate()?;
        let user_id = params
            .site_builder_user_id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("Site builder user id is required"))?;
        let site_id = params.account_reference.as_str();

        let target = self.sso_target(site_id).await?;
        tracing::info!("Requesting Duda SSO link for site {} (target: {})", site_id, target);

        let url = match self.api.sso_link(user_id, site_id, target).await {
            Ok(url) => url,
            Err(ApiError::Status { status, body })
                if target != SsoTarget::Editor
                    && status.is_client_error()
                    && body.contains(target.as_str()) =>
            {
                tracing::warn!(
                    "SSO target {} rejected for site {}, retrying with {}",
                    target,
                    site_id,
                    SsoTarget::Editor
                );
                self.api
                    .sso_link(user_id, site_id, SsoTarget::Editor)
                    .await?
            }
            Err(e) => return Err(e.into()),
        };

        Ok(LoginResult::new(url))
    }

    async fn change_package(&self, params: &ChangePackageParams) -> Result<AccountInfo> {
        let user_id = params
            .site_builder_user_id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("Site builder user id is required"))?;
        let site_id = params.account_reference.as_str();

        tracing::info!(
            "Changing Duda site {} to package {}",
            site_id,
            params.package_reference
        );

        let plan = self.api.plan(&params.package_reference).await?;
        let permissions = self
            .permissions
            .resolve(params.permissions.as_deref(), &plan);

        self.api
            .set_site_permissions(user_id, site_id, &permissions)
            .await?;
        self.api.change_plan(site_id, plan.id).await?;

        self.account_info(Some(user_id), site_id, "Package changed")
            .await
    }

    async fn suspend(&self, params: &AccountIdentifier) -> Result<AccountInfo> {
        let site_id = params.account_reference.as_str();
        let info = self
            .account_info(
                params.site_builder_user_id.as_deref(),
                site_id,
                "Account data obtained",
            )
            .await?;

        if info.is_published == Some(false) {
            tracing::info!("Duda site {} already unpublished", site_id);
            return Ok(info.with_message("Account already unpublished"));
        }

        tracing::info!("Unpublishing Duda site {}", site_id);
        self.api.unpublish(site_id).await?;

        Ok(info
            .with_is_published(false)
            .with_message("Account suspended/unpublished"))
    }

    async fn unsuspend(&self, params: &UnsuspendParams) -> Result<AccountInfo> {
        let site_id = params.account_reference.as_str();
        let info = self
            .account_info(
                params.site_builder_user_id.as_deref(),
                site_id,
                "Account data obtained",
            )
            .await?;

        // Publishing a free site upgrades its plan implicitly
        if info.is_free_plan() {
            tracing::info!("Not republishing free Duda site {}", site_id);
            return Ok(info.with_message("Free sites cannot be unsuspended/republished"));
        }

        if info.is_published == Some(true) {
            tracing::info!("Duda site {} already published", site_id);
            return Ok(info.with_message("Account already unsuspended/republished"));
        }

        tracing::info!("Republishing Duda site {}", site_id);
        self.api.publish(site_id).await?;

        Ok(info
            .with_is_published(true)
            .with_message("Account unsuspended/republished"))
    }

    async fn terminate(&self, params: &AccountIdentifier) -> Result<ResultData> {
        params.validate()?;
        let site_id = params.account_reference.as_str();

        tracing::info!("Deleting Duda site {}", site_id);
        self.api.delete_site(site_id).await?;

        if self.config.delete_on_terminate
            && let Some(account_name) = params.site_builder_user_id.as_deref()
        {
            tracing::warn!("Deleting Duda account {} on termination", account_name);
            self.api.delete_account(account_name).await?;
        }

        Ok(ResultData::ok("Account Terminated"))
    }

    fn about(&self) -> AboutData {
        AboutData {
            name: "Duda".to_string(),
            description: "Create, manage and log into Duda site builder accounts".to_string(),
            logo_url: None,
        }
    }

    fn provider_name(&self) -> &'static str {
        "duda"
    }
}
