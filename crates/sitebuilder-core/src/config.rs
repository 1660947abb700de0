//! Configuration types for the provisioning adapters
//!
//! Provider configuration is supplied once at construction and is immutable
//! for the provider's lifetime.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Duda provider
    Duda(DudaConfig),

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            ProviderConfig::Duda(duda) => duda.validate(),
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(Error::config("Custom provider factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(Error::config("Custom provider config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Duda(_) => "duda",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Duda API credentials and provisioning defaults
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DudaConfig {
    /// API username
    pub username: String,

    /// API password
    /// ⚠️ NEVER log this value
    pub password: String,

    /// Default template name or id used when creating sites
    #[serde(default)]
    pub template: Option<TemplateRef>,

    /// SSO target destination while the site is unpublished
    #[serde(default, deserialize_with = "optional_target")]
    pub unpublished_sso_target_destination: Option<SsoTarget>,

    /// SSO target destination once the site is published
    #[serde(default, deserialize_with = "optional_target")]
    pub published_sso_target_destination: Option<SsoTarget>,

    /// Comma-separated default permissions for new sites
    #[serde(default)]
    pub default_permissions: Option<String>,

    /// Whether to delete the owning account on termination
    #[serde(default)]
    pub delete_on_terminate: bool,
}

// Custom Debug implementation that hides the password
impl fmt::Debug for DudaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DudaConfig")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("template", &self.template)
            .field(
                "unpublished_sso_target_destination",
                &self.unpublished_sso_target_destination,
            )
            .field(
                "published_sso_target_destination",
                &self.published_sso_target_destination,
            )
            .field("default_permissions", &self.default_permissions)
            .field("delete_on_terminate", &self.delete_on_terminate)
            .finish()
    }
}

impl DudaConfig {
    /// Minimum username length accepted by the API
    pub const MIN_USERNAME_LEN: usize = 3;
    /// Minimum password length accepted by the API
    pub const MIN_PASSWORD_LEN: usize = 6;

    /// Create a configuration with credentials and no defaults
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Validate credential lengths
    pub fn validate(&self) -> Result<(), Error> {
        if self.username.chars().count() < Self::MIN_USERNAME_LEN {
            return Err(Error::config(format!(
                "Duda username must be at least {} characters",
                Self::MIN_USERNAME_LEN
            )));
        }

        if self.password.chars().count() < Self::MIN_PASSWORD_LEN {
            return Err(Error::config(format!(
                "Duda password must be at least {} characters",
                Self::MIN_PASSWORD_LEN
            )));
        }

        Ok(())
    }
}

/// Template reference: a numeric template id or a template name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateRef {
    Id(u64),
    Name(String),
}

impl FromStr for TemplateRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::config("Template reference cannot be empty"));
        }
        Ok(s.parse::<u64>()
            .map_or_else(|_| TemplateRef::Name(s.to_string()), TemplateRef::Id))
    }
}

/// Destinations the remote SSO endpoint can land a user on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SsoTarget {
    Editor,
    ResetSite,
    SwitchTemplate,
    SwitchTemplateWithAi,
    ResetBasic,
    StoreManagement,
    SiteOverview,
    Stats,
    SiteSeoOverview,
}

impl SsoTarget {
    /// Every supported destination
    pub const ALL: [SsoTarget; 9] = [
        SsoTarget::Editor,
        SsoTarget::ResetSite,
        SsoTarget::SwitchTemplate,
        SsoTarget::SwitchTemplateWithAi,
        SsoTarget::ResetBasic,
        SsoTarget::StoreManagement,
        SsoTarget::SiteOverview,
        SsoTarget::Stats,
        SsoTarget::SiteSeoOverview,
    ];

    /// Wire name of the destination
    pub fn as_str(&self) -> &'static str {
        match self {
            SsoTarget::Editor => "EDITOR",
            SsoTarget::ResetSite => "RESET_SITE",
            SsoTarget::SwitchTemplate => "SWITCH_TEMPLATE",
            SsoTarget::SwitchTemplateWithAi => "SWITCH_TEMPLATE_WITH_AI",
            SsoTarget::ResetBasic => "RESET_BASIC",
            SsoTarget::StoreManagement => "STORE_MANAGEMENT",
            SsoTarget::SiteOverview => "SITE_OVERVIEW",
            SsoTarget::Stats => "STATS",
            SsoTarget::SiteSeoOverview => "SITE_SEO_OVERVIEW",
        }
    }
}

impl fmt::Display for SsoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SsoTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SsoTarget::ALL
            .into_iter()
            .find(|target| target.as_str() == s)
            .ok_or_else(|| {
                Error::config(format!(
                    "SSO target destination '{}' is not supported. Supported: {}",
                    s,
                    SsoTarget::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }
}

/// An empty string means "not configured"
fn optional_target<'de, D>(deserializer: D) -> Result<Option<SsoTarget>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
