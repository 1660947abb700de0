//! Parameter and result types of the uniform account-lifecycle contract
//!
//! Parameter objects arrive from the upstream provisioning system as JSON.
//! Remote identifiers may be encoded as strings or integers, so they are
//! normalized to strings on deserialization.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::validation::{require, validate_domain_name, validate_email};

/// Identifies a remote account/site pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentifier {
    /// Remote account/owner id
    #[serde(default, deserialize_with = "optional_id")]
    pub site_builder_user_id: Option<String>,

    /// Remote site id
    #[serde(deserialize_with = "required_id")]
    pub account_reference: String,
}

impl AccountIdentifier {
    /// Create an identifier for a site, optionally bound to an account
    pub fn new(site_builder_user_id: Option<String>, account_reference: impl Into<String>) -> Self {
        Self {
            site_builder_user_id,
            account_reference: account_reference.into(),
        }
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<()> {
        require("account_reference", &self.account_reference)
    }
}

/// Parameters for unsuspending an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsuspendParams {
    /// Remote account/owner id
    #[serde(default, deserialize_with = "optional_id")]
    pub site_builder_user_id: Option<String>,

    /// Remote site id
    #[serde(deserialize_with = "required_id")]
    pub account_reference: String,
}

impl UnsuspendParams {
    /// Validate required fields
    pub fn validate(&self) -> Result<()> {
        require("account_reference", &self.account_reference)
    }

    /// The account/site pair these parameters refer to
    pub fn identifier(&self) -> AccountIdentifier {
        AccountIdentifier::new(self.site_builder_user_id.clone(), &self.account_reference)
    }
}

impl From<AccountIdentifier> for UnsuspendParams {
    fn from(id: AccountIdentifier) -> Self {
        Self {
            site_builder_user_id: id.site_builder_user_id,
            account_reference: id.account_reference,
        }
    }
}

/// Parameters for creating a new site (and account, if needed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateParams {
    /// Existing remote account to create the site under
    #[serde(default, deserialize_with = "optional_id")]
    pub site_builder_user_id: Option<String>,

    /// Upstream customer id
    #[serde(deserialize_with = "required_id")]
    pub customer_id: String,

    /// Customer full name
    pub customer_name: String,

    /// Customer email, used as the remote account name
    pub customer_email: String,

    /// Domain the site is bound to
    #[serde(default)]
    pub domain_name: Option<String>,

    /// Plan name or numeric plan id
    #[serde(deserialize_with = "required_id")]
    pub package_reference: String,

    /// Billing cycle length in months
    pub billing_cycle_months: u32,

    /// Optional account password
    #[serde(default)]
    pub password: Option<String>,

    /// Preferred language code, e.g. `en` or `en-GB`
    #[serde(default)]
    pub language_code: Option<String>,

    /// Comma-separated list of permissions, e.g. `PUBLISH,EDIT`
    #[serde(default)]
    pub permissions: Option<String>,

    /// Extra metadata passed through from the upstream system
    #[serde(default)]
    pub extra: Option<Value>,
}

impl CreateParams {
    /// Validate field-level rules
    pub fn validate(&self) -> Result<()> {
        require("customer_id", &self.customer_id)?;
        require("customer_name", &self.customer_name)?;
        validate_email(&self.customer_email)?;
        require("package_reference", &self.package_reference)?;

        if let Some(domain) = self.domain_name.as_deref()
            && !domain.is_empty()
        {
            validate_domain_name(domain)?;
        }

        if let Some(extra) = &self.extra
            && !(extra.is_object() || extra.is_array())
        {
            return Err(Error::invalid_input("The extra field must be an array"));
        }

        Ok(())
    }
}

/// Parameters for moving a site to a different plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePackageParams {
    /// Remote account/owner id
    #[serde(default, deserialize_with = "optional_id")]
    pub site_builder_user_id: Option<String>,

    /// Remote site id
    #[serde(deserialize_with = "required_id")]
    pub account_reference: String,

    /// Domain the site is bound to
    #[serde(default)]
    pub domain_name: Option<String>,

    /// Target plan name or numeric plan id
    #[serde(deserialize_with = "required_id")]
    pub package_reference: String,

    /// Billing cycle length in months
    pub billing_cycle_months: u32,

    /// Comma-separated list of permissions, e.g. `PUBLISH,EDIT`
    #[serde(default)]
    pub permissions: Option<String>,
}

impl ChangePackageParams {
    /// Validate field-level rules
    pub fn validate(&self) -> Result<()> {
        require("account_reference", &self.account_reference)?;
        require("package_reference", &self.package_reference)?;

        if let Some(domain) = self.domain_name.as_deref()
            && !domain.is_empty()
        {
            validate_domain_name(domain)?;
        }

        Ok(())
    }
}

/// Normalized account/site state returned by most operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub site_builder_user_id: Option<String>,
    pub account_reference: String,
    pub domain_name: Option<String>,
    /// Plan name, or [`AccountInfo::UNKNOWN_PACKAGE`]
    pub package_reference: String,
    /// `None` when the backend has no suspension concept distinct from publishing
    pub suspended: Option<bool>,
    pub ip_address: Option<String>,
    pub is_published: Option<bool>,
    pub has_ssl: Option<bool>,
    /// Comma-joined permission tokens
    pub permissions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AccountInfo {
    /// Package reference used when the remote reports no plan
    pub const UNKNOWN_PACKAGE: &'static str = "unknown";

    /// Set the result message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the published flag
    pub fn with_is_published(mut self, is_published: bool) -> Self {
        self.is_published = Some(is_published);
        self
    }

    /// Whether the package reference names the FREE plan (case-insensitive)
    pub fn is_free_plan(&self) -> bool {
        self.package_reference.eq_ignore_ascii_case("FREE")
    }
}

/// Result of an SSO login request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    /// Single-use SSO URL
    pub login_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResult {
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            login_url: login_url.into(),
            message: Some("Login URL generated".to_string()),
        }
    }
}

/// Generic success result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultData {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResultData {
    /// Create a success result with a message
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

/// Descriptive metadata about a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutData {
    pub name: String,
    pub description: String,
    pub logo_url: Option<String>,
}

/// Identifier accepted as a JSON string or integer
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Uint(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Uint(n) => n.to_string(),
        }
    }
}

fn required_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(String::from).filter(|id| !id.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_accepts_integer_ids() {
        let id: AccountIdentifier = serde_json::from_value(json!({
            "site_builder_user_id": 1234,
            "account_reference": "site123",
        }))
        .unwrap();

        assert_eq!(id.site_builder_user_id.as_deref(), Some("1234"));
        assert_eq!(id.account_reference, "site123");
    }

    #[test]
    fn test_identifier_missing_user_id() {
        let id: AccountIdentifier =
            serde_json::from_value(json!({ "account_reference": "site123" })).unwrap();
        assert!(id.site_builder_user_id.is_none());

        let id: AccountIdentifier = serde_json::from_value(json!({
            "site_builder_user_id": "",
            "account_reference": "site123",
        }))
        .unwrap();
        assert!(id.site_builder_user_id.is_none());
    }

    #[test]
    fn test_create_params_validation() {
        let mut params: CreateParams = serde_json::from_value(json!({
            "customer_id": 7,
            "customer_name": "Jane Doe",
            "customer_email": "x@y.com",
            "domain_name": "a.example.com",
            "package_reference": "Pro",
            "billing_cycle_months": 12,
        }))
        .unwrap();
        assert!(params.validate().is_ok());
        assert_eq!(params.customer_id, "7");

        params.customer_email = "not-an-email".to_string();
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_change_package_numeric_reference() {
        let params: ChangePackageParams = serde_json::from_value(json!({
            "account_reference": "site123",
            "package_reference": 5,
            "billing_cycle_months": 1,
        }))
        .unwrap();
        assert_eq!(params.package_reference, "5");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_account_info_free_plan() {
        let info = AccountInfo {
            site_builder_user_id: None,
            account_reference: "site123".to_string(),
            domain_name: None,
            package_reference: "free".to_string(),
            suspended: None,
            ip_address: None,
            is_published: Some(true),
            has_ssl: None,
            permissions: String::new(),
            message: None,
        };
        assert!(info.is_free_plan());

        let info = info.with_is_published(false).with_message("done");
        assert_eq!(info.is_published, Some(false));
        assert_eq!(info.message.as_deref(), Some("done"));
    }

    #[test]
    fn test_result_data_serialization() {
        let value = serde_json::to_value(ResultData::ok("Account Terminated")).unwrap();
        assert_eq!(value, json!({ "message": "Account Terminated" }));
    }
}
