//! Wire types for the Duda REST API
//!
//! Only the fields the adapter reads are modelled; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};

/// Site plan from the plan catalog
///
/// See <https://developer.duda.co/reference/site-plans-list-site-plans>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "planId")]
    pub id: i64,
    #[serde(rename = "planName")]
    pub name: String,
}

impl Plan {
    /// Whether this is the FREE plan (case-insensitive)
    pub fn is_free(&self) -> bool {
        self.name.eq_ignore_ascii_case("FREE")
    }
}

/// Plan currently attached to a site; the name may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SitePlan {
    #[serde(rename = "planName", default)]
    pub name: Option<String>,
}

/// Site template from the template catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub template_id: i64,
    pub template_name: String,
}

/// Customer account
///
/// See <https://developer.duda.co/reference/accounts-object>
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub account_name: String,
}

/// Site details
#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    pub site_name: String,
    #[serde(default)]
    pub site_domain: Option<String>,
    #[serde(default)]
    pub site_default_domain: Option<String>,
    #[serde(default)]
    pub publish_status: Option<String>,
}

impl Site {
    /// Whether the site is currently live
    pub fn is_published(&self) -> bool {
        self.publish_status.as_deref() == Some("PUBLISHED")
    }

    /// Custom domain, or the platform default domain when none is set
    pub fn domain(&self) -> Option<String> {
        self.site_domain
            .clone()
            .filter(|domain| !domain.is_empty())
            .or_else(|| self.site_default_domain.clone())
    }
}

/// Response of site creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedSite {
    pub site_name: String,
}

/// Permissions an account holds on a site
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SitePermissions {
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// SSO link response
#[derive(Debug, Clone, Deserialize)]
pub struct SsoLink {
    pub url: String,
}

/// Body of `POST accounts/create`
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount<'a> {
    pub account_name: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub lang: &'a str,
    pub account_type: &'static str,
}

/// Body of `POST sites/multiscreen/create`
#[derive(Debug, Clone, Serialize)]
pub struct NewSite<'a> {
    pub template_id: i64,
    pub lang: &'a str,
    pub site_data: NewSiteData<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSiteData<'a> {
    pub site_domain: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_site_domain_fallback() {
        let site: Site = serde_json::from_value(json!({
            "site_name": "site123",
            "site_domain": null,
            "site_default_domain": "site123.multiscreensite.com",
            "publish_status": "UNPUBLISHED",
        }))
        .unwrap();

        assert_eq!(site.domain().as_deref(), Some("site123.multiscreensite.com"));
        assert!(!site.is_published());
    }

    #[test]
    fn test_plan_wire_names() {
        let plan: Plan =
            serde_json::from_value(json!({ "planId": 3, "planName": "Free" })).unwrap();
        assert_eq!(plan.id, 3);
        assert!(plan.is_free());
    }
}
