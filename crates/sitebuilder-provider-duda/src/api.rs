//! Typed wrappers around the Duda REST endpoints used by the provider
//!
//! ## API Reference
//!
//! - Plans: GET `sites/multiscreen/plans`
//! - Templates: GET `sites/multiscreen/templates`
//! - Accounts: GET `accounts/:name`, POST `accounts/create`, DELETE `accounts/:name`
//! - Sites: GET/DELETE `sites/multiscreen/:site`, POST `sites/multiscreen/create`
//! - Publishing: POST `sites/multiscreen/publish/:site`, POST `sites/multiscreen/unpublish/:site`
//! - Site plan: GET `sites/multiscreen/:site/plan`, POST `sites/multiscreen/:site/plan/:plan_id`
//! - Permissions: GET/POST `accounts/:name/sites/:site/permissions`
//! - SSO: GET `accounts/sso/:name/link?site_name=...&target=...`

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use sitebuilder_core::SsoTarget;

use crate::client::{ApiError, ApiResult, DudaClient};
use crate::model::{
    Account, CreatedSite, NewAccount, NewSite, NewSiteData, Plan, Site, SitePermissions,
    SitePlan, SsoLink, Template,
};
use crate::normalize::{PermissionSet, find_plan, find_template};

/// Endpoint layer on top of [`DudaClient`]
#[derive(Debug, Clone)]
pub struct DudaApi {
    client: DudaClient,
}

impl DudaApi {
    pub fn new(client: DudaClient) -> Self {
        Self { client }
    }

    /// List the full plan catalog
    pub async fn plans(&self) -> ApiResult<Vec<Plan>> {
        self.get_json(&["sites", "multiscreen", "plans"], None).await
    }

    /// Resolve a plan by name or numeric id against a freshly fetched catalog
    pub async fn plan(&self, reference: &str) -> ApiResult<Plan> {
        let plans = self.plans().await?;

        match find_plan(&plans, reference) {
            Some(plan) => Ok(plan.clone()),
            None => Err(ApiError::NotFound {
                message: format!("Plan '{}' not found", reference),
                catalog: serde_json::to_value(&plans)?,
            }),
        }
    }

    /// Resolve a template id by name against the template catalog
    pub async fn template_id_by_name(&self, name: &str) -> ApiResult<i64> {
        let templates: Vec<Template> = self.get_json(&["sites", "multiscreen", "templates"], None).await?;

        match find_template(&templates, name) {
            Some(template) => Ok(template.template_id),
            None => Err(ApiError::NotFound {
                message: format!("Template '{}' not found", name),
                catalog: serde_json::to_value(&templates)?,
            }),
        }
    }

    /// Get an account by its account name
    pub async fn account(&self, account_name: &str) -> ApiResult<Account> {
        self.get_json(&["accounts", account_name], None)
            .await
    }

    /// Create a customer account named after the customer's email
    ///
    /// The customer name is split on its first space into first and last
    /// name. The created account is fetched back and returned.
    pub async fn create_account(
        &self,
        customer_email: &str,
        customer_name: Option<&str>,
        lang: &str,
    ) -> ApiResult<Account> {
        let (first_name, last_name) = split_name(customer_name);

        let body = NewAccount {
            account_name: customer_email,
            first_name,
            last_name,
            lang,
            account_type: "CUSTOMER",
        };

        self.client
            .request(Method::POST, &["accounts", "create"], None, Some(&body))
            .await?;

        self.account(customer_email).await
    }

    /// Delete an account
    pub async fn delete_account(&self, account_name: &str) -> ApiResult<()> {
        self.client
            .send(Method::DELETE, &["accounts", account_name], None)
            .await?;
        Ok(())
    }

    /// Get site details
    pub async fn site(&self, site_name: &str) -> ApiResult<Site> {
        self.get_json(&["sites", "multiscreen", site_name], None)
            .await
    }

    /// Create a site and return its remote id
    pub async fn create_site(&self, template_id: i64, lang: &str, domain: &str) -> ApiResult<String> {
        let body = NewSite {
            template_id,
            lang,
            site_data: NewSiteData {
                site_domain: domain,
            },
        };

        let created: CreatedSite = decode(
            self.client
                .request(Method::POST, &["sites", "multiscreen", "create"], None, Some(&body))
                .await?,
        )?;

        Ok(created.site_name)
    }

    /// Delete a site
    pub async fn delete_site(&self, site_name: &str) -> ApiResult<()> {
        self.client
            .send(
                Method::DELETE,
                &["sites", "multiscreen", site_name],
                None,
            )
            .await?;
        Ok(())
    }

    /// Publish a site
    pub async fn publish(&self, site_name: &str) -> ApiResult<()> {
        self.client
            .send(
                Method::POST,
                &["sites", "multiscreen", "publish", site_name],
                None,
            )
            .await?;
        Ok(())
    }

    /// Unpublish a site
    pub async fn unpublish(&self, site_name: &str) -> ApiResult<()> {
        self.client
            .send(
                Method::POST,
                &["sites", "multiscreen", "unpublish", site_name],
                None,
            )
            .await?;
        Ok(())
    }

    /// Get the plan currently attached to a site
    ///
    /// An empty response yields a plan without a name.
    pub async fn site_plan(&self, site_name: &str) -> ApiResult<SitePlan> {
        let response = self
            .client
            .send(
                Method::GET,
                &["sites", "multiscreen", site_name, "plan"],
                None,
            )
            .await?;

        match response {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(SitePlan::default()),
        }
    }

    /// Move a site to another plan
    pub async fn change_plan(&self, site_name: &str, plan_id: i64) -> ApiResult<()> {
        self.client
            .send(
                Method::POST,
                &["sites", "multiscreen", site_name, "plan", &plan_id.to_string()],
                None,
            )
            .await?;
        Ok(())
    }

    /// List the permissions an account holds on a site
    pub async fn site_permissions(&self, account_name: &str, site_name: &str) -> ApiResult<Vec<String>> {
        let response = self
            .client
            .send(
                Method::GET,
                &["accounts", account_name, "sites", site_name, "permissions"],
                None,
            )
            .await?;

        match response {
            Some(value) => Ok(serde_json::from_value::<SitePermissions>(value)?.permissions),
            None => Ok(Vec::new()),
        }
    }

    /// Grant an account the given permissions on a site
    pub async fn set_site_permissions(
        &self,
        account_name: &str,
        site_name: &str,
        permissions: &PermissionSet,
    ) -> ApiResult<()> {
        let body = json!({ "permissions": permissions.as_slice() });

        self.client
            .request(
                Method::POST,
                &["accounts", account_name, "sites", site_name, "permissions"],
                None,
                Some(&body),
            )
            .await?;
        Ok(())
    }

    /// Request a single-use SSO link
    pub async fn sso_link(&self, account_name: &str, site_name: &str, target: SsoTarget) -> ApiResult<String> {
        let link: SsoLink = self
            .get_json(
                &["accounts", "sso", account_name, "link"],
                Some(&[("site_name", site_name), ("target", target.as_str())][..]),
            )
            .await?;

        Ok(link.url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: Option<&[(&str, &str)]>,
    ) -> ApiResult<T> {
        decode(self.client.send(Method::GET, path, query).await?)
    }
}

/// Decode a response body that must be present
fn decode<T: DeserializeOwned>(response: Option<Value>) -> ApiResult<T> {
    Ok(serde_json::from_value(response.unwrap_or(Value::Null))?)
}

fn split_name(customer_name: Option<&str>) -> (Option<&str>, Option<&str>) {
    match customer_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => match name.split_once(' ') {
            Some((first, last)) => (Some(first), Some(last.trim())),
            None => (Some(name), None),
        },
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        assert_eq!(split_name(Some("Jane Doe")), (Some("Jane"), Some("Doe")));
        assert_eq!(
            split_name(Some("Jane van der Berg")),
            (Some("Jane"), Some("van der Berg"))
        );
        assert_eq!(split_name(Some("Cher")), (Some("Cher"), None));
        assert_eq!(split_name(Some("  ")), (None, None));
        assert_eq!(split_name(None), (None, None));
    }

    #[test]
    fn test_decode_missing_body_fails() {
        let result: ApiResult<Site> = decode(None);
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
