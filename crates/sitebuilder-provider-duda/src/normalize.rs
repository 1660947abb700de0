//! Domain normalization for Duda requests
//!
//! - Plan and template lookup by name or numeric id
//! - Permission canonicalization against the supported vocabulary
//! - Language negotiation with fallback to the base language, then `en`

use crate::model::{Plan, Template};
use std::fmt;

/// Permissions the Duda API accepts for an account on a site
///
/// See <https://developer.duda.co/reference/client-permissions-object>
pub const SUPPORTED_PERMISSIONS: [&str; 25] = [
    "STATS_TAB",
    "EDIT",
    "ADD_FLEX",
    "E_COMMERCE",
    "PUBLISH",
    "REPUBLISH",
    "DEV_MODE",
    "INSITE",
    "SEO",
    "BACKUPS",
    "CUSTOM_DOMAIN",
    "RESET",
    "BLOG",
    "PUSH_NOTIFICATIONS",
    "LIMITED_EDITING",
    "SITE_COMMENTS",
    "CONTENT_LIBRARY",
    "EDIT_CONNECTED_DATA",
    "MANAGE_CONNECTED_DATA",
    "USE_APP",
    "CLIENT_MANAGE_FREE_APPS",
    "AI_ASSISTANT",
    "MANAGE_DOMAIN",
    "CONTENT_LIBRARY_EXTERNAL_DATA_SYNC",
    "SEO_OVERVIEW",
];

/// Built-in permissions used when neither the request nor the
/// configuration supplies any
pub const DEFAULT_PERMISSIONS: [&str; 6] = [
    "PUBLISH",
    "REPUBLISH",
    "STATS_TAB",
    "EDIT",
    "LIMITED_EDITING",
    "RESET",
];

/// Permissions withheld from FREE sites: publishing a free site triggers
/// an implicit plan upgrade on the platform
const FREE_PLAN_EXCLUDED: [&str; 2] = ["PUBLISH", "REPUBLISH"];

/// Language codes the Duda API accepts
///
/// See <https://developer.duda.co/reference/getting-started-with-the-duda-api#good-to-know>
pub const SUPPORTED_LANGUAGES: [&str; 14] = [
    "ar", "nl", "en", "en_gb", "fr", "de", "id", "it", "ja", "pl", "pt", "es", "es_ar", "tr",
];

/// Language used when negotiation finds no match
pub const FALLBACK_LANGUAGE: &str = "en";

/// Ordered set of supported permission tokens
///
/// Tokens keep the order in which they first appear in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(Vec<&'static str>);

impl PermissionSet {
    /// Normalize raw tokens and keep only supported ones
    ///
    /// Each token is trimmed, upper-cased and has spaces replaced by
    /// underscores. Unsupported and repeated tokens are dropped.
    pub fn from_tokens<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = Vec::new();

        for token in tokens {
            let normalized = token.trim().to_uppercase().replace(' ', "_");
            if normalized.is_empty() {
                continue;
            }

            if let Some(supported) = SUPPORTED_PERMISSIONS
                .iter()
                .find(|supported| **supported == normalized)
                && !set.contains(supported)
            {
                set.push(*supported);
            }
        }

        Self(set)
    }

    /// Parse a comma-separated permission string
    pub fn parse(raw: Option<&str>) -> Self {
        Self::from_tokens(raw.unwrap_or_default().split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, permission: &str) -> bool {
        self.0.iter().any(|granted| *granted == permission)
    }

    pub fn as_slice(&self) -> &[&'static str] {
        &self.0
    }

    fn without(mut self, excluded: &[&str]) -> Self {
        self.0.retain(|permission| !excluded.contains(permission));
        self
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Permission selection policy for a provider instance
#[derive(Debug, Clone)]
pub struct PermissionPolicy {
    defaults: PermissionSet,
}

impl PermissionPolicy {
    /// Build the policy from the configured default permission string
    ///
    /// Configured defaults that normalize to nothing fall back to
    /// [`DEFAULT_PERMISSIONS`].
    pub fn new(configured_defaults: Option<&str>) -> Self {
        let configured = PermissionSet::parse(configured_defaults);
        let defaults = if configured.is_empty() {
            PermissionSet::from_tokens(DEFAULT_PERMISSIONS)
        } else {
            configured
        };

        Self { defaults }
    }

    /// Permissions to grant for a request on the given plan
    ///
    /// Requested permissions win when any of them are supported. Otherwise
    /// the defaults apply, minus PUBLISH/REPUBLISH on the FREE plan.
    pub fn resolve(&self, requested: Option<&str>, plan: &Plan) -> PermissionSet {
        let requested = PermissionSet::parse(requested);
        if !requested.is_empty() {
            return requested;
        }

        if plan.is_free() {
            self.defaults.clone().without(&FREE_PLAN_EXCLUDED)
        } else {
            self.defaults.clone()
        }
    }
}

/// Negotiate a supported language code
///
/// The code is lower-cased and hyphens become underscores. Unsupported
/// codes lose their last `_segment` until one matches; if none does,
/// [`FALLBACK_LANGUAGE`] is returned.
pub fn supported_language(language_code: Option<&str>) -> &'static str {
    let mut lang = language_code
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .unwrap_or(FALLBACK_LANGUAGE)
        .to_lowercase()
        .replace('-', "_");

    loop {
        if let Some(supported) = SUPPORTED_LANGUAGES.iter().find(|code| **code == lang) {
            return *supported;
        }

        match lang.rsplit_once('_') {
            Some((base, _)) => lang = base.to_string(),
            None => return FALLBACK_LANGUAGE,
        }
    }
}

/// Find a plan by numeric id or case-insensitive name; first match wins
pub fn find_plan<'a>(plans: &'a [Plan], reference: &str) -> Option<&'a Plan> {
    let reference = reference.trim();
    let id = reference.parse::<i64>().ok();

    plans.iter().find(|plan| {
        id.is_some_and(|id| plan.id == id) || plan.name.eq_ignore_ascii_case(reference)
    })
}

/// Find a template by case-insensitive name
pub fn find_template<'a>(templates: &'a [Template], name: &str) -> Option<&'a Template> {
    let name = name.trim();
    templates
        .iter()
        .find(|template| template.template_name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plans() -> Vec<Plan> {
        vec![
            Plan { id: 1, name: "Free".to_string() },
            Plan { id: 2, name: "Basic".to_string() },
            Plan { id: 10, name: "Pro".to_string() },
        ]
    }

    fn plan(name: &str) -> Plan {
        Plan { id: 1, name: name.to_string() }
    }

    #[test]
    fn test_permissions_normalized_and_intersected() {
        let set = PermissionSet::parse(Some(" edit , stats tab,,bogus,Publish,EDIT"));
        assert_eq!(set.as_slice(), &["EDIT", "STATS_TAB", "PUBLISH"]);
        assert_eq!(set.to_string(), "EDIT,STATS_TAB,PUBLISH");
    }

    #[test]
    fn test_unsupported_only_is_empty() {
        assert!(PermissionSet::parse(Some("FLY,teleport")).is_empty());
        assert!(PermissionSet::parse(Some("")).is_empty());
        assert!(PermissionSet::parse(None).is_empty());
    }

    #[test]
    fn test_unsupported_only_falls_back_to_defaults() {
        let policy = PermissionPolicy::new(None);
        let set = policy.resolve(Some("FLY,teleport"), &plan("Pro"));
        assert_eq!(set.as_slice(), &DEFAULT_PERMISSIONS);
    }

    #[test]
    fn test_requested_permissions_win() {
        let policy = PermissionPolicy::new(None);
        let set = policy.resolve(Some("seo,publish"), &plan("Free"));
        assert_eq!(set.as_slice(), &["SEO", "PUBLISH"]);
    }

    #[test]
    fn test_free_plan_defaults_exclude_publish() {
        let policy = PermissionPolicy::new(None);
        let set = policy.resolve(None, &plan("FREE"));
        assert!(!set.contains("PUBLISH"));
        assert!(!set.contains("REPUBLISH"));
        assert_eq!(set.as_slice(), &["STATS_TAB", "EDIT", "LIMITED_EDITING", "RESET"]);
    }

    #[test]
    fn test_free_plan_configured_defaults_exclude_publish() {
        let policy = PermissionPolicy::new(Some("PUBLISH,REPUBLISH,SEO"));
        let set = policy.resolve(None, &plan("free"));
        assert_eq!(set.as_slice(), &["SEO"]);

        let set = policy.resolve(None, &plan("Pro"));
        assert_eq!(set.as_slice(), &["PUBLISH", "REPUBLISH", "SEO"]);
    }

    #[test]
    fn test_unusable_configured_defaults_use_builtin() {
        let policy = PermissionPolicy::new(Some("nothing,useful"));
        assert_eq!(policy.resolve(None, &plan("Pro")).as_slice(), &DEFAULT_PERMISSIONS);
    }

    #[test]
    fn test_language_negotiation() {
        assert_eq!(supported_language(Some("en-GB")), "en_gb");
        assert_eq!(supported_language(Some("ES_AR")), "es_ar");
        assert_eq!(supported_language(Some("de-AT")), "de");
        assert_eq!(supported_language(Some("zz-ZZ")), "en");
        assert_eq!(supported_language(Some("es-AR-x")), "es_ar");
        assert_eq!(supported_language(Some("")), "en");
        assert_eq!(supported_language(None), "en");
    }

    #[test]
    fn test_find_plan_by_id_and_name() {
        let plans = plans();
        assert_eq!(find_plan(&plans, "10").map(|p| p.id), Some(10));
        assert_eq!(find_plan(&plans, "pro").map(|p| p.id), Some(10));
        assert_eq!(find_plan(&plans, "BASIC").map(|p| p.id), Some(2));
        assert!(find_plan(&plans, "Enterprise").is_none());
        assert!(find_plan(&plans, "99").is_none());
    }

    #[test]
    fn test_find_template_by_name() {
        let templates = vec![Template {
            template_id: 1001,
            template_name: "Blank Template".to_string(),
        }];
        assert_eq!(
            find_template(&templates, "blank template").map(|t| t.template_id),
            Some(1001)
        );
        assert!(find_template(&templates, "Shop").is_none());
    }
}
