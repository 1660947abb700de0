//! Shared helpers for Duda provider integration tests
//!
//! Every helper registers one mock on the given server and returns it so
//! tests can assert on call counts.

#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{Value, json};
use sitebuilder_core::DudaConfig;
use sitebuilder_provider_duda::{DudaClient, DudaProvider};

pub const ACCOUNT: &str = "x@y.com";
pub const SITE: &str = "site123";
pub const AUTH: &str = "Basic YXBpdXNlcjpzZWNyZXQxMjM=";

pub fn config() -> DudaConfig {
    DudaConfig::new("apiuser", "secret123")
}

/// Build a provider talking to the mock server
pub fn provider(server: &MockServer, config: DudaConfig) -> DudaProvider {
    let client = DudaClient::with_base_url(&config, server.base_url()).unwrap();
    DudaProvider::with_client(config, client)
}

pub fn mock_plans(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/sites/multiscreen/plans")
            .header("authorization", AUTH);
        then.status(200).json_body(json!([
            { "planId": 1, "planName": "Free" },
            { "planId": 10, "planName": "Pro" },
        ]));
    })
}

pub fn mock_account<'a>(server: &'a MockServer, account: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path(format!("/api/accounts/{}", account));
        then.status(200).json_body(json!({
            "account_name": account,
            "first_name": "Jane",
            "last_name": "Doe",
        }));
    })
}

pub fn mock_site<'a>(server: &'a MockServer, site: &str, publish_status: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/sites/multiscreen/{}", site));
        then.status(200).json_body(json!({
            "site_name": site,
            "site_domain": "example.com",
            "site_default_domain": format!("{}.multiscreensite.com", site),
            "publish_status": publish_status,
        }));
    })
}

pub fn mock_site_plan<'a>(server: &'a MockServer, site: &str, plan_name: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/sites/multiscreen/{}/plan", site));
        then.status(200)
            .json_body(json!({ "planId": 10, "planName": plan_name }));
    })
}

pub fn mock_permissions<'a>(
    server: &'a MockServer,
    account: &str,
    site: &str,
    permissions: Value,
) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/accounts/{}/sites/{}/permissions", account, site));
        then.status(200)
            .json_body(json!({ "permissions": permissions }));
    })
}

pub fn mock_set_permissions<'a>(
    server: &'a MockServer,
    account: &str,
    site: &str,
    permissions: Value,
) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/api/accounts/{}/sites/{}/permissions", account, site))
            .json_body(json!({ "permissions": permissions }));
        then.status(204);
    })
}

/// Mock a body-less mutation that answers 204
pub fn mock_no_content<'a>(
    server: &'a MockServer,
    method: httpmock::Method,
    path: &str,
) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(method).path(path);
        then.status(204);
    })
}

/// Mock the full state read performed at the end of most operations
pub fn mock_state<'a>(
    server: &'a MockServer,
    publish_status: &str,
    plan_name: &str,
) -> (Mock<'a>, Mock<'a>, Mock<'a>, Mock<'a>) {
    (
        mock_account(server, ACCOUNT),
        mock_site(server, SITE, publish_status),
        mock_site_plan(server, SITE, plan_name),
        mock_permissions(server, ACCOUNT, SITE, json!(["EDIT", "STATS_TAB"])),
    )
}
