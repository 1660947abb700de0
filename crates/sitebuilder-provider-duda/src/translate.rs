//! Error translation from raw API failures to the uniform error
//!
//! An HTTP error response has an interpretable shape and becomes
//! [`Error::ProviderApi`]. Failures without a response keep their original
//! error as the source and are not demoted to a uniform message.

use serde_json::{Value, json};
use sitebuilder_core::Error;

use crate::client::ApiError;

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, body } => {
                let response_data = serde_json::from_str::<Value>(body.trim()).ok();

                let message = response_data
                    .as_ref()
                    .and_then(|data| data.get("message"))
                    .and_then(Value::as_str)
                    .filter(|message| !message.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        status
                            .canonical_reason()
                            .unwrap_or("Unknown Error")
                            .to_string()
                    });

                tracing::debug!("Translated HTTP {} into provider error: {}", status, message);

                Error::provider_api(message, json!({ "response_data": response_data }))
            }
            ApiError::InvalidResponse { body } => Error::InvalidResponse { response: body },
            ApiError::NotFound { message, catalog } => {
                Error::not_found(message, json!({ "response": catalog }))
            }
            ApiError::InvalidPath { segment } => {
                Error::invalid_input(format!("Invalid identifier '{}'", segment))
            }
            ApiError::BaseUrl(url) => Error::config(format!("Invalid base URL '{}'", url)),
            ApiError::Transport(e) => Error::transport(e),
            ApiError::Decode(e) => Error::Json(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_message_taken_from_body() {
        let err: Error = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"error_code":"InvalidInput","message":"Account already exists"}"#.to_string(),
        }
        .into();

        assert_eq!(err.to_string(), "Provider API Error: Account already exists");
        match err {
            Error::ProviderApi { data, .. } => {
                assert_eq!(data["response_data"]["error_code"], "InvalidInput");
            }
            other => panic!("expected provider API error, got {other:?}"),
        }
    }

    #[test]
    fn test_reason_phrase_when_body_has_no_message() {
        let err: Error = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: r#"{"error_code":"Unauthorized"}"#.to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Provider API Error: Unauthorized");
    }

    #[test]
    fn test_non_json_error_body() {
        let err: Error = ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>Bad Gateway</html>".to_string(),
        }
        .into();

        assert_eq!(err.to_string(), "Provider API Error: Bad Gateway");
        assert_eq!(err.data(), Some(json!({ "response_data": null })));
    }

    #[test]
    fn test_not_found_carries_catalog() {
        let err: Error = ApiError::NotFound {
            message: "Plan 'Gold' not found".to_string(),
            catalog: json!([{ "planId": 1, "planName": "Free" }]),
        }
        .into();

        assert_eq!(err.to_string(), "Plan 'Gold' not found");
        assert_eq!(
            err.data(),
            Some(json!({ "response": [{ "planId": 1, "planName": "Free" }] }))
        );
    }

    #[test]
    fn test_decode_errors_propagate() {
        let decode = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        let err: Error = ApiError::Decode(decode).into();
        assert!(matches!(err, Error::Json(_)));
        assert!(!err.is_normalized());
    }

    #[test]
    fn test_invalid_path_is_invalid_input() {
        let err: Error = ApiError::InvalidPath {
            segment: "..".to_string(),
        }
        .into();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(err.to_string(), "Invalid identifier '..'");
    }
}
