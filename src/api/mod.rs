//! Backend API for the business assistant
//!
//! The client only talks to the server through the [`Backend`] trait, so the
//! chat and view layers can be driven by a scripted backend in tests and by
//! [`HttpBackend`] in the real binary.

mod cookies;
mod http;
#[cfg(test)]
pub(crate) mod testing;

pub use cookies::SessionCookies;
pub use http::HttpBackend;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use thiserror::Error;

/// A generated FAQ entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// A product or service extracted from the business documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub description: String,
    /// Free-form: the extractor emits "$12.00", 12, or nothing at all
    #[serde(default, deserialize_with = "text_or_number")]
    pub price: String,
}

/// What the server confirmed after a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub business_name: String,
    pub business_id: Option<String>,
    pub message: Option<String>,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Everything that can go wrong between the client and the server
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("could not reach the server: {0}")]
    Transport(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("server returned HTTP {code}")]
    Status { code: u16, message: Option<String> },

    #[error("unexpected response from server: {0}")]
    Malformed(String),

    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("could not read {path}: {reason}")]
    LocalFile { path: String, reason: String },

    #[error("request task crashed: {0}")]
    Crashed(String),
}

impl ApiError {
    /// Text suitable for the transcript or an inline panel error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => {
                "Sorry, I couldn't reach the server. Please check your connection and try again."
                    .to_string()
            }
            ApiError::Timeout(secs) => format!(
                "The request timed out after {}s. Please try again.",
                secs
            ),
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Status {
                code,
                message: None,
            } => format!(
                "Sorry, the server returned an error ({}). Please try again.",
                code
            ),
            ApiError::Malformed(_) => {
                "Sorry, I received an unexpected response from the server.".to_string()
            }
            ApiError::Rejected(message) => message.clone(),
            ApiError::LocalFile { path, reason } => {
                format!("Could not read {}: {}", path, reason)
            }
            ApiError::Crashed(_) => {
                "Sorry, something went wrong while handling your request. Please try again."
                    .to_string()
            }
        }
    }
}

/// The HTTP contract the client consumes.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /send_message`, returns the assistant's reply.
    async fn send_message(&self, message: &str) -> Result<String, ApiError>;

    /// `GET /get_faqs`
    async fn get_faqs(&self) -> Result<Vec<Faq>, ApiError>;

    /// `GET /get_products`
    async fn get_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Multipart `POST /upload` with `business_name` and `file`.
    async fn upload(&self, file: &Path, business_name: &str) -> Result<UploadReceipt, ApiError>;

    /// `GET /get_business_info`, `None` when the server has no active business.
    async fn business_info(&self) -> Result<Option<String>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_price_accepts_numbers_and_strings() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[
                {"name": "Widget", "description": "Small", "price": "$5.00"},
                {"name": "Gadget", "description": null, "price": 12.5},
                {"name": "Gizmo"}
            ]"#,
        )
        .unwrap();
        assert_eq!(products[0].price, "$5.00");
        assert_eq!(products[1].price, "12.5");
        assert_eq!(products[1].description, "");
        assert_eq!(products[2].price, "");
    }

    #[test]
    fn test_status_error_prefers_server_text() {
        let err = ApiError::Status {
            code: 400,
            message: Some("Please upload business documents first.".into()),
        };
        assert_eq!(err.user_message(), "Please upload business documents first.");

        let err = ApiError::Status {
            code: 502,
            message: None,
        };
        assert!(err.user_message().contains("502"));
    }

    #[test]
    fn test_timeout_message_mentions_timeout() {
        let msg = ApiError::Timeout(30).user_message();
        assert!(msg.contains("timed out"));
        assert!(msg.contains("30s"));
    }

    #[test]
    fn test_transport_message_hides_internals() {
        let err = ApiError::Transport("tcp connect error: Connection refused (os error 111)".into());
        let msg = err.user_message();
        assert!(msg.contains("couldn't reach the server"));
        assert!(!msg.contains("os error"));
    }
}
