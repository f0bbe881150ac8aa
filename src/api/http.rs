use super::{ApiError, Backend, Faq, Product, SessionCookies, UploadReceipt};
use crate::config::Config;
use crate::upload::mime_for;
use crate::util::truncate;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    response: String,
}

#[derive(Deserialize)]
struct FaqsResponse {
    faqs: Vec<Faq>,
}

#[derive(Deserialize)]
struct ProductsResponse {
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct UploadResponse {
    success: bool,
    business_name: Option<String>,
    business_id: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct BusinessInfoResponse {
    business_name: Option<String>,
}

/// Error bodies: `/send_message` answers `{response}` even on 4xx/5xx,
/// `/upload` answers `{success: false, message}`.
#[derive(Deserialize)]
struct ErrorBody {
    response: Option<String>,
    message: Option<String>,
}

/// reqwest-backed implementation of the backend contract
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
    session: SessionCookies,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl HttpBackend {
    /// A backend whose session ends with the process
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        upload_timeout: Duration,
    ) -> anyhow::Result<Self> {
        Self::build(base_url, request_timeout, upload_timeout, None)
    }

    /// A backend that restores and saves its session cookie at `session_file`
    pub fn with_session_file(
        base_url: &str,
        request_timeout: Duration,
        upload_timeout: Duration,
        session_file: impl Into<PathBuf>,
    ) -> anyhow::Result<Self> {
        Self::build(
            base_url,
            request_timeout,
            upload_timeout,
            Some(session_file.into()),
        )
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let session_file = if config.remember_session {
            Config::session_path()
        } else {
            None
        };
        Self::build(
            &config.server_url,
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.upload_timeout_secs),
            session_file,
        )
    }

    fn build(
        base_url: &str,
        request_timeout: Duration,
        upload_timeout: Duration,
        session_file: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", base_url, e))?;
        // Url::join replaces the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        // The server keys the active business off its session cookie
        let session = match session_file {
            Some(path) => SessionCookies::persistent(&base, path),
            None => SessionCookies::in_memory(&base),
        };
        let client = reqwest::Client::builder()
            .cookie_provider(session.jar())
            .user_agent(concat!("bizchat/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base,
            session,
            request_timeout,
            upload_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, name: &str) -> Result<Url, ApiError> {
        self.base
            .join(name)
            .map_err(|e| ApiError::Transport(format!("bad endpoint '{}': {}", name, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, ApiError> {
        let url = self.endpoint(name)?;
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, self.request_timeout))?;
        self.session.persist();
        read_json(response, self.request_timeout).await
    }
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout(timeout.as_secs())
    } else {
        ApiError::Transport(err.to_string())
    }
}

fn error_text(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .response
        .or(parsed.message)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    timeout: Duration,
) -> Result<T, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(e, timeout))?;

    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), body = %truncate(&body, 200), "request failed");
        return Err(ApiError::Status {
            code: status.as_u16(),
            message: error_text(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(error = %e, body = %truncate(&body, 200), "malformed response body");
        ApiError::Malformed(e.to_string())
    })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn send_message(&self, message: &str) -> Result<String, ApiError> {
        let url = self.endpoint("send_message")?;
        tracing::debug!(%url, chars = message.chars().count(), "POST");
        let response = self
            .client
            .post(url)
            .timeout(self.request_timeout)
            .json(&SendMessageRequest { message })
            .send()
            .await
            .map_err(|e| transport_error(e, self.request_timeout))?;
        self.session.persist();
        let parsed: SendMessageResponse = read_json(response, self.request_timeout).await?;
        Ok(parsed.response)
    }

    async fn get_faqs(&self) -> Result<Vec<Faq>, ApiError> {
        let parsed: FaqsResponse = self.get_json("get_faqs").await?;
        Ok(parsed.faqs)
    }

    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        let parsed: ProductsResponse = self.get_json("get_products").await?;
        Ok(parsed.products)
    }

    async fn upload(&self, file: &Path, business_name: &str) -> Result<UploadReceipt, ApiError> {
        let bytes = tokio::fs::read(file).await.map_err(|e| ApiError::LocalFile {
            path: file.display().to_string(),
            reason: e.to_string(),
        })?;
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();
        let size = bytes.len();

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime_for(file))
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let form = Form::new()
            .text("business_name", business_name.to_string())
            .part("file", part);

        let url = self.endpoint("upload")?;
        tracing::info!(%url, file = %file_name, bytes = size, "uploading document");
        let response = self
            .client
            .post(url)
            .timeout(self.upload_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(e, self.upload_timeout))?;
        self.session.persist();

        let parsed: UploadResponse = read_json(response, self.upload_timeout).await?;
        if !parsed.success {
            return Err(ApiError::Rejected(
                parsed
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Upload failed.".to_string()),
            ));
        }

        Ok(UploadReceipt {
            business_name: parsed
                .business_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| business_name.to_string()),
            business_id: parsed.business_id,
            message: parsed.message,
        })
    }

    async fn business_info(&self) -> Result<Option<String>, ApiError> {
        let parsed: BusinessInfoResponse = self.get_json("get_business_info").await?;
        Ok(parsed.business_name.filter(|n| !n.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let backend = HttpBackend::new(
            "http://localhost:5000/assistant",
            Duration::from_secs(5),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            backend.endpoint("send_message").unwrap().as_str(),
            "http://localhost:5000/assistant/send_message"
        );
    }

    #[test]
    fn test_endpoint_at_root() {
        let backend = HttpBackend::new(
            "http://localhost:5000",
            Duration::from_secs(5),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            backend.endpoint("get_faqs").unwrap().as_str(),
            "http://localhost:5000/get_faqs"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(HttpBackend::new("not a url", Duration::from_secs(1), Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_error_text_reads_both_shapes() {
        assert_eq!(
            error_text(r#"{"response": "Please enter a message."}"#).as_deref(),
            Some("Please enter a message.")
        );
        assert_eq!(
            error_text(r#"{"success": false, "message": "File type not allowed"}"#).as_deref(),
            Some("File type not allowed")
        );
        assert_eq!(error_text("<html>502 Bad Gateway</html>"), None);
        assert_eq!(error_text(r#"{"response": "  "}"#), None);
    }
}
