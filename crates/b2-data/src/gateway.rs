//! HTTP implementation of the carrier gateway
//!
//! Speaks to the Flask-style backend: multipart upload, JSON option listing,
//! JSON save request answered with CSV bytes. Error bodies share one shape,
//! `{"error": "..."}`; the message is surfaced to the user verbatim, with a
//! generic fallback when the body carries none.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use b2_core::services::{
    CarrierGateway, ExportedFile, OptionListing, SaveRequest, UploadedManifest,
};

use crate::config::GatewayConfig;
use crate::DataError;

/// Filename used when the save service suggests none.
pub const DEFAULT_EXPORT_NAME: &str = "yamato_output.csv";

/// Error payload shape shared by all backend endpoints
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Reqwest-backed gateway against a single base URL.
pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Translate a non-success response into the server's own error message,
    /// or a generic fallback when the body carries none.
    async fn ensure_ok(
        response: reqwest::Response,
        label: &str,
    ) -> Result<reqwest::Response, DataError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| format!("{label} failed with status {status}"));
        Err(DataError::Server(message))
    }
}

/// Extract the suggested filename from a `Content-Disposition` header.
/// Best effort: a missing header, a malformed header, or an empty capture
/// all fall back to the fixed default name.
pub fn filename_from_content_disposition(header: Option<&str>) -> String {
    let fallback = || DEFAULT_EXPORT_NAME.to_string();
    let Some(header) = header else {
        return fallback();
    };
    let Ok(pattern) = Regex::new(r#"filename="?([^";]+)"?"#) else {
        return fallback();
    };
    pattern
        .captures(header)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(fallback)
}

#[async_trait]
impl CarrierGateway for HttpGateway {
    async fn upload(&self, file: &Path) -> Result<UploadedManifest> {
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("reading {}", file.display()))?;
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("manifest.csv")
            .to_string();

        tracing::info!("Uploading {} ({} bytes)", file_name, bytes.len());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(DataError::from)?;
        let response = Self::ensure_ok(response, "upload").await?;

        let manifest = response
            .json::<UploadedManifest>()
            .await
            .map_err(|error| DataError::Decode(error.to_string()))?;
        Ok(manifest)
    }

    async fn options(&self) -> Result<OptionListing> {
        let response = self
            .client
            .get(self.url("/options"))
            .send()
            .await
            .map_err(DataError::from)?;
        let response = Self::ensure_ok(response, "options").await?;

        let listing = response
            .json::<OptionListing>()
            .await
            .map_err(|error| DataError::Decode(error.to_string()))?;
        Ok(listing)
    }

    async fn save(&self, request: &SaveRequest) -> Result<ExportedFile> {
        let response = self
            .client
            .post(self.url("/save"))
            .json(request)
            .send()
            .await
            .map_err(DataError::from)?;
        let response = Self::ensure_ok(response, "save").await?;

        let filename = filename_from_content_disposition(
            response
                .headers()
                .get(reqwest::header::CONTENT_DISPOSITION)
                .and_then(|value| value.to_str().ok()),
        );
        let bytes = response.bytes().await.map_err(DataError::from)?.to_vec();

        tracing::info!("Save returned {} ({} bytes)", filename, bytes.len());
        Ok(ExportedFile { filename, bytes })
    }
}
