//! HTTP transport for photo uploads

#[cfg(test)]
mod integration_tests;

use crate::{
    defaults,
    error::{AppError, Result},
};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    redirect, Client,
};
use std::time::Duration;

/// Transport abstraction so uploads can be observed in tests
#[async_trait]
pub trait PhotoTransport: Send + Sync {
    /// POST one multipart `sendPhoto` request and return the raw response
    async fn post_photo(&self, upload: PhotoUpload) -> Result<TransportResponse>;
}

/// Everything that goes into one `sendPhoto` request
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    pub url: String,
    pub chat_id: String,
    pub file_name: String,
    pub photo: Vec<u8>,
    /// Sent as its own form field only when present and non-empty
    pub caption: Option<String>,
}

impl PhotoUpload {
    /// MIME type for the photo part, picked from the file extension
    pub fn mime_type(&self) -> &'static str {
        let extension = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            _ => "application/octet-stream",
        }
    }

    /// Caption text if it should be sent at all
    pub fn caption_field(&self) -> Option<&str> {
        self.caption.as_deref().filter(|caption| !caption.is_empty())
    }

    /// Build the multipart body: `chat_id`, `photo`, then optional `caption`
    pub fn into_form(self) -> Result<Form> {
        let mime = self.mime_type();
        let caption = self.caption_field().map(str::to_string);

        let photo = Part::bytes(self.photo)
            .file_name(self.file_name)
            .mime_str(mime)
            .map_err(|e| AppError::http_request(format!("Invalid photo MIME type '{}': {}", mime, e)))?;

        let mut form = Form::new()
            .text("chat_id", self.chat_id)
            .part("photo", photo);

        if let Some(caption) = caption {
            form = form.text("caption", caption);
        }
        Ok(form)
    }
}

/// Status and body text of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// reqwest-backed transport with certificate verification left on
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport with the default 30 second timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(defaults::UPLOAD_TIMEOUT)
    }

    /// Create a transport with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(defaults::MAX_REDIRECTS))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl PhotoTransport for ReqwestTransport {
    async fn post_photo(&self, upload: PhotoUpload) -> Result<TransportResponse> {
        let url = upload.url.clone();
        let form = upload.into_form()?;

        let response = self.client
            .post(&url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}

/// Endpoint for `sendPhoto` under an API base such as `https://api.telegram.org`
///
/// `bot<token>` is always one percent-encoded path segment, whatever the token holds.
pub fn send_photo_url(api_base: &str, bot_token: &str) -> Result<String> {
    let mut url = url::Url::parse(api_base)?;
    url.path_segments_mut()
        .map_err(|_| AppError::validation(format!("API base '{}' cannot carry a path", api_base)))?
        .pop_if_empty()
        .push(&format!("bot{}", bot_token))
        .push("sendPhoto");
    Ok(url.to_string())
}
