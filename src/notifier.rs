//! Telegram `sendPhoto` notifier
//!
//! Validates its inputs, reads the photo, performs exactly one upload and
//! reports the result as a boolean plus log lines. Nothing here retries.

use crate::{
    client::{send_photo_url, PhotoTransport, PhotoUpload, ReqwestTransport, TransportResponse},
    defaults,
    error::Result,
    logging::Logger,
    models::TelegramConfig,
    types::UploadOutcome,
};
use serde::Deserialize;
use std::path::Path;

/// Shape of a Bot API reply, used only to enrich error logs
#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

/// Sends result photos to a Telegram chat
pub struct TelegramNotifier<T = ReqwestTransport> {
    transport: T,
    logger: Logger,
    api_base: String,
}

impl TelegramNotifier<ReqwestTransport> {
    /// Notifier talking to the public Bot API over reqwest
    pub fn new(logger: Logger) -> Result<Self> {
        Ok(Self::with_transport(ReqwestTransport::new()?, logger))
    }
}

impl<T: PhotoTransport> TelegramNotifier<T> {
    pub fn with_transport(transport: T, logger: Logger) -> Self {
        Self {
            transport,
            logger,
            api_base: defaults::TELEGRAM_API_BASE.to_string(),
        }
    }

    /// Point the notifier at another Bot API server
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Upload `photo_path` to `chat_id`; true only if the API acknowledged it
    pub async fn send_photo(
        &self,
        bot_token: &str,
        chat_id: &str,
        photo_path: impl AsRef<Path>,
        caption: Option<&str>,
    ) -> bool {
        self.send_photo_outcome(bot_token, chat_id, photo_path, caption)
            .await
            .is_success()
    }

    /// Same as [`send_photo`](Self::send_photo), keeping the failure reason
    pub async fn send_photo_outcome(
        &self,
        bot_token: &str,
        chat_id: &str,
        photo_path: impl AsRef<Path>,
        caption: Option<&str>,
    ) -> UploadOutcome {
        let photo_path = photo_path.as_ref();

        if bot_token.is_empty() || chat_id.is_empty() || photo_path.as_os_str().is_empty() {
            let message = "Missing required parameters";
            self.logger.error(message)
                .field("has_token", !bot_token.is_empty())
                .field("has_chat_id", !chat_id.is_empty())
                .field("has_photo_path", !photo_path.as_os_str().is_empty())
                .log()
                .await;
            return UploadOutcome::InvalidInput(message.to_string());
        }

        let photo = match tokio::fs::read(photo_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let message = format!("Photo file not found: {}", photo_path.display());
                self.logger.error(&message).field("io_error", e.to_string()).log().await;
                return UploadOutcome::FileUnavailable(message);
            }
        };

        let url = match send_photo_url(&self.api_base, bot_token) {
            Ok(url) => url,
            Err(e) => {
                let message = format!("Cannot build sendPhoto URL: {}", e);
                self.logger.error(&message).error_info(&e).log().await;
                return UploadOutcome::InvalidInput(message);
            }
        };

        let file_name = photo_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| defaults::FALLBACK_PHOTO_NAME.to_string());

        let upload = PhotoUpload {
            url,
            chat_id: chat_id.to_string(),
            file_name,
            photo,
            caption: caption.map(str::to_string),
        };

        let correlation_id = self.logger.start_operation("send_photo").await;
        self.logger.info(&format!("Sending photo to chat {}", chat_id))
            .field("bytes", upload.photo.len())
            .field("with_caption", upload.caption_field().is_some())
            .log()
            .await;

        let outcome = match self.transport.post_photo(upload).await {
            Ok(response) => self.interpret(&response).await,
            Err(e) => {
                let message = format!("Failed to send photo: {}", e);
                self.logger.error(&message).error_info(&e).log().await;
                UploadOutcome::TransportFailure(e.to_string())
            }
        };

        self.logger.end_operation(&correlation_id, "send_photo", outcome.is_success()).await;
        outcome
    }

    /// Upload using a loaded configuration; disabled configurations send nothing
    pub async fn notify(
        &self,
        config: &TelegramConfig,
        photo_path: impl AsRef<Path>,
        caption: Option<&str>,
    ) -> UploadOutcome {
        if !config.is_enabled() {
            self.logger.debug("Telegram notifications disabled, skipping upload").log().await;
            return UploadOutcome::InvalidInput("Telegram notifications are disabled".to_string());
        }

        let caption = caption.filter(|_| config.send_caption);
        self.send_photo_outcome(&config.bot_token, &config.chat_id, photo_path, caption).await
    }

    async fn interpret(&self, response: &TransportResponse) -> UploadOutcome {
        match interpret_response(response) {
            UploadOutcome::Sent => {
                self.logger.info("Photo sent successfully").field("status", response.status).log().await;
                UploadOutcome::Sent
            }
            rejected => {
                let mut entry = self.logger.error(&format!("API error - {}", response.body))
                    .field("status", response.status);
                if let Some(reply) = parse_reply(&response.body) {
                    entry = entry
                        .field("ok", reply.ok)
                        .field("error_code", reply.error_code)
                        .field("description", reply.description);
                }
                entry.log().await;
                rejected
            }
        }
    }
}

/// Decide success from a raw response: 2xx and the literal `"ok":true` marker
///
/// The marker check is a plain substring search. It tolerates any key order
/// but not whitespace inside the marker.
pub fn interpret_response(response: &TransportResponse) -> UploadOutcome {
    if response.is_success() && response.body.contains(defaults::API_SUCCESS_MARKER) {
        UploadOutcome::Sent
    } else if response.is_success() {
        UploadOutcome::ApiRejected(response.body.clone())
    } else {
        UploadOutcome::ApiRejected(format!("HTTP {}: {}", response.status, response.body))
    }
}

fn parse_reply(body: &str) -> Option<ApiReply> {
    serde_json::from_str(body).ok()
}
