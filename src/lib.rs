//! Speedtest Notifier
//!
//! Turns a batch of per-node speed test results into a short text summary
//! and posts the result picture, with that summary as caption, to a
//! Telegram chat through the Bot API.

pub mod app;
pub mod cli;
pub mod config;
pub mod client;
pub mod error;
pub mod logging;
pub mod models;
pub mod notifier;
pub mod output;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{NodeResult, ResultSet, TelegramConfig};
pub use notifier::TelegramNotifier;
pub use output::summarize;
pub use stats::{parse_leading_number, NodeStatistics};
pub use types::UploadOutcome;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
    pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);
    pub const MAX_REDIRECTS: usize = 10;
    /// Literal substring a successful Bot API reply must contain
    pub const API_SUCCESS_MARKER: &str = "\"ok\":true";
    /// Used when the photo path has no file name component
    pub const FALLBACK_PHOTO_NAME: &str = "photo.png";

    pub const DEFAULT_CONFIG_FILE: &str = "pref.ini";
    pub const CONFIG_SECTION: &str = "telegram";
    pub const KEY_ENABLE: &str = "enable_telegram";
    pub const KEY_BOT_TOKEN: &str = "telegram_bot_token";
    pub const KEY_CHAT_ID: &str = "telegram_chat_id";
    pub const KEY_SEND_CAPTION: &str = "telegram_send_caption";

    /// Speed text of a node that produced no measurement
    pub const SPEED_UNAVAILABLE: &str = "N/A";
    /// Ping text of a node that produced no measurement
    pub const PING_UNMEASURED: &str = "0.00";
    /// Pings at or above this are never reported as best
    pub const PING_SENTINEL_MS: f64 = 9999.0;
}
