//! Telegram configuration data model

use crate::defaults;
use crate::types::{AppError, Result};
use ini::Ini;
use serde::{Deserialize, Serialize};

/// Telegram notification settings, as read from the `[telegram]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// `enable_telegram`
    #[serde(default)]
    pub enabled: bool,

    /// `telegram_bot_token`
    #[serde(default)]
    pub bot_token: String,

    /// `telegram_chat_id`
    #[serde(default)]
    pub chat_id: String,

    /// `telegram_send_caption`
    #[serde(default)]
    pub send_caption: bool,
}

impl TelegramConfig {
    /// Create a disabled configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications go out only when switched on and both token and chat id are set
    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }

    /// Build from parsed INI content; a missing section or key reads as empty/false
    pub fn from_ini(ini: &Ini) -> Self {
        let section = ini.section(Some(defaults::CONFIG_SECTION));
        let get = |key: &str| -> String {
            section
                .and_then(|props| props.get(key))
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            enabled: parse_flag(&get(defaults::KEY_ENABLE)),
            bot_token: get(defaults::KEY_BOT_TOKEN),
            chat_id: get(defaults::KEY_CHAT_ID),
            send_caption: parse_flag(&get(defaults::KEY_SEND_CAPTION)),
        }
    }

    /// Merge `TELEGRAM_*` environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(enabled) = std::env::var("TELEGRAM_ENABLE") {
            self.enabled = parse_env_flag("TELEGRAM_ENABLE", &enabled)?;
        }

        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            self.bot_token = token.trim().to_string();
        }

        if let Ok(chat_id) = std::env::var("TELEGRAM_CHAT_ID") {
            self.chat_id = chat_id.trim().to_string();
        }

        if let Ok(send_caption) = std::env::var("TELEGRAM_SEND_CAPTION") {
            self.send_caption = parse_env_flag("TELEGRAM_SEND_CAPTION", &send_caption)?;
        }

        Ok(())
    }

    /// Bot token with everything but the bot id masked, for display
    pub fn masked_token(&self) -> String {
        match self.bot_token.split_once(':') {
            Some((bot_id, secret)) if !secret.is_empty() => format!("{}:***", bot_id),
            _ if self.bot_token.is_empty() => String::new(),
            _ => "***".to_string(),
        }
    }
}

/// INI-style boolean: `true`, `1`, `yes` and `on` in any case; anything else is false
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Environment booleans are stricter than the INI file: unknown words are an error
pub(crate) fn parse_env_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(AppError::config(format!("Invalid {} value '{}': expected true or false", key, value))),
    }
}
