//! Environment variable handling, .env loading and example configuration files

use crate::{
    config::validation::{ValidationLevel, ValidationWarning},
    defaults,
    error::{AppError, Result},
    models::config::parse_env_flag,
};
use std::path::Path;

/// Environment is process-wide; tests that read or write it hold this lock
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                eprintln!("Loaded environment from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using {} and command-line arguments", defaults::DEFAULT_CONFIG_FILE);
        }

        Ok(())
    }

    /// Example `pref.ini` fragment with the Telegram section
    pub fn create_example_ini_content() -> String {
        format!(
            r#"; Telegram notification settings
;
; When enabled, the result picture of every test run is posted to the
; chat below. Environment variables TELEGRAM_ENABLE, TELEGRAM_BOT_TOKEN,
; TELEGRAM_CHAT_ID and TELEGRAM_SEND_CAPTION override these values.

[{section}]
; Post results to Telegram (true/false)
{enable}=false

; Token issued by @BotFather, e.g. 123456789:AAExampleSecret
{token}=

; Numeric chat id (groups are negative) or @channel_username
{chat}=

; Attach the text summary as the photo caption (true/false)
{caption}=true
"#,
            section = defaults::CONFIG_SECTION,
            enable = defaults::KEY_ENABLE,
            token = defaults::KEY_BOT_TOKEN,
            chat = defaults::KEY_CHAT_ID,
            caption = defaults::KEY_SEND_CAPTION,
        )
    }

    /// Check one `TELEGRAM_*` value the way the environment merge will read it
    ///
    /// Tokens and chat ids are trimmed before use, so only what survives the
    /// trim is checked.
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "TELEGRAM_ENABLE" | "TELEGRAM_SEND_CAPTION" => {
                parse_env_flag(key, value)?;
            }
            "TELEGRAM_BOT_TOKEN" => {
                if value.trim().chars().any(char::is_whitespace) {
                    return Err(AppError::config("TELEGRAM_BOT_TOKEN must not contain whitespace"));
                }
            }
            "TELEGRAM_CHAT_ID" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("TELEGRAM_CHAT_ID is set but empty; it clears the configured chat id"));
                }
            }
            "TELEGRAM_CONFIG" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("TELEGRAM_CONFIG is set but empty"));
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("TELEGRAM_ENABLE", "Override enable_telegram", "true"),
            ("TELEGRAM_BOT_TOKEN", "Override telegram_bot_token", "123456789:AAExampleSecret"),
            ("TELEGRAM_CHAT_ID", "Override telegram_chat_id", "-1001234567890"),
            ("TELEGRAM_SEND_CAPTION", "Override telegram_send_caption", "false"),
            ("TELEGRAM_CONFIG", "Path of the INI configuration file", defaults::DEFAULT_CONFIG_FILE),
        ]
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<ValidationWarning> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var_name, _, _)| {
                let value = std::env::var(var_name).ok()?;
                Self::validate_env_var(var_name, &value)
                    .err()
                    .map(|e| ValidationWarning::new(ValidationLevel::Warning, e.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TelegramConfig;
    use ini::Ini;

    fn clear_telegram_env() {
        for (var_name, _, _) in EnvManager::get_supported_env_vars() {
            std::env::remove_var(var_name);
        }
    }

    #[test]
    fn test_example_content_is_valid_ini() {
        let content = EnvManager::create_example_ini_content();
        let ini = Ini::load_from_str(&content).unwrap();
        let config = TelegramConfig::from_ini(&ini);

        assert!(!config.enabled);
        assert!(config.bot_token.is_empty());
        assert!(config.send_caption);
        assert!(content.contains("[telegram]"));
        assert!(content.contains("telegram_chat_id="));
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("TELEGRAM_ENABLE", "yes").is_ok());
        assert!(EnvManager::validate_env_var("TELEGRAM_SEND_CAPTION", "0").is_ok());
        assert!(EnvManager::validate_env_var("TELEGRAM_BOT_TOKEN", "1:abc").is_ok());
        assert!(EnvManager::validate_env_var("TELEGRAM_CHAT_ID", "@channel").is_ok());
        assert!(EnvManager::validate_env_var("UNRELATED", "anything").is_ok());

        assert!(EnvManager::validate_env_var("TELEGRAM_ENABLE", "maybe").is_err());
        assert!(EnvManager::validate_env_var("TELEGRAM_BOT_TOKEN", "1: abc").is_err());
        assert!(EnvManager::validate_env_var("TELEGRAM_CHAT_ID", "  ").is_err());
        assert!(EnvManager::validate_env_var("TELEGRAM_CONFIG", "").is_err());
    }

    #[test]
    fn test_env_checks_agree_with_merge() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_telegram_env();

        std::env::set_var("TELEGRAM_BOT_TOKEN", " 1:abc \n");
        std::env::set_var("TELEGRAM_ENABLE", " ON ");
        let warnings = EnvManager::validate_current_env();
        let mut config = TelegramConfig::default();
        let merged = config.merge_from_env();
        clear_telegram_env();

        assert!(warnings.is_empty());
        assert!(merged.is_ok());
        assert_eq!(config.bot_token, "1:abc");
        assert!(config.enabled);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_telegram_env();

        let ini = Ini::load_from_str(
            "[telegram]\nenable_telegram=false\ntelegram_bot_token=1:file\ntelegram_chat_id=42\n",
        )
        .unwrap();
        let mut config = TelegramConfig::from_ini(&ini);

        std::env::set_var("TELEGRAM_ENABLE", "true");
        std::env::set_var("TELEGRAM_BOT_TOKEN", " 2:env ");
        config.merge_from_env().unwrap();
        clear_telegram_env();

        assert!(config.is_enabled());
        assert_eq!(config.bot_token, "2:env");
        assert_eq!(config.chat_id, "42");
        assert!(!config.send_caption);
    }

    #[test]
    fn test_invalid_env_flag_is_reported() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_telegram_env();

        std::env::set_var("TELEGRAM_SEND_CAPTION", "sometimes");
        let mut config = TelegramConfig::default();
        let result = config.merge_from_env();
        let warnings = EnvManager::validate_current_env();
        clear_telegram_env();

        assert!(result.is_err());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, ValidationLevel::Warning);
        assert!(warnings[0].message.contains("TELEGRAM_SEND_CAPTION"));
    }

    #[test]
    fn test_validate_current_env_empty() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_telegram_env();

        assert!(EnvManager::validate_current_env().is_empty());
    }
}
