//! Configuration validation utilities and rules

use crate::{
    defaults,
    error::{AppError, Result},
    models::TelegramConfig,
};
use colored::Colorize;
use regex::Regex;

const BOT_TOKEN_PATTERN: &str = r"^\d+:[A-Za-z0-9_-]+$";
const CHAT_ID_PATTERN: &str = r"^(-?\d+|@[A-Za-z][A-Za-z0-9_]{3,})$";

/// Checks a loaded configuration for values Telegram will certainly reject
///
/// Nothing here stops a run: an incomplete configuration simply reads as
/// disabled, and the warnings explain why.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &TelegramConfig) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        warnings.extend(Self::validate_completeness(config));
        warnings.extend(Self::validate_bot_token(&config.bot_token)?);
        warnings.extend(Self::validate_chat_id(&config.chat_id)?);

        Ok(warnings)
    }

    fn validate_completeness(config: &TelegramConfig) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.enabled {
            if config.bot_token.is_empty() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("{} is set but {} is empty; notifications stay off", defaults::KEY_ENABLE, defaults::KEY_BOT_TOKEN),
                ));
            }
            if config.chat_id.is_empty() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("{} is set but {} is empty; notifications stay off", defaults::KEY_ENABLE, defaults::KEY_CHAT_ID),
                ));
            }
        } else if !config.bot_token.is_empty() && !config.chat_id.is_empty() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Telegram is configured but {} is off", defaults::KEY_ENABLE),
            ));
        }

        warnings
    }

    fn validate_bot_token(token: &str) -> Result<Vec<ValidationWarning>> {
        if token.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = compile(BOT_TOKEN_PATTERN)?;
        if pattern.is_match(token) {
            Ok(Vec::new())
        } else {
            Ok(vec![ValidationWarning::new(
                ValidationLevel::Warning,
                "Bot token does not look like '<bot id>:<secret>'".to_string(),
            )])
        }
    }

    fn validate_chat_id(chat_id: &str) -> Result<Vec<ValidationWarning>> {
        if chat_id.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = compile(CHAT_ID_PATTERN)?;
        if pattern.is_match(chat_id) {
            Ok(Vec::new())
        } else {
            Ok(vec![ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Chat id '{}' is neither numeric nor an @channel name", chat_id),
            )])
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| AppError::internal(format!("Invalid validation pattern '{}': {}", pattern, e)))
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if !use_color {
            return format!("{} {}", tag, self.message);
        }

        let tag = match self.level {
            ValidationLevel::Info => tag.blue(),
            ValidationLevel::Warning => tag.yellow(),
            ValidationLevel::Error => tag.red(),
        };
        format!("{} {}", tag, self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &TelegramConfig) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
