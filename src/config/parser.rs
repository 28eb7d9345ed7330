//! Configuration parsing from the INI file and environment variables

use crate::{
    error::Result,
    models::TelegramConfig,
};
use ini::Ini;
use std::path::{Path, PathBuf};

/// Reads the `[telegram]` section of an INI file, then applies `TELEGRAM_*` overrides
#[derive(Debug, Clone)]
pub struct ConfigParser {
    path: PathBuf,
    apply_env: bool,
}

impl ConfigParser {
    /// Create a parser for the given configuration file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), apply_env: true }
    }

    /// Ignore environment overrides; only the file counts
    pub fn without_env(mut self) -> Self {
        self.apply_env = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file; a missing file is treated as an empty one
    pub fn parse(&self) -> Result<TelegramConfig> {
        let mut config = if self.path.exists() {
            let ini = Ini::load_from_file(&self.path)?;
            TelegramConfig::from_ini(&ini)
        } else {
            TelegramConfig::default()
        };

        if self.apply_env {
            config.merge_from_env()?;
        }

        Ok(config)
    }

    /// Parse the file, reading any problem as "notifications disabled"
    pub fn parse_or_disabled(&self) -> TelegramConfig {
        self.parse().unwrap_or_default()
    }
}

impl TelegramConfig {
    /// Fresh snapshot of the configuration, disabled if it cannot be read
    pub fn load(path: impl AsRef<Path>) -> Self {
        ConfigParser::new(path.as_ref()).parse_or_disabled()
    }

    /// Fresh snapshot of the configuration, reporting unreadable files
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        ConfigParser::new(path.as_ref()).parse()
    }
}

/// Accessors that re-read the configuration file on every call
///
/// Two calls may observe different files if it is edited in between; use
/// [`ConfigSource::snapshot`] when several values must agree.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    parser: ConfigParser,
}

impl ConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { parser: ConfigParser::new(path) }
    }

    /// Build from an already configured parser
    pub fn from_parser(parser: ConfigParser) -> Self {
        Self { parser }
    }

    /// Read every value at once
    pub fn snapshot(&self) -> TelegramConfig {
        self.parser.parse_or_disabled()
    }

    /// Switched on, with both token and chat id present
    pub fn is_enabled(&self) -> bool {
        self.snapshot().is_enabled()
    }

    pub fn bot_token(&self) -> String {
        self.snapshot().bot_token
    }

    pub fn chat_id(&self) -> String {
        self.snapshot().chat_id
    }

    pub fn send_caption(&self) -> bool {
        self.snapshot().send_caption
    }
}

/// Convenience function to load the configuration used by one run
pub fn load_config(path: impl AsRef<Path>) -> Result<TelegramConfig> {
    TelegramConfig::try_load(path)
}

/// Display configuration summary for debug purposes; the token is masked
pub fn display_config_summary(config: &TelegramConfig) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Enabled: {}", config.enabled));
    summary.push(format!("Bot Token: {}", if config.bot_token.is_empty() { "(not set)".to_string() } else { config.masked_token() }));
    summary.push(format!("Chat ID: {}", if config.chat_id.is_empty() { "(not set)" } else { config.chat_id.as_str() }));
    summary.push(format!("Send Caption: {}", config.send_caption));
    summary.push(format!("Ready: {}", config.is_enabled()));

    summary.join("\n")
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FULL: &str = "[common]\nspeedtest_mode=all\n\n\
                        [telegram]\n\
                        enable_telegram=true\n\
                        telegram_bot_token=123456:ABC-def\n\
                        telegram_chat_id=-100987\n\
                        telegram_send_caption=true\n";

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pref.ini");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_parse_full_file() {
        let (_dir, path) = write_config(FULL);
        let config = ConfigParser::new(&path).without_env().parse().unwrap();

        assert!(config.is_enabled());
        assert_eq!(config.bot_token, "123456:ABC-def");
        assert_eq!(config.chat_id, "-100987");
        assert!(config.send_caption);
    }

    #[test]
    fn test_missing_file_is_disabled() {
        let dir = TempDir::new().unwrap();
        let parser = ConfigParser::new(dir.path().join("absent.ini")).without_env();

        let config = parser.parse().unwrap();
        assert_eq!(config, TelegramConfig::default());
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_broken_file_is_error_but_lenient_load_disables() {
        let (_dir, path) = write_config("[telegram\nenable_telegram=true\n");
        let parser = ConfigParser::new(&path).without_env();

        assert!(parser.parse().is_err());
        assert!(!parser.parse_or_disabled().is_enabled());
    }

    #[test]
    fn test_source_rereads_on_every_access() {
        let (_dir, path) = write_config(FULL);
        let source = ConfigSource::from_parser(ConfigParser::new(&path).without_env());

        assert!(source.is_enabled());
        assert_eq!(source.chat_id(), "-100987");

        fs::write(&path, FULL.replace("-100987", "@other_channel").replace("enable_telegram=true", "enable_telegram=false")).unwrap();

        assert!(!source.is_enabled());
        assert_eq!(source.chat_id(), "@other_channel");
        assert_eq!(source.bot_token(), "123456:ABC-def");
        assert!(source.send_caption());
    }

    #[test]
    fn test_source_snapshot_matches_accessors() {
        let (_dir, path) = write_config(FULL);
        let source = ConfigSource::from_parser(ConfigParser::new(&path).without_env());
        let snapshot = source.snapshot();

        assert_eq!(snapshot.is_enabled(), source.is_enabled());
        assert_eq!(snapshot.bot_token, source.bot_token());
        assert_eq!(snapshot.chat_id, source.chat_id());
        assert_eq!(snapshot.send_caption, source.send_caption());
    }

    #[test]
    fn test_config_summary_masks_token() {
        let (_dir, path) = write_config(FULL);
        let config = ConfigParser::new(&path).without_env().parse().unwrap();
        let summary = display_config_summary(&config);

        assert!(summary.contains("Bot Token: 123456:***"));
        assert!(!summary.contains("ABC-def"));
        assert!(summary.contains("Chat ID: -100987"));
        assert!(summary.contains("Ready: true"));

        let empty = display_config_summary(&TelegramConfig::default());
        assert!(empty.contains("Bot Token: (not set)"));
        assert!(empty.contains("Ready: false"));
    }
}
