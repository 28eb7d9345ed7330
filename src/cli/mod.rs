//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

/// Speedtest Notifier - posts speed test result pictures to Telegram
#[derive(Parser, Debug, Clone)]
#[command(name = "stnotify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Result picture to upload
    #[arg(long, value_name = "PATH")]
    pub photo: Option<PathBuf>,

    /// JSON file with node results: an array of nodes or {"group": ..., "nodes": [...]}
    #[arg(long, value_name = "PATH")]
    pub results: Option<PathBuf>,

    /// Group label shown in the caption title
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,

    /// Send this caption instead of the generated summary
    #[arg(long, value_name = "TEXT")]
    pub caption: Option<String>,

    /// INI file holding the [telegram] section
    #[arg(long, value_name = "PATH", env = "TELEGRAM_CONFIG", default_value = crate::defaults::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Never attach a caption, whatever the configuration says
    #[arg(long)]
    pub no_caption: bool,

    /// Print the caption that would be sent and stop
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print an example [telegram] configuration section and exit
    #[arg(long)]
    pub print_example_config: bool,

    /// Bot API server to talk to
    #[arg(long, value_name = "URL", env = "TELEGRAM_API_BASE", default_value = crate::defaults::TELEGRAM_API_BASE, hide = true)]
    pub api_base: String,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.print_example_config {
            return Ok(());
        }

        if self.photo.is_none() && !self.dry_run {
            return Err("Must specify --photo unless --dry-run is used".to_string());
        }

        if self.caption.is_some() && self.no_caption {
            return Err("Cannot specify both --caption and --no-caption".to_string());
        }

        if self.caption.is_some() && (self.results.is_some() || self.group.is_some()) {
            return Err("--caption replaces the generated summary; drop --results/--group".to_string());
        }

        if let Err(e) = url::Url::parse(&self.api_base) {
            return Err(format!("Invalid API base '{}': {}", self.api_base, e));
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        !self.no_color && supports_color()
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Run Summary:\n");
        summary.push_str(&format!("  Config file: {}\n", self.config.display()));
        if let Some(ref photo) = self.photo {
            summary.push_str(&format!("  Photo: {}\n", photo.display()));
        }
        if let Some(ref results) = self.results {
            summary.push_str(&format!("  Results: {}\n", results.display()));
        }
        if let Some(ref group) = self.group {
            summary.push_str(&format!("  Group: {}\n", group));
        }
        summary.push_str(&format!("  Caption: {}\n", if self.no_caption {
            "disabled"
        } else if self.caption.is_some() {
            "explicit"
        } else {
            "generated"
        }));
        summary.push_str(&format!("  Dry run: {}\n", self.dry_run));
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));

        summary
    }
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_basic() {
        let cli = Cli::parse_from(["stnotify", "--photo", "result.png"]);
        assert_eq!(cli.photo.as_deref(), Some(std::path::Path::new("result.png")));
        assert!(cli.results.is_none());
        assert!(!cli.dry_run);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_parsing_all_options() {
        let cli = Cli::parse_from([
            "stnotify",
            "--photo", "out/result.png",
            "--results", "out/results.json",
            "--group", "Premium",
            "--config", "custom.ini",
            "--no-caption",
            "--dry-run",
            "--verbose",
            "--debug",
            "--no-color",
            "--api-base", "http://127.0.0.1:8081",
        ]);

        assert_eq!(cli.results.as_deref(), Some(std::path::Path::new("out/results.json")));
        assert_eq!(cli.group.as_deref(), Some("Premium"));
        assert_eq!(cli.config, PathBuf::from("custom.ini"));
        assert!(cli.no_caption);
        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert!(cli.debug);
        assert!(!cli.use_colors());
        assert_eq!(cli.api_base, "http://127.0.0.1:8081");
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_photo_required_unless_dry_run() {
        let cli = Cli::parse_from(["stnotify"]);
        assert!(cli.validate().unwrap_err().contains("--photo"));

        let dry = Cli::parse_from(["stnotify", "--dry-run"]);
        assert!(dry.validate().is_ok());

        let example = Cli::parse_from(["stnotify", "--print-example-config"]);
        assert!(example.validate().is_ok());
    }

    #[test]
    fn test_conflicting_caption_flags() {
        let cli = Cli::parse_from(["stnotify", "--photo", "a.png", "--caption", "hi", "--no-caption"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["stnotify", "--photo", "a.png", "--caption", "hi", "--results", "r.json"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_invalid_api_base() {
        let cli = Cli::parse_from(["stnotify", "--photo", "a.png", "--api-base", "not a url"]);
        assert!(cli.validate().unwrap_err().contains("Invalid API base"));
    }

    #[test]
    fn test_config_summary() {
        let cli = Cli::parse_from([
            "stnotify",
            "--photo", "result.png",
            "--group", "Premium",
            "--config", "pref.ini",
        ]);

        let summary = cli.get_config_summary();
        assert!(summary.contains("Config file: pref.ini"));
        assert!(summary.contains("Photo: result.png"));
        assert!(summary.contains("Group: Premium"));
        assert!(summary.contains("Caption: generated"));
    }
}
