//! Main application orchestration and execution

use crate::{
    cli::Cli,
    config::{display_config_summary, validate_config, EnvManager},
    error::{AppError, ErrorContext, Result},
    logging::{LogOptions, Logger},
    models::{ResultSet, TelegramConfig},
    notifier::TelegramNotifier,
    output::preview_caption,
};
use colored::Colorize;
use std::path::Path;

/// How a run finished without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    ExampleConfigPrinted,
    /// Configuration switched off or incomplete
    Disabled,
    DryRun,
    /// A results file was given but held no nodes
    NothingToSend,
    Sent,
}

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
    logger: Logger,
    use_color: bool,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        let use_color = cli.use_colors();
        let logger = Logger::with_options(
            crate::PKG_NAME.to_string(),
            &LogOptions { verbose: cli.verbose, debug: cli.debug, enable_color: use_color },
        );
        Self::with_logger(cli, logger)
    }

    /// Create an application instance that logs through `logger`
    pub fn with_logger(cli: Cli, logger: Logger) -> Result<Self> {
        cli.validate().map_err(AppError::validation)?;
        let use_color = cli.use_colors();
        Ok(Self { cli, logger, use_color })
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Run the application
    pub async fn run(self) -> Result<RunOutcome> {
        if self.cli.print_example_config {
            print!("{}", EnvManager::create_example_ini_content());
            return Ok(RunOutcome::ExampleConfigPrinted);
        }

        self.logger.set_session_id(uuid::Uuid::new_v4().to_string()).await;
        let config = self.load_configuration().await;

        if !config.is_enabled() && !self.cli.dry_run {
            self.notice("Telegram notifications are disabled; nothing to send");
            return Ok(RunOutcome::Disabled);
        }

        let caption = match self.build_caption(&config).await? {
            CaptionPlan::Skip => {
                self.notice("No node results to report; skipping upload");
                return Ok(RunOutcome::NothingToSend);
            }
            CaptionPlan::Send(caption) => caption,
        };

        if self.cli.dry_run {
            println!("{}", preview_caption(caption.as_deref().unwrap_or_default(), self.use_color));
            return Ok(RunOutcome::DryRun);
        }

        let photo = self.cli.photo.as_deref()
            .ok_or_else(|| AppError::validation("Must specify --photo unless --dry-run is used"))?;

        let notifier = TelegramNotifier::new(self.logger.clone())
            .context("Failed to set up the HTTP client")?
            .with_api_base(self.cli.api_base.clone());
        notifier.notify(&config, photo, caption.as_deref()).await.into_result()?;

        self.notice(&format!("Photo sent to chat {}", config.chat_id));
        Ok(RunOutcome::Sent)
    }

    /// Load the configuration snapshot for this run; unreadable files read as disabled
    async fn load_configuration(&self) -> TelegramConfig {
        if let Err(e) = EnvManager::load_env_file(self.cli.debug) {
            crate::log_warn!(self.logger, "Ignoring .env file: {}", e);
        }

        for warning in EnvManager::validate_current_env() {
            eprintln!("{}", warning.format(self.use_color));
        }

        let config = match TelegramConfig::try_load(&self.cli.config) {
            Ok(config) => config,
            Err(e) => {
                self.logger.warn(&format!("Could not read {}: {}", self.cli.config.display(), e))
                    .error_info(&e)
                    .log()
                    .await;
                TelegramConfig::default()
            }
        };

        match validate_config(&config) {
            Ok(warnings) => {
                for warning in &warnings {
                    eprintln!("{}", warning.format(self.use_color));
                }
            }
            Err(e) => crate::log_warn!(self.logger, "Configuration checks skipped: {}", e),
        }

        if self.cli.debug {
            println!("{}", display_config_summary(&config));
            println!("{}", self.cli.get_config_summary());
        }

        config
    }

    /// Decide the caption: explicit text, a summary of the results file, or none
    async fn build_caption(&self, config: &TelegramConfig) -> Result<CaptionPlan> {
        if self.cli.no_caption || (!config.send_caption && !self.cli.dry_run) {
            return Ok(CaptionPlan::Send(None));
        }

        if let Some(ref caption) = self.cli.caption {
            return Ok(CaptionPlan::Send(Some(caption.clone())));
        }

        let Some(ref results_path) = self.cli.results else {
            return Ok(CaptionPlan::Send(None));
        };

        let mut results = load_results(results_path).await?;
        if let Some(ref group) = self.cli.group {
            results.group = Some(group.clone());
        }

        self.logger.debug(&format!("Loaded {} node results", results.nodes.len()))
            .field("path", results_path.display().to_string())
            .log()
            .await;

        if results.is_empty() {
            return Ok(CaptionPlan::Skip);
        }
        Ok(CaptionPlan::Send(Some(results.into_caption())))
    }

    fn notice(&self, message: &str) {
        if self.use_color {
            println!("{}", message.cyan());
        } else {
            println!("{}", message);
        }
    }
}

enum CaptionPlan {
    Send(Option<String>),
    Skip,
}

/// Read a results file in either accepted layout
pub async fn load_results(path: &Path) -> Result<ResultSet> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::io(format!("Cannot read results file {}: {}", path.display(), e)))?;

    ResultSet::from_json(&json)
        .map_err(|e| AppError::parse(format!("Invalid results file {}: {}", path.display(), e)))
}
