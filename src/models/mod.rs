//! Data models for the speed test notifier

pub mod config;
pub mod node;

// Re-export main model types
pub use config::TelegramConfig;
pub use node::{NodeResult, ResultSet};
