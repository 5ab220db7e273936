pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::CaptureMode;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "boundary-capture")]
#[command(about = "Capture a field boundary from GPS fixes and measure it")]
pub struct CliConfig {
    /// JSON file with the recorded fixes to replay
    #[arg(long)]
    pub fixes: Option<String>,

    /// TOML configuration file; replaces the capture flags below
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, default_value = "Unnamed field")]
    pub name: String,

    #[arg(long, default_value = "manual")]
    pub mode: CaptureMode,

    #[arg(long, default_value = "5")]
    pub interval_seconds: u64,

    #[arg(long, default_value = "4")]
    pub min_points: usize,

    #[arg(long)]
    pub max_points: Option<usize>,

    #[arg(long, default_value = "10000")]
    pub position_timeout_ms: u64,

    #[arg(long, default_value = "0")]
    pub maximum_age_ms: u64,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn session_name(&self) -> &str {
        &self.name
    }

    fn min_points(&self) -> usize {
        self.min_points
    }

    fn max_points(&self) -> Option<usize> {
        self.max_points
    }

    fn capture_mode(&self) -> CaptureMode {
        self.mode
    }

    fn capture_interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    fn position_timeout(&self) -> Duration {
        Duration::from_millis(self.position_timeout_ms)
    }

    fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.maximum_age_ms)
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_required_string("name", &self.name)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_capture_limits("min_points", self.min_points, self.max_points)?;
        validation::validate_range("interval_seconds", self.interval_seconds, 1, 60)?;
        validation::validate_positive_number("position_timeout_ms", self.position_timeout_ms as usize, 1)?;
        Ok(())
    }
}
