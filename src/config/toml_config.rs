use crate::core::ConfigProvider;
use crate::domain::model::CaptureMode;
use crate::utils::error::{BoundaryError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub session: SessionConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub name: String,
    pub min_points: Option<usize>,
    pub max_points: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CaptureConfig {
    pub mode: Option<String>,
    pub interval_seconds: Option<u64>,
    pub position_timeout_ms: Option<u64>,
    pub maximum_age_ms: Option<u64>,
    pub fixes_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub format: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BoundaryError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BoundaryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BoundaryError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn fixes_file(&self) -> Option<&str> {
        self.capture.fixes_file.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    fn parsed_mode(&self) -> Result<CaptureMode> {
        match self.capture.mode.as_deref() {
            None => Ok(CaptureMode::Manual),
            Some(mode) => mode
                .parse()
                .map_err(|reason| BoundaryError::InvalidConfigValueError {
                    field: "capture.mode".to_string(),
                    value: mode.to_string(),
                    reason,
                }),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_required_string("session.name", &self.session.name)?;
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_capture_limits(
            "session.min_points",
            self.min_points(),
            self.session.max_points,
        )?;
        self.parsed_mode()?;

        if let Some(interval) = self.capture.interval_seconds {
            validation::validate_range("capture.interval_seconds", interval, 1, 60)?;
        }
        if let Some(timeout) = self.capture.position_timeout_ms {
            validation::validate_positive_number(
                "capture.position_timeout_ms",
                timeout as usize,
                1,
            )?;
        }
        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            let valid_formats = ["compact", "json"];
            if !valid_formats.contains(&format) {
                return Err(BoundaryError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        valid_formats.join(", ")
                    ),
                });
            }
        }
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn session_name(&self) -> &str {
        &self.session.name
    }

    fn min_points(&self) -> usize {
        self.session.min_points.unwrap_or(4)
    }

    fn max_points(&self) -> Option<usize> {
        self.session.max_points
    }

    /// Falls back to manual when the mode is invalid; `validate` reports that case.
    fn capture_mode(&self) -> CaptureMode {
        self.parsed_mode().unwrap_or(CaptureMode::Manual)
    }

    fn capture_interval(&self) -> Duration {
        Duration::from_secs(self.capture.interval_seconds.unwrap_or(5))
    }

    fn position_timeout(&self) -> Duration {
        Duration::from_millis(self.capture.position_timeout_ms.unwrap_or(10_000))
    }

    fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.capture.maximum_age_ms.unwrap_or(0))
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[session]
name = "Kpaai farm, plot 3"

[output]
path = "./exports"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(MINIMAL).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_points(), 4);
        assert_eq!(config.max_points(), None);
        assert_eq!(config.capture_mode(), CaptureMode::Manual);
        assert_eq!(config.capture_interval(), Duration::from_secs(5));
        assert_eq!(config.position_timeout(), Duration::from_secs(10));
        assert_eq!(config.maximum_age(), Duration::ZERO);
        assert!(!config.verbose());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[session]
name = "North block"
min_points = 3
max_points = 200

[capture]
mode = "auto"
interval_seconds = 2
position_timeout_ms = 4000
maximum_age_ms = 1000
fixes_file = "track.json"

[output]
path = "/tmp/boundaries"

[logging]
verbose = true
format = "json"
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.capture_mode(), CaptureMode::Auto);
        assert_eq!(config.capture_interval(), Duration::from_secs(2));
        assert_eq!(config.max_points(), Some(200));
        assert_eq!(config.fixes_file(), Some("track.json"));
        assert!(config.verbose());
        assert!(config.json_logs());
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let bad_interval = MINIMAL.replace("[output]", "[capture]\ninterval_seconds = 0\n\n[output]");
        let config = TomlConfig::from_toml_str(&bad_interval).unwrap();
        assert!(config.validate().is_err());

        let bad_mode = MINIMAL.replace("[output]", "[capture]\nmode = \"drive\"\n\n[output]");
        let config = TomlConfig::from_toml_str(&bad_mode).unwrap();
        assert!(matches!(
            config.validate(),
            Err(BoundaryError::InvalidConfigValueError { ref field, .. }) if field == "capture.mode"
        ));
    }

    #[test]
    fn test_unparseable_toml() {
        let err = TomlConfig::from_toml_str("[session\nname = ").unwrap_err();
        assert!(matches!(err, BoundaryError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("BOUNDARY_CAPTURE_TEST_OUT", "/data/out");
        let config = TomlConfig::from_toml_str(
            r#"
[session]
name = "env"

[output]
path = "${BOUNDARY_CAPTURE_TEST_OUT}"
"#,
        )
        .unwrap();
        assert_eq!(config.output_path(), "/data/out");
    }
}
