use crate::domain::model::SessionStatus;
use thiserror::Error;
use uuid::Uuid;

/// Failure reported by a position source when no fix could be produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error("timed out waiting for a position fix")]
    Timeout,

    #[error("permission to read the location was denied")]
    PermissionDenied,

    #[error("no satellite signal available")]
    NoSignal,

    #[error("no position source is available on this device")]
    Unsupported,

    #[error("position source failed: {0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum BoundaryError {
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}, accuracy {accuracy_m}m")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        accuracy_m: f64,
    },

    #[error("Insufficient points: {actual} captured, at least {required} required")]
    InsufficientPoints { required: usize, actual: usize },

    #[error("Session is closed ({status:?}) and can no longer be modified")]
    SessionClosed { status: SessionStatus },

    #[error("Position unavailable: {0}")]
    PositionUnavailable(#[from] PositionError),

    #[error("Point {0} does not belong to this session")]
    PointNotFound(Uuid),

    #[error("Point {0} is locked")]
    PointLocked(Uuid),

    #[error("Cannot move a {from:?} session to {to:?}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("Capture has not been started")]
    CaptureNotStarted,

    #[error("Point limit of {max_points} reached")]
    PointLimitReached { max_points: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Session,
    Sensor,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
}

impl BoundaryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BoundaryError::InvalidCoordinate { .. } => ErrorCategory::Input,
            BoundaryError::InsufficientPoints { .. }
            | BoundaryError::SessionClosed { .. }
            | BoundaryError::PointNotFound(_)
            | BoundaryError::PointLocked(_)
            | BoundaryError::InvalidTransition { .. }
            | BoundaryError::CaptureNotStarted
            | BoundaryError::PointLimitReached { .. } => ErrorCategory::Session,
            BoundaryError::PositionUnavailable(_) => ErrorCategory::Sensor,
            BoundaryError::IoError(_) | BoundaryError::SerializationError(_) => {
                ErrorCategory::Storage
            }
            BoundaryError::ConfigError { .. }
            | BoundaryError::ConfigValidationError { .. }
            | BoundaryError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // Operator can keep walking the boundary
            ErrorCategory::Input | ErrorCategory::Sensor => ErrorSeverity::Low,
            ErrorCategory::Session => ErrorSeverity::Medium,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            BoundaryError::InvalidCoordinate { .. } => {
                "Discard the fix and capture the point again".to_string()
            }
            BoundaryError::InsufficientPoints { required, actual } => format!(
                "Capture {} more point(s) before completing the boundary",
                required.saturating_sub(*actual)
            ),
            BoundaryError::SessionClosed { .. } => {
                "Reset the session to start a new boundary".to_string()
            }
            BoundaryError::PositionUnavailable(PositionError::PermissionDenied) => {
                "Grant location permission and try again".to_string()
            }
            BoundaryError::PositionUnavailable(_) => {
                "Move to open sky and retry the capture".to_string()
            }
            BoundaryError::PointNotFound(_) => "Refresh the point list and retry".to_string(),
            BoundaryError::PointLocked(_) => {
                "Locked points can only be discarded by resetting the session".to_string()
            }
            BoundaryError::InvalidTransition { .. } => {
                "Complete the boundary before stamping it".to_string()
            }
            BoundaryError::CaptureNotStarted => "Start recording before capturing".to_string(),
            BoundaryError::PointLimitReached { .. } => {
                "Remove points or raise the point limit".to_string()
            }
            BoundaryError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            BoundaryError::SerializationError(_) => {
                "Check that the input file is valid JSON".to_string()
            }
            BoundaryError::ConfigError { .. }
            | BoundaryError::ConfigValidationError { .. }
            | BoundaryError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The GPS fix was rejected: {}", self),
            ErrorCategory::Session => format!("The boundary cannot be changed: {}", self),
            ErrorCategory::Sensor => format!("Could not read the current position: {}", self),
            ErrorCategory::Storage => format!("Could not save or load data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoundaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_error_converts_to_unavailable() {
        let err: BoundaryError = PositionError::Timeout.into();
        assert!(matches!(
            err,
            BoundaryError::PositionUnavailable(PositionError::Timeout)
        ));
        assert_eq!(err.category(), ErrorCategory::Sensor);
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_insufficient_points_suggestion_counts_missing() {
        let err = BoundaryError::InsufficientPoints {
            required: 4,
            actual: 1,
        };
        assert!(err.recovery_suggestion().contains("3 more"));
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = BoundaryError::InvalidConfigValueError {
            field: "capture.interval_seconds".to_string(),
            value: "0".to_string(),
            reason: "out of range".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().starts_with("Invalid configuration"));
    }
}
