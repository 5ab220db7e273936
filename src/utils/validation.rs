use crate::utils::error::{BoundaryError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BoundaryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BoundaryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(BoundaryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range(field_name: &str, value: u64, min_value: u64, max_value: u64) -> Result<()> {
    if value < min_value || value > max_value {
        return Err(BoundaryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min_value, max_value),
        });
    }
    Ok(())
}

/// `min_points` must be at least 1 and never above `max_points`.
pub fn validate_capture_limits(
    field_name: &str,
    min_points: usize,
    max_points: Option<usize>,
) -> Result<()> {
    validate_positive_number(field_name, min_points, 1)?;

    if let Some(max_points) = max_points {
        if max_points < min_points {
            return Err(BoundaryError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: min_points.to_string(),
                reason: format!("Value exceeds max_points ({})", max_points),
            });
        }
    }
    Ok(())
}

pub fn validate_required_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BoundaryError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Field cannot be empty".to_string(),
        });
    }
    Ok(())
}
