//! Parameter validation
//!
//! Range checks for the user-facing watermark parameters. All violations are
//! reported as [`AppError::InvalidInput`]; checks run once when a pipeline is
//! constructed, not per image.

use crate::error::AppError;

pub const MIN_PERCENT: u32 = 1;
pub const MAX_PERCENT: u32 = 100;

/// Watermark width as a percentage of the base image width, in [1, 100].
pub fn validate_size_percent(size_percent: u32) -> Result<(), AppError> {
    if !(MIN_PERCENT..=MAX_PERCENT).contains(&size_percent) {
        return Err(AppError::InvalidInput(format!(
            "size_percent must be between {} and {}, got {}",
            MIN_PERCENT, MAX_PERCENT, size_percent
        )));
    }
    Ok(())
}

/// Opacity multiplier in [0.0, 1.0]; NaN and infinities are rejected.
pub fn validate_opacity(opacity: f32) -> Result<(), AppError> {
    if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
        return Err(AppError::InvalidInput(format!(
            "opacity must be between 0.0 and 1.0, got {}",
            opacity
        )));
    }
    Ok(())
}

/// Cap on the base image dimensions as a percentage of the original, in [1, 100].
pub fn validate_max_dimension_percent(max_dimension_percent: u32) -> Result<(), AppError> {
    if !(MIN_PERCENT..=MAX_PERCENT).contains(&max_dimension_percent) {
        return Err(AppError::InvalidInput(format!(
            "max_dimension_percent must be between {} and {}, got {}",
            MIN_PERCENT, MAX_PERCENT, max_dimension_percent
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_percent_range() {
        assert!(validate_size_percent(1).is_ok());
        assert!(validate_size_percent(50).is_ok());
        assert!(validate_size_percent(100).is_ok());

        assert!(validate_size_percent(0).is_err());
        assert!(validate_size_percent(101).is_err());
    }

    #[test]
    fn test_opacity_range() {
        assert!(validate_opacity(0.0).is_ok());
        assert!(validate_opacity(0.2).is_ok());
        assert!(validate_opacity(1.0).is_ok());

        assert!(validate_opacity(-0.1).is_err());
        assert!(validate_opacity(1.1).is_err());
        assert!(validate_opacity(f32::NAN).is_err());
        assert!(validate_opacity(f32::INFINITY).is_err());
    }

    #[test]
    fn test_max_dimension_percent_range() {
        assert!(validate_max_dimension_percent(1).is_ok());
        assert!(validate_max_dimension_percent(100).is_ok());

        assert!(validate_max_dimension_percent(0).is_err());
        assert!(validate_max_dimension_percent(150).is_err());
    }

    #[test]
    fn test_invalid_input_error_type() {
        let err = validate_size_percent(0).unwrap_err();
        assert_eq!(err.error_type(), "InvalidInput");
    }
}
