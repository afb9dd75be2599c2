//! Custom validation functions for configuration.

use validator::ValidationError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a `tracing` level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Validate that a slider value sits on a whole step.
pub fn validate_whole_step(value: f64) -> Result<(), ValidationError> {
    if value.fract() == 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("not_on_slider_step"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels() {
        assert!(validate_log_level("INFO").is_ok());
        assert!(validate_log_level("verbose").is_err());
    }

    #[test]
    fn test_whole_step() {
        assert!(validate_whole_step(5.0).is_ok());
        assert!(validate_whole_step(5.5).is_err());
    }
}
