//! Error types for configuration loading and validation

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

/// Unified configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found error.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Configuration validation error.
    #[error("Invalid configuration:\n{}", format_validation_errors(.0))]
    Validation(#[source] ValidationErrors),

    /// Figment parsing error.
    #[error("Configuration parsing error: {0}")]
    Parsing(#[from] Box<figment::Error>),

    /// I/O error.
    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for (path, errors) in flatten_field_errors("", errors) {
        let _ = writeln!(output, "Field '{}':", path);
        for error in errors {
            let message = match &error.message {
                Some(msg) => msg.to_string(),
                None => error.code.to_string(),
            };
            let _ = writeln!(output, "  - {}", message);
        }
    }
    output
}

/// Walks nested structs so `simulation.noise_level` is reported by full path.
fn flatten_field_errors<'a>(
    prefix: &str,
    errors: &'a ValidationErrors,
) -> Vec<(String, &'a [validator::ValidationError])> {
    use validator::ValidationErrorsKind;

    let mut flat = Vec::new();
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => flat.push((path, errs.as_slice())),
            ValidationErrorsKind::Struct(inner) => flat.extend(flatten_field_errors(&path, inner)),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flat.extend(flatten_field_errors(&format!("{path}[{index}]"), inner));
                }
            }
        }
    }
    flat
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Parsing(Box::new(error))
    }
}
