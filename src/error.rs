//! @ai:module:intent Define error types for the report pipeline
//! @ai:module:layer domain
//! @ai:module:public_api ReportError, Result
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Unified error type for report generation, lookup and rendering
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No template '{format}' for language '{language}'")]
    TemplateNotFound { language: String, format: String },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported report type: {0}")]
    UnsupportedReportType(String),

    #[error("Report {0} not found")]
    RegistryMiss(String),

    #[error("Project {0} not found")]
    ProjectNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization error: {0}")]
    Csv(String),
}

impl ReportError {
    /// @ai:intent Stable machine-readable code used in error response bodies
    /// @ai:effects pure
    pub fn code(&self) -> &'static str {
        match self {
            ReportError::TemplateNotFound { .. } => "TemplateNotFound",
            ReportError::UnsupportedFormat(_) => "UnsupportedFormat",
            ReportError::UnsupportedReportType(_) => "UnsupportedReportType",
            ReportError::RegistryMiss(_) => "RegistryMiss",
            ReportError::ProjectNotFound(_) => "ProjectNotFound",
            ReportError::InvalidRequest(_) => "InvalidRequest",
            ReportError::Config(_) => "Config",
            ReportError::Io(_) => "Io",
            ReportError::Json(_) => "Json",
            ReportError::Csv(_) => "Csv",
        }
    }

    /// @ai:intent Whether the error was caused by caller input rather than the service
    /// @ai:effects pure
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ReportError::TemplateNotFound { .. }
                | ReportError::UnsupportedFormat(_)
                | ReportError::UnsupportedReportType(_)
                | ReportError::RegistryMiss(_)
                | ReportError::ProjectNotFound(_)
                | ReportError::InvalidRequest(_)
        )
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::Csv(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_not_found_message() {
        let err = ReportError::TemplateNotFound {
            language: "en".to_string(),
            format: "pitch_deck".to_string(),
        };
        assert_eq!(err.to_string(), "No template 'pitch_deck' for language 'en'");
        assert_eq!(err.code(), "TemplateNotFound");
        assert!(err.is_user_error());
    }

    #[test]
    fn test_config_error_is_not_user_error() {
        let err = ReportError::Config("fallback template is empty".to_string());
        assert!(!err.is_user_error());
    }
}
