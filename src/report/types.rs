//! @ai:module:intent Report domain types
//! @ai:module:layer domain
//! @ai:module:public_api Report, ReportKind, ReportType, OutputFormat, ReportStatus, ReportPayload
//! @ai:module:stateless true

use crate::error::ReportError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::str::FromStr;

/// @ai:intent Standard report flavours computed directly from project records
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Summary,
    Financial,
    Performance,
    Detailed,
    Timeline,
}

impl ReportType {
    pub const ALL: [ReportType; 5] = [
        ReportType::Summary,
        ReportType::Financial,
        ReportType::Performance,
        ReportType::Detailed,
        ReportType::Timeline,
    ];

    /// @ai:intent Convert report type to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Summary => "summary",
            ReportType::Financial => "financial",
            ReportType::Performance => "performance",
            ReportType::Detailed => "detailed",
            ReportType::Timeline => "timeline",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReportType::Summary => "Summary",
            ReportType::Financial => "Financial",
            ReportType::Performance => "Performance",
            ReportType::Detailed => "Detailed",
            ReportType::Timeline => "Timeline",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ReportType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ReportError::UnsupportedReportType(s.to_string()))
    }
}

/// @ai:intent Output representation of a rendered report
/// @ai:effects pure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Json, OutputFormat::Csv];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    /// @ai:intent File extension used for downloads
    /// @ai:effects pure
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// @ai:intent How the report content was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Computed directly, or an AI provider returned a complete narrative
    Success,
    /// An AI provider answered but stopped at its output token limit
    Partial,
    /// The deterministic fallback provider served the narrative
    Fallback,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Success => "success",
            ReportStatus::Partial => "partial",
            ReportStatus::Fallback => "fallback",
        }
    }
}

/// @ai:intent What produced a report; drives the identifier prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Standard(ReportType),
    Template,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Standard(report_type) => report_type.as_str(),
            ReportKind::Template => "template",
        }
    }
}

impl Serialize for ReportKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// @ai:intent Report content before rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPayload {
    /// Computed metrics of a standard report
    Structured(Map<String, Value>),
    /// Narrative text of a template report
    Narrative { text: String },
}

/// @ai:intent A generated report; immutable once created
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub kind: ReportKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub output_format: OutputFormat,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub payload: ReportPayload,
}
