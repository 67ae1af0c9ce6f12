//! @ai:module:intent Report model, identifiers, rendering and storage
//! @ai:module:layer domain
//! @ai:module:public_api Report, ReportFormatter, ReportIdGenerator, ReportRegistry

pub mod formatter;
pub mod id;
pub mod registry;
pub mod standard;
pub mod types;

pub use formatter::{RenderedReport, ReportFormatter};
pub use id::{IssuedId, ReportIdGenerator};
pub use registry::{ReportRegistry, StoredReport};
pub use standard::{format_currency, narrative_fields, StandardOptions};
pub use types::{OutputFormat, Report, ReportKind, ReportPayload, ReportStatus, ReportType};
