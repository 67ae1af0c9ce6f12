//! @ai:module:intent Project report service library
//! @ai:module:layer application
//! @ai:module:public_api config, error, templates, providers, report, projects, service, http

pub mod config;
pub mod error;
pub mod http;
pub mod projects;
pub mod providers;
pub mod report;
pub mod service;
pub mod templates;

pub use config::{ProviderAvailability, ServiceConfig};
pub use error::{ReportError, Result};
pub use http::{build_router, AppState};
pub use projects::{Project, ProjectStore};
pub use providers::{GenerationOutcome, ProviderChain, ProviderError, ReportProvider};
pub use report::{OutputFormat, Report, ReportFormatter, ReportRegistry, ReportStatus, ReportType};
pub use service::{ReportService, StandardRequest, TemplateRequest};
pub use templates::{ProjectData, PromptAssembler, PromptPair, TemplateResolver, TemplateSet};
