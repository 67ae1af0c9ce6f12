//! @ai:module:intent Orchestrate the report pipeline from request to stored report
//! @ai:module:layer application
//! @ai:module:public_api ReportService, TemplateRequest, StandardRequest
//! @ai:module:depends_on templates, providers, report, projects
//! @ai:module:stateless false

use crate::config::{ProviderAvailability, ServiceConfig};
use crate::error::{ReportError, Result};
use crate::projects::{Project, ProjectStore};
use crate::providers::{GenerationOutcome, ProviderChain};
use crate::report::{
    narrative_fields, standard, OutputFormat, Report, ReportFormatter, ReportIdGenerator, ReportKind,
    ReportPayload, ReportRegistry, ReportStatus, ReportType, StandardOptions, StoredReport,
};
use crate::templates::{ProjectData, PromptAssembler, TemplateResolver};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// @ai:intent Body of a template report request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateRequest {
    #[serde(default)]
    pub project_data: ProjectData,
    /// Wins over `project_data.language`
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub output_format: Option<String>,
}

/// @ai:intent Body of a standard report request
#[derive(Debug, Clone, Deserialize)]
pub struct StandardRequest {
    #[serde(default)]
    pub project_ids: Vec<String>,
    /// Inline project records, reported alongside the catalog selection
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default = "default_report_type", alias = "format")]
    pub report_type: String,
    #[serde(default)]
    pub output_format: Option<String>,
    #[serde(default = "default_true")]
    pub include_financial: bool,
    #[serde(default)]
    pub include_narrative: bool,
}

fn default_report_type() -> String {
    ReportType::Summary.as_str().to_string()
}

fn default_true() -> bool {
    true
}

impl Default for StandardRequest {
    fn default() -> Self {
        Self {
            project_ids: Vec::new(),
            projects: Vec::new(),
            report_type: default_report_type(),
            output_format: None,
            include_financial: true,
            include_narrative: false,
        }
    }
}

/// @ai:intent A value/display-name pair for discovery listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub name: String,
}

/// @ai:intent Report types and output formats offered by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTypes {
    pub report_types: Vec<Choice>,
    pub formats: Vec<Choice>,
}

/// @ai:intent A template language with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedLanguage {
    pub code: String,
    pub name: String,
}

/// @ai:intent Display name for a language code, the code itself when unknown
/// @ai:effects pure
pub fn language_name(code: &str) -> String {
    match code {
        "en" => "English".to_string(),
        "kn" => "ಕನ್ನಡ (Kannada)".to_string(),
        other => other.to_string(),
    }
}

fn parse_output_format(requested: Option<&str>) -> Result<OutputFormat> {
    match requested {
        Some(value) if !value.trim().is_empty() => value.parse(),
        _ => Ok(OutputFormat::default()),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// @ai:intent Wires resolver, assembler, provider chain, formatter and registry
pub struct ReportService {
    resolver: TemplateResolver,
    assembler: PromptAssembler,
    chain: ProviderChain,
    formatter: ReportFormatter,
    ids: ReportIdGenerator,
    registry: ReportRegistry,
    projects: ProjectStore,
    default_format: String,
}

impl ReportService {
    /// @ai:intent Create a service from already constructed collaborators
    /// @ai:effects pure
    pub fn new(
        resolver: TemplateResolver,
        chain: ProviderChain,
        projects: ProjectStore,
        default_format: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            assembler: PromptAssembler::new(),
            chain,
            formatter: ReportFormatter::new(),
            ids: ReportIdGenerator::new(),
            registry: ReportRegistry::new(),
            projects,
            default_format: default_format.into(),
        }
    }

    /// @ai:intent Build the service from startup configuration
    /// @ai:pre availability was probed once for this process
    /// @ai:effects fs:read
    pub fn from_config(config: &ServiceConfig, availability: &ProviderAvailability) -> Result<Self> {
        let chain = ProviderChain::from_config(config, availability)?;
        let resolver = TemplateResolver::new(
            config.paths.template_root.clone(),
            config.generation.default_language.clone(),
        );

        let languages = resolver.list_supported_languages();
        if languages.is_empty() {
            tracing::warn!(
                "No template sets found under {}",
                resolver.root().display()
            );
        } else {
            tracing::info!(
                "Template languages: {}",
                languages.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }

        Ok(Self::new(
            resolver,
            chain,
            ProjectStore::with_samples(),
            config.generation.default_format.clone(),
        ))
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.chain.provider_names()
    }

    /// @ai:intent Generate, render and store a narrative report from templates
    /// @ai:post stored report language is the one actually used after fallback
    /// @ai:effects network, fs:read, state:write
    pub async fn generate_template_report(&self, request: TemplateRequest) -> Result<Arc<StoredReport>> {
        let output_format = parse_output_format(request.output_format.as_deref())?;
        let data = request.project_data;

        let language = non_empty(request.language.as_deref())
            .or_else(|| non_empty(data.language.as_deref()))
            .unwrap_or(self.resolver.default_language())
            .to_string();
        let format = non_empty(data.format.as_deref())
            .unwrap_or(&self.default_format)
            .to_string();

        let templates = self.resolver.resolve(&language, &format)?;
        if templates.is_language_fallback() {
            tracing::info!(
                "Report requested in '{}' is generated in '{}'",
                templates.requested_language,
                templates.language
            );
        }
        let prompts = self.assembler.assemble(&templates, &data);
        tracing::debug!(
            "Assembled prompts for {}/{}: system {} bytes, user {} bytes",
            templates.language,
            templates.format,
            prompts.system.len(),
            prompts.user.len()
        );

        let outcome = self.chain.generate(&prompts).await;

        let issued = self.ids.issue(ReportKind::Template, Some(&templates.language));
        let report = Report {
            id: issued.id,
            generated_at: issued.issued_at,
            kind: ReportKind::Template,
            language: Some(templates.language),
            format: Some(templates.format),
            output_format,
            status: outcome.status,
            provider: Some(outcome.provider),
            payload: ReportPayload::Narrative { text: outcome.text },
        };

        self.store(report).await
    }

    /// @ai:intent Compute, render and store a standard report over selected projects
    /// @ai:effects state:write, network when a narrative is requested
    pub async fn generate_standard_report(&self, request: StandardRequest) -> Result<Arc<StoredReport>> {
        let report_type: ReportType = request.report_type.parse()?;
        let output_format = parse_output_format(request.output_format.as_deref())?;
        let selected = self.select_projects(&request)?;

        let options = StandardOptions {
            include_financial: request.include_financial,
        };
        let mut content = standard::compute(report_type, &selected, options);
        let mut status = ReportStatus::Success;
        let mut provider = None;
        let mut language = None;

        if request.include_narrative {
            let (used_language, outcome) = self.narrate(report_type, &selected).await?;
            content.insert("ai_generated_content".into(), json!(outcome.text));
            status = outcome.status;
            provider = Some(outcome.provider);
            language = Some(used_language);
        }

        let kind = ReportKind::Standard(report_type);
        let issued = self.ids.issue(kind, None);
        let report = Report {
            id: issued.id,
            generated_at: issued.issued_at,
            kind,
            language,
            format: None,
            output_format,
            status,
            provider,
            payload: ReportPayload::Structured(content),
        };

        self.store(report).await
    }

    /// @ai:intent Fetch a stored report for download
    /// @ai:effects state:read
    pub async fn download(&self, report_id: &str) -> Result<Arc<StoredReport>> {
        self.registry.get(report_id).await
    }

    /// @ai:intent Template languages available on disk, with display names
    /// @ai:effects fs:read
    pub fn languages(&self) -> Vec<SupportedLanguage> {
        self.resolver
            .list_supported_languages()
            .into_iter()
            .map(|code| SupportedLanguage {
                name: language_name(&code),
                code,
            })
            .collect()
    }

    pub fn types(&self) -> ReportTypes {
        let (types, formats) = self.registry.list_types();
        ReportTypes {
            report_types: types
                .iter()
                .map(|t| Choice {
                    value: t.as_str().to_string(),
                    name: t.display_name().to_string(),
                })
                .collect(),
            formats: formats
                .iter()
                .map(|f| Choice {
                    value: f.as_str().to_string(),
                    name: f.as_str().to_uppercase(),
                })
                .collect(),
        }
    }

    fn select_projects(&self, request: &StandardRequest) -> Result<Vec<Project>> {
        let mut selected = Vec::with_capacity(request.project_ids.len() + request.projects.len());
        for id in &request.project_ids {
            let project = self
                .projects
                .get(id)
                .ok_or_else(|| ReportError::ProjectNotFound(id.clone()))?;
            selected.push(project.clone());
        }
        selected.extend(request.projects.iter().cloned());

        if selected.is_empty() {
            return Err(ReportError::InvalidRequest(
                "select at least one project via project_ids or projects".to_string(),
            ));
        }
        Ok(selected)
    }

    async fn narrate(
        &self,
        report_type: ReportType,
        projects: &[Project],
    ) -> Result<(String, GenerationOutcome)> {
        let data = narrative_fields(report_type, projects);
        let format = data.format.as_deref().unwrap_or(&self.default_format);
        let templates = self.resolver.resolve(self.resolver.default_language(), format)?;
        let prompts = self.assembler.assemble(&templates, &data);
        let outcome = self.chain.generate(&prompts).await;
        Ok((templates.language, outcome))
    }

    async fn store(&self, report: Report) -> Result<Arc<StoredReport>> {
        let rendered = self.formatter.format(&report, report.output_format)?;
        tracing::info!(
            "Generated report {} ({}, {}, {})",
            report.id,
            report.kind.as_str(),
            report.output_format,
            report.status.as_str()
        );
        Ok(self.registry.put(report, rendered).await)
    }
}
