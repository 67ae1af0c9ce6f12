//! @ai:module:intent HTTP handlers for report generation, download and discovery
//! @ai:module:layer interface
//! @ai:module:public_api root, health, generate_report, generate_template_report, download_report
//! @ai:module:stateless true

use crate::error::{ReportError, Result};
use crate::http::AppState;
use crate::projects::Project;
use crate::report::{ReportPayload, StoredReport};
use crate::service::{ReportTypes, StandardRequest, TemplateRequest};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// @ai:intent Response body of the template endpoint
#[derive(Debug, Serialize)]
pub struct TemplateReportResponse {
    pub report_id: String,
    pub generated_at: String,
    pub language: String,
    pub report: String,
    pub status: String,
    pub provider: String,
    pub output_format: String,
}

impl TemplateReportResponse {
    fn from_stored(stored: &StoredReport) -> Self {
        let report = &stored.report;
        let text = match &report.payload {
            ReportPayload::Narrative { text } => text.clone(),
            ReportPayload::Structured(_) => stored.rendered.body.clone(),
        };
        Self {
            report_id: report.id.clone(),
            generated_at: report.generated_at.to_rfc3339(),
            language: report.language.clone().unwrap_or_default(),
            report: text,
            status: report.status.as_str().to_string(),
            provider: report.provider.clone().unwrap_or_default(),
            output_format: report.output_format.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub report_id: String,
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "projects": "GET /projects",
            "project": "GET /projects/{project_id}",
            "generate": "POST /reports/generate",
            "generate_template": "POST /reports/generate-template",
            "types": "GET /reports/types",
            "languages": "GET /reports/languages",
            "download": "GET /reports/download?report_id=...",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "providers": state.provider_names(),
    }))
}

pub async fn list_projects(State(state): State<AppState>) -> Json<Vec<Project>> {
    Json(state.projects().all().to_vec())
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Project>> {
    state
        .projects()
        .get(&project_id)
        .cloned()
        .map(Json)
        .ok_or(ReportError::ProjectNotFound(project_id))
}

/// @ai:intent Generate a standard report; the body carries the computed content
/// @ai:effects state:write
pub async fn generate_report(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StandardRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(request) = payload?;
    let stored = state.generate_standard_report(request).await?;
    let report = &stored.report;

    let content = match &report.payload {
        ReportPayload::Structured(content) => Value::Object(content.clone()),
        ReportPayload::Narrative { text } => Value::String(text.clone()),
    };

    Ok(Json(json!({
        "report_id": report.id,
        "generated_at": report.generated_at.to_rfc3339(),
        "report_type": report.kind,
        "status": report.status,
        "provider": report.provider,
        "output_format": report.output_format,
        "report": content,
    })))
}

/// @ai:intent Generate a narrative report through the provider chain
/// @ai:effects network, state:write
pub async fn generate_template_report(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TemplateRequest>, JsonRejection>,
) -> Result<Json<TemplateReportResponse>> {
    let Json(request) = payload?;
    let stored = state.generate_template_report(request).await?;
    Ok(Json(TemplateReportResponse::from_stored(&stored)))
}

pub async fn report_types(State(state): State<AppState>) -> Json<ReportTypes> {
    Json(state.types())
}

pub async fn languages(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "supported_languages": state.languages() }))
}

/// @ai:intent Serve a stored report as an attachment in its output format
/// @ai:effects state:read
pub async fn download_report(
    State(state): State<AppState>,
    query: std::result::Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) = query?;
    let stored = state.download(&query.report_id).await?;
    let rendered = &stored.rendered;

    let headers = [
        (header::CONTENT_TYPE, rendered.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", rendered.file_name(&stored.report.id)),
        ),
    ];
    Ok((headers, rendered.body.clone()).into_response())
}
