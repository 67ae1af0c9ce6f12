//! @ai:module:intent In-process store of generated reports keyed by identifier
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportRegistry, StoredReport
//! @ai:module:stateless false

use crate::error::{ReportError, Result};
use crate::report::formatter::RenderedReport;
use crate::report::types::{OutputFormat, Report, ReportType};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// @ai:intent A report together with its rendered body
#[derive(Debug, Clone)]
pub struct StoredReport {
    pub report: Report,
    pub rendered: RenderedReport,
}

/// @ai:intent Memory-only registry; entries live until the process exits
///
/// Entries are immutable once inserted and are never evicted.
#[derive(Debug, Default)]
pub struct ReportRegistry {
    entries: RwLock<HashMap<String, Arc<StoredReport>>>,
}

impl ReportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Insert a report under its identifier
    /// @ai:post a concurrent get sees either nothing or the whole entry
    /// @ai:effects state:write
    pub async fn put(&self, report: Report, rendered: RenderedReport) -> Arc<StoredReport> {
        let stored = Arc::new(StoredReport { report, rendered });
        let mut entries = self.entries.write().await;
        if entries.contains_key(&stored.report.id) {
            tracing::warn!(report_id = %stored.report.id, "Replacing existing report entry");
        }
        entries.insert(stored.report.id.clone(), Arc::clone(&stored));
        stored
    }

    /// @ai:intent Look up a report by identifier
    /// @ai:effects state:read
    pub async fn get(&self, report_id: &str) -> Result<Arc<StoredReport>> {
        self.entries
            .read()
            .await
            .get(report_id)
            .cloned()
            .ok_or_else(|| ReportError::RegistryMiss(report_id.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// @ai:intent Standard report types and output formats this service produces
    /// @ai:effects pure
    pub fn list_types(&self) -> (&'static [ReportType], &'static [OutputFormat]) {
        (&ReportType::ALL, &OutputFormat::ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::{ReportKind, ReportPayload, ReportStatus};
    use chrono::Utc;

    fn report(id: &str) -> (Report, RenderedReport) {
        let report = Report {
            id: id.to_string(),
            generated_at: Utc::now(),
            kind: ReportKind::Template,
            language: Some("en".into()),
            format: Some("business_plan".into()),
            output_format: OutputFormat::Json,
            status: ReportStatus::Success,
            provider: Some("mock".into()),
            payload: ReportPayload::Narrative { text: "body".into() },
        };
        let rendered = RenderedReport {
            output_format: OutputFormat::Json,
            body: "{}".into(),
        };
        (report, rendered)
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let registry = ReportRegistry::new();
        let (r, body) = report("template_report_20261016120000_en");
        registry.put(r, body).await;

        let stored = registry.get("template_report_20261016120000_en").await.unwrap();
        assert_eq!(stored.report.provider.as_deref(), Some("mock"));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_registry_miss() {
        let registry = ReportRegistry::new();
        let err = registry.get("nope").await.unwrap_err();
        assert!(matches!(err, ReportError::RegistryMiss(ref id) if id == "nope"));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_puts_are_all_visible() {
        let registry = Arc::new(ReportRegistry::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let (r, body) = report(&format!("template_report_{i:014}_en"));
                registry.put(r, body).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len().await, 32);
        for i in 0..32 {
            assert!(registry.get(&format!("template_report_{i:014}_en")).await.is_ok());
        }
    }

    #[test]
    fn test_list_types() {
        let (types, formats) = ReportRegistry::new().list_types();
        assert_eq!(types.len(), 5);
        assert_eq!(formats, &[OutputFormat::Json, OutputFormat::Csv]);
    }
}
