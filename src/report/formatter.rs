//! @ai:module:intent Render generated reports as JSON documents or CSV rows
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportFormatter, RenderedReport
//! @ai:module:stateless true

use crate::error::{ReportError, Result};
use crate::report::types::{OutputFormat, Report, ReportPayload};
use serde_json::{json, Map, Value};

/// @ai:intent A report serialized into its output representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub output_format: OutputFormat,
    pub body: String,
}

impl RenderedReport {
    pub fn content_type(&self) -> &'static str {
        self.output_format.content_type()
    }

    /// @ai:intent Attachment file name used by downloads
    /// @ai:effects pure
    pub fn file_name(&self, report_id: &str) -> String {
        format!("{}.{}", report_id, self.output_format.extension())
    }
}

/// @ai:intent Turns a report into its JSON or CSV body
///
/// JSON is one flat object holding the report metadata and the content fields,
/// with keys in lexical order. CSV of
/// structured content is a "Report Summary" key/value block with nested maps
/// flattened to dotted keys, followed by one table per list of records. CSV of
/// narrative content is a single `report` column holding the whole text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Render a report in the requested representation
    /// @ai:effects pure
    pub fn format(&self, report: &Report, output_format: OutputFormat) -> Result<RenderedReport> {
        let body = match output_format {
            OutputFormat::Json => serde_json::to_string_pretty(&Value::Object(document(report)))?,
            OutputFormat::Csv => match &report.payload {
                ReportPayload::Structured(_) => structured_csv(&document(report))?,
                ReportPayload::Narrative { text } => narrative_csv(text)?,
            },
        };

        Ok(RenderedReport { output_format, body })
    }
}

/// @ai:intent Flat JSON document; a content field wins over metadata of the same name
fn document(report: &Report) -> Map<String, Value> {
    let mut doc = Map::new();
    doc.insert("report_id".into(), json!(report.id));
    doc.insert("generated_at".into(), json!(report.generated_at.to_rfc3339()));
    doc.insert("kind".into(), json!(report.kind));
    doc.insert("status".into(), json!(report.status));
    if let Some(language) = &report.language {
        doc.insert("language".into(), json!(language));
    }
    if let Some(format) = &report.format {
        doc.insert("format".into(), json!(format));
    }
    if let Some(provider) = &report.provider {
        doc.insert("provider".into(), json!(provider));
    }

    match &report.payload {
        ReportPayload::Structured(content) => {
            doc.extend(content.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        ReportPayload::Narrative { text } => {
            doc.insert("report".into(), json!(text));
        }
    }
    doc
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new().flexible(true).from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Csv(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn narrative_csv(text: &str) -> Result<String> {
    let mut writer = csv_writer();
    writer.write_record(["report"])?;
    writer.write_record([text])?;
    finish(writer)
}

fn structured_csv(doc: &Map<String, Value>) -> Result<String> {
    let mut scalars: Vec<(String, String)> = Vec::new();
    let mut tables: Vec<(&str, &Vec<Value>)> = Vec::new();

    for (key, value) in doc {
        match value {
            Value::Array(items) if items.iter().any(Value::is_object) => tables.push((key.as_str(), items)),
            _ => flatten(key, value, &mut scalars),
        }
    }

    let mut writer = csv_writer();
    writer.write_record(["Report Summary"])?;
    writer.write_record([""])?;
    for (key, value) in &scalars {
        writer.write_record([key.as_str(), value.as_str()])?;
    }

    for (name, rows) in tables {
        writer.write_record([""])?;
        writer.write_record([name.to_uppercase()])?;

        let mut columns: Vec<&str> = Vec::new();
        for row in rows.iter().filter_map(Value::as_object) {
            for key in row.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key.as_str());
                }
            }
        }
        writer.write_record(&columns)?;

        for row in rows.iter().filter_map(Value::as_object) {
            writer.write_record(
                columns
                    .iter()
                    .map(|c| row.get(*c).map(cell).unwrap_or_default()),
            )?;
        }
    }

    finish(writer)
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(fields) if !fields.is_empty() => {
            for (key, nested) in fields {
                flatten(&format!("{prefix}.{key}"), nested, out);
            }
        }
        _ => out.push((prefix.to_string(), cell(value))),
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join("; "),
        other => other.to_string(),
    }
}
