//! @ai:module:intent Merge template sets with project data into a prompt pair
//! @ai:module:layer domain
//! @ai:module:public_api PromptAssembler, ProjectData, PromptPair
//! @ai:module:stateless true

use crate::templates::resolver::TemplateSet;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// @ai:intent Free-form project fields plus the two fields that drive template selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl ProjectData {
    /// @ai:intent Build project data from string fields
    /// @ai:effects pure
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            format: None,
            language: None,
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// @ai:intent Text value of a named field, empty when absent
    /// @ai:effects pure
    pub fn field_text(&self, name: &str) -> String {
        match name {
            "format" => self.format.clone().unwrap_or_default(),
            "language" => self.language.clone().unwrap_or_default(),
            _ => self.fields.get(name).map(value_text).unwrap_or_default(),
        }
    }
}

/// @ai:intent Final system and user prompts sent to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// @ai:intent Renders `{{field}}` placeholders with project data
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptAssembler;

impl PromptAssembler {
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Build the prompt pair for a template set and project data
    /// @ai:post unknown placeholders render as "", unreferenced fields are ignored
    /// @ai:effects pure
    pub fn assemble(&self, templates: &TemplateSet, data: &ProjectData) -> PromptPair {
        let system = self.render(&templates.system, data);
        let structure = self.render(&templates.structure, data);
        let data_input = self.render(&templates.data_input, data);

        let user = format!("{}\n\n{}", structure.trim_end(), data_input.trim_end());

        tracing::debug!(
            "Assembled prompts for {}/{} (system={} bytes, user={} bytes)",
            templates.language,
            templates.format,
            system.len(),
            user.len()
        );

        PromptPair { system, user }
    }

    /// @ai:intent Substitute every placeholder in a single template
    /// @ai:effects pure
    pub fn render(&self, template: &str, data: &ProjectData) -> String {
        placeholder_pattern()
            .replace_all(template, |caps: &Captures| data.field_text(&caps[1]))
            .into_owned()
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.iter().all(|v| !v.is_array() && !v.is_object()) => items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
