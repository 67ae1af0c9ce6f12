//! @ai:module:intent Locate template sets by language and report format
//! @ai:module:layer infrastructure
//! @ai:module:public_api TemplateResolver, TemplateSet
//! @ai:module:stateless true

use crate::error::{ReportError, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const LANGUAGE_DIR_PREFIX: &str = "templates_";
const SYSTEM_FILE: &str = "system_prompt.md";
const STRUCTURE_FILE: &str = "structure.md";
const DATA_INPUT_FILE: &str = "data_input.md";

/// @ai:intent The three text artifacts making up one (language, format) template set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    /// Language actually served, after any fallback
    pub language: String,
    /// Language the caller asked for, normalized
    pub requested_language: String,
    pub format: String,
    pub system: String,
    pub structure: String,
    pub data_input: String,
}

impl TemplateSet {
    /// @ai:intent Whether the default language was substituted for the requested one
    /// @ai:effects pure
    pub fn is_language_fallback(&self) -> bool {
        self.language != self.requested_language
    }
}

/// @ai:intent Resolves template sets from a read-only template root
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    root: PathBuf,
    default_language: String,
}

impl TemplateResolver {
    /// @ai:intent Create a resolver over a template root directory
    /// @ai:effects pure
    pub fn new(root: impl Into<PathBuf>, default_language: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_language: normalize_language(&default_language.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// @ai:intent Resolve a template set, falling back to the default language when absent
    /// @ai:pre format is a lowercase key such as "business_plan"
    /// @ai:post returned set has three non-empty artifacts
    /// @ai:effects fs:read
    pub fn resolve(&self, language: &str, format: &str) -> Result<TemplateSet> {
        let requested = normalize_language(language);
        let format = format.trim().to_ascii_lowercase();

        if !is_valid_key(&format) {
            return Err(ReportError::TemplateNotFound {
                language: requested,
                format,
            });
        }

        let language = if is_valid_key(&requested) && self.language_dir(&requested).is_dir() {
            requested.clone()
        } else {
            tracing::warn!(
                "No templates for language '{}', falling back to '{}'",
                requested,
                self.default_language
            );
            self.default_language.clone()
        };

        let format_dir = self.language_dir(&language).join(&format);
        let not_found = || ReportError::TemplateNotFound {
            language: language.clone(),
            format: format.clone(),
        };

        if !format_dir.is_dir() {
            return Err(not_found());
        }

        let system = read_artifact(&format_dir.join(SYSTEM_FILE)).ok_or_else(not_found)?;
        let structure = read_artifact(&format_dir.join(STRUCTURE_FILE)).ok_or_else(not_found)?;
        let data_input = read_artifact(&format_dir.join(DATA_INPUT_FILE)).ok_or_else(not_found)?;

        tracing::debug!("Resolved templates {}/{} from {}", language, format, format_dir.display());

        Ok(TemplateSet {
            language,
            requested_language: requested,
            format,
            system,
            structure,
            data_input,
        })
    }

    /// @ai:intent List language codes that have a template directory
    /// @ai:effects fs:read
    pub fn list_supported_languages(&self) -> BTreeSet<String> {
        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| {
                e.file_name()
                    .to_str()
                    .and_then(|name| name.strip_prefix(LANGUAGE_DIR_PREFIX))
                    .map(normalize_language)
            })
            .filter(|code| is_valid_key(code))
            .collect()
    }

    /// @ai:intent List the report formats available for a language
    /// @ai:effects fs:read
    pub fn list_formats(&self, language: &str) -> BTreeSet<String> {
        WalkDir::new(self.language_dir(&normalize_language(language)))
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect()
    }

    fn language_dir(&self, language: &str) -> PathBuf {
        self.root.join(format!("{LANGUAGE_DIR_PREFIX}{language}"))
    }
}

/// @ai:intent Normalize a language code for lookup
/// @ai:effects pure
pub fn normalize_language(language: &str) -> String {
    language.trim().to_ascii_lowercase()
}

/// Keys become path components, so anything but `[a-z0-9_-]` is rejected.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

fn read_artifact(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) if !content.trim().is_empty() => Some(content),
        Ok(_) => {
            tracing::warn!("Template artifact {} is empty", path.display());
            None
        }
        Err(e) => {
            tracing::warn!("Template artifact {} unreadable: {}", path.display(), e);
            None
        }
    }
}
