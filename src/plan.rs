//! Declarative extraction plans.
//!
//! Plans are the data-only surface of an [`ExtractionConfig`]: output keys
//! mapped to a selector and a chain of transformation descriptors in their
//! compact string form. Conditions and inline transformations are code and
//! cannot appear in a plan; add those through the builder API after
//! conversion.
//!
//! ```yaml
//! fields:
//!   title:
//!     selector: ".title"
//!     transformations: ["inner-text", "trim"]
//!   tag_count:
//!     selector: ".tags"
//!     transformations: ["inner-text", "split:,", "get-index:0"]
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::PlanError;
use crate::extractor::{ExtractionConfig, FieldSpec};

/// Declarative form of one field spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Query resolved against the root node; absent means the field
    /// operates on the root node itself.
    #[serde(default)]
    pub selector: Option<String>,

    /// Transformation descriptors in compact string form.
    #[serde(default)]
    pub transformations: Vec<String>,
}

/// A declarative extraction plan: output key -> field definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionPlan {
    /// Field definitions in declaration order.
    pub fields: IndexMap<String, FieldDef>,
}

impl ExtractionPlan {
    /// Parse a plan from a YAML string.
    ///
    /// # Errors
    /// Returns [`PlanError`] if the document is not valid YAML or is
    /// missing the top-level `fields` mapping.
    pub fn from_yaml_str(contents: &str) -> Result<Self, PlanError> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(contents)
            .map_err(|e| PlanError::Parse(format!("invalid YAML: {}", e)))?;

        let fields_yaml = yaml
            .get("fields")
            .ok_or_else(|| PlanError::Invalid("plan missing 'fields' mapping".to_string()))?;

        let fields: IndexMap<String, FieldDef> = serde_yaml::from_value(fields_yaml.clone())
            .map_err(|e| PlanError::Parse(format!("invalid field definitions: {}", e)))?;

        Ok(Self { fields })
    }

    /// Load a plan from a YAML file.
    ///
    /// # Arguments
    /// * `path` - Path to the plan file
    ///
    /// # Errors
    /// Returns [`PlanError::Io`] if the file cannot be read, otherwise as
    /// [`ExtractionPlan::from_yaml_str`].
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| PlanError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse a plan from a JSON string. The shape matches the YAML form.
    pub fn from_json_str(contents: &str) -> Result<Self, PlanError> {
        serde_json::from_str(contents)
            .map_err(|e| PlanError::Parse(format!("invalid JSON: {}", e)))
    }

    /// Convert the plan into a runtime configuration for a backend.
    pub fn to_config<D: Document>(&self) -> ExtractionConfig<D> {
        self.fields
            .iter()
            .map(|(key, def)| {
                let mut spec = FieldSpec::new();
                if let Some(selector) = &def.selector {
                    spec = spec.selector(selector.clone());
                }
                for descriptor in &def.transformations {
                    spec = spec.transform(descriptor);
                }
                (key.clone(), spec)
            })
            .collect()
    }

    /// Check if a field is defined.
    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Get all field keys, in declaration order.
    pub fn field_names(&self) -> Vec<&String> {
        self.fields.keys().collect()
    }

    /// Get the number of defined fields.
    pub fn count(&self) -> usize {
        self.fields.len()
    }
}
