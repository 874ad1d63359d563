//! Named collections of templates loaded from RON.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::template::{TemplateError, TextTemplate};

/// A set of named templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    pub templates: FxHashMap<String, TextTemplate>,
}

// On disk a template is stored as its source string, so the RON shape
// differs from the in-memory one.
#[derive(Debug, Deserialize)]
#[serde(rename = "Template")]
struct RonTemplate {
    text: String,
}

impl TemplateSet {
    /// Load a template set from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<TemplateSet, TemplateError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a template set from a RON string of the form
    /// `{ "name": Template(text: "..."), }`.
    pub fn parse_ron(input: &str) -> Result<TemplateSet, TemplateError> {
        let raw: HashMap<String, RonTemplate> = ron::from_str(input)?;
        let mut templates = FxHashMap::default();

        for (name, ron_template) in raw {
            let template = TextTemplate::parse(&ron_template.text).map_err(|e| match e {
                TemplateError::Parse(msg) => TemplateError::Parse(format!("{}: {}", name, msg)),
                other => other,
            })?;
            templates.insert(name, template);
        }

        Ok(TemplateSet { templates })
    }

    /// Merge another set into this one. Templates from `other` replace
    /// templates in `self` with the same name.
    pub fn merge(&mut self, other: TemplateSet) {
        for (name, template) in other.templates {
            self.templates.insert(name, template);
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, template: TextTemplate) -> Option<TextTemplate> {
        self.templates.insert(name.into(), template)
    }

    pub fn get(&self, name: &str) -> Option<&TextTemplate> {
        self.templates.get(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
