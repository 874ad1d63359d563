//! Game registry: the loaded templates and biome settings a host hands to
//! plugins.
//!
//! Built via `GameRegistry::builder()`; directories are read for `.ron`
//! files, explicitly provided data is layered on top.

use log::{debug, trace, warn};
use rustc_hash::FxHashMap;
use std::path::Path;
use thiserror::Error;

use crate::text::element::Text;
use crate::text::receiver::MessageReceiver;
use crate::text::template::{TemplateError, TemplateParams, TextTemplate};
use crate::text::template_set::TemplateSet;
use crate::world::biome::{BiomeConfig, BiomeError, BiomeGenerationSettings};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("biome error: {0}")]
    Biome(#[from] BiomeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
    #[error("unknown biome: {0}")]
    UnknownBiome(String),
}

pub struct GameRegistry {
    templates: TemplateSet,
    biomes: FxHashMap<String, BiomeGenerationSettings>,
}

pub struct GameRegistryBuilder {
    templates_dir: Option<String>,
    biomes_dir: Option<String>,
    /// Directly provided templates (for testing without files).
    templates: Option<TemplateSet>,
    /// Directly provided biomes (for testing without files).
    biomes: Vec<(String, BiomeGenerationSettings)>,
}

impl GameRegistry {
    pub fn builder() -> GameRegistryBuilder {
        GameRegistryBuilder {
            templates_dir: None,
            biomes_dir: None,
            templates: None,
            biomes: Vec::new(),
        }
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn template(&self, name: &str) -> Result<&TextTemplate, RegistryError> {
        self.templates
            .get(name)
            .ok_or_else(|| RegistryError::UnknownTemplate(name.to_string()))
    }

    pub fn register_template(&mut self, name: impl Into<String>, template: TextTemplate) {
        let name = name.into();
        if self.templates.insert(name.clone(), template).is_some() {
            debug!("replaced template '{}'", name);
        }
    }

    /// Render the named template.
    pub fn render(&self, name: &str, params: &TemplateParams) -> Result<Text, RegistryError> {
        Ok(self.template(name)?.apply(params)?)
    }

    /// Render the named template and deliver it to `receiver`. Nothing is
    /// delivered when the arguments do not fit the template.
    pub fn send(
        &self,
        name: &str,
        receiver: &mut dyn MessageReceiver,
        params: &TemplateParams,
    ) -> Result<(), RegistryError> {
        let template = self.template(name)?;
        template.validate(params)?;
        trace!("sending template '{}' with {} params", name, params.len());
        template.send(receiver, params)?;
        Ok(())
    }

    pub fn biome_ids(&self) -> impl Iterator<Item = &str> {
        self.biomes.keys().map(String::as_str)
    }

    pub fn biome_settings(&self, id: &str) -> Result<&BiomeGenerationSettings, RegistryError> {
        self.biomes
            .get(id)
            .ok_or_else(|| RegistryError::UnknownBiome(id.to_string()))
    }

    /// Mutable settings, for plugins registering populators.
    pub fn biome_settings_mut(
        &mut self,
        id: &str,
    ) -> Result<&mut BiomeGenerationSettings, RegistryError> {
        self.biomes
            .get_mut(id)
            .ok_or_else(|| RegistryError::UnknownBiome(id.to_string()))
    }

    pub fn register_biome(&mut self, id: impl Into<String>, settings: BiomeGenerationSettings) {
        let id = id.into();
        if self.biomes.insert(id.clone(), settings).is_some() {
            debug!("replaced biome '{}'", id);
        }
    }
}

impl GameRegistryBuilder {
    pub fn templates_dir(mut self, path: &str) -> Self {
        self.templates_dir = Some(path.to_string());
        self
    }

    pub fn biomes_dir(mut self, path: &str) -> Self {
        self.biomes_dir = Some(path.to_string());
        self
    }

    /// Provide templates directly (for testing without files).
    pub fn with_templates(mut self, templates: TemplateSet) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Provide a biome directly (for testing without files).
    pub fn with_biome(mut self, id: &str, settings: BiomeGenerationSettings) -> Self {
        self.biomes.push((id.to_string(), settings));
        self
    }

    pub fn build(self) -> Result<GameRegistry, RegistryError> {
        let mut templates = TemplateSet::default();
        let mut biomes = FxHashMap::default();

        if let Some(ref dir) = self.templates_dir {
            if Path::new(dir).exists() {
                load_ron_files_from_dir(dir, |path| {
                    let set = TemplateSet::load_from_ron(path)?;
                    debug!("loaded {} templates from {}", set.len(), path.display());
                    templates.merge(set);
                    Ok(())
                })?;
            } else {
                warn!("templates directory '{}' does not exist", dir);
            }
        }

        if let Some(ref dir) = self.biomes_dir {
            if Path::new(dir).exists() {
                load_ron_files_from_dir(dir, |path| {
                    let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                        warn!("skipping biome file with unusable name: {}", path.display());
                        return Ok(());
                    };
                    let config = BiomeConfig::load_from_ron(path)?;
                    debug!("loaded biome '{}' from {}", id, path.display());
                    biomes.insert(id.to_string(), BiomeGenerationSettings::from_config(config)?);
                    Ok(())
                })?;
            } else {
                warn!("biomes directory '{}' does not exist", dir);
            }
        }

        // Directly provided data overrides what was loaded from disk
        if let Some(provided) = self.templates {
            templates.merge(provided);
        }
        for (id, settings) in self.biomes {
            biomes.insert(id, settings);
        }

        Ok(GameRegistry { templates, biomes })
    }
}

fn load_ron_files_from_dir<F>(dir: &str, mut loader: F) -> Result<(), RegistryError>
where
    F: FnMut(&Path) -> Result<(), RegistryError>,
{
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    // Later files override earlier ones, so keep the order stable
    paths.sort();
    for path in paths {
        if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            loader(&path)?;
        }
    }
    Ok(())
}
