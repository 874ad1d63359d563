//! Per-biome generation settings.
//!
//! During the generation phase a host applies, per chunk: ground cover
//! layers, then generation populators, then structures. During the
//! population phase it runs structures, then populators. The lists here only
//! record what is registered and in which order.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::gen::{
    AsAny, GenerationPopulator, GroundCoverLayer, InvalidAmount, Populator, Structure,
};

#[derive(Debug, Error)]
pub enum BiomeError {
    #[error("invalid terrain heights: min {min} is above max {max}")]
    InvalidHeights { min: f32, max: f32 },
    #[error("terrain height must be finite, got {0}")]
    NonFiniteHeight(f32),
    #[error("ground cover layer {layer} has an unusable depth: {source}")]
    InvalidAmount { layer: usize, source: InvalidAmount },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// The data-only part of a biome's settings, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeConfig {
    pub min_height: f32,
    pub max_height: f32,
    #[serde(default)]
    pub ground_cover: Vec<GroundCoverLayer>,
}

impl BiomeConfig {
    /// Load a biome config from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<BiomeConfig, BiomeError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<BiomeConfig, BiomeError> {
        let config: BiomeConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BiomeError> {
        for height in [self.min_height, self.max_height] {
            if !height.is_finite() {
                return Err(BiomeError::NonFiniteHeight(height));
            }
        }
        if self.min_height > self.max_height {
            return Err(BiomeError::InvalidHeights {
                min: self.min_height,
                max: self.max_height,
            });
        }
        for (layer, cover) in self.ground_cover.iter().enumerate() {
            cover
                .depth
                .validate()
                .map_err(|source| BiomeError::InvalidAmount { layer, source })?;
        }
        Ok(())
    }
}

/// The generation settings of one biome.
///
/// Each list is owned and ordered; it only changes through the explicit
/// methods below, and readers get slices.
#[derive(Default)]
pub struct BiomeGenerationSettings {
    min_height: f32,
    max_height: f32,
    ground_cover_layers: Vec<GroundCoverLayer>,
    generation_populators: Vec<Box<dyn GenerationPopulator>>,
    structures: Vec<Box<dyn Structure>>,
    populators: Vec<Box<dyn Populator>>,
}

impl BiomeGenerationSettings {
    pub fn new(min_height: f32, max_height: f32) -> Self {
        Self {
            min_height,
            max_height,
            ..Self::default()
        }
    }

    pub fn from_config(config: BiomeConfig) -> Result<Self, BiomeError> {
        config.validate()?;
        let mut settings = Self::new(config.min_height, config.max_height);
        settings.ground_cover_layers = config.ground_cover;
        Ok(settings)
    }

    /// The data-only part of these settings.
    pub fn to_config(&self) -> BiomeConfig {
        BiomeConfig {
            min_height: self.min_height,
            max_height: self.max_height,
            ground_cover: self.ground_cover_layers.clone(),
        }
    }

    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn set_min_height(&mut self, height: f32) {
        self.min_height = height;
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    pub fn set_max_height(&mut self, height: f32) {
        self.max_height = height;
    }

    // Ground cover layers

    /// Applied to the base terrain starting at the topmost stone block in
    /// each column, first layer on top.
    pub fn ground_cover_layers(&self) -> &[GroundCoverLayer] {
        &self.ground_cover_layers
    }

    pub fn add_ground_cover_layer(&mut self, layer: GroundCoverLayer) {
        self.ground_cover_layers.push(layer);
    }

    pub fn insert_ground_cover_layer(&mut self, index: usize, layer: GroundCoverLayer) {
        let index = index.min(self.ground_cover_layers.len());
        self.ground_cover_layers.insert(index, layer);
    }

    pub fn remove_ground_cover_layer(&mut self, index: usize) -> Option<GroundCoverLayer> {
        (index < self.ground_cover_layers.len()).then(|| self.ground_cover_layers.remove(index))
    }

    pub fn clear_ground_cover_layers(&mut self) {
        self.ground_cover_layers.clear();
    }

    // Generation populators

    /// Run on a single chunk directly after the ground cover layers.
    pub fn generation_populators(&self) -> &[Box<dyn GenerationPopulator>] {
        &self.generation_populators
    }

    /// The generation populators of concrete type `G`, in list order.
    pub fn generation_populators_of<G: GenerationPopulator + 'static>(&self) -> Vec<&G> {
        filter_by_type(&self.generation_populators)
    }

    pub fn add_generation_populator(&mut self, populator: impl GenerationPopulator + 'static) {
        self.generation_populators.push(Box::new(populator));
    }

    pub fn insert_generation_populator(
        &mut self,
        index: usize,
        populator: impl GenerationPopulator + 'static,
    ) {
        let index = index.min(self.generation_populators.len());
        self.generation_populators.insert(index, Box::new(populator));
    }

    pub fn remove_generation_populator(
        &mut self,
        index: usize,
    ) -> Option<Box<dyn GenerationPopulator>> {
        (index < self.generation_populators.len())
            .then(|| self.generation_populators.remove(index))
    }

    /// Remove every generation populator of type `G`; returns how many.
    pub fn remove_generation_populators_of<G: GenerationPopulator + 'static>(&mut self) -> usize {
        retain_not_of::<_, G>(&mut self.generation_populators)
    }

    pub fn retain_generation_populators(
        &mut self,
        keep: impl FnMut(&Box<dyn GenerationPopulator>) -> bool,
    ) {
        self.generation_populators.retain(keep);
    }

    pub fn clear_generation_populators(&mut self) {
        self.generation_populators.clear();
    }

    // Structures

    /// Called after the generation populators while generating, and before
    /// the populators while populating.
    pub fn structures(&self) -> &[Box<dyn Structure>] {
        &self.structures
    }

    pub fn structures_of<S: Structure + 'static>(&self) -> Vec<&S> {
        filter_by_type(&self.structures)
    }

    pub fn add_structure(&mut self, structure: impl Structure + 'static) {
        self.structures.push(Box::new(structure));
    }

    pub fn insert_structure(&mut self, index: usize, structure: impl Structure + 'static) {
        let index = index.min(self.structures.len());
        self.structures.insert(index, Box::new(structure));
    }

    pub fn remove_structure(&mut self, index: usize) -> Option<Box<dyn Structure>> {
        (index < self.structures.len()).then(|| self.structures.remove(index))
    }

    pub fn remove_structures_of<S: Structure + 'static>(&mut self) -> usize {
        retain_not_of::<_, S>(&mut self.structures)
    }

    pub fn retain_structures(&mut self, keep: impl FnMut(&Box<dyn Structure>) -> bool) {
        self.structures.retain(keep);
    }

    pub fn clear_structures(&mut self) {
        self.structures.clear();
    }

    // Populators

    /// Biome-specific populators. Changes affect every chunk populated
    /// afterwards.
    pub fn populators(&self) -> &[Box<dyn Populator>] {
        &self.populators
    }

    pub fn populators_of<P: Populator + 'static>(&self) -> Vec<&P> {
        filter_by_type(&self.populators)
    }

    pub fn add_populator(&mut self, populator: impl Populator + 'static) {
        self.populators.push(Box::new(populator));
    }

    pub fn insert_populator(&mut self, index: usize, populator: impl Populator + 'static) {
        let index = index.min(self.populators.len());
        self.populators.insert(index, Box::new(populator));
    }

    pub fn remove_populator(&mut self, index: usize) -> Option<Box<dyn Populator>> {
        (index < self.populators.len()).then(|| self.populators.remove(index))
    }

    pub fn remove_populators_of<P: Populator + 'static>(&mut self) -> usize {
        retain_not_of::<_, P>(&mut self.populators)
    }

    pub fn retain_populators(&mut self, keep: impl FnMut(&Box<dyn Populator>) -> bool) {
        self.populators.retain(keep);
    }

    pub fn clear_populators(&mut self) {
        self.populators.clear();
    }
}

impl std::fmt::Debug for BiomeGenerationSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiomeGenerationSettings")
            .field("min_height", &self.min_height)
            .field("max_height", &self.max_height)
            .field("ground_cover_layers", &self.ground_cover_layers)
            .field("generation_populators", &self.generation_populators.len())
            .field("structures", &self.structures.len())
            .field("populators", &self.populators.len())
            .finish()
    }
}

fn filter_by_type<T: ?Sized + AsAny, C: 'static>(items: &[Box<T>]) -> Vec<&C> {
    items
        .iter()
        .filter_map(|item| (**item).as_any().downcast_ref::<C>())
        .collect()
}

fn retain_not_of<T: ?Sized + AsAny, C: 'static>(items: &mut Vec<Box<T>>) -> usize {
    let before = items.len();
    items.retain(|item| !(**item).as_any().is::<C>());
    before - items.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::types::EntitySnapshot;
    use crate::world::extent::World;
    use crate::world::gen::{BlockState, BlockVolume, PopulatorType, VariableAmount};
    use crate::world::location::WorldId;
    use glam::IVec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Caves {
        frequency: u32,
    }

    impl GenerationPopulator for Caves {
        fn populate(&self, _world: &dyn World, _buffer: &mut dyn BlockVolume) {}
    }

    struct Ravines;

    impl GenerationPopulator for Ravines {
        fn populate(&self, _world: &dyn World, _buffer: &mut dyn BlockVolume) {}
    }

    struct Lake {
        liquid: BlockState,
    }

    impl Populator for Lake {
        fn populator_type(&self) -> PopulatorType {
            PopulatorType("minecraft:lake".to_string())
        }

        fn populate(&self, _chunk: &mut dyn BlockVolume, _rng: &mut StdRng) {}
    }

    struct Flowers;

    impl Populator for Flowers {
        fn populator_type(&self) -> PopulatorType {
            PopulatorType("minecraft:flower".to_string())
        }

        fn populate(&self, _chunk: &mut dyn BlockVolume, _rng: &mut StdRng) {}
    }

    struct Mineshaft;

    impl GenerationPopulator for Mineshaft {
        fn populate(&self, _world: &dyn World, _buffer: &mut dyn BlockVolume) {}
    }

    impl Populator for Mineshaft {
        fn populator_type(&self) -> PopulatorType {
            PopulatorType("minecraft:mineshaft".to_string())
        }

        fn populate(&self, _chunk: &mut dyn BlockVolume, _rng: &mut StdRng) {}
    }

    impl Structure for Mineshaft {}

    struct Village;

    impl GenerationPopulator for Village {
        fn populate(&self, _world: &dyn World, _buffer: &mut dyn BlockVolume) {}
    }

    impl Populator for Village {
        fn populator_type(&self) -> PopulatorType {
            PopulatorType("minecraft:village".to_string())
        }

        fn populate(&self, _chunk: &mut dyn BlockVolume, _rng: &mut StdRng) {}
    }

    impl Structure for Village {}

    fn layer(id: &str) -> GroundCoverLayer {
        GroundCoverLayer::new(BlockState::new(id), VariableAmount::Fixed(1.0))
    }

    #[test]
    fn heights() {
        let mut settings = BiomeGenerationSettings::new(0.1, 0.4);
        assert_eq!(settings.min_height(), 0.1);
        assert_eq!(settings.max_height(), 0.4);
        settings.set_min_height(-0.5);
        settings.set_max_height(1.0);
        assert_eq!(settings.min_height(), -0.5);
        assert_eq!(settings.max_height(), 1.0);
    }

    #[test]
    fn ground_cover_order() {
        let mut settings = BiomeGenerationSettings::default();
        settings.add_ground_cover_layer(layer("minecraft:grass"));
        settings.add_ground_cover_layer(layer("minecraft:stone"));
        settings.insert_ground_cover_layer(1, layer("minecraft:dirt"));
        let ids: Vec<&str> = settings
            .ground_cover_layers()
            .iter()
            .map(|l| l.block.0.as_str())
            .collect();
        assert_eq!(ids, vec!["minecraft:grass", "minecraft:dirt", "minecraft:stone"]);

        let removed = settings.remove_ground_cover_layer(2).unwrap();
        assert_eq!(removed.block, BlockState::new("minecraft:stone"));
        assert!(settings.remove_ground_cover_layer(5).is_none());
        settings.clear_ground_cover_layers();
        assert!(settings.ground_cover_layers().is_empty());
    }

    #[test]
    fn insert_past_end_appends() {
        let mut settings = BiomeGenerationSettings::default();
        settings.insert_ground_cover_layer(10, layer("minecraft:sand"));
        assert_eq!(settings.ground_cover_layers().len(), 1);
    }

    #[test]
    fn generation_populators_filtered_by_type() {
        let mut settings = BiomeGenerationSettings::default();
        settings.add_generation_populator(Caves { frequency: 8 });
        settings.add_generation_populator(Ravines);
        settings.add_generation_populator(Caves { frequency: 2 });

        assert_eq!(settings.generation_populators().len(), 3);
        let caves: Vec<u32> = settings
            .generation_populators_of::<Caves>()
            .iter()
            .map(|c| c.frequency)
            .collect();
        assert_eq!(caves, vec![8, 2]);
        assert_eq!(settings.generation_populators_of::<Ravines>().len(), 1);

        assert_eq!(settings.remove_generation_populators_of::<Caves>(), 2);
        assert_eq!(settings.generation_populators().len(), 1);
        assert!(settings.generation_populators_of::<Caves>().is_empty());
    }

    #[test]
    fn generation_populator_insert_and_remove() {
        let mut settings = BiomeGenerationSettings::default();
        settings.add_generation_populator(Ravines);
        settings.insert_generation_populator(0, Caves { frequency: 1 });
        let first = settings.remove_generation_populator(0).unwrap();
        assert!((*first).as_any().is::<Caves>());
        assert!(settings.remove_generation_populator(3).is_none());
        settings.clear_generation_populators();
        assert!(settings.generation_populators().is_empty());
    }

    #[test]
    fn populators_filtered_by_type() {
        let mut settings = BiomeGenerationSettings::default();
        settings.add_populator(Flowers);
        settings.add_populator(Lake {
            liquid: BlockState::new("minecraft:water"),
        });
        settings.insert_populator(
            0,
            Lake {
                liquid: BlockState::new("minecraft:lava"),
            },
        );

        let lakes: Vec<&str> = settings
            .populators_of::<Lake>()
            .iter()
            .map(|l| l.liquid.0.as_str())
            .collect();
        assert_eq!(lakes, vec!["minecraft:lava", "minecraft:water"]);

        let types: Vec<PopulatorType> = settings
            .populators()
            .iter()
            .map(|p| p.populator_type())
            .collect();
        assert_eq!(types[1], PopulatorType("minecraft:flower".to_string()));

        settings.retain_populators(|p| p.populator_type().0 != "minecraft:lake");
        assert_eq!(settings.populators().len(), 1);
        assert!(settings.remove_populator(0).is_some());
        assert_eq!(settings.remove_populators_of::<Lake>(), 0);
    }

    #[test]
    fn structures_filtered_by_type() {
        let mut settings = BiomeGenerationSettings::default();
        settings.add_structure(Village);
        settings.add_structure(Mineshaft);
        settings.insert_structure(0, Mineshaft);

        assert_eq!(settings.structures().len(), 3);
        assert_eq!(settings.structures_of::<Mineshaft>().len(), 2);
        assert_eq!(settings.structures_of::<Village>().len(), 1);

        let kinds: Vec<String> = settings
            .structures()
            .iter()
            .map(|s| Populator::populator_type(&**s).0)
            .collect();
        assert_eq!(
            kinds,
            vec!["minecraft:mineshaft", "minecraft:village", "minecraft:mineshaft"]
        );

        settings.retain_structures(|s| Populator::populator_type(&**s).0 != "minecraft:village");
        assert_eq!(settings.structures().len(), 2);
        assert_eq!(settings.remove_structures_of::<Mineshaft>(), 2);
        assert!(settings.remove_structure(0).is_none());
        settings.clear_structures();
        settings.clear_populators();
    }

    #[test]
    fn structure_runs_in_both_phases() {
        struct NullWorld;

        impl World for NullWorld {
            fn unique_id(&self) -> WorldId {
                WorldId(0)
            }

            fn name(&self) -> &str {
                "null"
            }

            fn entities(
                &self,
                _filter: &dyn Fn(&EntitySnapshot) -> bool,
            ) -> Vec<EntitySnapshot> {
                Vec::new()
            }
        }

        struct Marker {
            blocks: Vec<BlockState>,
        }

        impl BlockVolume for Marker {
            fn block_min(&self) -> IVec3 {
                IVec3::ZERO
            }

            fn block_max(&self) -> IVec3 {
                IVec3::ZERO
            }

            fn block(&self, _position: IVec3) -> BlockState {
                self.blocks[0].clone()
            }

            fn set_block(&mut self, _position: IVec3, block: BlockState) {
                self.blocks.push(block);
            }
        }

        struct Tower;

        impl GenerationPopulator for Tower {
            fn populate(&self, _world: &dyn World, buffer: &mut dyn BlockVolume) {
                buffer.set_block(IVec3::ZERO, BlockState::new("generated"));
            }
        }

        impl Populator for Tower {
            fn populator_type(&self) -> PopulatorType {
                PopulatorType("test:tower".to_string())
            }

            fn populate(&self, chunk: &mut dyn BlockVolume, _rng: &mut StdRng) {
                chunk.set_block(IVec3::ZERO, BlockState::new("populated"));
            }
        }

        impl Structure for Tower {}

        let mut settings = BiomeGenerationSettings::default();
        settings.add_structure(Tower);

        let mut volume = Marker {
            blocks: vec![BlockState::new("minecraft:air")],
        };
        let mut rng = StdRng::seed_from_u64(3);
        for structure in settings.structures() {
            GenerationPopulator::populate(&**structure, &NullWorld, &mut volume);
            Populator::populate(&**structure, &mut volume, &mut rng);
        }
        assert_eq!(
            volume.blocks,
            vec![
                BlockState::new("minecraft:air"),
                BlockState::new("generated"),
                BlockState::new("populated"),
            ]
        );
    }

    #[test]
    fn config_round_trip() {
        let config = BiomeConfig::parse_ron(
            r#"BiomeConfig(
                min_height: 0.1,
                max_height: 0.3,
                ground_cover: [
                    (block: "minecraft:grass", depth: Fixed(1.0)),
                    (block: "minecraft:dirt", depth: Range(min: 2.0, max: 4.0)),
                ],
            )"#,
        )
        .unwrap();
        let settings = BiomeGenerationSettings::from_config(config.clone()).unwrap();
        assert_eq!(settings.ground_cover_layers().len(), 2);
        assert_eq!(settings.to_config(), config);
    }

    #[test]
    fn config_rejects_inverted_heights() {
        let err = BiomeConfig::parse_ron("BiomeConfig(min_height: 1.0, max_height: 0.5)").unwrap_err();
        assert!(matches!(err, BiomeError::InvalidHeights { .. }));
    }

    #[test]
    fn config_rejects_unsampleable_depth() {
        let err = BiomeConfig::parse_ron(
            r#"BiomeConfig(
                min_height: 0.1,
                max_height: 0.2,
                ground_cover: [
                    (block: "minecraft:grass", depth: Fixed(1.0)),
                    (block: "minecraft:sand", depth: Range(min: -1e308, max: 1e308)),
                ],
            )"#,
        )
        .unwrap_err();
        assert!(matches!(err, BiomeError::InvalidAmount { layer: 1, .. }));

        let config = BiomeConfig {
            min_height: 0.0,
            max_height: 1.0,
            ground_cover: vec![GroundCoverLayer::new(
                BlockState::new("minecraft:dirt"),
                VariableAmount::BaseWithRandomAddition {
                    base: 1.0,
                    addition: f64::INFINITY,
                },
            )],
        };
        assert!(matches!(
            BiomeGenerationSettings::from_config(config),
            Err(BiomeError::InvalidAmount { layer: 0, .. })
        ));
    }

    #[test]
    fn config_rejects_non_finite_heights() {
        let config = BiomeConfig {
            min_height: f32::NAN,
            max_height: 1.0,
            ground_cover: Vec::new(),
        };
        assert!(matches!(
            BiomeGenerationSettings::from_config(config),
            Err(BiomeError::NonFiniteHeight(_))
        ));
    }
}
