//! Generation capabilities that plugins register on a biome.

use glam::IVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use thiserror::Error;

use super::extent::World;

/// A block state id, e.g. `minecraft:grass`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockState(pub String);

impl BlockState {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a populator implementation, e.g. `minecraft:lake`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PopulatorType(pub String);

/// A mutable box of blocks handed to generators. Implemented by the host.
pub trait BlockVolume {
    fn block_min(&self) -> IVec3;

    fn block_max(&self) -> IVec3;

    fn block(&self, position: IVec3) -> BlockState;

    fn set_block(&mut self, position: IVec3, block: BlockState);

    fn contains(&self, position: IVec3) -> bool {
        let (min, max) = (self.block_min(), self.block_max());
        position.cmpge(min).all() && position.cmple(max).all()
    }
}

/// Downcast support for the registration lists' type-filtered views.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Works strictly on one chunk's block buffer during the generation phase.
/// Typically carves large terrain features like caves and ravines.
pub trait GenerationPopulator: AsAny + Send + Sync {
    fn populate(&self, world: &dyn World, buffer: &mut dyn BlockVolume);
}

/// Decorates an already generated chunk during the population phase.
pub trait Populator: AsAny + Send + Sync {
    fn populator_type(&self) -> PopulatorType;

    fn populate(&self, chunk: &mut dyn BlockVolume, rng: &mut StdRng);
}

/// Runs in both phases: after generation populators while generating, and
/// before plain populators while populating.
pub trait Structure: GenerationPopulator + Populator {}

/// A number drawn from a distribution each time it is needed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VariableAmount {
    Fixed(f64),
    /// `base + rand[0, addition)`.
    BaseWithRandomAddition { base: f64, addition: f64 },
    /// `base + rand[-variance, variance)`.
    BaseWithVariance { base: f64, variance: f64 },
    /// `rand[min, max)`.
    Range { min: f64, max: f64 },
}

/// A [`VariableAmount`] that could not be sampled: a non-finite field or a
/// span too wide to represent.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid variable amount: {0:?}")]
pub struct InvalidAmount(pub VariableAmount);

impl VariableAmount {
    /// Draw a value. A span that cannot be sampled yields the base value
    /// (`min` for a range).
    pub fn amount(&self, rng: &mut impl Rng) -> f64 {
        match *self {
            Self::Fixed(value) => value,
            Self::BaseWithRandomAddition { base, addition } => {
                base + sample(rng, 0.0, addition).unwrap_or(0.0)
            }
            Self::BaseWithVariance { base, variance } => {
                base + sample(rng, -variance, variance).unwrap_or(0.0)
            }
            Self::Range { min, max } => sample(rng, min, max).unwrap_or(min),
        }
    }

    /// Reject non-finite fields and spans whose width is not finite.
    pub fn validate(&self) -> Result<(), InvalidAmount> {
        let finite = match *self {
            Self::Fixed(value) => value.is_finite(),
            Self::BaseWithRandomAddition { base, addition } => {
                base.is_finite() && addition.is_finite() && (base + addition).is_finite()
            }
            Self::BaseWithVariance { base, variance } => {
                base.is_finite()
                    && variance.is_finite()
                    && (2.0 * variance).is_finite()
                    && (base + variance.abs()).is_finite()
                    && (base - variance.abs()).is_finite()
            }
            Self::Range { min, max } => {
                min.is_finite() && max.is_finite() && (max - min).is_finite()
            }
        };
        if finite {
            Ok(())
        } else {
            Err(InvalidAmount(*self))
        }
    }

    /// Smallest value this amount can produce.
    pub fn min_amount(&self) -> f64 {
        match *self {
            Self::Fixed(value) => value,
            Self::BaseWithRandomAddition { base, addition } => base + addition.min(0.0),
            Self::BaseWithVariance { base, variance } => base - variance.abs(),
            Self::Range { min, max } => min.min(max),
        }
    }
}

/// One layer of ground cover, laid from the topmost stone block upwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundCoverLayer {
    pub block: BlockState,
    pub depth: VariableAmount,
}

// `gen_range` panics unless the span is non-empty and finite
fn sample(rng: &mut impl Rng, low: f64, high: f64) -> Option<f64> {
    (low < high && (high - low).is_finite()).then(|| rng.gen_range(low..high))
}

impl GroundCoverLayer {
    pub fn new(block: BlockState, depth: VariableAmount) -> Self {
        Self { block, depth }
    }

    /// Layer depth for a column seed. The same seed always gives the same
    /// depth.
    pub fn depth_for_seed(&self, seed: u64) -> f64 {
        let mut rng = StdRng::seed_from_u64(seed);
        self.depth.amount(&mut rng)
    }
}
