//! Per-class drawing colors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::detect::CLASS_COUNT;
use crate::frame::Color;

/// One color per class id, fixed for the lifetime of the process.
///
/// Each channel is drawn uniformly from `[0, 255)`. Without a seed the colors
/// change from run to run; pass a seed to make them reproducible.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: [Color; CLASS_COUNT],
}

impl Palette {
    pub fn random() -> Self {
        Self::from_rng(&mut rand::thread_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(&mut StdRng::seed_from_u64(seed))
    }

    /// Seeded when a seed is configured, random otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::random(),
        }
    }

    fn from_rng<R: Rng>(rng: &mut R) -> Self {
        let colors = std::array::from_fn(|_| {
            Color([
                rng.gen_range(0.0..255.0),
                rng.gen_range(0.0..255.0),
                rng.gen_range(0.0..255.0),
            ])
        });
        Self { colors }
    }

    /// Color for a class id, `None` when the id is out of range.
    pub fn color(&self, class_id: usize) -> Option<Color> {
        self.colors.get(class_id).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
