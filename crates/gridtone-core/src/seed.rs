//! Deterministic random streams derived from grid coordinates.
//!
//! Every stochastic generator owns exactly one stream, built from its own
//! base constant and the cell/track it renders. Nothing in the crate reads a
//! process-wide random source, so identical coordinates always reproduce the
//! same samples and renders can run on any thread.

use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::context::CellPosition;

/// The pseudo-random stream every generator draws from.
pub type SignalRng = Pcg64;

pub const DEFAULT_CELL_MULTIPLIER: u64 = 99_991;
pub const DEFAULT_TRACK_MULTIPLIER: u64 = 7_919;

/// Affine seed recipe: `base + cell_index * cell_multiplier + track_index * track_multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedRecipe {
    pub base: u64,
    pub cell_multiplier: u64,
    pub track_multiplier: u64,
}

impl SeedRecipe {
    #[must_use]
    pub const fn new(base: u64) -> Self {
        Self {
            base,
            cell_multiplier: DEFAULT_CELL_MULTIPLIER,
            track_multiplier: DEFAULT_TRACK_MULTIPLIER,
        }
    }

    #[must_use]
    pub const fn with_multipliers(base: u64, cell_multiplier: u64, track_multiplier: u64) -> Self {
        Self {
            base,
            cell_multiplier,
            track_multiplier,
        }
    }

    /// Wrapping arithmetic keeps every coordinate valid, negatives included.
    #[must_use]
    pub fn derive_seed(&self, position: &CellPosition) -> u64 {
        self.base
            .wrapping_add((position.cell_index as u64).wrapping_mul(self.cell_multiplier))
            .wrapping_add((position.track_index as u64).wrapping_mul(self.track_multiplier))
    }

    #[must_use]
    pub fn stream(&self, position: &CellPosition) -> SignalRng {
        create_rng(self.derive_seed(position))
    }
}

#[must_use]
pub fn create_rng(seed: u64) -> SignalRng {
    Pcg64::seed_from_u64(seed)
}
