//! Generic local-search strategy framework.
//!
//! The engines in [`vnd`](crate::vnd), [`isvnd`](crate::isvnd) and
//! [`sa`](crate::sa) are assembled from the same small set of strategies:
//!
//! - [`Decoder`]: turns a search candidate into an evaluable solution
//! - [`FitnessEvaluator`]: scores a solution in a [`Direction`]
//! - [`Neighborhood`]: enumerates feasible candidates of a base solution
//! - [`NeighborGenerator`]: proposes one random neighbor
//! - [`NeighborSelection`]: picks among improving candidates
//!
//! None of these know anything about vehicle routing.

mod selection;
mod types;

pub use selection::{
    neighbor_selection, NeighborSelection, SelectBestImproving, SelectFirstImproving,
    SelectRandomImproving,
};
pub use types::{
    Decoder, Direction, FitnessEvaluator, NeighborGenerator, Neighborhood, Negated,
    ObjectiveEvaluator, PassThroughDecoder, Scored,
};

/// Minimum fitness gain for a move to count as an improvement.
///
/// Cached lengths are maintained incrementally, so two structurally
/// equivalent solutions may differ in the last bits.
pub const IMPROVEMENT_TOLERANCE: f64 = 1e-9;
