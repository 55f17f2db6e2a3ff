//! Immune-system variable neighborhood descent (IS-VND).
//!
//! A population-based, parallel variant of VND. Each round explores a
//! selection of population members under every neighborhood on a worker
//! pool. Candidates that beat the population's best member are folded back
//! in by a maintenance policy that keeps the population size fixed.
//! Commits are serialized, and a round ends only once all its tasks have
//! finished. The run converges after a round without commits.

mod config;
mod population;
mod runner;
mod strategies;

pub use config::IsVndConfig;
pub use population::{FitnessBounds, Member, Population, SharedPopulation};
pub use runner::{InvariantCheck, IsVnd, IsVndResult};
pub use strategies::{
    maintenance, population_selection, AcceptanceTest, BestMMaintenance, BestMSelection,
    BestSolutionSelection, BetterThanBestInPopulation, FinalSelection, FirstMMaintenance,
    FirstMSelection, IsVndStrategies, Maintenance, PopulationSelection, RandomMMaintenance,
    RandomMSelection,
};
