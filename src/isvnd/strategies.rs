//! Population selection, acceptance, maintenance and final selection.
//!
//! The best/first/random variants of population selection and maintenance
//! are built from a [`StrategyKind`], so an experiment picks one variant
//! name for both families.

use super::population::{FitnessBounds, Member, Population};
use crate::framework::{Direction, IMPROVEMENT_TOLERANCE};
use crate::strategy::StrategyKind;
use rand::seq::index;
use rand::{Rng, RngCore};

/// Chooses which members are explored in a round.
pub trait PopulationSelection<S>: Send + Sync {
    /// Indices of up to `count` members.
    fn select(
        &self,
        population: &Population<S>,
        count: usize,
        direction: Direction,
        rng: &mut dyn RngCore,
    ) -> Vec<usize>;
}

/// The `count` best members, best first.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestMSelection;

impl<S> PopulationSelection<S> for BestMSelection {
    fn select(
        &self,
        population: &Population<S>,
        count: usize,
        direction: Direction,
        _rng: &mut dyn RngCore,
    ) -> Vec<usize> {
        let mut order: Vec<usize> = (0..population.len()).collect();
        order.sort_by(|&a, &b| {
            direction.compare(population.member(a).fitness, population.member(b).fitness)
        });
        order.truncate(count);
        order
    }
}

/// The first `count` slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMSelection;

impl<S> PopulationSelection<S> for FirstMSelection {
    fn select(
        &self,
        population: &Population<S>,
        count: usize,
        _direction: Direction,
        _rng: &mut dyn RngCore,
    ) -> Vec<usize> {
        (0..count.min(population.len())).collect()
    }
}

/// A uniform sample of `count` distinct slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMSelection;

impl<S> PopulationSelection<S> for RandomMSelection {
    fn select(
        &self,
        population: &Population<S>,
        count: usize,
        _direction: Direction,
        rng: &mut dyn RngCore,
    ) -> Vec<usize> {
        let count = count.min(population.len());
        index::sample(rng, population.len(), count).into_vec()
    }
}

/// Cheap gate applied to a candidate before maintenance.
pub trait AcceptanceTest: Send + Sync {
    /// Returns `true` if a candidate with `fitness` may be committed.
    fn admits(&self, fitness: f64, bounds: FitnessBounds, direction: Direction) -> bool;
}

/// Admits only candidates strictly better than the best member.
#[derive(Debug, Clone, Copy, Default)]
pub struct BetterThanBestInPopulation;

impl AcceptanceTest for BetterThanBestInPopulation {
    #[inline]
    fn admits(&self, fitness: f64, bounds: FitnessBounds, direction: Direction) -> bool {
        direction.improves(fitness, bounds.best, IMPROVEMENT_TOLERANCE)
    }
}

/// Folds an admitted candidate into the population at constant size.
pub trait Maintenance<S>: Send + Sync {
    /// Commits `candidate`; returns `true` if the population changed.
    fn commit(
        &self,
        population: &mut Population<S>,
        candidate: Member<S>,
        direction: Direction,
        rng: &mut dyn RngCore,
    ) -> bool;
}

/// Keeps the best P solutions: the candidate replaces the worst member
/// when it is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestMMaintenance;

impl<S> Maintenance<S> for BestMMaintenance {
    fn commit(
        &self,
        population: &mut Population<S>,
        candidate: Member<S>,
        direction: Direction,
        _rng: &mut dyn RngCore,
    ) -> bool {
        match population.worst_index(direction) {
            Some(worst) if direction.is_better(candidate.fitness, population.member(worst).fitness) => {
                population.replace(worst, candidate);
                true
            }
            _ => false,
        }
    }
}

/// Keeps the first P solutions seen: candidates fill the slots still
/// holding initial solutions, in slot order, and are discarded afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMMaintenance;

impl<S> Maintenance<S> for FirstMMaintenance {
    fn commit(
        &self,
        population: &mut Population<S>,
        mut candidate: Member<S>,
        _direction: Direction,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let Some(slot) = population.members().iter().position(|m| m.seed) else {
            return false;
        };
        candidate.seed = false;
        population.replace(slot, candidate);
        true
    }
}

/// Replaces a uniformly random member.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMMaintenance;

impl<S> Maintenance<S> for RandomMMaintenance {
    fn commit(
        &self,
        population: &mut Population<S>,
        candidate: Member<S>,
        _direction: Direction,
        rng: &mut dyn RngCore,
    ) -> bool {
        if population.is_empty() {
            return false;
        }
        let slot = rng.random_range(0..population.len());
        population.replace(slot, candidate);
        true
    }
}

/// Picks the solution a run returns.
pub trait FinalSelection<S>: Send + Sync {
    /// The chosen member, or `None` for an empty population.
    fn choose<'a>(&self, population: &'a Population<S>, direction: Direction)
        -> Option<&'a Member<S>>;
}

/// Returns the best member; the lowest slot wins ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestSolutionSelection;

impl<S> FinalSelection<S> for BestSolutionSelection {
    fn choose<'a>(
        &self,
        population: &'a Population<S>,
        direction: Direction,
    ) -> Option<&'a Member<S>> {
        population
            .best_index(direction)
            .map(|i| population.member(i))
    }
}

/// Builds the population selection named by `kind`.
pub fn population_selection<S>(kind: StrategyKind) -> Box<dyn PopulationSelection<S>> {
    match kind {
        StrategyKind::Best => Box::new(BestMSelection),
        StrategyKind::First => Box::new(FirstMSelection),
        StrategyKind::Random => Box::new(RandomMSelection),
    }
}

/// Builds the maintenance policy named by `kind`.
pub fn maintenance<S>(kind: StrategyKind) -> Box<dyn Maintenance<S>> {
    match kind {
        StrategyKind::Best => Box::new(BestMMaintenance),
        StrategyKind::First => Box::new(FirstMMaintenance),
        StrategyKind::Random => Box::new(RandomMMaintenance),
    }
}

/// The full strategy set an [`IsVnd`](super::IsVnd) engine is built from.
pub struct IsVndStrategies<S> {
    /// Which members to explore each round.
    pub selection: Box<dyn PopulationSelection<S>>,
    /// Gate for candidates.
    pub acceptance: Box<dyn AcceptanceTest>,
    /// How admitted candidates enter the population.
    pub maintenance: Box<dyn Maintenance<S>>,
    /// Which member the run returns.
    pub final_selection: Box<dyn FinalSelection<S>>,
}

impl<S> IsVndStrategies<S> {
    /// Selection and maintenance of the same variant, better-than-best
    /// acceptance and best-solution final selection.
    pub fn from_kind(kind: StrategyKind) -> Self {
        Self {
            selection: population_selection(kind),
            acceptance: Box::new(BetterThanBestInPopulation),
            maintenance: maintenance(kind),
            final_selection: Box::new(BestSolutionSelection),
        }
    }
}
