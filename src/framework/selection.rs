//! Neighbor selection strategies used by VND.
//!
//! A selection strategy receives the improving candidates of one operator,
//! in the operator's enumeration order, and picks at most one of them.
//! The engine applies the improvement test; the strategy only chooses.

use super::types::{Direction, Scored};
use crate::strategy::StrategyKind;
use rand::{Rng, RngCore};

/// Chooses one candidate among an operator's improving neighbors.
pub trait NeighborSelection<S>: Send + Sync {
    /// Returns the chosen candidate, or `None` when `improving` is empty.
    fn select(
        &self,
        improving: &mut dyn Iterator<Item = Scored<S>>,
        direction: Direction,
        rng: &mut dyn RngCore,
    ) -> Option<Scored<S>>;
}

/// Takes the first improving candidate and stops enumerating.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectFirstImproving;

impl<S> NeighborSelection<S> for SelectFirstImproving {
    fn select(
        &self,
        improving: &mut dyn Iterator<Item = Scored<S>>,
        _direction: Direction,
        _rng: &mut dyn RngCore,
    ) -> Option<Scored<S>> {
        improving.next()
    }
}

/// Scans every candidate and keeps the best; the earliest wins ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectBestImproving;

impl<S> NeighborSelection<S> for SelectBestImproving {
    fn select(
        &self,
        improving: &mut dyn Iterator<Item = Scored<S>>,
        direction: Direction,
        _rng: &mut dyn RngCore,
    ) -> Option<Scored<S>> {
        let mut best: Option<Scored<S>> = None;
        for candidate in improving {
            let replace = best
                .as_ref()
                .is_none_or(|b| direction.is_better(candidate.fitness, b.fitness));
            if replace {
                best = Some(candidate);
            }
        }
        best
    }
}

/// Collects every candidate and returns one uniformly at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectRandomImproving;

impl<S> NeighborSelection<S> for SelectRandomImproving {
    fn select(
        &self,
        improving: &mut dyn Iterator<Item = Scored<S>>,
        _direction: Direction,
        rng: &mut dyn RngCore,
    ) -> Option<Scored<S>> {
        let mut pool: Vec<Scored<S>> = improving.collect();
        if pool.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..pool.len());
        Some(pool.swap_remove(idx))
    }
}

/// Builds the selection strategy named by `kind`.
pub fn neighbor_selection<S>(kind: StrategyKind) -> Box<dyn NeighborSelection<S>> {
    match kind {
        StrategyKind::Best => Box::new(SelectBestImproving),
        StrategyKind::First => Box::new(SelectFirstImproving),
        StrategyKind::Random => Box::new(SelectRandomImproving),
    }
}
