//! Fixed-size solution population and its concurrent wrapper.

use super::strategies::{AcceptanceTest, Maintenance};
use crate::error::SearchError;
use crate::framework::Direction;
use parking_lot::Mutex;
use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};

/// A population entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Member<S> {
    /// The solution.
    pub solution: S,
    /// Its fitness.
    pub fitness: f64,
    /// `true` while the slot still holds an initial solution.
    pub seed: bool,
}

impl<S> Member<S> {
    /// A member produced by the search.
    pub fn new(solution: S, fitness: f64) -> Self {
        Self {
            solution,
            fitness,
            seed: false,
        }
    }

    /// An initial member.
    pub fn seeded(solution: S, fitness: f64) -> Self {
        Self {
            solution,
            fitness,
            seed: true,
        }
    }
}

/// Best and worst fitness currently in a population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessBounds {
    /// Fitness of the best member.
    pub best: f64,
    /// Fitness of the worst member.
    pub worst: f64,
}

/// An ordered, index-addressed set of solutions.
///
/// Its size only changes through [`Maintenance`] commits, which keep it
/// fixed; the engine verifies that after every commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Population<S> {
    members: Vec<Member<S>>,
}

impl<S> Population<S> {
    /// Wraps `members`.
    pub fn new(members: Vec<Member<S>>) -> Self {
        Self { members }
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if there are no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member at index `i`.
    #[inline]
    pub fn member(&self, i: usize) -> &Member<S> {
        &self.members[i]
    }

    /// All members in slot order.
    pub fn members(&self) -> &[Member<S>] {
        &self.members
    }

    /// Fitness of every member in slot order.
    pub fn fitnesses(&self) -> Vec<f64> {
        self.members.iter().map(|m| m.fitness).collect()
    }

    /// Puts `member` into slot `i`, returning the previous occupant.
    pub fn replace(&mut self, i: usize, member: Member<S>) -> Member<S> {
        std::mem::replace(&mut self.members[i], member)
    }

    /// Index of the best member; the lowest index wins ties.
    pub fn best_index(&self, direction: Direction) -> Option<usize> {
        (0..self.members.len()).min_by(|&a, &b| {
            direction.compare(self.members[a].fitness, self.members[b].fitness)
        })
    }

    /// Index of the worst member; the lowest index wins ties.
    pub fn worst_index(&self, direction: Direction) -> Option<usize> {
        (0..self.members.len()).min_by(|&a, &b| {
            direction.compare(self.members[b].fitness, self.members[a].fitness)
        })
    }

    /// Best and worst fitness, or `None` for an empty population.
    pub fn bounds(&self, direction: Direction) -> Option<FitnessBounds> {
        let best = self.best_index(direction)?;
        let worst = self.worst_index(direction)?;
        Some(FitnessBounds {
            best: self.members[best].fitness,
            worst: self.members[worst].fitness,
        })
    }
}

/// A population shared by concurrent workers.
///
/// Commits are serialized by a mutex. The best and worst fitness are
/// mirrored in atomics so that workers can reject candidates without
/// taking the lock.
#[derive(Debug)]
pub struct SharedPopulation<S> {
    population: Mutex<Population<S>>,
    best: AtomicU64,
    worst: AtomicU64,
    direction: Direction,
    size: usize,
}

impl<S: Clone> SharedPopulation<S> {
    /// Wraps `population`, whose current size becomes the required size.
    ///
    /// # Errors
    ///
    /// [`SearchError::EmptyPopulation`] if `population` has no members.
    pub fn new(population: Population<S>, direction: Direction) -> Result<Self, SearchError> {
        let bounds = population
            .bounds(direction)
            .ok_or(SearchError::EmptyPopulation)?;
        Ok(Self {
            size: population.len(),
            best: AtomicU64::new(bounds.best.to_bits()),
            worst: AtomicU64::new(bounds.worst.to_bits()),
            population: Mutex::new(population),
            direction,
        })
    }

    /// Lock-free view of the current bounds.
    #[inline]
    pub fn peek(&self) -> FitnessBounds {
        FitnessBounds {
            best: f64::from_bits(self.best.load(Ordering::Acquire)),
            worst: f64::from_bits(self.worst.load(Ordering::Acquire)),
        }
    }

    /// Clones the members at `indices`, chosen by `pick` under the lock.
    pub fn snapshot_with(
        &self,
        pick: impl FnOnce(&Population<S>) -> Vec<usize>,
    ) -> Vec<Member<S>> {
        let guard = self.population.lock();
        pick(&guard)
            .into_iter()
            .map(|i| guard.member(i).clone())
            .collect()
    }

    /// Fitness of every member.
    pub fn fitnesses(&self) -> Vec<f64> {
        self.population.lock().fitnesses()
    }

    /// Offers a candidate to the population.
    ///
    /// The acceptance test runs first against the lock-free bounds and again
    /// under the lock; maintenance then decides whether and where it lands.
    /// Returns `Ok(true)` if the population changed.
    ///
    /// # Errors
    ///
    /// [`SearchError::PopulationSize`] if maintenance left the population
    /// at a size other than the one it started with.
    pub fn try_commit(
        &self,
        candidate: Member<S>,
        acceptance: &dyn AcceptanceTest,
        maintenance: &dyn Maintenance<S>,
        rng: &mut dyn RngCore,
    ) -> Result<bool, SearchError> {
        if !acceptance.admits(candidate.fitness, self.peek(), self.direction) {
            return Ok(false);
        }

        let mut guard = self.population.lock();
        let bounds = guard.bounds(self.direction).ok_or(SearchError::EmptyPopulation)?;
        if !acceptance.admits(candidate.fitness, bounds, self.direction) {
            return Ok(false);
        }

        let fitness = candidate.fitness;
        let changed = maintenance.commit(&mut guard, candidate, self.direction, rng);
        if guard.len() != self.size {
            return Err(SearchError::PopulationSize {
                expected: self.size,
                actual: guard.len(),
            });
        }
        if changed {
            let bounds = guard.bounds(self.direction).ok_or(SearchError::EmptyPopulation)?;
            self.best.store(bounds.best.to_bits(), Ordering::Release);
            self.worst.store(bounds.worst.to_bits(), Ordering::Release);
            tracing::trace!(fitness, best = bounds.best, "population commit");
        }
        Ok(changed)
    }

    /// Releases the population.
    pub fn into_inner(self) -> Population<S> {
        self.population.into_inner()
    }
}
