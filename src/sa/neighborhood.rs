//! Randomized proposal generators for annealing.

use crate::error::ConfigError;
use crate::framework::NeighborGenerator;
use rand::{Rng, RngCore};

/// Picks one of several generators uniformly and returns its proposal.
pub struct CompositeNeighborhood<S> {
    generators: Vec<Box<dyn NeighborGenerator<S>>>,
}

impl<S> CompositeNeighborhood<S> {
    /// # Errors
    ///
    /// [`ConfigError::NoNeighborhoods`] if `generators` is empty.
    pub fn new(generators: Vec<Box<dyn NeighborGenerator<S>>>) -> Result<Self, ConfigError> {
        if generators.is_empty() {
            return Err(ConfigError::NoNeighborhoods);
        }
        Ok(Self { generators })
    }

    /// Number of composed generators.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Always `false`; construction rejects an empty list.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl<S> NeighborGenerator<S> for CompositeNeighborhood<S> {
    fn generate(&self, base: &S, rng: &mut dyn RngCore) -> Option<S> {
        let pick = rng.random_range(0..self.generators.len());
        self.generators[pick].generate(base, rng)
    }
}

/// Applies the inner generator twice with probability `probability`.
///
/// A failed second move falls back to the single move.
#[derive(Debug, Clone)]
pub struct RepeatNeighborhood<G> {
    inner: G,
    probability: f64,
}

impl<G> RepeatNeighborhood<G> {
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] if `probability` is outside `[0, 1]`.
    pub fn new(inner: G, probability: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::invalid(
                "repeat_probability",
                format!("must be in [0, 1], got {probability}"),
            ));
        }
        Ok(Self { inner, probability })
    }

    /// The wrapped generator.
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<S, G: NeighborGenerator<S>> NeighborGenerator<S> for RepeatNeighborhood<G> {
    fn generate(&self, base: &S, rng: &mut dyn RngCore) -> Option<S> {
        let first = self.inner.generate(base, rng)?;
        if self.probability > 0.0 && rng.random_bool(self.probability) {
            return Some(self.inner.generate(&first, rng).unwrap_or(first));
        }
        Some(first)
    }
}
