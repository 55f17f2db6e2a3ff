//! Variable Neighborhood Descent execution engine.
//!
//! # Algorithm
//!
//! 1. Set k = 0
//! 2. While k < k_max:
//!    a. Ask the selection strategy for an improving neighbor of x in N_k(x)
//!    b. If one exists, set x to it and restart from k = 0
//!       (reshuffling the operator order when enabled)
//!    c. Otherwise k = k + 1
//! 3. Return x, a local optimum with respect to every N_k
//!
//! # Reference
//!
//! Hansen, P. & Mladenović, N. (2001). "Variable neighborhood search:
//! Principles and applications", *European Journal of Operational Research*
//! 130(3), 449-467.

use super::config::VndConfig;
use crate::error::ConfigError;
use crate::framework::{
    Decoder, FitnessEvaluator, NeighborSelection, Neighborhood, Scored, IMPROVEMENT_TOLERANCE,
};
use crate::random::{create_rng, DEFAULT_SEED};
use rand::seq::SliceRandom;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Result of a VND run.
#[derive(Debug, Clone)]
pub struct VndResult<S: Clone> {
    /// The local optimum reached.
    pub best: S,
    /// Fitness of `best`.
    pub best_fitness: f64,
    /// Number of accepted improving moves.
    pub improvements: usize,
    /// Number of candidates evaluated.
    pub evaluations: usize,
    /// Number of passes started (a pass restarts after every improvement).
    pub passes: usize,
    /// Whether the run was cancelled externally.
    pub cancelled: bool,
    /// Fitness after every accepted move, starting with the initial fitness.
    pub fitness_history: Vec<f64>,
}

/// Variable Neighborhood Descent engine.
///
/// Generic over the candidate type `E`, its [`Decoder`] and a
/// [`FitnessEvaluator`] for the decoded form.
pub struct Vnd<E, D, F> {
    decoder: D,
    evaluator: F,
    neighborhoods: Vec<Box<dyn Neighborhood<E>>>,
    selection: Box<dyn NeighborSelection<E>>,
    config: VndConfig,
}

impl<E, D, F> Vnd<E, D, F>
where
    E: Clone + Send + Sync,
    D: Decoder<E>,
    F: FitnessEvaluator<D::Decoded>,
{
    /// Assembles the engine.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoNeighborhoods`] for an empty operator list, or the
    /// error reported by [`VndConfig::validate`].
    pub fn new(
        decoder: D,
        evaluator: F,
        neighborhoods: Vec<Box<dyn Neighborhood<E>>>,
        selection: Box<dyn NeighborSelection<E>>,
        config: VndConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if neighborhoods.is_empty() {
            return Err(ConfigError::NoNeighborhoods);
        }
        Ok(Self {
            decoder,
            evaluator,
            neighborhoods,
            selection,
            config,
        })
    }

    /// The engine configuration.
    pub fn config(&self) -> &VndConfig {
        &self.config
    }

    /// Fitness of a candidate after decoding.
    pub fn fitness(&self, candidate: &E) -> f64 {
        self.evaluator.evaluate(&self.decoder.decode(candidate))
    }

    /// Descends from `start` to a local optimum.
    pub fn run(&self, start: E) -> VndResult<E> {
        self.run_with_cancel(start, None)
    }

    /// Runs VND with an optional cancellation token, checked between moves.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run_with_cancel(&self, start: E, cancel: Option<Arc<AtomicBool>>) -> VndResult<E> {
        let started = Instant::now();
        let mut rng = create_rng(self.config.seed.unwrap_or(DEFAULT_SEED));
        let direction = self.evaluator.direction();

        let mut order: Vec<usize> = (0..self.neighborhoods.len()).collect();
        if self.config.shuffle_neighborhoods {
            order.shuffle(&mut rng);
        }

        let mut current = start;
        let mut current_fitness = self.fitness(&current);
        let mut fitness_history = vec![current_fitness];
        let mut improvements = 0usize;
        let mut evaluations = 0usize;
        let mut passes = 1usize;
        let mut cancelled = false;

        let mut k = 0;
        while k < order.len() {
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }

            let neighborhood = &self.neighborhoods[order[k]];
            let chosen = {
                let mut improving = neighborhood.neighbors(&current).filter_map(|candidate| {
                    evaluations += 1;
                    let fitness = self.fitness(&candidate);
                    direction
                        .improves(fitness, current_fitness, IMPROVEMENT_TOLERANCE)
                        .then(|| Scored::new(candidate, fitness))
                });
                self.selection.select(&mut improving, direction, &mut rng)
            };

            match chosen {
                Some(next) => {
                    current = next.solution;
                    current_fitness = next.fitness;
                    improvements += 1;
                    fitness_history.push(current_fitness);
                    debug!(
                        neighborhood = neighborhood.name(),
                        fitness = current_fitness,
                        pass = passes,
                        "vnd improvement, restarting pass"
                    );

                    if self.config.max_passes > 0 && passes >= self.config.max_passes {
                        break;
                    }
                    passes += 1;
                    k = 0;
                    if self.config.shuffle_neighborhoods {
                        order.shuffle(&mut rng);
                    }
                }
                None => k += 1,
            }
        }

        info!(
            fitness = current_fitness,
            improvements,
            evaluations,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "vnd finished"
        );

        VndResult {
            best: current,
            best_fitness: current_fitness,
            improvements,
            evaluations,
            passes,
            cancelled,
            fitness_history,
        }
    }
}
