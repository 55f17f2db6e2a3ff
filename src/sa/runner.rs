//! SA execution loop.

use super::config::{GeometricSchedule, SaConfig};
use crate::error::ConfigError;
use crate::framework::{Decoder, FitnessEvaluator, NeighborGenerator};
use crate::random::{create_rng, DEFAULT_SEED};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution found.
    pub best: S,

    /// Fitness of the best solution.
    pub best_fitness: f64,

    /// The solution held when the run stopped.
    pub final_solution: S,

    /// Fitness of `final_solution`.
    pub final_fitness: f64,

    /// Total number of iterations (proposals, including failed ones).
    pub iterations: usize,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best fitness sampled at regular intervals for history tracking.
    pub fitness_history: Vec<f64>,
}

/// Simulated Annealing over a single [`NeighborGenerator`].
///
/// Uses a [`GeometricSchedule`] and the Metropolis criterion: a proposal
/// worse by `delta` is accepted with probability `exp(-delta / T)`.
pub struct SimulatedAnnealing<E, D, F, G> {
    decoder: D,
    evaluator: F,
    neighborhood: G,
    config: SaConfig,
    _candidate: std::marker::PhantomData<fn() -> E>,
}

impl<E, D, F, G> SimulatedAnnealing<E, D, F, G>
where
    E: Clone,
    D: Decoder<E>,
    F: FitnessEvaluator<D::Decoded>,
    G: NeighborGenerator<E>,
{
    /// Assembles the engine.
    ///
    /// # Errors
    ///
    /// The error reported by [`SaConfig::validate`].
    pub fn new(decoder: D, evaluator: F, neighborhood: G, config: SaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            decoder,
            evaluator,
            neighborhood,
            config,
            _candidate: std::marker::PhantomData,
        })
    }

    /// The engine configuration.
    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    /// Fitness of a candidate after decoding.
    pub fn fitness(&self, candidate: &E) -> f64 {
        self.evaluator.evaluate(&self.decoder.decode(candidate))
    }

    /// Anneals from `start`.
    pub fn run(&self, start: E) -> SaResult<E> {
        self.run_with_cancel(start, None)
    }

    /// Runs SA with an optional cancellation token.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run_with_cancel(&self, start: E, cancel: Option<Arc<AtomicBool>>) -> SaResult<E> {
        let started = Instant::now();
        let config = &self.config;
        let mut rng = create_rng(config.seed.unwrap_or(DEFAULT_SEED));
        let direction = self.evaluator.direction();

        let mut current_fitness = self.fitness(&start);
        let mut best = start.clone();
        let mut best_fitness = current_fitness;
        let mut current = start;

        let mut schedule = GeometricSchedule::new(config);
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;

        // Best fitness history: sample every N iterations
        let history_interval = 100.max(config.steps_per_temperature);
        let mut fitness_history = vec![best_fitness];

        while !schedule.is_frozen() {
            if config.max_iterations > 0 && iterations >= config.max_iterations {
                break;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            if let Some(candidate) = self.neighborhood.generate(&current, &mut rng) {
                let fitness = self.fitness(&candidate);
                let delta = direction.worsening(fitness, current_fitness);

                // Metropolis acceptance criterion
                let accept = delta <= 0.0
                    || rng.random_range(0.0..1.0) < (-delta / schedule.temperature()).exp();

                if accept {
                    if delta < 0.0 {
                        improving_moves += 1;
                    }
                    accepted_moves += 1;
                    current = candidate;
                    current_fitness = fitness;

                    if direction.is_better(current_fitness, best_fitness) {
                        best = current.clone();
                        best_fitness = current_fitness;
                    }
                }
            }

            iterations += 1;
            if iterations.is_multiple_of(history_interval) {
                fitness_history.push(best_fitness);
            }

            if schedule.advance() {
                debug!(
                    temperature = schedule.temperature(),
                    current = current_fitness,
                    best = best_fitness,
                    "sa cooled"
                );
            }
        }

        if fitness_history
            .last()
            .is_none_or(|&last| (last - best_fitness).abs() > 1e-15)
        {
            fitness_history.push(best_fitness);
        }

        info!(
            fitness = best_fitness,
            iterations,
            accepted_moves,
            temperature = schedule.temperature(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "sa finished"
        );

        SaResult {
            best,
            best_fitness,
            final_solution: current,
            final_fitness: current_fitness,
            iterations,
            final_temperature: schedule.temperature(),
            accepted_moves,
            improving_moves,
            cancelled,
            fitness_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{ObjectiveEvaluator, PassThroughDecoder};
    use rand::RngCore;

    // ---- Integer line: f(x) = (x - 37)^2, random steps of up to 3 ----

    struct RandomStep;

    impl NeighborGenerator<i64> for RandomStep {
        fn generate(&self, base: &i64, rng: &mut dyn RngCore) -> Option<i64> {
            let step = rng.random_range(1..=3i64);
            Some(if rng.random_bool(0.5) { base + step } else { base - step })
        }
    }

    fn squared(x: &i64) -> f64 {
        let d = (*x - 37) as f64;
        d * d
    }

    type LineAnnealer =
        SimulatedAnnealing<i64, PassThroughDecoder, ObjectiveEvaluator<fn(&i64) -> f64>, RandomStep>;

    fn annealer(config: SaConfig) -> LineAnnealer {
        SimulatedAnnealing::new(
            PassThroughDecoder,
            ObjectiveEvaluator::minimize(squared as fn(&i64) -> f64),
            RandomStep,
            config,
        )
        .unwrap()
    }

    #[test]
    fn test_sa_finds_optimum() {
        let config = SaConfig::default()
            .with_steps_per_temperature(50)
            .with_seed(42);
        let result = annealer(config).run(-40);
        assert!(
            result.best_fitness <= 1.0,
            "expected near-optimal solution, got x = {}",
            result.best
        );
        assert!(result.accepted_moves > 0);
        assert!(result.improving_moves > 0);
        assert!(result.improving_moves <= result.accepted_moves);
    }

    #[test]
    fn test_sa_best_never_worse_than_start() {
        let result = annealer(SaConfig::default().with_seed(3)).run(37);
        assert_eq!(result.best, 37);
        assert_eq!(result.best_fitness, 0.0);
        assert!(result.final_fitness >= result.best_fitness);
    }

    #[test]
    fn test_sa_deterministic() {
        let config = SaConfig::default().with_seed(77);
        let a = annealer(config.clone()).run(0);
        let b = annealer(config).run(0);
        assert_eq!(a.best, b.best);
        assert_eq!(a.final_solution, b.final_solution);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.accepted_moves, b.accepted_moves);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_sa_stops_when_frozen() {
        let config = SaConfig::default().with_seed(1);
        let result = annealer(config.clone()).run(0);
        // one proposal per level: the run lasts exactly as many levels as
        // it takes to cool from 10 to 1e-3
        assert_eq!(result.iterations, 917);
        assert!(result.final_temperature <= config.min_temperature);
    }

    #[test]
    fn test_sa_respects_iteration_cap() {
        let config = SaConfig::plateau().with_max_iterations(500).with_seed(1);
        let result = annealer(config).run(0);
        assert_eq!(result.iterations, 500);
        assert!(result.final_temperature > 1e-3);
    }

    #[test]
    fn test_sa_hot_accepts_worsening() {
        let config = SaConfig::default()
            .with_initial_temperature(1e6)
            .with_min_temperature(1e5)
            .with_steps_per_temperature(50)
            .with_seed(5);
        let result = annealer(config).run(37);
        // far above the scale of any delta, so most worsening moves are taken
        assert!(result.accepted_moves > result.iterations / 2);
        assert!(result.accepted_moves > result.improving_moves);
        assert_eq!(result.best, 37);
    }

    #[test]
    fn test_sa_history_non_increasing() {
        let config = SaConfig::default()
            .with_steps_per_temperature(50)
            .with_seed(11);
        let result = annealer(config).run(90);
        for window in result.fitness_history.windows(2) {
            assert!(window[1] <= window[0], "{} -> {}", window[0], window[1]);
        }
    }

    #[test]
    fn test_sa_cancelled() {
        let flag = Arc::new(AtomicBool::new(true));
        let result = annealer(SaConfig::default()).run_with_cancel(5, Some(flag));
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best, 5);
    }

    #[test]
    fn test_sa_rejects_bad_config() {
        let result = SimulatedAnnealing::<i64, _, _, _>::new(
            PassThroughDecoder,
            ObjectiveEvaluator::minimize(squared),
            RandomStep,
            SaConfig::default().with_cooling_ratio(1.0),
        );
        assert!(result.is_err());
    }
}
