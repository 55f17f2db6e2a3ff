//! IS-VND execution engine.
//!
//! # Algorithm
//!
//! 1. Fill the population with P initial solutions
//! 2. Each round:
//!    a. Population selection picks the members to explore and their
//!       solutions are snapshotted
//!    b. One task per (member, neighborhood) pair enumerates the member's
//!       neighbors on the worker pool
//!    c. Every candidate passing the acceptance test is offered to
//!       maintenance, one commit at a time
//!    d. The round ends when every task has finished
//! 3. Stop after a round without commits and return the final selection

use super::config::IsVndConfig;
use super::population::{Member, Population, SharedPopulation};
use super::strategies::IsVndStrategies;
use crate::error::{ConfigError, SearchError};
use crate::framework::{Decoder, FitnessEvaluator, Neighborhood};
use crate::random::{create_rng, derive_seed, DEFAULT_SEED};
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Check run on every candidate before it is committed.
pub type InvariantCheck<E> = Box<dyn Fn(&E) -> Result<(), SearchError> + Send + Sync>;

/// Result of an IS-VND run.
#[derive(Debug, Clone)]
pub struct IsVndResult<S: Clone> {
    /// The member chosen by the final selection.
    pub best: S,
    /// Fitness of `best`.
    pub best_fitness: f64,
    /// Number of rounds executed.
    pub rounds: usize,
    /// Total commits that changed the population.
    pub commits: usize,
    /// Number of candidates evaluated.
    pub evaluations: usize,
    /// `true` if the last round produced no commit.
    pub converged: bool,
    /// Whether the run was cancelled externally.
    pub cancelled: bool,
    /// Fitness of every member of the final population.
    pub population_fitness: Vec<f64>,
    /// Best population fitness after each round, starting with the initial one.
    pub fitness_history: Vec<f64>,
}

/// Parallel population-based variable neighborhood descent.
pub struct IsVnd<E, D, F> {
    decoder: D,
    evaluator: F,
    neighborhoods: Vec<Box<dyn Neighborhood<E>>>,
    strategies: IsVndStrategies<E>,
    invariant: Option<InvariantCheck<E>>,
    pool: Arc<ThreadPool>,
    config: IsVndConfig,
}

impl<E, D, F> IsVnd<E, D, F>
where
    E: Clone + Send + Sync,
    D: Decoder<E>,
    F: FitnessEvaluator<D::Decoded>,
{
    /// Assembles the engine and builds a worker pool of `config.workers` threads.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoNeighborhoods`] for an empty operator list, the error
    /// reported by [`IsVndConfig::validate`], or [`ConfigError::WorkerPool`]
    /// if the pool cannot be created.
    pub fn new(
        decoder: D,
        evaluator: F,
        neighborhoods: Vec<Box<dyn Neighborhood<E>>>,
        strategies: IsVndStrategies<E>,
        config: IsVndConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if neighborhoods.is_empty() {
            return Err(ConfigError::NoNeighborhoods);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("isvnd-worker-{i}"))
            .build()
            .map_err(|e| ConfigError::WorkerPool(e.to_string()))?;
        Ok(Self {
            decoder,
            evaluator,
            neighborhoods,
            strategies,
            invariant: None,
            pool: Arc::new(pool),
            config,
        })
    }

    /// Runs tasks on an existing pool instead of the engine's own.
    pub fn with_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.pool = pool;
        self
    }

    /// Verifies every admitted candidate with `check` before committing it.
    pub fn with_invariant(
        mut self,
        check: impl Fn(&E) -> Result<(), SearchError> + Send + Sync + 'static,
    ) -> Self {
        self.invariant = Some(Box::new(check));
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &IsVndConfig {
        &self.config
    }

    /// Fitness of a candidate after decoding.
    pub fn fitness(&self, candidate: &E) -> f64 {
        self.evaluator.evaluate(&self.decoder.decode(candidate))
    }

    /// Runs until convergence, filling the population from `initial`.
    pub fn run(&self, initial: impl FnMut() -> E) -> Result<IsVndResult<E>, SearchError> {
        self.run_with_cancel(initial, None)
    }

    /// Runs with an optional cancellation token, checked between rounds.
    ///
    /// # Errors
    ///
    /// Any [`SearchError`] raised by the invariant check or by a commit
    /// that changed the population size. The run stops at the first one.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run_with_cancel(
        &self,
        mut initial: impl FnMut() -> E,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<IsVndResult<E>, SearchError> {
        let started = Instant::now();
        let mut rng = create_rng(self.config.seed.unwrap_or(DEFAULT_SEED));
        let direction = self.evaluator.direction();

        let seeds: Vec<Member<E>> = (0..self.config.population_size)
            .map(|_| {
                let solution = initial();
                let fitness = self.fitness(&solution);
                Member::seeded(solution, fitness)
            })
            .collect();
        let population = SharedPopulation::new(Population::new(seeds), direction)?;

        let selection_size = self.config.effective_selection_size();
        let mut order: Vec<usize> = (0..self.neighborhoods.len()).collect();
        let evaluations = AtomicUsize::new(0);
        let mut fitness_history = vec![population.peek().best];
        let mut total_commits = 0usize;
        let mut rounds = 0usize;
        let mut converged = false;
        let mut cancelled = false;

        loop {
            if self.config.max_rounds > 0 && rounds >= self.config.max_rounds {
                break;
            }
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }

            let bases = population.snapshot_with(|p| {
                self.strategies
                    .selection
                    .select(p, selection_size, direction, &mut rng)
            });
            if self.config.shuffle_neighborhoods {
                order.shuffle(&mut rng);
            }
            let tasks: Vec<(usize, usize)> = (0..bases.len())
                .flat_map(|b| order.iter().map(move |&k| (b, k)))
                .collect();
            let round_seed: u64 = rng.random();
            let commits = AtomicUsize::new(0);

            self.pool.install(|| {
                tasks
                    .par_iter()
                    .enumerate()
                    .try_for_each(|(i, &(b, k))| -> Result<(), SearchError> {
                        let mut task_rng = create_rng(derive_seed(round_seed, i as u64));
                        for candidate in self.neighborhoods[k].neighbors(&bases[b].solution) {
                            let fitness = self.fitness(&candidate);
                            evaluations.fetch_add(1, Ordering::Relaxed);
                            if !self
                                .strategies
                                .acceptance
                                .admits(fitness, population.peek(), direction)
                            {
                                continue;
                            }
                            if let Some(check) = &self.invariant {
                                check(&candidate)?;
                            }
                            let changed = population.try_commit(
                                Member::new(candidate, fitness),
                                &*self.strategies.acceptance,
                                &*self.strategies.maintenance,
                                &mut task_rng,
                            )?;
                            if changed {
                                commits.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                        Ok(())
                    })
            })?;

            rounds += 1;
            let commits = commits.into_inner();
            total_commits += commits;
            let best = population.peek().best;
            fitness_history.push(best);
            debug!(round = rounds, commits, best, "isvnd round finished");

            if commits == 0 {
                converged = true;
                break;
            }
        }

        let population = population.into_inner();
        let population_fitness = population.fitnesses();
        let chosen = self
            .strategies
            .final_selection
            .choose(&population, direction)
            .ok_or(SearchError::EmptyPopulation)?;

        info!(
            fitness = chosen.fitness,
            rounds,
            commits = total_commits,
            converged,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "isvnd finished"
        );

        Ok(IsVndResult {
            best: chosen.solution.clone(),
            best_fitness: chosen.fitness,
            rounds,
            commits: total_commits,
            evaluations: evaluations.into_inner(),
            converged,
            cancelled,
            population_fitness,
            fitness_history,
        })
    }
}
