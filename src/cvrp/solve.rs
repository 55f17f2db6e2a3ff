//! Ready-made CVRP runs.
//!
//! Each facade starts from one singleton route per customer, runs an
//! engine over the standard operators minimizing total length, validates
//! the partition and capacity invariants of the returned solutions, and
//! finally drops empty routes.

use super::neighborhood::{standard_generators, standard_neighborhoods};
use super::{CvrpProblem, RoutesSolution};
use crate::error::SolveError;
use crate::framework::{neighbor_selection, ObjectiveEvaluator, PassThroughDecoder};
use crate::isvnd::{IsVnd, IsVndConfig, IsVndResult, IsVndStrategies};
use crate::sa::{CompositeNeighborhood, RepeatNeighborhood, SaConfig, SaResult, SimulatedAnnealing};
use crate::strategy::{Algorithm, StrategyKind};
use crate::vnd::{Vnd, VndConfig, VndResult};
use std::sync::Arc;

/// Total route length, minimized.
pub type LengthEvaluator = ObjectiveEvaluator<fn(&RoutesSolution) -> f64>;

/// The objective all facades optimize.
pub fn length_evaluator() -> LengthEvaluator {
    ObjectiveEvaluator::minimize(RoutesSolution::length as fn(&RoutesSolution) -> f64)
}

/// Validates `solution` and prunes its empty routes.
fn finish(problem: &CvrpProblem, solution: &mut RoutesSolution) -> Result<(), SolveError> {
    solution.validate(problem)?;
    solution.remove_empty_routes();
    Ok(())
}

/// Variable neighborhood descent with the given neighbor selection.
///
/// # Examples
///
/// ```
/// use cvrp_metaheur::cvrp::{solve_vnd, CvrpProblem};
/// use cvrp_metaheur::strategy::StrategyKind;
/// use cvrp_metaheur::vnd::VndConfig;
/// use std::sync::Arc;
///
/// let problem = Arc::new(
///     CvrpProblem::from_coordinates(
///         &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 5.0)],
///         vec![0.0, 1.0, 1.0, 1.0],
///         2.0,
///     )
///     .unwrap(),
/// );
/// let result = solve_vnd(&problem, StrategyKind::Best, VndConfig::default()).unwrap();
/// assert_eq!(result.best.route_count(), 2);
/// ```
pub fn solve_vnd(
    problem: &Arc<CvrpProblem>,
    selection: StrategyKind,
    config: VndConfig,
) -> Result<VndResult<RoutesSolution>, SolveError> {
    let vnd = Vnd::new(
        PassThroughDecoder,
        length_evaluator(),
        standard_neighborhoods(problem),
        neighbor_selection(selection),
        config,
    )?;
    let mut result = vnd.run(RoutesSolution::singletons(problem));
    finish(problem, &mut result.best)?;
    Ok(result)
}

/// Population-based parallel VND; `variant` picks population selection
/// and maintenance together.
///
/// Every admitted candidate is validated before it enters the population.
pub fn solve_isvnd(
    problem: &Arc<CvrpProblem>,
    variant: StrategyKind,
    config: IsVndConfig,
) -> Result<IsVndResult<RoutesSolution>, SolveError> {
    let checked = Arc::clone(problem);
    let engine = IsVnd::new(
        PassThroughDecoder,
        length_evaluator(),
        standard_neighborhoods(problem),
        IsVndStrategies::from_kind(variant),
        config,
    )?
    .with_invariant(move |s: &RoutesSolution| s.validate(&checked));
    let mut result = engine.run(|| RoutesSolution::singletons(problem))?;
    finish(problem, &mut result.best)?;
    Ok(result)
}

/// Simulated annealing over swap, relocate and merge proposals, each step
/// occasionally chaining two moves.
pub fn solve_sa(
    problem: &Arc<CvrpProblem>,
    config: SaConfig,
) -> Result<SaResult<RoutesSolution>, SolveError> {
    let composite = CompositeNeighborhood::new(standard_generators(problem))?;
    let neighborhood = RepeatNeighborhood::new(composite, config.repeat_probability)?;
    let sa = SimulatedAnnealing::new(PassThroughDecoder, length_evaluator(), neighborhood, config)?;
    let mut result = sa.run(RoutesSolution::singletons(problem));
    finish(problem, &mut result.best)?;
    finish(problem, &mut result.final_solution)?;
    Ok(result)
}

/// Runs `algorithm` with default settings and returns the best solution.
///
/// `variant` is ignored by simulated annealing.
pub fn solve(
    problem: &Arc<CvrpProblem>,
    algorithm: Algorithm,
    variant: StrategyKind,
    seed: Option<u64>,
) -> Result<RoutesSolution, SolveError> {
    let solution = match algorithm {
        Algorithm::Vnd => {
            let mut config = VndConfig::default();
            config.seed = seed;
            solve_vnd(problem, variant, config)?.best
        }
        Algorithm::IsVnd => {
            let mut config = IsVndConfig::default();
            config.seed = seed;
            solve_isvnd(problem, variant, config)?.best
        }
        Algorithm::Sa => {
            let mut config = SaConfig::default();
            config.seed = seed;
            solve_sa(problem, config)?.best
        }
    };
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use rand::Rng;

    /// Depot in the middle of a unit square, one customer per corner.
    fn unit_square() -> Arc<CvrpProblem> {
        let coords = [(0.5, 0.5), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        Arc::new(CvrpProblem::from_coordinates(&coords, vec![0.0, 1.0, 1.0, 1.0, 1.0], 2.0).unwrap())
    }

    fn random_instance(customers: usize, seed: u64) -> Arc<CvrpProblem> {
        let mut rng = create_rng(seed);
        let coords: Vec<(f64, f64)> = (0..=customers)
            .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        let mut demand = vec![0.0];
        demand.extend((0..customers).map(|_| f64::from(rng.random_range(1u32..=9))));
        Arc::new(CvrpProblem::from_coordinates(&coords, demand, 30.0).unwrap())
    }

    fn assert_adjacent_pairs(problem: &CvrpProblem, solution: &RoutesSolution) {
        assert_eq!(solution.route_count(), 2, "{solution}");
        for route in solution.routes() {
            assert_eq!(route.len(), 2, "{solution}");
            let d = problem.distance(route.customer(0), route.customer(1));
            assert!((d - 1.0).abs() < 1e-12, "diagonal pair in {solution}");
        }
    }

    #[test]
    fn test_unit_square_vnd_pairs_adjacent_corners() {
        let problem = unit_square();
        let initial = RoutesSolution::singletons(&problem).length();
        assert!((initial - 8.0 * 0.5f64.sqrt()).abs() < 1e-12);

        for kind in StrategyKind::ALL {
            let result = solve_vnd(&problem, kind, VndConfig::default()).unwrap();
            assert_adjacent_pairs(&problem, &result.best);
            assert!(result.best.length() < initial);
            assert!((result.best.length() - (2.0 + 4.0 * 0.5f64.sqrt())).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unit_square_isvnd_not_worse_than_vnd() {
        let problem = unit_square();
        let vnd = solve_vnd(&problem, StrategyKind::Best, VndConfig::default()).unwrap();
        let config = IsVndConfig::default().with_population_size(3).with_workers(2);
        let isvnd = solve_isvnd(&problem, StrategyKind::Best, config).unwrap();
        assert!(isvnd.converged);
        assert_eq!(isvnd.population_fitness.len(), 3);
        assert!(isvnd.best.length() <= vnd.best.length() + 1e-9);
        assert_adjacent_pairs(&problem, &isvnd.best);
    }

    #[test]
    fn test_isvnd_variants_and_sizes_on_random_instance() {
        let problem = random_instance(12, 5);
        let initial = RoutesSolution::singletons(&problem).length();
        for kind in StrategyKind::ALL {
            for size in [2usize, 3, 5] {
                let config = IsVndConfig::default()
                    .with_population_size(size)
                    .with_workers(3)
                    .with_seed(17);
                let result = solve_isvnd(&problem, kind, config).unwrap();
                assert_eq!(result.population_fitness.len(), size);
                assert!(result.best.length() <= initial);
                assert!(result.best.validate(&problem).is_ok());
            }
        }
    }

    #[test]
    fn test_vnd_monotone_on_random_instance() {
        let problem = random_instance(20, 9);
        let initial = RoutesSolution::singletons(&problem).length();
        let config = VndConfig::default().with_shuffle_neighborhoods(true).with_seed(3);
        let result = solve_vnd(&problem, StrategyKind::First, config).unwrap();
        assert!(result.best.length() < initial);
        assert_eq!(result.best.non_empty_route_count(), result.best.route_count());
        for window in result.fitness_history.windows(2) {
            assert!(window[1] < window[0]);
        }
    }

    #[test]
    fn test_vnd_deterministic() {
        let problem = random_instance(15, 21);
        let run = || {
            solve_vnd(&problem, StrategyKind::Random, VndConfig::default().with_seed(8))
                .unwrap()
                .best
        };
        let (a, b) = (run(), run());
        assert_eq!(a.to_sequences(), b.to_sequences());
        assert_eq!(a.length().to_bits(), b.length().to_bits());
    }

    #[test]
    fn test_sa_valid_and_deterministic() {
        let problem = random_instance(15, 33);
        let initial = RoutesSolution::singletons(&problem).length();
        let config = SaConfig::default().with_steps_per_temperature(20).with_seed(4);
        let a = solve_sa(&problem, config.clone()).unwrap();
        let b = solve_sa(&problem, config).unwrap();
        assert_eq!(a.best.to_sequences(), b.best.to_sequences());
        assert_eq!(a.final_solution.to_sequences(), b.final_solution.to_sequences());
        assert!(a.best.length() < initial);
        assert!(a.best.validate(&problem).is_ok());
        assert!(a.final_solution.validate(&problem).is_ok());
    }

    #[test]
    fn test_solve_dispatch() {
        let problem = unit_square();
        for algorithm in [Algorithm::Vnd, Algorithm::IsVnd, Algorithm::Sa] {
            let solution = solve(&problem, algorithm, StrategyKind::Best, Some(1)).unwrap();
            assert!(solution.validate(&problem).is_ok());
            assert!(solution.routes().all(|r| !r.is_empty()));
        }
    }

    #[test]
    fn test_bad_config_fails_before_search() {
        let problem = unit_square();
        let err = solve_isvnd(
            &problem,
            StrategyKind::Best,
            IsVndConfig::default().with_population_size(1),
        )
        .unwrap_err();
        assert!(matches!(err, SolveError::Config(_)));

        let err = solve_sa(&problem, SaConfig::default().with_repeat_probability(2.0)).unwrap_err();
        assert!(matches!(err, SolveError::Config(_)));
    }
}
