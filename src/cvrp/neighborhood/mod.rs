//! CVRP neighborhood operators.
//!
//! Every operator enumerates its moves lazily and only yields candidates
//! that keep the customer partition intact and respect vehicle capacity.
//! Each also implements [`NeighborGenerator`] for single random proposals
//! as used by simulated annealing.

mod merge;
mod relocate;
mod swap;

pub use merge::MergeRoutes;
pub use relocate::ChangeStationRoute;
pub use swap::SwapStations;

use super::{CvrpProblem, RoutesSolution};
use crate::framework::{NeighborGenerator, Neighborhood};
use std::sync::Arc;

/// Sampling attempts before a generator reports that it found no feasible move.
const MAX_ATTEMPTS: usize = 32;

/// Indices of routes with at least one customer.
fn occupied_routes(solution: &RoutesSolution) -> Vec<usize> {
    (0..solution.route_count())
        .filter(|&i| !solution.route(i).is_empty())
        .collect()
}

/// Merge, relocate and swap, in the order VND explores them.
pub fn standard_neighborhoods(
    problem: &Arc<CvrpProblem>,
) -> Vec<Box<dyn Neighborhood<RoutesSolution>>> {
    vec![
        Box::new(MergeRoutes::new(Arc::clone(problem))),
        Box::new(ChangeStationRoute::new(Arc::clone(problem))),
        Box::new(SwapStations::new(Arc::clone(problem))),
    ]
}

/// Swap, relocate and merge proposal generators for annealing.
pub fn standard_generators(
    problem: &Arc<CvrpProblem>,
) -> Vec<Box<dyn NeighborGenerator<RoutesSolution>>> {
    vec![
        Box::new(SwapStations::new(Arc::clone(problem))),
        Box::new(ChangeStationRoute::new(Arc::clone(problem))),
        Box::new(MergeRoutes::new(Arc::clone(problem))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn instance() -> impl Strategy<Value = Arc<CvrpProblem>> {
        (2usize..8)
            .prop_flat_map(|n| {
                (
                    prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), n + 1),
                    prop::collection::vec(1u32..=5, n),
                    5u32..=12,
                )
            })
            .prop_map(|(coords, demand, capacity)| {
                let mut d = vec![0.0];
                d.extend(demand.into_iter().map(f64::from));
                Arc::new(CvrpProblem::from_coordinates(&coords, d, f64::from(capacity)).unwrap())
            })
    }

    /// Walks a few random moves away from the singleton start.
    fn scrambled(problem: &Arc<CvrpProblem>, seed: u64, steps: usize) -> RoutesSolution {
        let generators = standard_generators(problem);
        let mut rng = create_rng(seed);
        let mut solution = RoutesSolution::singletons(problem);
        for i in 0..steps {
            if let Some(next) = generators[i % generators.len()].generate(&solution, &mut rng) {
                solution = next;
            }
        }
        solution
    }

    #[test]
    fn test_standard_order() {
        let p = Arc::new(
            CvrpProblem::from_coordinates(&[(0.0, 0.0), (1.0, 1.0)], vec![0.0, 1.0], 1.0)
                .unwrap(),
        );
        let names: Vec<_> = standard_neighborhoods(&p)
            .iter()
            .map(|n| n.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["merge-routes", "change-station-route", "swap-stations"]
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_neighbors_preserve_invariants(
            problem in instance(),
            seed in any::<u64>(),
            steps in 0usize..12,
        ) {
            let base = scrambled(&problem, seed, steps);
            prop_assert!(base.validate(&problem).is_ok());
            for op in standard_neighborhoods(&problem) {
                for candidate in op.neighbors(&base) {
                    prop_assert_eq!(candidate.validate(&problem), Ok(()), "operator {}", op.name());
                }
            }
        }

        #[test]
        fn prop_generated_moves_preserve_invariants(
            problem in instance(),
            seed in any::<u64>(),
        ) {
            let base = scrambled(&problem, seed, 6);
            let mut rng = create_rng(seed ^ 0x5eed);
            for generator in standard_generators(&problem) {
                for _ in 0..8 {
                    if let Some(candidate) = generator.generate(&base, &mut rng) {
                        prop_assert_eq!(candidate.validate(&problem), Ok(()));
                    }
                }
            }
        }

        #[test]
        fn prop_enumeration_leaves_base_untouched(
            problem in instance(),
            seed in any::<u64>(),
        ) {
            let base = scrambled(&problem, seed, 5);
            let before = base.clone();
            for op in standard_neighborhoods(&problem) {
                let _ = op.neighbors(&base).count();
            }
            prop_assert_eq!(base, before);
        }
    }
}
