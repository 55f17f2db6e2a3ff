//! Route merge operator.
//!
//! Concatenates one route onto another when the combined demand fits in a
//! vehicle. Every ordered pair of distinct non-empty routes is considered,
//! so both orientations `a + b` and `b + a` are proposed. The merged route
//! takes the slot of the first route and the second route is dropped.
//!
//! Length delta: `d(last_a, first_b) - d(last_a, depot) - d(depot, first_b)`.

use super::{occupied_routes, MAX_ATTEMPTS};
use crate::cvrp::{CvrpProblem, RoutesSolution};
use crate::framework::{NeighborGenerator, Neighborhood};
use rand::seq::index;
use rand::RngCore;
use std::sync::Arc;

/// Merges pairs of routes.
#[derive(Debug, Clone)]
pub struct MergeRoutes {
    problem: Arc<CvrpProblem>,
}

impl MergeRoutes {
    /// Creates the operator for `problem`.
    pub fn new(problem: Arc<CvrpProblem>) -> Self {
        Self { problem }
    }

    fn feasible(&self, base: &RoutesSolution, into: usize, from: usize) -> bool {
        let (a, b) = (base.route(into), base.route(from));
        into != from
            && !a.is_empty()
            && !b.is_empty()
            && self.problem.fits(a.demand() + b.demand())
    }
}

impl Neighborhood<RoutesSolution> for MergeRoutes {
    fn name(&self) -> &str {
        "merge-routes"
    }

    fn neighbors<'a>(
        &'a self,
        base: &'a RoutesSolution,
    ) -> Box<dyn Iterator<Item = RoutesSolution> + 'a> {
        let problem: &'a CvrpProblem = &self.problem;
        let n = base.route_count();
        Box::new(
            (0..n)
                .flat_map(move |into| (0..n).map(move |from| (into, from)))
                .filter(move |&(into, from)| self.feasible(base, into, from))
                .map(move |(into, from)| base.merged(problem, into, from)),
        )
    }
}

impl NeighborGenerator<RoutesSolution> for MergeRoutes {
    fn generate(&self, base: &RoutesSolution, rng: &mut dyn RngCore) -> Option<RoutesSolution> {
        let occupied = occupied_routes(base);
        if occupied.len() < 2 {
            return None;
        }
        for _ in 0..MAX_ATTEMPTS {
            let pick = index::sample(rng, occupied.len(), 2);
            let (into, from) = (occupied[pick.index(0)], occupied[pick.index(1)]);
            if self.feasible(base, into, from) {
                return Some(base.merged(&self.problem, into, from));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn problem(capacity: f64) -> Arc<CvrpProblem> {
        let coords = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 3.0)];
        Arc::new(
            CvrpProblem::from_coordinates(&coords, vec![0.0, 1.0, 1.0, 1.0], capacity).unwrap(),
        )
    }

    #[test]
    fn test_enumerates_ordered_pairs() {
        let p = problem(2.0);
        let op = MergeRoutes::new(p.clone());
        let base = RoutesSolution::singletons(&p);
        let all: Vec<_> = op.neighbors(&base).collect();
        // 3 routes -> 6 ordered pairs, all feasible with capacity 2
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].route(0).customers(), &[1, 2]);
        assert_eq!(all[1].route(0).customers(), &[1, 3]);
        assert_eq!(all[2].route(0).customers(), &[2, 1]);
        for n in &all {
            assert_eq!(n.route_count(), 2);
            assert!(n.validate(&p).is_ok());
        }
    }

    #[test]
    fn test_capacity_filters_merges() {
        let p = problem(2.0);
        let op = MergeRoutes::new(p.clone());
        let base = RoutesSolution::singletons(&p).merged(&p, 0, 1);
        // [1,2] is full, so nothing can be merged with it
        assert_eq!(op.neighbors(&base).count(), 0);
    }

    #[test]
    fn test_skips_empty_routes() {
        let p = problem(3.0);
        let op = MergeRoutes::new(p.clone());
        let base = RoutesSolution::singletons(&p).relocated(&p, 0, 0, 1, 0);
        assert!(base.route(0).is_empty());
        for n in op.neighbors(&base) {
            assert!(n.validate(&p).is_ok());
        }
        assert_eq!(op.neighbors(&base).count(), 2);
    }

    #[test]
    fn test_generate_is_feasible() {
        let p = problem(2.0);
        let op = MergeRoutes::new(p.clone());
        let base = RoutesSolution::singletons(&p);
        let mut rng = create_rng(3);
        for _ in 0..20 {
            let n = op.generate(&base, &mut rng).expect("merge available");
            assert_eq!(n.route_count(), 2);
            assert!(n.validate(&p).is_ok());
        }
        let full = base.merged(&p, 0, 1);
        assert!(op.generate(&full, &mut rng).is_none());
    }
}
