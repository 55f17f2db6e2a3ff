//! Customer exchange operator.
//!
//! Exchanges two customers. Between routes both resulting loads must fit;
//! within a route only the visiting order changes, so capacity is untouched.
//! Each unordered pair of positions is proposed once.

use super::{occupied_routes, MAX_ATTEMPTS};
use crate::cvrp::{CvrpProblem, RoutesSolution};
use crate::framework::{NeighborGenerator, Neighborhood};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Swaps pairs of customers.
#[derive(Debug, Clone)]
pub struct SwapStations {
    problem: Arc<CvrpProblem>,
}

impl SwapStations {
    /// Creates the operator for `problem`.
    pub fn new(problem: Arc<CvrpProblem>) -> Self {
        Self { problem }
    }

    fn feasible(&self, base: &RoutesSolution, r1: usize, p1: usize, r2: usize, p2: usize) -> bool {
        if r1 == r2 {
            return p1 != p2;
        }
        let (a, b) = (base.route(r1), base.route(r2));
        let (da, db) = (
            self.problem.demand(a.customer(p1)),
            self.problem.demand(b.customer(p2)),
        );
        self.problem.fits(a.demand() - da + db) && self.problem.fits(b.demand() - db + da)
    }
}

impl Neighborhood<RoutesSolution> for SwapStations {
    fn name(&self) -> &str {
        "swap-stations"
    }

    fn neighbors<'a>(
        &'a self,
        base: &'a RoutesSolution,
    ) -> Box<dyn Iterator<Item = RoutesSolution> + 'a> {
        let problem: &'a CvrpProblem = &self.problem;
        let n = base.route_count();
        Box::new(
            (0..n)
                .flat_map(move |r1| {
                    (r1..n).flat_map(move |r2| {
                        (0..base.route(r1).len()).flat_map(move |p1| {
                            let start = if r1 == r2 { p1 + 1 } else { 0 };
                            (start..base.route(r2).len()).map(move |p2| (r1, p1, r2, p2))
                        })
                    })
                })
                .filter(move |&(r1, p1, r2, p2)| self.feasible(base, r1, p1, r2, p2))
                .map(move |(r1, p1, r2, p2)| base.swapped(problem, r1, p1, r2, p2)),
        )
    }
}

impl NeighborGenerator<RoutesSolution> for SwapStations {
    fn generate(&self, base: &RoutesSolution, rng: &mut dyn RngCore) -> Option<RoutesSolution> {
        let occupied = occupied_routes(base);
        let customers: usize = occupied.iter().map(|&r| base.route(r).len()).sum();
        if customers < 2 {
            return None;
        }
        for _ in 0..MAX_ATTEMPTS {
            let r1 = occupied[rng.random_range(0..occupied.len())];
            let r2 = occupied[rng.random_range(0..occupied.len())];
            let p1 = rng.random_range(0..base.route(r1).len());
            let p2 = rng.random_range(0..base.route(r2).len());
            if self.feasible(base, r1, p1, r2, p2) {
                return Some(base.swapped(&self.problem, r1, p1, r2, p2));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cvrp::Route;
    use crate::random::create_rng;

    fn problem() -> Arc<CvrpProblem> {
        let coords = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0), (0.0, 2.0)];
        Arc::new(
            CvrpProblem::from_coordinates(&coords, vec![0.0, 1.0, 2.0, 1.0, 1.5], 3.0).unwrap(),
        )
    }

    #[test]
    fn test_enumeration_counts() {
        let p = problem();
        let op = SwapStations::new(p.clone());
        let mut base = RoutesSolution::new();
        base.push(Route::from_customers(&p, vec![1, 2]));
        base.push(Route::from_customers(&p, vec![3, 4]));
        // intra: one pair per route; inter: 2 <-> 3 and 1 <-> 4 overload a route
        let all: Vec<_> = op.neighbors(&base).collect();
        assert_eq!(all.len(), 2 + 2);
        for s in &all {
            assert!(s.validate(&p).is_ok());
        }
    }

    #[test]
    fn test_swap_keeps_route_count() {
        let p = problem();
        let op = SwapStations::new(p.clone());
        let base = RoutesSolution::singletons(&p);
        let all: Vec<_> = op.neighbors(&base).collect();
        // 4 singletons -> 6 unordered pairs, all feasible
        assert_eq!(all.len(), 6);
        assert!(all.iter().all(|s| s.route_count() == 4));
    }

    #[test]
    fn test_generate() {
        let p = problem();
        let op = SwapStations::new(p.clone());
        let mut base = RoutesSolution::new();
        base.push(Route::from_customers(&p, vec![1, 2]));
        base.push(Route::from_customers(&p, vec![3, 4]));
        let mut rng = create_rng(5);
        for _ in 0..50 {
            let s = op.generate(&base, &mut rng).expect("swap available");
            assert!(s.validate(&p).is_ok());
        }

        let mut lone = RoutesSolution::new();
        lone.push(Route::singleton(&p, 1));
        assert!(op.generate(&lone, &mut rng).is_none());
    }
}
