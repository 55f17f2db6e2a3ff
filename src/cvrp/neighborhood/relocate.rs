//! Customer relocation operator.
//!
//! Takes one customer out of its route and inserts it at any position of
//! any other route whose residual capacity can absorb the demand, or at
//! another position of its own route. Enumeration skips intra-route moves
//! that reproduce the base solution or duplicate an adjacent exchange.
//!
//! Random proposals may also open a fresh route for the customer when its
//! current route serves at least two customers.

use super::{occupied_routes, MAX_ATTEMPTS};
use crate::cvrp::{CvrpProblem, RoutesSolution};
use crate::framework::{NeighborGenerator, Neighborhood};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Moves single customers between and within routes.
#[derive(Debug, Clone)]
pub struct ChangeStationRoute {
    problem: Arc<CvrpProblem>,
}

impl ChangeStationRoute {
    /// Creates the operator for `problem`.
    pub fn new(problem: Arc<CvrpProblem>) -> Self {
        Self { problem }
    }

    /// Number of insertion slots in route `to` for the customer at (`from`, `pos`).
    fn slots(&self, base: &RoutesSolution, from: usize, pos: usize, to: usize) -> usize {
        let target = base.route(to);
        if to == from {
            // positions in the route once the customer is taken out
            if target.len() >= 2 {
                target.len()
            } else {
                0
            }
        } else {
            let load = self.problem.demand(base.route(from).customer(pos));
            if self.problem.fits(target.demand() + load) {
                target.len() + 1
            } else {
                0
            }
        }
    }
}

/// Intra-route moves to `q == pos` are the identity and `q + 1 == pos`
/// equals the move of the predecessor one step forward.
#[inline]
fn distinct_move(from: usize, pos: usize, to: usize, q: usize) -> bool {
    to != from || (q != pos && q + 1 != pos)
}

impl Neighborhood<RoutesSolution> for ChangeStationRoute {
    fn name(&self) -> &str {
        "change-station-route"
    }

    fn neighbors<'a>(
        &'a self,
        base: &'a RoutesSolution,
    ) -> Box<dyn Iterator<Item = RoutesSolution> + 'a> {
        let problem: &'a CvrpProblem = &self.problem;
        let n = base.route_count();
        Box::new(
            (0..n)
                .flat_map(move |from| {
                    (0..base.route(from).len()).flat_map(move |pos| {
                        (0..n).flat_map(move |to| {
                            (0..self.slots(base, from, pos, to))
                                .filter(move |&q| distinct_move(from, pos, to, q))
                                .map(move |q| (from, pos, to, q))
                        })
                    })
                })
                .map(move |(from, pos, to, q)| base.relocated(problem, from, pos, to, q)),
        )
    }
}

impl NeighborGenerator<RoutesSolution> for ChangeStationRoute {
    fn generate(&self, base: &RoutesSolution, rng: &mut dyn RngCore) -> Option<RoutesSolution> {
        let occupied = occupied_routes(base);
        if occupied.is_empty() {
            return None;
        }
        let n = base.route_count();
        for _ in 0..MAX_ATTEMPTS {
            let from = occupied[rng.random_range(0..occupied.len())];
            let len = base.route(from).len();
            let pos = rng.random_range(0..len);
            // `n` stands for a new route
            let to = rng.random_range(0..=n);
            if to == n {
                if len < 2 {
                    continue;
                }
                return Some(base.relocated(&self.problem, from, pos, n, 0));
            }
            let slots = self.slots(base, from, pos, to);
            if slots == 0 {
                continue;
            }
            let q = rng.random_range(0..slots);
            if to == from && q == pos {
                continue;
            }
            return Some(base.relocated(&self.problem, from, pos, to, q));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn line(capacity: f64) -> Arc<CvrpProblem> {
        let coords: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 0.0)).collect();
        Arc::new(
            CvrpProblem::from_coordinates(&coords, vec![0.0, 1.0, 1.0, 1.0, 1.0], capacity)
                .unwrap(),
        )
    }

    #[test]
    fn test_counts_between_routes() {
        let p = line(2.0);
        let op = ChangeStationRoute::new(p.clone());
        let base = RoutesSolution::singletons(&p);
        // each of 4 customers can go before or after each of the 3 others
        let all: Vec<_> = op.neighbors(&base).collect();
        assert_eq!(all.len(), 4 * 3 * 2);
        for s in &all {
            assert!(s.validate(&p).is_ok());
            assert_eq!(s.non_empty_route_count(), 3);
        }
    }

    #[test]
    fn test_respects_capacity() {
        let p = line(2.0);
        let op = ChangeStationRoute::new(p.clone());
        // [[1,2],[3],[4]]
        let base = RoutesSolution::singletons(&p).merged(&p, 0, 1);
        for s in op.neighbors(&base) {
            assert!(s.validate(&p).is_ok());
            assert!(s.routes().all(|r| r.demand() <= 2.0));
        }
        // into [1,2]: none; from [1,2] into [3] or [4]: 2*2*2; [3]<->[4]: 2*2;
        // intra [1,2]: one reversal
        assert_eq!(op.neighbors(&base).count(), 8 + 4 + 1);
    }

    #[test]
    fn test_intra_route_moves_are_distinct() {
        let p = line(4.0);
        let op = ChangeStationRoute::new(p.clone());
        let mut base = RoutesSolution::new();
        base.push(crate::cvrp::Route::from_customers(&p, vec![1, 2, 3, 4]));
        let seqs: Vec<_> = op.neighbors(&base).map(|s| s.to_sequences()).collect();
        let mut unique = seqs.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(seqs.len(), unique.len());
        assert!(!seqs.contains(&base.to_sequences()));
        // (n-1)^2 distinct single-customer moves of a 4-sequence
        assert_eq!(seqs.len(), 9);
    }

    #[test]
    fn test_generate_is_feasible_and_changes_solution() {
        let p = line(3.0);
        let op = ChangeStationRoute::new(p.clone());
        let base = RoutesSolution::singletons(&p).merged(&p, 0, 1);
        let mut rng = create_rng(11);
        for _ in 0..50 {
            if let Some(s) = op.generate(&base, &mut rng) {
                assert!(s.validate(&p).is_ok());
                assert_ne!(s.to_sequences(), base.to_sequences());
            }
        }
    }
}
