//! Multi-route CVRP solution.

use super::problem::CvrpProblem;
use super::route::Route;
use crate::error::SearchError;
use std::fmt;
use std::sync::Arc;

/// Relative tolerance for cached-length checks.
const LENGTH_TOLERANCE: f64 = 1e-6;

/// An ordered collection of routes.
///
/// Routes are shared copy-on-write: deriving a neighbor clones the route
/// handles and deep-copies only the routes the move touches. The total
/// length is cached and adjusted by the per-route deltas.
///
/// # Examples
///
/// ```
/// use cvrp_metaheur::cvrp::{CvrpProblem, RoutesSolution};
///
/// let problem = CvrpProblem::from_coordinates(
///     &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
///     vec![0.0, 1.0, 1.0],
///     2.0,
/// )
/// .unwrap();
/// let solution = RoutesSolution::singletons(&problem);
/// assert_eq!(solution.route_count(), 2);
/// assert!((solution.length() - 4.0).abs() < 1e-12);
/// assert!(solution.validate(&problem).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutesSolution {
    routes: Vec<Arc<Route>>,
    length: f64,
}

impl RoutesSolution {
    /// Creates a solution with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// One singleton route per customer, in index order.
    pub fn singletons(problem: &CvrpProblem) -> Self {
        problem
            .customers()
            .map(|c| Route::singleton(problem, c))
            .collect()
    }

    /// Appends a route.
    pub fn push(&mut self, route: Route) {
        self.length += route.length();
        self.routes.push(Arc::new(route));
    }

    /// Cached total length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of routes, empty ones included.
    #[inline]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Number of routes that visit at least one customer.
    pub fn non_empty_route_count(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Route at index `i`.
    #[inline]
    pub fn route(&self, i: usize) -> &Route {
        &self.routes[i]
    }

    /// Iterates over the routes.
    pub fn routes(&self) -> impl Iterator<Item = &Route> + '_ {
        self.routes.iter().map(|r| r.as_ref())
    }

    /// Drops routes without customers.
    pub fn remove_empty_routes(&mut self) {
        self.routes.retain(|r| !r.is_empty());
    }

    /// Customer sequences of all routes, for comparisons and reporting.
    pub fn to_sequences(&self) -> Vec<Vec<usize>> {
        self.routes.iter().map(|r| r.customers().to_vec()).collect()
    }

    fn route_mut(&mut self, i: usize) -> &mut Route {
        Arc::make_mut(&mut self.routes[i])
    }

    /// Runs `edit` on route `i` and folds its length change into the total.
    fn edit_route<T>(&mut self, i: usize, edit: impl FnOnce(&mut Route) -> T) -> T {
        let route = self.route_mut(i);
        let before = route.length();
        let out = edit(route);
        let after = route.length();
        self.length += after - before;
        out
    }

    /// Neighbor with route `from` appended to route `into`; `from` is dropped.
    pub fn merged(&self, problem: &CvrpProblem, into: usize, from: usize) -> Self {
        debug_assert_ne!(into, from);
        let mut next = self.clone();
        let absorbed = next.routes.remove(from);
        let into = if from < into { into - 1 } else { into };
        next.length -= absorbed.length();
        next.edit_route(into, |r| r.append(problem, &absorbed));
        next
    }

    /// Neighbor with the customer at (`from`, `pos`) moved to (`to`, `to_pos`).
    ///
    /// When `to == from`, `to_pos` indexes the route after removal.
    /// When `to == route_count()`, the customer opens a new route.
    pub fn relocated(
        &self,
        problem: &CvrpProblem,
        from: usize,
        pos: usize,
        to: usize,
        to_pos: usize,
    ) -> Self {
        let mut next = self.clone();
        if to == from {
            next.edit_route(from, |r| r.reposition(problem, pos, to_pos));
            return next;
        }
        let customer = next.edit_route(from, |r| r.remove(problem, pos));
        if to == next.routes.len() {
            next.push(Route::singleton(problem, customer));
        } else {
            next.edit_route(to, |r| r.insert(problem, to_pos, customer));
        }
        next
    }

    /// Neighbor with the customers at (`r1`, `p1`) and (`r2`, `p2`) exchanged.
    pub fn swapped(&self, problem: &CvrpProblem, r1: usize, p1: usize, r2: usize, p2: usize) -> Self {
        let mut next = self.clone();
        if r1 == r2 {
            next.edit_route(r1, |r| r.swap_positions(problem, p1, p2));
            return next;
        }
        let (a, b) = (self.routes[r1].customer(p1), self.routes[r2].customer(p2));
        next.edit_route(r1, |r| r.replace(problem, p1, b));
        next.edit_route(r2, |r| r.replace(problem, p2, a));
        next
    }

    /// Checks the partition, capacity and cached-length invariants.
    pub fn validate(&self, problem: &CvrpProblem) -> Result<(), SearchError> {
        let mut seen = vec![false; problem.dimension()];
        let mut total = 0.0;
        for (i, route) in self.routes.iter().enumerate() {
            for &c in route.customers() {
                if c == 0 || c >= problem.dimension() {
                    return Err(SearchError::UnknownNode(c));
                }
                if std::mem::replace(&mut seen[c], true) {
                    return Err(SearchError::DuplicateCustomer(c));
                }
            }
            let fresh = Route::from_customers(problem, route.customers().to_vec());
            if !problem.fits(fresh.demand()) {
                return Err(SearchError::CapacityExceeded {
                    route: i,
                    demand: fresh.demand(),
                    capacity: problem.capacity(),
                });
            }
            check_length(route.length(), fresh.length())?;
            total += fresh.length();
        }
        if let Some(missing) = problem.customers().find(|&c| !seen[c]) {
            return Err(SearchError::MissingCustomer(missing));
        }
        check_length(self.length, total)
    }
}

fn check_length(cached: f64, actual: f64) -> Result<(), SearchError> {
    if (cached - actual).abs() > LENGTH_TOLERANCE * actual.abs().max(1.0) {
        return Err(SearchError::LengthDrift { cached, actual });
    }
    Ok(())
}

impl FromIterator<Route> for RoutesSolution {
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        let mut solution = RoutesSolution::new();
        for route in iter {
            solution.push(route);
        }
        solution
    }
}

impl fmt::Display for RoutesSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, route) in self.routes.iter().enumerate() {
            writeln!(f, "Route #{}: {}", i + 1, route)?;
        }
        write!(f, "Total length: {:.3}", self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> CvrpProblem {
        let coords: Vec<(f64, f64)> = (0..7).map(|i| (i as f64, (i % 2) as f64)).collect();
        let mut demand = vec![0.0; 7];
        for d in demand.iter_mut().skip(1) {
            *d = 1.0;
        }
        CvrpProblem::from_coordinates(&coords, demand, 3.0).unwrap()
    }

    #[test]
    fn test_singletons_are_valid() {
        let p = line();
        let s = RoutesSolution::singletons(&p);
        assert_eq!(s.route_count(), 6);
        assert!(s.validate(&p).is_ok());
        let expected: f64 = p.customers().map(|c| 2.0 * p.distance(0, c)).sum();
        assert!((s.length() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_merged_drops_route() {
        let p = line();
        let s = RoutesSolution::singletons(&p);
        let m = s.merged(&p, 3, 1);
        assert_eq!(m.route_count(), 5);
        assert_eq!(m.route(2).customers(), &[4, 2]);
        assert!(m.validate(&p).is_ok());
        // base untouched
        assert_eq!(s.route_count(), 6);
        assert!(s.validate(&p).is_ok());
    }

    #[test]
    fn test_relocated_between_and_within() {
        let p = line();
        let s = RoutesSolution::singletons(&p).merged(&p, 0, 1).merged(&p, 0, 1);
        assert_eq!(s.route(0).customers(), &[1, 2, 3]);

        let within = s.relocated(&p, 0, 0, 0, 2);
        assert_eq!(within.route(0).customers(), &[2, 3, 1]);
        assert!(within.validate(&p).is_ok());

        let between = s.relocated(&p, 0, 1, 1, 1);
        assert_eq!(between.route(0).customers(), &[1, 3]);
        assert_eq!(between.route(1).customers(), &[4, 2]);
        assert!(between.validate(&p).is_ok());

        let fresh = s.relocated(&p, 0, 2, s.route_count(), 0);
        assert_eq!(fresh.route_count(), s.route_count() + 1);
        assert!(fresh.validate(&p).is_ok());
    }

    #[test]
    fn test_relocating_last_customer_leaves_empty_route() {
        let p = line();
        let s = RoutesSolution::singletons(&p);
        let moved = s.relocated(&p, 0, 0, 1, 0);
        assert!(moved.route(0).is_empty());
        assert_eq!(moved.non_empty_route_count(), 5);
        assert!(moved.validate(&p).is_ok());

        let mut pruned = moved.clone();
        pruned.remove_empty_routes();
        assert_eq!(pruned.route_count(), 5);
        assert_eq!(pruned.length(), moved.length());
    }

    #[test]
    fn test_swapped() {
        let p = line();
        let s = RoutesSolution::singletons(&p).merged(&p, 0, 1);
        let t = s.swapped(&p, 0, 1, 2, 0);
        assert_eq!(t.route(0).customers(), &[1, 4]);
        assert_eq!(t.route(2).customers(), &[2]);
        assert!(t.validate(&p).is_ok());

        let u = s.swapped(&p, 0, 0, 0, 1);
        assert_eq!(u.route(0).customers(), &[2, 1]);
        assert!(u.validate(&p).is_ok());
    }

    #[test]
    fn test_validate_detects_defects() {
        let p = line();
        let mut s = RoutesSolution::new();
        s.push(Route::from_customers(&p, vec![1, 2]));
        assert_eq!(s.validate(&p), Err(SearchError::MissingCustomer(3)));

        s.push(Route::from_customers(&p, vec![2, 3, 4, 5, 6]));
        assert!(matches!(
            s.validate(&p),
            Err(SearchError::DuplicateCustomer(2))
        ));

        let mut t = RoutesSolution::new();
        t.push(Route::from_customers(&p, vec![1, 2, 3, 4]));
        t.push(Route::from_customers(&p, vec![5, 6]));
        assert!(matches!(
            t.validate(&p),
            Err(SearchError::CapacityExceeded { route: 0, .. })
        ));
    }
}
