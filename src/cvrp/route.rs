//! Depot-to-depot route with cached length and demand.

use super::problem::{CvrpProblem, DEPOT};
use std::fmt;

/// An ordered sequence of customers visited by one vehicle.
///
/// The depot is implicit at both ends. `length` and `demand` are cached
/// and kept current by every mutating method through O(1) deltas.
/// Capacity is not checked here; operators check it before proposing a move.
///
/// # Examples
///
/// ```
/// use cvrp_metaheur::cvrp::{CvrpProblem, Route};
///
/// let problem = CvrpProblem::from_coordinates(
///     &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
///     vec![0.0, 1.0, 1.0],
///     2.0,
/// )
/// .unwrap();
/// let mut route = Route::singleton(&problem, 1);
/// route.push(&problem, 2);
/// assert_eq!(route.customers(), &[1, 2]);
/// assert!((route.length() - problem.tour_length(&[1, 2])).abs() < 1e-12);
/// assert_eq!(route.demand(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    customers: Vec<usize>,
    length: f64,
    demand: f64,
}

impl Route {
    /// Creates an empty route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a route visiting only `customer`.
    pub fn singleton(problem: &CvrpProblem, customer: usize) -> Self {
        Self {
            customers: vec![customer],
            length: problem.distance(DEPOT, customer) + problem.distance(customer, DEPOT),
            demand: problem.demand(customer),
        }
    }

    /// Creates a route over `customers`, computing length and demand from scratch.
    pub fn from_customers(problem: &CvrpProblem, customers: Vec<usize>) -> Self {
        let length = problem.tour_length(&customers);
        let demand = customers.iter().map(|&c| problem.demand(c)).sum();
        Self {
            customers,
            length,
            demand,
        }
    }

    /// Customers in visiting order.
    #[inline]
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    /// Number of customers.
    #[inline]
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Returns `true` if the route visits nobody.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Cached tour length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Cached total demand.
    #[inline]
    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Customer at `pos`.
    #[inline]
    pub fn customer(&self, pos: usize) -> usize {
        self.customers[pos]
    }

    #[inline]
    fn before(&self, pos: usize) -> usize {
        if pos == 0 {
            DEPOT
        } else {
            self.customers[pos - 1]
        }
    }

    #[inline]
    fn after(&self, pos: usize) -> usize {
        self.customers.get(pos + 1).copied().unwrap_or(DEPOT)
    }

    /// Length change from removing the customer at `pos`.
    pub fn removal_delta(&self, problem: &CvrpProblem, pos: usize) -> f64 {
        let (prev, cur, next) = (self.before(pos), self.customers[pos], self.after(pos));
        problem.distance(prev, next) - problem.distance(prev, cur) - problem.distance(cur, next)
    }

    /// Length change from inserting `customer` before position `pos`
    /// (`pos == len()` appends).
    pub fn insertion_delta(&self, problem: &CvrpProblem, pos: usize, customer: usize) -> f64 {
        let prev = self.before(pos);
        let next = self.customers.get(pos).copied().unwrap_or(DEPOT);
        problem.distance(prev, customer) + problem.distance(customer, next)
            - problem.distance(prev, next)
    }

    /// Length change from putting `customer` in place of the one at `pos`.
    pub fn replacement_delta(&self, problem: &CvrpProblem, pos: usize, customer: usize) -> f64 {
        let (prev, cur, next) = (self.before(pos), self.customers[pos], self.after(pos));
        problem.distance(prev, customer) + problem.distance(customer, next)
            - problem.distance(prev, cur)
            - problem.distance(cur, next)
    }

    /// Length change from appending all of `other` after this route's last customer.
    pub fn concatenation_delta(&self, problem: &CvrpProblem, other: &Route) -> f64 {
        match (self.customers.last(), other.customers.first()) {
            (Some(&tail), Some(&head)) => {
                problem.distance(tail, head)
                    - problem.distance(tail, DEPOT)
                    - problem.distance(DEPOT, head)
            }
            _ => 0.0,
        }
    }

    /// Inserts `customer` before position `pos`.
    pub fn insert(&mut self, problem: &CvrpProblem, pos: usize, customer: usize) {
        self.length += self.insertion_delta(problem, pos, customer);
        self.demand += problem.demand(customer);
        self.customers.insert(pos, customer);
    }

    /// Appends `customer` at the end.
    pub fn push(&mut self, problem: &CvrpProblem, customer: usize) {
        self.insert(problem, self.customers.len(), customer);
    }

    /// Removes and returns the customer at `pos`.
    pub fn remove(&mut self, problem: &CvrpProblem, pos: usize) -> usize {
        self.length += self.removal_delta(problem, pos);
        let customer = self.customers.remove(pos);
        self.demand -= problem.demand(customer);
        if self.customers.is_empty() {
            // an empty route has exactly zero length and load
            self.length = 0.0;
            self.demand = 0.0;
        }
        customer
    }

    /// Puts `customer` at `pos` and returns the customer it displaced.
    pub fn replace(&mut self, problem: &CvrpProblem, pos: usize, customer: usize) -> usize {
        self.length += self.replacement_delta(problem, pos, customer);
        let old = std::mem::replace(&mut self.customers[pos], customer);
        self.demand += problem.demand(customer) - problem.demand(old);
        old
    }

    /// Exchanges the customers at positions `i` and `j`.
    pub fn swap_positions(&mut self, problem: &CvrpProblem, i: usize, j: usize) {
        if i == j {
            return;
        }
        // Each replacement delta is exact for the sequence it is applied to,
        // so chaining two of them is exact even for adjacent positions.
        let (a, b) = (self.customers[i], self.customers[j]);
        self.replace(problem, i, b);
        self.replace(problem, j, a);
    }

    /// Moves the customer at `from` so that it ends up before the element
    /// currently at `to` once it has been taken out (`to` indexes the
    /// shortened sequence).
    pub fn reposition(&mut self, problem: &CvrpProblem, from: usize, to: usize) {
        let customer = self.remove(problem, from);
        self.insert(problem, to, customer);
    }

    /// Appends every customer of `other`.
    pub fn append(&mut self, problem: &CvrpProblem, other: &Route) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other.clone();
            return;
        }
        self.length += other.length + self.concatenation_delta(problem, other);
        self.demand += other.demand;
        self.customers.extend_from_slice(&other.customers);
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DEPOT}")?;
        for c in &self.customers {
            write!(f, " -> {c}")?;
        }
        write!(f, " -> {DEPOT} (length {:.3}, demand {})", self.length, self.demand)
    }
}
