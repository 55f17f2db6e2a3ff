//! Capacitated vehicle routing.
//!
//! A [`CvrpProblem`] holds the distance matrix, customer demands and the
//! vehicle capacity; node [`DEPOT`] is the depot. Solutions are
//! [`RoutesSolution`]s: every customer is visited by exactly one route and
//! no route exceeds the capacity. The operators in this module preserve
//! both invariants, and the `solve_*` facades run the engines on them.
//!
//! # Examples
//!
//! ```
//! use cvrp_metaheur::cvrp::{solve, CvrpProblem};
//! use cvrp_metaheur::strategy::{Algorithm, StrategyKind};
//! use std::sync::Arc;
//!
//! let problem = Arc::new(
//!     CvrpProblem::from_coordinates(
//!         &[(0.0, 0.0), (3.0, 0.0), (3.0, 1.0), (-3.0, 0.0), (-3.0, 1.0)],
//!         vec![0.0, 2.0, 2.0, 2.0, 2.0],
//!         4.0,
//!     )
//!     .unwrap(),
//! );
//! let best = solve(&problem, Algorithm::Vnd, StrategyKind::Best, None).unwrap();
//! assert_eq!(best.route_count(), 2);
//! ```

mod neighborhood;
mod problem;
mod route;
mod solution;
mod solve;

pub use neighborhood::{
    standard_generators, standard_neighborhoods, ChangeStationRoute, MergeRoutes, SwapStations,
};
pub use problem::{CvrpProblem, DEPOT};
pub use route::Route;
pub use solution::RoutesSolution;
pub use solve::{length_evaluator, solve, solve_isvnd, solve_sa, solve_vnd, LengthEvaluator};
