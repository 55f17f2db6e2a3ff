//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! Proposals come from a [`NeighborGenerator`](crate::framework::NeighborGenerator);
//! [`CompositeNeighborhood`] picks one of several generators per step and
//! [`RepeatNeighborhood`] occasionally chains two moves.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod neighborhood;
mod runner;

pub use config::{GeometricSchedule, SaConfig};
pub use neighborhood::{CompositeNeighborhood, RepeatNeighborhood};
pub use runner::{SaResult, SimulatedAnnealing};
