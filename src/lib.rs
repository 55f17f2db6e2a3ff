//! Local-search metaheuristics for the capacitated vehicle routing problem.
//!
//! The crate is split into a generic strategy framework and the routing
//! layer built on top of it:
//!
//! - **Framework**: decoder, fitness evaluator, neighborhood, generator and
//!   neighbor-selection traits shared by all engines.
//! - **Variable Neighborhood Descent (VND)**: deterministic descent that
//!   restarts from the first neighborhood after every improvement.
//! - **IS-VND**: a population of solutions explored in parallel on a
//!   rayon pool, with pluggable population selection and maintenance.
//! - **Simulated Annealing (SA)**: geometric cooling with Metropolis
//!   acceptance over randomly proposed moves.
//! - **CVRP**: problem instances, copy-on-write route solutions, the
//!   merge/relocate/swap operators and ready-made solve facades.
//!
//! All randomness flows through explicitly seeded generators, so equal
//! seeds give equal results regardless of worker count.

pub mod cvrp;
pub mod error;
pub mod framework;
pub mod isvnd;
pub mod random;
pub mod sa;
pub mod strategy;
pub mod vnd;
