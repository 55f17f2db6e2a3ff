//! Variable Neighborhood Descent (VND).
//!
//! Deterministic local search over an ordered list of neighborhoods.
//! Every accepted improvement restarts the sweep from the first
//! neighborhood; the run ends when a full sweep finds no improvement.
//!
//! # References
//!
//! - Mladenović & Hansen (1997), "Variable neighborhood search"
//! - Hansen & Mladenović (2001), "Variable neighborhood search: Principles and applications"

mod config;
mod runner;

pub use config::VndConfig;
pub use runner::{Vnd, VndResult};
