//! Error types.
//!
//! Three families, matching the three points where something can go wrong:
//!
//! - [`ConfigError`]: an engine or strategy was configured incorrectly.
//!   Raised by constructors and `validate()` before any search starts.
//! - [`ProblemError`]: instance data handed to [`CvrpProblem`](crate::cvrp::CvrpProblem)
//!   has the wrong shape or out-of-range values.
//! - [`SearchError`]: a run detected a broken solution invariant and aborted.
//!
//! [`SolveError`] joins the first and last for the CVRP solve facades.
//!
//! Infeasible moves are not errors; operators filter them out silently.

use std::fmt;

/// Invalid engine or strategy configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A strategy name did not match any known variant.
    UnknownStrategy {
        /// Which strategy family was being parsed.
        family: &'static str,
        /// The rejected name.
        name: String,
    },
    /// A numeric parameter is outside its valid range.
    InvalidParameter {
        /// Parameter name as it appears in the config struct.
        name: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },
    /// An engine was given no neighborhood operators.
    NoNeighborhoods,
    /// The worker pool could not be created.
    WorkerPool(String),
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownStrategy { family, name } => {
                write!(f, "unknown {family} strategy '{name}'")
            }
            ConfigError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter {name}: {reason}")
            }
            ConfigError::NoNeighborhoods => write!(f, "at least one neighborhood is required"),
            ConfigError::WorkerPool(reason) => write!(f, "failed to build worker pool: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Malformed problem instance data.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// Fewer than two nodes (a depot and at least one customer).
    TooSmall(usize),
    /// A distance row does not have `dimension` entries.
    NotSquare {
        /// Offending row.
        row: usize,
        /// Its length.
        len: usize,
        /// Expected length.
        dimension: usize,
    },
    /// The demand vector length differs from the matrix dimension.
    DemandLength {
        /// Demand vector length.
        len: usize,
        /// Matrix dimension.
        dimension: usize,
    },
    /// A distance is negative, NaN or infinite.
    BadDistance {
        /// Row index.
        from: usize,
        /// Column index.
        to: usize,
        /// The value found.
        value: f64,
    },
    /// A demand is negative, NaN or infinite, or the depot demand is not zero.
    BadDemand {
        /// Node index.
        node: usize,
        /// The value found.
        value: f64,
    },
    /// Capacity is not a positive finite number.
    BadCapacity(f64),
}

impl fmt::Display for ProblemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemError::TooSmall(n) => {
                write!(f, "instance needs a depot and a customer, got {n} nodes")
            }
            ProblemError::NotSquare {
                row,
                len,
                dimension,
            } => write!(
                f,
                "distance row {row} has {len} entries, expected {dimension}"
            ),
            ProblemError::DemandLength { len, dimension } => {
                write!(f, "demand vector has {len} entries, expected {dimension}")
            }
            ProblemError::BadDistance { from, to, value } => {
                write!(f, "distance {from}->{to} is {value}")
            }
            ProblemError::BadDemand { node, value } => {
                write!(f, "demand of node {node} is {value}")
            }
            ProblemError::BadCapacity(c) => write!(f, "capacity must be positive, got {c}"),
        }
    }
}

impl std::error::Error for ProblemError {}

/// A run detected a broken invariant and was aborted.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// A customer is missing from every route.
    MissingCustomer(usize),
    /// A customer appears more than once.
    DuplicateCustomer(usize),
    /// A route contains an index that is not a customer of the instance.
    UnknownNode(usize),
    /// A route's demand exceeds vehicle capacity.
    CapacityExceeded {
        /// Route position in the solution.
        route: usize,
        /// Route demand.
        demand: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
    /// A cached length differs from the recomputed one.
    LengthDrift {
        /// Cached value.
        cached: f64,
        /// Value recomputed from the distance matrix.
        actual: f64,
    },
    /// The population size changed after a maintenance commit.
    PopulationSize {
        /// Configured size.
        expected: usize,
        /// Observed size.
        actual: usize,
    },
    /// The population was empty when a member had to be chosen.
    EmptyPopulation,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::MissingCustomer(c) => write!(f, "customer {c} is not routed"),
            SearchError::DuplicateCustomer(c) => write!(f, "customer {c} is routed twice"),
            SearchError::UnknownNode(n) => write!(f, "route contains unknown node {n}"),
            SearchError::CapacityExceeded {
                route,
                demand,
                capacity,
            } => write!(
                f,
                "route {route} carries {demand}, capacity is {capacity}"
            ),
            SearchError::LengthDrift { cached, actual } => {
                write!(f, "cached length {cached} differs from actual {actual}")
            }
            SearchError::PopulationSize { expected, actual } => {
                write!(f, "population holds {actual} members, expected {expected}")
            }
            SearchError::EmptyPopulation => write!(f, "population is empty"),
        }
    }
}

impl std::error::Error for SearchError {}

/// Failure of a solve facade: either the engine was misconfigured or the
/// run ended with a broken solution.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// Engine or strategy configuration was rejected.
    Config(ConfigError),
    /// The run aborted on an invariant violation.
    Search(SearchError),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Config(e) => write!(f, "configuration error: {e}"),
            SolveError::Search(e) => write!(f, "search aborted: {e}"),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolveError::Config(e) => Some(e),
            SolveError::Search(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SolveError {
    fn from(e: ConfigError) -> Self {
        SolveError::Config(e)
    }
}

impl From<SearchError> for SolveError {
    fn from(e: SearchError) -> Self {
        SolveError::Search(e)
    }
}
