//! Immutable CVRP instance data.

use crate::error::ProblemError;

/// Index of the depot node.
pub const DEPOT: usize = 0;

/// A capacitated vehicle routing instance.
///
/// Node `0` is the depot; nodes `1..dimension` are customers. Distances are
/// stored as a dense row-major matrix.
///
/// # Examples
///
/// ```
/// use cvrp_metaheur::cvrp::CvrpProblem;
///
/// let problem = CvrpProblem::from_coordinates(
///     &[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)],
///     vec![0.0, 1.0, 1.0],
///     2.0,
/// )
/// .unwrap();
/// assert_eq!(problem.dimension(), 3);
/// assert!((problem.distance(0, 1) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CvrpProblem {
    dimension: usize,
    distance: Vec<f64>,
    demand: Vec<f64>,
    capacity: f64,
}

impl CvrpProblem {
    /// Builds an instance from an explicit distance matrix.
    ///
    /// Checks shape and value ranges once; the search never re-validates.
    pub fn new(
        distance: Vec<Vec<f64>>,
        demand: Vec<f64>,
        capacity: f64,
    ) -> Result<Self, ProblemError> {
        let dimension = distance.len();
        if dimension < 2 {
            return Err(ProblemError::TooSmall(dimension));
        }
        if demand.len() != dimension {
            return Err(ProblemError::DemandLength {
                len: demand.len(),
                dimension,
            });
        }
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(ProblemError::BadCapacity(capacity));
        }

        let mut flat = Vec::with_capacity(dimension * dimension);
        for (row, values) in distance.iter().enumerate() {
            if values.len() != dimension {
                return Err(ProblemError::NotSquare {
                    row,
                    len: values.len(),
                    dimension,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(ProblemError::BadDistance {
                        from: row,
                        to: col,
                        value,
                    });
                }
            }
            flat.extend_from_slice(values);
        }

        for (node, &value) in demand.iter().enumerate() {
            let bad = !(value.is_finite() && value >= 0.0) || (node == DEPOT && value != 0.0);
            if bad {
                return Err(ProblemError::BadDemand { node, value });
            }
        }

        Ok(Self {
            dimension,
            distance: flat,
            demand,
            capacity,
        })
    }

    /// Builds an instance with Euclidean distances between planar points.
    ///
    /// `coordinates[0]` is the depot.
    pub fn from_coordinates(
        coordinates: &[(f64, f64)],
        demand: Vec<f64>,
        capacity: f64,
    ) -> Result<Self, ProblemError> {
        let matrix: Vec<Vec<f64>> = coordinates
            .iter()
            .map(|&(xa, ya)| {
                coordinates
                    .iter()
                    .map(|&(xb, yb)| (xa - xb).hypot(ya - yb))
                    .collect()
            })
            .collect();
        Self::new(matrix, demand, capacity)
    }

    /// Number of nodes including the depot.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of customers.
    #[inline]
    pub fn customer_count(&self) -> usize {
        self.dimension - 1
    }

    /// Customer indices, `1..dimension`.
    #[inline]
    pub fn customers(&self) -> std::ops::Range<usize> {
        1..self.dimension
    }

    /// Travel cost between two nodes.
    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distance[from * self.dimension + to]
    }

    /// Demand of a node (zero for the depot).
    #[inline]
    pub fn demand(&self, node: usize) -> f64 {
        self.demand[node]
    }

    /// Vehicle capacity.
    #[inline]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns `true` if a route carrying `load` respects capacity.
    #[inline]
    pub fn fits(&self, load: f64) -> bool {
        load <= self.capacity
    }

    /// Length of a depot-to-depot tour over `customers`, from scratch.
    pub fn tour_length(&self, customers: &[usize]) -> f64 {
        let (Some(&first), Some(&last)) = (customers.first(), customers.last()) else {
            return 0.0;
        };
        let inner: f64 = customers
            .windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum();
        self.distance(DEPOT, first) + inner + self.distance(last, DEPOT)
    }
}
