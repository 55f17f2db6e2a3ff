//! Core strategy traits shared by every engine.
//!
//! Each trait has a single job and is injected into engine constructors.
//! Engines only ever see these traits, never a concrete operator.

use rand::RngCore;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Optimization direction of a fitness value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Lower values are better.
    #[default]
    Minimize,
    /// Higher values are better.
    Maximize,
}

impl Direction {
    /// Returns `true` if `candidate` is strictly better than `incumbent`.
    #[inline]
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Direction::Minimize => candidate < incumbent,
            Direction::Maximize => candidate > incumbent,
        }
    }

    /// Returns `true` if `candidate` beats `incumbent` by more than `tolerance`.
    #[inline]
    pub fn improves(self, candidate: f64, incumbent: f64, tolerance: f64) -> bool {
        match self {
            Direction::Minimize => candidate < incumbent - tolerance,
            Direction::Maximize => candidate > incumbent + tolerance,
        }
    }

    /// Orders two fitness values so that the better one compares `Less`.
    #[inline]
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            Direction::Minimize => ord,
            Direction::Maximize => ord.reverse(),
        }
    }

    /// How much worse `candidate` is than `current` (negative when better).
    #[inline]
    pub fn worsening(self, candidate: f64, current: f64) -> f64 {
        match self {
            Direction::Minimize => candidate - current,
            Direction::Maximize => current - candidate,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Direction::Minimize => Direction::Maximize,
            Direction::Maximize => Direction::Minimize,
        }
    }
}

/// Maps a (possibly encoded) candidate to the solution that gets evaluated.
pub trait Decoder<E>: Send + Sync {
    /// The evaluable solution type.
    type Decoded: Clone;

    /// Decodes a candidate, borrowing when no transformation is needed.
    fn decode<'a>(&self, encoded: &'a E) -> Cow<'a, Self::Decoded>;
}

/// Identity decoder: candidates are already evaluable.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughDecoder;

impl<E: Clone + Send + Sync> Decoder<E> for PassThroughDecoder {
    type Decoded = E;

    #[inline]
    fn decode<'a>(&self, encoded: &'a E) -> Cow<'a, E> {
        Cow::Borrowed(encoded)
    }
}

/// Scores a decoded solution.
pub trait FitnessEvaluator<S>: Send + Sync {
    /// Fitness of `solution`, to be read in [`direction`](Self::direction).
    fn evaluate(&self, solution: &S) -> f64;

    /// Whether lower or higher fitness is better.
    fn direction(&self) -> Direction {
        Direction::Minimize
    }
}

/// Evaluator backed by an objective function and a direction.
///
/// # Examples
///
/// ```
/// use cvrp_metaheur::framework::{Direction, FitnessEvaluator, ObjectiveEvaluator};
///
/// let eval = ObjectiveEvaluator::minimize(|x: &f64| x * x);
/// assert_eq!(eval.evaluate(&3.0), 9.0);
/// assert_eq!(eval.direction(), Direction::Minimize);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveEvaluator<F> {
    objective: F,
    direction: Direction,
}

impl<F> ObjectiveEvaluator<F> {
    /// Wraps `objective` with an explicit direction.
    pub fn new(objective: F, direction: Direction) -> Self {
        Self {
            objective,
            direction,
        }
    }

    /// Lower objective values are better.
    pub fn minimize(objective: F) -> Self {
        Self::new(objective, Direction::Minimize)
    }

    /// Higher objective values are better.
    pub fn maximize(objective: F) -> Self {
        Self::new(objective, Direction::Maximize)
    }

    /// The configured direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl<S, F> FitnessEvaluator<S> for ObjectiveEvaluator<F>
where
    F: Fn(&S) -> f64 + Send + Sync,
{
    #[inline]
    fn evaluate(&self, solution: &S) -> f64 {
        (self.objective)(solution)
    }

    fn direction(&self) -> Direction {
        self.direction
    }
}

/// Negates an inner evaluator and flips its direction.
///
/// The ranking of solutions is unchanged; only the sign of the reported
/// fitness differs.
#[derive(Debug, Clone, Copy)]
pub struct Negated<E>(pub E);

impl<S, E: FitnessEvaluator<S>> FitnessEvaluator<S> for Negated<E> {
    #[inline]
    fn evaluate(&self, solution: &S) -> f64 {
        -self.0.evaluate(solution)
    }

    fn direction(&self) -> Direction {
        self.0.direction().flip()
    }
}

/// Enumerates structurally related candidates of a base solution.
///
/// Implementations never modify `base`; every item is a new solution that
/// already satisfies the problem's feasibility constraints.
pub trait Neighborhood<S>: Send + Sync {
    /// Short operator name used in logs.
    fn name(&self) -> &str;

    /// Lazily yields feasible candidates in a fixed enumeration order.
    fn neighbors<'a>(&'a self, base: &'a S) -> Box<dyn Iterator<Item = S> + 'a>;
}

/// Proposes a single random neighbor of a base solution.
pub trait NeighborGenerator<S>: Send + Sync {
    /// Returns a random feasible neighbor, or `None` if none was found.
    fn generate(&self, base: &S, rng: &mut dyn RngCore) -> Option<S>;
}

/// A candidate together with its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<S> {
    /// The candidate.
    pub solution: S,
    /// Its fitness.
    pub fitness: f64,
}

impl<S> Scored<S> {
    /// Pairs a solution with its fitness.
    pub fn new(solution: S, fitness: f64) -> Self {
        Self { solution, fitness }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_compare() {
        assert!(Direction::Minimize.is_better(1.0, 2.0));
        assert!(!Direction::Minimize.is_better(2.0, 2.0));
        assert!(Direction::Maximize.is_better(3.0, 2.0));
        assert_eq!(Direction::Minimize.compare(1.0, 2.0), Ordering::Less);
        assert_eq!(Direction::Maximize.compare(1.0, 2.0), Ordering::Greater);
    }

    #[test]
    fn test_improves_tolerance() {
        assert!(!Direction::Minimize.improves(1.0 - 1e-12, 1.0, 1e-9));
        assert!(Direction::Minimize.improves(0.5, 1.0, 1e-9));
        assert!(Direction::Maximize.improves(1.5, 1.0, 1e-9));
    }

    #[test]
    fn test_worsening_sign() {
        assert_eq!(Direction::Minimize.worsening(5.0, 3.0), 2.0);
        assert_eq!(Direction::Maximize.worsening(5.0, 3.0), -2.0);
    }

    #[test]
    fn test_negated_preserves_ranking() {
        let eval = ObjectiveEvaluator::minimize(|x: &f64| *x);
        let neg = Negated(eval);
        let neg_direction = FitnessEvaluator::<f64>::direction(&neg);
        assert_eq!(neg.evaluate(&4.0_f64), -4.0);
        assert_eq!(neg_direction, Direction::Maximize);

        let (a, b) = (1.0_f64, 2.0_f64);
        let plain = eval.direction().is_better(eval.evaluate(&a), eval.evaluate(&b));
        let negated = neg_direction.is_better(neg.evaluate(&a), neg.evaluate(&b));
        assert_eq!(plain, negated);
    }

    #[test]
    fn test_pass_through_borrows() {
        let value = vec![1, 2, 3];
        let decoded = PassThroughDecoder.decode(&value);
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(*decoded, value);
    }
}
