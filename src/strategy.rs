//! Strategy variant names shared by the selection and maintenance families.
//!
//! The experiment setups pick one variant for neighbor selection (VND),
//! population selection and neighborhood maintenance (IS-VND) together.
//! Parsing an unrecognised name fails immediately with
//! [`ConfigError::UnknownStrategy`].

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Best / first / random variant of a strategy family.
///
/// # Examples
///
/// ```
/// use cvrp_metaheur::strategy::StrategyKind;
///
/// let kind: StrategyKind = "best".parse().unwrap();
/// assert_eq!(kind, StrategyKind::Best);
/// assert!("worst".parse::<StrategyKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StrategyKind {
    /// Rank by fitness and take the best.
    #[default]
    Best,
    /// Take in encounter order.
    First,
    /// Take uniformly at random.
    Random,
}

impl StrategyKind {
    /// All variants, in declaration order.
    pub const ALL: [StrategyKind; 3] = [StrategyKind::Best, StrategyKind::First, StrategyKind::Random];

    /// Lowercase name of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Best => "best",
            StrategyKind::First => "first",
            StrategyKind::Random => "random",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best" => Ok(StrategyKind::Best),
            "first" => Ok(StrategyKind::First),
            "random" => Ok(StrategyKind::Random),
            _ => Err(ConfigError::UnknownStrategy {
                family: "strategy",
                name: s.to_string(),
            }),
        }
    }
}

/// Which engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    /// Sequential variable neighborhood descent.
    Vnd,
    /// Parallel immune-system VND.
    IsVnd,
    /// Simulated annealing.
    Sa,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Vnd => "vnd",
            Algorithm::IsVnd => "isvnd",
            Algorithm::Sa => "sa",
        })
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vnd" => Ok(Algorithm::Vnd),
            "isvnd" | "is-vnd" | "pop_vnd" | "popvnd" => Ok(Algorithm::IsVnd),
            "sa" => Ok(Algorithm::Sa),
            _ => Err(ConfigError::UnknownStrategy {
                family: "algorithm",
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.as_str().parse::<StrategyKind>(), Ok(kind));
        }
        assert_eq!(" Random ".parse::<StrategyKind>(), Ok(StrategyKind::Random));
    }

    #[test]
    fn test_unknown_strategy_fails() {
        let err = "roulette".parse::<StrategyKind>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownStrategy {
                family: "strategy",
                name: "roulette".into()
            }
        );
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!("VND".parse::<Algorithm>(), Ok(Algorithm::Vnd));
        assert_eq!("pop_vnd".parse::<Algorithm>(), Ok(Algorithm::IsVnd));
        assert_eq!("sa".parse::<Algorithm>(), Ok(Algorithm::Sa));
        assert!("tabu".parse::<Algorithm>().is_err());
    }
}
