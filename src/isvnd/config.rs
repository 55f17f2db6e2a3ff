//! IS-VND configuration.

use crate::error::ConfigError;

/// Configuration parameters for the population-based parallel descent.
///
/// # Examples
///
/// ```
/// use cvrp_metaheur::isvnd::IsVndConfig;
///
/// let config = IsVndConfig::default()
///     .with_population_size(5)
///     .with_selection_size(2)
///     .with_workers(4);
/// assert_eq!(config.population_size, 5);
/// assert_eq!(config.effective_selection_size(), 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsVndConfig {
    /// Number of solutions kept in the population (P). At least 2.
    pub population_size: usize,
    /// Members explored per round; `None` explores all P.
    pub selection_size: Option<usize>,
    /// Shuffle the operator dispatch order every round.
    pub shuffle_neighborhoods: bool,
    /// Worker threads; 0 uses the rayon default (one per core).
    pub workers: usize,
    /// Maximum number of rounds; 0 means run until convergence.
    pub max_rounds: usize,
    /// Random seed (None for default seed).
    pub seed: Option<u64>,
}

impl Default for IsVndConfig {
    fn default() -> Self {
        Self {
            population_size: 3,
            selection_size: None,
            shuffle_neighborhoods: false,
            workers: 0,
            max_rounds: 0,
            seed: None,
        }
    }
}

impl IsVndConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets how many members are explored per round.
    pub fn with_selection_size(mut self, m: usize) -> Self {
        self.selection_size = Some(m);
        self
    }

    /// Enables or disables per-round operator shuffling.
    pub fn with_shuffle_neighborhoods(mut self, shuffle: bool) -> Self {
        self.shuffle_neighborhoods = shuffle;
        self
    }

    /// Sets the number of worker threads.
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = n;
        self
    }

    /// Caps the number of rounds.
    pub fn with_max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Members explored per round once defaults are resolved.
    pub fn effective_selection_size(&self) -> usize {
        self.selection_size.unwrap_or(self.population_size)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::invalid(
                "population_size",
                format!("must be at least 2, got {}", self.population_size),
            ));
        }
        if let Some(m) = self.selection_size {
            if m == 0 || m > self.population_size {
                return Err(ConfigError::invalid(
                    "selection_size",
                    format!("must be in 1..={}, got {m}", self.population_size),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IsVndConfig::default();
        assert_eq!(config.population_size, 3);
        assert_eq!(config.effective_selection_size(), 3);
        assert_eq!(config.workers, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_population_size() {
        let config = IsVndConfig::default().with_population_size(1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                name: "population_size",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_selection_size() {
        for m in [0, 4] {
            let config = IsVndConfig::default().with_selection_size(m);
            assert!(config.validate().is_err(), "selection size {m} accepted");
        }
        assert!(IsVndConfig::default()
            .with_selection_size(3)
            .validate()
            .is_ok());
    }
}
