//! Variable Neighborhood Descent configuration.

use crate::error::ConfigError;

/// Configuration parameters for Variable Neighborhood Descent.
///
/// # Examples
///
/// ```
/// use cvrp_metaheur::vnd::VndConfig;
///
/// let config = VndConfig::default()
///     .with_shuffle_neighborhoods(true)
///     .with_seed(7);
/// assert!(config.shuffle_neighborhoods);
/// assert_eq!(config.seed, Some(7));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VndConfig {
    /// Shuffle the operator order at the start of every pass.
    pub shuffle_neighborhoods: bool,
    /// Random seed (None for default seed).
    pub seed: Option<u64>,
    /// Maximum number of passes; 0 means run until a local optimum.
    pub max_passes: usize,
}

impl VndConfig {
    /// Enables or disables per-pass operator shuffling.
    pub fn with_shuffle_neighborhoods(mut self, shuffle: bool) -> Self {
        self.shuffle_neighborhoods = shuffle;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Caps the number of passes.
    pub fn with_max_passes(mut self, n: usize) -> Self {
        self.max_passes = n;
        self
    }

    /// Validates the configuration.
    ///
    /// Every combination of fields is currently meaningful.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VndConfig::default();
        assert!(!config.shuffle_neighborhoods);
        assert_eq!(config.seed, None);
        assert_eq!(config.max_passes, 0);
    }

    #[test]
    fn test_builders() {
        let config = VndConfig::default().with_max_passes(3).with_seed(1);
        assert_eq!(config.max_passes, 3);
        assert_eq!(config.seed, Some(1));
    }
}
