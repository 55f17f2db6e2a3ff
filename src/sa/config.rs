//! SA configuration and the geometric cooling schedule.

use crate::error::ConfigError;

/// Configuration for the Simulated Annealing engine.
///
/// # Examples
///
/// ```
/// use cvrp_metaheur::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(50.0)
///     .with_cooling_ratio(0.995)
///     .with_steps_per_temperature(20)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1): `T <- ratio * T`.
    pub cooling_ratio: f64,

    /// The run stops once the temperature drops to this floor.
    pub min_temperature: f64,

    /// Proposals evaluated at each temperature level.
    pub steps_per_temperature: usize,

    /// Maximum total iterations (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Probability of applying two consecutive moves before evaluating.
    pub repeat_probability: f64,

    /// Random seed (None for default seed).
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 10.0,
            cooling_ratio: 0.99,
            min_temperature: 1e-3,
            steps_per_temperature: 1,
            max_iterations: 1_000_000,
            repeat_probability: 0.05,
            seed: None,
        }
    }
}

impl SaConfig {
    /// Long plateaus: 1000 proposals per temperature level.
    pub fn plateau() -> Self {
        Self::default().with_steps_per_temperature(1000)
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_ratio(mut self, ratio: f64) -> Self {
        self.cooling_ratio = ratio;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_steps_per_temperature(mut self, n: usize) -> Self {
        self.steps_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_repeat_probability(mut self, p: f64) -> Self {
        self.repeat_probability = p;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(ConfigError::invalid(
                "initial_temperature",
                format!("must be positive, got {}", self.initial_temperature),
            ));
        }
        if !(self.min_temperature > 0.0) {
            return Err(ConfigError::invalid(
                "min_temperature",
                format!("must be positive, got {}", self.min_temperature),
            ));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(ConfigError::invalid(
                "min_temperature",
                "must be less than initial_temperature",
            ));
        }
        if !(self.cooling_ratio > 0.0 && self.cooling_ratio < 1.0) {
            return Err(ConfigError::invalid(
                "cooling_ratio",
                format!("must be in (0, 1), got {}", self.cooling_ratio),
            ));
        }
        if self.steps_per_temperature == 0 {
            return Err(ConfigError::invalid(
                "steps_per_temperature",
                "must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.repeat_probability) {
            return Err(ConfigError::invalid(
                "repeat_probability",
                format!("must be in [0, 1], got {}", self.repeat_probability),
            ));
        }
        Ok(())
    }
}

/// Geometric cooling: `T_{k+1} = ratio * T_k`, one level every
/// `steps_per_temperature` proposals.
///
/// The temperature never increases and never drops below zero.
#[derive(Debug, Clone)]
pub struct GeometricSchedule {
    temperature: f64,
    ratio: f64,
    min_temperature: f64,
    steps_per_temperature: usize,
    step: usize,
}

impl GeometricSchedule {
    /// Starts at `config.initial_temperature`.
    pub fn new(config: &SaConfig) -> Self {
        Self {
            temperature: config.initial_temperature,
            ratio: config.cooling_ratio,
            min_temperature: config.min_temperature,
            steps_per_temperature: config.steps_per_temperature.max(1),
            step: 0,
        }
    }

    /// Current temperature.
    #[inline]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Records one proposal; returns `true` when the level cooled.
    pub fn advance(&mut self) -> bool {
        self.step += 1;
        if self.step < self.steps_per_temperature {
            return false;
        }
        self.step = 0;
        self.temperature *= self.ratio;
        true
    }

    /// `true` once the temperature has reached the floor.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.temperature <= self.min_temperature
    }
}
