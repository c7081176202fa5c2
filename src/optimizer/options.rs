//! # SresOptions
//!
//! The `SresOptions` struct holds the run configuration of the optimizer: how
//! large the parent population is, how many generations to run, how many
//! children each parent produces, when to give up on a stalled search and how
//! chatty the run should be.
//!
//! ## Example
//!
//! ```rust
//! use sres::optimizer::options::{LogLevel, SresOptions};
//!
//! // Create a new SresOptions instance with custom parameters
//! let custom_options = SresOptions::new(10, 50, 7);
//! assert_eq!(custom_options.get_num_offspring(), 70);
//!
//! // Or use the builder
//! let options = SresOptions::builder()
//!     .population_size(20)
//!     .num_generations(200)
//!     .stall_limit(25)
//!     .log_level(LogLevel::Minimal)
//!     .build();
//! assert_eq!(options.get_stall_limit(), 25);
//! ```
//!
//! ## Stall limit
//!
//! The stall limit is the number of consecutive generations without an
//! improvement of the best fitness that the run tolerates:
//!
//! - `0` disables the check.
//! - `1` is shorthand for 20% of the configured generations.
//! - Any other value is used as is.

use crate::error::{Result, SresError};

/// Default probability of ranking a pair by fitness regardless of feasibility.
pub const DEFAULT_PF: f64 = 0.475;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Per-generation progress on top of everything `Minimal` reports.
    Verbose,
    /// Improvements of the best fitness and the reason the run stopped.
    Minimal,
    #[default]
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SresOptions {
    population_size: usize,
    num_generations: usize,
    child_rate: usize,
    stall_limit: usize,
    pf: f64,
    log_level: LogLevel,
    /// Number of Latin Hypercube batches drawn when seeding with `fit_lhs`.
    lhs_trials: usize,
}

impl SresOptions {
    pub fn new(population_size: usize, num_generations: usize, child_rate: usize) -> Self {
        Self {
            population_size,
            num_generations,
            child_rate,
            ..Self::default()
        }
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_child_rate(&self) -> usize {
        self.child_rate
    }

    /// Total number of population rows: parents plus offspring.
    pub fn get_num_offspring(&self) -> usize {
        self.child_rate * self.population_size
    }

    pub fn get_stall_limit(&self) -> usize {
        self.stall_limit
    }

    /// The stall limit with the `0` and `1` shorthands resolved.
    pub fn effective_stall_limit(&self) -> usize {
        match self.stall_limit {
            0 => usize::MAX,
            1 => (self.num_generations / 5).max(1),
            limit => limit,
        }
    }

    pub fn get_pf(&self) -> f64 {
        self.pf
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn get_lhs_trials(&self) -> usize {
        self.lhs_trials
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_num_generations(&mut self, num_generations: usize) {
        self.num_generations = num_generations;
    }

    pub fn set_child_rate(&mut self, child_rate: usize) {
        self.child_rate = child_rate;
    }

    pub fn set_stall_limit(&mut self, stall_limit: usize) {
        self.stall_limit = stall_limit;
    }

    /// Sets the stochastic ranking probability. Values outside `[0, 1]` are
    /// replaced by [`DEFAULT_PF`] when the optimizer initializes.
    pub fn set_pf(&mut self, pf: f64) {
        self.pf = pf;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    pub fn set_lhs_trials(&mut self, lhs_trials: usize) {
        self.lhs_trials = lhs_trials;
    }

    /// Checks the values that would leave the optimizer without a population.
    ///
    /// # Errors
    ///
    /// Returns [`SresError::Configuration`] for a zero population size, child
    /// rate or number of LHS trials.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(SresError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        if self.child_rate == 0 {
            return Err(SresError::Configuration(
                "Child rate cannot be zero".to_string(),
            ));
        }
        if self.lhs_trials == 0 {
            return Err(SresError::Configuration(
                "Number of LHS trials cannot be zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns a builder for creating an `SresOptions` instance.
    pub fn builder() -> SresOptionsBuilder {
        SresOptionsBuilder::default()
    }
}

impl Default for SresOptions {
    fn default() -> Self {
        Self {
            population_size: 100,
            num_generations: 500,
            child_rate: 7,
            stall_limit: 0,
            pf: DEFAULT_PF,
            log_level: LogLevel::None,
            lhs_trials: 10,
        }
    }
}

/// Builder for `SresOptions`.
///
/// Provides a fluent interface for constructing `SresOptions` instances.
/// Unset fields take the values of `SresOptions::default()`.
#[derive(Debug, Clone, Default)]
pub struct SresOptionsBuilder {
    population_size: Option<usize>,
    num_generations: Option<usize>,
    child_rate: Option<usize>,
    stall_limit: Option<usize>,
    pf: Option<f64>,
    log_level: Option<LogLevel>,
    lhs_trials: Option<usize>,
}

impl SresOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    pub fn child_rate(mut self, value: usize) -> Self {
        self.child_rate = Some(value);
        self
    }

    pub fn stall_limit(mut self, value: usize) -> Self {
        self.stall_limit = Some(value);
        self
    }

    pub fn pf(mut self, value: f64) -> Self {
        self.pf = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn lhs_trials(mut self, value: usize) -> Self {
        self.lhs_trials = Some(value);
        self
    }

    pub fn build(self) -> SresOptions {
        let defaults = SresOptions::default();
        SresOptions {
            population_size: self.population_size.unwrap_or(defaults.population_size),
            num_generations: self.num_generations.unwrap_or(defaults.num_generations),
            child_rate: self.child_rate.unwrap_or(defaults.child_rate),
            stall_limit: self.stall_limit.unwrap_or(defaults.stall_limit),
            pf: self.pf.unwrap_or(defaults.pf),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            lhs_trials: self.lhs_trials.unwrap_or(defaults.lhs_trials),
        }
    }
}
