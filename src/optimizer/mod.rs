//! # Optimizer
//!
//! The `Optimizer` trait names the steps every population-based strategy in
//! this crate goes through: size the population, create the first parents,
//! mutate offspring, select survivors and pick out the best individual. `fit`
//! strings those steps together into a full run.
//!
//! Shared bookkeeping lives in [`OptimizerState`] (cost function, parameters,
//! best result, hall of fame) and [`EvolutionState`] (population and fitness),
//! so a new strategy only has to supply the operators.
pub mod cost;
pub mod options;
pub mod state;

use std::fmt;

use crate::error::Result;

pub use cost::CostFunction;
pub use options::{LogLevel, SresOptions, SresOptionsBuilder, DEFAULT_PF};
pub use state::{EvolutionState, OptimizerState};

/// Why a run ended.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every configured generation ran.
    MaxGenerations,
    /// The best fitness did not improve for longer than the stall limit.
    Stalled,
    /// The cost function returned negative infinity for the best individual.
    NegativeInfinity,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::MaxGenerations => write!(f, "maximum number of generations reached"),
            Termination::Stalled => write!(f, "best fitness stalled"),
            Termination::NegativeInfinity => write!(f, "cost function returned negative infinity"),
        }
    }
}

/// Snapshot of a finished run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub best_fitness: f64,
    pub solution: Vec<f64>,
    pub hall_of_fame: Vec<f64>,
    /// Generation counter at the end of the run; creation counts as generation 1.
    pub generations: usize,
    pub termination: Option<Termination>,
}

/// A population-based optimization strategy.
pub trait Optimizer {
    /// Sizes the population and resets the results of any earlier run.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot produce a population.
    fn initialize(&mut self) -> Result<()>;

    /// Fills the parent rows from `first` onwards and evaluates them.
    fn creation(&mut self, first: usize) -> Result<()>;

    /// Perturbs the offspring rows and evaluates them.
    fn mutate(&mut self) -> Result<()>;

    /// Reorders the population so the survivors occupy the parent rows.
    fn select(&mut self);

    /// Index of the best feasible parent, if any parent is feasible.
    fn find_best_individual(&self) -> Option<usize>;

    /// Runs the optimization from scratch.
    fn fit(&mut self) -> Result<Termination>;
}
