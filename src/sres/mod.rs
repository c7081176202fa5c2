//! # SRES
//!
//! Evolution strategy with stochastic ranking for box-constrained problems.
//!
//! Each individual carries its own per-dimension step sizes (the variance
//! matrix), which are recombined between individuals and mutated log-normally
//! every generation. Survivors are chosen by a randomized bubble sort that
//! ranks feasible pairs by fitness and infeasible pairs by their bound
//! violation, except with probability `pf`, when fitness decides anyway.
//!
//! ## Example
//!
//! ```rust
//! use sres::{Optimizer, Sres, SresOptions};
//!
//! let sphere = |x: &[f64]| x.iter().map(|v| (v - 1.0).powi(2)).sum::<f64>();
//! let options = SresOptions::new(10, 100, 7);
//!
//! let mut sres = Sres::from_vectors(sphere, options, &[4.0, -3.0], &[-5.0, -5.0], &[5.0, 5.0], false)
//!     .unwrap();
//! sres.set_seed(4);
//! sres.fit().unwrap();
//!
//! assert!(sres.best_fitness_value() < 1e-2);
//! ```
mod operators;

use tracing::{debug, info};

use crate::{
    domain::ParameterSet,
    error::{Result, SresError},
    optimizer::{
        CostFunction, EvolutionState, FitReport, LogLevel, Optimizer, OptimizerState,
        SresOptions, Termination,
    },
    rng::{Matrix, RandomNumberGenerator, RandomStream},
};

/// Stochastic Ranking Evolution Strategy.
///
/// `F` is the cost function and `R` the random stream every operator draws
/// from. The stream is owned by the instance; see [`Sres::with_rng`] to swap it.
#[derive(Debug, Clone)]
pub struct Sres<F, R = RandomNumberGenerator> {
    state: OptimizerState<F>,
    options: SresOptions,
    rng: R,
    population: EvolutionState,
    variance: Matrix,
    max_variance: Vec<f64>,
    phi: Vec<f64>,
    tau: f64,
    tau_prime: f64,
    termination: Option<Termination>,
}

impl<F: CostFunction> Sres<F> {
    /// Creates an optimizer over `parameters` with a clock-seeded stream.
    ///
    /// # Errors
    ///
    /// Returns an error if `options` fail validation or `parameters` is empty.
    pub fn new(cost: F, options: SresOptions, parameters: ParameterSet) -> Result<Self> {
        Self::with_stream(cost, options, parameters, RandomNumberGenerator::new())
    }

    /// Creates an optimizer from parallel vectors of starting values, lower
    /// bounds and upper bounds.
    ///
    /// With `logspace` the bounds and starting values are converted to base-10
    /// logarithms and the cost function receives log-space values.
    ///
    /// # Errors
    ///
    /// Returns [`SresError::LengthMismatch`] if the vectors differ in length,
    /// plus anything [`ParameterSet::from_vectors`] or [`Sres::new`] rejects.
    pub fn from_vectors(
        cost: F,
        options: SresOptions,
        starting_values: &[f64],
        lower_bounds: &[f64],
        upper_bounds: &[f64],
        logspace: bool,
    ) -> Result<Self> {
        let parameters =
            ParameterSet::from_vectors(starting_values, lower_bounds, upper_bounds, logspace)?;
        Self::new(cost, options, parameters)
    }
}

impl<F: CostFunction, R: RandomStream> Sres<F, R> {
    /// Creates an optimizer drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if `options` fail validation or `parameters` is empty.
    pub fn with_stream(cost: F, options: SresOptions, parameters: ParameterSet, rng: R) -> Result<Self> {
        options.validate()?;
        if parameters.is_empty() {
            return Err(SresError::Configuration(
                "At least one parameter is required".to_string(),
            ));
        }

        Ok(Self {
            state: OptimizerState::new(cost, parameters),
            options,
            rng,
            population: EvolutionState::default(),
            variance: Vec::new(),
            max_variance: Vec::new(),
            phi: Vec::new(),
            tau: 100.0,
            tau_prime: 100.0,
            termination: None,
        })
    }

    /// Replaces the random stream, keeping everything else.
    pub fn with_rng<R2: RandomStream>(self, rng: R2) -> Sres<F, R2> {
        Sres {
            state: self.state,
            options: self.options,
            rng,
            population: self.population,
            variance: self.variance,
            max_variance: self.max_variance,
            phi: self.phi,
            tau: self.tau,
            tau_prime: self.tau_prime,
            termination: self.termination,
        }
    }

    /// Runs the optimization starting from a Latin Hypercube seeded population.
    ///
    /// `lhs_trials` batches of parents are drawn over the bounds and scored;
    /// the batch with the lowest summed fitness becomes the first generation.
    /// The run then continues exactly like [`Optimizer::fit`].
    ///
    /// # Errors
    ///
    /// Returns an error if the optimizer cannot be initialized.
    pub fn fit_lhs(&mut self) -> Result<Termination> {
        self.initialize()?;
        self.seed_from_latin_hypercube()?;
        self.population.current_generation = 1;

        let mut proceed = true;
        if let Some(best) = self.find_best_individual() {
            proceed = self.record_best(best);
        }

        let termination = if proceed {
            self.evolve()?
        } else {
            Termination::NegativeInfinity
        };
        Ok(self.finish(termination))
    }

    /// The generation loop shared by `fit` and `fit_lhs`.
    fn evolve(&mut self) -> Result<Termination> {
        let stall_limit = self.options.effective_stall_limit();
        let mut stalled = 0usize;

        for generation in 2..=self.options.get_num_generations() {
            if stalled > stall_limit {
                return Ok(Termination::Stalled);
            }
            self.population.current_generation = generation;

            self.replicate()?;
            self.select();

            match self.find_best_individual() {
                Some(best) if self.population.fitness[best] < self.state.best_fitness_value() => {
                    stalled = 0;
                    if !self.record_best(best) {
                        return Ok(Termination::NegativeInfinity);
                    }
                }
                _ => stalled += 1,
            }

            self.log_generation(stalled);
        }

        Ok(Termination::MaxGenerations)
    }

    /// Stores parent row `best` as the best solution. Returns `false` when its
    /// fitness is the negative infinity stop signal.
    fn record_best(&mut self, best: usize) -> bool {
        let fitness = self.population.fitness[best];
        let proceed = self
            .state
            .set_solution(fitness, &self.population.individuals[best]);

        if self.options.get_log_level() != LogLevel::None {
            info!(
                generation = self.population.current_generation,
                best_fitness = fitness,
                "new best individual"
            );
        }
        proceed
    }

    fn log_generation(&self, stalled: usize) {
        if self.options.get_log_level() == LogLevel::Verbose {
            debug!(
                generation = self.population.current_generation,
                best_fitness = self.state.best_fitness_value(),
                stalled,
                "generation complete"
            );
        }
    }

    fn finish(&mut self, termination: Termination) -> Termination {
        self.termination = Some(termination);
        if self.options.get_log_level() != LogLevel::None {
            info!(
                generations = self.population.current_generation,
                best_fitness = self.state.best_fitness_value(),
                "optimization finished: {}",
                termination
            );
        }
        termination
    }

    pub fn solution_values(&self) -> &[f64] {
        self.state.solution_values()
    }

    pub fn best_fitness_value(&self) -> f64 {
        self.state.best_fitness_value()
    }

    /// Every best-so-far fitness of the last run, oldest first. The first
    /// entry is the `+inf` placeholder written by `initialize`.
    pub fn hall_of_fame(&self) -> &[f64] {
        self.state.hall_of_fame()
    }

    pub fn number_of_parameters(&self) -> usize {
        self.state.number_of_parameters()
    }

    pub fn parameters(&self) -> &ParameterSet {
        self.state.parameters()
    }

    /// Replaces the parameters. Takes effect on the next `fit`.
    ///
    /// # Errors
    ///
    /// Returns [`SresError::Configuration`] if `parameters` is empty.
    pub fn set_parameters(&mut self, parameters: ParameterSet) -> Result<()> {
        if parameters.is_empty() {
            return Err(SresError::Configuration(
                "At least one parameter is required".to_string(),
            ));
        }
        self.state.set_parameters(parameters);
        Ok(())
    }

    pub fn cost(&self) -> &F {
        self.state.cost()
    }

    pub fn set_cost(&mut self, cost: F) {
        self.state.set_cost(cost);
    }

    pub fn options(&self) -> &SresOptions {
        &self.options
    }

    pub fn population_size(&self) -> usize {
        self.options.get_population_size()
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.options.set_population_size(population_size);
    }

    pub fn child_rate(&self) -> usize {
        self.options.get_child_rate()
    }

    pub fn set_child_rate(&mut self, child_rate: usize) {
        self.options.set_child_rate(child_rate);
    }

    pub fn num_generations(&self) -> usize {
        self.options.get_num_generations()
    }

    pub fn set_num_generations(&mut self, num_generations: usize) {
        self.options.set_num_generations(num_generations);
    }

    pub fn stall_limit(&self) -> usize {
        self.options.get_stall_limit()
    }

    pub fn set_stall_limit(&mut self, stall_limit: usize) {
        self.options.set_stall_limit(stall_limit);
    }

    pub fn pf(&self) -> f64 {
        self.options.get_pf()
    }

    pub fn set_pf(&mut self, pf: f64) {
        self.options.set_pf(pf);
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.options.set_log_level(log_level);
    }

    pub fn current_generation(&self) -> usize {
        self.population.current_generation
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Restarts the random stream from `seed`.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng.set_seed(seed);
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// All population rows: parents first, then offspring.
    pub fn population(&self) -> &Matrix {
        &self.population.individuals
    }

    pub fn population_fitness(&self) -> &[f64] {
        &self.population.fitness
    }

    /// Per-individual, per-dimension step sizes, row-aligned with `population`.
    pub fn variance(&self) -> &Matrix {
        &self.variance
    }

    pub fn max_variance(&self) -> &[f64] {
        &self.max_variance
    }

    /// Bound-violation penalty of every population row; zero when feasible.
    pub fn phi_values(&self) -> &[f64] {
        &self.phi
    }

    /// The two self-adaptation learning rates, `(tau, tau_prime)`.
    pub fn learning_rates(&self) -> (f64, f64) {
        (self.tau, self.tau_prime)
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn report(&self) -> FitReport {
        FitReport {
            best_fitness: self.best_fitness_value(),
            solution: self.solution_values().to_vec(),
            hall_of_fame: self.hall_of_fame().to_vec(),
            generations: self.current_generation(),
            termination: self.termination,
        }
    }
}

impl<F: CostFunction, R: RandomStream> Optimizer for Sres<F, R> {
    fn initialize(&mut self) -> Result<()> {
        self.initialize_population()
    }

    fn creation(&mut self, first: usize) -> Result<()> {
        self.create_parents(first)
    }

    fn mutate(&mut self) -> Result<()> {
        self.mutate_offspring()
    }

    fn select(&mut self) {
        self.stochastic_ranking();
    }

    fn find_best_individual(&self) -> Option<usize> {
        self.best_feasible_parent()
    }

    fn fit(&mut self) -> Result<Termination> {
        self.initialize()?;
        self.creation(0)?;
        self.population.current_generation = 1;

        let mut proceed = self.record_best(0);

        if proceed {
            if let Some(best) = self.find_best_individual() {
                if self.population.fitness[best] < self.state.best_fitness_value() {
                    proceed = self.record_best(best);
                }
            }
        }

        let termination = if proceed {
            self.evolve()?
        } else {
            Termination::NegativeInfinity
        };
        Ok(self.finish(termination))
    }
}
