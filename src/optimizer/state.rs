use super::cost::CostFunction;
use crate::domain::ParameterSet;
use crate::rng::Matrix;

/// Bookkeeping shared by every optimizer: the cost function, the parameters it
/// is evaluated over, and the best result found so far.
#[derive(Debug, Clone)]
pub struct OptimizerState<F> {
    cost: F,
    parameters: ParameterSet,
    /// Fitness of the most recent evaluation.
    fitness_value: f64,
    best_fitness_value: f64,
    solution_values: Vec<f64>,
    /// Every best-so-far fitness, in the order it was found.
    hall_of_fame: Vec<f64>,
}

impl<F: CostFunction> OptimizerState<F> {
    pub fn new(cost: F, parameters: ParameterSet) -> Self {
        Self {
            cost,
            parameters,
            fitness_value: f64::INFINITY,
            best_fitness_value: f64::INFINITY,
            solution_values: Vec::new(),
            hall_of_fame: Vec::new(),
        }
    }

    /// Scores `individual` with the cost function and remembers the result as
    /// the latest fitness.
    pub fn evaluate(&mut self, individual: &[f64]) -> f64 {
        self.fitness_value = self.cost.cost(individual);
        self.fitness_value
    }

    /// Records `value` as the new best fitness and appends it to the hall of
    /// fame. `variables` replaces the stored solution, and the current value of
    /// every parameter, unless it is empty.
    ///
    /// Returns `false` when `value` is negative infinity, the signal to stop.
    pub fn set_solution(&mut self, value: f64, variables: &[f64]) -> bool {
        self.best_fitness_value = value;
        self.hall_of_fame.push(value);

        if !variables.is_empty() {
            self.solution_values = variables.to_vec();
            self.parameters.set_values(variables);
        }

        value != f64::NEG_INFINITY
    }

    /// Forgets the results of a previous run and puts every parameter back on
    /// its starting value.
    pub fn reset(&mut self) {
        let starting_values = self.parameters.starting_values();
        self.parameters.set_values(&starting_values);
        self.fitness_value = f64::INFINITY;
        self.best_fitness_value = f64::INFINITY;
        self.solution_values.clear();
        self.hall_of_fame.clear();
    }

    pub fn cost(&self) -> &F {
        &self.cost
    }

    pub fn set_cost(&mut self, cost: F) {
        self.cost = cost;
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: ParameterSet) {
        self.parameters = parameters;
    }

    pub fn number_of_parameters(&self) -> usize {
        self.parameters.len()
    }

    pub fn fitness_value(&self) -> f64 {
        self.fitness_value
    }

    pub fn best_fitness_value(&self) -> f64 {
        self.best_fitness_value
    }

    pub fn solution_values(&self) -> &[f64] {
        &self.solution_values
    }

    pub fn hall_of_fame(&self) -> &[f64] {
        &self.hall_of_fame
    }
}

/// Population-level state of an evolutionary optimizer.
///
/// Rows `[0, population_size)` of `individuals` are the parents; the rest are
/// the offspring of the current generation. `fitness` runs parallel to the rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvolutionState {
    pub individuals: Matrix,
    pub fitness: Vec<f64>,
    pub current_generation: usize,
}

impl EvolutionState {
    /// Replaces the population with `rows` zeroed individuals of `width`
    /// parameters, all at infinite fitness.
    pub fn resize(&mut self, rows: usize, width: usize) {
        self.individuals = vec![vec![0.0; width]; rows];
        self.fitness = vec![f64::INFINITY; rows];
        self.current_generation = 0;
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }
}
