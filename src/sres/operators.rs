use tracing::{trace, warn};

use super::Sres;
use crate::{
    domain::{BoundCheck, Parameter},
    error::{Result, SresError},
    optimizer::{CostFunction, LogLevel, DEFAULT_PF},
    rng::{Matrix, RandomStream},
};

/// Fallback step-size cap when the bound interval does not give a finite one.
const FALLBACK_MAX_VARIANCE: f64 = 1.0e3;
/// Trial mutations per dimension before the pre-mutation value is kept.
const MUTATION_RETRIES: usize = 10;
/// Decades a non-negative interval may span before sampling goes logarithmic.
const POSITIVE_DECADES: f64 = 1.8;
/// Same threshold for an interval straddling zero.
const STRADDLING_DECADES: f64 = 3.6;
const MAX_NORMAL_DRAWS: usize = 1000;

impl<F: CostFunction, R: RandomStream> Sres<F, R> {
    pub(super) fn initialize_population(&mut self) -> Result<()> {
        self.options.validate()?;
        let n = self.state.number_of_parameters();
        if n == 0 {
            return Err(SresError::Configuration(
                "At least one parameter is required".to_string(),
            ));
        }

        let pf = self.options.get_pf();
        if !(0.0..=1.0).contains(&pf) {
            self.options.set_pf(DEFAULT_PF);
        }

        let rows = self.options.get_num_offspring();
        self.population.resize(rows, n);
        self.variance = vec![vec![0.0; n]; rows];
        self.phi = vec![0.0; rows];

        let sqrt_n = (n as f64).sqrt();
        self.max_variance = self
            .state
            .parameters()
            .iter()
            .enumerate()
            .map(|(j, p)| {
                let max = (p.upper_bound() - p.lower_bound()) / sqrt_n;
                if max.is_finite() {
                    max
                } else {
                    warn!(parameter = j, "non-finite maximum variance, using {}", FALLBACK_MAX_VARIANCE);
                    FALLBACK_MAX_VARIANCE
                }
            })
            .collect();

        let varphi = 1.0;
        self.tau = varphi / (2.0 * sqrt_n).sqrt();
        self.tau_prime = varphi / (2.0 * n as f64).sqrt();

        self.termination = None;
        self.state.reset();
        self.state.set_solution(f64::INFINITY, &[]);
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        let rows = self.options.get_num_offspring();
        let n = self.state.number_of_parameters();
        let sized = self.population.len() == rows
            && self.variance.len() == rows
            && self.phi.len() == rows
            && self.max_variance.len() == n
            && self.population.individuals.iter().all(|row| row.len() == n);
        if sized {
            Ok(())
        } else {
            Err(SresError::EmptyPopulation)
        }
    }

    pub(super) fn create_parents(&mut self, first: usize) -> Result<()> {
        self.ensure_initialized()?;
        let population_size = self.options.get_population_size();
        let mut row = first;

        if row == 0 {
            for (j, p) in self.state.parameters().iter().enumerate() {
                let value = p.nudge_inside(p.starting_value());
                self.population.individuals[0][j] = value;
                self.variance[0][j] = initial_variance(p, value, self.max_variance.len());
            }
            self.evaluate_row(0);
            row = 1;
        }

        for i in row..population_size {
            for j in 0..self.state.number_of_parameters() {
                let p = &self.state.parameters()[j];
                let sampled = sample_within(p, &mut self.rng);
                let value = p.nudge_inside(sampled);
                self.population.individuals[i][j] = value;
                self.variance[i][j] = initial_variance(p, value, self.max_variance.len());
            }
            self.evaluate_row(i);
        }

        if self.options.get_log_level() == LogLevel::Verbose {
            trace!(first, population_size, "created parent rows");
        }
        Ok(())
    }

    /// Fills the parent rows with the best of `lhs_trials` Latin Hypercube
    /// batches, judged by summed fitness.
    pub(super) fn seed_from_latin_hypercube(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        let n = self.state.number_of_parameters();
        let lower = self.state.parameters().lower_bounds();
        let upper = self.state.parameters().upper_bounds();

        // `validate` guarantees at least one trial.
        let (mut best_total, mut batch, mut costs) = self.score_latin_hypercube(0, &lower, &upper)?;
        for trial in 1..self.options.get_lhs_trials() {
            let (total, candidate, candidate_costs) = self.score_latin_hypercube(trial, &lower, &upper)?;
            if total < best_total {
                best_total = total;
                batch = candidate;
                costs = candidate_costs;
            }
        }

        for (i, (row, cost)) in batch.into_iter().zip(costs).enumerate() {
            for (j, p) in self.state.parameters().iter().enumerate() {
                self.variance[i][j] = initial_variance(p, row[j], n);
            }
            self.population.individuals[i] = row;
            self.population.fitness[i] = cost;
            self.phi[i] = self.phi(i);
        }
        Ok(())
    }

    /// Draws one Latin Hypercube batch of parent rows, nudged strictly inside
    /// the bounds, and returns its summed fitness, the rows and their costs.
    fn score_latin_hypercube(
        &mut self,
        trial: usize,
        lower: &[f64],
        upper: &[f64],
    ) -> Result<(f64, Matrix, Vec<f64>)> {
        let population_size = self.options.get_population_size();
        let n = self.state.number_of_parameters();

        let batch: Matrix = self
            .rng
            .latin_hypercube_bounded(population_size, n, lower, upper, false)?
            .into_iter()
            .map(|row| {
                row.iter()
                    .zip(self.state.parameters())
                    .map(|(&value, p)| p.nudge_inside(value))
                    .collect()
            })
            .collect();
        let costs: Vec<f64> = batch.iter().map(|row| self.state.evaluate(row)).collect();
        let total: f64 = costs.iter().sum();

        if self.options.get_log_level() == LogLevel::Verbose {
            trace!(trial, total, "scored latin hypercube batch");
        }
        Ok((total, batch, costs))
    }

    /// Copies every parent `child_rate - 1` times into the offspring rows,
    /// averages each copy's step sizes with those of a random earlier row, then
    /// mutates the offspring.
    pub(super) fn replicate(&mut self) -> Result<()> {
        self.recombine()?;
        self.mutate_offspring()
    }

    /// The copy and step-size averaging half of [`Sres::replicate`]. Positions
    /// are copied unchanged.
    fn recombine(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        let population_size = self.options.get_population_size();
        let mut target = population_size;

        for i in 0..population_size {
            for _ in 1..self.options.get_child_rate() {
                let (parents, offspring) = self.population.individuals.split_at_mut(target);
                offspring[0].clone_from(&parents[i]);

                let donor = self.rng.uniform_int(0, (i + population_size - 1) as i64) as usize;
                let (head, tail) = self.variance.split_at_mut(target);
                let child = &mut tail[0];
                child.clone_from(&head[i]);
                for (sigma, &other) in child.iter_mut().zip(&head[donor]) {
                    *sigma = (*sigma + other) * 0.5;
                }

                target += 1;
            }
        }

        Ok(())
    }

    pub(super) fn mutate_offspring(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        let population_size = self.options.get_population_size();
        let rows = self.population.len();

        for i in population_size..rows {
            let v1 = self.rng.normal(0.0, 1.0);

            for j in 0..self.state.number_of_parameters() {
                let p = &self.state.parameters()[j];
                let original = self.population.individuals[i][j];

                let step = self.tau_prime * v1 + self.tau * self.rng.normal(0.0, 1.0);
                let sigma = (self.variance[i][j] * step.exp()).min(self.max_variance[j]);
                self.variance[i][j] = sigma;

                if !sigma.is_finite() {
                    warn!(row = i, parameter = j, "non-finite step size, resetting to midpoint");
                    self.population.individuals[i][j] = p.midpoint();
                    continue;
                }

                let accepted = (0..MUTATION_RETRIES)
                    .map(|_| original + sigma * self.rng.normal(0.0, 1.0))
                    .find(|&trial| p.check_constraint_value(trial) == BoundCheck::Within);
                self.population.individuals[i][j] = accepted.unwrap_or(original);
            }

            self.evaluate_row(i);
        }
        Ok(())
    }

    /// Summed squared distance of row `row` outside its bounds.
    pub(super) fn phi(&self, row: usize) -> f64 {
        self.population.individuals[row]
            .iter()
            .zip(self.state.parameters())
            .map(|(&value, p)| match p.check_constraint_value(value) {
                BoundCheck::Below => (p.lower_bound() - value).powi(2),
                BoundCheck::Above => (value - p.upper_bound()).powi(2),
                BoundCheck::Within => 0.0,
            })
            .sum()
    }

    /// Stochastic ranking bubble sort over the whole population.
    pub(super) fn stochastic_ranking(&mut self) {
        let total = self.population.len();
        if total < 2 {
            return;
        }
        let pf = self.options.get_pf();

        for _ in 0..total {
            let mut swapped = false;

            for j in 0..total - 1 {
                let both_feasible = self.phi[j] == 0.0 && self.phi[j + 1] == 0.0;
                let out_of_order = if both_feasible || self.rng.uniform_real(0.0, 1.0) < pf {
                    self.population.fitness[j] > self.population.fitness[j + 1]
                } else {
                    self.phi[j] > self.phi[j + 1]
                };

                if out_of_order {
                    self.swap(j, j + 1);
                    swapped = true;
                }
            }

            if !swapped {
                break;
            }
        }
    }

    /// Exchanges two rows across the population, variance, fitness and phi.
    fn swap(&mut self, a: usize, b: usize) {
        self.population.individuals.swap(a, b);
        self.variance.swap(a, b);
        self.population.fitness.swap(a, b);
        self.phi.swap(a, b);
    }

    pub(super) fn best_feasible_parent(&self) -> Option<usize> {
        let population_size = self.options.get_population_size().min(self.population.len());
        let mut best = None;
        let mut best_value = f64::MAX;

        for i in 0..population_size {
            let fitness = self.population.fitness[i];
            if fitness < best_value && self.phi[i] == 0.0 {
                best = Some(i);
                best_value = fitness;
            }
        }

        best
    }

    fn evaluate_row(&mut self, row: usize) {
        self.population.fitness[row] = self.state.evaluate(&self.population.individuals[row]);
        self.phi[row] = self.phi(row);
    }
}

/// Starting step size: distance to the nearer bound, scaled by `sqrt(n)`.
fn initial_variance(p: &Parameter, value: f64, n: usize) -> f64 {
    (p.upper_bound() - value).min(value - p.lower_bound()) / (n as f64).sqrt()
}

/// Draws a value for `p`, linearly or log-uniformly depending on how many
/// orders of magnitude its interval spans.
fn sample_within<R: RandomStream>(p: &Parameter, rng: &mut R) -> f64 {
    let (mn, mx) = (p.lower_bound(), p.upper_bound());

    let value = if 0.0 <= mn {
        sample_non_negative(mn, mx, rng)
    } else if mx > 0.0 {
        let decades = mx.log10() + (-mn).log10();
        if decades < STRADDLING_DECADES {
            mn + rng.uniform_real(0.0, 1.0) * (mx - mn)
        } else {
            let mean = (mx + mn) * 0.5;
            let sigma = mean * 0.01;
            (0..MAX_NORMAL_DRAWS)
                .map(|_| rng.normal(mean, sigma))
                .find(|&draw| !(draw < mn || draw > mx))
                .unwrap_or(mean)
        }
    } else {
        -sample_non_negative(-mx, -mn, rng)
    };

    if value.is_finite() {
        value
    } else {
        warn!(lower = mn, upper = mx, "sampling produced a non-finite value, using the midpoint");
        p.midpoint()
    }
}

fn sample_non_negative<R: RandomStream>(mn: f64, mx: f64, rng: &mut R) -> f64 {
    let floor = mn.max(f64::MIN_POSITIVE);
    let decades = mx.log10() - floor.log10();

    if decades < POSITIVE_DECADES || mn <= 0.0 {
        mn + rng.uniform_real(0.0, 1.0) * (mx - mn)
    } else {
        10f64.powf(floor.log10() + decades * rng.uniform_real(0.0, 1.0))
    }
}
