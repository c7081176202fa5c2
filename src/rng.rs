//! # Random streams
//!
//! Every stochastic operator in the optimizer draws from a [`RandomStream`].
//! The stream is owned by the optimizer instance, so two optimizers never share
//! state unless they are explicitly built that way.
//!
//! ## Example
//!
//! ```rust
//! use sres::rng::{RandomNumberGenerator, RandomStream};
//!
//! let mut rng = RandomNumberGenerator::from_seed(4);
//! let draws = rng.uniform_reals(0.0, 1.0, 5);
//!
//! for number in draws {
//!     assert!((0.0..1.0).contains(&number));
//! }
//! ```
//!
//! ## Process-wide stream
//!
//! For callers that want a single stream shared by the whole process, the
//! module keeps one behind a mutex. [`SharedRng`] is a handle onto it that
//! implements [`RandomStream`], so it can be handed to an optimizer like any
//! other stream:
//!
//! ```rust
//! use sres::rng::{self, RandomStream, SharedRng};
//!
//! rng::set_default_seed(7);
//! let first = SharedRng.uniform_real(0.0, 1.0);
//!
//! rng::set_default_seed(7);
//! assert_eq!(first, SharedRng.uniform_real(0.0, 1.0));
//! ```

use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::{Result, SresError};

/// A row-major matrix of samples, one row per individual.
pub type Matrix = Vec<Vec<f64>>;

/// Source of the random numbers consumed by the optimizer.
///
/// Implementors supply the four primitive draws plus seeding; vector forms and
/// Latin Hypercube sampling are built on top of them.
pub trait RandomStream {
    /// Returns the seed the stream was last (re)started from.
    fn seed(&self) -> u64;

    /// Reseeds the stream. The generator is recreated, so the sequence that
    /// follows is fully determined by `seed`.
    fn set_seed(&mut self, seed: u64);

    /// Uniform draw from `[lo, hi)`. Returns `lo` when the interval is empty.
    fn uniform_real(&mut self, lo: f64, hi: f64) -> f64;

    /// Uniform integer from `[lo, hi]`, both ends inclusive. Returns `lo` when
    /// `hi < lo`.
    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64;

    /// Normal deviate with mean `mu` and standard deviation `sigma`.
    fn normal(&mut self, mu: f64, sigma: f64) -> f64;

    /// Shuffles `values` in place.
    fn shuffle(&mut self, values: &mut [f64]);

    fn uniform_reals(&mut self, lo: f64, hi: f64, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.uniform_real(lo, hi)).collect()
    }

    fn uniform_ints(&mut self, lo: i64, hi: i64, n: usize) -> Vec<i64> {
        (0..n).map(|_| self.uniform_int(lo, hi)).collect()
    }

    fn normals(&mut self, mu: f64, sigma: f64, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.normal(mu, sigma)).collect()
    }

    /// Latin Hypercube sample of shape `n_population x n_params` on `[0, 1)`.
    ///
    /// Each column is split into `n_population` equal strata and holds exactly
    /// one draw per stratum. Columns are shuffled independently of each other.
    fn latin_hypercube(&mut self, n_population: usize, n_params: usize) -> Matrix {
        if n_population == 0 {
            return Vec::new();
        }
        let segment = 1.0 / n_population as f64;

        let mut samples: Matrix = (0..n_population)
            .map(|i| {
                let offset = i as f64 / n_population as f64;
                self.uniform_reals(0.0, 1.0, n_params)
                    .into_iter()
                    .map(|u| u * segment + offset)
                    .collect()
            })
            .collect();

        for j in 0..n_params {
            let mut column: Vec<f64> = samples.iter().map(|row| row[j]).collect();
            self.shuffle(&mut column);
            for (row, value) in samples.iter_mut().zip(column) {
                row[j] = value;
            }
        }

        samples
    }

    /// Latin Hypercube sample mapped onto the per-dimension ranges `[lb, ub)`.
    ///
    /// With `sample_in_logspace` the strata are laid out over
    /// `[log10 lb, log10 ub)` and the result is raised back to linear space, so
    /// every bound must be strictly positive.
    ///
    /// # Errors
    ///
    /// Returns an error if `lb` or `ub` does not have `n_params` entries, or if
    /// log-space sampling is requested over a non-positive bound.
    fn latin_hypercube_bounded(
        &mut self,
        n_population: usize,
        n_params: usize,
        lb: &[f64],
        ub: &[f64],
        sample_in_logspace: bool,
    ) -> Result<Matrix> {
        if lb.len() != n_params || ub.len() != n_params {
            return Err(SresError::Configuration(format!(
                "Latin hypercube needs {} bounds per side, got {} lower and {} upper",
                n_params,
                lb.len(),
                ub.len()
            )));
        }

        let ranges = lb
            .iter()
            .zip(ub)
            .enumerate()
            .map(|(index, (&lower, &upper))| {
                if sample_in_logspace {
                    if lower <= 0.0 || upper <= 0.0 {
                        return Err(SresError::InvalidBounds {
                            index,
                            lower,
                            upper,
                        });
                    }
                    Ok((lower.log10(), upper.log10()))
                } else {
                    Ok((lower, upper))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let mut samples = self.latin_hypercube(n_population, n_params);
        for row in samples.iter_mut() {
            for (value, &(lower, upper)) in row.iter_mut().zip(&ranges) {
                let scaled = lower + *value * (upper - lower);
                *value = if sample_in_logspace {
                    10f64.powf(scaled)
                } else {
                    scaled
                };
            }
        }

        Ok(samples)
    }
}

/// A wrapper around the `rand` crate's `StdRng` that remembers its seed.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
    seed: u64,
}

impl RandomNumberGenerator {
    /// Creates a generator seeded from the system clock.
    ///
    /// Runs started this way are not reproducible unless the seed is read back
    /// with [`RandomStream::seed`] or replaced with [`RandomStream::set_seed`].
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        Self::from_seed(seed)
    }

    /// Creates a generator with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomStream for RandomNumberGenerator {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn uniform_real(&mut self, lo: f64, hi: f64) -> f64 {
        if !(lo < hi) || !(hi - lo).is_finite() {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64 {
        if hi < lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    fn normal(&mut self, mu: f64, sigma: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mu + sigma * z
    }

    fn shuffle(&mut self, values: &mut [f64]) {
        values.shuffle(&mut self.rng);
    }
}

static DEFAULT_RNG: OnceLock<Mutex<RandomNumberGenerator>> = OnceLock::new();

/// Runs `f` against the process-wide generator.
///
/// The generator is created, clock-seeded, on first use. Calls from several
/// threads are serialized by the mutex, but their interleaving still decides
/// which thread sees which numbers.
pub fn with_default_rng<T>(f: impl FnOnce(&mut RandomNumberGenerator) -> T) -> T {
    let stream = DEFAULT_RNG.get_or_init(|| Mutex::new(RandomNumberGenerator::new()));
    let mut guard = stream.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Reseeds the process-wide generator.
pub fn set_default_seed(seed: u64) {
    with_default_rng(|rng| rng.set_seed(seed));
}

/// Handle onto the process-wide generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SharedRng;

impl RandomStream for SharedRng {
    fn seed(&self) -> u64 {
        with_default_rng(|rng| rng.seed())
    }

    fn set_seed(&mut self, seed: u64) {
        set_default_seed(seed);
    }

    fn uniform_real(&mut self, lo: f64, hi: f64) -> f64 {
        with_default_rng(|rng| rng.uniform_real(lo, hi))
    }

    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64 {
        with_default_rng(|rng| rng.uniform_int(lo, hi))
    }

    fn normal(&mut self, mu: f64, sigma: f64) -> f64 {
        with_default_rng(|rng| rng.normal(mu, sigma))
    }

    fn shuffle(&mut self, values: &mut [f64]) {
        with_default_rng(|rng| rng.shuffle(values));
    }
}
