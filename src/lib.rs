pub mod domain;
pub mod error;
pub mod optimizer;
pub mod rng;
pub mod sres;

// Re-export commonly used types for convenience
pub use domain::{BoundCheck, Parameter, ParameterSet};
pub use error::{Result, SresError};
pub use optimizer::{CostFunction, FitReport, LogLevel, Optimizer, SresOptions, Termination};
pub use rng::{RandomNumberGenerator, RandomStream, SharedRng};
pub use sres::Sres;
