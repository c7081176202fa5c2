//! # Parameter domain
//!
//! The search space of the optimizer: one [`Parameter`] per estimated variable,
//! collected in a [`ParameterSet`]. Both are plain value objects that validate
//! on construction and classify values against their bounds.
pub mod parameter;
pub mod parameter_set;

pub use parameter::{BoundCheck, Parameter};
pub use parameter_set::ParameterSet;
