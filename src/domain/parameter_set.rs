use std::ops::Index;

use super::parameter::Parameter;
use crate::error::{Result, SresError};

/// Ordered, fixed-length collection of the parameters being estimated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
}

impl ParameterSet {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    /// Builds the set index by index from three parallel vectors.
    ///
    /// # Errors
    ///
    /// Returns [`SresError::LengthMismatch`] if the vectors differ in length,
    /// or [`SresError::InvalidBounds`] for the first parameter whose bounds are
    /// rejected by [`Parameter::new`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use sres::domain::ParameterSet;
    ///
    /// let set = ParameterSet::from_vectors(&[0.4, 0.5], &[0.1, 0.1], &[10.0, 10.0], false).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.upper_bounds(), vec![10.0, 10.0]);
    /// ```
    pub fn from_vectors(
        starting_values: &[f64],
        lower_bounds: &[f64],
        upper_bounds: &[f64],
        logspace: bool,
    ) -> Result<Self> {
        if starting_values.len() != lower_bounds.len() || lower_bounds.len() != upper_bounds.len() {
            return Err(SresError::LengthMismatch {
                starting_values: starting_values.len(),
                lower_bounds: lower_bounds.len(),
                upper_bounds: upper_bounds.len(),
            });
        }

        starting_values
            .iter()
            .zip(lower_bounds)
            .zip(upper_bounds)
            .enumerate()
            .map(|(index, ((&start, &lower), &upper))| {
                Parameter::checked(index, start, lower, upper, logspace)
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.parameters.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn lower_bounds(&self) -> Vec<f64> {
        self.parameters.iter().map(Parameter::lower_bound).collect()
    }

    pub fn upper_bounds(&self) -> Vec<f64> {
        self.parameters.iter().map(Parameter::upper_bound).collect()
    }

    pub fn starting_values(&self) -> Vec<f64> {
        self.parameters.iter().map(Parameter::starting_value).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.parameters.iter().map(Parameter::value).collect()
    }

    /// Copies `values` into the parameters' current values. Extra entries on
    /// either side are ignored.
    pub fn set_values(&mut self, values: &[f64]) {
        for (parameter, &value) in self.parameters.iter_mut().zip(values) {
            parameter.set_value(value);
        }
    }
}

impl Index<usize> for ParameterSet {
    type Output = Parameter;

    fn index(&self, index: usize) -> &Self::Output {
        &self.parameters[index]
    }
}

impl FromIterator<Parameter> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}
