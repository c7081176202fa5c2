use crate::error::{Result, SresError};

/// Where a value sits relative to a parameter's bounds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundCheck {
    Below,
    Within,
    Above,
}

impl BoundCheck {
    /// The classification as `-1`, `0` or `1`.
    pub fn signum(self) -> i8 {
        match self {
            BoundCheck::Below => -1,
            BoundCheck::Within => 0,
            BoundCheck::Above => 1,
        }
    }
}

/// One estimated variable: its bounds, where the search starts, and the value
/// it currently holds.
///
/// The current value starts at the starting value. While an optimizer runs it
/// holds this parameter's coordinate of the best solution found so far, so
/// [`Parameter::check_constraint`] classifies that solution.
///
/// When built in log space the bounds and the starting value are stored as
/// base-10 logarithms, and every value the optimizer hands to the cost
/// function for this parameter is a log-space value as well.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    value: f64,
    starting_value: f64,
    lower_bound: f64,
    upper_bound: f64,
    logspace: bool,
}

impl Parameter {
    /// Creates a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`SresError::InvalidBounds`] if any input is NaN or infinite, if the lower
    /// bound exceeds the upper bound, or if `logspace` is requested for a
    /// non-positive bound or starting value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sres::domain::Parameter;
    ///
    /// let p = Parameter::new(0.5, 0.1, 10.0, true).unwrap();
    /// assert!((p.lower_bound() + 1.0).abs() < 1e-12);
    /// assert!((p.upper_bound() - 1.0).abs() < 1e-12);
    /// ```
    pub fn new(starting_value: f64, lower_bound: f64, upper_bound: f64, logspace: bool) -> Result<Self> {
        Self::checked(0, starting_value, lower_bound, upper_bound, logspace)
    }

    pub(crate) fn checked(
        index: usize,
        starting_value: f64,
        lower_bound: f64,
        upper_bound: f64,
        logspace: bool,
    ) -> Result<Self> {
        let invalid = || SresError::InvalidBounds {
            index,
            lower: lower_bound,
            upper: upper_bound,
        };

        if !(starting_value.is_finite() && lower_bound.is_finite() && upper_bound.is_finite()) {
            return Err(invalid());
        }
        if lower_bound > upper_bound {
            return Err(invalid());
        }

        let (starting_value, lower_bound, upper_bound) = if logspace {
            if starting_value <= 0.0 || lower_bound <= 0.0 || upper_bound <= 0.0 {
                return Err(invalid());
            }
            (starting_value.log10(), lower_bound.log10(), upper_bound.log10())
        } else {
            (starting_value, lower_bound, upper_bound)
        };

        Ok(Self {
            value: starting_value,
            starting_value,
            lower_bound,
            upper_bound,
            logspace,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn starting_value(&self) -> f64 {
        self.starting_value
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn is_logspace(&self) -> bool {
        self.logspace
    }

    /// Classifies the parameter's current value against its bounds.
    pub fn check_constraint(&self) -> BoundCheck {
        self.check_constraint_value(self.value)
    }

    /// Classifies `value` against the bounds. Both bounds are inclusive.
    pub fn check_constraint_value(&self, value: f64) -> BoundCheck {
        if self.lower_bound > value {
            BoundCheck::Below
        } else if value > self.upper_bound {
            BoundCheck::Above
        } else {
            BoundCheck::Within
        }
    }

    pub fn check_lower_bound(&self, value: f64) -> bool {
        self.lower_bound <= value
    }

    pub fn check_upper_bound(&self, value: f64) -> bool {
        value <= self.upper_bound
    }

    /// Moves `value` strictly inside the bounds.
    ///
    /// Values past a bound are first clamped onto it. A value sitting exactly
    /// on a bound is then pushed one relative epsilon inwards, or to the
    /// smallest positive normal number when the bound is zero. A degenerate
    /// interval (`lower == upper`) has no interior and returns the bound. NaN
    /// maps to the midpoint.
    pub fn nudge_inside(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.midpoint();
        }
        let clamped = match self.check_constraint_value(value) {
            BoundCheck::Below => self.lower_bound,
            BoundCheck::Above => self.upper_bound,
            BoundCheck::Within => value,
        };

        if self.lower_bound >= self.upper_bound {
            return self.lower_bound;
        }

        let nudged = if clamped <= self.lower_bound {
            if clamped == 0.0 {
                f64::MIN_POSITIVE
            } else {
                clamped + clamped.abs() * f64::EPSILON
            }
        } else if clamped >= self.upper_bound {
            if clamped == 0.0 {
                -f64::MIN_POSITIVE
            } else {
                clamped - clamped.abs() * f64::EPSILON
            }
        } else {
            return clamped;
        };

        if nudged > self.lower_bound && nudged < self.upper_bound {
            nudged
        } else {
            self.midpoint()
        }
    }

    pub fn midpoint(&self) -> f64 {
        self.lower_bound * 0.5 + self.upper_bound * 0.5
    }
}
