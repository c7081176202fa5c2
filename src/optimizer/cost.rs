/// The function being minimized.
///
/// The optimizer hands over one candidate vector at a time, in the same order
/// as the parameter set, and records the returned value as that candidate's
/// fitness. Lower is better. Returning `f64::NEG_INFINITY` tells the optimizer
/// to stop: it is treated as a sentinel, not as a solution to improve on.
///
/// Any closure `Fn(&[f64]) -> f64` is a cost function:
///
/// ```rust
/// use sres::optimizer::CostFunction;
///
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
/// assert_eq!(sphere.cost(&[1.0, 2.0]), 5.0);
/// ```
///
/// Evaluation must not depend on the optimizer's own state. A panic raised
/// while scoring is not caught and unwinds through the optimizer to the caller.
pub trait CostFunction {
    fn cost(&self, parameters: &[f64]) -> f64;
}

impl<F> CostFunction for F
where
    F: Fn(&[f64]) -> f64,
{
    fn cost(&self, parameters: &[f64]) -> f64 {
        self(parameters)
    }
}
