//! Newton-Raphson restricted to a bracket.

use super::{check_bracket, Bracket, SolverConfig, SolverResult};
use crate::error::{MathError, MathResult};

/// Newton-Raphson with a bisection safeguard.
///
/// Each iteration shrinks the bracket `[lo, hi]` around the sign change, then takes
/// the Newton step if it lands strictly inside the bracket and bisects otherwise.
/// Converges quadratically near a simple root and can never leave the bracket.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of `f`
/// * `a`, `b` - The bracket; `f(a)` and `f(b)` must differ in sign
/// * `initial_guess` - Starting point; the midpoint is used when it lies outside
/// * `config` - Solver configuration
///
/// # Example
///
/// ```rust
/// use ficc_math::solvers::{newton_bracketed, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton_bracketed(f, df, 0.0, 2.0, 1.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_bracketed<F, D>(
    f: F,
    df: D,
    a: f64,
    b: f64,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let (lo, hi, f_lo) = match check_bracket(&f, a, b, config)? {
        Bracket::Root(done) => return Ok(done),
        Bracket::Straddle { lo, hi, f_lo, .. } => (lo, hi, f_lo),
    };

    // Orient so that f(negative) < 0 < f(positive)
    let (mut negative, mut positive) = if f_lo < 0.0 { (lo, hi) } else { (hi, lo) };

    let mut x = if initial_guess > lo && initial_guess < hi {
        initial_guess
    } else {
        0.5 * (lo + hi)
    };
    let mut fx = f(x);

    for iteration in 1..=config.max_iterations {
        if fx.abs() <= config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration - 1,
                residual: fx,
            });
        }

        if fx < 0.0 {
            negative = x;
        } else {
            positive = x;
        }
        let (low, high) = (negative.min(positive), negative.max(positive));

        let derivative = df(x);
        let newton = x - fx / derivative;
        let bisected = !(newton.is_finite() && newton > low && newton < high);
        let next = if bisected { 0.5 * (low + high) } else { newton };

        log::trace!(
            "newton iteration {iteration}: x={x:.12e} f={fx:.3e} -> {next:.12e}{}",
            if bisected { " (bisect)" } else { "" }
        );

        let step = next - x;
        x = next;
        fx = f(x);

        if step.abs() <= config.x_tolerance || high - low <= config.x_tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }
    }

    Err(MathError::convergence_failed(config.max_iterations, fx, x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let df = |x: f64| 2.0 * x;
        let result = newton_bracketed(f, df, 0.0, 2.0, 1.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
        assert!(result.iterations < 10);
    }

    #[test]
    fn test_zero_derivative_falls_back_to_bisection() {
        // Starting on the stationary point of x^3 - 3x would divide by zero
        let f = |x: f64| x * x * x - 3.0 * x - 3.0;
        let df = |x: f64| 3.0 * x * x - 3.0;
        let result = newton_bracketed(f, df, 1.0, 3.0, 1.0, &SolverConfig::default()).unwrap();
        assert!(f(result.root).abs() < 1e-10);
        assert!((1.0..=3.0).contains(&result.root));
    }

    #[test]
    fn test_overshooting_newton_stays_in_bracket() {
        // arctan sends plain Newton from x0 = 2 off to infinity
        let f = |x: f64| x.atan();
        let df = |x: f64| 1.0 / (1.0 + x * x);
        let result = newton_bracketed(f, df, -1.0, 3.0, 2.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_wrong_derivative_still_converges() {
        let f = |x: f64| x * x - 2.0;
        let df = |_x: f64| -1.0;
        let result = newton_bracketed(f, df, 0.0, 2.0, 1.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x + 1.0;
        let df = |x: f64| 2.0 * x;
        let err = newton_bracketed(f, df, -1.0, 1.0, 0.5, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::InvalidBracket { .. }));
    }

    #[test]
    fn test_iteration_cap() {
        let f = |x: f64| x * x - 2.0;
        let df = |_x: f64| 0.0;
        let config = SolverConfig::default().with_max_iterations(3);
        let err = newton_bracketed(f, df, 0.0, 2.0, 1.0, &config).unwrap_err();
        match err {
            MathError::ConvergenceFailed {
                iterations,
                last_estimate,
                ..
            } => {
                assert_eq!(iterations, 3);
                assert!((0.0..=2.0).contains(&last_estimate));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
