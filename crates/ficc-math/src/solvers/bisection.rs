//! Bisection method.

use super::{check_bracket, Bracket, SolverConfig, SolverResult};
use crate::error::{MathError, MathResult};

/// Bisection root-finding algorithm.
///
/// Halves the bracket until `|f(mid)|` meets `config.tolerance` or the bracket is
/// narrower than `config.x_tolerance`.
///
/// # Example
///
/// ```rust
/// use ficc_math::solvers::{bisection, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi, mut f_lo) = match check_bracket(&f, a, b, config)? {
        Bracket::Root(done) => return Ok(done),
        Bracket::Straddle { lo, hi, f_lo, .. } => (lo, hi, f_lo),
    };

    let mut mid = 0.5 * (lo + hi);
    let mut f_mid = f64::NAN;

    for iteration in 1..=config.max_iterations {
        mid = 0.5 * (lo + hi);
        f_mid = f(mid);
        log::trace!("bisection iteration {iteration}: [{lo:.12e}, {hi:.12e}] f(mid)={f_mid:.3e}");

        if f_mid.abs() <= config.tolerance || 0.5 * (hi - lo) <= config.x_tolerance {
            return Ok(SolverResult {
                root: mid,
                iterations: iteration,
                residual: f_mid,
            });
        }

        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    Err(MathError::convergence_failed(config.max_iterations, f_mid, mid))
}
