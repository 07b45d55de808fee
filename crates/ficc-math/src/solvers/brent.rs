//! Brent's root-finding algorithm.

use super::{check_bracket, Bracket, SolverConfig, SolverResult};
use crate::error::{MathError, MathResult};

/// Brent's root-finding algorithm.
///
/// Tries inverse quadratic interpolation or a secant step and falls back to
/// bisection whenever the interpolated point is not clearly better. The root
/// stays bracketed by `[b, c]` throughout.
///
/// Requires: `f(a) * f(b) < 0` (opposite signs at endpoints)
///
/// # Example
///
/// ```rust
/// use ficc_math::solvers::{brent, SolverConfig};
///
/// // Find root of x^3 - x - 2
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((f(result.root)).abs() < 1e-10);
/// ```
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b, mut fa, mut fb) = match check_bracket(&f, a, b, config)? {
        Bracket::Root(done) => return Ok(done),
        Bracket::Straddle { lo, hi, f_lo, f_hi } => (lo, hi, f_lo, f_hi),
    };

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=config.max_iterations {
        // Keep the root between b and c
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        // b is the best estimate so far
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.x_tolerance;
        let m = 0.5 * (c - b);

        if fb.abs() <= config.tolerance || m.abs() <= tol {
            return Ok(SolverResult {
                root: b,
                iterations: iteration - 1,
                residual: fb,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant
                (2.0 * m * s, 1.0 - s)
            } else {
                // Inverse quadratic interpolation
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let limit = (3.0 * m * q - (tol * q).abs()).min((e * q).abs());
            if 2.0 * p < limit {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = d;
            }
        } else {
            d = m;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b);
        log::trace!("brent iteration {iteration}: b={b:.12e} f={fb:.3e}");
    }

    Err(MathError::convergence_failed(config.max_iterations, fb, b))
}
