//! Bracketed root-finding algorithms.
//!
//! - [`newton_bracketed`]: Newton-Raphson that falls back to bisection whenever a
//!   step would leave the current bracket
//! - [`brent`]: inverse quadratic interpolation with bisection safeguard
//! - [`bisection`]: slow and certain
//!
//! All three require `f(lo)` and `f(hi)` to have opposite signs and keep the root
//! bracketed for the whole run. On failure the error carries the last estimate.
//!
//! # Example: Yield Calculation
//!
//! ```rust
//! use ficc_math::solvers::{SolverConfig, SolverMethod};
//!
//! // 5% annual coupon, 5 years, price 95
//! let price_fn = |y: f64| {
//!     let mut pv = 0.0;
//!     for t in 1..=5 {
//!         pv += 5.0 / (1.0 + y).powi(t);
//!     }
//!     pv += 100.0 / (1.0 + y).powi(5);
//!     pv - 95.0
//! };
//! let d_price_fn = |y: f64| {
//!     let mut dpv = 0.0;
//!     for t in 1..=5 {
//!         dpv -= f64::from(t) * 5.0 / (1.0 + y).powi(t + 1);
//!     }
//!     dpv - 5.0 * 100.0 / (1.0 + y).powi(6)
//! };
//!
//! let result = SolverMethod::Newton
//!     .solve(price_fn, d_price_fn, -0.5, 1.0, 0.05, &SolverConfig::default())
//!     .unwrap();
//! assert!(result.root > 0.05);
//! ```

mod bisection;
mod brent;
mod newton;

pub use bisection::bisection;
pub use brent::brent;
pub use newton::newton_bracketed;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MathError, MathResult};

/// Default tolerance on the function value.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default tolerance on the width of the remaining bracket.
pub const DEFAULT_X_TOLERANCE: f64 = 1e-12;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Converged once `|f(x)|` is at or below this.
    pub tolerance: f64,
    /// Converged once the step or the bracket is at or below this.
    pub x_tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            x_tolerance: DEFAULT_X_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Sets the function value tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the argument tolerance.
    #[must_use]
    pub fn with_x_tolerance(mut self, x_tolerance: f64) -> Self {
        self.x_tolerance = x_tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Rejects non-positive tolerances and a zero iteration cap.
    pub fn validate(&self) -> MathResult<()> {
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(MathError::invalid_input(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.x_tolerance > 0.0 && self.x_tolerance.is_finite()) {
            return Err(MathError::invalid_input(format!(
                "x_tolerance must be positive, got {}",
                self.x_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(MathError::invalid_input("max_iterations must be at least 1"));
        }
        Ok(())
    }
}

/// Result of a root-finding operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Function value at the root.
    pub residual: f64,
}

/// Selects the algorithm used by [`SolverMethod::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverMethod {
    /// Safeguarded Newton-Raphson using the analytic derivative.
    #[default]
    Newton,
    /// Brent's method, derivative ignored.
    Brent,
    /// Plain bisection, derivative ignored.
    Bisection,
}

impl SolverMethod {
    /// Finds a root of `f` inside `[lo, hi]`.
    ///
    /// `initial_guess` is only used by Newton; a guess outside the bracket starts
    /// from the midpoint.
    pub fn solve<F, D>(
        self,
        f: F,
        df: D,
        lo: f64,
        hi: f64,
        initial_guess: f64,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        match self {
            SolverMethod::Newton => newton_bracketed(f, df, lo, hi, initial_guess, config),
            SolverMethod::Brent => brent(f, lo, hi, config),
            SolverMethod::Bisection => bisection(f, lo, hi, config),
        }
    }

    /// Lowercase name, as used in configuration files.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SolverMethod::Newton => "newton",
            SolverMethod::Brent => "brent",
            SolverMethod::Bisection => "bisection",
        }
    }
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newton" | "newton-raphson" | "safeguarded-newton" => Ok(SolverMethod::Newton),
            "brent" => Ok(SolverMethod::Brent),
            "bisection" | "bisect" => Ok(SolverMethod::Bisection),
            other => Err(MathError::invalid_input(format!("unknown solver method '{other}'"))),
        }
    }
}

/// Outcome of evaluating both ends of a bracket.
enum Bracket {
    /// An endpoint is already a root.
    Root(SolverResult),
    /// The ends straddle a root; `lo < hi`.
    Straddle { lo: f64, hi: f64, f_lo: f64, f_hi: f64 },
}

/// Orders a bracket and evaluates `f` at both ends.
fn check_bracket<F>(f: &F, lo: f64, hi: f64, config: &SolverConfig) -> MathResult<Bracket>
where
    F: Fn(f64) -> f64,
{
    if !(lo.is_finite() && hi.is_finite()) {
        return Err(MathError::invalid_input(format!(
            "bracket [{lo}, {hi}] is not finite"
        )));
    }
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let f_lo = f(lo);
    let f_hi = f(hi);

    for (x, fx) in [(lo, f_lo), (hi, f_hi)] {
        if fx.abs() <= config.tolerance {
            return Ok(Bracket::Root(SolverResult {
                root: x,
                iterations: 0,
                residual: fx,
            }));
        }
    }

    if f_lo.is_nan() || f_hi.is_nan() || f_lo * f_hi > 0.0 {
        return Err(MathError::invalid_bracket(lo, hi, f_lo, f_hi));
    }
    Ok(Bracket::Straddle { lo, hi, f_lo, f_hi })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cubic(x: f64) -> f64 {
        x * x * x - x - 2.0
    }

    fn cubic_derivative(x: f64) -> f64 {
        3.0 * x * x - 1.0
    }

    #[test]
    fn test_every_method_finds_the_same_root() {
        let config = SolverConfig::default();
        for method in [SolverMethod::Newton, SolverMethod::Brent, SolverMethod::Bisection] {
            let result = method
                .solve(cubic, cubic_derivative, 1.0, 2.0, 1.5, &config)
                .unwrap();
            assert_relative_eq!(result.root, 1.521_379_706_804_568, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("Brent".parse::<SolverMethod>().unwrap(), SolverMethod::Brent);
        assert_eq!("newton".parse::<SolverMethod>().unwrap(), SolverMethod::Newton);
        assert_eq!(SolverMethod::default(), SolverMethod::Newton);
        assert!("secant".parse::<SolverMethod>().is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(SolverConfig::default().validate().is_ok());
        assert!(SolverConfig::default().with_tolerance(0.0).validate().is_err());
        assert!(SolverConfig::default().with_max_iterations(0).validate().is_err());
        assert!(SolverConfig::default()
            .with_x_tolerance(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_endpoint_root_returns_immediately() {
        let f = |x: f64| x - 1.0;
        let result = brent(f, 1.0, 3.0, &SolverConfig::default()).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_reversed_bracket_is_accepted() {
        let f = |x: f64| x * x - 2.0;
        let result = bisection(f, 2.0, 1.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    proptest::proptest! {
        #[test]
        fn prop_all_methods_agree_on_shifted_exponential(target in 0.5f64..50.0) {
            let f = |x: f64| x.exp() - target;
            let df = |x: f64| x.exp();
            let config = SolverConfig::default();
            let expected = target.ln();
            for method in [SolverMethod::Newton, SolverMethod::Brent, SolverMethod::Bisection] {
                let result = method.solve(f, df, -5.0, 5.0, 0.0, &config).unwrap();
                proptest::prop_assert!((result.root - expected).abs() < 1e-9);
                proptest::prop_assert!((-5.0..=5.0).contains(&result.root));
            }
        }
    }
}
