//! # ficc Math
//!
//! Root finders used by the yield solver.
//!
//! Every solver here works on a bracket `[lo, hi]` with a sign change, so a failed
//! solve always has a well-defined best estimate to report.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::solvers::{
        bisection, brent, newton_bracketed, SolverConfig, SolverMethod, SolverResult,
    };
}

pub use error::{MathError, MathResult};
