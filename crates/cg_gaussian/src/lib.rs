//! Gaussian factors in canonical (information) form.
//!
//! A [`Gaussian`] is an unnormalized Gaussian function over a named scope of
//! scalar variables
//!
//! `exp(-½ xᵀ K x + hᵀ x + g)`
//!
//! Products and quotients of such functions add and subtract their canonical
//! parameters, which is what makes the canonical form the natural choice for
//! message passing.

mod error;
pub mod factor;
pub mod gaussian;

pub use error::{GaussianError, Result};
pub use factor::{GaussianFactorLike, DEFAULT_FACTOR_ATOL, DEFAULT_FACTOR_RTOL};
pub use gaussian::Gaussian;

/// Name of a scalar random variable.
pub type VariableName = smol_str::SmolStr;

pub mod prelude {
    pub use super::{
        Gaussian, GaussianError, GaussianFactorLike, VariableName, DEFAULT_FACTOR_ATOL,
        DEFAULT_FACTOR_RTOL,
    };
}
