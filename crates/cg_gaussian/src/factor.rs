//! The capability a factor must expose to take part in cluster graph message
//! passing.

use cg_linalg::Float;

use crate::{Result, VariableName};

/// Default relative tolerance used when comparing factor parameters.
pub const DEFAULT_FACTOR_RTOL: Float = 1e-5;
/// Default absolute tolerance used when comparing factor parameters.
pub const DEFAULT_FACTOR_ATOL: Float = 1e-8;

/// Common interface of Gaussian factors.
///
/// The order of [`GaussianFactorLike::var_names`] defines the layout of the
/// parameters, but two factors over the same set of variables in a different
/// order describe the same function.
pub trait GaussianFactorLike: Clone + std::fmt::Debug + std::fmt::Display {
    /// The ordered scope of the factor.
    fn var_names(&self) -> &[VariableName];

    /// Number of variables in the scope.
    #[inline]
    fn dim(&self) -> usize {
        self.var_names().len()
    }

    /// Integrate out variables.
    /// With `keep = true` the result is over `vars`, in the order given,
    /// otherwise `vars` are integrated out.
    fn marginalize(&self, vars: &[VariableName], keep: bool) -> Result<Self>;

    /// Product of two factors. The scope of the result is the union of the
    /// two scopes.
    fn multiply(&self, other: &Self) -> Result<Self>;

    /// Quotient of two factors. The scope of the result is the union of the
    /// two scopes.
    fn divide(&self, other: &Self) -> Result<Self>;

    /// Condition on observed values, removing `vars` from the scope.
    fn reduce(&self, vars: &[VariableName], values: &[Float]) -> Result<Self>;

    /// Log of the integral of the factor.
    fn log_weight(&self) -> Result<Float>;

    /// `0.0` for a vacuous factor, `+inf` for any other.
    fn distance_from_vacuous(&self) -> Float;

    /// `D_KL(self || other)` between normalized versions of the two factors.
    fn kl_divergence(&self, other: &Self) -> Result<Float>;

    /// Compare parameters after aligning the variable order of `other` with
    /// `self`.
    fn equals(&self, other: &Self, rtol: Float, atol: Float) -> bool;

    /// Whether the factor carries no information (zero precision).
    fn is_vacuous(&self) -> bool;

    /// A factor with zero precision over `var_names`.
    fn vacuous(var_names: &[VariableName]) -> Self;

    /// A zero mean factor with isotropic `variance` over `var_names`. Carries
    /// almost no information for large variances.
    fn almost_vacuous(var_names: &[VariableName], variance: Float) -> Result<Self>;
}
