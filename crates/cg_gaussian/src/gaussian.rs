//! [`Gaussian`] in canonical form, with the algebra needed for message
//! passing.

use cg_linalg::prelude::*;
use itertools::Itertools;

use crate::{
    GaussianError, GaussianFactorLike, Result, VariableName, DEFAULT_FACTOR_ATOL,
    DEFAULT_FACTOR_RTOL,
};

/// `ln(2π)`
const LN_2PI: Float = 1.837_877_066_409_345_5;

/// Unnormalized Gaussian `exp(-½ xᵀ K x + hᵀ x + g)` over an ordered scope.
///
/// Row and column `i` of the precision `K`, and entry `i` of the information
/// vector `h`, belong to `var_names[i]`.
#[derive(Debug, Clone)]
pub struct Gaussian {
    var_names:   Vec<VariableName>,
    precision:   Matrix<Float>,
    information: Vector<Float>,
    g:           Float,
}

fn collect_var_names<S: Into<VariableName>>(
    var_names: impl IntoIterator<Item = S>,
) -> Result<Vec<VariableName>> {
    let var_names = var_names.into_iter().map(Into::into).collect_vec();
    if let Some(duplicate) = var_names.iter().duplicates().next() {
        return Err(GaussianError::DuplicateVariable(duplicate.clone()));
    }
    Ok(var_names)
}

fn check_dimensions(var_names: &[VariableName], vector: &Vector<Float>, matrix: &Matrix<Float>) -> Result<()> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(GaussianError::NonSquareMatrix(rows, cols));
    }
    if var_names.len() != vector.len() || var_names.len() != rows {
        return Err(GaussianError::DimensionMismatch {
            variables: var_names.len(),
            vector: vector.len(),
            rows,
            cols,
        });
    }
    Ok(())
}

impl Gaussian {
    /// Create a Gaussian directly from its canonical parameters.
    ///
    /// # Errors
    ///
    /// - if a variable appears more than once
    /// - if `precision` is not square
    /// - if the sizes of `precision` and `information` do not match the scope
    pub fn from_canonical<S: Into<VariableName>>(
        var_names: impl IntoIterator<Item = S>,
        precision: Matrix<Float>,
        information: Vector<Float>,
        g: Float,
    ) -> Result<Self> {
        let var_names = collect_var_names(var_names)?;
        check_dimensions(&var_names, &information, &precision)?;
        Ok(Self {
            var_names,
            precision,
            information,
            g,
        })
    }

    /// Create a Gaussian from a covariance matrix and mean vector, scaled so
    /// that the log of its integral is `log_weight`.
    ///
    /// # Errors
    ///
    /// Same as [`Gaussian::from_canonical`], and if `covariance` is not
    /// positive definite.
    pub fn from_covariance<S: Into<VariableName>>(
        var_names: impl IntoIterator<Item = S>,
        covariance: Matrix<Float>,
        mean: Vector<Float>,
        log_weight: Float,
    ) -> Result<Self> {
        let var_names = collect_var_names(var_names)?;
        check_dimensions(&var_names, &mean, &covariance)?;

        if !is_positive_definite(&covariance) {
            return Err(GaussianError::NotPositiveDefinite("covariance"));
        }
        let precision = inverse(&covariance).ok_or(GaussianError::NonInvertibleMatrix("covariance"))?;
        let log_det_covariance =
            log_det(&covariance).ok_or(GaussianError::NonPositiveDeterminant("covariance"))?;
        let information = precision.dot(&mean);
        let dim = var_names.len() as Float;
        let g = 0.5f64.mul_add(
            -dim.mul_add(LN_2PI, log_det_covariance),
            0.5f64.mul_add(-mean.dot(&information), log_weight),
        );

        Ok(Self {
            var_names,
            precision,
            information,
            g,
        })
    }

    #[inline]
    pub const fn precision(&self) -> &Matrix<Float> {
        &self.precision
    }

    #[inline]
    pub const fn information(&self) -> &Vector<Float> {
        &self.information
    }

    #[inline]
    pub const fn g(&self) -> Float {
        self.g
    }

    /// `K⁻¹`
    ///
    /// # Errors
    ///
    /// If the factor is vacuous or its precision is singular.
    pub fn covariance(&self) -> Result<Matrix<Float>> {
        if self.is_vacuous() {
            return Err(GaussianError::Vacuous(self.var_names.clone()));
        }
        inverse(&self.precision).ok_or(GaussianError::NonInvertibleMatrix("precision"))
    }

    /// `K⁻¹ h`
    ///
    /// # Errors
    ///
    /// Same as [`Gaussian::covariance`].
    pub fn mean(&self) -> Result<Vector<Float>> {
        Ok(self.covariance()?.dot(&self.information))
    }

    /// Positions of `vars` in the scope, in the order given.
    /// Every variable may be named at most once.
    fn indices_of(&self, vars: &[VariableName]) -> Result<Vec<usize>> {
        if let Some(duplicate) = vars.iter().duplicates().next() {
            return Err(GaussianError::DuplicateVariable(duplicate.clone()));
        }
        let mut indices = Vec::with_capacity(vars.len());
        let mut unknown = Vec::new();
        for var in vars {
            match self.var_names.iter().position(|v| v == var) {
                Some(index) => indices.push(index),
                None => unknown.push(var.clone()),
            }
        }
        if !unknown.is_empty() {
            return Err(GaussianError::UnknownVariables(unknown, self.var_names.clone()));
        }
        Ok(indices)
    }

    fn complement_of(&self, indices: &[usize]) -> Vec<usize> {
        (0..self.dim()).filter(|i| !indices.contains(i)).collect()
    }

    fn names_at(&self, indices: &[usize]) -> Vec<VariableName> {
        indices.iter().map(|&i| self.var_names[i].clone()).collect()
    }

    /// The same function with its parameters laid out in `order`.
    fn reordered(&self, order: &[VariableName]) -> Result<Self> {
        if order.len() != self.dim() {
            return Err(GaussianError::ScopeMismatch(self.var_names.clone(), order.to_vec()));
        }
        let indices = self.indices_of(order)?;
        Ok(Self {
            var_names:   order.to_vec(),
            precision:   submatrix(&self.precision, &indices, &indices),
            information: subvector(&self.information, &indices),
            g:           self.g,
        })
    }

    fn same_scope(&self, other: &Self) -> bool {
        self.dim() == other.dim() && other.var_names.iter().all(|v| self.var_names.contains(v))
    }

    /// Embed both factors in the union of their scopes and add `sign` times
    /// the parameters of `other` to those of `self`.
    fn absorb_or_cancel(&self, other: &Self, sign: Float) -> Self {
        let mut var_names = self.var_names.clone();
        let mut other_positions = Vec::with_capacity(other.dim());
        for name in &other.var_names {
            if let Some(position) = self.var_names.iter().position(|v| v == name) {
                other_positions.push(position);
            } else {
                other_positions.push(var_names.len());
                var_names.push(name.clone());
            }
        }

        let dim = var_names.len();
        let self_positions = (0..self.dim()).collect_vec();
        let precision = embed_matrix(&self.precision, &self_positions, dim)
            + embed_matrix(&other.precision, &other_positions, dim) * sign;
        let information = embed_vector(&self.information, &self_positions, dim)
            + embed_vector(&other.information, &other_positions, dim) * sign;

        Self {
            var_names,
            precision,
            information,
            g: sign.mul_add(other.g, self.g),
        }
    }
}

impl GaussianFactorLike for Gaussian {
    #[inline]
    fn var_names(&self) -> &[VariableName] {
        &self.var_names
    }

    fn marginalize(&self, vars: &[VariableName], keep: bool) -> Result<Self> {
        let given = self.indices_of(vars)?;
        let (kept, integrated) = if keep {
            let integrated = self.complement_of(&given);
            (given, integrated)
        } else {
            (self.complement_of(&given), given)
        };
        let var_names = self.names_at(&kept);

        if self.is_vacuous() {
            return Ok(Self::vacuous(&var_names));
        }

        let k_xx = submatrix(&self.precision, &kept, &kept);
        let h_x = subvector(&self.information, &kept);
        if integrated.is_empty() {
            return Ok(Self {
                var_names,
                precision: k_xx,
                information: h_x,
                g: self.g,
            });
        }

        let k_xy = submatrix(&self.precision, &kept, &integrated);
        let k_yy = submatrix(&self.precision, &integrated, &integrated);
        let h_y = subvector(&self.information, &integrated);

        let k_yy_inv = inverse(&k_yy).ok_or(GaussianError::NonInvertibleMatrix("marginalized precision block"))?;
        let log_det_k_yy =
            log_det(&k_yy).ok_or(GaussianError::NonPositiveDeterminant("marginalized precision block"))?;
        let k_xy_k_yy_inv = k_xy.dot(&k_yy_inv);

        let schur = &k_xx - &k_xy_k_yy_inv.dot(&k_xy.t());
        // symmetric up to round-off
        let precision = (&schur + &schur.t()) * 0.5;
        let information = &h_x - &k_xy_k_yy_inv.dot(&h_y);
        let m = integrated.len() as Float;
        let g = 0.5f64.mul_add(
            h_y.dot(&k_yy_inv.dot(&h_y)) + m.mul_add(LN_2PI, -log_det_k_yy),
            self.g,
        );

        Ok(Self {
            var_names,
            precision,
            information,
            g,
        })
    }

    fn multiply(&self, other: &Self) -> Result<Self> {
        Ok(self.absorb_or_cancel(other, 1.0))
    }

    fn divide(&self, other: &Self) -> Result<Self> {
        Ok(self.absorb_or_cancel(other, -1.0))
    }

    fn reduce(&self, vars: &[VariableName], values: &[Float]) -> Result<Self> {
        if vars.len() != values.len() {
            return Err(GaussianError::ObservationLengthMismatch(vars.len(), values.len()));
        }
        let observed = self.indices_of(vars)?;
        let unobserved = self.complement_of(&observed);
        let y = Vector::from(values.to_vec());

        let k_xy = submatrix(&self.precision, &unobserved, &observed);
        let k_yy = submatrix(&self.precision, &observed, &observed);
        let h_x = subvector(&self.information, &unobserved);
        let h_y = subvector(&self.information, &observed);

        Ok(Self {
            var_names:   self.names_at(&unobserved),
            precision:   submatrix(&self.precision, &unobserved, &unobserved),
            information: &h_x - &k_xy.dot(&y),
            g:           self.g + h_y.dot(&y) - 0.5 * y.dot(&k_yy.dot(&y)),
        })
    }

    fn log_weight(&self) -> Result<Float> {
        if self.dim() == 0 {
            return Ok(self.g);
        }
        let mean = self.mean()?;
        let log_det_precision =
            log_det(&self.precision).ok_or(GaussianError::NonPositiveDeterminant("precision"))?;
        let dim = self.dim() as Float;
        Ok(0.5f64.mul_add(
            mean.dot(&self.precision.dot(&mean)) + dim.mul_add(LN_2PI, -log_det_precision),
            self.g,
        ))
    }

    fn distance_from_vacuous(&self) -> Float {
        if self.is_vacuous() {
            0.0
        } else {
            Float::INFINITY
        }
    }

    fn kl_divergence(&self, other: &Self) -> Result<Float> {
        if !self.same_scope(other) {
            return Err(GaussianError::ScopeMismatch(
                self.var_names.clone(),
                other.var_names.clone(),
            ));
        }
        let other = other.reordered(&self.var_names)?;

        match (self.is_vacuous(), other.is_vacuous()) {
            (true, true) => return Ok(0.0),
            (true, false) | (false, true) => return Ok(Float::INFINITY),
            (false, false) => {}
        }
        if self.equals(&other, DEFAULT_FACTOR_RTOL, DEFAULT_FACTOR_ATOL) {
            return Ok(0.0);
        }

        let covariance_p = self.covariance()?;
        let mean_p = covariance_p.dot(&self.information);
        let mean_q = other.mean()?;
        let k_q = &other.precision;

        let log_det_p = log_det(&self.precision).ok_or(GaussianError::NonPositiveDeterminant("precision"))?;
        let log_det_q = log_det(k_q).ok_or(GaussianError::NonPositiveDeterminant("precision"))?;
        let trace = k_q.dot(&covariance_p).diag().sum();
        let delta = &mean_p - &mean_q;
        let mahalanobis = delta.dot(&k_q.dot(&delta));

        let kld = 0.5 * (log_det_p - log_det_q + trace + mahalanobis - self.dim() as Float);
        Ok(kld.abs())
    }

    fn equals(&self, other: &Self, rtol: Float, atol: Float) -> bool {
        if !self.same_scope(other) {
            return false;
        }
        let Ok(other) = other.reordered(&self.var_names) else {
            return false;
        };
        if self.is_vacuous() && other.is_vacuous() {
            return true;
        }
        is_close(self.g, other.g, rtol, atol)
            && all_close(&self.information, &other.information, rtol, atol)
            && all_close(&self.precision, &other.precision, rtol, atol)
    }

    fn is_vacuous(&self) -> bool {
        self.dim() > 0
            && self.precision.iter().all(|x| x.abs() <= DEFAULT_FACTOR_ATOL)
            && !is_positive_definite(&self.precision)
    }

    fn vacuous(var_names: &[VariableName]) -> Self {
        let dim = var_names.len();
        Self {
            var_names:   var_names.to_vec(),
            precision:   Matrix::zeros((dim, dim)),
            information: Vector::zeros(dim),
            g:           0.0,
        }
    }

    fn almost_vacuous(var_names: &[VariableName], variance: Float) -> Result<Self> {
        let dim = var_names.len();
        Self::from_covariance(
            var_names.iter().cloned(),
            Matrix::eye(dim) * variance,
            Vector::zeros(dim),
            0.0,
        )
    }
}

impl std::fmt::Display for Gaussian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Gaussian over [{}]", self.var_names.iter().join(", "))?;
        writeln!(f, "K:\n{}", format_matrix(&self.precision))?;
        writeln!(f, "h:\n{}", format_vector(&self.information))?;
        write!(f, "g: {}", self.g)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use arbtest::arbtest;
    use cg_linalg::array;
    use pretty_assertions::assert_eq;

    use super::*;

    const RTOL: Float = 1e-6;
    const ATOL: Float = 1e-9;

    fn names(vars: &[&str]) -> Vec<VariableName> {
        vars.iter().map(|&v| VariableName::new(v)).collect()
    }

    fn ln_normal_pdf(x: Float, mean: Float, variance: Float) -> Float {
        -0.5 * (x - mean).powi(2) / variance - 0.5 * (2.0 * std::f64::consts::PI * variance).ln()
    }

    fn gaussian_ab() -> Gaussian {
        Gaussian::from_covariance(["a", "b"], array![[10.0, 9.0], [9.0, 10.0]], array![1.0, 2.0], 0.5)
            .expect("valid covariance")
    }

    #[test]
    fn from_covariance_round_trips_moments() {
        let g = gaussian_ab();
        assert!(all_close(
            &g.covariance().expect("invertible"),
            &array![[10.0, 9.0], [9.0, 10.0]],
            RTOL,
            ATOL
        ));
        assert!(all_close(&g.mean().expect("invertible"), &array![1.0, 2.0], RTOL, ATOL));
        assert_relative_eq!(g.log_weight().expect("normalizable"), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn construction_errors() {
        let non_square = Gaussian::from_canonical(["a"], Matrix::zeros((1, 2)), Vector::zeros(1), 0.0);
        assert!(matches!(non_square, Err(GaussianError::NonSquareMatrix(1, 2))));

        let mismatch = Gaussian::from_canonical(["a", "b"], Matrix::eye(2), Vector::zeros(3), 0.0);
        assert!(matches!(mismatch, Err(GaussianError::DimensionMismatch { .. })));

        let duplicate = Gaussian::from_canonical(["a", "a"], Matrix::eye(2), Vector::zeros(2), 0.0);
        assert!(matches!(duplicate, Err(GaussianError::DuplicateVariable(v)) if v == "a"));

        let singular =
            Gaussian::from_covariance(["a", "b"], array![[1.0, 1.0], [1.0, 1.0]], Vector::zeros(2), 0.0);
        assert!(matches!(singular, Err(GaussianError::NotPositiveDefinite(_))));

        let negative_definite = Gaussian::from_covariance(["a", "b"], -Matrix::<Float>::eye(2), Vector::zeros(2), 0.0);
        assert!(matches!(negative_definite, Err(GaussianError::NotPositiveDefinite("covariance"))));
    }

    #[test]
    fn repeated_variables_are_rejected() {
        let g = gaussian_ab();
        let marginal = g.marginalize(&names(&["a", "a"]), true);
        assert!(matches!(marginal, Err(GaussianError::DuplicateVariable(v)) if v == "a"));

        let reduced = g.reduce(&names(&["b", "b"]), &[1.0, 1.0]);
        assert!(matches!(reduced, Err(GaussianError::DuplicateVariable(v)) if v == "b"));
    }

    #[test]
    fn marginalize_keeps_moments_and_weight() {
        let g = gaussian_ab();
        let marginal = g.marginalize(&names(&["b"]), true).expect("b is in scope");
        let expected = Gaussian::from_covariance(["b"], array![[10.0]], array![2.0], 0.5).expect("valid");
        assert!(marginal.equals(&expected, RTOL, ATOL), "{marginal}\n{expected}");

        let integrated_a = g.marginalize(&names(&["a"]), false).expect("a is in scope");
        assert!(integrated_a.equals(&expected, RTOL, ATOL));
    }

    #[test]
    fn marginalize_keep_order_follows_the_given_order() {
        let g = gaussian_ab();
        let swapped = g.marginalize(&names(&["b", "a"]), true).expect("in scope");
        assert_eq!(swapped.var_names(), names(&["b", "a"]).as_slice());
        assert!(swapped.equals(&g, RTOL, ATOL));
    }

    #[test]
    fn marginalize_unknown_variable_fails() {
        let result = gaussian_ab().marginalize(&names(&["z"]), true);
        assert!(matches!(result, Err(GaussianError::UnknownVariables(unknown, _)) if unknown == names(&["z"])));
    }

    #[test]
    fn marginal_of_vacuous_is_vacuous() {
        let vacuous = Gaussian::vacuous(&names(&["a", "b"]));
        let marginal = vacuous.marginalize(&names(&["a"]), true).expect("in scope");
        assert!(marginal.is_vacuous());
        assert_eq!(marginal.var_names(), names(&["a"]).as_slice());
    }

    #[test]
    fn reduce_gives_the_scaled_conditional() {
        let g = gaussian_ab();
        let reduced = g.reduce(&names(&["b"]), &[3.0]).expect("b is in scope");
        // a | b=3 ~ N(1 + 0.9 * (3 - 2), 10 - 8.1)
        let expected = Gaussian::from_covariance(
            ["a"],
            array![[1.9]],
            array![1.9],
            0.5 + ln_normal_pdf(3.0, 2.0, 10.0),
        )
        .expect("valid");
        assert!(reduced.equals(&expected, RTOL, ATOL), "{reduced}\n{expected}");
    }

    #[test]
    fn reduce_full_scope_leaves_the_log_density() {
        let g = Gaussian::from_covariance(["a"], array![[1.0]], array![0.0], 0.0).expect("valid");
        let reduced = g.reduce(&names(&["a"]), &[1.0]).expect("a is in scope");
        assert_eq!(reduced.dim(), 0);
        assert_relative_eq!(reduced.log_weight().expect("scalar"), ln_normal_pdf(1.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn reduce_length_mismatch_fails() {
        let result = gaussian_ab().reduce(&names(&["a"]), &[1.0, 2.0]);
        assert!(matches!(result, Err(GaussianError::ObservationLengthMismatch(1, 2))));
    }

    #[test]
    fn product_of_normalized_densities_has_weight_of_their_overlap() {
        let p = Gaussian::from_covariance(["x"], array![[1.0]], array![0.0], 0.0).expect("valid");
        let q = Gaussian::from_covariance(["x"], array![[2.0]], array![1.0], 0.0).expect("valid");
        let product = p.multiply(&q).expect("same scope");
        assert_relative_eq!(
            product.log_weight().expect("normalizable"),
            ln_normal_pdf(0.0, 1.0, 3.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn multiply_extends_scope_and_divide_undoes_it() {
        let ab = gaussian_ab();
        let bc = Gaussian::from_covariance(["c", "b"], array![[4.0, 1.0], [1.0, 3.0]], array![0.5, -1.0], 0.0)
            .expect("valid");
        let product = ab.multiply(&bc).expect("multiply");
        assert_eq!(product.var_names(), names(&["a", "b", "c"]).as_slice());

        let quotient = product.divide(&bc).expect("divide");
        let expected = ab.multiply(&Gaussian::vacuous(&names(&["c"]))).expect("multiply");
        assert!(quotient.equals(&expected, RTOL, ATOL));
    }

    #[test]
    fn equals_ignores_variable_order() {
        let g = gaussian_ab();
        let swapped = Gaussian::from_covariance(["b", "a"], array![[10.0, 9.0], [9.0, 10.0]], array![2.0, 1.0], 0.5)
            .expect("valid");
        assert!(g.equals(&swapped, RTOL, ATOL));
        assert!(!g.equals(&Gaussian::vacuous(&names(&["a", "c"])), RTOL, ATOL));
    }

    #[test]
    fn vacuous_and_almost_vacuous() {
        let vacuous = Gaussian::vacuous(&names(&["a"]));
        assert!(vacuous.is_vacuous());
        assert_eq!(vacuous.distance_from_vacuous(), 0.0);

        let almost = Gaussian::almost_vacuous(&names(&["a"]), 1e10).expect("valid");
        assert!(!almost.is_vacuous());
        assert!(almost.distance_from_vacuous().is_infinite());
        assert_relative_eq!(almost.precision()[[0, 0]], 1e-10, max_relative = 1e-9);
        assert!(matches!(vacuous.covariance(), Err(GaussianError::Vacuous(_))));
    }

    #[test]
    fn kl_divergence_of_univariate_normals() {
        let p = Gaussian::from_covariance(["x"], array![[1.0]], array![0.0], 0.0).expect("valid");
        let q = Gaussian::from_covariance(["x"], array![[2.0]], array![1.0], 0.0).expect("valid");
        assert_relative_eq!(p.kl_divergence(&q).expect("same scope"), 0.5 * 2f64.ln(), epsilon = 1e-9);
        assert_eq!(p.kl_divergence(&p).expect("same scope"), 0.0);
    }

    #[test]
    fn kl_divergence_with_vacuous() {
        let p = Gaussian::from_covariance(["x"], array![[1.0]], array![0.0], 0.0).expect("valid");
        let vacuous = Gaussian::vacuous(&names(&["x"]));
        assert!(p.kl_divergence(&vacuous).expect("same scope").is_infinite());
        assert!(vacuous.kl_divergence(&p).expect("same scope").is_infinite());
        assert_eq!(vacuous.kl_divergence(&vacuous).expect("same scope"), 0.0);

        let other_scope = Gaussian::vacuous(&names(&["y"]));
        assert!(matches!(p.kl_divergence(&other_scope), Err(GaussianError::ScopeMismatch(..))));
    }

    #[test]
    fn multiply_then_divide_by_vacuous_is_identity() {
        arbtest(|u| {
            let mut entry = || -> arbtest::arbitrary::Result<Float> {
                Ok(Float::from(u.int_in_range::<i32>(-50..=50)?) / 10.0)
            };
            let (x, y, z) = (entry()?, entry()?, entry()?);
            let (m0, m1, w) = (entry()?, entry()?, entry()?);
            let a = array![[x, 0.0], [y, z]];
            let covariance = a.dot(&a.t()) + Matrix::<Float>::eye(2);
            let p = Gaussian::from_covariance(["a", "b"], covariance, array![m0, m1], w)
                .expect("positive definite");

            let scope = names(&["b", "a"]);
            let vacuous = Gaussian::vacuous(&scope);
            let almost = Gaussian::almost_vacuous(&scope, 1e10).expect("positive variance");
            for divisor in [vacuous, almost] {
                let back = p.multiply(&divisor).and_then(|pd| pd.divide(&divisor)).expect("algebra");
                assert_eq!(back.var_names(), p.var_names());
                assert!(back.equals(&p, 1e-6, 1e-6), "{back}\n{p}");
            }
            Ok(())
        })
        .budget_ms(100);
    }

    #[test]
    fn multiply_then_divide_is_identity() {
        arbtest(|u| {
            let mut entry = || -> arbtest::arbitrary::Result<Float> {
                Ok(Float::from(u.int_in_range::<i32>(-50..=50)?) / 10.0)
            };
            let (x, y, z) = (entry()?, entry()?, entry()?);
            let (m0, m1, w) = (entry()?, entry()?, entry()?);
            // A Aᵀ + I is positive definite
            let a = array![[x, 0.0], [y, z]];
            let covariance = a.dot(&a.t()) + Matrix::<Float>::eye(2);

            let p = Gaussian::from_covariance(["a", "b"], covariance.clone(), array![m0, m1], w)
                .expect("positive definite");
            let q = Gaussian::from_covariance(["b", "c"], covariance, array![m1, m0], -w)
                .expect("positive definite");
            let back = p.multiply(&q).and_then(|pq| pq.divide(&q)).expect("algebra");
            let expected = p.multiply(&Gaussian::vacuous(&names(&["c"]))).expect("algebra");
            assert!(back.equals(&expected, 1e-6, 1e-6), "{back}\n{expected}");
            Ok(())
        })
        .budget_ms(100);
    }
}
