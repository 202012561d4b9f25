//! A small collection of ndarray helpers for working with Gaussians whose
//! parameters are indexed by variable scope.

pub mod pretty_print;

use ndarray::Axis;
use ndarray_inverse::Inverse;
use num_traits::Zero;

pub mod prelude {
    pub use super::{
        all_close, embed_matrix, embed_vector, inverse, is_close, is_positive_definite, log_det,
        pretty_print::{format_matrix, format_vector},
        submatrix, subvector, Float, Matrix, MatrixView, Scalar, Vector, VectorView,
    };
}

pub use ndarray::array;

/// Marker trait for floating point types used in the Gaussian parameters.
/// - `ndarray::NdFloat` is implemented for f32 and f64.
/// - `std::iter::Sum` is required by `ndarray_inverse::Inverse::det()`.
pub trait Scalar: ndarray::NdFloat + Copy + std::iter::Sum {}

impl Scalar for f32 {}
impl Scalar for f64 {}

/// The precision of the floating point type used for factor parameters.
pub type Float = f64;

pub type Vector<T> = ndarray::Array1<T>;
pub type Matrix<T> = ndarray::Array2<T>;
pub type VectorView<'a, T> = ndarray::ArrayView1<'a, T>;
pub type MatrixView<'a, T> = ndarray::ArrayView2<'a, T>;

/// Select the block of `matrix` given by `rows` x `cols`.
/// Indices may appear in any order, the block follows the given order.
pub fn submatrix<T: Clone>(matrix: &Matrix<T>, rows: &[usize], cols: &[usize]) -> Matrix<T> {
    matrix.select(Axis(0), rows).select(Axis(1), cols)
}

/// Select the entries of `vector` at `indices`, in the given order.
pub fn subvector<T: Clone>(vector: &Vector<T>, indices: &[usize]) -> Vector<T> {
    vector.select(Axis(0), indices)
}

/// Scatter a square `block` into a zero matrix of size `dim x dim`.
/// Row/column `i` of `block` lands on row/column `positions[i]`.
///
/// # Panics
///
/// - if `positions.len()` does not match the size of `block`
/// - if any position is `>= dim`
pub fn embed_matrix<T: Clone + Zero>(block: &Matrix<T>, positions: &[usize], dim: usize) -> Matrix<T> {
    assert_eq!(block.nrows(), positions.len());
    assert_eq!(block.ncols(), positions.len());
    let mut embedded = Matrix::<T>::zeros((dim, dim));
    for (i, &row) in positions.iter().enumerate() {
        for (j, &col) in positions.iter().enumerate() {
            embedded[[row, col]] = block[[i, j]].clone();
        }
    }
    embedded
}

/// Scatter `block` into a zero vector of length `dim`.
///
/// # Panics
///
/// - if `positions.len() != block.len()`
/// - if any position is `>= dim`
pub fn embed_vector<T: Clone + Zero>(block: &Vector<T>, positions: &[usize], dim: usize) -> Vector<T> {
    assert_eq!(block.len(), positions.len());
    let mut embedded = Vector::<T>::zeros(dim);
    for (i, &position) in positions.iter().enumerate() {
        embedded[position] = block[i].clone();
    }
    embedded
}

/// Invert a square matrix.
/// Returns `None` if the matrix is singular. The empty matrix is its own
/// inverse.
pub fn inverse(matrix: &Matrix<Float>) -> Option<Matrix<Float>> {
    if matrix.is_empty() {
        return Some(matrix.clone());
    }
    let inverted = matrix.inv()?;
    inverted.iter().all(|x| x.is_finite()).then_some(inverted)
}

/// Natural logarithm of the determinant of a square matrix.
/// Returns `None` if the determinant is not strictly positive.
pub fn log_det(matrix: &Matrix<Float>) -> Option<Float> {
    if matrix.is_empty() {
        return Some(0.0);
    }
    let det = matrix.det();
    (det > 0.0 && det.is_finite()).then(|| det.ln())
}

/// Check positive definiteness by attempting a Cholesky factorisation.
/// The empty matrix is considered positive definite.
pub fn is_positive_definite(matrix: &Matrix<Float>) -> bool {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return false;
    }
    let mut lower = Matrix::<Float>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let sum: Float = (0..j).map(|k| lower[[i, k]] * lower[[j, k]]).sum();
            if i == j {
                let pivot = matrix[[i, i]] - sum;
                if pivot <= 0.0 || !pivot.is_finite() {
                    return false;
                }
                lower[[i, j]] = pivot.sqrt();
            } else {
                lower[[i, j]] = (matrix[[i, j]] - sum) / lower[[j, j]];
            }
        }
    }
    true
}

/// numpy style `isclose`: `|a - b| <= atol + rtol * |b|`
#[inline]
pub fn is_close<T: Scalar>(a: T, b: T, rtol: T, atol: T) -> bool {
    (a - b).abs() <= atol + rtol * b.abs()
}

/// numpy style `allclose` over arrays of the same shape.
/// Arrays of different shapes are never close.
pub fn all_close<T, D>(
    a: &ndarray::Array<T, D>,
    b: &ndarray::Array<T, D>,
    rtol: T,
    atol: T,
) -> bool
where
    T: Scalar,
    D: ndarray::Dimension,
{
    a.shape() == b.shape()
        && a
            .iter()
            .zip(b.iter())
            .all(|(&x, &y)| is_close(x, y, rtol, atol))
}
