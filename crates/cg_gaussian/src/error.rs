use crate::VariableName;

#[derive(Debug, thiserror::Error)]
pub enum GaussianError {
    #[error("the matrix is not square, it has shape {0}x{1}")]
    NonSquareMatrix(usize, usize),
    #[error(
        "the number of variables ({variables}) is not equal to the length of the vector ({vector}) or the shape of the matrix ({rows}x{cols})"
    )]
    DimensionMismatch {
        variables: usize,
        vector:    usize,
        rows:      usize,
        cols:      usize,
    },
    #[error("the variable {0} appears more than once in the scope")]
    DuplicateVariable(VariableName),
    #[error("the variables {0:?} are not in the scope {1:?}")]
    UnknownVariables(Vec<VariableName>, Vec<VariableName>),
    #[error("the scopes {0:?} and {1:?} are not the same set of variables")]
    ScopeMismatch(Vec<VariableName>, Vec<VariableName>),
    #[error("{0} observed variables were given, but {1} values")]
    ObservationLengthMismatch(usize, usize),
    #[error("the {0} matrix is not invertible")]
    NonInvertibleMatrix(&'static str),
    #[error("the {0} matrix is not positive definite")]
    NotPositiveDefinite(&'static str),
    #[error("the determinant of the {0} matrix is not positive")]
    NonPositiveDeterminant(&'static str),
    #[error("the covariance form of a vacuous gaussian over {0:?} does not exist")]
    Vacuous(Vec<VariableName>),
}

pub type Result<T> = std::result::Result<T, GaussianError>;
