use cg_gaussian::{GaussianError, VariableName};
use itertools::Itertools;

#[derive(Debug, thiserror::Error)]
pub enum ClusterGraphError {
    #[error("cannot build a cluster graph from an empty list of factors")]
    EmptyFactorList,
    #[error("cluster ids must be unique, but these ids are non-unique: {}", .0.iter().join(", "))]
    NonUniqueClusterIds(Vec<String>),
    #[error("the evidence variable {0} is not in the scope of any factor")]
    UnknownEvidenceVariable(VariableName),
    #[error("no single cluster contains all of the variables {0:?}")]
    NoClusterContainsVariables(Vec<VariableName>),
    #[error(transparent)]
    Factor(#[from] GaussianError),
}

pub type Result<T> = std::result::Result<T, ClusterGraphError>;
