/// Index of a cluster in the cluster arena of a
/// [`ClusterGraph`](super::clustergraph::ClusterGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display(fmt = "{}", _0)]
pub struct ClusterIndex(pub usize);

/// Index of a directed message path. Paths are numbered in creation order,
/// which is also the order used to break ties between equal information
/// gains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display(fmt = "{}", _0)]
pub struct MessagePathIndex(pub usize);
