//! Loopy belief propagation over a cluster graph of Gaussian factors.
//!
//! Input factors are merged into clusters, clusters sharing variables are
//! connected by a pair of directed message paths, and messages are passed
//! best first: the path whose next message would change its receiver the
//! most, measured by KL divergence, goes next.
//!
//! ```ignore
//! let mut graph = ClusterGraph::new(factors, BTreeMap::new())?;
//! let report = graph.process_graph(1e-6, 50)?;
//! let marginal = graph.get_marginal(&["a".into()])?;
//! ```

pub mod clustergraph;

pub use cg_config::Config;
pub use cg_gaussian::{Gaussian, GaussianError, GaussianFactorLike, VariableName};

pub mod prelude {
    pub use cg_gaussian::prelude::*;

    pub use crate::clustergraph::prelude::*;
}
