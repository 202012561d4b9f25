//! Cluster graph construction, message passing and posterior queries.

pub mod cluster;
#[allow(clippy::module_inception)]
pub mod clustergraph;
mod error;
pub mod id;
pub mod message;
pub mod message_path;
pub mod schedule;

pub use error::{ClusterGraphError, Result};

/// prelude module bringing entire public API into scope
pub mod prelude {
    pub use super::{
        cluster::Cluster,
        clustergraph::{ClusterGraph, ProcessReport},
        id::{ClusterIndex, MessagePathIndex},
        message::Message,
        message_path::{GraphMessagePath, MAX_INFORMATION_GAIN},
        ClusterGraphError,
    };
}
