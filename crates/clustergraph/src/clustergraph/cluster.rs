//! Cluster module.
//!
//! A cluster owns the belief over its scope, and remembers the last message
//! each of its neighbours sent it, so that a new message from a neighbour
//! replaces the old one instead of being counted twice.

use std::collections::BTreeMap;

use cg_gaussian::{GaussianFactorLike, VariableName};

use super::{id::ClusterIndex, Result};

#[derive(Debug, Clone)]
pub struct Cluster<F> {
    id:         String,
    factor:     F,
    /// Sepset shared with each neighbour.
    neighbours: BTreeMap<ClusterIndex, Vec<VariableName>>,
    /// Last message received from each neighbour.
    received:   BTreeMap<ClusterIndex, F>,
}

impl<F: GaussianFactorLike> Cluster<F> {
    pub(crate) fn new(id: impl Into<String>, factor: F) -> Self {
        Self {
            id: id.into(),
            factor,
            neighbours: BTreeMap::new(),
            received: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The current belief of the cluster.
    #[inline]
    pub const fn factor(&self) -> &F {
        &self.factor
    }

    #[inline]
    pub fn var_names(&self) -> &[VariableName] {
        self.factor.var_names()
    }

    /// Whether every one of `vars` is in the scope of the cluster.
    pub fn contains_all(&self, vars: &[VariableName]) -> bool {
        vars.iter().all(|var| self.var_names().contains(var))
    }

    /// Neighbours and the sepsets shared with them, ordered by index.
    pub fn neighbours(&self) -> impl Iterator<Item = (ClusterIndex, &[VariableName])> {
        self.neighbours
            .iter()
            .map(|(&index, sepset)| (index, sepset.as_slice()))
    }

    pub fn sepset(&self, neighbour: ClusterIndex) -> Option<&[VariableName]> {
        self.neighbours.get(&neighbour).map(Vec::as_slice)
    }

    pub(crate) fn add_neighbour(&mut self, neighbour: ClusterIndex, sepset: Vec<VariableName>) {
        self.neighbours.insert(neighbour, sepset);
    }

    /// The last message received from `neighbour`, if any.
    pub fn received_from(&self, neighbour: ClusterIndex) -> Option<&F> {
        self.received.get(&neighbour)
    }

    /// Every message currently absorbed into the belief, one per neighbour.
    pub fn received_messages(&self) -> impl Iterator<Item = (ClusterIndex, &F)> {
        self.received.iter().map(|(&index, factor)| (index, factor))
    }

    /// The belief marginalized onto `vars`.
    pub fn marginal(&self, vars: &[VariableName]) -> Result<F> {
        Ok(self.factor.marginalize(vars, true)?)
    }

    /// The message this cluster would send to `receiver` over `sepset`: its
    /// belief over the sepset, without what `receiver` itself contributed.
    pub fn outgoing_message(&self, receiver: ClusterIndex, sepset: &[VariableName]) -> Result<F> {
        let marginal = self.marginal(sepset)?;
        match self.received_from(receiver) {
            Some(previous) => Ok(marginal.divide(previous)?),
            None => Ok(marginal),
        }
    }

    /// Multiply `message` from `sender` into the belief, and divide out the
    /// previous message from the same sender.
    pub(crate) fn absorb(&mut self, sender: ClusterIndex, message: F) -> Result<()> {
        let mut factor = self.factor.multiply(&message)?;
        if let Some(previous) = self.received.get(&sender) {
            factor = factor.divide(previous)?;
        }
        self.factor = factor;
        self.received.insert(sender, message);
        Ok(())
    }
}
