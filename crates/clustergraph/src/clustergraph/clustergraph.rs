//! The cluster graph, and the best first message passing loop over it.

use std::collections::{BTreeMap, BTreeSet};

use cg_config::{Config, DebugSection, MessagePassingSection};
use cg_gaussian::{Gaussian, GaussianFactorLike, VariableName};
use cg_linalg::Float;
use itertools::Itertools;
use petgraph::unionfind::UnionFind;
use tracing::{debug, info, trace};

use super::{
    cluster::Cluster,
    id::{ClusterIndex, MessagePathIndex},
    message::Message,
    message_path::GraphMessagePath,
    schedule::Schedule,
    ClusterGraphError, Result,
};

/// Outcome of [`ClusterGraph::process_graph`].
/// Not having converged is not an error.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display)]
#[display(
    fmt = "passed {} messages, converged: {}, max remaining information gain: {}",
    messages_passed,
    converged,
    max_remaining_information_gain
)]
pub struct ProcessReport {
    /// Messages passed during this call.
    pub messages_passed: usize,
    /// Whether every path's next information gain is at most the tolerance.
    pub converged: bool,
    /// Highest next information gain left when the call returned, `0.0`
    /// for a graph without message paths.
    pub max_remaining_information_gain: Float,
}

/// A cluster graph over Gaussian factors.
///
/// Clusters live in an arena and are referred to by [`ClusterIndex`].
/// Every pair of clusters sharing a non-empty sepset is connected by two
/// [`GraphMessagePath`]s, one in each direction.
#[derive(Debug)]
pub struct ClusterGraph<F: GaussianFactorLike = Gaussian> {
    clusters: Vec<Cluster<F>>,
    graph_message_paths: Vec<GraphMessagePath<F>>,
    /// Paths leaving each cluster, indexed by cluster.
    outgoing_paths: Vec<Vec<MessagePathIndex>>,
    schedule: Schedule,
    special_evidence: BTreeMap<VariableName, Float>,
    passed_messages: Vec<Message<F>>,
    max_information_gain_history: Vec<Float>,
    debug: DebugSection,
}

/// Condition every factor on the evidence in its scope.
fn apply_evidence<F: GaussianFactorLike>(
    factors: Vec<F>,
    special_evidence: &BTreeMap<VariableName, Float>,
) -> Result<Vec<F>> {
    if let Some(unknown) = special_evidence
        .keys()
        .find(|&var| !factors.iter().any(|f| f.var_names().contains(var)))
    {
        return Err(ClusterGraphError::UnknownEvidenceVariable(unknown.clone()));
    }

    factors
        .into_iter()
        .map(|factor| {
            let (vars, values): (Vec<_>, Vec<_>) = special_evidence
                .iter()
                .filter(|&(var, _)| factor.var_names().contains(var))
                .map(|(var, &value)| (var.clone(), value))
                .unzip();
            if vars.is_empty() {
                Ok(factor)
            } else {
                Ok(factor.reduce(&vars, &values)?)
            }
        })
        .collect()
}

fn is_subset(vars: &[VariableName], of: &[VariableName]) -> bool {
    vars.iter().all(|var| of.contains(var))
}

/// Multiply every factor whose scope is contained in the scope of another
/// factor into the first such factor. The remaining factors keep their
/// relative order.
fn absorb_subset_factors<F: GaussianFactorLike>(factors: Vec<F>) -> Result<Vec<F>> {
    let mut merged: Vec<Option<F>> = factors.into_iter().map(Some).collect();
    for i in 0..merged.len() {
        let Some(factor) = merged[i].take() else {
            continue;
        };
        let host = (0..merged.len()).find(|&j| {
            merged[j]
                .as_ref()
                .is_some_and(|other| is_subset(factor.var_names(), other.var_names()))
        });
        match host {
            Some(j) => {
                if let Some(other) = merged[j].as_mut() {
                    *other = other.multiply(&factor)?;
                }
            }
            None => merged[i] = Some(factor),
        }
    }
    Ok(merged.into_iter().flatten().collect())
}

/// Sepsets with the running intersection property: for every variable, the
/// clusters holding it are joined by a spanning tree, built greedily over
/// cluster pairs in lexicographic order. The sepset of an edge is the set of
/// variables whose spanning tree uses it.
fn running_intersection_sepsets<F: GaussianFactorLike>(
    clusters: &[Cluster<F>],
) -> BTreeMap<(usize, usize), Vec<VariableName>> {
    let variables: BTreeSet<&VariableName> = clusters.iter().flat_map(Cluster::var_names).collect();
    let mut sepsets: BTreeMap<(usize, usize), Vec<VariableName>> = BTreeMap::new();
    for var in variables {
        let holders = clusters
            .iter()
            .positions(|cluster| cluster.var_names().contains(var))
            .collect_vec();
        let mut union_find = UnionFind::<usize>::new(clusters.len());
        for (&i, &j) in holders.iter().tuple_combinations() {
            if union_find.union(i, j) {
                sepsets.entry((i, j)).or_default().push(var.clone());
            }
        }
    }
    sepsets
}

fn cluster_id(index: usize, var_names: &[VariableName]) -> String {
    format!("c{index}#{}", var_names.iter().sorted().join(","))
}

impl<F: GaussianFactorLike> ClusterGraph<F> {
    /// Build a cluster graph with the default configuration.
    ///
    /// # Errors
    ///
    /// See [`ClusterGraph::with_config`].
    pub fn new(factors: Vec<F>, special_evidence: BTreeMap<VariableName, Float>) -> Result<Self> {
        Self::with_config(factors, special_evidence, &Config::default())
    }

    /// Build a cluster graph from `factors`.
    ///
    /// 1. Every factor is conditioned on the evidence in its scope.
    /// 2. Factors whose scope is contained in another factor's scope are
    ///    multiplied into it. Each remaining factor becomes a cluster with id
    ///    `c{index}#{sorted variable names}`.
    /// 3. Clusters sharing variables are connected, see
    ///    [`ClusterGraph::graph_message_paths`].
    ///
    /// # Errors
    ///
    /// - if `factors` is empty
    /// - if an evidence variable is in the scope of no factor
    /// - if the factor algebra fails
    pub fn with_config(
        factors: Vec<F>,
        special_evidence: BTreeMap<VariableName, Float>,
        config: &Config,
    ) -> Result<Self> {
        if factors.is_empty() {
            return Err(ClusterGraphError::EmptyFactorList);
        }
        let factors = apply_evidence(factors, &special_evidence)?;
        let clusters = absorb_subset_factors(factors)?
            .into_iter()
            .enumerate()
            .map(|(index, factor)| Cluster::new(cluster_id(index, factor.var_names()), factor))
            .collect();
        Self::connect(clusters, special_evidence, config)
    }

    /// Build a cluster graph with one cluster per named factor, without
    /// merging any factors.
    ///
    /// # Errors
    ///
    /// Same as [`ClusterGraph::with_config`], and if any id is used more than
    /// once.
    pub fn from_named_factors<S: Into<String>>(
        named_factors: impl IntoIterator<Item = (S, F)>,
        special_evidence: BTreeMap<VariableName, Float>,
        config: &Config,
    ) -> Result<Self> {
        let (ids, factors): (Vec<String>, Vec<F>) = named_factors
            .into_iter()
            .map(|(id, factor)| (id.into(), factor))
            .unzip();
        if factors.is_empty() {
            return Err(ClusterGraphError::EmptyFactorList);
        }
        let non_unique = ids.iter().duplicates().cloned().collect_vec();
        if !non_unique.is_empty() {
            return Err(ClusterGraphError::NonUniqueClusterIds(non_unique));
        }
        let clusters = ids
            .into_iter()
            .zip(apply_evidence(factors, &special_evidence)?)
            .map(|(id, factor)| Cluster::new(id, factor))
            .collect();
        Self::connect(clusters, special_evidence, config)
    }

    fn connect(
        mut clusters: Vec<Cluster<F>>,
        special_evidence: BTreeMap<VariableName, Float>,
        config: &Config,
    ) -> Result<Self> {
        let sepsets = running_intersection_sepsets(&clusters);
        for (&(i, j), sepset) in &sepsets {
            clusters[i].add_neighbour(ClusterIndex(j), sepset.clone());
            clusters[j].add_neighbour(ClusterIndex(i), sepset.clone());
        }

        let variance = config.message_passing.almost_vacuous_variance.get();
        let mut graph_message_paths = Vec::with_capacity(2 * sepsets.len());
        let mut outgoing_paths = vec![Vec::new(); clusters.len()];
        for ((i, j), sepset) in sepsets {
            for (sender, receiver) in [(i, j), (j, i)] {
                outgoing_paths[sender].push(MessagePathIndex(graph_message_paths.len()));
                graph_message_paths.push(GraphMessagePath::new(
                    (ClusterIndex(sender), &clusters[sender]),
                    (ClusterIndex(receiver), &clusters[receiver]),
                    sepset.clone(),
                    variance,
                )?);
            }
        }

        info!(
            "built cluster graph with {} clusters and {} message paths",
            clusters.len(),
            graph_message_paths.len()
        );
        for cluster in &clusters {
            debug!(
                "cluster {} has neighbours {:?}",
                cluster.id(),
                cluster
                    .neighbours()
                    .map(|(index, sepset)| (index.0, sepset.iter().join(",")))
                    .collect_vec()
            );
        }

        let schedule = Schedule::new(graph_message_paths.iter().map(GraphMessagePath::next_information_gain));
        Ok(Self {
            clusters,
            graph_message_paths,
            outgoing_paths,
            schedule,
            special_evidence,
            passed_messages: Vec::new(),
            max_information_gain_history: Vec::new(),
            debug: config.debug,
        })
    }

    /// Pass messages best first until no path has an information gain above
    /// `tol`, or `max_iter` rounds of as many messages as there are paths have
    /// been passed.
    ///
    /// # Errors
    ///
    /// If the factor algebra fails. Not converging is reported in the
    /// returned [`ProcessReport`].
    pub fn process_graph(&mut self, tol: Float, max_iter: usize) -> Result<ProcessReport> {
        let max_messages = max_iter.saturating_mul(self.graph_message_paths.len());
        let mut messages_passed = 0;
        while messages_passed < max_messages {
            let Some((path, gain)) = self.schedule.peek() else {
                break;
            };
            if gain <= tol {
                break;
            }
            self.max_information_gain_history.push(gain);
            self.pass_message(path)?;
            messages_passed += 1;
        }

        let max_remaining_information_gain = self.schedule.peek().map_or(0.0, |(_, gain)| gain);
        let report = ProcessReport {
            messages_passed,
            converged: max_remaining_information_gain <= tol,
            max_remaining_information_gain,
        };
        info!("{report}");
        Ok(report)
    }

    /// [`ClusterGraph::process_graph`] with the tolerance and iteration
    /// limit of a configuration section.
    ///
    /// # Errors
    ///
    /// Same as [`ClusterGraph::process_graph`].
    pub fn process_graph_with(&mut self, config: &MessagePassingSection) -> Result<ProcessReport> {
        self.process_graph(config.tol.get(), config.max_iter.get())
    }

    fn pass_message(&mut self, path_index: MessagePathIndex) -> Result<()> {
        let path = &mut self.graph_message_paths[path_index.0];
        let (sender, receiver) = (path.sender(), path.receiver());
        let gain = path.next_information_gain();
        let message = path.pass_next_message();

        if self.debug.verbose {
            debug!(
                "passing message {} -> {} with information gain {gain}",
                message.sender_id(),
                message.receiver_id()
            );
        } else {
            trace!(
                "passing message {} -> {} with information gain {gain}",
                message.sender_id(),
                message.receiver_id()
            );
        }
        if self.debug.debug {
            debug!("{message}");
        }

        self.clusters[receiver.0].absorb(sender, message.factor().clone())?;
        self.passed_messages.push(message);

        // the receiver's belief changed, so did its outgoing candidates
        let affected = std::iter::once(path_index)
            .chain(self.outgoing_paths[receiver.0].iter().copied())
            .collect_vec();
        for index in affected {
            let path = &mut self.graph_message_paths[index.0];
            path.update_next_information_gain(&self.clusters[path.sender().0])?;
            self.schedule.update(index, path.next_information_gain());
        }
        Ok(())
    }

    /// The marginal over `vars` of the belief of the first cluster containing
    /// all of them.
    ///
    /// # Errors
    ///
    /// If no single cluster contains every variable in `vars`.
    pub fn get_marginal(&self, vars: &[VariableName]) -> Result<F> {
        let cluster = self
            .clusters
            .iter()
            .find(|cluster| cluster.contains_all(vars))
            .ok_or_else(|| ClusterGraphError::NoClusterContainsVariables(vars.to_vec()))?;
        cluster.marginal(vars)
    }

    /// The product of all cluster beliefs, divided by every message absorbed
    /// into them. With a single cluster this is a copy of its belief.
    ///
    /// # Errors
    ///
    /// If the factor algebra fails.
    pub fn get_posterior_joint(&self) -> Result<F> {
        let (first, rest) = self
            .clusters
            .split_first()
            .ok_or(ClusterGraphError::EmptyFactorList)?;
        if rest.is_empty() {
            return Ok(first.factor().clone());
        }
        let mut joint = first.factor().clone();
        for cluster in rest {
            joint = joint.multiply(cluster.factor())?;
        }
        for (_, message) in self.clusters.iter().flat_map(Cluster::received_messages) {
            joint = joint.divide(message)?;
        }
        Ok(joint)
    }

    #[inline]
    pub fn clusters(&self) -> &[Cluster<F>] {
        &self.clusters
    }

    pub fn cluster(&self, id: &str) -> Option<&Cluster<F>> {
        self.clusters.iter().find(|cluster| cluster.id() == id)
    }

    /// Directed paths, in creation order: for every connected pair of
    /// clusters `(i, j)` with `i < j`, in lexicographic order, the path
    /// `i -> j` followed by `j -> i`.
    #[inline]
    pub fn graph_message_paths(&self) -> &[GraphMessagePath<F>] {
        &self.graph_message_paths
    }

    #[inline]
    pub const fn special_evidence(&self) -> &BTreeMap<VariableName, Float> {
        &self.special_evidence
    }

    /// Every message passed so far, in the order it was passed.
    #[inline]
    pub fn passed_messages(&self) -> &[Message<F>] {
        &self.passed_messages
    }

    #[inline]
    pub fn num_messages_passed(&self) -> usize {
        self.passed_messages.len()
    }

    /// The maximum next information gain right before each passed message.
    #[inline]
    pub fn max_information_gain_history(&self) -> &[Float] {
        &self.max_information_gain_history
    }

    /// The current next information gain of every path, in path order.
    pub fn next_information_gains(&self) -> impl Iterator<Item = Float> + '_ {
        self.graph_message_paths
            .iter()
            .map(GraphMessagePath::next_information_gain)
    }
}
