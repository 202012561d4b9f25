//! Directed message paths between neighbouring clusters.

use cg_gaussian::{GaussianFactorLike, VariableName};
use cg_linalg::Float;

use super::{cluster::Cluster, id::ClusterIndex, message::Message, Result};

/// Stand-in for an infinite information gain. Keeps the gains totally
/// ordered, with ties broken by path creation order.
pub const MAX_INFORMATION_GAIN: Float = Float::MAX;

/// A directed edge from `sender` to `receiver`.
///
/// Holds the message that was last sent along the path, and the candidate
/// that would be sent next, scored by how much it differs from the last one.
#[derive(Debug, Clone)]
pub struct GraphMessagePath<F> {
    sender:   ClusterIndex,
    receiver: ClusterIndex,
    sepset:   Vec<VariableName>,
    previously_sent_message: Message<F>,
    next_message: Message<F>,
    next_information_gain: Float,
    information_gain_history: Vec<Float>,
}

impl<F: GaussianFactorLike> GraphMessagePath<F> {
    /// Create a path seeded with an almost vacuous message over `sepset`, and
    /// score its first candidate.
    pub(crate) fn new(
        (sender, sender_cluster): (ClusterIndex, &Cluster<F>),
        (receiver, receiver_cluster): (ClusterIndex, &Cluster<F>),
        sepset: Vec<VariableName>,
        almost_vacuous_variance: Float,
    ) -> Result<Self> {
        let seed = Message::new(
            sender_cluster.id(),
            receiver_cluster.id(),
            F::almost_vacuous(&sepset, almost_vacuous_variance)?,
        );
        let mut path = Self {
            sender,
            receiver,
            sepset,
            next_message: seed.clone(),
            previously_sent_message: seed,
            next_information_gain: MAX_INFORMATION_GAIN,
            information_gain_history: Vec::new(),
        };
        path.update_next_information_gain(sender_cluster)?;
        Ok(path)
    }

    #[inline]
    pub const fn sender(&self) -> ClusterIndex {
        self.sender
    }

    #[inline]
    pub const fn receiver(&self) -> ClusterIndex {
        self.receiver
    }

    #[inline]
    pub fn sepset(&self) -> &[VariableName] {
        &self.sepset
    }

    #[inline]
    pub const fn previously_sent_message(&self) -> &Message<F> {
        &self.previously_sent_message
    }

    #[inline]
    pub const fn next_message(&self) -> &Message<F> {
        &self.next_message
    }

    #[inline]
    pub const fn next_information_gain(&self) -> Float {
        self.next_information_gain
    }

    /// Every information gain computed for this path, oldest first.
    #[inline]
    pub fn information_gain_history(&self) -> &[Float] {
        &self.information_gain_history
    }

    /// Recompute the candidate message from the current belief of `sender`,
    /// and score it by its KL divergence from the previously sent message.
    ///
    /// Must be called whenever the sender absorbs a message, or after this
    /// path has passed its message.
    pub(crate) fn update_next_information_gain(&mut self, sender: &Cluster<F>) -> Result<()> {
        debug_assert_eq!(sender.id(), self.previously_sent_message.sender_id());
        let candidate = sender.outgoing_message(self.receiver, &self.sepset)?;
        let gain = self.previously_sent_message.factor().kl_divergence(&candidate)?;
        self.next_information_gain = if gain.is_finite() {
            gain
        } else {
            MAX_INFORMATION_GAIN
        };
        self.information_gain_history.push(self.next_information_gain);
        self.next_message = Message::new(
            sender.id(),
            self.previously_sent_message.receiver_id(),
            candidate,
        );
        Ok(())
    }

    /// Mark the candidate message as sent, and return it.
    /// The gain is stale until [`Self::update_next_information_gain`] is
    /// called again.
    pub(crate) fn pass_next_message(&mut self) -> Message<F> {
        self.previously_sent_message = self.next_message.clone();
        self.next_message.clone()
    }
}

#[cfg(test)]
mod tests {
    use cg_gaussian::Gaussian;
    use cg_linalg::array;
    use pretty_assertions::assert_eq;

    use super::*;

    fn clusters() -> (Cluster<Gaussian>, Cluster<Gaussian>) {
        let ab = Gaussian::from_covariance(["a", "b"], array![[10.0, 9.0], [9.0, 10.0]], array![1.0, 2.0], 0.0)
            .expect("valid covariance");
        let ac = Gaussian::from_covariance(["a", "c"], array![[10.0, 9.0], [9.0, 10.0]], array![1.0, 3.0], 0.0)
            .expect("valid covariance");
        (Cluster::new("c0#a,b", ab), Cluster::new("c1#a,c", ac))
    }

    #[test]
    fn seeded_path_has_a_large_finite_gain() {
        let (c0, c1) = clusters();
        let path = GraphMessagePath::new(
            (ClusterIndex(0), &c0),
            (ClusterIndex(1), &c1),
            vec![VariableName::new("a")],
            1e10,
        )
        .expect("a is in both scopes");

        let gain = path.next_information_gain();
        assert!(gain.is_finite());
        assert!(gain > 1e6, "gain = {gain}");
        assert_eq!(path.information_gain_history().len(), 1);
        assert_eq!(path.next_message().sender_id(), "c0#a,b");
        assert_eq!(path.next_message().receiver_id(), "c1#a,c");
    }

    #[test]
    fn gain_drops_to_zero_after_passing_an_unchanged_message() {
        let (c0, c1) = clusters();
        let mut path = GraphMessagePath::new(
            (ClusterIndex(0), &c0),
            (ClusterIndex(1), &c1),
            vec![VariableName::new("a")],
            1e10,
        )
        .expect("a is in both scopes");

        let sent = path.pass_next_message();
        path.update_next_information_gain(&c0).expect("a is in scope");

        assert_eq!(path.next_information_gain(), 0.0);
        assert!(path
            .previously_sent_message()
            .equals(&sent, 1e-12, 1e-12));
        assert_eq!(path.information_gain_history().len(), 2);
    }
}
