//! Best first ordering of message paths by their next information gain.

use std::{cmp::Reverse, collections::BTreeSet};

use cg_linalg::Float;
use ordered_float::OrderedFloat;

use super::id::MessagePathIndex;

type Key = (Reverse<OrderedFloat<Float>>, MessagePathIndex);

/// Message paths ordered by decreasing information gain, ties broken by
/// increasing path index.
///
/// Re-keying a single path is `O(log n)`, so only the paths affected by a
/// send have to be touched.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    order: BTreeSet<Key>,
    gains: Vec<OrderedFloat<Float>>,
}

impl Schedule {
    /// Schedule paths `0..gains.len()` with the given gains.
    pub fn new(gains: impl IntoIterator<Item = Float>) -> Self {
        let gains: Vec<_> = gains.into_iter().map(OrderedFloat).collect();
        let order = gains
            .iter()
            .enumerate()
            .map(|(index, &gain)| (Reverse(gain), MessagePathIndex(index)))
            .collect();
        Self { order, gains }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.gains.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gains.is_empty()
    }

    /// The path to send along next, and its gain.
    pub fn peek(&self) -> Option<(MessagePathIndex, Float)> {
        self.order
            .first()
            .map(|&(Reverse(gain), index)| (index, gain.into_inner()))
    }

    /// The current gain of `path`.
    pub fn gain(&self, path: MessagePathIndex) -> Option<Float> {
        self.gains.get(path.0).map(|gain| gain.into_inner())
    }

    /// Change the gain of `path`.
    ///
    /// # Panics
    ///
    /// If `path` was not part of the schedule.
    pub fn update(&mut self, path: MessagePathIndex, gain: Float) {
        let old = std::mem::replace(&mut self.gains[path.0], OrderedFloat(gain));
        self.order.remove(&(Reverse(old), path));
        self.order.insert((Reverse(OrderedFloat(gain)), path));
    }
}
