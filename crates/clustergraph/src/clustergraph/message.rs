//! Message module.
//!
//! Contains the message clusters send to each other along a
//! [`GraphMessagePath`](super::message_path::GraphMessagePath).

use cg_gaussian::{GaussianFactorLike, VariableName};
use cg_linalg::Float;

/// A factor over the sepset of two clusters, labeled with the ids of the
/// cluster that sent it and the cluster that receives it.
#[derive(Debug, Clone)]
pub struct Message<F> {
    sender_id:   String,
    receiver_id: String,
    factor:      F,
}

impl<F: GaussianFactorLike> Message<F> {
    /// Create a new message
    #[must_use]
    pub fn new(sender_id: impl Into<String>, receiver_id: impl Into<String>, factor: F) -> Self {
        Self {
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            factor,
        }
    }

    #[inline]
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    #[inline]
    pub fn receiver_id(&self) -> &str {
        &self.receiver_id
    }

    /// The payload of the message.
    #[inline]
    pub const fn factor(&self) -> &F {
        &self.factor
    }

    #[inline]
    pub fn var_names(&self) -> &[VariableName] {
        self.factor.var_names()
    }

    /// Two messages are equal if they travel between the same clusters and
    /// their payloads are equal within tolerance.
    pub fn equals(&self, other: &Self, rtol: Float, atol: Float) -> bool {
        self.sender_id == other.sender_id
            && self.receiver_id == other.receiver_id
            && self.factor.equals(&other.factor, rtol, atol)
    }
}

impl<F: GaussianFactorLike> std::fmt::Display for Message<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}\n{}", self.sender_id, self.receiver_id, self.factor)
    }
}

#[cfg(test)]
mod tests {
    use cg_gaussian::{Gaussian, DEFAULT_FACTOR_ATOL, DEFAULT_FACTOR_RTOL};
    use cg_linalg::array;

    use super::*;

    fn payload(mean: Float) -> Gaussian {
        Gaussian::from_covariance(["a"], array![[2.0]], array![mean], 0.0).expect("valid covariance")
    }

    #[test]
    fn equals_requires_same_endpoints_and_payload() {
        let message = Message::new("c0", "c1", payload(1.0));
        assert!(message.equals(&message.clone(), DEFAULT_FACTOR_RTOL, DEFAULT_FACTOR_ATOL));
        assert!(!message.equals(&Message::new("c1", "c0", payload(1.0)), DEFAULT_FACTOR_RTOL, DEFAULT_FACTOR_ATOL));
        assert!(!message.equals(&Message::new("c0", "c1", payload(2.0)), DEFAULT_FACTOR_RTOL, DEFAULT_FACTOR_ATOL));
    }

    #[test]
    fn display_names_both_endpoints() {
        let rendered = Message::new("c0#a,b", "c1#a,c", payload(0.0)).to_string();
        assert!(rendered.starts_with("c0#a,b -> c1#a,c"));
        assert!(rendered.contains("Gaussian over [a]"));
    }
}
