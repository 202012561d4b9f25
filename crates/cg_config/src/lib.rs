//! Configuration of cluster graph construction and message passing, read
//! from TOML.
//!
//! ```toml
//! [message-passing]
//! tol = 1e-3
//! max-iter = 50
//! almost-vacuous-variance = 1e10
//!
//! [debug]
//! verbose = false
//! debug = false
//! ```

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use typed_floats::{PositiveFinite, StrictlyPositiveFinite};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MessagePassingSection {
    /// Message passing stops once no path would pass a message with an
    /// information gain above `tol`.
    #[serde(default = "MessagePassingSection::default_tol")]
    pub tol: PositiveFinite<f64>,
    /// Upper bound on the number of rounds. A round is as many messages as
    /// there are message paths in the graph.
    #[serde(default = "MessagePassingSection::default_max_iter")]
    pub max_iter: NonZeroUsize,
    /// Variance of the placeholder message every path starts out with.
    #[serde(default = "MessagePassingSection::default_almost_vacuous_variance")]
    pub almost_vacuous_variance: StrictlyPositiveFinite<f64>,
}

impl MessagePassingSection {
    pub fn default_tol() -> PositiveFinite<f64> {
        1e-3.try_into().expect("1e-3 >= 0.0")
    }

    pub fn default_max_iter() -> NonZeroUsize {
        50.try_into().expect("50 > 0")
    }

    pub fn default_almost_vacuous_variance() -> StrictlyPositiveFinite<f64> {
        1e10.try_into().expect("1e10 > 0.0")
    }
}

impl Default for MessagePassingSection {
    fn default() -> Self {
        Self {
            tol: Self::default_tol(),
            max_iter: Self::default_max_iter(),
            almost_vacuous_variance: Self::default_almost_vacuous_variance(),
        }
    }
}

/// Diagnostic output. Has no effect on the numerical results.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DebugSection {
    /// Log a summary of every passed message at debug level instead of trace.
    #[serde(default)]
    pub verbose: bool,
    /// Log the full parameters of every passed message.
    #[serde(default)]
    pub debug:   bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// **Message passing section:**
    /// Convergence tolerance, iteration limit and the seed of every message
    /// path
    #[serde(default)]
    pub message_passing: MessagePassingSection,
    /// **Debug section:**
    #[serde(default)]
    pub debug: DebugSection,
}

impl Config {
    /// Parse a config file from a given path
    pub fn from_file<P>(path: P) -> Result<Self, ParseError>
    where
        P: AsRef<std::path::Path>,
    {
        std::fs::read_to_string(path)
            .map_err(Into::into)
            .and_then(|contents| Self::parse(contents.as_str()))
    }

    /// Parse a config file
    /// Returns a `ParseError` if the file cannot be parsed
    pub fn parse(contents: &str) -> Result<Self, ParseError> {
        toml::from_str(contents).map_err(Into::into)
    }
}
