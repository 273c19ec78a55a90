//! Error types for the GA engine.
//!
//! Three failure classes, all fatal to the run:
//!
//! - [`Error::Configuration`]: rejected at construction time, before any
//!   generation executes.
//! - [`Error::Invariant`]: an operator broke a structural guarantee
//!   (population cardinality, fixed genome length) mid-run.
//! - [`Error::InvalidGenome`]: a fitness function received a genome that
//!   violates a domain constraint and chose to fail loudly instead of
//!   returning a misleading score.
//!
//! There are no retries: a generation step that fails aborts the run,
//! because re-running a stochastic operator would silently change the
//! evolutionary trajectory.

/// Errors produced by the GA engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid representation, operator name, or parameter value.
    ///
    /// Raised before the first generation runs; never mid-run.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An operator violated a structural invariant: wrong population
    /// cardinality after selection or crossover, or a mutated genome
    /// whose length breaks a fixed-length representation.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// A fitness function received a genome that breaks a domain
    /// constraint (e.g. a tour visiting a city twice).
    #[error("invalid genome: {0}")]
    InvalidGenome(String),
}

impl Error {
    /// Builds a [`Error::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Builds an [`Error::Invariant`].
    pub fn invariant(msg: impl Into<String>) -> Self {
        Error::Invariant(msg.into())
    }

    /// Builds an [`Error::InvalidGenome`].
    pub fn invalid_genome(msg: impl Into<String>) -> Self {
        Error::InvalidGenome(msg.into())
    }
}
