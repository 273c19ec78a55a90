//! Generational genetic-algorithm engine.
//!
//! Given a genome [`Representation`], a caller-supplied [`FitnessFn`],
//! and pluggable [`Selection`] / [`Crossover`] / [`Mutation`] strategies,
//! a [`Population`] evolves candidate solutions over a fixed number of
//! generations with elitism, tracking best/worst/mean fitness per
//! generation.
//!
//! # Architecture
//!
//! - [`Representation`]: validated schema of genome shape — binary,
//!   bounded integer/float, or enum symbols with a duplicate policy.
//! - [`Genome`]: one candidate solution; immutable genes plus a
//!   compute-once normalized fitness cache.
//! - Operators ([`Selection`], [`Crossover`], [`Mutation`]): closed sets
//!   of named strategies resolved at configuration time.
//! - [`Population`]: owns the genomes and drives initialization, the
//!   generational loop {elitism → selection → crossover → mutation →
//!   fitness refresh}, and aggregate statistics.
//! - [`Observer`]: receives each generation's summary for external
//!   plotting or logging.
//!
//! Fitness is standardized internally so that higher is always better:
//! natural runs use raw scores directly, inverted runs
//! (lower-is-better domains such as tour length) remap through
//! [`FitnessPolicy::Inverted`].
//!
//! The engine is a single-threaded, in-process library: no I/O inside
//! the loop, and all randomness drawn from one seedable source for
//! reproducible runs.
//!
//! # Example
//!
//! ```
//! use sga::{fitness, GaConfig, Population, Representation, Selection};
//!
//! let representation = Representation::binary(16).unwrap();
//! let config = GaConfig::default()
//!     .with_population_size(20)
//!     .with_selection(Selection::Tournament(3))
//!     .with_mutation_probability(0.2)
//!     .with_elite_count(2)
//!     .with_seed(42);
//!
//! let mut population = Population::new(representation, fitness::all_ones, config).unwrap();
//! population.gen_population();
//! population.run(50).unwrap();
//!
//! let best = population.max_individual();
//! assert!(best.fitness() > 8.0);
//! ```
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*

pub mod config;
pub mod crossover;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod mutation;
pub mod population;
pub mod report;
pub mod representation;
pub mod selection;

pub use config::GaConfig;
pub use crossover::Crossover;
pub use error::Error;
pub use fitness::{FitnessFn, FitnessPolicy};
pub use genome::{Genes, Genome};
pub use mutation::Mutation;
pub use population::Population;
pub use report::{GenerationStats, NullObserver, Observer, TraceObserver};
pub use representation::{Kind, Representation};
pub use selection::Selection;
