//! Engine configuration.
//!
//! [`GaConfig`] collects every knob the (external) CLI layer exposes:
//! population size, operator strategies, operator probabilities, elite
//! count, the natural-fitness flag, and an optional RNG seed. The
//! generation count is not configuration — it is the argument to
//! [`Population::run`](crate::Population::run).
//!
//! # Builder Pattern
//!
//! ```
//! use sga::{Crossover, GaConfig, Mutation, Selection};
//!
//! let config = GaConfig::default()
//!     .with_population_size(50)
//!     .with_selection(Selection::Tournament(10))
//!     .with_crossover(Crossover::Noop)
//!     .with_mutation(Mutation::Swap)
//!     .with_natural_fitness(false)
//!     .with_seed(42);
//! assert!(config.validate().is_ok());
//! ```

use crate::crossover::Crossover;
use crate::error::Error;
use crate::fitness::FitnessPolicy;
use crate::mutation::Mutation;
use crate::selection::Selection;

/// Configuration for one GA run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Requested number of individuals. Rounded up to even at
    /// construction so that crossover pairing is total.
    pub population_size: usize,

    /// Parent-selection strategy.
    pub selection: Selection,

    /// Pairwise crossover strategy.
    pub crossover: Crossover,

    /// Gene-replacement mutation strategy.
    pub mutation: Mutation,

    /// Probability of crossing over each parent pair, in `[0.0, 1.0]`.
    pub crossover_probability: f64,

    /// Probability of mutating each individual, in `[0.0, 1.0]`.
    /// Per-allele operators consume it per gene instead.
    pub mutation_probability: f64,

    /// Number of fittest individuals withheld from the operators each
    /// generation. Rounded up to even (unless zero).
    pub elite_count: usize,

    /// True when higher raw fitness means fitter; false remaps
    /// lower-is-better raw scores via
    /// [`FitnessPolicy::Inverted`].
    pub natural_fitness: bool,

    /// Seed for the run's random source. `None` seeds from entropy;
    /// reproducible runs must set it.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            selection: Selection::Roulette,
            crossover: Crossover::SinglePoint,
            mutation: Mutation::BitFlip,
            crossover_probability: 0.5,
            mutation_probability: 0.01,
            elite_count: 6,
            natural_fitness: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the requested population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Convenience for `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Sets the crossover strategy.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the mutation strategy.
    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    /// Sets the natural-fitness flag.
    pub fn with_natural_fitness(mut self, natural: bool) -> Self {
        self.natural_fitness = natural;
        self
    }

    /// Sets the RNG seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Population size after rounding up to even.
    pub fn effective_population_size(&self) -> usize {
        round_up_even(self.population_size)
    }

    /// Elite count after rounding up to even (zero stays zero).
    pub fn effective_elite_count(&self) -> usize {
        round_up_even(self.elite_count)
    }

    /// The fitness normalization this run uses.
    pub fn fitness_policy(&self) -> FitnessPolicy {
        if self.natural_fitness {
            FitnessPolicy::Natural
        } else {
            FitnessPolicy::Inverted
        }
    }

    /// Validates every knob.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] on an out-of-range probability, a
    /// population too small to pair, elites that would fill the entire
    /// population, or invalid operator parameters.
    pub fn validate(&self) -> Result<(), Error> {
        if self.population_size < 2 {
            return Err(Error::configuration("population size must be at least 2"));
        }
        validate_probability("crossover probability", self.crossover_probability)?;
        validate_probability("mutation probability", self.mutation_probability)?;
        self.selection.validate()?;
        self.mutation.validate()?;

        if self.effective_elite_count() >= self.effective_population_size() {
            return Err(Error::configuration(format!(
                "elite count {} (rounded to {}) leaves no individuals to evolve in a \
                 population of {}",
                self.elite_count,
                self.effective_elite_count(),
                self.effective_population_size()
            )));
        }
        Ok(())
    }
}

fn round_up_even(n: usize) -> usize {
    if n % 2 == 0 {
        n
    } else {
        n + 1
    }
}

fn validate_probability(name: &str, p: f64) -> Result<(), Error> {
    if !(0.0..=1.0).contains(&p) || p.is_nan() {
        return Err(Error::configuration(format!(
            "{name} must lie in [0.0, 1.0], got {p}"
        )));
    }
    Ok(())
}
