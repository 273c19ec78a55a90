//! Selection strategies.
//!
//! Selection maps a population onto a same-sized population of parent
//! copies; fit individuals may be replicated and unfit ones dropped. The
//! returned genomes are deep copies, never aliases of the input.
//!
//! Both strategies read the *normalized* (higher-is-better) fitness, so
//! they work unchanged for natural and inverted runs.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use std::str::FromStr;

use rand::Rng;

use crate::error::Error;
use crate::genome::Genome;

/// Tournament size used when the strategy is resolved by bare name.
pub const DEFAULT_TOURNAMENT_SIZE: usize = 3;

/// Parent-selection strategy.
///
/// # Examples
///
/// ```
/// use sga::Selection;
///
/// let roulette: Selection = "roulette".parse().unwrap();
/// let tournament = Selection::Tournament(10);
/// assert_eq!(roulette, Selection::Roulette);
/// assert!("steady_state".parse::<Selection>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Fitness-proportionate selection via inverse-CDF sampling over the
    /// cumulative fitness weights.
    ///
    /// Negative fitness contributes zero weight. If every weight is zero
    /// the draw degenerates to uniform; if any individual holds infinite
    /// (perfect inverted) fitness, draws are uniform over the perfect
    /// individuals only.
    Roulette,

    /// Tournament without replacement: shuffle the population, partition
    /// it into groups of `k`, and advance each group's fittest; repeat
    /// rounds until every slot is filled.
    ///
    /// Each individual enters at most one group per round, so
    /// `k == |population|` always yields copies of the single fittest
    /// individual, and `k == 1` reproduces the population unchanged (as
    /// a multiset). `k` is clamped to the population size at draw time.
    Tournament(usize),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Roulette
    }
}

impl Selection {
    /// Replaces a population with selected parent copies.
    ///
    /// Every genome must already be evaluated; the engine guarantees this
    /// before selection runs.
    ///
    /// # Panics
    ///
    /// Panics if `individuals` is empty.
    pub fn apply<R: Rng>(&self, individuals: &[Genome], rng: &mut R) -> Vec<Genome> {
        assert!(
            !individuals.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Roulette => roulette(individuals, rng),
            Selection::Tournament(k) => tournament(individuals, *k, rng),
        }
    }

    /// Validates strategy parameters.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        match self {
            Selection::Roulette => Ok(()),
            Selection::Tournament(0) => {
                Err(Error::configuration("tournament size must be at least 1"))
            }
            Selection::Tournament(_) => Ok(()),
        }
    }
}

impl FromStr for Selection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "roulette" => Ok(Selection::Roulette),
            "tournament" => Ok(Selection::Tournament(DEFAULT_TOURNAMENT_SIZE)),
            other => Err(Error::configuration(format!(
                "unknown selection scheme: {other}"
            ))),
        }
    }
}

/// Roulette wheel: N inverse-CDF draws over cumulative fitness weight.
fn roulette<R: Rng>(individuals: &[Genome], rng: &mut R) -> Vec<Genome> {
    let n = individuals.len();
    let weights: Vec<f64> = individuals.iter().map(|g| g.fitness().max(0.0)).collect();

    // A perfect inverted-fitness solution carries infinite weight and
    // owns the whole wheel.
    if weights.iter().any(|w| w.is_infinite()) {
        let perfect: Vec<usize> = weights
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_infinite())
            .map(|(i, _)| i)
            .collect();
        return (0..n)
            .map(|_| individuals[perfect[rng.random_range(0..perfect.len())]].clone())
            .collect();
    }

    let mut cumulative = Vec::with_capacity(n);
    let mut total = 0.0;
    for w in &weights {
        total += w;
        cumulative.push(total);
    }

    if total <= 0.0 {
        return (0..n)
            .map(|_| individuals[rng.random_range(0..n)].clone())
            .collect();
    }

    (0..n)
        .map(|_| {
            let threshold = rng.random_range(0.0..total);
            let idx = cumulative.partition_point(|&c| c <= threshold);
            individuals[idx.min(n - 1)].clone()
        })
        .collect()
}

/// Tournament without replacement: rounds of shuffle-partition-compete
/// until the population is refilled. First seen wins ties within a group.
fn tournament<R: Rng>(individuals: &[Genome], k: usize, rng: &mut R) -> Vec<Genome> {
    use rand::seq::SliceRandom;

    let n = individuals.len();
    let k = k.clamp(1, n);
    let mut order: Vec<usize> = (0..n).collect();

    let mut selected = Vec::with_capacity(n);
    while selected.len() < n {
        order.shuffle(rng);
        for group in order.chunks(k) {
            if selected.len() == n {
                break;
            }
            let mut best = group[0];
            for &idx in &group[1..] {
                if individuals[idx].fitness() > individuals[best].fitness() {
                    best = idx;
                }
            }
            selected.push(individuals[best].clone());
        }
    }
    selected
}
