//! Fitness evaluation and normalization.
//!
//! The engine is agnostic about what fitness *means*; callers supply a
//! [`FitnessFn`] and a [`FitnessPolicy`] that maps raw scores onto a
//! higher-is-better scale. Plain closures work directly:
//!
//! ```
//! use sga::{FitnessFn, Genes};
//!
//! let ones = |genes: &Genes| match genes {
//!     Genes::Binary(bits) => bits.iter().filter(|&&b| b).count() as f64,
//!     _ => 0.0,
//! };
//! let genes = Genes::Binary(vec![true, true, false]);
//! assert_eq!(ones.evaluate(&genes, false).unwrap(), 2.0);
//! ```
//!
//! A handful of classic toy functions ([`all_ones`], [`matching_bits`],
//! [`all_small`], [`all_a`]) and a distance-matrix tour evaluator
//! ([`TourLength`]) ship with the crate; real problems live with the
//! caller.

use std::collections::HashMap;

use crate::error::Error;
use crate::genome::Genes;

/// Maps raw fitness onto the engine's internal higher-is-better scale.
///
/// `Natural` leaves scores untouched. `Inverted` serves lower-is-better
/// domains (tour length, error counts): a raw score of zero is a perfect
/// solution and maps to `+inf`, anything else to its reciprocal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitnessPolicy {
    /// Higher raw fitness is better; normalized == raw.
    #[default]
    Natural,
    /// Lower raw fitness is better; normalized = 1/raw, with 0 -> +inf.
    Inverted,
}

impl FitnessPolicy {
    /// Applies the normalization.
    pub fn normalize(self, raw: f64) -> f64 {
        match self {
            FitnessPolicy::Natural => raw,
            FitnessPolicy::Inverted => {
                if raw == 0.0 {
                    f64::INFINITY
                } else {
                    1.0 / raw
                }
            }
        }
    }
}

/// A caller-supplied fitness function.
///
/// Must be total over every syntactically valid genome of the run's
/// representation. A genome that violates a *domain* constraint (say, a
/// tour visiting a city twice under an operator set that was supposed to
/// preserve permutations) is an operator-compatibility bug; an
/// implementation may either compute something anyway or fail loudly with
/// [`Error::InvalidGenome`] — the engine aborts the run on the latter.
///
/// `validate` selects an alternative evaluation context (e.g. a held-out
/// validation set). The engine always passes `false`; external callers may
/// pass `true` when scoring finished individuals.
pub trait FitnessFn {
    /// Scores one genome.
    fn evaluate(&self, genes: &Genes, validate: bool) -> Result<f64, Error>;
}

impl<F> FitnessFn for F
where
    F: Fn(&Genes) -> f64,
{
    fn evaluate(&self, genes: &Genes, _validate: bool) -> Result<f64, Error> {
        Ok(self(genes))
    }
}

/// Counts genes equal to one (`true`, `1`, `1.0`, or `"1"`).
pub fn all_ones(genes: &Genes) -> f64 {
    let count = match genes {
        Genes::Binary(bits) => bits.iter().filter(|&&b| b).count(),
        Genes::Integer(ints) => ints.iter().filter(|&&i| i == 1).count(),
        Genes::Float(floats) => floats.iter().filter(|&&f| f == 1.0).count(),
        Genes::Symbolic(symbols) => symbols.iter().filter(|s| s.as_str() == "1").count(),
    };
    count as f64
}

/// Counts non-overlapping consecutive bit pairs whose bits match:
/// `11001100` scores 4, `10101010` scores 0. Meaningful for binary
/// genomes; anything else scores 0.
pub fn matching_bits(genes: &Genes) -> f64 {
    match genes {
        Genes::Binary(bits) => bits.chunks_exact(2).filter(|p| p[0] == p[1]).count() as f64,
        _ => 0.0,
    }
}

/// Counts floats below 0.1. Meaningful for float genomes; anything else
/// scores 0.
pub fn all_small(genes: &Genes) -> f64 {
    match genes {
        Genes::Float(floats) => floats.iter().filter(|&&f| f < 0.1).count() as f64,
        _ => 0.0,
    }
}

/// Counts symbols equal to `"a"`. Meaningful for symbolic genomes;
/// anything else scores 0.
pub fn all_a(genes: &Genes) -> f64 {
    match genes {
        Genes::Symbolic(symbols) => symbols.iter().filter(|s| s.as_str() == "a").count() as f64,
        _ => 0.0,
    }
}

/// Round-trip tour length over a symmetric distance matrix.
///
/// Built for permutation representations: the genome is read as an ordered
/// tour of city symbols and scored as the sum of leg distances, including
/// the closing leg back to the start. Lower is better — run it under
/// [`FitnessPolicy::Inverted`].
///
/// Fails with [`Error::InvalidGenome`] if the tour names an unknown city
/// or visits one twice, rather than returning a misleading length.
#[derive(Debug, Clone)]
pub struct TourLength {
    distances: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
}

impl TourLength {
    /// Builds the evaluator from city names and a matching square
    /// distance matrix (`distances[i][j]` = distance from `cities[i]` to
    /// `cities[j]`).
    pub fn new(cities: Vec<String>, distances: Vec<Vec<f64>>) -> Result<Self, Error> {
        if distances.len() != cities.len() {
            return Err(Error::configuration(format!(
                "distance matrix has {} rows for {} cities",
                distances.len(),
                cities.len()
            )));
        }
        if let Some(row) = distances.iter().find(|r| r.len() != cities.len()) {
            return Err(Error::configuration(format!(
                "distance matrix row has {} columns for {} cities",
                row.len(),
                cities.len()
            )));
        }

        let mut index = HashMap::with_capacity(cities.len());
        for (i, city) in cities.iter().enumerate() {
            if index.insert(city.clone(), i).is_some() {
                return Err(Error::configuration(format!("duplicate city name: {city}")));
            }
        }

        Ok(Self { distances, index })
    }
}

impl FitnessFn for TourLength {
    fn evaluate(&self, genes: &Genes, _validate: bool) -> Result<f64, Error> {
        let Genes::Symbolic(tour) = genes else {
            return Err(Error::invalid_genome(format!(
                "tour evaluation needs symbolic genes, got {}",
                genes.kind_name()
            )));
        };
        if tour.is_empty() {
            return Err(Error::invalid_genome("empty tour"));
        }

        let mut stops = Vec::with_capacity(tour.len());
        let mut visited = vec![false; self.index.len()];
        for city in tour {
            let &i = self
                .index
                .get(city)
                .ok_or_else(|| Error::invalid_genome(format!("unknown city: {city}")))?;
            if visited[i] {
                return Err(Error::invalid_genome(format!("tour visits {city} twice")));
            }
            visited[i] = true;
            stops.push(i);
        }

        let mut total = 0.0;
        for (pos, &from) in stops.iter().enumerate() {
            let to = stops[(pos + 1) % stops.len()];
            total += self.distances[from][to];
        }
        Ok(total)
    }
}
