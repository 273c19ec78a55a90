//! Mutation strategies.
//!
//! A mutation maps one genome's genes onto replacement genes. The
//! population decides *whether* to mutate each individual using the
//! configured mutation probability — except for the generalization
//! operators, which declare that they apply the probability per allele
//! internally and are therefore invoked for every individual
//! (see [`Mutation::applies_probability_per_allele`]).
//!
//! The population re-checks the representation's fixed-length contract
//! after every mutation; only [`Mutation::GeneralizeVariable`] may change
//! gene count, and only on representations declared variable-length.

use std::str::FromStr;

use rand::Rng;

use crate::error::Error;
use crate::genome::Genes;

/// Wildcard symbol introduced by the generalization operators.
pub const WILDCARD: &str = "#";

const DEFAULT_WILDCARD_PROBABILITY: f64 = 0.8;
const DEFAULT_SHRINK_PROBABILITY: f64 = 0.2;

/// Gene-replacement mutation strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// Toggle one uniformly random bit. Binary genes only.
    BitFlip,

    /// Exchange two randomly chosen positions. Any gene type; preserves
    /// the gene multiset, so permutation genomes stay permutations.
    Swap,

    /// Rule-classifier generalization over `"0"`/`"1"` symbols grouped
    /// into chunks of `chunk_len`: each allele rewrites with the given
    /// per-allele probability, becoming the wildcard `"#"` with
    /// `wildcard_probability` (otherwise flipping), except the last
    /// position of each chunk — the class label — which only ever flips.
    Generalize {
        chunk_len: usize,
        wildcard_probability: f64,
    },

    /// [`Mutation::Generalize`] plus, with `shrink_probability`, deletion
    /// of one randomly chosen chunk-aligned gene block. Never shrinks
    /// below one chunk. Requires a variable-length representation.
    GeneralizeVariable {
        chunk_len: usize,
        wildcard_probability: f64,
        shrink_probability: f64,
    },
}

impl Mutation {
    /// Generalization with the stock wildcard ratio.
    pub fn generalize(chunk_len: usize) -> Self {
        Mutation::Generalize {
            chunk_len,
            wildcard_probability: DEFAULT_WILDCARD_PROBABILITY,
        }
    }

    /// Variable-length generalization with the stock wildcard and shrink
    /// ratios.
    pub fn generalize_variable(chunk_len: usize) -> Self {
        Mutation::GeneralizeVariable {
            chunk_len,
            wildcard_probability: DEFAULT_WILDCARD_PROBABILITY,
            shrink_probability: DEFAULT_SHRINK_PROBABILITY,
        }
    }

    /// Declared operator contract: when true, the operator consumes the
    /// mutation probability per allele and the population must invoke it
    /// for every individual instead of gating per individual.
    pub fn applies_probability_per_allele(&self) -> bool {
        matches!(
            self,
            Mutation::Generalize { .. } | Mutation::GeneralizeVariable { .. }
        )
    }

    /// Validates strategy parameters.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        match self {
            Mutation::BitFlip | Mutation::Swap => Ok(()),
            Mutation::Generalize {
                chunk_len,
                wildcard_probability,
            } => {
                validate_chunk_len(*chunk_len)?;
                validate_ratio("wildcard probability", *wildcard_probability)
            }
            Mutation::GeneralizeVariable {
                chunk_len,
                wildcard_probability,
                shrink_probability,
            } => {
                validate_chunk_len(*chunk_len)?;
                validate_ratio("wildcard probability", *wildcard_probability)?;
                validate_ratio("shrink probability", *shrink_probability)
            }
        }
    }

    /// Produces replacement genes for one individual.
    ///
    /// `probability` is the configured mutation probability; only the
    /// per-allele operators read it (the others were already gated by the
    /// population).
    ///
    /// # Errors
    ///
    /// [`Error::Invariant`] if the operator is applied to an incompatible
    /// gene kind, or if a chunked operator receives genes whose length is
    /// not a chunk multiple.
    pub fn apply<R: Rng>(
        &self,
        genes: &Genes,
        probability: f64,
        rng: &mut R,
    ) -> Result<Genes, Error> {
        match self {
            Mutation::BitFlip => bit_flip(genes, rng),
            Mutation::Swap => Ok(swap(genes, rng)),
            Mutation::Generalize {
                chunk_len,
                wildcard_probability,
            } => generalize(genes, probability, *chunk_len, *wildcard_probability, rng),
            Mutation::GeneralizeVariable {
                chunk_len,
                wildcard_probability,
                shrink_probability,
            } => {
                let mutated =
                    generalize(genes, probability, *chunk_len, *wildcard_probability, rng)?;
                shrink(mutated, *chunk_len, *shrink_probability, rng)
            }
        }
    }
}

impl FromStr for Mutation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "bit_flip" => Ok(Mutation::BitFlip),
            "swap" => Ok(Mutation::Swap),
            "generalize" | "generalize_variable" => Err(Error::configuration(format!(
                "{s} mutation needs a chunk length; construct it with Mutation::{s}"
            ))),
            other => Err(Error::configuration(format!(
                "unknown mutation scheme: {other}"
            ))),
        }
    }
}

fn validate_chunk_len(chunk_len: usize) -> Result<(), Error> {
    if chunk_len < 1 {
        return Err(Error::configuration("chunk length must be at least 1"));
    }
    Ok(())
}

fn validate_ratio(name: &str, value: f64) -> Result<(), Error> {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        return Err(Error::configuration(format!(
            "{name} must lie in [0.0, 1.0], got {value}"
        )));
    }
    Ok(())
}

fn bit_flip<R: Rng>(genes: &Genes, rng: &mut R) -> Result<Genes, Error> {
    let Genes::Binary(bits) = genes else {
        return Err(Error::invariant(format!(
            "bit-flip mutation needs binary genes, got {}",
            genes.kind_name()
        )));
    };
    let mut bits = bits.clone();
    if !bits.is_empty() {
        let idx = rng.random_range(0..bits.len());
        bits[idx] = !bits[idx];
    }
    Ok(Genes::Binary(bits))
}

fn swap<R: Rng>(genes: &Genes, rng: &mut R) -> Genes {
    fn swap_two<T, R: Rng>(values: &mut [T], rng: &mut R) {
        if values.len() >= 2 {
            let r1 = rng.random_range(0..values.len());
            let r2 = rng.random_range(0..values.len());
            values.swap(r1, r2);
        }
    }

    let mut genes = genes.clone();
    match &mut genes {
        Genes::Binary(v) => swap_two(v, rng),
        Genes::Integer(v) => swap_two(v, rng),
        Genes::Float(v) => swap_two(v, rng),
        Genes::Symbolic(v) => swap_two(v, rng),
    }
    genes
}

fn generalize<R: Rng>(
    genes: &Genes,
    probability: f64,
    chunk_len: usize,
    wildcard_probability: f64,
    rng: &mut R,
) -> Result<Genes, Error> {
    let Genes::Symbolic(symbols) = genes else {
        return Err(Error::invariant(format!(
            "generalization mutation needs symbolic genes, got {}",
            genes.kind_name()
        )));
    };

    let mut symbols = symbols.clone();
    for (i, symbol) in symbols.iter_mut().enumerate() {
        if rng.random_range(0.0..1.0) >= probability {
            continue;
        }
        let is_class_position = (i + 1) % chunk_len == 0;
        if is_class_position {
            // The class label never generalizes to a wildcard.
            *symbol = if symbol == "0" {
                "1".to_string()
            } else {
                "0".to_string()
            };
        } else if rng.random_range(0.0..1.0) < wildcard_probability {
            *symbol = WILDCARD.to_string();
        } else {
            *symbol = if symbol == "1" {
                "0".to_string()
            } else {
                "1".to_string()
            };
        }
    }
    Ok(Genes::Symbolic(symbols))
}

fn shrink<R: Rng>(
    genes: Genes,
    chunk_len: usize,
    shrink_probability: f64,
    rng: &mut R,
) -> Result<Genes, Error> {
    let Genes::Symbolic(mut symbols) = genes else {
        return Err(Error::invariant(
            "variable-length mutation needs symbolic genes",
        ));
    };
    if symbols.len() % chunk_len != 0 {
        return Err(Error::invariant(format!(
            "genome length {} is not a multiple of chunk length {chunk_len}",
            symbols.len()
        )));
    }

    if symbols.len() > chunk_len && rng.random_range(0.0..1.0) < shrink_probability {
        let chunk_count = symbols.len() / chunk_len;
        let victim = rng.random_range(0..chunk_count);
        symbols.drain(victim * chunk_len..(victim + 1) * chunk_len);
    }
    Ok(Genes::Symbolic(symbols))
}
