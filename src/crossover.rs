//! Crossover strategies.
//!
//! Crossover recombines one pair of parent genes into two children. The
//! population pairs individuals in encounter order and enforces that the
//! operators preserve total count; the operators here enforce the
//! per-pair shape contracts.
//!
//! # Cut convention
//!
//! [`Crossover::SinglePoint`] draws a cut index in `0..=len` and gives
//! each child the head of one parent and the tail of the other:
//! `child1 = a[..cut] + b[cut..]`, `child2 = b[..cut] + a[cut..]`. A cut
//! of 0 therefore returns `(b, a)` — each child equal to one parent.

use std::str::FromStr;

use rand::Rng;

use crate::error::Error;
use crate::genome::Genes;

/// Swap ratio for uniform crossover.
const UNIFORM_RATIO: f64 = 0.5;

/// Pairwise crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// Split both parents at one uniformly random index and swap tails.
    /// Requires equal-length parents.
    #[default]
    SinglePoint,

    /// Swap each overlapping position independently with ratio 0.5.
    /// Unequal-length (variable-length) parents mix their overlap and
    /// each child keeps its own parent's tail.
    Uniform,

    /// Return unchanged copies. For domains, like tour permutations,
    /// where naive recombination breaks validity invariants.
    Noop,
}

impl Crossover {
    /// Recombines one parent pair into two children.
    ///
    /// # Errors
    ///
    /// [`Error::Invariant`] if the parents' gene kinds differ, or if
    /// single-point crossover receives unequal-length parents.
    pub fn apply<R: Rng>(&self, a: &Genes, b: &Genes, rng: &mut R) -> Result<(Genes, Genes), Error> {
        match self {
            Crossover::Noop => Ok((a.clone(), b.clone())),
            Crossover::SinglePoint => {
                if a.len() != b.len() {
                    return Err(Error::invariant(format!(
                        "single-point crossover needs equal-length parents, got {} and {}",
                        a.len(),
                        b.len()
                    )));
                }
                let cut = rng.random_range(0..=a.len());
                match (a, b) {
                    (Genes::Binary(x), Genes::Binary(y)) => {
                        let (c1, c2) = single_point_at(x, y, cut);
                        Ok((Genes::Binary(c1), Genes::Binary(c2)))
                    }
                    (Genes::Integer(x), Genes::Integer(y)) => {
                        let (c1, c2) = single_point_at(x, y, cut);
                        Ok((Genes::Integer(c1), Genes::Integer(c2)))
                    }
                    (Genes::Float(x), Genes::Float(y)) => {
                        let (c1, c2) = single_point_at(x, y, cut);
                        Ok((Genes::Float(c1), Genes::Float(c2)))
                    }
                    (Genes::Symbolic(x), Genes::Symbolic(y)) => {
                        let (c1, c2) = single_point_at(x, y, cut);
                        Ok((Genes::Symbolic(c1), Genes::Symbolic(c2)))
                    }
                    _ => Err(kind_mismatch(a, b)),
                }
            }
            Crossover::Uniform => match (a, b) {
                (Genes::Binary(x), Genes::Binary(y)) => {
                    let (c1, c2) = uniform_mix(x, y, rng);
                    Ok((Genes::Binary(c1), Genes::Binary(c2)))
                }
                (Genes::Integer(x), Genes::Integer(y)) => {
                    let (c1, c2) = uniform_mix(x, y, rng);
                    Ok((Genes::Integer(c1), Genes::Integer(c2)))
                }
                (Genes::Float(x), Genes::Float(y)) => {
                    let (c1, c2) = uniform_mix(x, y, rng);
                    Ok((Genes::Float(c1), Genes::Float(c2)))
                }
                (Genes::Symbolic(x), Genes::Symbolic(y)) => {
                    let (c1, c2) = uniform_mix(x, y, rng);
                    Ok((Genes::Symbolic(c1), Genes::Symbolic(c2)))
                }
                _ => Err(kind_mismatch(a, b)),
            },
        }
    }
}

impl FromStr for Crossover {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "single_point" => Ok(Crossover::SinglePoint),
            "uniform" => Ok(Crossover::Uniform),
            "noop" => Ok(Crossover::Noop),
            other => Err(Error::configuration(format!(
                "unknown crossover scheme: {other}"
            ))),
        }
    }
}

fn kind_mismatch(a: &Genes, b: &Genes) -> Error {
    Error::invariant(format!(
        "crossover on mismatched gene kinds: {} and {}",
        a.kind_name(),
        b.kind_name()
    ))
}

/// `child1 = a[..cut] + b[cut..]`, `child2 = b[..cut] + a[cut..]`.
fn single_point_at<T: Clone>(a: &[T], b: &[T], cut: usize) -> (Vec<T>, Vec<T>) {
    let mut c1 = Vec::with_capacity(a.len());
    c1.extend_from_slice(&a[..cut]);
    c1.extend_from_slice(&b[cut..]);

    let mut c2 = Vec::with_capacity(b.len());
    c2.extend_from_slice(&b[..cut]);
    c2.extend_from_slice(&a[cut..]);

    (c1, c2)
}

/// Swap each overlapping position with probability [`UNIFORM_RATIO`];
/// tails beyond the overlap stay with their own parent.
fn uniform_mix<T: Clone, R: Rng>(a: &[T], b: &[T], rng: &mut R) -> (Vec<T>, Vec<T>) {
    let overlap = a.len().min(b.len());
    let mut c1 = a.to_vec();
    let mut c2 = b.to_vec();
    for i in 0..overlap {
        if rng.random_range(0.0..1.0) < UNIFORM_RATIO {
            std::mem::swap(&mut c1[i], &mut c2[i]);
        }
    }
    (c1, c2)
}
