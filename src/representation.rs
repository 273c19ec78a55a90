//! Genome representations.
//!
//! A [`Representation`] describes the shape and legal values of every
//! genome in a population: how many genes it has, what type each gene is,
//! and — for enumerated genes — which symbols are allowed and whether they
//! may repeat. It is immutable for the duration of a run.
//!
//! Bounds and value sets live inside the [`Kind`] variant, so a
//! representation can never carry both at once.
//!
//! # Examples
//!
//! ```
//! use sga::{Kind, Representation};
//!
//! // 16-bit binary string
//! let rep = Representation::binary(16).unwrap();
//!
//! // 10 integers in 0..=100 (the default bounds)
//! let rep = Representation::integer(10).unwrap();
//!
//! // a permutation of four symbols (duplicates disallowed)
//! let rep = Representation::permutation(
//!     ["a", "b", "c", "d"].map(String::from).to_vec(),
//! ).unwrap();
//! assert_eq!(rep.length(), 4);
//! ```

use crate::error::Error;

/// Default lower bound for integer representations.
pub const DEFAULT_INT_MIN: i64 = 0;
/// Default upper bound for integer representations.
pub const DEFAULT_INT_MAX: i64 = 100;
/// Default lower bound for float representations.
pub const DEFAULT_FLOAT_MIN: f64 = 0.0;
/// Default upper bound for float representations.
pub const DEFAULT_FLOAT_MAX: f64 = 1.0;

/// Gene type of a representation, with its legal-value payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    /// Fixed-length bit string.
    Binary,

    /// Integers drawn uniformly from `min..=max`.
    Integer { min: i64, max: i64 },

    /// Floats drawn uniformly from `min..=max`.
    Float { min: f64, max: f64 },

    /// Symbols drawn from an ordered value set.
    ///
    /// With `allow_duplicates = false` every genome is a permutation of
    /// `values`, which requires the representation length to equal
    /// `values.len()`.
    Enum {
        values: Vec<String>,
        allow_duplicates: bool,
    },
}

impl Kind {
    /// Short name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Binary => "binary",
            Kind::Integer { .. } => "integer",
            Kind::Float { .. } => "float",
            Kind::Enum { .. } => "enum",
        }
    }
}

/// Validated description of genome shape for one run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Representation {
    kind: Kind,
    length: usize,
    variable_length: bool,
}

impl Representation {
    /// Creates a representation, validating the kind/length combination.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] if `length < 1`, bounds are inverted or
    /// non-finite, the enum value set is empty or (for permutations)
    /// contains duplicates, or a no-duplicates enum has
    /// `length != values.len()`.
    pub fn new(kind: Kind, length: usize) -> Result<Self, Error> {
        if length < 1 {
            return Err(Error::configuration("length must be at least 1"));
        }

        match &kind {
            Kind::Binary => {}
            Kind::Integer { min, max } => {
                if min > max {
                    return Err(Error::configuration(format!(
                        "integer bounds inverted: min={min} > max={max}"
                    )));
                }
            }
            Kind::Float { min, max } => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(Error::configuration("float bounds must be finite"));
                }
                if min > max {
                    return Err(Error::configuration(format!(
                        "float bounds inverted: min={min} > max={max}"
                    )));
                }
            }
            Kind::Enum {
                values,
                allow_duplicates,
            } => {
                if values.is_empty() {
                    return Err(Error::configuration("enum value set must not be empty"));
                }
                if !allow_duplicates {
                    if length != values.len() {
                        return Err(Error::configuration(format!(
                            "no-duplicates enum requires length == |values|: \
                             length={length}, |values|={}",
                            values.len()
                        )));
                    }
                    let mut sorted = values.clone();
                    sorted.sort();
                    sorted.dedup();
                    if sorted.len() != values.len() {
                        return Err(Error::configuration(
                            "no-duplicates enum value set contains repeated symbols",
                        ));
                    }
                }
            }
        }

        Ok(Self {
            kind,
            length,
            variable_length: false,
        })
    }

    /// Binary representation of `length` bits.
    pub fn binary(length: usize) -> Result<Self, Error> {
        Self::new(Kind::Binary, length)
    }

    /// Integer representation with the default bounds `0..=100`.
    pub fn integer(length: usize) -> Result<Self, Error> {
        Self::integer_in(length, DEFAULT_INT_MIN, DEFAULT_INT_MAX)
    }

    /// Integer representation with explicit bounds.
    pub fn integer_in(length: usize, min: i64, max: i64) -> Result<Self, Error> {
        Self::new(Kind::Integer { min, max }, length)
    }

    /// Float representation with the default bounds `0.0..=1.0`.
    pub fn float(length: usize) -> Result<Self, Error> {
        Self::float_in(length, DEFAULT_FLOAT_MIN, DEFAULT_FLOAT_MAX)
    }

    /// Float representation with explicit bounds.
    pub fn float_in(length: usize, min: f64, max: f64) -> Result<Self, Error> {
        Self::new(Kind::Float { min, max }, length)
    }

    /// Enum representation drawing symbols with replacement.
    pub fn enumeration(length: usize, values: Vec<String>) -> Result<Self, Error> {
        Self::new(
            Kind::Enum {
                values,
                allow_duplicates: true,
            },
            length,
        )
    }

    /// Permutation representation: every genome is a shuffle of `values`.
    pub fn permutation(values: Vec<String>) -> Result<Self, Error> {
        let length = values.len();
        Self::new(
            Kind::Enum {
                values,
                allow_duplicates: false,
            },
            length,
        )
    }

    /// Declares genome length a run-time property of each genome rather
    /// than a fixed contract. Required by length-changing mutation
    /// operators.
    pub fn with_variable_length(mut self) -> Self {
        self.variable_length = true;
        self
    }

    /// The gene type and its legal-value payload.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Number of genes per genome (the initial length, for
    /// variable-length representations).
    pub fn length(&self) -> usize {
        self.length
    }

    /// Whether genomes may change length during the run.
    pub fn is_variable_length(&self) -> bool {
        self.variable_length
    }
}
