//! Training samples of a GP model.
//!
//! The [SampleSet] keeps samples in insertion order: the i-th sample indexes
//! the i-th row and column of the kernel matrix.

use crate::errors::{GpError, Result};
use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Data, Ix1};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// A training observation: an input vector and its scalar target
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(deserialize = "F: Deserialize<'de>"))
)]
pub struct Sample<F: Float> {
    x: Array1<F>,
    y: F,
}

impl<F: Float> Sample<F> {
    /// Input vector
    pub fn x(&self) -> ArrayView1<'_, F> {
        self.x.view()
    }

    /// Target value
    pub fn y(&self) -> F {
        self.y
    }
}

/// An append-only, insertion-ordered collection of [Sample]s sharing the same input dimension
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(deserialize = "F: Deserialize<'de>"))
)]
pub struct SampleSet<F: Float> {
    input_dim: usize,
    samples: Vec<Sample<F>>,
}

impl<F: Float> SampleSet<F> {
    /// Constructor of an empty set for inputs of `input_dim` components
    pub fn new(input_dim: usize) -> SampleSet<F> {
        SampleSet {
            input_dim,
            samples: Vec::new(),
        }
    }

    /// Append a sample `(x, y)`.
    ///
    /// Fails with [GpError::DimensionMismatch] when `x` has not `input_dim` components,
    /// in which case the set is left untouched.
    pub fn add(&mut self, x: &ArrayBase<impl Data<Elem = F>, Ix1>, y: F) -> Result<()> {
        if x.len() != self.input_dim {
            return Err(GpError::DimensionMismatch {
                expected: self.input_dim,
                actual: x.len(),
            });
        }
        self.samples.push(Sample { x: x.to_owned(), y });
        Ok(())
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the set holds no sample
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Remove all samples
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Dimension of input vectors
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Input vector of the k-th sample
    ///
    /// *Panics* if `k` is out of bounds
    pub fn x(&self, k: usize) -> ArrayView1<'_, F> {
        self.samples[k].x()
    }

    /// Target value of the k-th sample
    ///
    /// *Panics* if `k` is out of bounds
    pub fn y(&self, k: usize) -> F {
        self.samples[k].y
    }

    /// Iterate over samples in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Sample<F>> {
        self.samples.iter()
    }

    /// Target values as a (n,) vector, in insertion order
    pub fn targets(&self) -> Array1<F> {
        self.samples.iter().map(|s| s.y).collect()
    }

    /// Input vectors as a (n, input_dim) matrix, in insertion order
    pub fn inputs(&self) -> Array2<F> {
        let mut x = Array2::zeros((self.len(), self.input_dim));
        for (mut row, s) in x.rows_mut().into_iter().zip(&self.samples) {
            row.assign(&s.x);
        }
        x
    }
}

impl<'a, F: Float> IntoIterator for &'a SampleSet<F> {
    type Item = &'a Sample<F>;
    type IntoIter = std::slice::Iter<'a, Sample<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
