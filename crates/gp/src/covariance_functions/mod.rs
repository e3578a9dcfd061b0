//! A module for covariance functions (kernels) used to model the correlation between
//! outputs of the GP model.
//!
//! Atomic covariance functions only depend on the input dimension:
//! * isotropic and ARD squared exponential,
//! * isotropic matern 3/2 and matern 5/2,
//! * isotropic rational quadratic,
//! * linear with bias, ARD linear,
//! * independent white noise.
//!
//! Compound covariance functions ([CovSum], [CovProd]) combine two owned children,
//! so that arbitrary kernel trees can be built, for instance `CovSum(CovSEiso, CovNoise)`.
//!
//! All hyperparameters are given in log space. Their order is documented by each
//! covariance function, compound ones concatenate the parameters of their children.

mod atomic;
mod compound;

pub use atomic::*;
pub use compound::*;

use crate::errors::{GpError, Result};
use linfa::Float;
use ndarray::{Array1, ArrayView1, Zip};
use std::fmt;

/// A trait for covariance functions k(x, x') parameterized by log-hyperparameters.
///
/// The `Display` implementation gives the textual specification of the covariance function
/// which can be parsed back by [CovFactory](crate::CovFactory).
pub trait CovarianceFunction<F: Float>: fmt::Display + fmt::Debug + Send + Sync {
    /// Dimension of input vectors
    fn input_dim(&self) -> usize;

    /// Number of hyperparameters, fixed at construction
    fn param_dim(&self) -> usize;

    /// Current log-hyperparameters as a (param_dim,) vector
    fn loghyper(&self) -> Array1<F>;

    /// Replace log-hyperparameters.
    ///
    /// Fails with [GpError::HyperparameterDimension] when `p` has not `param_dim` values,
    /// in which case the current parameters are left unchanged.
    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()>;

    /// Covariance between two input vectors, symmetric in its arguments
    fn value(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F;

    /// Derivatives of `value(x1, x2)` with respect to each log-hyperparameter, (param_dim,) vector
    fn gradient(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F>;

    /// Covariance of a sample with itself.
    ///
    /// Differs from `value(x, x)` for covariance functions attached to sample identity
    /// rather than input location, like [CovNoise].
    fn variance(&self, x: ArrayView1<F>) -> F {
        self.value(x, x)
    }

    /// Derivatives of `variance(x)` with respect to each log-hyperparameter
    fn variance_gradient(&self, x: ArrayView1<F>) -> Array1<F> {
        self.gradient(x, x)
    }
}

/// Check `p` length against expected parameter dimension
pub(crate) fn check_param_dim<F: Float>(param_dim: usize, p: &ArrayView1<F>) -> Result<()> {
    if p.len() != param_dim {
        return Err(GpError::HyperparameterDimension {
            expected: param_dim,
            actual: p.len(),
        });
    }
    Ok(())
}

/// Squared euclidean distance between x1 and x2
pub(crate) fn sq_dist<F: Float>(x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> F {
    Zip::from(x1).and(x2).fold(F::zero(), |acc, a, b| {
        let d = *a - *b;
        acc + d * d
    })
}

/// Concatenation of two vectors
pub(crate) fn concat<F: Float>(a: &Array1<F>, b: &Array1<F>) -> Array1<F> {
    a.iter().chain(b.iter()).copied().collect()
}
