//! This library implements [Gaussian Process](https://en.wikipedia.org/wiki/Gaussian_process) regression
//! with composable covariance functions, in the spirit of [libgp](https://github.com/mblum/libgp).
//!
//! A model is a [GaussianProcess] holding training samples in a [SampleSet] and a tree of
//! [covariance functions](covariance_functions) built from a textual specification
//! by the [CovFactory], for instance `CovSum(CovSEard, CovNoise)`.
//!
//! Predictions rely on the Cholesky factorization of the kernel matrix of training samples
//! which is cached and lazily rebuilt after samples or hyperparameters change.
//! The log marginal likelihood and its gradient with respect to the log-hyperparameters
//! are available to drive hyperparameters tuning.
//!
//! GP models are built either incrementally with [GaussianProcess::add_pattern] or
//! from a dataset with the linfa `Fit` trait parameterized by [GpParams].
//! Models can be saved and loaded in a line oriented text format, see [persistence].
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod algorithm;
pub mod covariance_functions;
mod errors;
mod factory;
pub mod metrics;
mod parameters;
pub mod persistence;
mod sample_set;

pub use algorithm::*;
pub use errors::*;
pub use factory::CovFactory;
pub use parameters::*;
pub use sample_set::*;
