use thiserror::Error;

/// A result type for GP regression algorithm
pub type Result<T> = std::result::Result<T, GpError>;

/// An error when using [`GaussianProcess`](crate::GaussianProcess) or one of its
/// [covariance functions](crate::covariance_functions::CovarianceFunction)
#[derive(Error, Debug)]
pub enum GpError {
    /// When an input vector length does not match the expected input dimension
    #[error("Dimension mismatch: expected input of dimension {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected input dimension
        expected: usize,
        /// Actual length of the given vector
        actual: usize,
    },
    /// When a hyperparameter vector length does not match the covariance function `param_dim`
    #[error("Hyperparameter dimension mismatch: expected {expected} values, got {actual}")]
    HyperparameterDimension {
        /// Number of hyperparameters of the covariance function
        expected: usize,
        /// Length of the given hyperparameter vector
        actual: usize,
    },
    /// When the kernel matrix of the training samples is not numerically positive definite
    #[error("Kernel matrix is not positive definite: {0}")]
    NotPositiveDefinite(String),
    /// When a covariance function specification cannot be parsed
    #[error("Invalid covariance function specification: {0}")]
    InvalidCovarianceSpec(String),
    #[error(transparent)]
    /// When linear algebra computation fails
    LinalgError(#[from] linfa_linalg::LinalgError),
    /// When a linfa error occurs
    #[error(transparent)]
    LinfaError(#[from] linfa::error::Error),
    /// When saving a model fails
    #[cfg(feature = "persistent")]
    #[error("Save error: {0}")]
    SaveError(#[from] serde_json::Error),
    /// When error during loading
    #[error("Load IO error")]
    LoadIoError(#[from] std::io::Error),
    /// When error during loading
    #[error("Load error: {0}")]
    LoadError(String),
    /// When error due to a bad value
    #[error("InvalidValue error: {0}")]
    InvalidValueError(String),
}
