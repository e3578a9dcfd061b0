use crate::errors::{GpError, Result};
use crate::factory::CovFactory;
use linfa::{Float, ParamGuard};

use ndarray::Array1;
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Default covariance function specification: squared exponential plus white noise
pub const DEFAULT_COVARIANCE_FUNCTION: &str = "CovSum(CovSEiso, CovNoise)";

/// A set of validated GP parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(deserialize = "F: Deserialize<'de>"))
)]
pub struct GpValidParams<F: Float> {
    /// Covariance function specification (see [CovFactory])
    pub(crate) covf_spec: String,
    /// Log-hyperparameters of the covariance function, all zeros when not given
    pub(crate) loghyper: Option<Array1<F>>,
}

impl<F: Float> Default for GpValidParams<F> {
    fn default() -> GpValidParams<F> {
        GpValidParams {
            covf_spec: DEFAULT_COVARIANCE_FUNCTION.to_string(),
            loghyper: None,
        }
    }
}

impl<F: Float> GpValidParams<F> {
    /// Get covariance function specification
    pub fn covariance_function(&self) -> &str {
        &self.covf_spec
    }

    /// Get initial log-hyperparameters
    pub fn loghyper(&self) -> Option<&Array1<F>> {
        self.loghyper.as_ref()
    }
}

#[derive(Clone, Debug)]
/// The set of hyperparameters that can be specified for the execution of
/// the [GP algorithm](struct.GaussianProcess.html).
pub struct GpParams<F: Float>(GpValidParams<F>);

impl<F: Float> GpParams<F> {
    /// A constructor for GP parameters given a covariance function specification
    pub fn new(covf_spec: &str) -> GpParams<F> {
        Self(GpValidParams {
            covf_spec: covf_spec.to_string(),
            ..Default::default()
        })
    }

    /// A constructor for GP parameters from validated parameters
    pub fn new_from_valid(params: &GpValidParams<F>) -> Self {
        Self(params.clone())
    }

    /// Set covariance function specification
    pub fn covariance_function(mut self, covf_spec: &str) -> Self {
        self.0.covf_spec = covf_spec.to_string();
        self
    }

    /// Set log-hyperparameters of the covariance function.
    ///
    /// Its length has to match the number of hyperparameters of the covariance function
    /// for the training input dimension, which is checked when fitting.
    pub fn loghyper(mut self, loghyper: Array1<F>) -> Self {
        self.0.loghyper = Some(loghyper);
        self
    }
}

impl<F: Float> From<GpValidParams<F>> for GpParams<F> {
    fn from(valid: GpValidParams<F>) -> Self {
        GpParams(valid)
    }
}

impl<F: Float> ParamGuard for GpParams<F> {
    type Checked = GpValidParams<F>;
    type Error = GpError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        // grammar does not depend on input dimension
        CovFactory::create::<F>(1, &self.0.covf_spec)?;
        if let Some(loghyper) = &self.0.loghyper {
            if loghyper.iter().any(|v| !v.is_finite()) {
                return Err(GpError::InvalidValueError(format!(
                    "Log-hyperparameters should be finite, got {loghyper}"
                )));
            }
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
