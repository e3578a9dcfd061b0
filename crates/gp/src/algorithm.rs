use crate::covariance_functions::CovarianceFunction;
use crate::errors::{GpError, Result};
use crate::factory::CovFactory;
use crate::parameters::{GpParams, GpValidParams};
use crate::sample_set::SampleSet;

use linfa::prelude::{DatasetBase, Fit, Float};
use linfa_linalg::{cholesky::*, triangular::*};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix1, Ix2};

use log::{debug, warn};
use rayon::prelude::*;
use std::fmt;
use std::time::Instant;

/// Internal parameters computed from the training samples
/// used later on in prediction computations
#[derive(Debug)]
pub(crate) struct GpInnerParams<F: Float> {
    /// Cholesky decomposition of the kernel matrix \[K\]
    r_chol: Array2<F>,
    /// Solution of the linear equation system : \[K\] x alpha = y
    alpha: Array1<F>,
}

impl<F: Float> GpInnerParams<F> {
    /// Build the kernel matrix of the given non empty sample set then factorize it
    fn compute(covf: &dyn CovarianceFunction<F>, sampleset: &SampleSet<F>) -> Result<Self> {
        let n = sampleset.len();
        let mut k_mx = Array2::<F>::zeros((n, n));
        let mut n_duplicates = 0;
        for i in 0..n {
            let xi = sampleset.x(i);
            for j in 0..i {
                let xj = sampleset.x(j);
                if xi == xj {
                    n_duplicates += 1;
                }
                let kij = covf.value(xj, xi);
                k_mx[[i, j]] = kij;
                k_mx[[j, i]] = kij;
            }
            k_mx[[i, i]] = covf.variance(xi);
        }
        if n_duplicates > 0 {
            warn!("{n_duplicates} pair(s) of training samples share the same input vector");
        }

        let r_chol = k_mx.cholesky().map_err(|err| {
            warn!("Cholesky factorization of kernel matrix failed ({covf})");
            GpError::NotPositiveDefinite(err.to_string())
        })?;
        // Factorization may end up with null or nan pivots instead of failing
        if let Some((i, d)) = r_chol
            .diag()
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_finite() || **d <= F::zero())
        {
            warn!("Cholesky factorization of kernel matrix failed ({covf})");
            return Err(GpError::NotPositiveDefinite(format!(
                "pivot {i} of the factorization is {d}"
            )));
        }

        let y = sampleset.targets().insert_axis(Axis(1));
        let yt = r_chol.solve_triangular(&y, UPLO::Lower)?;
        let alpha = r_chol
            .t()
            .solve_triangular_into(yt, UPLO::Upper)?
            .remove_axis(Axis(1));
        Ok(GpInnerParams { r_chol, alpha })
    }
}

/// Return the cached factorization, rebuilding it first when stale.
/// On failure the cache is left stale.
fn refresh<'a, F: Float>(
    cache: &'a mut Option<GpInnerParams<F>>,
    covf: &dyn CovarianceFunction<F>,
    sampleset: &SampleSet<F>,
) -> Result<&'a GpInnerParams<F>> {
    let inner = match cache.take() {
        Some(inner) => inner,
        None => {
            let now = Instant::now();
            let inner = GpInnerParams::compute(covf, sampleset)?;
            debug!(
                "Rebuild kernel factorization with {} samples in {:?}",
                sampleset.len(),
                now.elapsed()
            );
            inner
        }
    };
    Ok(cache.insert(inner))
}

/// Posterior queries on a fresh model
struct Posterior<'a, F: Float> {
    covf: &'a dyn CovarianceFunction<F>,
    sampleset: &'a SampleSet<F>,
    /// None when there is no training sample
    inner: Option<&'a GpInnerParams<F>>,
}

impl<F: Float> Posterior<'_, F> {
    /// Kernel values between x and each training sample
    fn k_star(&self, x: ArrayView1<F>) -> Array1<F> {
        self.sampleset
            .iter()
            .map(|s| self.covf.value(x, s.x()))
            .collect()
    }

    fn mean(&self, x: ArrayView1<F>) -> F {
        match self.inner {
            None => F::zero(),
            Some(inner) => self.k_star(x).dot(&inner.alpha),
        }
    }

    fn valvar(&self, x: ArrayView1<F>) -> Result<(F, F)> {
        let prior = self.covf.variance(x);
        match self.inner {
            None => Ok((F::zero(), prior)),
            Some(inner) => {
                let k_star = self.k_star(x);
                let mean = k_star.dot(&inner.alpha);
                let v = inner
                    .r_chol
                    .solve_triangular(&k_star.insert_axis(Axis(1)), UPLO::Lower)?;
                let var = prior - v.iter().fold(F::zero(), |acc, &vi| acc + vi * vi);
                // Variance might be slightly negative depending on
                // machine precision: set to zero in that case
                Ok((mean, if var < F::zero() { F::zero() } else { var }))
            }
        }
    }
}

/// A Gaussian process regression model.
///
/// The output is modeled as a zero mean gaussian process `Y(x) ~ GP(0, k(x, x'))`
/// where the covariance function `k` is any tree of [covariance functions](crate::covariance_functions)
/// parameterized by log-hyperparameters.
///
/// Given training samples `(X, y)`, the model predicts at a query point `x`:
/// * the posterior mean `k*ᵀ.K⁻¹.y`
/// * the posterior variance `k(x, x) - k*ᵀ.K⁻¹.k*`
///
/// where `K` is the kernel matrix of the training inputs and `k*` the vector
/// of kernel values between `x` and the training inputs.
///
/// # Implementation
///
/// * The Cholesky factorization `K = L.Lᵀ` and the weights `alpha = K⁻¹.y` are cached.
///   Adding a sample or changing hyperparameters invalidates the cache which is
///   rebuilt on the next prediction, hence prediction methods take `&mut self`.
/// * Batch predictions refresh the cache once then evaluate points in parallel using
///   [rayon](https://github.com/rayon-rs/rayon).
/// * Predicted variances are clamped to zero when rounding errors make them negative.
/// * Without training sample, predicted mean is zero and variance is the prior `k(x, x)`.
///
/// # Features
///
/// ## serializable
///
/// The `serializable` feature enables the serialization of GP models using the [`serde crate`](https://serde.rs/).
/// The factorization cache is not serialized and is rebuilt on first prediction.
///
/// ## persistent
///
/// The `persistent` feature enables `save_json()`/`load_json()` methods.
///
/// # Example
///
/// ```no_run
/// use gpr::GaussianProcess;
/// use linfa::prelude::*;
/// use ndarray::{arr2, Array, Array1, Array2, Axis};
///
/// // one-dimensional test function to approximate
/// fn xsinx(x: &Array2<f64>) -> Array1<f64> {
///     ((x - 3.5) * ((x - 3.5) / std::f64::consts::PI).mapv(|v| v.sin())).remove_axis(Axis(1))
/// }
///
/// // training data
/// let xt = arr2(&[[0.0], [5.0], [10.0], [15.0], [18.0], [20.0], [25.0]]);
/// let yt = xsinx(&xt);
///
/// // GP with squared exponential kernel plus a small white noise
/// let mut gp = GaussianProcess::<f64>::params("CovSum(CovSEiso, CovNoise)")
///     .loghyper(Array1::from(vec![1.0, 2.0, -3.0]))
///     .fit(&Dataset::new(xt, yt))
///     .expect("GP fitted");
///
/// let xtest = Array::linspace(0., 25., 26).insert_axis(Axis(1));
/// let (ypred, yvars) = gp.predict_valvars(&xtest).expect("GP prediction");
/// ```
#[derive(Debug)]
pub struct GaussianProcess<F: Float> {
    /// Dimension of input vectors
    input_dim: usize,
    /// Covariance function tree
    covf: Box<dyn CovarianceFunction<F>>,
    /// Training samples
    sampleset: SampleSet<F>,
    /// Factorization cache, `None` when stale
    inner_params: Option<GpInnerParams<F>>,
}

impl<F: Float> fmt::Display for GaussianProcess<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "GP(covf={}, loghyper={}, n_samples={})",
            self.covf,
            self.covf.loghyper(),
            self.sampleset.len()
        )
    }
}

impl<F: Float> GaussianProcess<F> {
    /// Gp parameters contructor
    pub fn params(covf_spec: &str) -> GpParams<F> {
        GpParams::new(covf_spec)
    }

    /// Create a model without training sample for inputs of `input_dim` components
    /// using the covariance function given by its specification (see [CovFactory]).
    pub fn new(input_dim: usize, covf_spec: &str) -> Result<Self> {
        Ok(Self::from_covariance(CovFactory::create(input_dim, covf_spec)?))
    }

    /// Create a model without training sample taking ownership of the given covariance function.
    /// The input dimension is the one of the covariance function.
    pub fn from_covariance(covf: Box<dyn CovarianceFunction<F>>) -> Self {
        let input_dim = covf.input_dim();
        GaussianProcess {
            input_dim,
            covf,
            sampleset: SampleSet::new(input_dim),
            inner_params: None,
        }
    }

    /// Add a training sample `(x, y)`
    pub fn add_pattern(&mut self, x: &ArrayBase<impl Data<Elem = F>, Ix1>, y: F) -> Result<()> {
        self.sampleset.add(x, y)?;
        self.inner_params = None;
        Ok(())
    }

    /// Set the log-hyperparameters of the covariance function.
    ///
    /// When `p` has not [param_dim](Self::param_dim) values the model is left unchanged
    /// and an [GpError::HyperparameterDimension] error is returned.
    pub fn set_hyperparameters(&mut self, p: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<()> {
        self.covf.set_loghyper(p.view())?;
        self.inner_params = None;
        Ok(())
    }

    /// Remove all training samples
    pub fn clear_sampleset(&mut self) {
        self.sampleset.clear();
        self.inner_params = None;
    }

    fn check_input_dim(&self, len: usize) -> Result<()> {
        if len != self.input_dim {
            return Err(GpError::DimensionMismatch {
                expected: self.input_dim,
                actual: len,
            });
        }
        Ok(())
    }

    fn posterior(&mut self) -> Result<Posterior<'_, F>> {
        let inner = if self.sampleset.is_empty() {
            None
        } else {
            Some(refresh(
                &mut self.inner_params,
                self.covf.as_ref(),
                &self.sampleset,
            )?)
        };
        Ok(Posterior {
            covf: self.covf.as_ref(),
            sampleset: &self.sampleset,
            inner,
        })
    }

    /// Predict output value at the given `x` point of `input_dim` components
    pub fn predict(&mut self, x: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<F> {
        self.check_input_dim(x.len())?;
        Ok(self.posterior()?.mean(x.view()))
    }

    /// Predict both output value and variance at the given `x` point of `input_dim` components
    pub fn predict_valvar(&mut self, x: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<(F, F)> {
        self.check_input_dim(x.len())?;
        self.posterior()?.valvar(x.view())
    }

    /// Predict output values at n given `x` points of nx components specified as a (n, nx) matrix.
    /// Returns n scalar output values as a vector (n,).
    pub fn predict_values(&mut self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array1<F>> {
        self.check_input_dim(x.ncols())?;
        let posterior = self.posterior()?;
        let values = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|xi| posterior.mean(xi))
            .collect::<Vec<_>>();
        Ok(Array1::from_vec(values))
    }

    /// Predict variance values at n given `x` points of nx components specified as a (n, nx) matrix.
    /// Returns n variance values as a vector (n,).
    pub fn predict_vars(&mut self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array1<F>> {
        Ok(self.predict_valvars(x)?.1)
    }

    /// Predict both output values and variances at n given `x` points of nx components
    pub fn predict_valvars(
        &mut self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<(Array1<F>, Array1<F>)> {
        self.check_input_dim(x.ncols())?;
        let posterior = self.posterior()?;
        let valvars = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|xi| posterior.valvar(xi))
            .collect::<Result<Vec<_>>>()?;
        let (values, vars): (Vec<F>, Vec<F>) = valvars.into_iter().unzip();
        Ok((Array1::from_vec(values), Array1::from_vec(vars)))
    }

    /// Log marginal likelihood of the training targets
    /// `-½.yᵀ.K⁻¹.y - ½.log|K| - n/2.log(2π)`, zero without training sample.
    pub fn log_likelihood(&mut self) -> Result<F> {
        if self.sampleset.is_empty() {
            return Ok(F::zero());
        }
        let inner = refresh(
            &mut self.inner_params,
            self.covf.as_ref(),
            &self.sampleset,
        )?;
        let y = self.sampleset.targets();
        let half = F::cast(0.5);
        let n = F::cast(y.len());
        // The log determinant of K is twice the sum of the log diagonal
        // elements of its Cholesky factor
        let half_logdet = inner.r_chol.diag().mapv(|v| v.ln()).sum();
        Ok(-half * y.dot(&inner.alpha)
            - half_logdet
            - half * n * F::cast(2. * std::f64::consts::PI).ln())
    }

    /// Gradient of the [log likelihood](Self::log_likelihood) with respect to the log-hyperparameters
    /// `½.tr((α.αᵀ - K⁻¹).∂K/∂θj)`, zero without training sample.
    pub fn log_likelihood_gradient(&mut self) -> Result<Array1<F>> {
        let mut grad = Array1::zeros(self.covf.param_dim());
        if self.sampleset.is_empty() {
            return Ok(grad);
        }
        let inner = refresh(
            &mut self.inner_params,
            self.covf.as_ref(),
            &self.sampleset,
        )?;
        let n = self.sampleset.len();
        // K⁻¹ = L⁻ᵀ.L⁻¹
        let r_chol_inv = inner
            .r_chol
            .solve_triangular(&Array2::eye(n), UPLO::Lower)?;
        let k_inv = r_chol_inv.t().dot(&r_chol_inv);
        let alpha = inner.alpha.view().insert_axis(Axis(1));
        let w = alpha.dot(&alpha.t()) - k_inv;

        let half = F::cast(0.5);
        for i in 0..n {
            let xi = self.sampleset.x(i);
            grad.scaled_add(half * w[[i, i]], &self.covf.variance_gradient(xi));
            for j in 0..i {
                grad.scaled_add(w[[i, j]], &self.covf.gradient(self.sampleset.x(j), xi));
            }
        }
        Ok(grad)
    }

    /// Number of training samples
    pub fn sample_count(&self) -> usize {
        self.sampleset.len()
    }

    /// Number of log-hyperparameters of the covariance function
    pub fn param_dim(&self) -> usize {
        self.covf.param_dim()
    }

    /// Dimension of input vectors
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Current log-hyperparameters of the covariance function
    pub fn loghyper(&self) -> Array1<F> {
        self.covf.loghyper()
    }

    /// Covariance function
    pub fn covariance_function(&self) -> &dyn CovarianceFunction<F> {
        self.covf.as_ref()
    }

    /// Training samples
    pub fn sampleset(&self) -> &SampleSet<F> {
        &self.sampleset
    }

    /// Training dataset as (inputs (n, nx), targets (n,))
    pub fn training_data(&self) -> (Array2<F>, Array1<F>) {
        (self.sampleset.inputs(), self.sampleset.targets())
    }

    /// Whether the factorization cache is consistent with current samples and hyperparameters
    pub fn is_fresh(&self) -> bool {
        self.inner_params.is_some()
    }
}

impl<F: Float, D: Data<Elem = F>> Fit<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>, GpError>
    for GpValidParams<F>
{
    type Object = GaussianProcess<F>;

    /// Build a GP model holding every dataset row as a training sample.
    /// The kernel matrix is factorized so that the returned model is fresh.
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>>,
    ) -> Result<Self::Object> {
        let x = dataset.records();
        let y = dataset.targets();
        if x.nrows() != y.len() {
            return Err(GpError::InvalidValueError(format!(
                "Training inputs ({}) and targets ({}) count differ",
                x.nrows(),
                y.len()
            )));
        }

        let mut gp = GaussianProcess::new(x.ncols(), self.covariance_function())?;
        if let Some(loghyper) = self.loghyper() {
            gp.set_hyperparameters(loghyper)?;
        }
        for (xi, yi) in x.outer_iter().zip(y.iter()) {
            gp.add_pattern(&xi, *yi)?;
        }
        gp.posterior()?;
        debug!("Fitted {gp}");
        Ok(gp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_abs_diff_ne};
    use finitediff::FiniteDiff;
    use linfa::prelude::Dataset;
    use ndarray::{array, Array};
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use paste::paste;
    use rand_xoshiro::Xoshiro256Plus;

    fn xsinx(x: &Array2<f64>) -> Array1<f64> {
        ((x - 3.5) * ((x - 3.5) / std::f64::consts::PI).mapv(|v| v.sin())).remove_axis(Axis(1))
    }

    fn gp_1d(spec: &str, loghyper: Array1<f64>) -> GaussianProcess<f64> {
        let xt = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
        let yt = array![0.0, 1.0, 1.5, 0.9, 1.0];
        GaussianProcess::<f64>::params(spec)
            .loghyper(loghyper)
            .fit(&Dataset::new(xt, yt))
            .expect("GP fit error")
    }

    macro_rules! test_gp_interpolation {
        ($name:ident, $spec:expr) => {
            paste! {
                #[test]
                fn [<test_gp_interpolation_ $name>]() {
                    let xt = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
                    let yt = array![0.0, 1.0, 1.5, 0.9, 1.0];
                    let mut gp = GaussianProcess::<f64>::params($spec)
                        .fit(&Dataset::new(xt.clone(), yt.clone()))
                        .expect("GP fit error");
                    let (yvals, yvars) = gp.predict_valvars(&xt).expect("prediction error");
                    assert_abs_diff_eq!(yvals, yt, epsilon = 1e-6);
                    assert_abs_diff_eq!(yvars, Array1::<f64>::zeros(5), epsilon = 1e-6);

                    let yvars = gp.predict_vars(&array![[1.5], [10.]]).expect("prediction error");
                    assert!(yvars[0] > 0.);
                    assert!(yvars[0] < yvars[1]);
                }
            }
        };
    }

    test_gp_interpolation!(se_iso, "CovSEiso");
    test_gp_interpolation!(se_ard, "CovSEard");
    test_gp_interpolation!(matern3_iso, "CovMatern3iso");
    test_gp_interpolation!(matern5_iso, "CovMatern5iso");
    test_gp_interpolation!(rq_iso, "CovRQiso");

    #[test]
    fn test_xsinx() {
        let xt = array![[0.0], [5.0], [10.0], [15.0], [18.0], [20.0], [25.0]];
        let yt = xsinx(&xt);
        let mut gp = GaussianProcess::<f64>::params("CovSum(CovSEiso, CovNoise)")
            .loghyper(array![1.0, 2.0, -3.0])
            .fit(&Dataset::new(xt, yt))
            .expect("GP fit error");
        let xtest = array![[5.0], [10.0]];
        let ytest = gp.predict_values(&xtest).expect("prediction error");
        assert_abs_diff_eq!(ytest, xsinx(&xtest), epsilon = 0.1);
    }

    #[test]
    fn test_cache_equivalence() {
        let mut gp = gp_1d("CovSEiso", array![0.2, 0.1]);
        let x = array![1.7];
        let first = gp.predict_valvar(&x).unwrap();
        assert!(gp.is_fresh());
        let second = gp.predict_valvar(&x).unwrap();
        assert_eq!(first, second);
        assert_eq!(gp.predict(&x).unwrap(), first.0);
    }

    #[test]
    fn test_invalidation_on_hyperparameters() {
        let mut gp = gp_1d("CovSEiso", array![0., 0.]);
        let x = array![1.5];
        let before = gp.predict(&x).unwrap();
        assert!(gp.is_fresh());

        gp.set_hyperparameters(&array![f64::ln(0.5), 0.]).unwrap();
        assert!(!gp.is_fresh());
        let after = gp.predict(&x).unwrap();
        assert!(gp.is_fresh());
        assert_abs_diff_ne!(before, after, epsilon = 1e-6);

        let mut other = gp_1d("CovSEiso", array![f64::ln(0.5), 0.]);
        assert_abs_diff_eq!(after, other.predict(&x).unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_invalidation_on_add_pattern() {
        let mut gp = gp_1d("CovSEiso", array![0., 0.]);
        let x = array![5.];
        let before = gp.predict(&x).unwrap();
        gp.add_pattern(&x, 3.).unwrap();
        assert!(!gp.is_fresh());
        assert_eq!(gp.sample_count(), 6);
        let after = gp.predict(&x).unwrap();
        assert_abs_diff_ne!(before, after, epsilon = 1e-3);
        assert_abs_diff_eq!(after, 3., epsilon = 1e-6);
    }

    #[test]
    fn test_empty_sampleset() {
        let mut gp = GaussianProcess::<f64>::new(2, "CovSum(CovSEiso, CovNoise)").unwrap();
        let x = array![0.3, -1.2];
        assert_eq!(gp.predict(&x).unwrap(), 0.);
        let (mean, var) = gp.predict_valvar(&x).unwrap();
        assert_eq!(mean, 0.);
        assert_abs_diff_eq!(var, 2., epsilon = 1e-12);
        assert_eq!(gp.log_likelihood().unwrap(), 0.);
        assert_abs_diff_eq!(gp.log_likelihood_gradient().unwrap(), Array1::<f64>::zeros(3));
        let (vals, vars) = gp.predict_valvars(&array![[0., 0.], [1., 1.]]).unwrap();
        assert_abs_diff_eq!(vals, Array1::<f64>::zeros(2));
        assert_abs_diff_eq!(vars, array![2., 2.], epsilon = 1e-12);
    }

    #[test]
    fn test_clear_sampleset() {
        let mut gp = gp_1d("CovSEiso", array![0., 0.]);
        assert!(gp.is_fresh());
        gp.clear_sampleset();
        assert!(!gp.is_fresh());
        assert_eq!(gp.sample_count(), 0);
        assert_eq!(gp.predict(&array![1.]).unwrap(), 0.);
    }

    #[test]
    fn test_dimension_mismatch_rejection() {
        let mut gp = gp_1d("CovSEiso", array![0.3, 0.]);
        let x = array![2.5];
        let before = gp.predict_valvar(&x).unwrap();

        let err = gp.add_pattern(&array![1., 2.], 0.5).unwrap_err();
        assert!(matches!(
            err,
            GpError::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        ));
        let err = gp.set_hyperparameters(&array![1.]).unwrap_err();
        assert!(matches!(
            err,
            GpError::HyperparameterDimension {
                expected: 2,
                actual: 1
            }
        ));
        assert!(gp.is_fresh());
        assert_eq!(gp.sample_count(), 5);
        assert_abs_diff_eq!(gp.loghyper(), array![0.3, 0.]);
        assert_eq!(gp.predict_valvar(&x).unwrap(), before);

        assert!(matches!(
            gp.predict(&array![1., 2.]),
            Err(GpError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            gp.predict_values(&array![[1., 2.]]),
            Err(GpError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_duplicate_inputs_without_noise() {
        let mut gp = GaussianProcess::<f64>::new(1, "CovSEiso").unwrap();
        gp.add_pattern(&array![1.], 0.).unwrap();
        gp.add_pattern(&array![1.], 1.).unwrap();
        let res = gp.predict(&array![1.]);
        assert!(matches!(res, Err(GpError::NotPositiveDefinite(_))));
        assert!(!gp.is_fresh());
    }

    #[test]
    fn test_duplicate_inputs_with_noise() {
        let mut gp = GaussianProcess::<f64>::new(1, "CovSum(CovSEiso, CovNoise)").unwrap();
        gp.set_hyperparameters(&array![0., 0., f64::ln(0.1)])
            .unwrap();
        gp.add_pattern(&array![1.], 0.).unwrap();
        gp.add_pattern(&array![1.], 1.).unwrap();
        let (mean, var) = gp.predict_valvar(&array![1.]).unwrap();
        assert_abs_diff_eq!(mean, 1. / 2.01, epsilon = 1e-10);
        assert!(var.is_finite() && var > 0.);
    }

    #[test]
    fn test_batch_matches_single_predictions() {
        let mut gp = gp_1d("CovProd(CovMatern5iso, CovSum(CovLinearone, CovNoise))", array![0.1, 0.2, -0.3, -2.]);
        let xtest = Array::linspace(-1., 5., 13).insert_axis(Axis(1));
        let (vals, vars) = gp.predict_valvars(&xtest).unwrap();
        for (i, xi) in xtest.outer_iter().enumerate() {
            let (val, var) = gp.predict_valvar(&xi).unwrap();
            assert_abs_diff_eq!(vals[i], val, epsilon = 1e-12);
            assert_abs_diff_eq!(vars[i], var, epsilon = 1e-12);
            assert!(var >= 0.);
        }
        assert_abs_diff_eq!(gp.predict_values(&xtest).unwrap(), vals, epsilon = 1e-12);
    }

    #[test]
    fn test_se_ard_hyperparameters() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let xt = Array2::<f64>::random_using((10, 2), Uniform::new(-2., 2.), &mut rng);
        let yt = xt.map_axis(Axis(1), |x: ArrayView1<f64>| x[0] * x[1] + x[0].cos());
        let xtest = array![[0.3, -0.4], [1.5, 1.1], [-1.9, 0.2]];

        let mut ard = GaussianProcess::<f64>::params("CovSum(CovSEard, CovNoise)")
            .loghyper(array![0.5, -0.3, 0.1, -3.])
            .fit(&Dataset::new(xt.clone(), yt.clone()))
            .expect("GP fit error");
        let unequal = ard.predict_values(&xtest).unwrap();

        ard.set_hyperparameters(&array![0.2, 0.2, 0.1, -3.]).unwrap();
        assert!(!ard.is_fresh());
        assert_abs_diff_eq!(ard.loghyper(), array![0.2, 0.2, 0.1, -3.]);
        let (vals, vars) = ard.predict_valvars(&xtest).unwrap();
        assert!(ard.is_fresh());
        assert_abs_diff_ne!(unequal, vals, epsilon = 1e-6);

        let mut iso = GaussianProcess::<f64>::params("CovSum(CovSEiso, CovNoise)")
            .loghyper(array![0.2, 0.1, -3.])
            .fit(&Dataset::new(xt, yt))
            .expect("GP fit error");
        let (iso_vals, iso_vars) = iso.predict_valvars(&xtest).unwrap();
        assert_abs_diff_eq!(vals, iso_vals, epsilon = 1e-10);
        assert_abs_diff_eq!(vars, iso_vars, epsilon = 1e-10);
    }

    #[test]
    fn test_log_likelihood_single_sample() {
        let mut gp = GaussianProcess::<f64>::new(1, "CovSEiso").unwrap();
        gp.add_pattern(&array![0.5], 1.).unwrap();
        let expected = -0.5 - 0.5 * f64::ln(2. * std::f64::consts::PI);
        assert_abs_diff_eq!(gp.log_likelihood().unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_log_likelihood_gradient() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let xt = Array2::<f64>::random_using((8, 2), Uniform::new(-2., 2.), &mut rng);
        let yt = xt.map_axis(Axis(1), |x: ArrayView1<f64>| x[0].sin() + x[1] * x[1]);
        let spec = "CovSum(CovSEard, CovNoise)";
        let loghyper = array![0.1, -0.2, 0.3, -1.5];

        let mut gp = GaussianProcess::<f64>::params(spec)
            .loghyper(loghyper.clone())
            .fit(&Dataset::new(xt.clone(), yt.clone()))
            .expect("GP fit error");
        let grad = gp.log_likelihood_gradient().unwrap();

        let f = |p: &Vec<f64>| -> f64 {
            let mut gp = GaussianProcess::<f64>::params(spec)
                .loghyper(Array1::from_vec(p.clone()))
                .fit(&Dataset::new(xt.clone(), yt.clone()))
                .expect("GP fit error");
            gp.log_likelihood().unwrap()
        };
        let fdiff = loghyper.to_vec().central_diff(&f);
        assert_abs_diff_eq!(grad, Array1::from_vec(fdiff), epsilon = 1e-5);
    }

    #[test]
    fn test_display() {
        let gp = GaussianProcess::<f64>::new(1, "CovSum(CovSEiso, CovNoise)").unwrap();
        assert_eq!(
            gp.to_string(),
            "GP(covf=CovSum(CovSEiso, CovNoise), loghyper=[0, 0, 0], n_samples=0)"
        );
    }
}
