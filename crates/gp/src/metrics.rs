//! A module for metrics to evaluate Gaussian Process models performances
//! It implements the predictive coefficient Q2 estimated by cross-validation:
//! `Q2 = 1 - PRESS / TSS` where PRESS is the predictive residual sum of squares
//! on validation folds and TSS the total sum of squares of the training targets.

use linfa::dataset::Dataset;
use linfa::{traits::Fit, Float};
use ndarray::{Array1, Array2};

use crate::errors::{GpError, Result};
use crate::{GaussianProcess, GpParams};

/// A trait for Q2 predictive coefficient cross validation score
pub trait CrossValidationScore<F: Float> {
    /// Return the training data (xt, yt)
    fn training_data(&self) -> (Array2<F>, Array1<F>);

    /// Return the model parameters used to fit sub models on training folds
    fn params(&self) -> GpParams<F>;

    /// Compute quality metric Q2 with kfold cross validation, `kfold` in `[2, n]`
    fn q2_score(&self, kfold: usize) -> Result<F> {
        let (xt, yt) = self.training_data();
        if kfold < 2 || kfold > yt.len() {
            return Err(GpError::InvalidValueError(format!(
                "Number of folds should be in [2, {}], got {kfold}",
                yt.len()
            )));
        }
        let yt_mean = yt.mean().unwrap_or_else(F::zero);
        let dataset = Dataset::new(xt, yt);
        // Predictive Residual Sum of Squares
        let mut press = F::zero();
        // Total Sum of Squares
        let mut tss = F::zero();
        for (train, valid) in dataset.fold(kfold).into_iter() {
            let model: Result<GaussianProcess<F>> = self.params().fit(&train);
            let mut model = model?;
            let pred = model.predict_values(valid.records())?;
            press += (valid.targets() - &pred).mapv(|v| v * v).sum();
            tss += valid.targets().mapv(|v| (v - yt_mean) * (v - yt_mean)).sum();
        }
        if tss <= F::zero() {
            return Err(GpError::InvalidValueError(
                "Q2 undefined: validation targets have no variance around the training mean"
                    .to_string(),
            ));
        }
        Ok(F::one() - press / tss)
    }

    /// Q2 predictive coefficient with Leave-One-Out Cross-Validation
    fn looq2_score(&self) -> Result<F> {
        self.q2_score(self.training_data().1.len())
    }
}

impl<F: Float> CrossValidationScore<F> for GaussianProcess<F> {
    fn training_data(&self) -> (Array2<F>, Array1<F>) {
        GaussianProcess::training_data(self)
    }

    fn params(&self) -> GpParams<F> {
        GpParams::new(&self.covariance_function().to_string()).loghyper(self.loghyper())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{array, Array, Axis};
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand_xoshiro::Xoshiro256Plus;

    fn xsinx(x: &Array2<f64>) -> Array1<f64> {
        ((x - 3.5) * ((x - 3.5) / std::f64::consts::PI).mapv(|v| v.sin())).remove_axis(Axis(1))
    }

    fn xsinx_gp() -> GaussianProcess<f64> {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let xt = Array::<f64, _>::random_using((50, 1), Uniform::new(0., 25.), &mut rng);
        let yt = xsinx(&xt);
        GaussianProcess::<f64>::params("CovSum(CovSEiso, CovNoise)")
            .loghyper(array![1.0, 2.0, -3.0])
            .fit(&Dataset::new(xt, yt))
            .expect("GP fit error")
    }

    #[test]
    fn test_q2_gp_xsinx() {
        let gp = xsinx_gp();
        let q2 = gp.q2_score(5).unwrap();
        assert!(q2 > 0.9 && q2 <= 1., "q2 = {q2}");
        let looq2 = gp.looq2_score().unwrap();
        assert!(looq2 > 0.9 && looq2 <= 1., "looq2 = {looq2}");
    }

    #[test]
    fn test_q2_bad_kfold() {
        let gp = xsinx_gp();
        assert!(matches!(gp.q2_score(1), Err(GpError::InvalidValueError(_))));
        assert!(matches!(gp.q2_score(51), Err(GpError::InvalidValueError(_))));
    }

    #[test]
    fn test_q2_constant_targets() {
        let xt = Array::linspace(0., 4., 8).insert_axis(Axis(1));
        let yt = Array1::from_elem(8, 2.5);
        let gp = GaussianProcess::<f64>::params("CovSum(CovSEiso, CovNoise)")
            .loghyper(array![0., 0., -2.])
            .fit(&Dataset::new(xt, yt))
            .expect("GP fit error");
        assert!(matches!(gp.q2_score(4), Err(GpError::InvalidValueError(_))));
        assert!(matches!(gp.looq2_score(), Err(GpError::InvalidValueError(_))));
    }

    #[test]
    fn test_params_reproduce_model() {
        let mut gp = xsinx_gp();
        let (xt, yt) = CrossValidationScore::training_data(&gp);
        let mut other = CrossValidationScore::params(&gp)
            .fit(&Dataset::new(xt, yt))
            .unwrap();
        let x = array![[3.3], [12.1]];
        assert_eq!(
            gp.predict_values(&x).unwrap(),
            other.predict_values(&x).unwrap()
        );
    }
}
