use super::{check_param_dim, sq_dist, CovarianceFunction};
use crate::errors::Result;
use linfa::Float;
use ndarray::{array, s, Array1, ArrayView1, Zip};
use std::fmt;

/// Isotropic squared exponential covariance function.
///
/// Log-hyperparameters: `[ln(ell), ln(sf)]`
///
/// `k(x1, x2) = sf^2 * exp( - |x1 - x2|^2 / (2 * ell^2) )`
#[derive(Clone, Debug)]
pub struct CovSEiso<F: Float> {
    input_dim: usize,
    loghyper: Array1<F>,
    ell: F,
    sf2: F,
}

impl<F: Float> CovSEiso<F> {
    /// Constructor with unit length scale and signal variance
    pub fn new(input_dim: usize) -> CovSEiso<F> {
        CovSEiso {
            input_dim,
            loghyper: Array1::zeros(2),
            ell: F::one(),
            sf2: F::one(),
        }
    }

    fn scaled_sq_dist(&self, x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> F {
        sq_dist(x1, x2) / (self.ell * self.ell)
    }
}

impl<F: Float> CovarianceFunction<F> for CovSEiso<F> {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn param_dim(&self) -> usize {
        2
    }

    fn loghyper(&self) -> Array1<F> {
        self.loghyper.to_owned()
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        check_param_dim(self.param_dim(), &p)?;
        self.loghyper.assign(&p);
        self.ell = p[0].exp();
        self.sf2 = (F::cast(2.) * p[1]).exp();
        Ok(())
    }

    fn value(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        let z = self.scaled_sq_dist(&x1, &x2);
        self.sf2 * (F::cast(-0.5) * z).exp()
    }

    fn gradient(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let z = self.scaled_sq_dist(&x1, &x2);
        let k = self.sf2 * (F::cast(-0.5) * z).exp();
        array![k * z, F::cast(2.) * k]
    }
}

impl<F: Float> fmt::Display for CovSEiso<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovSEiso")
    }
}

/// Squared exponential covariance function with automatic relevance determination,
/// i.e. one length scale per input component.
///
/// Log-hyperparameters: `[ln(ell_1), ..., ln(ell_d), ln(sf)]`
///
/// ```text
///                  d
/// k(x1, x2) = sf^2 exp( -1/2 sum ((x1_i - x2_i) / ell_i)^2 )
///                 i=1
/// ```
#[derive(Clone, Debug)]
pub struct CovSEard<F: Float> {
    input_dim: usize,
    loghyper: Array1<F>,
    ell: Array1<F>,
    sf2: F,
}

impl<F: Float> CovSEard<F> {
    /// Constructor with unit length scales and signal variance
    pub fn new(input_dim: usize) -> CovSEard<F> {
        CovSEard {
            input_dim,
            loghyper: Array1::zeros(input_dim + 1),
            ell: Array1::ones(input_dim),
            sf2: F::one(),
        }
    }

    /// Componentwise squared differences scaled by length scales
    fn scaled_sq_diffs(&self, x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> Array1<F> {
        let mut z = Array1::zeros(self.input_dim);
        Zip::from(&mut z)
            .and(x1)
            .and(x2)
            .and(&self.ell)
            .for_each(|z_i, a, b, ell_i| {
                let d = (*a - *b) / *ell_i;
                *z_i = d * d
            });
        z
    }
}

impl<F: Float> CovarianceFunction<F> for CovSEard<F> {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn param_dim(&self) -> usize {
        self.input_dim + 1
    }

    fn loghyper(&self) -> Array1<F> {
        self.loghyper.to_owned()
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        check_param_dim(self.param_dim(), &p)?;
        self.loghyper.assign(&p);
        Zip::from(&mut self.ell)
            .and(p.slice(s![..self.input_dim]))
            .for_each(|ell_i, p_i| *ell_i = p_i.exp());
        self.sf2 = (F::cast(2.) * p[self.input_dim]).exp();
        Ok(())
    }

    fn value(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        let z = self.scaled_sq_diffs(&x1, &x2).sum();
        self.sf2 * (F::cast(-0.5) * z).exp()
    }

    fn gradient(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let z = self.scaled_sq_diffs(&x1, &x2);
        let k = self.sf2 * (F::cast(-0.5) * z.sum()).exp();
        let mut grad = Array1::zeros(self.param_dim());
        Zip::from(grad.slice_mut(s![..self.input_dim]))
            .and(&z)
            .for_each(|g, z_i| *g = k * *z_i);
        grad[self.input_dim] = F::cast(2.) * k;
        grad
    }
}

impl<F: Float> fmt::Display for CovSEard<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovSEard")
    }
}

/// Isotropic matern 3/2 covariance function.
///
/// Log-hyperparameters: `[ln(ell), ln(sf)]`
///
/// `k(x1, x2) = sf^2 * (1 + s) * exp(-s)` with `s = sqrt(3) * |x1 - x2| / ell`
#[derive(Clone, Debug)]
pub struct CovMatern3iso<F: Float> {
    input_dim: usize,
    loghyper: Array1<F>,
    ell: F,
    sf2: F,
}

impl<F: Float> CovMatern3iso<F> {
    /// Constructor with unit length scale and signal variance
    pub fn new(input_dim: usize) -> CovMatern3iso<F> {
        CovMatern3iso {
            input_dim,
            loghyper: Array1::zeros(2),
            ell: F::one(),
            sf2: F::one(),
        }
    }

    fn scaled_dist(&self, x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> F {
        F::cast(3.).sqrt() * sq_dist(x1, x2).sqrt() / self.ell
    }
}

impl<F: Float> CovarianceFunction<F> for CovMatern3iso<F> {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn param_dim(&self) -> usize {
        2
    }

    fn loghyper(&self) -> Array1<F> {
        self.loghyper.to_owned()
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        check_param_dim(self.param_dim(), &p)?;
        self.loghyper.assign(&p);
        self.ell = p[0].exp();
        self.sf2 = (F::cast(2.) * p[1]).exp();
        Ok(())
    }

    fn value(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        let s = self.scaled_dist(&x1, &x2);
        self.sf2 * (F::one() + s) * (-s).exp()
    }

    fn gradient(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let s = self.scaled_dist(&x1, &x2);
        let e = (-s).exp();
        let k = self.sf2 * (F::one() + s) * e;
        array![self.sf2 * s * s * e, F::cast(2.) * k]
    }
}

impl<F: Float> fmt::Display for CovMatern3iso<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovMatern3iso")
    }
}

/// Isotropic matern 5/2 covariance function.
///
/// Log-hyperparameters: `[ln(ell), ln(sf)]`
///
/// `k(x1, x2) = sf^2 * (1 + s + s^2 / 3) * exp(-s)` with `s = sqrt(5) * |x1 - x2| / ell`
#[derive(Clone, Debug)]
pub struct CovMatern5iso<F: Float> {
    input_dim: usize,
    loghyper: Array1<F>,
    ell: F,
    sf2: F,
}

impl<F: Float> CovMatern5iso<F> {
    /// Constructor with unit length scale and signal variance
    pub fn new(input_dim: usize) -> CovMatern5iso<F> {
        CovMatern5iso {
            input_dim,
            loghyper: Array1::zeros(2),
            ell: F::one(),
            sf2: F::one(),
        }
    }

    fn scaled_dist(&self, x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> F {
        F::cast(5.).sqrt() * sq_dist(x1, x2).sqrt() / self.ell
    }
}

impl<F: Float> CovarianceFunction<F> for CovMatern5iso<F> {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn param_dim(&self) -> usize {
        2
    }

    fn loghyper(&self) -> Array1<F> {
        self.loghyper.to_owned()
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        check_param_dim(self.param_dim(), &p)?;
        self.loghyper.assign(&p);
        self.ell = p[0].exp();
        self.sf2 = (F::cast(2.) * p[1]).exp();
        Ok(())
    }

    fn value(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        let s = self.scaled_dist(&x1, &x2);
        self.sf2 * (F::one() + s + s * s / F::cast(3.)) * (-s).exp()
    }

    fn gradient(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let s = self.scaled_dist(&x1, &x2);
        let e = (-s).exp();
        let k = self.sf2 * (F::one() + s + s * s / F::cast(3.)) * e;
        array![
            self.sf2 * s * s * (F::one() + s) / F::cast(3.) * e,
            F::cast(2.) * k
        ]
    }
}

impl<F: Float> fmt::Display for CovMatern5iso<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovMatern5iso")
    }
}

/// Isotropic rational quadratic covariance function.
///
/// Log-hyperparameters: `[ln(ell), ln(sf), ln(alpha)]`
///
/// `k(x1, x2) = sf^2 * (1 + |x1 - x2|^2 / (2 * alpha * ell^2))^(-alpha)`
#[derive(Clone, Debug)]
pub struct CovRQiso<F: Float> {
    input_dim: usize,
    loghyper: Array1<F>,
    ell: F,
    sf2: F,
    alpha: F,
}

impl<F: Float> CovRQiso<F> {
    /// Constructor with unit length scale, signal variance and shape parameter
    pub fn new(input_dim: usize) -> CovRQiso<F> {
        CovRQiso {
            input_dim,
            loghyper: Array1::zeros(3),
            ell: F::one(),
            sf2: F::one(),
            alpha: F::one(),
        }
    }

    /// Returns `(z, u)` with `z = r^2 / ell^2` and `u = 1 + z / (2 * alpha)`
    fn factors(&self, x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> (F, F) {
        let z = sq_dist(x1, x2) / (self.ell * self.ell);
        (z, F::one() + F::cast(0.5) * z / self.alpha)
    }
}

impl<F: Float> CovarianceFunction<F> for CovRQiso<F> {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn param_dim(&self) -> usize {
        3
    }

    fn loghyper(&self) -> Array1<F> {
        self.loghyper.to_owned()
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        check_param_dim(self.param_dim(), &p)?;
        self.loghyper.assign(&p);
        self.ell = p[0].exp();
        self.sf2 = (F::cast(2.) * p[1]).exp();
        self.alpha = p[2].exp();
        Ok(())
    }

    fn value(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        let (_, u) = self.factors(&x1, &x2);
        self.sf2 * u.powf(-self.alpha)
    }

    fn gradient(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let (z, u) = self.factors(&x1, &x2);
        let k = self.sf2 * u.powf(-self.alpha);
        array![
            k * z / u,
            F::cast(2.) * k,
            k * (F::cast(0.5) * z / u - self.alpha * u.ln())
        ]
    }
}

impl<F: Float> fmt::Display for CovRQiso<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovRQiso")
    }
}

/// Linear covariance function with a bias term.
///
/// Log-hyperparameters: `[ln(t)]`
///
/// `k(x1, x2) = (1 + x1 . x2) / t^2`
#[derive(Clone, Debug)]
pub struct CovLinearone<F: Float> {
    input_dim: usize,
    loghyper: Array1<F>,
    it2: F,
}

impl<F: Float> CovLinearone<F> {
    /// Constructor with unit scale
    pub fn new(input_dim: usize) -> CovLinearone<F> {
        CovLinearone {
            input_dim,
            loghyper: Array1::zeros(1),
            it2: F::one(),
        }
    }
}

impl<F: Float> CovarianceFunction<F> for CovLinearone<F> {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn param_dim(&self) -> usize {
        1
    }

    fn loghyper(&self) -> Array1<F> {
        self.loghyper.to_owned()
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        check_param_dim(self.param_dim(), &p)?;
        self.loghyper.assign(&p);
        self.it2 = (F::cast(-2.) * p[0]).exp();
        Ok(())
    }

    fn value(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        self.it2 * (F::one() + x1.dot(&x2))
    }

    fn gradient(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        array![F::cast(-2.) * self.value(x1, x2)]
    }
}

impl<F: Float> fmt::Display for CovLinearone<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovLinearone")
    }
}

/// Linear covariance function with automatic relevance determination.
///
/// Log-hyperparameters: `[ln(ell_1), ..., ln(ell_d)]`
///
/// ```text
///             d
/// k(x1, x2) = sum x1_i * x2_i / ell_i^2
///            i=1
/// ```
#[derive(Clone, Debug)]
pub struct CovLinearard<F: Float> {
    input_dim: usize,
    loghyper: Array1<F>,
    inv_ell2: Array1<F>,
}

impl<F: Float> CovLinearard<F> {
    /// Constructor with unit length scales
    pub fn new(input_dim: usize) -> CovLinearard<F> {
        CovLinearard {
            input_dim,
            loghyper: Array1::zeros(input_dim),
            inv_ell2: Array1::ones(input_dim),
        }
    }

    fn terms(&self, x1: &ArrayView1<F>, x2: &ArrayView1<F>) -> Array1<F> {
        x1 * x2 * &self.inv_ell2
    }
}

impl<F: Float> CovarianceFunction<F> for CovLinearard<F> {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn param_dim(&self) -> usize {
        self.input_dim
    }

    fn loghyper(&self) -> Array1<F> {
        self.loghyper.to_owned()
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        check_param_dim(self.param_dim(), &p)?;
        self.loghyper.assign(&p);
        self.inv_ell2 = p.mapv(|v| (F::cast(-2.) * v).exp());
        Ok(())
    }

    fn value(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        self.terms(&x1, &x2).sum()
    }

    fn gradient(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        self.terms(&x1, &x2).mapv(|v| F::cast(-2.) * v)
    }
}

impl<F: Float> fmt::Display for CovLinearard<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovLinearard")
    }
}

/// Independent white noise covariance function.
///
/// Log-hyperparameters: `[ln(sn)]`
///
/// The noise is attached to samples, not to input locations: distinct samples are
/// uncorrelated even when their inputs coincide, hence `value(x1, x2) = 0` while
/// `variance(x) = sn^2`.
#[derive(Clone, Debug)]
pub struct CovNoise<F: Float> {
    input_dim: usize,
    loghyper: Array1<F>,
    sn2: F,
}

impl<F: Float> CovNoise<F> {
    /// Constructor with unit noise variance
    pub fn new(input_dim: usize) -> CovNoise<F> {
        CovNoise {
            input_dim,
            loghyper: Array1::zeros(1),
            sn2: F::one(),
        }
    }
}

impl<F: Float> CovarianceFunction<F> for CovNoise<F> {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn param_dim(&self) -> usize {
        1
    }

    fn loghyper(&self) -> Array1<F> {
        self.loghyper.to_owned()
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        check_param_dim(self.param_dim(), &p)?;
        self.loghyper.assign(&p);
        self.sn2 = (F::cast(2.) * p[0]).exp();
        Ok(())
    }

    fn value(&self, _x1: ArrayView1<F>, _x2: ArrayView1<F>) -> F {
        F::zero()
    }

    fn gradient(&self, _x1: ArrayView1<F>, _x2: ArrayView1<F>) -> Array1<F> {
        Array1::zeros(1)
    }

    fn variance(&self, _x: ArrayView1<F>) -> F {
        self.sn2
    }

    fn variance_gradient(&self, _x: ArrayView1<F>) -> Array1<F> {
        array![F::cast(2.) * self.sn2]
    }
}

impl<F: Float> fmt::Display for CovNoise<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovNoise")
    }
}
