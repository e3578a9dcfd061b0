use super::{check_param_dim, concat, CovarianceFunction};
use crate::errors::{GpError, Result};
use linfa::Float;
use ndarray::{s, Array1, ArrayView1};
use std::fmt;

/// Check both children share the same input dimension
fn check_children<F: Float>(
    first: &dyn CovarianceFunction<F>,
    second: &dyn CovarianceFunction<F>,
) -> Result<()> {
    if first.input_dim() != second.input_dim() {
        return Err(GpError::DimensionMismatch {
            expected: first.input_dim(),
            actual: second.input_dim(),
        });
    }
    Ok(())
}

/// Dispatch `p` to children: first `param_dim` values go to `first`, the remaining ones to `second`
fn set_children_loghyper<F: Float>(
    first: &mut dyn CovarianceFunction<F>,
    second: &mut dyn CovarianceFunction<F>,
    p: ArrayView1<F>,
) -> Result<()> {
    check_param_dim(first.param_dim() + second.param_dim(), &p)?;
    let n1 = first.param_dim();
    first.set_loghyper(p.slice(s![..n1]))?;
    second.set_loghyper(p.slice(s![n1..]))
}

/// Sum of two covariance functions
///
/// Log-hyperparameters: hyperparameters of `first` followed by those of `second`
#[derive(Debug)]
pub struct CovSum<F: Float> {
    first: Box<dyn CovarianceFunction<F>>,
    second: Box<dyn CovarianceFunction<F>>,
}

impl<F: Float> CovSum<F> {
    /// Take ownership of two covariance functions defined on the same input dimension
    pub fn new(
        first: Box<dyn CovarianceFunction<F>>,
        second: Box<dyn CovarianceFunction<F>>,
    ) -> Result<CovSum<F>> {
        check_children(first.as_ref(), second.as_ref())?;
        Ok(CovSum { first, second })
    }
}

impl<F: Float> CovarianceFunction<F> for CovSum<F> {
    fn input_dim(&self) -> usize {
        self.first.input_dim()
    }

    fn param_dim(&self) -> usize {
        self.first.param_dim() + self.second.param_dim()
    }

    fn loghyper(&self) -> Array1<F> {
        concat(&self.first.loghyper(), &self.second.loghyper())
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        set_children_loghyper(self.first.as_mut(), self.second.as_mut(), p)
    }

    fn value(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        self.first.value(x1, x2) + self.second.value(x1, x2)
    }

    fn gradient(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        concat(&self.first.gradient(x1, x2), &self.second.gradient(x1, x2))
    }

    fn variance(&self, x: ArrayView1<F>) -> F {
        self.first.variance(x) + self.second.variance(x)
    }

    fn variance_gradient(&self, x: ArrayView1<F>) -> Array1<F> {
        concat(
            &self.first.variance_gradient(x),
            &self.second.variance_gradient(x),
        )
    }
}

impl<F: Float> fmt::Display for CovSum<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovSum({}, {})", self.first, self.second)
    }
}

/// Product of two covariance functions
///
/// Log-hyperparameters: hyperparameters of `first` followed by those of `second`
#[derive(Debug)]
pub struct CovProd<F: Float> {
    first: Box<dyn CovarianceFunction<F>>,
    second: Box<dyn CovarianceFunction<F>>,
}

impl<F: Float> CovProd<F> {
    /// Take ownership of two covariance functions defined on the same input dimension
    pub fn new(
        first: Box<dyn CovarianceFunction<F>>,
        second: Box<dyn CovarianceFunction<F>>,
    ) -> Result<CovProd<F>> {
        check_children(first.as_ref(), second.as_ref())?;
        Ok(CovProd { first, second })
    }
}

impl<F: Float> CovarianceFunction<F> for CovProd<F> {
    fn input_dim(&self) -> usize {
        self.first.input_dim()
    }

    fn param_dim(&self) -> usize {
        self.first.param_dim() + self.second.param_dim()
    }

    fn loghyper(&self) -> Array1<F> {
        concat(&self.first.loghyper(), &self.second.loghyper())
    }

    fn set_loghyper(&mut self, p: ArrayView1<F>) -> Result<()> {
        set_children_loghyper(self.first.as_mut(), self.second.as_mut(), p)
    }

    fn value(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> F {
        self.first.value(x1, x2) * self.second.value(x1, x2)
    }

    /// d(k1.k2) = dk1.k2 ++ k1.dk2
    fn gradient(&self, x1: ArrayView1<F>, x2: ArrayView1<F>) -> Array1<F> {
        let k1 = self.first.value(x1, x2);
        let k2 = self.second.value(x1, x2);
        concat(
            &self.first.gradient(x1, x2).mapv(|v| v * k2),
            &self.second.gradient(x1, x2).mapv(|v| v * k1),
        )
    }

    fn variance(&self, x: ArrayView1<F>) -> F {
        self.first.variance(x) * self.second.variance(x)
    }

    fn variance_gradient(&self, x: ArrayView1<F>) -> Array1<F> {
        let v1 = self.first.variance(x);
        let v2 = self.second.variance(x);
        concat(
            &self.first.variance_gradient(x).mapv(|v| v * v2),
            &self.second.variance_gradient(x).mapv(|v| v * v1),
        )
    }
}

impl<F: Float> fmt::Display for CovProd<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CovProd({}, {})", self.first, self.second)
    }
}
