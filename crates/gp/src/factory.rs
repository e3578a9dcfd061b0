//! Creation of covariance functions from their textual specification.
//!
//! A specification is either the name of an atomic covariance function, like `CovSEiso`,
//! or a compound covariance function applied to two specifications, like
//! `CovSum(CovSEiso, CovNoise)`. Whitespaces are not significant.
//! The specification of a covariance function is given by its `Display` implementation.

use crate::covariance_functions::*;
use crate::errors::{GpError, Result};
use linfa::Float;

/// Names of atomic covariance functions
const ATOMIC: [&str; 8] = [
    "CovSEiso",
    "CovSEard",
    "CovMatern3iso",
    "CovMatern5iso",
    "CovRQiso",
    "CovLinearone",
    "CovLinearard",
    "CovNoise",
];

/// Names of compound covariance functions
const COMPOUND: [&str; 2] = ["CovSum", "CovProd"];

/// Factory of covariance functions
#[derive(Clone, Copy, Debug, Default)]
pub struct CovFactory;

impl CovFactory {
    /// Names of available covariance functions
    pub fn list() -> Vec<&'static str> {
        ATOMIC.iter().chain(COMPOUND.iter()).copied().collect()
    }

    /// Create the covariance function tree described by `spec` for inputs of dimension `input_dim`.
    /// Hyperparameters of the created covariance function are all set to zero.
    pub fn create<F: Float>(input_dim: usize, spec: &str) -> Result<Box<dyn CovarianceFunction<F>>> {
        let spec: String = spec.chars().filter(|c| !c.is_whitespace()).collect();
        Self::parse(input_dim, &spec)
    }

    fn parse<F: Float>(input_dim: usize, spec: &str) -> Result<Box<dyn CovarianceFunction<F>>> {
        match spec.find('(') {
            None => Self::atomic(input_dim, spec),
            Some(open) => {
                let name = &spec[..open];
                let args = spec[open + 1..].strip_suffix(')').ok_or_else(|| {
                    GpError::InvalidCovarianceSpec(format!("missing closing parenthesis in '{spec}'"))
                })?;
                let (first, second) = split_arguments(args)?;
                let first = Self::parse(input_dim, first)?;
                let second = Self::parse(input_dim, second)?;
                match name {
                    "CovSum" => Ok(Box::new(CovSum::new(first, second)?)),
                    "CovProd" => Ok(Box::new(CovProd::new(first, second)?)),
                    _ => Err(GpError::InvalidCovarianceSpec(format!(
                        "'{name}' is not a compound covariance function"
                    ))),
                }
            }
        }
    }

    fn atomic<F: Float>(input_dim: usize, name: &str) -> Result<Box<dyn CovarianceFunction<F>>> {
        let covf: Box<dyn CovarianceFunction<F>> = match name {
            "CovSEiso" => Box::new(CovSEiso::new(input_dim)),
            "CovSEard" => Box::new(CovSEard::new(input_dim)),
            "CovMatern3iso" => Box::new(CovMatern3iso::new(input_dim)),
            "CovMatern5iso" => Box::new(CovMatern5iso::new(input_dim)),
            "CovRQiso" => Box::new(CovRQiso::new(input_dim)),
            "CovLinearone" => Box::new(CovLinearone::new(input_dim)),
            "CovLinearard" => Box::new(CovLinearard::new(input_dim)),
            "CovNoise" => Box::new(CovNoise::new(input_dim)),
            _ if COMPOUND.contains(&name) => {
                return Err(GpError::InvalidCovarianceSpec(format!(
                    "'{name}' expects two covariance functions as arguments"
                )))
            }
            _ => {
                return Err(GpError::InvalidCovarianceSpec(format!(
                    "unknown covariance function '{name}'"
                )))
            }
        };
        Ok(covf)
    }
}

/// Split `first,second` at the top-level comma
fn split_arguments(args: &str) -> Result<(&str, &str)> {
    let mut depth = 0;
    let mut comma = None;
    for (i, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => {
                return Err(GpError::InvalidCovarianceSpec(format!(
                    "unbalanced parentheses in '{args}'"
                )))
            }
            ')' => depth -= 1,
            ',' if depth == 0 => {
                if comma.is_some() {
                    return Err(GpError::InvalidCovarianceSpec(format!(
                        "too many arguments in '{args}'"
                    )));
                }
                comma = Some(i);
            }
            _ => (),
        }
    }
    if depth != 0 {
        return Err(GpError::InvalidCovarianceSpec(format!(
            "unbalanced parentheses in '{args}'"
        )));
    }
    match comma {
        Some(i) => Ok((&args[..i], &args[i + 1..])),
        None => Err(GpError::InvalidCovarianceSpec(format!(
            "two arguments expected in '{args}'"
        ))),
    }
}
