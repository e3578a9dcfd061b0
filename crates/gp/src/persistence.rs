//! Persistence of [GaussianProcess] models.
//!
//! The text model format is line oriented, blank lines and lines starting with `#` being ignored:
//!
//! ```text
//! # input dimensionality
//! 1
//! # covariance function
//! CovSum(CovSEiso, CovNoise)
//! # log-hyperparameters
//! 0.0 0.0 -2.3
//! # data (target value in first column)
//! 0.0 0.0
//! 1.0 1.0
//! ```
//!
//! The factorization cache is never persisted, a loaded model is rebuilt on first prediction.
//!
//! With the `serializable` feature, models also implement serde `Serialize`/`Deserialize`
//! through the same information (input dimension, covariance function specification,
//! log-hyperparameters and samples). The `persistent` feature adds JSON files support.

use crate::algorithm::GaussianProcess;
use crate::errors::{GpError, Result};
use chrono::Local;
use linfa::Float;
use log::debug;
use ndarray::{s, Array1};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[cfg(feature = "serializable")]
use crate::sample_set::SampleSet;
#[cfg(feature = "serializable")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lines of a model file which are neither blank nor comments, with their line number
struct ModelLines<R: BufRead> {
    lines: std::io::Lines<R>,
    lineno: usize,
}

impl<R: BufRead> ModelLines<R> {
    fn new(reader: R) -> Self {
        ModelLines {
            lines: reader.lines(),
            lineno: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.lineno += 1;
            let line = line.trim();
            if !line.is_empty() && !line.starts_with('#') {
                return Ok(Some((self.lineno, line.to_string())));
            }
        }
        Ok(None)
    }

    fn expect_line(&mut self, what: &str) -> Result<(usize, String)> {
        self.next_line()?.ok_or_else(|| {
            GpError::LoadError(format!(
                "unexpected end of file after line {}, {what} expected",
                self.lineno
            ))
        })
    }
}

fn at_line(lineno: usize, err: GpError) -> GpError {
    GpError::LoadError(format!("line {lineno}: {err}"))
}

fn parse_values<F: Float>(line: &str, lineno: usize) -> Result<Array1<F>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>().map(F::cast).map_err(|err| {
                GpError::LoadError(format!("line {lineno}: invalid number '{tok}' ({err})"))
            })
        })
        .collect()
}

impl<F: Float> GaussianProcess<F> {
    /// Load a model from the given text file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let gp = Self::read_from(BufReader::new(file))?;
        debug!("Loaded {gp} from {}", path.as_ref().display());
        Ok(gp)
    }

    /// Read a model in text format.
    ///
    /// Fails with [GpError::LoadError] when the header (input dimension, covariance function
    /// specification, log-hyperparameters) is incomplete or when a line is malformed.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = ModelLines::new(reader);

        let (lineno, line) = lines.expect_line("input dimensionality")?;
        let input_dim = match line.parse::<usize>() {
            Ok(dim) if dim > 0 => dim,
            _ => {
                return Err(GpError::LoadError(format!(
                    "line {lineno}: invalid input dimensionality '{line}'"
                )))
            }
        };

        let (lineno, line) = lines.expect_line("covariance function")?;
        let mut gp = GaussianProcess::new(input_dim, &line).map_err(|err| at_line(lineno, err))?;

        let (lineno, line) = lines.expect_line("log-hyperparameters")?;
        let loghyper = parse_values(&line, lineno)?;
        gp.set_hyperparameters(&loghyper)
            .map_err(|err| at_line(lineno, err))?;

        while let Some((lineno, line)) = lines.next_line()? {
            let values = parse_values::<F>(&line, lineno)?;
            if values.len() != input_dim + 1 {
                return Err(GpError::LoadError(format!(
                    "line {lineno}: expected target and {input_dim} input values, got {} values",
                    values.len()
                )));
            }
            gp.add_pattern(&values.slice(s![1..]), values[0])?;
        }
        Ok(gp)
    }

    /// Save the model in the given text file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!("Saved {self} in {}", path.as_ref().display());
        Ok(())
    }

    /// Write the model in text format, values are written with 13 significant digits
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "# GP model saved on {}", Local::now().format("%c"))?;
        writeln!(writer)?;
        writeln!(writer, "# input dimensionality")?;
        writeln!(writer, "{}", self.input_dim())?;
        writeln!(writer)?;
        writeln!(writer, "# covariance function")?;
        writeln!(writer, "{}", self.covariance_function())?;
        writeln!(writer)?;
        writeln!(writer, "# log-hyperparameters")?;
        let loghyper = self
            .loghyper()
            .iter()
            .map(|v| format!("{v:.12e}"))
            .collect::<Vec<_>>();
        writeln!(writer, "{}", loghyper.join(" "))?;
        writeln!(writer)?;
        writeln!(writer, "# data (target value in first column)")?;
        for sample in self.sampleset() {
            write!(writer, "{:.12e}", sample.y())?;
            for v in sample.x() {
                write!(writer, " {v:.12e}")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serializable")]
#[derive(Serialize)]
#[serde(rename = "GaussianProcess")]
struct GpModelRef<'a, F: Float> {
    input_dim: usize,
    covariance_function: String,
    loghyper: Vec<F>,
    sampleset: &'a SampleSet<F>,
}

#[cfg(feature = "serializable")]
#[derive(Deserialize)]
#[serde(rename = "GaussianProcess")]
struct GpModel<F: Float> {
    input_dim: usize,
    covariance_function: String,
    loghyper: Vec<F>,
    sampleset: SampleSet<F>,
}

#[cfg(feature = "serializable")]
impl<F: Float> GpModel<F> {
    fn into_gp(self) -> Result<GaussianProcess<F>> {
        let mut gp = GaussianProcess::new(self.input_dim, &self.covariance_function)?;
        gp.set_hyperparameters(&Array1::from(self.loghyper))?;
        for sample in self.sampleset.iter() {
            gp.add_pattern(&sample.x(), sample.y())?;
        }
        Ok(gp)
    }
}

#[cfg(feature = "serializable")]
impl<F: Float + Serialize> Serialize for GaussianProcess<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        GpModelRef {
            input_dim: self.input_dim(),
            covariance_function: self.covariance_function().to_string(),
            loghyper: self.loghyper().to_vec(),
            sampleset: self.sampleset(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serializable")]
impl<'de, F: Float + Deserialize<'de>> Deserialize<'de> for GaussianProcess<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        GpModel::<F>::deserialize(deserializer)?
            .into_gp()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "persistent")]
impl<F: Float + Serialize + serde::de::DeserializeOwned> GaussianProcess<F> {
    /// Save the model in the given JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        debug!("Saved {self} in {}", path.as_ref().display());
        Ok(())
    }

    /// Load a model from the given JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        let gp: Self =
            serde_json::from_slice(&data).map_err(|err| GpError::LoadError(err.to_string()))?;
        debug!("Loaded {gp} from {}", path.as_ref().display());
        Ok(gp)
    }
}
