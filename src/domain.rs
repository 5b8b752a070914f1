use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MicroarrayError;

/// What to do with a data cell that does not parse as a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Abort the assembly with [`MicroarrayError::NumericParse`].
    #[default]
    Strict,
    /// Store `f64::NAN` so the cell stays distinguishable from a measured zero.
    Nan,
    /// Legacy behavior: substitute `0.0`.
    Zero,
}

impl fmt::Display for ParsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePolicy::Strict => write!(f, "strict"),
            ParsePolicy::Nan => write!(f, "nan"),
            ParsePolicy::Zero => write!(f, "zero"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlatformId(String);

impl PlatformId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlatformId {
    type Err = MicroarrayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        if !is_safe_file_stem(normalized) {
            return Err(MicroarrayError::InvalidPlatformId(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

impl TryFrom<String> for PlatformId {
    type Error = MicroarrayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlatformId> for String {
    fn from(id: PlatformId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SampleId(String);

impl SampleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SampleId {
    type Err = MicroarrayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        if !is_safe_file_stem(normalized) {
            return Err(MicroarrayError::InvalidSampleId(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

impl TryFrom<String> for SampleId {
    type Error = MicroarrayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SampleId> for String {
    fn from(id: SampleId) -> Self {
        id.0
    }
}

// Ids become file and directory names under the data root.
fn is_safe_file_stem(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && !value.contains("..")
        && !value.chars().any(|ch| ch == '/' || ch == '\\' || ch.is_control())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub id: SampleId,
    pub array: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSamples {
    pub platform: Platform,
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplesRequest {
    pub platform: PlatformId,
    pub samples: Vec<SampleId>,
}

impl SamplesRequest {
    pub fn new(platform: PlatformId, samples: Vec<SampleId>) -> Self {
        Self { platform, samples }
    }
}

/// Row identity of an [`ExpressionMatrix`], in `meta.tsv` order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionIndex {
    pub probe_ids: Vec<String>,
    pub entrez_ids: Vec<String>,
    pub gene_symbols: Vec<String>,
}

impl ExpressionIndex {
    pub fn len(&self) -> usize {
        self.probe_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probe_ids.is_empty()
    }
}

/// Probe-major expression values: `values[probe][sample]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionMatrix {
    pub values: Vec<Vec<f64>>,
    pub header: Vec<String>,
    pub index: ExpressionIndex,
}

impl ExpressionMatrix {
    pub fn n_probes(&self) -> usize {
        self.index.len()
    }

    pub fn n_samples(&self) -> usize {
        self.header.len()
    }

    /// `(probes, samples)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_probes(), self.n_samples())
    }

    pub fn get(&self, probe: usize, sample: usize) -> Option<f64> {
        self.values.get(probe)?.get(sample).copied()
    }

    /// Values of one sample in probe order.
    pub fn column(&self, sample: usize) -> Option<Vec<f64>> {
        if sample >= self.n_samples() {
            return None;
        }
        Some(self.values.iter().map(|row| row[sample]).collect())
    }
}
