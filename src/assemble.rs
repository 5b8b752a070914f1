use camino::Utf8Path;
use rayon::prelude::*;
use tracing::{debug, info, info_span};

use crate::domain::{ExpressionIndex, ExpressionMatrix, ParsePolicy, SampleId};
use crate::error::MicroarrayError;
use crate::store;
use crate::tsv::TsvReader;

const METADATA_ROWS: usize = 3;

/// Builds probe-major expression matrices from a platform directory.
///
/// Sample files are joined to `meta.tsv` by position: the n-th data row of every sample
/// file is the n-th probe of the metadata. Nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    policy: ParsePolicy,
    verify_probe_ids: bool,
    parallel: bool,
}

/// One sample file, in probe order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleColumn {
    pub name: String,
    pub values: Vec<f64>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check the label column of each data row against the metadata probe id.
    pub fn with_probe_verification(mut self, enabled: bool) -> Self {
        self.verify_probe_ids = enabled;
        self
    }

    /// Read sample files on the rayon pool. Column order still follows the input.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    pub fn assemble(
        &self,
        platform_dir: &Utf8Path,
        sample_ids: &[SampleId],
    ) -> Result<ExpressionMatrix, MicroarrayError> {
        let _span =
            info_span!("assemble", dir = %platform_dir, samples = sample_ids.len()).entered();

        let index = read_metadata(&store::metadata_path(platform_dir))?;
        let n_probes = index.len();
        debug!(probes = n_probes, "loaded metadata");

        let columns = if self.parallel {
            // Collect every outcome first so the reported error is the earliest in input order.
            sample_ids
                .par_iter()
                .map(|id| self.read_sample(&store::sample_path(platform_dir, id), &index))
                .collect::<Vec<_>>()
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?
        } else {
            sample_ids
                .iter()
                .map(|id| self.read_sample(&store::sample_path(platform_dir, id), &index))
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut header = Vec::with_capacity(columns.len());
        let mut sample_values = Vec::with_capacity(columns.len());
        for column in columns {
            header.push(column.name);
            sample_values.push(column.values);
        }
        let values = transpose(&sample_values, n_probes);

        info!(
            probes = n_probes,
            samples = header.len(),
            "assembled expression matrix"
        );
        Ok(ExpressionMatrix {
            values,
            header,
            index,
        })
    }

    /// Reads one sample file: the display name from the first record, then one value
    /// per probe from the first value column of each following record. Rows are either
    /// `<label>\t<value>...` or a bare `<value>`, consistently within a file. Every value
    /// field must parse under the active policy, not only the one that is kept.
    pub fn read_sample(
        &self,
        path: &Utf8Path,
        index: &ExpressionIndex,
    ) -> Result<SampleColumn, MicroarrayError> {
        let n_probes = index.len();
        let mut reader = TsvReader::open(path)?;

        let name = match reader.next_record()? {
            Some((_, record)) => record.get(0).unwrap_or_default().to_string(),
            None => {
                return Err(MicroarrayError::ShapeMismatch {
                    path: path.to_owned(),
                    message: "file is empty, expected a display name row".to_string(),
                });
            }
        };

        let mut values = Vec::with_capacity(n_probes);
        let mut width = None;
        while let Some((line, record)) = reader.next_record()? {
            let row = values.len();
            if row >= n_probes {
                return Err(MicroarrayError::ShapeMismatch {
                    path: path.to_owned(),
                    message: format!("more than {n_probes} data rows (line {line})"),
                });
            }
            if record.is_empty() {
                return Err(MicroarrayError::ShapeMismatch {
                    path: path.to_owned(),
                    message: format!("line {line} has no value column"),
                });
            }
            match width {
                None => width = Some(record.len()),
                Some(expected) if expected != record.len() => {
                    return Err(MicroarrayError::ShapeMismatch {
                        path: path.to_owned(),
                        message: format!(
                            "line {line} has {} columns, expected {expected}",
                            record.len()
                        ),
                    });
                }
                Some(_) => {}
            }

            // A single-field row is an unlabeled value; otherwise field 0 is the probe label.
            let column = if record.len() == 1 { 0 } else { 1 };
            if self.verify_probe_ids {
                let label = if column == 0 { "" } else { record[0].trim() };
                if label != index.probe_ids[row] {
                    return Err(MicroarrayError::ProbeMismatch {
                        path: path.to_owned(),
                        line,
                        expected: index.probe_ids[row].clone(),
                        found: label.to_string(),
                    });
                }
            }

            // Every value field is checked; the first one is the sample's value.
            let mut value = None;
            for (field, raw) in record.iter().enumerate().skip(column) {
                let parsed = self.parse_cell(path, line, field + 1, raw)?;
                if value.is_none() {
                    value = Some(parsed);
                }
            }
            values.push(value.unwrap_or(f64::NAN));
        }

        if values.len() != n_probes {
            return Err(MicroarrayError::ShapeMismatch {
                path: path.to_owned(),
                message: format!("found {} data rows, expected {n_probes}", values.len()),
            });
        }

        debug!(path = %path, name = %name, "loaded sample");
        Ok(SampleColumn { name, values })
    }

    fn parse_cell(
        &self,
        path: &Utf8Path,
        line: u64,
        column: usize,
        raw: &str,
    ) -> Result<f64, MicroarrayError> {
        match raw.trim().parse::<f64>() {
            Ok(value) => Ok(value),
            Err(_) => match self.policy {
                ParsePolicy::Strict => Err(MicroarrayError::NumericParse {
                    path: path.to_owned(),
                    line,
                    column,
                    value: raw.to_string(),
                }),
                ParsePolicy::Nan => Ok(f64::NAN),
                ParsePolicy::Zero => Ok(0.0),
            },
        }
    }
}

/// Reads the probe, Entrez and gene-symbol rows of `meta.tsv`.
///
/// Each row is `<label>\t<v1>\t...\t<vN>`; the label is dropped. All three rows must have
/// the width of the first. Anything after the third row is ignored.
pub fn read_metadata(path: &Utf8Path) -> Result<ExpressionIndex, MicroarrayError> {
    let mut reader = TsvReader::open(path)?;
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(METADATA_ROWS);
    let mut width = 0;

    while rows.len() < METADATA_ROWS {
        let Some((line, record)) = reader.next_record()? else {
            return Err(MicroarrayError::MalformedMetadata {
                path: path.to_owned(),
                message: format!("expected {METADATA_ROWS} rows, found {}", rows.len()),
            });
        };
        if rows.is_empty() {
            width = record.len();
        } else if record.len() != width {
            return Err(MicroarrayError::MalformedMetadata {
                path: path.to_owned(),
                message: format!(
                    "line {line} has {} columns, expected {width}",
                    record.len()
                ),
            });
        }
        rows.push(record.iter().skip(1).map(str::to_string).collect());
    }

    let mut rows = rows.into_iter();
    let probe_ids = rows.next().unwrap_or_default();
    let entrez_ids = rows.next().unwrap_or_default();
    let gene_symbols = rows.next().unwrap_or_default();
    Ok(ExpressionIndex {
        probe_ids,
        entrez_ids,
        gene_symbols,
    })
}

/// Turns sample-major columns into probe-major rows: `out[i][j] = columns[j][i]`.
///
/// Every column must hold at least `n_probes` values.
pub(crate) fn transpose(columns: &[Vec<f64>], n_probes: usize) -> Vec<Vec<f64>> {
    (0..n_probes)
        .map(|probe| columns.iter().map(|column| column[probe]).collect())
        .collect()
}
