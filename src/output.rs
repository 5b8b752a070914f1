use std::io::Write;

use csv::WriterBuilder;
use serde::Serialize;

use crate::domain::ExpressionMatrix;
use crate::error::MicroarrayError;

const INDEX_COLUMNS: [&str; 3] = ["probe_id", "entrez_id", "gene_symbol"];

/// Writes the matrix as TSV: the three index columns followed by one column per sample.
pub fn write_tsv<W: Write>(matrix: &ExpressionMatrix, writer: W) -> Result<(), MicroarrayError> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(false)
        .from_writer(writer);

    let header = INDEX_COLUMNS
        .iter()
        .map(|name| name.to_string())
        .chain(matrix.header.iter().cloned())
        .collect::<Vec<_>>();
    wtr.write_record(&header).map_err(tsv_error)?;

    let index = &matrix.index;
    let n_probes = matrix.values.len();
    if index.probe_ids.len() != n_probes
        || index.entrez_ids.len() != n_probes
        || index.gene_symbols.len() != n_probes
    {
        return Err(MicroarrayError::Serialize(format!(
            "index lengths {}/{}/{} do not match {n_probes} matrix rows",
            index.probe_ids.len(),
            index.entrez_ids.len(),
            index.gene_symbols.len()
        )));
    }
    let n_samples = matrix.header.len();
    let rows = matrix
        .values
        .iter()
        .zip(&index.probe_ids)
        .zip(&index.entrez_ids)
        .zip(&index.gene_symbols);
    for (((values, probe), entrez), symbol) in rows {
        if values.len() != n_samples {
            return Err(MicroarrayError::Serialize(format!(
                "row for probe {probe} has {} values, header has {n_samples} samples",
                values.len()
            )));
        }
        let mut record = Vec::with_capacity(INDEX_COLUMNS.len() + values.len());
        record.push(probe.clone());
        record.push(entrez.clone());
        record.push(symbol.clone());
        record.extend(values.iter().map(f64::to_string));
        wtr.write_record(&record).map_err(tsv_error)?;
    }
    wtr.flush()
        .map_err(|err| MicroarrayError::Serialize(err.to_string()))?;
    Ok(())
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, MicroarrayError> {
    serde_json::to_string_pretty(value).map_err(|err| MicroarrayError::Serialize(err.to_string()))
}

fn tsv_error(err: csv::Error) -> MicroarrayError {
    MicroarrayError::Serialize(err.to_string())
}
