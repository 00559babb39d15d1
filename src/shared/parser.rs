// Reader for the delimited (csv/tsv) sequence files

use crate::shared::errors::PipelineError;
use anyhow::{anyhow, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One data row, restricted to the selected columns (in the requested order)
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub line: u64,
    pub values: Vec<String>,
}

/// Tab for `.tsv`/`.tab` files, comma otherwise
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") | Some("tab") => b'\t',
        _ => b',',
    }
}

pub fn read_columns(path: &Path, delimiter: u8, columns: &[&str]) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|e| anyhow!("Unable to open {}: {}", path.display(), e))?;
    read_columns_from(file, &path.display().to_string(), delimiter, columns)
}

/// Same as `read_columns`, from any reader. `name` is only used in errors.
/// Every selected column must exist and be non-empty on every row.
/// ```
/// use imrex_data::shared::parser::read_columns_from;
/// let data = "id,cdr3,antigen.epitope\n1,CASSLGQAYEQYF,GILGFVFTL\n";
/// let rows = read_columns_from(data.as_bytes(), "inline", b',', &["antigen.epitope", "cdr3"]).unwrap();
/// assert_eq!(rows[0].values, vec!["GILGFVFTL", "CASSLGQAYEQYF"]);
/// assert_eq!(rows[0].line, 2);
/// ```
pub fn read_columns_from<R: Read>(
    reader: R,
    name: &str,
    delimiter: u8,
    columns: &[&str],
) -> Result<Vec<Record>> {
    let mut rdr = ReaderBuilder::new().delimiter(delimiter).from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| PipelineError::malformed(name, format!("unreadable header ({})", e)))?
        .clone();

    let mut indices = Vec::with_capacity(columns.len());
    for col in columns {
        indices.push(
            headers
                .iter()
                .position(|h| h.trim() == *col)
                .ok_or_else(|| PipelineError::malformed(name, format!("missing column '{}'", col)))?,
        );
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| PipelineError::malformed(name, e.to_string()))?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let mut values = Vec::with_capacity(indices.len());
        for (&idx, col) in indices.iter().zip(columns) {
            match row.get(idx).map(str::trim) {
                Some(v) if !v.is_empty() => values.push(v.to_string()),
                _ => {
                    return Err(PipelineError::malformed(
                        name,
                        format!("empty field '{}' on line {}", col, line),
                    ))?
                }
            }
        }
        records.push(Record { line, values });
    }
    Ok(records)
}
