use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};

use super::model::Dataset;
use crate::consts::SPREADSHEET_EXTENSIONS;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("cannot read sheet \"{sheet}\": {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    /// The sheet exists but its content is not a header row followed by
    /// numeric records.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

// ---------------------------------------------------------------------------
// Sheet source – the seam the input file box reads through
// ---------------------------------------------------------------------------

/// Something that can list the sheets of a file and parse one of them.
pub trait SheetSource {
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>, LoadError>;
    fn read_sheet(&self, path: &Path, sheet: &str) -> Result<Dataset, LoadError>;
}

/// Reads spreadsheets from disk with `calamine`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineSource;

impl SheetSource for CalamineSource {
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>, LoadError> {
        let workbook = open_workbook_auto(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(workbook.sheet_names())
    }

    fn read_sheet(&self, path: &Path, sheet: &str) -> Result<Dataset, LoadError> {
        let mut workbook = open_workbook_auto(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|source| LoadError::Sheet {
                sheet: sheet.to_string(),
                source,
            })?;
        let dataset = dataset_from_range(&range)?;
        log::info!(
            "Read {} records x {} columns from sheet \"{sheet}\" of {}",
            dataset.len(),
            dataset.width(),
            path.display()
        );
        Ok(dataset)
    }
}

/// Whether the path has a spreadsheet extension (case-insensitive).
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SPREADSHEET_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Sheet parsing
// ---------------------------------------------------------------------------

/// Sheet layout: the first row of the used range holds column names, every
/// following row holds one numeric record. Trailing blank rows are ignored.
pub fn dataset_from_range(range: &Range<Data>) -> Result<Dataset, LoadError> {
    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| LoadError::InvalidData("sheet is empty".to_string()))?;

    let headers = parse_headers(header_row)?;
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    let mut records: Vec<&[Data]> = rows.collect();
    while records
        .last()
        .is_some_and(|row| row.iter().take(headers.len()).all(is_blank))
    {
        records.pop();
    }
    if records.is_empty() {
        return Err(LoadError::InvalidData("sheet has no records".to_string()));
    }

    for (row_no, row) in records.iter().enumerate() {
        for (col_idx, name) in headers.iter().enumerate() {
            let cell = row.get(col_idx).unwrap_or(&Data::Empty);
            let value = cell_to_f64(cell).ok_or_else(|| {
                LoadError::InvalidData(format!(
                    "record {}, column \"{name}\": '{cell}' is not a number",
                    row_no + 1
                ))
            })?;
            columns[col_idx].push(value);
        }
    }

    Ok(Dataset::from_columns(headers.into_iter().zip(columns)))
}

fn parse_headers(row: &[Data]) -> Result<Vec<String>, LoadError> {
    let width = row
        .iter()
        .rposition(|cell| !is_blank(cell))
        .map(|last| last + 1)
        .ok_or_else(|| LoadError::InvalidData("header row is empty".to_string()))?;

    let mut headers: Vec<String> = Vec::with_capacity(width);
    for (idx, cell) in row[..width].iter().enumerate() {
        let name = cell.to_string().trim().to_string();
        if name.is_empty() {
            return Err(LoadError::InvalidData(format!(
                "column {} has no header",
                idx + 1
            )));
        }
        if headers.contains(&name) {
            return Err(LoadError::InvalidData(format!(
                "duplicate column header \"{name}\""
            )));
        }
        headers.push(name);
    }
    Ok(headers)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
