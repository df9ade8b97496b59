//! Excel workbook support shared by both backends
//!
//! Sheets are decoded with calamine into a backend-neutral column layout and
//! encoded from that layout with rust_xlsxwriter. Each backend only converts
//! between its own table type and [`SheetData`].

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use rust_xlsxwriter::Workbook;

use super::error::BackendError;

/// Largest row index a worksheet can address (header included)
const MAX_SHEET_ROWS: usize = 1_048_576;

/// Largest column count a worksheet can address
const MAX_SHEET_COLUMNS: usize = 16_384;

/// Workbook-level name holding the number of data rows written
const ROW_COUNT_NAME: &str = "dfconv_row_count";

static EMPTY_CELL: Data = Data::Empty;

/// One typed column of cell values; `None` is an empty cell
#[derive(Debug, Clone, PartialEq)]
pub enum SheetColumn {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
}

impl SheetColumn {
    pub fn len(&self) -> usize {
        match self {
            SheetColumn::Int(v) => v.len(),
            SheetColumn::Float(v) => v.len(),
            SheetColumn::Bool(v) => v.len(),
            SheetColumn::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Header names and columns of a single worksheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    pub names: Vec<String>,
    pub columns: Vec<SheetColumn>,
}

impl SheetData {
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, SheetColumn::len)
    }
}

/// Read the first worksheet; its first row holds the column names.
pub fn read_sheet(path: &Path) -> Result<SheetData, BackendError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook.sheet_names().first().cloned().ok_or_else(|| {
        BackendError::Layout(format!("Workbook has no worksheets: {}", path.display()))
    })?;
    let recorded_rows = recorded_row_count(workbook.defined_names());
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let names: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Data::Empty => format!("column_{}", i + 1),
                other => other.to_string(),
            })
            .collect(),
        None => return Ok(SheetData::default()),
    };

    let mut cells: Vec<Vec<&Data>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(row.get(i).unwrap_or(&EMPTY_CELL));
        }
    }

    // Rows that are empty in every column are not stored in the sheet
    if let Some(height) = recorded_rows {
        for column in cells.iter_mut() {
            while column.len() < height {
                column.push(&EMPTY_CELL);
            }
        }
    }

    let columns = cells.into_iter().map(infer_column).collect();
    Ok(SheetData { names, columns })
}

/// Write `sheet` as a single worksheet with a header row.
pub fn write_sheet(path: &Path, sheet: &SheetData) -> Result<(), BackendError> {
    if sheet.names.len() > MAX_SHEET_COLUMNS {
        return Err(BackendError::Layout(format!(
            "{} columns exceed the worksheet limit of {}",
            sheet.names.len(),
            MAX_SHEET_COLUMNS
        )));
    }
    if sheet.height() + 1 > MAX_SHEET_ROWS {
        return Err(BackendError::Layout(format!(
            "{} rows exceed the worksheet limit of {}",
            sheet.height(),
            MAX_SHEET_ROWS - 1
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, (name, column)) in sheet.names.iter().zip(&sheet.columns).enumerate() {
        let col = col as u16;
        worksheet.write_string(0, col, name.as_str())?;

        match column {
            SheetColumn::Int(values) => {
                for (row, value) in cell_rows(values) {
                    worksheet.write_number(row, col, *value as f64)?;
                }
            }
            SheetColumn::Float(values) => {
                // NaN and infinities have no cell representation
                for (row, value) in cell_rows(values) {
                    if value.is_finite() {
                        worksheet.write_number(row, col, *value)?;
                    }
                }
            }
            SheetColumn::Bool(values) => {
                for (row, value) in cell_rows(values) {
                    worksheet.write_boolean(row, col, *value)?;
                }
            }
            SheetColumn::Text(values) => {
                for (row, value) in cell_rows(values) {
                    worksheet.write_string(row, col, value.as_str())?;
                }
            }
        }
    }

    workbook.define_name(ROW_COUNT_NAME, &format!("={}", sheet.height()))?;
    workbook.save(path)?;
    Ok(())
}

/// Row count stored by [`write_sheet`], if the workbook carries one
fn recorded_row_count(names: &[(String, String)]) -> Option<usize> {
    names
        .iter()
        .find(|(name, _)| name == ROW_COUNT_NAME)
        .and_then(|(_, value)| value.trim_start_matches('=').trim().parse().ok())
}

/// Non-empty values with their worksheet row (row 0 is the header)
fn cell_rows<'a, T>(values: &'a [Option<T>]) -> impl Iterator<Item = (u32, &'a T)> + 'a {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.as_ref().map(|v| (i as u32 + 1, v)))
}

/// Pick the narrowest column type that holds every non-empty cell
fn infer_column(cells: Vec<&Data>) -> SheetColumn {
    let filled = || cells.iter().filter(|c| !is_blank(c));

    if filled().all(|c| matches!(c, Data::Int(_))) && filled().next().is_some() {
        return SheetColumn::Int(cells.iter().map(|c| c.get_int()).collect());
    }
    if filled().all(|c| matches!(c, Data::Int(_) | Data::Float(_))) && filled().next().is_some() {
        return SheetColumn::Float(cells.iter().map(|c| c.as_f64()).collect());
    }
    if filled().all(|c| matches!(c, Data::Bool(_))) && filled().next().is_some() {
        return SheetColumn::Bool(cells.iter().map(|c| c.get_bool()).collect());
    }

    SheetColumn::Text(cells.iter().map(|c| cell_text(c)).collect())
}

fn is_blank(cell: &Data) -> bool {
    matches!(cell, Data::Empty | Data::Error(_))
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        other => Some(other.to_string()),
    }
}
