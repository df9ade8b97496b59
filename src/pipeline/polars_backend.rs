//! Primary backend: Polars DataFrames

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use super::backend::{
    Backend, BackendKind, DispatchTable, CSV_TOKENS, IPC_TOKENS, PARQUET_TOKENS, XLSX_TOKENS,
};
use super::error::BackendError;
use super::format::FormatCode;
use super::spreadsheet::{read_sheet, write_sheet, SheetColumn, SheetData};

/// Converts through an in-memory Polars `DataFrame`
pub struct PolarsBackend {
    dispatch: DispatchTable<DataFrame>,
}

impl PolarsBackend {
    pub fn new() -> Self {
        let dispatch = DispatchTable::new(BackendKind::Polars)
            .register(CSV_TOKENS, FormatCode::Csv, read_csv, write_csv)
            .register(IPC_TOKENS, FormatCode::Ipc, read_ipc, write_ipc)
            .register(PARQUET_TOKENS, FormatCode::Parquet, read_parquet, write_parquet)
            .register(XLSX_TOKENS, FormatCode::Xlsx, read_xlsx, write_xlsx);
        Self { dispatch }
    }
}

impl Default for PolarsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for PolarsBackend {
    type Table = DataFrame;

    fn kind(&self) -> BackendKind {
        BackendKind::Polars
    }

    fn dispatch(&self) -> &DispatchTable<DataFrame> {
        &self.dispatch
    }

    fn shape(table: &DataFrame) -> (usize, usize) {
        table.shape()
    }
}

fn read_csv(path: &Path) -> Result<DataFrame, BackendError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), BackendError> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(df)?;
    Ok(())
}

fn read_ipc(path: &Path) -> Result<DataFrame, BackendError> {
    let file = File::open(path)?;
    Ok(IpcReader::new(file).finish()?)
}

fn write_ipc(df: &mut DataFrame, path: &Path) -> Result<(), BackendError> {
    let mut file = File::create(path)?;
    IpcWriter::new(&mut file).finish(df)?;
    Ok(())
}

fn read_parquet(path: &Path) -> Result<DataFrame, BackendError> {
    let file = File::open(path)?;
    Ok(ParquetReader::new(file).finish()?)
}

fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<(), BackendError> {
    let file = File::create(path)?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .finish(df)?;
    Ok(())
}

fn read_xlsx(path: &Path) -> Result<DataFrame, BackendError> {
    let sheet = read_sheet(path)?;
    sheet_to_frame(sheet)
}

fn write_xlsx(df: &mut DataFrame, path: &Path) -> Result<(), BackendError> {
    let sheet = frame_to_sheet(df)?;
    write_sheet(path, &sheet)
}

fn sheet_to_frame(sheet: SheetData) -> Result<DataFrame, BackendError> {
    let columns: Vec<Column> = sheet
        .names
        .into_iter()
        .zip(sheet.columns)
        .map(|(name, values)| match values {
            SheetColumn::Int(v) => Column::new(name.into(), v),
            SheetColumn::Float(v) => Column::new(name.into(), v),
            SheetColumn::Bool(v) => Column::new(name.into(), v),
            SheetColumn::Text(v) => Column::new(name.into(), v),
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

fn frame_to_sheet(df: &DataFrame) -> Result<SheetData, BackendError> {
    let mut sheet = SheetData::default();

    for column in df.get_columns() {
        let dtype = column.dtype();
        let values = if dtype.is_integer() {
            let cast = column.cast(&DataType::Int64)?;
            SheetColumn::Int(cast.i64()?.into_iter().collect())
        } else if dtype.is_float() {
            let cast = column.cast(&DataType::Float64)?;
            SheetColumn::Float(cast.f64()?.into_iter().collect())
        } else if dtype == &DataType::Boolean {
            SheetColumn::Bool(column.bool()?.into_iter().collect())
        } else {
            let cast = column.cast(&DataType::String)?;
            SheetColumn::Text(
                cast.str()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect(),
            )
        };

        sheet.names.push(column.name().to_string());
        sheet.columns.push(values);
    }

    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::error::Side;
    use polars::prelude::*;

    #[test]
    fn test_frame_to_sheet_types() {
        let df = df! {
            "id" => [1i32, 2, 3],
            "score" => [Some(0.5f64), None, Some(1.5)],
            "flag" => [true, false, true],
            "label" => ["a", "b", "c"],
        }
        .unwrap();

        let sheet = frame_to_sheet(&df).unwrap();

        assert_eq!(sheet.names, vec!["id", "score", "flag", "label"]);
        assert_eq!(sheet.columns[0], SheetColumn::Int(vec![Some(1), Some(2), Some(3)]));
        assert_eq!(
            sheet.columns[1],
            SheetColumn::Float(vec![Some(0.5), None, Some(1.5)])
        );
        assert!(matches!(sheet.columns[2], SheetColumn::Bool(_)));
        assert!(matches!(sheet.columns[3], SheetColumn::Text(_)));
    }

    #[test]
    fn test_sheet_to_frame_shape() {
        let sheet = SheetData {
            names: vec!["x".to_string(), "y".to_string()],
            columns: vec![
                SheetColumn::Float(vec![Some(1.0), Some(2.0)]),
                SheetColumn::Text(vec![None, Some("b".to_string())]),
            ],
        };

        let df = sheet_to_frame(sheet).unwrap();

        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("y").unwrap().null_count(), 1);
    }

    #[test]
    fn test_ipc_aliases_use_same_codec() {
        let backend = PolarsBackend::new();
        let arrow = backend.dispatch().lookup("arrow", Side::Read).unwrap();
        let feather = backend.dispatch().lookup("feather", Side::Write).unwrap();

        assert!(std::ptr::eq(arrow, feather));
        assert_eq!(arrow.format, FormatCode::Ipc);
    }
}
