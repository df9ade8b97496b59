//! Fallback backend: Arrow record batches
//!
//! Tables are kept as the schema plus the record batches produced by the
//! readers; nothing is concatenated unless a codec needs whole columns.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::compute::{cast, concat_batches};
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type, Schema, SchemaRef};
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use super::backend::{
    Backend, BackendKind, DispatchTable, CSV_TOKENS, IPC_TOKENS, PARQUET_TOKENS, XLSX_TOKENS,
};
use super::error::BackendError;
use super::format::FormatCode;
use super::spreadsheet::{read_sheet, write_sheet, SheetColumn, SheetData};

/// Decoded Arrow table
#[derive(Debug, Clone)]
pub struct ArrowTable {
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

impl ArrowTable {
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    /// All batches as one; an empty batch when there are none
    pub fn concat(&self) -> Result<RecordBatch, BackendError> {
        Ok(concat_batches(&self.schema, &self.batches)?)
    }

    /// Batches to write, with an empty batch standing in for a row-less table
    fn batches_or_empty(&self) -> Vec<RecordBatch> {
        if self.batches.is_empty() {
            vec![RecordBatch::new_empty(self.schema.clone())]
        } else {
            self.batches.clone()
        }
    }
}

/// Converts through Arrow record batches
pub struct ArrowBackend {
    dispatch: DispatchTable<ArrowTable>,
}

impl ArrowBackend {
    pub fn new() -> Self {
        let dispatch = DispatchTable::new(BackendKind::Arrow)
            .register(CSV_TOKENS, FormatCode::Csv, read_csv, write_csv)
            .register(IPC_TOKENS, FormatCode::Ipc, read_ipc, write_ipc)
            .register(PARQUET_TOKENS, FormatCode::Parquet, read_parquet, write_parquet)
            .register(XLSX_TOKENS, FormatCode::Xlsx, read_xlsx, write_xlsx);
        Self { dispatch }
    }
}

impl Default for ArrowBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for ArrowBackend {
    type Table = ArrowTable;

    fn kind(&self) -> BackendKind {
        BackendKind::Arrow
    }

    fn dispatch(&self) -> &DispatchTable<ArrowTable> {
        &self.dispatch
    }

    fn shape(table: &ArrowTable) -> (usize, usize) {
        (table.num_rows(), table.num_columns())
    }
}

fn read_csv(path: &Path) -> Result<ArrowTable, BackendError> {
    let mut file = File::open(path)?;
    let format = Format::default().with_header(true);
    // Column types come from every record, not a leading sample
    let (schema, _) = format.infer_schema(&mut file, None)?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(file)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    Ok(ArrowTable { schema, batches })
}

fn write_csv(table: &mut ArrowTable, path: &Path) -> Result<(), BackendError> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    for batch in table.batches_or_empty() {
        writer.write(&batch)?;
    }
    Ok(())
}

fn read_ipc(path: &Path) -> Result<ArrowTable, BackendError> {
    let file = File::open(path)?;
    let reader = FileReader::try_new(file, None)?;
    let schema = reader.schema();
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    Ok(ArrowTable { schema, batches })
}

fn write_ipc(table: &mut ArrowTable, path: &Path) -> Result<(), BackendError> {
    let file = File::create(path)?;
    let mut writer = FileWriter::try_new(file, &table.schema)?;
    for batch in &table.batches {
        writer.write(batch)?;
    }
    writer.finish()?;
    Ok(())
}

fn read_parquet(path: &Path) -> Result<ArrowTable, BackendError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let batches = builder.build()?.collect::<Result<Vec<_>, _>>()?;

    Ok(ArrowTable { schema, batches })
}

fn write_parquet(table: &mut ArrowTable, path: &Path) -> Result<(), BackendError> {
    let file = File::create(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, table.schema.clone(), Some(props))?;
    for batch in &table.batches {
        writer.write(batch)?;
    }
    writer.close()?;
    Ok(())
}

fn read_xlsx(path: &Path) -> Result<ArrowTable, BackendError> {
    let sheet = read_sheet(path)?;
    sheet_to_table(sheet)
}

fn write_xlsx(table: &mut ArrowTable, path: &Path) -> Result<(), BackendError> {
    let sheet = table_to_sheet(table)?;
    write_sheet(path, &sheet)
}

fn sheet_to_table(sheet: SheetData) -> Result<ArrowTable, BackendError> {
    let mut fields = Vec::with_capacity(sheet.names.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(sheet.names.len());

    for (name, column) in sheet.names.into_iter().zip(sheet.columns) {
        let (data_type, array): (DataType, ArrayRef) = match column {
            SheetColumn::Int(v) => (DataType::Int64, Arc::new(Int64Array::from(v))),
            SheetColumn::Float(v) => (DataType::Float64, Arc::new(Float64Array::from(v))),
            SheetColumn::Bool(v) => (DataType::Boolean, Arc::new(BooleanArray::from(v))),
            SheetColumn::Text(v) => (DataType::Utf8, Arc::new(StringArray::from(v))),
        };
        fields.push(Field::new(name, data_type, true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let batches = if arrays.is_empty() {
        Vec::new()
    } else {
        vec![RecordBatch::try_new(schema.clone(), arrays)?]
    };

    Ok(ArrowTable { schema, batches })
}

fn table_to_sheet(table: &ArrowTable) -> Result<SheetData, BackendError> {
    let batch = table.concat()?;
    let mut sheet = SheetData::default();

    for (field, array) in table.schema.fields().iter().zip(batch.columns()) {
        let data_type = array.data_type();
        let values = if data_type.is_integer() {
            let widened = cast(array.as_ref(), &DataType::Int64)?;
            SheetColumn::Int(widened.as_primitive::<Int64Type>().iter().collect())
        } else if data_type.is_floating() {
            let widened = cast(array.as_ref(), &DataType::Float64)?;
            SheetColumn::Float(widened.as_primitive::<Float64Type>().iter().collect())
        } else if data_type == &DataType::Boolean {
            SheetColumn::Bool(array.as_boolean().iter().collect())
        } else {
            let widened = cast(array.as_ref(), &DataType::Utf8)?;
            SheetColumn::Text(
                widened.as_string::<i32>()
                    .iter()
                    .map(|v| v.map(str::to_string))
                    .collect(),
            )
        };

        sheet.names.push(field.name().clone());
        sheet.columns.push(values);
    }

    Ok(sheet)
}
