//! Writers for pivoted tables and their metadata.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, ListBuilder, StringBuilder};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::Workbook;
use serde_json::{Map, Value};

use super::{PivotMetadata, PivotTable};
use crate::error::{Error, Result};

/// Separator for multi-valued cells in flat (CSV, XLSX) outputs.
pub const CELL_SEPARATOR: &str = "; ";

/// Files written by [`export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    /// Parquet table.
    pub parquet: PathBuf,
    /// JSON records sibling.
    pub json: PathBuf,
    /// CSV sibling.
    pub csv: PathBuf,
    /// XLSX sibling.
    pub xlsx: PathBuf,
    /// Metadata JSON.
    pub metadata: PathBuf,
    /// Tabular metadata sidecar, written next to a `.json` metadata file.
    pub metadata_csv: Option<PathBuf>,
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// Writes `table` as Parquet to `parquet_path`, with `.json`, `.csv` and
/// `.xlsx` siblings of the same stem, and `metadata` as JSON.
///
/// # Errors
///
/// Returns [`Error::Export`] on a writer failure and [`Error::Io`] if a
/// file cannot be created.
pub fn export(
    table: &PivotTable,
    metadata: &PivotMetadata,
    parquet_path: &Path,
    metadata_path: &Path,
) -> Result<ExportPaths> {
    let paths = ExportPaths {
        parquet: parquet_path.with_extension("parquet"),
        json: parquet_path.with_extension("json"),
        csv: parquet_path.with_extension("csv"),
        xlsx: parquet_path.with_extension("xlsx"),
        metadata: metadata_path.to_path_buf(),
        metadata_csv: metadata_path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"))
            .then(|| metadata_path.with_extension("csv")),
    };
    for path in [&paths.parquet, &paths.json, &paths.csv, &paths.xlsx] {
        write_table(table, path)?;
    }

    create_parent(metadata_path)?;
    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(metadata_path, json).map_err(|e| Error::io(metadata_path, e))?;
    if let Some(sidecar) = &paths.metadata_csv {
        write_metadata_csv(metadata, sidecar)?;
    }
    tracing::info!(path = %metadata_path.display(), variables = metadata.len(), "metadata written");
    Ok(paths)
}

/// Writes `table` in the format named by the extension of `path`:
/// `.parquet`, `.json`, `.csv` or `.xlsx`.
///
/// # Errors
///
/// Returns [`Error::Export`] for any other extension or a writer failure.
pub fn write_table(table: &PivotTable, path: &Path) -> Result<()> {
    create_parent(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "parquet" => write_parquet(table, path)?,
        "json" => write_records(table, path)?,
        "csv" => write_csv(table, path)?,
        "xlsx" => write_xlsx(table, path)?,
        other => return Err(Error::export(path, format!("unsupported table format '{other}'"))),
    }
    tracing::info!(path = %path.display(), rows = table.len(), "table written");
    Ok(())
}

fn write_parquet(table: &PivotTable, path: &Path) -> Result<()> {
    let columns: Vec<(String, ArrayRef)> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut builder = ListBuilder::new(StringBuilder::new());
            for row in &table.rows {
                let cell = &row[i];
                for v in cell {
                    builder.values().append_value(v);
                }
                builder.append(!cell.is_empty());
            }
            let array: ArrayRef = Arc::new(builder.finish());
            (name.clone(), array)
        })
        .collect();
    let batch = RecordBatch::try_from_iter(columns).map_err(|e| Error::export(path, e))?;
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).map_err(|e| Error::export(path, e))?;
    writer.write(&batch).map_err(|e| Error::export(path, e))?;
    writer.close().map_err(|e| Error::export(path, e))?;
    Ok(())
}

fn write_records(table: &PivotTable, path: &Path) -> Result<()> {
    let records: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = table
                .columns
                .iter()
                .zip(row)
                .map(|(c, cell)| {
                    let value = if cell.is_empty() {
                        Value::Null
                    } else {
                        Value::from(cell.clone())
                    };
                    (c.clone(), value)
                })
                .collect();
            Value::Object(object)
        })
        .collect();
    let json = serde_json::to_string_pretty(&records)?;
    fs::write(path, json).map_err(|e| Error::io(path, e))
}

fn write_csv(table: &PivotTable, path: &Path) -> Result<()> {
    let table_err = |source| Error::Table {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(table_err)?;
    writer.write_record(&table.columns).map_err(table_err)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|cell| cell.join(CELL_SEPARATOR)))
            .map_err(table_err)?;
    }
    writer.flush().map_err(|e| Error::io(path, e))
}

fn write_xlsx(table: &PivotTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, name) in table.columns.iter().enumerate() {
        let col = u16::try_from(c).map_err(|e| Error::export(path, e))?;
        sheet
            .write_string(0, col, name)
            .map_err(|e| Error::export(path, e))?;
        for (r, row) in table.rows.iter().enumerate() {
            let cell = &row[c];
            if cell.is_empty() {
                continue;
            }
            let line = u32::try_from(r + 1).map_err(|e| Error::export(path, e))?;
            sheet
                .write_string(line, col, cell.join(CELL_SEPARATOR))
                .map_err(|e| Error::export(path, e))?;
        }
    }
    workbook.save(path).map_err(|e| Error::export(path, e))
}

fn write_metadata_csv(metadata: &PivotMetadata, path: &Path) -> Result<()> {
    let table_err = |source| Error::Table {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(table_err)?;
    writer
        .write_record(["Variable", "AltLabel", "Category", "Unit", "IsMeasure"])
        .map_err(table_err)?;
    for (name, meta) in metadata {
        let units: Vec<&str> = meta.units.iter().map(String::as_str).collect();
        let units = units.join(CELL_SEPARATOR);
        writer
            .write_record([
                name.as_str(),
                meta.alt_label.as_deref().unwrap_or(""),
                meta.category.as_deref().unwrap_or(""),
                units.as_str(),
                if meta.is_measure { "Yes" } else { "No" },
            ])
            .map_err(table_err)?;
    }
    writer.flush().map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pivot::ColumnMetadata;

    fn sample() -> (PivotTable, PivotMetadata) {
        let table = PivotTable {
            columns: vec!["ExperimentId".into(), "Temperature".into()],
            rows: vec![
                vec![vec!["EXP001".into()], vec!["25".into(), "26".into()]],
                vec![vec!["EXP002".into()], vec![]],
            ],
            identifier: Some("ExperimentId".into()),
        };
        let mut metadata = PivotMetadata::new();
        metadata.insert(
            "Temperature".into(),
            ColumnMetadata {
                alt_label: Some("Temperature".into()),
                category: Some("Result".into()),
                units: ["unit:DEG_C".to_owned()].into(),
                is_measure: true,
            },
        );
        (table, metadata)
    }

    #[test]
    fn csv_export_joins_cells_and_writes_sidecar() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (table, metadata) = sample();
        let paths = export(
            &table,
            &metadata,
            &dir.path().join("out.parquet"),
            &dir.path().join("meta.json"),
        )
        .expect("export");
        let text = fs::read_to_string(&paths.csv).expect("read");
        assert!(text.contains("EXP001,25; 26"));
        let sidecar = fs::read_to_string(paths.metadata_csv.expect("sidecar")).expect("read");
        assert!(sidecar.starts_with("Variable,AltLabel,Category,Unit,IsMeasure"));
        assert!(sidecar.contains("Temperature,Temperature,Result,unit:DEG_C,Yes"));
    }

    #[test]
    fn json_export_uses_null_for_empty_cells() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (table, metadata) = sample();
        let path = dir.path().join("out.json");
        write_table(&table, &path).expect("write");
        let records: Value =
            serde_json::from_str(&fs::read_to_string(path).expect("read")).expect("json");
        assert_eq!(records[0]["Temperature"], serde_json::json!(["25", "26"]));
        assert!(records[1]["Temperature"].is_null());
    }

    #[test]
    fn export_writes_every_sibling() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (table, metadata) = sample();
        let paths = export(&table, &metadata, &dir.path().join("t/out.parquet"), &dir.path().join("m.json"))
            .expect("export");
        for path in [&paths.parquet, &paths.json, &paths.csv, &paths.xlsx, &paths.metadata] {
            assert!(fs::metadata(path).expect("stat").len() > 0, "{}", path.display());
        }
    }

    #[test]
    fn unsupported_extension_is_an_export_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (table, _) = sample();
        let err = write_table(&table, &dir.path().join("out.txt")).expect_err("must fail");
        assert!(matches!(err, Error::Export { .. }));
    }
}
