// CSV reader and normalizer
// Reads the venue file, cleans headers, filters rows and maps missing values to null

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::error::DatasetError;
use super::record::{FieldValue, VenueRecord};

/// Cells treated as missing values (the NA strings pandas recognises by default)
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Options controlling how the venue file is parsed
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub delimiter: u8,
    /// Columns that must be present and non-null for a row to be kept
    pub required_columns: Vec<String>,
    /// Exact cell contents treated as missing values
    pub na_values: HashSet<String>,
    /// Emit numeric columns as JSON numbers instead of strings
    pub infer_types: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            required_columns: vec!["latitud".to_string(), "longitud".to_string()],
            na_values: DEFAULT_NA_VALUES.iter().map(ToString::to_string).collect(),
            infer_types: false,
        }
    }
}

impl ReadOptions {
    fn is_missing(&self, cell: &str) -> bool {
        self.na_values.contains(cell)
    }
}

/// Result of reading the venue file
#[derive(Debug, Default)]
pub struct Dataset {
    /// Cleaned header names, in file order
    pub columns: Vec<String>,
    /// Rows that passed the coordinate filter, in file order
    pub records: Vec<VenueRecord>,
    /// Data rows read before filtering
    pub rows_read: usize,
}

impl Dataset {
    pub fn dropped(&self) -> usize {
        self.rows_read - self.records.len()
    }

    /// Missing cells across the kept records
    pub fn null_cells(&self) -> usize {
        self.records.iter().map(VenueRecord::null_count).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

type Row = Vec<Option<String>>;

/// Read and normalize the venue file at `path`
///
/// Returns `DatasetError::NotFound` when the file does not exist; every
/// other failure is a processing error.
pub fn load_dataset(path: &Path, options: &ReadOptions) -> Result<Dataset, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
        _ => DatasetError::Io(e),
    })?;

    read_dataset(file, options)
}

/// Read and normalize venue rows from any CSV source
pub fn read_dataset<R: Read>(source: R, options: &ReadOptions) -> Result<Dataset, DatasetError> {
    // Headers are handled here rather than by the csv crate so that an empty
    // file and ragged rows can be reported precisely.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(source);
    let mut records = reader.records();

    let header = records.next().ok_or(DatasetError::Empty)??;
    let columns = clean_headers(&header);
    let required = required_indices(&columns, &options.required_columns)?;

    let mut rows: Vec<Row> = Vec::new();
    for result in records {
        let record = result?;
        if record.len() > columns.len() {
            return Err(DatasetError::RaggedRow {
                line: record.position().map_or(0, csv::Position::line),
                expected: columns.len(),
                found: record.len(),
            });
        }

        let mut row: Row = record
            .iter()
            .map(|cell| (!options.is_missing(cell)).then(|| cell.to_string()))
            .collect();
        // Short rows are padded with missing values
        row.resize(columns.len(), None);
        rows.push(row);
    }
    let rows_read = rows.len();

    // Column types are decided over every row, before filtering
    let kinds = if options.infer_types {
        infer_column_kinds(columns.len(), &rows)
    } else {
        vec![ColumnKind::Text; columns.len()]
    };

    let records = rows
        .into_iter()
        .filter(|row| required.iter().all(|&i| row[i].is_some()))
        .map(|row| build_record(&columns, &kinds, row))
        .collect();

    Ok(Dataset {
        columns,
        records,
        rows_read,
    })
}

/// Trim header names, drop a leading BOM and suffix duplicates with `.1`, `.2`, ...
///
/// Blank names become `Unnamed: <index>`.
fn clean_headers(header: &csv::StringRecord) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(header.len());

    for (i, raw) in header.iter().enumerate() {
        let raw = if i == 0 {
            raw.trim_start_matches(BYTE_ORDER_MARK)
        } else {
            raw
        };
        let base = match raw.trim() {
            "" => format!("Unnamed: {i}"),
            trimmed => trimmed.to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 0;
        while seen.contains(&name) {
            suffix += 1;
            name = format!("{base}.{suffix}");
        }
        seen.insert(name.clone());
        columns.push(name);
    }

    columns
}

fn required_indices(columns: &[String], required: &[String]) -> Result<Vec<usize>, DatasetError> {
    let mut indices = Vec::with_capacity(required.len());
    let mut missing = Vec::new();

    for name in required {
        match columns.iter().position(|c| c == name) {
            Some(i) => indices.push(i),
            None => missing.push(name.clone()),
        }
    }

    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(DatasetError::MissingColumns(missing))
    }
}

fn infer_column_kinds(width: usize, rows: &[Row]) -> Vec<ColumnKind> {
    (0..width)
        .map(|i| {
            let mut kind = ColumnKind::Integer;
            for cell in rows.iter().filter_map(|row| row[i].as_deref()) {
                if kind == ColumnKind::Integer && cell.parse::<i64>().is_ok() {
                    continue;
                }
                if cell.parse::<f64>().is_ok_and(f64::is_finite) {
                    kind = ColumnKind::Float;
                } else {
                    return ColumnKind::Text;
                }
            }
            kind
        })
        .collect()
}

fn build_record(columns: &[String], kinds: &[ColumnKind], row: Row) -> VenueRecord {
    let fields = columns
        .iter()
        .zip(kinds)
        .zip(row)
        .map(|((name, kind), cell)| (name.clone(), to_value(cell, *kind)))
        .collect();
    VenueRecord::new(fields)
}

fn to_value(cell: Option<String>, kind: ColumnKind) -> FieldValue {
    let Some(text) = cell else {
        return FieldValue::Null;
    };

    match kind {
        ColumnKind::Integer => match text.parse::<i64>() {
            Ok(v) => FieldValue::Integer(v),
            Err(_) => FieldValue::Text(text),
        },
        ColumnKind::Float => match text.parse::<f64>() {
            Ok(v) => FieldValue::Float(v),
            Err(_) => FieldValue::Text(text),
        },
        ColumnKind::Text => FieldValue::Text(text),
    }
}
