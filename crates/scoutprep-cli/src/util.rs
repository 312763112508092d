use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use scoutprep_prep::table::{Cell, Table};

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    /// Writes `table` as CSV with a header row; missing cells are empty fields
    pub fn write_csv(&mut self, table: &Table) -> anyhow::Result<()> {
        let display_path = self.display_path();
        let mut writer = csv::Writer::from_writer(&mut *self);
        writer
            .write_record(table.column_names())
            .with_context(|| format!("Failed to write CSV header to {display_path}"))?;
        for pos in 0..table.num_rows() {
            writer
                .write_record(table.row(pos).map(cell_to_field))
                .with_context(|| format!("Failed to write CSV row to {display_path}"))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush output to {display_path}"))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Table file formats understood by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    /// Chooses a format from the file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TableFormat::Json,
            _ => TableFormat::Csv,
        }
    }
}

/// How to type the text fields of a delimited file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellParsing {
    /// Keep every value as text (raw survey exports)
    Text,
    /// Infer booleans and numbers (processed tables)
    Infer,
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read a CSV file into a table
///
/// # Arguments
///
/// * `path` - Path to the CSV file (first row is the header)
/// * `parsing` - Whether to keep values as text or infer their types
///
/// # Errors
///
/// Returns error if the file cannot be opened or a record is malformed
pub fn read_csv_table<P>(path: P, parsing: CellParsing) -> anyhow::Result<Table>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    let header = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .iter()
        .map(|name| name.trim().to_owned())
        .collect::<Vec<_>>();

    let records = reader
        .records()
        .map(|record| {
            let record = record
                .with_context(|| format!("Failed to read CSV record: {}", path.display()))?;
            Ok(record
                .iter()
                .map(|field| match parsing {
                    CellParsing::Text => Cell::text(field),
                    CellParsing::Infer => Cell::infer(field),
                })
                .collect())
        })
        .collect::<anyhow::Result<Vec<Vec<Cell>>>>()?;

    Ok(Table::from_records(&header, records))
}

/// Read a table from CSV or JSON, chosen by extension
pub fn read_table<P>(path: P, parsing: CellParsing) -> anyhow::Result<Table>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match TableFormat::from_path(path) {
        TableFormat::Csv => read_csv_table(path, parsing),
        TableFormat::Json => read_json_file("table", path),
    }
}

fn cell_to_field(cell: &Cell) -> String {
    match cell {
        Cell::Missing => String::new(),
        Cell::Float(value) if value.is_nan() => String::new(),
        Cell::Bool(value) => value.to_string(),
        Cell::Int(value) => value.to_string(),
        Cell::Float(value) => value.to_string(),
        Cell::Text(text) => text.clone(),
    }
}
