use std::path::PathBuf;

use anyhow::Context;
use scoutprep_bins::CodeBook;

use crate::util::{self, CellParsing, Output, TableFormat};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct IngestArg {
    /// Raw survey export (CSV with the questionnaire header)
    #[arg(long)]
    input: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format (csv or json); inferred from the output path when omitted
    #[arg(long)]
    format: Option<TableFormat>,
}

pub(crate) fn run(arg: &IngestArg) -> anyhow::Result<()> {
    let IngestArg {
        input,
        output,
        format,
    } = arg;

    eprintln!("Loading survey export from {}...", input.display());
    let raw = util::read_csv_table(input, CellParsing::Text)?;
    eprintln!("Loaded {} responses", raw.num_rows());

    let (records, summary) = scoutprep_prep::ingest::ingest(raw, &CodeBook::standard())
        .with_context(|| format!("Failed to ingest survey export: {}", input.display()))?;
    tracing::info!(
        input_rows = summary.input_rows,
        consented_rows = summary.consented_rows,
        declined_rows = summary.declined_rows(),
        "ingested survey export"
    );

    let format = format
        .or_else(|| output.as_deref().map(TableFormat::from_path))
        .unwrap_or(TableFormat::Csv);
    let mut output = Output::from_output_path(output.clone())?;
    match format {
        TableFormat::Csv => output.write_csv(&records)?,
        TableFormat::Json => output.write_json(&records)?,
    }

    eprintln!(
        "Kept {} of {} responses ({} declined consent)",
        summary.consented_rows,
        summary.input_rows,
        summary.declined_rows()
    );
    eprintln!("Records written to {}", output.display_path());
    Ok(())
}
