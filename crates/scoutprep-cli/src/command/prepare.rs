use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use scoutprep_prep::{
    assemble::{self, Prepared},
    config::PrepConfig,
    table::Table,
};
use serde::Serialize;

use crate::util::{self, CellParsing, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PrepareArg {
    /// Ingested record table (CSV or JSON)
    #[arg(long)]
    input: PathBuf,
    /// Registered target name
    #[arg(long, default_value = "college_roster_binary")]
    target: String,
    /// JSON file overriding the default column configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Keep rows whose target is missing
    #[arg(long)]
    keep_missing_target: bool,
    /// Also emit the identifier and free-text columns of the kept rows
    #[arg(long)]
    with_metadata: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PreparedFile<'a> {
    prepared_at: DateTime<Utc>,
    target: &'a str,
    #[serde(flatten)]
    prepared: &'a Prepared,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Table>,
}

pub(crate) fn run(arg: &PrepareArg) -> anyhow::Result<()> {
    let PrepareArg {
        input,
        target,
        config,
        keep_missing_target,
        with_metadata,
        output,
    } = arg;

    let config = match config {
        Some(path) => util::read_json_file::<PrepConfig, _>("config", path)?,
        None => PrepConfig::standard(),
    };
    let config = config.with_dropna_y(!keep_missing_target);

    eprintln!("Loading records from {}...", input.display());
    let records = util::read_table(input, CellParsing::Infer)?;
    eprintln!("Loaded {} records", records.num_rows());

    let (prepared, metadata) = if *with_metadata {
        let assemble::PreparedWithMetadata { prepared, metadata } =
            assemble::prepare_with_metadata(&records, target, &config)
                .with_context(|| format!("Failed to prepare target '{target}'"))?;
        (prepared, Some(metadata))
    } else {
        let prepared = assemble::prepare(&records, target, &config)
            .with_context(|| format!("Failed to prepare target '{target}'"))?;
        (prepared, None)
    };

    println!("Rows: {}", prepared.num_rows());
    println!("Baseline features: {}", prepared.baseline.columns().join(", "));
    println!("Full features: {}", prepared.full.columns().join(", "));
    println!(
        "Target: {} ({} missing)",
        prepared.target.name(),
        prepared.target.num_missing()
    );

    if output.is_some() {
        let file = PreparedFile {
            prepared_at: Utc::now(),
            target,
            prepared: &prepared,
            metadata: metadata.as_ref(),
        };
        let mut output = Output::from_output_path(output.clone())?;
        output.write_json(&file)?;
        eprintln!("Prepared data written to {}", output.display_path());
    }
    Ok(())
}
