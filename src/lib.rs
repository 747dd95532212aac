pub mod cli;
pub mod config;
pub mod datatype;
pub mod donut;
pub mod error;
pub mod geometry;
pub mod io_utils;
pub mod map;
pub mod map_config;
pub mod palette;
pub mod region;
pub mod registry;
pub mod rows;
pub mod scale;

use std::{collections::BTreeMap, env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands},
    datatype::{extract_uniques, infer_value_type, value_range},
    palette::PaletteRegistry,
    region::{RegionRecord, classify_region_type},
    registry::BoundaryRegistry,
    rows::{DATA_FIELD, DataRow, build_data_lookup, check_duplicates, read_grid},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("choropleth_check", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Classify(args) => handle_classify(&args),
        Commands::Infer(args) => handle_infer(&args),
        Commands::Check(args) => handle_check(&args),
        Commands::Map(args) => map::execute(&args),
        Commands::Donut(args) => handle_donut(&args),
        Commands::Registry => handle_registry(),
    }
}

fn load_grid(args: &cli::GridArgs, required: &[&str]) -> Result<Vec<DataRow>> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Reading grid '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );
    read_grid(&args.input, delimiter, encoding, required)
        .with_context(|| format!("Loading grid from {:?}", args.input))
}

fn handle_classify(args: &cli::ClassifyArgs) -> Result<()> {
    let rows = load_grid(&args.grid, &[args.id_column.as_str()])?;
    let registry = BoundaryRegistry::load(args.registry.as_deref())?;
    let lookup = build_data_lookup(&rows, &args.id_column);
    let records = lookup
        .iter()
        .map(|(key, row)| (key.clone(), RegionRecord::new(row.get(&args.id_column))))
        .collect::<BTreeMap<_, _>>();
    let detected = classify_region_type(&records, &registry)?;
    info!("Classified {} record(s)", records.len());
    match detected.or(args.level) {
        Some(level) => println!("{level}"),
        None => println!("unknown"),
    }
    Ok(())
}

fn handle_infer(args: &cli::InferArgs) -> Result<()> {
    let rows = load_grid(&args.grid, &[args.column.as_str()])?;
    // inference always reads the data field
    let rows = if args.column == DATA_FIELD {
        rows
    } else {
        rows.into_iter()
            .map(|row| {
                let value = row.get(&args.column).to_string();
                row.with(DATA_FIELD, &value)
            })
            .collect()
    };
    let value_type = infer_value_type(&rows);
    let uniques = extract_uniques(&rows);
    println!("type: {value_type}");
    println!("distinct: {}", uniques.len());
    if let Some((min, max)) = value_range(&rows) {
        println!("range: {min} to {max}");
    }
    Ok(())
}

fn handle_check(args: &cli::CheckArgs) -> Result<()> {
    let rows = load_grid(&args.grid, &[args.key.as_str()])?;
    check_duplicates(&rows, &args.key)
        .with_context(|| format!("Checking '{}' for duplicates", args.key))?;
    info!("✓ {} row(s) have unique '{}' values", rows.len(), args.key);
    Ok(())
}

fn handle_donut(args: &cli::DonutArgs) -> Result<()> {
    let rows = load_grid(&args.grid, &[args.label_column.as_str(), DATA_FIELD])?;
    check_duplicates(&rows, &args.label_column)?;
    let palettes = PaletteRegistry::load(args.palettes.as_deref())?;
    let theme = palettes.theme(&args.organisation)?;
    let segments = donut::build_donut(&rows, &args.label_column, theme, args.scheme)?;
    info!(
        "{} segment(s) coloured from the {} palette",
        segments.len(),
        args.organisation
    );
    for segment in &segments {
        println!("{}\t{}\t{}", segment.legend(), segment.value, segment.colour);
    }
    Ok(())
}

fn handle_registry() -> Result<()> {
    let registry = BoundaryRegistry::builtin()?;
    print!("{}", registry.to_yaml()?);
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
