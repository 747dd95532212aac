use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{geometry::Inset, palette::Scheme, region::RegionLevel, scale::LevelOrder};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Check pasted region/value grids before they become maps and charts",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect the geography level (county, district, constituency) of a grid
    Classify(ClassifyArgs),
    /// Infer the value type, distinct levels and range of a grid's data column
    Infer(InferArgs),
    /// Fail when a key column repeats a value
    Check(CheckArgs),
    /// Match a grid against boundary GeoJSON and emit a render plan
    Map(MapArgs),
    /// Prepare donut chart segments from a label/value grid
    Donut(DonutArgs),
    /// Print the built-in boundary code registry as YAML
    Registry,
}

#[derive(Debug, Args)]
pub struct GridArgs {
    /// Grid CSV file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub grid: GridArgs,
    /// Column holding the boundary codes
    #[arg(long = "id-column", default_value = "ecode")]
    pub id_column: String,
    /// Level to report when no code is recognised
    #[arg(long)]
    pub level: Option<RegionLevel>,
    /// Boundary code registry YAML replacing the built-in one
    #[arg(long)]
    pub registry: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InferArgs {
    #[command(flatten)]
    pub grid: GridArgs,
    /// Column to inspect
    #[arg(long, default_value = "data")]
    pub column: String,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub grid: GridArgs,
    /// Column whose non-blank values must be unique
    #[arg(long, default_value = "ecode")]
    pub key: String,
}

#[derive(Debug, Args)]
pub struct MapArgs {
    /// Grid CSV file with 'ecode' and 'data' columns ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Boundary GeoJSON feature collection
    #[arg(short = 'g', long = "geometry")]
    pub geometry: PathBuf,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Geography level used when the codes do not identify one
    #[arg(long, default_value = "district")]
    pub level: RegionLevel,
    /// Boundary year (defaults to the latest configured year)
    #[arg(long)]
    pub year: Option<u16>,
    /// Organisation whose palette colours the map
    #[arg(long = "org", default_value = "MHCLG")]
    pub organisation: String,
    /// Named light palette colour for numeric data
    #[arg(long)]
    pub colour: Option<String>,
    /// Whether categorical levels are ordered or unordered
    #[arg(long = "ordinal", default_value = "unordered")]
    pub order: LevelOrder,
    /// Inset areas to extract (london, shetland)
    #[arg(long = "inset", action = clap::ArgAction::Append)]
    pub insets: Vec<Inset>,
    /// Report identifiers with no boundary instead of failing
    #[arg(long = "allow-unmatched")]
    pub allow_unmatched: bool,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
    /// Boundary code registry YAML replacing the built-in one
    #[arg(long)]
    pub registry: Option<PathBuf>,
    /// Map data YAML replacing the built-in one
    #[arg(long = "map-config")]
    pub map_config: Option<PathBuf>,
    /// Palette YAML replacing the built-in one
    #[arg(long)]
    pub palettes: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct DonutArgs {
    #[command(flatten)]
    pub grid: GridArgs,
    /// Column holding segment labels
    #[arg(long = "label-column", default_value = "label")]
    pub label_column: String,
    /// Organisation whose palette colours the chart
    #[arg(long = "org", default_value = "MHCLG")]
    pub organisation: String,
    /// Colour scheme (light or dark)
    #[arg(long, default_value = "light")]
    pub scheme: Scheme,
    /// Palette YAML replacing the built-in one
    #[arg(long)]
    pub palettes: Option<PathBuf>,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        "pipe" => Ok(b'|'),
        "semicolon" => Ok(b';'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!("Delimiter must be a single ASCII character, got '{value}'")),
            }
        }
    }
}
