//! YAML loading for the reference data documents.
//!
//! The boundary-code registry, the map-data table and the palette registry
//! all ship as YAML under `resources/` and are embedded at compile time.
//! Each can be replaced by a file on disk so the reference data can be
//! refreshed without touching the classification logic.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const BOUNDARY_CODES_YAML: &str = include_str!("../resources/boundary_codes.yaml");
pub const MAP_DATA_YAML: &str = include_str!("../resources/map_data.yaml");
pub const PALETTES_YAML: &str = include_str!("../resources/palettes.yaml");

fn read_to_string(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("Opening YAML file {path:?}"))?;
    let mut buf = String::new();
    file.read_to_string(&mut buf)
        .with_context(|| format!("Reading YAML file {path:?}"))?;
    Ok(buf)
}

pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    Ok(serde_yaml::from_str(input)?)
}

pub fn load_from_path<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = read_to_string(path)?;
    from_str(&raw).with_context(|| format!("Parsing YAML file {path:?}"))
}

/// Loads `path` when given, otherwise parses the embedded default.
pub fn load_or_default<T: DeserializeOwned>(path: Option<&Path>, embedded: &str) -> Result<T> {
    match path {
        Some(path) => load_from_path(path),
        None => from_str(embedded).context("Parsing embedded reference data"),
    }
}

pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}
