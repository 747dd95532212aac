//! The choropleth pipeline: grid rows plus boundary geometry in, a render
//! plan out.
//!
//! Order matters: duplicate keys are rejected before the lookup is built,
//! the geography level is settled before the geometry attributes are looked
//! up, and the colour scale is chosen before any feature is matched.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::{
    cli::MapArgs,
    datatype::InferredType,
    error::CheckError,
    geometry::{FeatureCollection, Inset, inset_features, reconcile},
    io_utils,
    map_config::{MapConfig, MapDataAttributes},
    palette::{PaletteRegistry, Theme},
    region::{RegionLevel, resolve_data_level},
    registry::BoundaryRegistry,
    rows::{DATA_FIELD, DataRow, ECODE_FIELD, build_data_lookup, check_duplicates, read_grid},
    scale::{ColourScale, LevelOrder, choose_scale},
};

#[derive(Debug, Clone)]
pub struct MapOptions<'a> {
    pub level: RegionLevel,
    pub year: u16,
    pub theme: &'a Theme,
    pub colour: Option<&'a str>,
    pub order: LevelOrder,
    pub insets: &'a [Inset],
    pub allow_unmatched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPlan {
    pub level: RegionLevel,
    pub year: u16,
    pub attributes: MapDataAttributes,
    pub value_type: InferredType,
    pub scale: ColourScale,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub unmatched: BTreeSet<String>,
    pub features: FeatureCollection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub london: Option<FeatureCollection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shetland: Option<FeatureCollection>,
}

/// Resolves the level and geometry attributes for `rows` without touching
/// any geometry.
pub fn plan_attributes(
    rows: &[DataRow],
    registry: &BoundaryRegistry,
    config: &MapConfig,
    chosen: RegionLevel,
    year: u16,
) -> Result<(RegionLevel, MapDataAttributes), CheckError> {
    check_duplicates(rows, ECODE_FIELD)?;
    let lookup = build_data_lookup(rows, ECODE_FIELD);
    let level = resolve_data_level(&lookup, registry, chosen)?;
    let attributes = config.attributes(level, year)?;
    Ok((level, attributes))
}

pub fn build_map_plan(
    rows: &[DataRow],
    geometry: &FeatureCollection,
    registry: &BoundaryRegistry,
    config: &MapConfig,
    options: &MapOptions<'_>,
) -> Result<MapPlan, CheckError> {
    let (level, attributes) = plan_attributes(rows, registry, config, options.level, options.year)?;
    let scale = choose_scale(rows, options.theme, options.colour, options.order)?;
    let lookup = build_data_lookup(rows, ECODE_FIELD);
    let reconciliation = reconcile(geometry, &lookup, &attributes.id_field);

    let (features, unmatched) = if options.allow_unmatched {
        for key in &reconciliation.unmatched {
            warn!("No {level} boundary for '{key}'");
        }
        (reconciliation.features, reconciliation.unmatched)
    } else {
        (reconciliation.require_all_matched()?, BTreeSet::new())
    };

    let london = options
        .insets
        .contains(&Inset::London)
        .then(|| inset_features(&features, &attributes, Inset::London));
    let shetland = options
        .insets
        .contains(&Inset::Shetland)
        .then(|| inset_features(&features, &attributes, Inset::Shetland));

    Ok(MapPlan {
        level,
        year: options.year,
        attributes,
        value_type: scale.value_type(),
        scale,
        unmatched,
        features,
        london,
        shetland,
    })
}

pub fn execute(args: &MapArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let registry = BoundaryRegistry::load(args.registry.as_deref())?;
    let config = MapConfig::load(args.map_config.as_deref())?;
    let palettes = PaletteRegistry::load(args.palettes.as_deref())?;
    let theme = palettes.theme(&args.organisation)?;

    let rows = read_grid(&args.input, delimiter, encoding, &[ECODE_FIELD, DATA_FIELD])?;
    info!(
        "Mapping {} row(s) from '{}' against {:?}",
        rows.len(),
        args.input.display(),
        args.geometry
    );
    let geometry: FeatureCollection = io_utils::read_json(&args.geometry)
        .with_context(|| format!("Loading boundary geometry from {:?}", args.geometry))?;

    let year = config.resolve_year(args.level, args.year)?;
    let options = MapOptions {
        level: args.level,
        year,
        theme,
        colour: args.colour.as_deref(),
        order: args.order,
        insets: &args.insets,
        allow_unmatched: args.allow_unmatched,
    };
    let plan = build_map_plan(&rows, &geometry, &registry, &config, &options)?;
    info!(
        "{} of {} {} boundary feature(s) carry data ({} values, {})",
        plan.features.matched_count(),
        plan.features.len(),
        plan.level,
        plan.value_type,
        plan.attributes.file
    );
    io_utils::write_json(args.output.as_deref(), &plan, args.pretty)
}
