//! Colour-scale selection for a value column.
//!
//! Numeric columns get a sequential scale over their range. Categorical
//! columns get a discrete scale when the palette has a colour for every
//! level. Interpolating between colours is left to the renderer; a scale
//! here only names its endpoints and stops.

use std::str::FromStr;

use anyhow::anyhow;
use log::debug;
use serde::Serialize;

use crate::{
    datatype::{InferredType, extract_uniques, infer_value_type, value_range},
    error::CheckError,
    palette::{Rgb, Theme},
    rows::DataRow,
};

/// Whether categorical levels carry an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelOrder {
    #[default]
    Unordered,
    Ordered,
}

impl FromStr for LevelOrder {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unordered" => Ok(LevelOrder::Unordered),
            "ordered" => Ok(LevelOrder::Ordered),
            other => Err(anyhow!("Unknown ordinal setting '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColourScale {
    /// Continuous scale from `from` at `domain.0` to `to` at `domain.1`.
    Sequential {
        value_type: InferredType,
        domain: Option<(f64, f64)>,
        from: Rgb,
        to: Rgb,
    },
    /// Each level takes the palette colour at the same position.
    Ordinal { levels: Vec<String>, colours: Vec<Rgb> },
    /// Level `i` sits at `stops[i]` between `from` and `to`.
    Graded {
        levels: Vec<String>,
        from: Rgb,
        to: Rgb,
        stops: Vec<f64>,
    },
}

impl ColourScale {
    pub fn value_type(&self) -> InferredType {
        match self {
            ColourScale::Sequential { value_type, .. } => *value_type,
            _ => InferredType::String,
        }
    }
}

pub fn choose_scale(
    rows: &[DataRow],
    theme: &Theme,
    selected_colour: Option<&str>,
    order: LevelOrder,
) -> Result<ColourScale, CheckError> {
    let (to, from) = theme.colour_pair(selected_colour);
    let value_type = infer_value_type(rows);
    debug!("Value column inferred as {value_type}");
    if value_type.is_numeric() {
        return Ok(ColourScale::Sequential {
            value_type,
            domain: value_range(rows),
            from,
            to,
        });
    }

    let levels = extract_uniques(rows);
    let limit = theme.light.len();
    if levels.len() > limit {
        return Err(CheckError::TooManyCategories { limit, levels });
    }
    let scale = match order {
        LevelOrder::Unordered => ColourScale::Ordinal {
            colours: theme.light.iter().take(levels.len()).map(|c| c.rgb).collect(),
            levels,
        },
        LevelOrder::Ordered => {
            let count = levels.len() as f64;
            let stops = (0..levels.len())
                .map(|i| (i as f64 + 1.0) / (count + 1.0))
                .collect();
            ColourScale::Graded {
                levels,
                from,
                to,
                stops,
            }
        }
    };
    Ok(scale)
}
