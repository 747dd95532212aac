use std::collections::HashMap;

use serde::Serialize;

use crate::{
    error::CheckError,
    palette::{Rgb, Scheme, Theme},
    rows::DataRow,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSegment {
    pub label: String,
    pub value: f64,
    pub colour: Rgb,
    /// Share of the total, 0–100.
    pub percent: f64,
}

impl DonutSegment {
    /// Legend text, e.g. `Housing (42.0%)`.
    pub fn legend(&self) -> String {
        format!("{} ({:.1}%)", self.label, self.percent)
    }
}

/// Labelled numeric values from non-blank rows. Rows whose value is not a
/// finite number are dropped.
pub fn chart_values(rows: &[DataRow], label_field: &str) -> Vec<(String, f64)> {
    rows.iter()
        .filter(|row| !row.is_blank())
        .filter_map(|row| {
            let value = row.data().trim().parse::<f64>().ok()?;
            value.is_finite().then(|| (row.get(label_field).trim().to_string(), value))
        })
        .collect()
}

pub fn build_donut(
    rows: &[DataRow],
    label_field: &str,
    theme: &Theme,
    scheme: Scheme,
) -> Result<Vec<DonutSegment>, CheckError> {
    let values = chart_values(rows, label_field);
    if values.is_empty() {
        return Err(CheckError::NoChartData);
    }
    let negatives = values
        .iter()
        .filter(|(_, value)| *value < 0.0)
        .cloned()
        .collect::<Vec<_>>();
    if !negatives.is_empty() {
        return Err(CheckError::NegativeValues(negatives));
    }

    let colours = theme.scheme(scheme);
    if colours.is_empty() {
        return Err(CheckError::UnknownPalette(format!("{scheme:?} colours")));
    }
    let total: f64 = values.iter().map(|(_, value)| value).sum();
    if !total.is_finite() {
        return Err(CheckError::ChartTotalOverflow);
    }
    let mut assigned: HashMap<String, Rgb> = HashMap::new();
    let segments = values
        .into_iter()
        .map(|(label, value)| {
            let next = assigned.len();
            let colour = *assigned
                .entry(label.clone())
                .or_insert_with(|| colours[next % colours.len()].rgb);
            let percent = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            DonutSegment {
                label,
                value,
                colour,
                percent,
            }
        })
        .collect();
    Ok(segments)
}
