//! Value column inspection: the inferred scalar type and the distinct levels.

use std::{collections::HashSet, fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::rows::DataRow;

/// Tokens that mark a missing value, compared upper-cased and trimmed.
pub const MISSING_TOKENS: &[&str] = &["NA", "N/A", "N.A", "NAN", "-", "."];

// Fixed literals; compilation cannot fail at run time.
static INTEGER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("valid integer pattern"));
static FLOAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]*(\.[0-9]+)?$").expect("valid float pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferredType {
    Integer,
    Float,
    String,
}

impl InferredType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferredType::Integer => "integer",
            InferredType::Float => "float",
            InferredType::String => "string",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, InferredType::Integer | InferredType::Float)
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_missing_token(value: &str) -> bool {
    let normalized = value.trim().to_uppercase();
    MISSING_TOKENS.contains(&normalized.as_str())
}

pub fn is_integer_literal(value: &str) -> bool {
    INTEGER_PATTERN.is_match(value.trim())
}

pub fn is_float_literal(value: &str) -> bool {
    FLOAT_PATTERN.is_match(value.trim())
}

/// Infers the type of the `data` column of `rows`.
///
/// Missing-value tokens are skipped. Blank cells never rule out a numeric
/// type. A column with nothing but missing tokens is a string column.
pub fn infer_value_type(rows: &[DataRow]) -> InferredType {
    let mut all_missing = true;
    let mut all_integer = true;
    let mut all_float = true;

    for row in rows {
        let value = row.data().trim().to_uppercase();
        if MISSING_TOKENS.contains(&value.as_str()) {
            continue;
        }
        all_missing = false;
        if value.is_empty() || is_integer_literal(&value) {
            continue;
        }
        all_integer = false;
        if !is_float_literal(&value) {
            all_float = false;
            break;
        }
    }

    if all_missing {
        InferredType::String
    } else if all_integer {
        InferredType::Integer
    } else if all_float {
        InferredType::Float
    } else {
        InferredType::String
    }
}

/// Distinct non-blank trimmed `data` values, in the order first seen.
pub fn extract_uniques(rows: &[DataRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut uniques = Vec::new();
    for row in rows {
        let value = row.data().trim();
        if !value.is_empty() && seen.insert(value) {
            uniques.push(value.to_string());
        }
    }
    uniques
}

/// Smallest and largest `data` value that parses as a finite number.
pub fn value_range(rows: &[DataRow]) -> Option<(f64, f64)> {
    rows.iter()
        .filter_map(|row| row.data().trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}
