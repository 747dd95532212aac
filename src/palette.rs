use std::{collections::BTreeMap, fmt, path::Path, str::FromStr};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{config, error::CheckError};

pub const BLACK: Rgb = Rgb([0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "rgb({r},{g},{b})")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedColour {
    pub name: String,
    pub rgb: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Light,
    Dark,
}

impl FromStr for Scheme {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Scheme::Light),
            "dark" => Ok(Scheme::Dark),
            other => Err(anyhow!("Unknown colour scheme '{other}' (expected light or dark)")),
        }
    }
}

/// An organisation's colours. `light` and `dark` are ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub primary: Rgb,
    #[serde(default)]
    pub light: Vec<NamedColour>,
    #[serde(default)]
    pub dark: Vec<NamedColour>,
    #[serde(default)]
    pub pairs_light: BTreeMap<String, Rgb>,
}

impl Theme {
    pub fn scheme(&self, scheme: Scheme) -> &[NamedColour] {
        match scheme {
            Scheme::Light => &self.light,
            Scheme::Dark => &self.dark,
        }
    }

    pub fn light_colour(&self, name: &str) -> Option<Rgb> {
        self.light.iter().find(|c| c.name == name).map(|c| c.rgb)
    }

    /// The selected colour and the colour it is paired with at the low end
    /// of a sequential scale. Unknown or absent selections use `primary`.
    pub fn colour_pair(&self, selected: Option<&str>) -> (Rgb, Rgb) {
        match selected.and_then(|name| self.light_colour(name).map(|rgb| (name, rgb))) {
            Some((name, rgb)) => (rgb, self.pairs_light.get(name).copied().unwrap_or(BLACK)),
            None => (self.primary, BLACK),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteRegistry {
    themes: BTreeMap<String, Theme>,
}

impl PaletteRegistry {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        config::load_or_default(path, config::PALETTES_YAML)
    }

    pub fn theme(&self, organisation: &str) -> Result<&Theme, CheckError> {
        self.themes
            .get(organisation)
            .ok_or_else(|| CheckError::UnknownOrganisation {
                organisation: organisation.to_string(),
                known: self.organisations().map(str::to_string).collect(),
            })
    }

    pub fn organisations(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}
