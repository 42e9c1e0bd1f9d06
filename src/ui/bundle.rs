/// Resource bundle: strings and sprite art keyed by resource name.
///
/// The default bundle is compiled into the binary. A bundle file named in
/// `config.toml` replaces it wholesale; if that file is missing or does
/// not parse, the embedded one is used instead.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;

use crate::domain::asset::{ImageId, StringId};

const EMBEDDED: &str = include_str!("../../assets/hamlet.toml");

#[derive(Deserialize, Debug, Default)]
pub struct Bundle {
    #[serde(default)]
    strings: HashMap<String, String>,
    #[serde(default)]
    images: HashMap<String, ImageArt>,
}

/// Sprite art in screen cells.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ImageArt {
    pub rows: Vec<String>,
    #[serde(default = "default_fg")]
    pub fg: [u8; 3],
    /// Paper colour for opaque draws; the screen colour when absent.
    #[serde(default)]
    pub bg: Option<[u8; 3]>,
}

fn default_fg() -> [u8; 3] { [0, 0, 0] }

impl Bundle {
    pub fn embedded() -> Result<Self> {
        Bundle::parse(EMBEDDED).context("embedded bundle is malformed")
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Use the override file if one is given and readable, else the
    /// embedded bundle.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = override_path {
            match Bundle::read(path) {
                Ok(bundle) => {
                    info!("using bundle {}", path.display());
                    return Ok(bundle);
                }
                Err(e) => warn!("{e:#}; using embedded bundle"),
            }
        }
        Bundle::embedded()
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read bundle {}", path.display()))?;
        Bundle::parse(&text).with_context(|| format!("bundle {} does not parse", path.display()))
    }

    pub fn image(&self, id: ImageId) -> Result<&ImageArt> {
        self.images
            .get(id.key())
            .with_context(|| format!("image {} ({}) not in bundle", id.key(), id.code()))
    }

    pub fn string(&self, id: StringId) -> Result<&str> {
        self.strings
            .get(id.key())
            .map(String::as_str)
            .with_context(|| format!("string {} ({}) not in bundle", id.key(), id.code()))
    }

    /// Resource keys the narrative asks for that this bundle lacks.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let images = ImageId::ALL
            .iter()
            .map(|id| id.key())
            .filter(|k| !self.images.contains_key(*k));
        let strings = StringId::ALL
            .iter()
            .map(|id| id.key())
            .filter(|k| !self.strings.contains_key(*k));
        images.chain(strings).collect()
    }
}
