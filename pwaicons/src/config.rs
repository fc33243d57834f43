use crate::{RasterOptions, TargetSizeSet, ARCHIVE_NAME, ICON_SIZES};
use anyhow::Result;
use iconcommon::{Filter, ZipFileOptions};
use serde::Deserialize;
use std::path::Path;

/// Icon generation settings, usually read from a yaml file:
///
/// ```yaml
/// sizes: [72, 96, 128, 144, 152, 192, 384, 512]
/// filter: lanczos3
/// shadow: false
/// compression: stored
/// archive-name: icons.zip
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct IconConfig {
    pub sizes: Vec<u32>,
    pub filter: Filter,
    pub shadow: bool,
    pub optimize: bool,
    pub compression: ZipFileOptions,
    pub archive_name: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sizes: ICON_SIZES.to_vec(),
            filter: Filter::default(),
            shadow: true,
            optimize: true,
            compression: ZipFileOptions::default(),
            archive_name: ARCHIVE_NAME.to_string(),
        }
    }
}

impl IconConfig {
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            return Ok(Default::default());
        }
        let contents = std::fs::read_to_string(path.as_ref())?;
        contents.parse()
    }

    pub fn target_sizes(&self) -> Result<TargetSizeSet> {
        TargetSizeSet::new(self.sizes.clone())
    }

    pub fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            filter: self.filter,
            shadow: self.shadow,
            optimize: self.optimize,
        }
    }
}

impl std::str::FromStr for IconConfig {
    type Err = anyhow::Error;

    fn from_str(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Default::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}
