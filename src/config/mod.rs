// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The configuration record that drives loading and cutting.
//!
//! Configuration files may be YAML, TOML or JSON; the type is determined by
//! the file extension. Keys are kebab-case, e.g.
//!
//! ```yaml
//! source: J1909-3744
//! tim-directory: ./tim/
//! toas: [a.tim, b.tim]
//! par-directory: ./par/
//! timing-model: J1909-3744.par
//! ephem: DE440
//! bipm: BIPM2021
//! ignore:
//!   mjd-start: 55000
//!   snr-cut: 8
//! ```

mod error;

pub use error::ConfigError;

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
pub(crate) enum ConfigFileType {
    #[strum(serialize = "yaml", serialize = "yml")]
    Yaml,

    #[strum(serialize = "toml")]
    Toml,

    #[strum(serialize = "json")]
    Json,
}

lazy_static::lazy_static! {
    pub(crate) static ref CONFIG_FILE_TYPES_COMMA_SEPARATED: String = ConfigFileType::iter().join(", ");
}

/// Settings for a pulsar's data preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimingConfig {
    /// The pulsar name, e.g. "J1909-3744". Also names the manifest file.
    pub source: String,

    /// The directory containing the TOA files.
    pub tim_directory: PathBuf,

    /// TOA file names, relative to `tim_directory`.
    pub toas: Vec<PathBuf>,

    /// The directory containing the timing model.
    pub par_directory: PathBuf,

    /// The timing model file name, relative to `par_directory`.
    pub timing_model: PathBuf,

    /// The solar-system ephemeris, e.g. "DE440".
    pub ephem: String,

    /// The BIPM clock-correction version, e.g. "BIPM2021".
    pub bipm: String,

    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Which TOAs to ignore.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IgnoreConfig {
    /// Ignore TOAs before this MJD.
    pub mjd_start: Option<f64>,

    /// Ignore TOAs after this MJD.
    pub mjd_end: Option<f64>,

    /// Ignore TOAs with a signal-to-noise ratio at or below this.
    pub snr_cut: Option<f64>,
}

impl TimingConfig {
    /// Read a configuration file, using its extension to determine its type.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<TimingConfig, ConfigError> {
        let file = file.as_ref();
        debug!("Attempting to parse configuration file {}", file.display());

        let file_type = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ConfigFileType::from_str(&e).ok())
            .ok_or_else(|| ConfigError::UnknownFileType(file.to_path_buf()))?;

        let mut contents = String::new();
        File::open(file)?.read_to_string(&mut contents)?;
        let config = TimingConfig::from_str_with_type(&contents, file_type).map_err(|(kind, err)| {
            ConfigError::Decode {
                file: file.to_path_buf(),
                kind,
                err,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    fn from_str_with_type(
        contents: &str,
        file_type: ConfigFileType,
    ) -> Result<TimingConfig, (&'static str, String)> {
        debug!("Parsing {file_type} file...");
        match file_type {
            ConfigFileType::Yaml => serde_yaml::from_str(contents).map_err(|e| ("yaml", e.to_string())),
            ConfigFileType::Toml => toml::from_str(contents).map_err(|e| ("toml", e.to_string())),
            ConfigFileType::Json => {
                serde_json::from_str(contents).map_err(|e| ("json", e.to_string()))
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.toas.is_empty() {
            return Err(ConfigError::NoToaFiles);
        }
        if let (Some(start), Some(end)) = (self.ignore.mjd_start, self.ignore.mjd_end) {
            if start > end {
                return Err(ConfigError::BackwardsWindow { start, end });
            }
        }
        Ok(())
    }

    /// The TOA file paths, in the order they were listed.
    pub fn toa_paths(&self) -> Vec<PathBuf> {
        self.toas
            .iter()
            .map(|name| self.tim_directory.join(name))
            .collect()
    }

    /// The timing model path.
    pub fn par_path(&self) -> PathBuf {
        self.par_directory.join(&self.timing_model)
    }
}
