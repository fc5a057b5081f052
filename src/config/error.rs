// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use super::CONFIG_FILE_TYPES_COMMA_SEPARATED;

/// Errors associated with reading configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file {} has an unrecognised extension; supported types: {}", .0.display(), *CONFIG_FILE_TYPES_COMMA_SEPARATED)]
    UnknownFileType(PathBuf),

    #[error("Couldn't decode {kind} structure from {}:\n{err}", .file.display())]
    Decode {
        file: PathBuf,
        kind: &'static str,
        err: String,
    },

    #[error("The configuration lists no TOA files")]
    NoToaFiles,

    #[error("ignore.mjd-start ({start}) is after ignore.mjd-end ({end})")]
    BackwardsWindow { start: f64, end: f64 },

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}
