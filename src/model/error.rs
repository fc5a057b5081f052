// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use crate::sexagesimal::SexagesimalError;

/// Errors associated with reading par files.
#[derive(Error, Debug)]
pub enum ParReadError {
    #[error("{}:{}: Parameter {} has no value", .file.display(), .line_num, .name)]
    MissingValue {
        file: PathBuf,
        line_num: u32,
        name: String,
    },

    #[error("{}:{}: The {} key of {} is incomplete", .file.display(), .line_num, .key, .name)]
    IncompleteKey {
        file: PathBuf,
        line_num: u32,
        name: String,
        key: String,
    },

    #[error("{}:{}: Parameter {} is specified more than once", .file.display(), .line_num, .name)]
    Duplicate {
        file: PathBuf,
        line_num: u32,
        name: String,
    },

    #[error("{}: {}", .file.display(), .err)]
    Model { file: PathBuf, err: ModelError },

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

/// Errors associated with the contents of a timing model.
#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("The timing model has no {0} parameter")]
    MissingParam(String),

    #[error("Parameter {name} has value '{value}', which couldn't be parsed as a number")]
    ParseFloat { name: String, value: String },

    #[error("The timing model has both equatorial (RAJ/DECJ) and ecliptic (ELONG/ELAT) astrometry; only one is allowed")]
    BothAstrometry,

    #[error("Parameter {name}: {err}")]
    Sexagesimal { name: String, err: String },
}

impl ModelError {
    pub(crate) fn sexagesimal(name: &str, err: SexagesimalError) -> ModelError {
        ModelError::Sexagesimal {
            name: name.to_string(),
            err: err.to_string(),
        }
    }
}
