// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use crate::{
    checks::CheckError,
    config::ConfigError,
    model::{ModelError, ParReadError},
    toas::{SelectionError, SnapshotError, TimReadError},
};

/// Errors from loading a pulsar's TOAs and timing model.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Couldn't write the TOA manifest {}: {}", .file.display(), .err)]
    Manifest { file: PathBuf, err: std::io::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    TimRead(#[from] TimReadError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    ParRead(#[from] ParReadError),

    #[error("Couldn't convert the timing model to ecliptic coordinates: {0}")]
    Ecliptic(#[from] ModelError),

    #[error("Couldn't determine the receivers: {0}")]
    Receivers(#[from] SelectionError),

    #[error(transparent)]
    Check(#[from] CheckError),
}
