// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all timingkit-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

#[cfg(feature = "plotting")]
use crate::report::PlotError;
use crate::{
    checks::CheckError,
    config::ConfigError,
    cuts::CutError,
    epochs::EpochError,
    fitter::FitResultError,
    load::LoadError,
    model::{ModelError, ParReadError},
    report::ReportError,
    toas::{SelectionError, SnapshotError, TimReadError},
};

/// The *only* publicly visible error from timingkit. Each error message
/// should include a hint, unless it's "generic".
#[derive(Error, Debug)]
pub enum TimingkitError {
    /// An error related to configuration files.
    #[error("{0}\n\nConfiguration files need the keys source, tim-directory, toas, par-directory, timing-model, ephem and bipm")]
    Config(String),

    /// An error related to tim files.
    #[error("{0}\n\nTOA files must be in tempo2 format (FORMAT 1)")]
    TimFile(String),

    /// An error related to par files.
    #[error("{0}")]
    ParFile(String),

    /// A check on the data or model failed.
    #[error("{0}\n\nFix the timing model or TOAs and try again")]
    Check(String),

    /// An error related to selecting TOAs.
    #[error("{0}\n\nTry adjusting the cuts in the configuration's ignore section")]
    Cut(String),

    /// An error related to centring epochs.
    #[error("{0}\n\nUse --no-center-epochs to leave the epochs alone")]
    Epoch(String),

    /// An error related to writing output files or plots.
    #[error("{0}")]
    Report(String),

    /// A generic error that can't be clarified further with a hint, e.g. IO
    /// errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<ConfigError> for TimingkitError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::IO(e) => Self::from(e),
            _ => Self::Config(e.to_string()),
        }
    }
}

impl From<LoadError> for TimingkitError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Config(e) => Self::from(e),
            LoadError::TimRead(e) => Self::from(e),
            LoadError::ParRead(e) => Self::from(e),
            LoadError::Snapshot(e) => Self::from(e),
            LoadError::Check(e) => Self::from(e),
            LoadError::Ecliptic(e) => Self::from(e),
            LoadError::Receivers(e) => Self::Check(e.to_string()),
            LoadError::Manifest { .. } => Self::Generic(e.to_string()),
        }
    }
}

impl From<TimReadError> for TimingkitError {
    fn from(e: TimReadError) -> Self {
        match e {
            TimReadError::IO(e) => Self::from(e),
            _ => Self::TimFile(e.to_string()),
        }
    }
}

impl From<ParReadError> for TimingkitError {
    fn from(e: ParReadError) -> Self {
        match e {
            ParReadError::IO(e) => Self::from(e),
            _ => Self::ParFile(e.to_string()),
        }
    }
}

impl From<ModelError> for TimingkitError {
    fn from(e: ModelError) -> Self {
        Self::ParFile(e.to_string())
    }
}

impl From<SnapshotError> for TimingkitError {
    fn from(e: SnapshotError) -> Self {
        let s = e.to_string();
        match e {
            SnapshotError::Decode { .. } => {
                Self::Generic(format!("{s}\n\nTry deleting the snapshot, or run without --use-snapshot"))
            }
            SnapshotError::Encode(_) | SnapshotError::IO(_) => Self::Generic(s),
        }
    }
}

impl From<CheckError> for TimingkitError {
    fn from(e: CheckError) -> Self {
        Self::Check(e.to_string())
    }
}

impl From<SelectionError> for TimingkitError {
    fn from(e: SelectionError) -> Self {
        Self::Cut(e.to_string())
    }
}

impl From<CutError> for TimingkitError {
    fn from(e: CutError) -> Self {
        Self::Cut(e.to_string())
    }
}

impl From<EpochError> for TimingkitError {
    fn from(e: EpochError) -> Self {
        match e {
            EpochError::Model(e) => Self::from(e),
            _ => Self::Epoch(e.to_string()),
        }
    }
}

impl From<FitResultError> for TimingkitError {
    fn from(e: FitResultError) -> Self {
        Self::Report(e.to_string())
    }
}

impl From<ReportError> for TimingkitError {
    fn from(e: ReportError) -> Self {
        Self::Report(e.to_string())
    }
}

#[cfg(feature = "plotting")]
impl From<PlotError> for TimingkitError {
    fn from(e: PlotError) -> Self {
        Self::Report(e.to_string())
    }
}

impl From<std::io::Error> for TimingkitError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
