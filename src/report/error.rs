// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[cfg(feature = "plotting")]
use crate::fitter::InvalidResidualType;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("The timing model has no PSR parameter, so an output file name can't be made")]
    NoPsrName,

    #[error("Couldn't write {}: {}", .file.display(), .err)]
    Write { file: PathBuf, err: std::io::Error },
}

#[cfg(feature = "plotting")]
#[derive(Error, Debug)]
pub enum PlotError {
    #[error(transparent)]
    InvalidResidualType(#[from] InvalidResidualType),

    #[error("There are no TOAs to plot")]
    NoToas,

    #[error("Error from the plotters library: {0}")]
    Plotters(String),
}
