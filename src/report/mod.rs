// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reporting on fits: writing the fitted model, and plotting residuals.

mod error;
#[cfg(feature = "plotting")]
pub mod plot;

#[cfg(feature = "plotting")]
pub use error::PlotError;
pub use error::ReportError;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::info;

use crate::{constants::TOOLKIT_TAG, fitter::Fitter, model::TimingModel};

/// The name of an output par file, e.g. `J1909-3744_PINT_20240131.par`.
pub fn par_file_name(psr: &str, date: chrono::NaiveDate, suffix: &str) -> String {
    format!("{psr}_{TOOLKIT_TAG}_{}{suffix}.par", date.format("%Y%m%d"))
}

/// Write a fitter's model to `<PSR>_PINT_<YYYYMMDD><suffix>.par` in the
/// current directory, overwriting any existing file.
pub fn write_par<F: Fitter + ?Sized>(fitter: &F, suffix: &str) -> Result<PathBuf, ReportError> {
    write_model_par(fitter.model(), Path::new("."), suffix)
}

/// Write a model to `<PSR>_PINT_<YYYYMMDD><suffix>.par` in `dir`, using
/// today's (local) date. Any existing file is overwritten.
pub fn write_model_par(
    model: &TimingModel,
    dir: &Path,
    suffix: &str,
) -> Result<PathBuf, ReportError> {
    let psr = model.psr_name().ok_or(ReportError::NoPsrName)?;
    let today = chrono::Local::now().date_naive();
    let file = dir.join(par_file_name(psr, today, suffix));

    let write_err = |err| ReportError::Write {
        file: file.clone(),
        err,
    };
    let mut out = BufWriter::new(File::create(&file).map_err(write_err)?);
    out.write_all(model.as_parfile().as_bytes())
        .map_err(write_err)?;
    out.flush().map_err(write_err)?;
    info!("Wrote {}", file.display());
    Ok(file)
}
