// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Data-quality cuts.
//!
//! Each cut takes a [`ToaSelection`] and returns a narrower one; the input
//! view (and the TOAs behind it) are left alone.

use log::info;
use thiserror::Error;

use crate::{
    config::IgnoreConfig,
    constants::SNR_FLAG,
    toas::{SelectionError, ToaSelection},
};

#[derive(Error, Debug, PartialEq)]
pub enum CutError {
    #[error("Couldn't apply the signal-to-noise cut: {0}")]
    Snr(#[from] SelectionError),
}

/// Keep only TOAs with a signal-to-noise ratio (the `-snr` flag) strictly
/// above `threshold`. Fails if any active TOA doesn't have a numeric `-snr`
/// flag.
pub fn apply_snr_cut<'a>(
    selection: &ToaSelection<'a>,
    threshold: f64,
    summary: bool,
) -> Result<ToaSelection<'a>, CutError> {
    let cut = selection.flag_above(SNR_FLAG, threshold)?;
    info!(
        "Signal-to-noise cut at {threshold}: {} of {} TOAs remain",
        cut.len(),
        selection.len()
    );
    if summary {
        cut.print_summary();
    }
    Ok(cut)
}

/// Keep only TOAs within the configured MJD window (inclusive at both ends).
/// Missing bounds impose no restriction.
pub fn apply_mjd_cut<'a>(
    selection: &ToaSelection<'a>,
    ignore: &IgnoreConfig,
    summary: bool,
) -> ToaSelection<'a> {
    let cut = selection.mjd_window(ignore.mjd_start, ignore.mjd_end);
    info!(
        "MJD cut ({} to {}): {} of {} TOAs remain",
        ignore
            .mjd_start
            .map(|m| m.to_string())
            .unwrap_or_else(|| "start".to_string()),
        ignore
            .mjd_end
            .map(|m| m.to_string())
            .unwrap_or_else(|| "end".to_string()),
        cut.len(),
        selection.len()
    );
    if summary {
        cut.print_summary();
    }
    cut
}

/// Apply every cut in the configuration: the MJD window, then the
/// signal-to-noise cut if one is given.
pub fn apply_configured_cuts<'a>(
    selection: &ToaSelection<'a>,
    ignore: &IgnoreConfig,
    summary: bool,
) -> Result<ToaSelection<'a>, CutError> {
    let cut = apply_mjd_cut(selection, ignore, false);
    let cut = match ignore.snr_cut {
        Some(threshold) => apply_snr_cut(&cut, threshold, false)?,
        None => cut,
    };
    if summary {
        cut.print_summary();
    }
    Ok(cut)
}
