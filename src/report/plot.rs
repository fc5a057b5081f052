// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Plotting timing residuals.

use std::str::FromStr;

use itertools::Itertools;
use log::{debug, trace};
use plotters::{coord::Shift, prelude::*};

use super::PlotError;
use crate::fitter::{Fitter, ResidualType};

/// Fraction of the data range added to each side of the axes.
const AXIS_PADDING: f64 = 0.05;

/// Plot a fitter's residuals, one error-bar series per observatory, onto
/// `area`. `residual_type` is anything like "prefit" or "postfit"; anything
/// else is rejected before drawing starts.
///
/// The caller owns `area`, and should `present()` it afterwards.
pub fn plot_residuals<DB: DrawingBackend, F: Fitter + ?Sized>(
    area: &DrawingArea<DB, Shift>,
    fitter: &F,
    residual_type: &str,
) -> Result<(), PlotError> {
    let kind = ResidualType::from_str(residual_type)?;
    let selection = fitter.toas();
    let residuals = fitter.residuals(kind);

    // Residuals are aligned with the selection's active TOAs; index them by
    // TOA so that narrower views can find theirs.
    let mut residual_us = vec![None; selection.toas().len()];
    for (index, res) in selection.indices().zip(residuals) {
        residual_us[index] = Some(res * 1e6);
    }

    let (mjd_min, mjd_max) = selection.mjd_span().ok_or(PlotError::NoToas)?;
    let (res_min, res_max) = selection
        .iter()
        .zip(residuals)
        .flat_map(|(toa, res)| [res * 1e6 - toa.error_us, res * 1e6 + toa.error_us])
        .minmax()
        .into_option()
        .ok_or(PlotError::NoToas)?;
    let x_range = padded(mjd_min, mjd_max);
    let y_range = padded(res_min, res_max);
    trace!("Plot ranges: {x_range:?}, {y_range:?}");

    let psr = fitter.model().psr_name().unwrap_or("Unknown pulsar");
    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("{psr} {kind}-Fit Timing Residuals"),
            ("sans-serif", 30),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(|e| PlotError::Plotters(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("MJD")
        .y_desc("Residual (us)")
        .draw()
        .map_err(|e| PlotError::Plotters(e.to_string()))?;

    for (i, site) in selection.observatories().into_iter().enumerate() {
        let view = selection.site(site);
        debug!("Plotting {} TOAs from {site}", view.len());
        let colour = Palette99::pick(i).to_rgba();
        let bars = view.indices().filter_map(|index| {
            let toa = selection.toas().get(index)?;
            let res = residual_us[index]?;
            Some(ErrorBar::new_vertical(
                toa.mjd,
                res - toa.error_us,
                res,
                res + toa.error_us,
                colour.filled(),
                4,
            ))
        });
        chart
            .draw_series(bars)
            .map_err(|e| PlotError::Plotters(e.to_string()))?
            .label(site)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| PlotError::Plotters(e.to_string()))?;

    Ok(())
}

/// Pad a range so that nothing sits on the plot edges; a zero-width range is
/// given some width.
fn padded(min: f64, max: f64) -> (f64, f64) {
    let pad = if max > min {
        (max - min) * AXIS_PADDING
    } else {
        1.0
    };
    (min - pad, max + pad)
}
