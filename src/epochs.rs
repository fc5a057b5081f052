// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Moving a timing model's reference epochs to the middle of its data.
//!
//! When an epoch moves, the quantities defined at that epoch move with it:
//! spin frequency and derivatives for PEPOCH, position for POSEPOCH (along
//! the proper motion) and DM and derivatives for DMEPOCH.

use log::{debug, info};
use thiserror::Error;

use crate::{
    constants::{DAYSEC, DAYS_PER_JULIAN_YEAR, MAS_TO_DEG},
    model::{Astrometry, ModelError, TimingModel},
    sexagesimal::{
        degrees_to_dms_colon, degrees_to_hms_colon, dms_colon_str_to_degrees,
        hms_colon_str_to_degrees,
    },
    toas::ToaSelection,
};

#[derive(Error, Debug, PartialEq)]
pub enum EpochError {
    #[error("The timing model has no {0}, so it can't be centred")]
    MissingEpoch(&'static str),

    #[error("No TOAs are selected, so there's no MJD span to centre epochs on")]
    EmptySelection,

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Set PEPOCH (and POSEPOCH and DMEPOCH, if the model has them) to the
/// midpoint of the selected TOAs' MJD span. PEPOCH must exist; the other
/// epochs are never added.
pub fn center_epochs<'m>(
    model: &'m mut TimingModel,
    selection: &ToaSelection,
) -> Result<&'m mut TimingModel, EpochError> {
    let (min, max) = selection.mjd_span().ok_or(EpochError::EmptySelection)?;
    let mid = (max + min) / 2.0;
    info!("Centring epochs on MJD {mid} (TOAs span {min} to {max})");

    let old = model
        .value_f64("PEPOCH")?
        .ok_or(EpochError::MissingEpoch("PEPOCH"))?;
    let spin_names = model.spin_param_names();
    propagate_taylor(model, &spin_names, (mid - old) * DAYSEC)?;
    model.require_mut("PEPOCH")?.set_value_f64(mid);

    if let Some(old) = model.value_f64("POSEPOCH")? {
        propagate_position(model, (mid - old) / DAYS_PER_JULIAN_YEAR)?;
        model.require_mut("POSEPOCH")?.set_value_f64(mid);
    }

    if let Some(old) = model.value_f64("DMEPOCH")? {
        let dm_names = model.dm_param_names();
        propagate_taylor(model, &dm_names, (mid - old) / DAYS_PER_JULIAN_YEAR)?;
        model.require_mut("DMEPOCH")?.set_value_f64(mid);
    }

    Ok(model)
}

/// Evaluate a Taylor series (x, x', x'', ...) `dt` away from its reference,
/// and replace the coefficients with the new ones. Only the change to each
/// coefficient is computed as a float; it's added to the value as written, so
/// digits beyond `f64` precision aren't lost.
fn propagate_taylor(model: &mut TimingModel, names: &[String], dt: f64) -> Result<(), ModelError> {
    if dt == 0.0 || names.is_empty() {
        return Ok(());
    }
    let coeffs = names
        .iter()
        .map(|n| model.require(n).and_then(|p| p.value_f64()))
        .collect::<Result<Vec<_>, _>>()?;
    for (k, name) in names.iter().enumerate() {
        let mut term = 1.0;
        let mut increment = 0.0;
        for (j, c) in coeffs.iter().enumerate().skip(k + 1) {
            term *= dt / (j - k) as f64;
            increment += c * term;
        }
        let param = model.require_mut(name)?;
        param.add_f64(increment)?;
        debug!("{name}: {} -> {}", coeffs[k], param.value);
    }
    Ok(())
}

/// Move the position along the proper motion by `dt_yr` years.
fn propagate_position(model: &mut TimingModel, dt_yr: f64) -> Result<(), ModelError> {
    if dt_yr == 0.0 {
        return Ok(());
    }
    match model.astrometry() {
        Astrometry::Ecliptic => {
            let lon = model.require("ELONG")?.value_f64()?;
            let lat = model.require("ELAT")?.value_f64()?;
            let pm_lon = model.value_f64("PMELONG")?.unwrap_or(0.0);
            let pm_lat = model.value_f64("PMELAT")?.unwrap_or(0.0);
            let (lon, lat) = move_along_proper_motion(lon, lat, pm_lon, pm_lat, dt_yr);
            model.require_mut("ELONG")?.set_value_f64(lon);
            model.require_mut("ELAT")?.set_value_f64(lat);
        }
        Astrometry::Equatorial => {
            let ra_param = model.require("RAJ")?;
            let ra = hms_colon_str_to_degrees(&ra_param.value)
                .map_err(|e| ModelError::sexagesimal("RAJ", e))?;
            let dec_param = model.require("DECJ")?;
            let dec = dms_colon_str_to_degrees(&dec_param.value)
                .map_err(|e| ModelError::sexagesimal("DECJ", e))?;
            let pm_ra = model.value_f64("PMRA")?.unwrap_or(0.0);
            let pm_dec = model.value_f64("PMDEC")?.unwrap_or(0.0);
            let (ra, dec) = move_along_proper_motion(ra, dec, pm_ra, pm_dec, dt_yr);
            model.require_mut("RAJ")?.value = degrees_to_hms_colon(ra);
            model.require_mut("DECJ")?.value = degrees_to_dms_colon(dec);
        }
        Astrometry::None => (),
    }
    Ok(())
}

/// `pm_lon` includes the cos(lat) factor. Angles in degrees, proper motions
/// in mas/yr.
fn move_along_proper_motion(lon: f64, lat: f64, pm_lon: f64, pm_lat: f64, dt_yr: f64) -> (f64, f64) {
    let d_lat = pm_lat * dt_yr * MAS_TO_DEG;
    let d_lon = pm_lon * dt_yr * MAS_TO_DEG / lat.to_radians().cos();
    ((lon + d_lon).rem_euclid(360.0), lat + d_lat)
}
