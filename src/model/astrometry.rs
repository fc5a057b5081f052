// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Astrometric parameters, and conversion from equatorial to ecliptic
//! coordinates.

use log::debug;

use super::{ModelError, Param, TimingModel};
use crate::{
    constants::{ECLIPTIC_CONVENTION, OBLIQUITY_IERS2010_ARCSEC},
    sexagesimal::{dms_colon_str_to_degrees, hms_colon_str_to_degrees},
};

/// The coordinate frame of a model's astrometric parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Astrometry {
    /// RAJ, DECJ, PMRA, PMDEC.
    Equatorial,

    /// ELONG, ELAT, PMELONG, PMELAT.
    Ecliptic,

    /// No position at all.
    None,
}

type Vec3 = [f64; 3];

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Rotate a vector from the equatorial frame into the ecliptic frame.
fn equatorial_to_ecliptic(v: Vec3, obliquity: f64) -> Vec3 {
    let (s, c) = obliquity.sin_cos();
    [v[0], c * v[1] + s * v[2], -s * v[1] + c * v[2]]
}

/// Unit vectors in the directions of increasing longitude and latitude at a
/// position (both angles in radians).
fn tangent_basis(lon: f64, lat: f64) -> (Vec3, Vec3) {
    let (s_lon, c_lon) = lon.sin_cos();
    let (s_lat, c_lat) = lat.sin_cos();
    (
        [-s_lon, c_lon, 0.0],
        [-s_lat * c_lon, -s_lat * s_lon, c_lat],
    )
}

/// Convert a position and proper motion from equatorial to ecliptic
/// coordinates.
///
/// `ra` and `dec` are in degrees; `pm_ra` (which includes the cos(dec)
/// factor) and `pm_dec` are in any consistent unit, and the results are in
/// the same unit. Returns (elong, elat, pm_elong, pm_elat).
pub(crate) fn convert_position(
    ra: f64,
    dec: f64,
    pm_ra: f64,
    pm_dec: f64,
    obliquity: f64,
) -> (f64, f64, f64, f64) {
    let (ra, dec) = (ra.to_radians(), dec.to_radians());
    let (s_ra, c_ra) = ra.sin_cos();
    let (s_dec, c_dec) = dec.sin_cos();
    let r = equatorial_to_ecliptic([c_dec * c_ra, c_dec * s_ra, s_dec], obliquity);
    let elong = r[1].atan2(r[0]);
    let elat = r[2].clamp(-1.0, 1.0).asin();

    let (e_ra, e_dec) = tangent_basis(ra, dec);
    let v = [
        pm_ra * e_ra[0] + pm_dec * e_dec[0],
        pm_ra * e_ra[1] + pm_dec * e_dec[1],
        pm_ra * e_ra[2] + pm_dec * e_dec[2],
    ];
    let v = equatorial_to_ecliptic(v, obliquity);
    let (e_lon, e_lat) = tangent_basis(elong, elat);

    (
        elong.to_degrees().rem_euclid(360.0),
        elat.to_degrees(),
        dot(v, e_lon),
        dot(v, e_lat),
    )
}

impl TimingModel {
    /// Convert equatorial astrometry to ecliptic astrometry in place, using
    /// the IERS2010 obliquity. The fit flags of the equatorial parameters are
    /// carried over; their uncertainties are not. Models without equatorial
    /// astrometry are untouched.
    ///
    /// Returns whether a conversion happened.
    pub fn convert_to_ecliptic(&mut self) -> Result<bool, ModelError> {
        if self.astrometry() != Astrometry::Equatorial {
            return Ok(false);
        }

        let ra_param = self.require("RAJ")?;
        let ra = hms_colon_str_to_degrees(&ra_param.value)
            .map_err(|e| ModelError::sexagesimal("RAJ", e))?;
        let dec_param = self.require("DECJ")?;
        let dec = dms_colon_str_to_degrees(&dec_param.value)
            .map_err(|e| ModelError::sexagesimal("DECJ", e))?;
        let pm_ra = self.value_f64("PMRA")?;
        let pm_dec = self.value_f64("PMDEC")?;

        let obliquity = (OBLIQUITY_IERS2010_ARCSEC / 3600.0).to_radians();
        let (elong, elat, pm_elong, pm_elat) = convert_position(
            ra,
            dec,
            pm_ra.unwrap_or(0.0),
            pm_dec.unwrap_or(0.0),
            obliquity,
        );
        debug!("Converted RAJ/DECJ {ra}/{dec} to ELONG/ELAT {elong}/{elat}");

        self.rename_with_value("RAJ", "ELONG", elong);
        self.rename_with_value("DECJ", "ELAT", elat);
        // Only convert proper motions that were actually in the model.
        if pm_ra.is_some() || pm_dec.is_some() {
            if pm_ra.is_none() {
                self.set(Param::new("PMRA", "0"));
            }
            if pm_dec.is_none() {
                self.set(Param::new("PMDEC", "0"));
            }
            self.rename_with_value("PMRA", "PMELONG", pm_elong);
            self.rename_with_value("PMDEC", "PMELAT", pm_elat);
        }

        // Put the convention right before ELONG.
        self.remove("ECL");
        let index = self
            .params
            .iter()
            .position(|p| p.name == "ELONG")
            .unwrap_or(self.params.len());
        self.params
            .insert(index, Param::new("ECL", ECLIPTIC_CONVENTION));

        Ok(true)
    }

    /// Rename an ordinary parameter in place (keeping its position and fit
    /// flag) and give it a new value.
    fn rename_with_value(&mut self, old: &str, new: &str, value: f64) {
        if let Some(p) = self.get_mut(old) {
            p.name = new.to_string();
            p.set_value_f64(value);
            p.uncertainty = None;
        }
    }
}
