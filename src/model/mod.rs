// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pulsar timing models, as read from and written to par files.
//!
//! Parameter values are kept as the strings they were read as, so that
//! untouched parameters are written back out with all of their precision.
//! Only parameters that are changed (e.g. epochs being centred) are
//! reformatted, and increments to spin and DM terms are added in decimal
//! arithmetic (see [`Param::add_f64`]).

mod astrometry;
mod error;
mod par;

pub use astrometry::Astrometry;
pub use error::{ModelError, ParReadError};
pub use par::{parse_par, read_par_file};

use std::{collections::BTreeSet, str::FromStr};

use bigdecimal::BigDecimal;

use crate::constants::RECEIVER_FLAG;

/// The number of significant digits that a shortest round-tripping `f64`
/// can need.
const F64_SIGNIFICANT_DIGITS: u64 = 17;

/// Parameters that may appear many times, distinguished by a key (e.g.
/// `JUMP -fe Rcvr1_2 ...`).
pub(crate) const MASK_PARAMS: &[&str] = &[
    "JUMP", "EFAC", "EQUAD", "T2EFAC", "T2EQUAD", "ECORR", "DMJUMP", "DMEFAC", "DMEQUAD",
];

/// A single timing-model parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Upper-case parameter name, e.g. "F0".
    pub name: String,

    /// The selection key of a mask parameter, e.g. `["-fe", "Rcvr1_2"]` or
    /// `["MJD", "55000", "56000"]`. Empty for ordinary parameters.
    pub key: Vec<String>,

    /// The value, as written in the par file.
    pub value: String,

    /// Is the parameter free to be fit?
    pub free: bool,

    /// The uncertainty, as written in the par file.
    pub uncertainty: Option<String>,
}

impl Param {
    pub fn new(name: &str, value: &str) -> Param {
        Param {
            name: name.to_uppercase(),
            key: vec![],
            value: value.to_string(),
            free: false,
            uncertainty: None,
        }
    }

    /// Parse the value as a float. Fortran-style exponents (e.g. "1.2D-15")
    /// are handled.
    pub fn value_f64(&self) -> Result<f64, ModelError> {
        parse_par_float(&self.value).ok_or_else(|| ModelError::ParseFloat {
            name: self.name.clone(),
            value: self.value.clone(),
        })
    }

    /// Replace the value with a float.
    pub fn set_value_f64(&mut self, value: f64) {
        self.value = format_par_float(value);
    }

    /// Add `increment` to the value in decimal arithmetic. The result keeps
    /// as many significant digits as the value had (at least as many as an
    /// `f64` has), so a value given beyond `f64` precision keeps its digits.
    pub fn add_f64(&mut self, increment: f64) -> Result<(), ModelError> {
        if increment == 0.0 {
            return Ok(());
        }
        let value = BigDecimal::from_str(&self.value.replace(['D', 'd'], "e")).map_err(|_| {
            ModelError::ParseFloat {
                name: self.name.clone(),
                value: self.value.clone(),
            }
        })?;
        let increment = BigDecimal::from_str(&format!("{increment:e}")).map_err(|_| {
            ModelError::ParseFloat {
                name: self.name.clone(),
                value: increment.to_string(),
            }
        })?;
        let digits = value.digits().max(F64_SIGNIFICANT_DIGITS);
        let sum = (value + increment).with_prec(digits);
        self.value = trim_decimal_zeros(sum.to_string());
        Ok(())
    }
}

/// Drop trailing zeros after a decimal point ("1.2500" -> "1.25", "3.0" ->
/// "3"). Strings with an exponent are returned unchanged.
fn trim_decimal_zeros(mut s: String) -> String {
    if s.contains('.') && !s.contains(['e', 'E']) {
        let len = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(len);
    }
    s
}

pub(crate) fn parse_par_float(s: &str) -> Option<f64> {
    s.replace(['D', 'd'], "e").parse().ok()
}

/// Format a float such that it round-trips exactly, using an exponent for
/// small magnitudes (e.g. spin-frequency derivatives).
pub(crate) fn format_par_float(value: f64) -> String {
    if value != 0.0 && value.abs() < 1e-4 {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}

/// A pulsar timing model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimingModel {
    params: Vec<Param>,
}

impl TimingModel {
    /// Build a model from parameters. Fails if the parameters describe both
    /// equatorial and ecliptic astrometry.
    pub fn from_params(params: Vec<Param>) -> Result<TimingModel, ModelError> {
        let model = TimingModel { params };
        model.check_astrometry_exclusive()?;
        Ok(model)
    }

    pub(crate) fn check_astrometry_exclusive(&self) -> Result<(), ModelError> {
        let has = |names: &[&str]| names.iter().any(|n| self.get(n).is_some());
        if has(&["RAJ", "DECJ", "PMRA", "PMDEC"]) && has(&["ELONG", "ELAT", "PMELONG", "PMELAT"]) {
            return Err(ModelError::BothAstrometry);
        }
        Ok(())
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Get an ordinary (unkeyed) parameter.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params
            .iter()
            .find(|p| p.key.is_empty() && p.name.eq_ignore_ascii_case(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Param> {
        self.params
            .iter_mut()
            .find(|p| p.key.is_empty() && p.name.eq_ignore_ascii_case(name))
    }

    /// Get a parameter that must exist.
    pub fn require(&self, name: &str) -> Result<&Param, ModelError> {
        self.get(name)
            .ok_or_else(|| ModelError::MissingParam(name.to_uppercase()))
    }

    pub fn require_mut(&mut self, name: &str) -> Result<&mut Param, ModelError> {
        self.get_mut(name)
            .ok_or_else(|| ModelError::MissingParam(name.to_uppercase()))
    }

    /// Get the value of an ordinary parameter as a float, if it exists.
    pub fn value_f64(&self, name: &str) -> Result<Option<f64>, ModelError> {
        self.get(name).map(|p| p.value_f64()).transpose()
    }

    /// Add a parameter to the end of the model, or replace the value of an
    /// existing ordinary parameter of the same name.
    pub fn set(&mut self, param: Param) {
        if param.key.is_empty() {
            if let Some(existing) = self.get_mut(&param.name) {
                *existing = param;
                return;
            }
        }
        self.params.push(param);
    }

    /// Remove an ordinary parameter, returning it if it existed.
    pub fn remove(&mut self, name: &str) -> Option<Param> {
        let index = self
            .params
            .iter()
            .position(|p| p.key.is_empty() && p.name.eq_ignore_ascii_case(name))?;
        Some(self.params.remove(index))
    }

    /// The name of the pulsar (the PSR parameter).
    pub fn psr_name(&self) -> Option<&str> {
        self.get("PSR").map(|p| p.value.as_str())
    }

    /// Which astrometry this model uses.
    pub fn astrometry(&self) -> Astrometry {
        if self.get("ELONG").is_some() || self.get("ELAT").is_some() {
            Astrometry::Ecliptic
        } else if self.get("RAJ").is_some() || self.get("DECJ").is_some() {
            Astrometry::Equatorial
        } else {
            Astrometry::None
        }
    }

    /// All JUMP parameters.
    pub fn jumps(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| p.name == "JUMP")
    }

    /// The receivers that have a `JUMP -fe <receiver>` parameter.
    pub fn jumped_receivers(&self) -> BTreeSet<&str> {
        let fe_key = format!("-{RECEIVER_FLAG}");
        self.jumps()
            .filter(|p| p.key.len() == 2 && p.key[0] == fe_key)
            .map(|p| p.key[1].as_str())
            .collect()
    }

    /// Spin frequency and its derivatives (F0, F1, ...), in order, up to the
    /// first missing one.
    pub(crate) fn spin_param_names(&self) -> Vec<String> {
        (0..)
            .map(|i| format!("F{i}"))
            .take_while(|n| self.get(n).is_some())
            .collect()
    }

    /// DM and its derivatives (DM, DM1, DM2, ...), in order, up to the first
    /// missing one.
    pub(crate) fn dm_param_names(&self) -> Vec<String> {
        std::iter::once("DM".to_string())
            .chain((1..).map(|i| format!("DM{i}")))
            .take_while(|n| self.get(n).is_some())
            .collect()
    }
}
