// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Validation of timing models and TOAs.
//!
//! Each check is a plain function over a [`TimingModel`] and [`Toas`] that
//! either passes or returns a [`CheckError`] describing what was expected
//! and what was found. Checks are collected into a [`Checks`] registry; the
//! built-in registries are [`Checks::load_time`] (run as soon as the data
//! and model are loaded) and [`Checks::pre_fit`] (run once a fitter exists,
//! because they look at which parameters are free).

mod error;

pub use error::CheckError;

use log::{debug, warn};
use regex::Regex;
use vec1::Vec1;

use crate::{
    constants::{LATEST_BIPM, LATEST_EPHEM},
    fitter::Fitter,
    model::{Astrometry, TimingModel},
    toas::Toas,
};

lazy_static::lazy_static! {
    static ref PSR_NAME_REGEX: Regex = Regex::new(r"^[BJ]\d{4}[+-]\d{2}(\d{2})?[A-Za-z]?$").unwrap();
}

/// The signature of a check.
pub type CheckFn = fn(&TimingModel, &Toas) -> Result<(), CheckError>;

/// A named check.
#[derive(Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    pub run: CheckFn,
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check").field("name", &self.name).finish()
    }
}

/// An ordered collection of checks.
#[derive(Debug, Clone, Default)]
pub struct Checks {
    checks: Vec<Check>,
}

impl Checks {
    pub fn new() -> Checks {
        Checks::default()
    }

    /// Checks that only need the loaded data and model: ephemeris, clock,
    /// name and jumps.
    pub fn load_time() -> Checks {
        let mut checks = Checks::new();
        checks.push("ephemeris", check_ephemeris);
        checks.push("clock", check_clock);
        checks.checks.extend(Checks::model_consistency().checks);
        checks
    }

    /// The load-time checks that need a model: name and jumps.
    pub fn model_consistency() -> Checks {
        let mut checks = Checks::new();
        checks.push("name", check_name);
        checks.push("jumps", check_jumps);
        checks
    }

    /// Checks that a model is ready to be fit: spin and astrometry.
    pub fn pre_fit() -> Checks {
        let mut checks = Checks::new();
        checks.push("spin", check_spin);
        checks.push("astrometry", check_astrometry);
        checks
    }

    /// Add a check to the end of the registry.
    pub fn push(&mut self, name: &'static str, run: CheckFn) -> &mut Checks {
        self.checks.push(Check { name, run });
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|c| c.name)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run all checks in order, stopping at the first failure.
    pub fn run(&self, model: &TimingModel, toas: &Toas) -> Result<(), CheckError> {
        for check in &self.checks {
            (check.run)(model, toas)?;
            debug!("Check '{}' passed", check.name);
        }
        Ok(())
    }
}

/// Run the pre-fit checks on a fitter's model and TOAs.
pub fn check_fit<F: Fitter + ?Sized>(fitter: &F) -> Result<(), CheckError> {
    Checks::pre_fit().run(fitter.model(), fitter.toas().toas())
}

fn check_version(check: &'static str, expected: &str, found: &str) -> Result<(), CheckError> {
    if found.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(CheckError::Mismatch {
            check,
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }
}

/// The TOA-only load-time checks (ephemeris and clock). Unlike the other
/// checks these don't need a model, so they can fail before one is read.
pub fn check_toa_versions(toas: &Toas) -> Result<(), CheckError> {
    check_version("ephemeris", LATEST_EPHEM, &toas.ephem)?;
    check_version("clock", LATEST_BIPM, &toas.bipm)
}

/// The TOAs must be processed with the latest Solar System ephemeris.
pub fn check_ephemeris(_: &TimingModel, toas: &Toas) -> Result<(), CheckError> {
    check_version("ephemeris", LATEST_EPHEM, &toas.ephem)
}

/// The TOAs must be processed with the latest BIPM clock corrections.
pub fn check_clock(_: &TimingModel, toas: &Toas) -> Result<(), CheckError> {
    check_version("clock", LATEST_BIPM, &toas.bipm)
}

/// The pulsar name must follow the B/J naming convention, e.g. J1909-3744 or
/// B1937+21.
pub fn check_name(model: &TimingModel, _: &Toas) -> Result<(), CheckError> {
    let name = model.psr_name().ok_or_else(|| CheckError::MissingParam {
        check: "name",
        param: "PSR".to_string(),
    })?;
    if PSR_NAME_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(CheckError::Mismatch {
            check: "name",
            expected: "a name like J1234+5678 or B1234+56".to_string(),
            found: name.to_string(),
        })
    }
}

/// Every receiver except one (the reference) must have a `JUMP -fe`
/// parameter.
pub fn check_jumps(model: &TimingModel, toas: &Toas) -> Result<(), CheckError> {
    let receivers = toas
        .receivers()
        .map_err(|err| CheckError::Selection { check: "jumps", err })?;
    let jumped = model.jumped_receivers();
    let missing: Vec<String> = receivers
        .iter()
        .filter(|r| !jumped.contains(r.as_str()))
        .cloned()
        .collect();

    match Vec1::try_from_vec(missing) {
        // Every receiver is jumped, so there's no reference receiver.
        Err(_) => {
            if !receivers.is_empty() {
                warn!("Every receiver has a JUMP; one receiver is normally left as the reference");
            }
            Ok(())
        }
        Ok(missing) if missing.len() == 1 => {
            debug!("Reference receiver: {}", missing.first());
            Ok(())
        }
        Ok(missing) => Err(CheckError::MissingJumps { missing }),
    }
}

fn require_free(check: &'static str, model: &TimingModel, name: &str) -> Result<(), CheckError> {
    match model.get(name) {
        None => Err(CheckError::MissingParam {
            check,
            param: name.to_string(),
        }),
        Some(p) if !p.free => Err(CheckError::FrozenParam {
            check,
            param: p.name.clone(),
        }),
        Some(_) => Ok(()),
    }
}

/// F0 and F1 must be free.
pub fn check_spin(model: &TimingModel, _: &Toas) -> Result<(), CheckError> {
    for name in ["F0", "F1"] {
        require_free("spin", model, name)?;
    }
    Ok(())
}

/// Position and proper motion must be free, as must parallax if the model
/// has it.
pub fn check_astrometry(model: &TimingModel, _: &Toas) -> Result<(), CheckError> {
    let names = match model.astrometry() {
        Astrometry::Ecliptic => ["ELONG", "ELAT", "PMELONG", "PMELAT"],
        Astrometry::Equatorial => ["RAJ", "DECJ", "PMRA", "PMDEC"],
        Astrometry::None => {
            return Err(CheckError::Mismatch {
                check: "astrometry",
                expected: "equatorial or ecliptic astrometry".to_string(),
                found: "no position parameters".to_string(),
            })
        }
    };
    for name in names {
        require_free("astrometry", model, name)?;
    }
    if model.get("PX").is_some() {
        require_free("astrometry", model, "PX")?;
    }
    Ok(())
}
