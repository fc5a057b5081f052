// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Times of arrival (TOAs).
//!
//! A [`Toas`] is an ordered, immutable collection of [`Toa`]s along with the
//! ephemeris and clock-correction versions it was loaded for. Narrowing the
//! TOAs never mutates them; instead, a [`ToaSelection`] view is produced (see
//! [`Toas::select_all`]), and every cut on that view produces another view.

mod error;
mod selection;
pub(crate) mod snapshot;
mod tim;
#[cfg(test)]
pub(crate) mod tests;

pub use error::{SelectionError, SnapshotError, TimReadError};
pub use selection::ToaSelection;
pub use tim::read_tim_file;

use std::collections::BTreeSet;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::RECEIVER_FLAG;

/// A single time of arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toa {
    /// Usually the name of the archive the TOA was derived from.
    pub name: String,

    /// Observing frequency \[MHz\]
    pub freq_mhz: f64,

    /// The site arrival time \[MJD, days\]
    pub mjd: f64,

    /// The TOA uncertainty \[microseconds\]
    pub error_us: f64,

    /// The observatory code.
    pub site: String,

    /// `-flag value` pairs, in the order they appeared. The leading dash is
    /// not stored.
    pub flags: IndexMap<String, String>,
}

impl Toa {
    /// Get the value of a flag, if this TOA has it.
    pub fn flag(&self, flag: &str) -> Option<&str> {
        self.flags.get(flag).map(|s| s.as_str())
    }
}

/// An ordered collection of TOAs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toas {
    toas: Vec<Toa>,

    /// The Solar System ephemeris these TOAs are to be processed with.
    pub ephem: String,

    /// The BIPM clock-correction realisation these TOAs are to be processed
    /// with.
    pub bipm: String,

    /// The file these TOAs were read from, if any.
    pub filename: Option<PathBuf>,
}

impl Toas {
    pub fn new(toas: Vec<Toa>, ephem: &str, bipm: &str) -> Toas {
        Toas {
            toas,
            ephem: ephem.to_string(),
            bipm: bipm.to_string(),
            filename: None,
        }
    }

    pub fn len(&self) -> usize {
        self.toas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toas.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Toa> {
        self.toas.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Toa> {
        self.toas.get(index)
    }

    /// Get a view over all of the TOAs.
    pub fn select_all(&self) -> ToaSelection<'_> {
        ToaSelection::new(self)
    }

    /// The distinct observatory codes, sorted.
    pub fn observatories(&self) -> BTreeSet<&str> {
        self.toas.iter().map(|t| t.site.as_str()).collect()
    }

    /// The distinct receivers (`-fe` flag values), sorted. Every TOA must
    /// carry the flag.
    pub fn receivers(&self) -> Result<BTreeSet<String>, SelectionError> {
        self.toas
            .iter()
            .enumerate()
            .map(|(index, toa)| {
                toa.flag(RECEIVER_FLAG)
                    .map(|s| s.to_string())
                    .ok_or_else(|| SelectionError::MissingFlag {
                        flag: RECEIVER_FLAG.to_string(),
                        index,
                        name: toa.name.clone(),
                    })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Toas {
    type Item = &'a Toa;
    type IntoIter = std::slice::Iter<'a, Toa>;

    fn into_iter(self) -> Self::IntoIter {
        self.toas.iter()
    }
}
