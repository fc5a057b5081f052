// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Immutable views over [`Toas`].

use std::collections::BTreeSet;

use hifitime::Epoch;
use itertools::Itertools;
use log::trace;

use super::{SelectionError, Toa, Toas};
use crate::printers::InfoPrinter;

/// A view over a subset of [`Toas`]. The mask always has the same length as
/// the underlying TOAs; `true` means the TOA is active.
///
/// Every narrowing method returns a new view whose mask is the logical AND of
/// this view's mask and the new predicate, so cuts compose without any
/// "unselect" step and the underlying TOAs are never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct ToaSelection<'a> {
    toas: &'a Toas,
    mask: Vec<bool>,
}

impl<'a> ToaSelection<'a> {
    pub(super) fn new(toas: &'a Toas) -> ToaSelection<'a> {
        ToaSelection {
            toas,
            mask: vec![true; toas.len()],
        }
    }

    /// The TOAs underlying this view, including inactive ones.
    pub fn toas(&self) -> &'a Toas {
        self.toas
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// The number of active TOAs.
    pub fn len(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.mask.iter().any(|&m| m)
    }

    /// Are all TOAs active?
    pub fn is_unrestricted(&self) -> bool {
        self.mask.iter().all(|&m| m)
    }

    /// The indices (into the underlying TOAs) of the active TOAs.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, &m)| m)
            .map(|(i, _)| i)
    }

    /// The active TOAs, in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Toa> + '_ {
        let toas = self.toas;
        toas.iter()
            .zip(self.mask.iter())
            .filter(|(_, &m)| m)
            .map(|(t, _)| t)
    }

    /// The MJDs of the active TOAs.
    pub fn mjds(&self) -> Vec<f64> {
        self.iter().map(|t| t.mjd).collect()
    }

    /// The uncertainties of the active TOAs \[microseconds\].
    pub fn errors_us(&self) -> Vec<f64> {
        self.iter().map(|t| t.error_us).collect()
    }

    /// The smallest and largest MJD of the active TOAs, or `None` if the
    /// selection is empty.
    pub fn mjd_span(&self) -> Option<(f64, f64)> {
        self.iter().map(|t| t.mjd).minmax().into_option()
    }

    /// The distinct observatory codes among the active TOAs, sorted.
    pub fn observatories(&self) -> BTreeSet<&'a str> {
        self.iter().map(|t| t.site.as_str()).collect()
    }

    /// Narrow this view by an explicit mask over *all* of the underlying TOAs.
    pub fn select(&self, mask: &[bool]) -> Result<ToaSelection<'a>, SelectionError> {
        if mask.len() != self.mask.len() {
            return Err(SelectionError::MaskLength {
                expected: self.mask.len(),
                got: mask.len(),
            });
        }
        Ok(self.and(mask.iter().copied()))
    }

    /// Narrow this view with a predicate. Only active TOAs are tested.
    pub fn filter<F: Fn(&Toa) -> bool>(&self, predicate: F) -> ToaSelection<'a> {
        let new_mask = self
            .toas
            .iter()
            .zip(self.mask.iter())
            .map(|(t, &m)| m && predicate(t))
            .collect();
        ToaSelection {
            toas: self.toas,
            mask: new_mask,
        }
    }

    /// Keep only TOAs from the given observatory.
    pub fn site(&self, site: &str) -> ToaSelection<'a> {
        self.filter(|t| t.site == site)
    }

    /// Keep only TOAs whose `flag` parses to a number strictly greater than
    /// `threshold`. Every active TOA must have the flag, and it must be
    /// numeric.
    pub fn flag_above(&self, flag: &str, threshold: f64) -> Result<ToaSelection<'a>, SelectionError> {
        let mut new_mask = Vec::with_capacity(self.mask.len());
        for (index, (toa, &active)) in self.toas.iter().zip(self.mask.iter()).enumerate() {
            if !active {
                new_mask.push(false);
                continue;
            }
            let value = toa.flag(flag).ok_or_else(|| SelectionError::MissingFlag {
                flag: flag.to_string(),
                index,
                name: toa.name.clone(),
            })?;
            let value: f64 = value.parse().map_err(|_| SelectionError::ParseFlag {
                flag: flag.to_string(),
                index,
                value: value.to_string(),
            })?;
            new_mask.push(value > threshold);
        }
        Ok(ToaSelection {
            toas: self.toas,
            mask: new_mask,
        })
    }

    /// Keep only TOAs within `[start, end]` (MJD, inclusive). A missing bound
    /// imposes no restriction on that side.
    ///
    /// The lower and upper masks are computed independently over all TOAs and
    /// combined with this view's mask, so an existing cut is never discarded.
    pub fn mjd_window(&self, start: Option<f64>, end: Option<f64>) -> ToaSelection<'a> {
        let select_min: Vec<bool> = match start {
            Some(start) => self.toas.iter().map(|t| t.mjd >= start).collect(),
            None => vec![true; self.toas.len()],
        };
        let select_max: Vec<bool> = match end {
            Some(end) => self.toas.iter().map(|t| t.mjd <= end).collect(),
            None => vec![true; self.toas.len()],
        };
        trace!("MJD window {start:?} to {end:?}");
        self.and(select_min.into_iter().zip(select_max).map(|(a, b)| a && b))
    }

    fn and<I: Iterator<Item = bool>>(&self, other: I) -> ToaSelection<'a> {
        ToaSelection {
            toas: self.toas,
            mask: self.mask.iter().zip(other).map(|(&a, b)| a && b).collect(),
        }
    }

    /// Collect summary statistics for the active TOAs.
    pub fn summary(&self) -> ToaSummary {
        let sites = self
            .observatories()
            .into_iter()
            .map(|site| {
                let view = self.site(site);
                let (freq_min, freq_max) = view
                    .iter()
                    .map(|t| t.freq_mhz)
                    .minmax()
                    .into_option()
                    .unwrap_or((f64::NAN, f64::NAN));
                let mut errors = view.errors_us();
                errors.sort_unstable_by(|a, b| a.total_cmp(b));
                SiteSummary {
                    site: site.to_string(),
                    num_toas: errors.len(),
                    freq_min_mhz: freq_min,
                    freq_max_mhz: freq_max,
                    median_error_us: median_of_sorted(&errors),
                }
            })
            .collect();

        ToaSummary {
            num_toas: self.len(),
            num_total: self.toas.len(),
            mjd_span: self.mjd_span(),
            sites,
        }
    }

    /// Log a tabular summary of the active TOAs.
    pub fn print_summary(&self) {
        self.summary().printer().display();
    }
}

fn median_of_sorted(values: &[f64]) -> f64 {
    match values.len() {
        0 => f64::NAN,
        n if n % 2 == 1 => values[n / 2],
        n => (values[n / 2 - 1] + values[n / 2]) / 2.0,
    }
}

/// Statistics for the active TOAs of a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ToaSummary {
    pub num_toas: usize,
    pub num_total: usize,
    pub mjd_span: Option<(f64, f64)>,
    pub sites: Vec<SiteSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteSummary {
    pub site: String,
    pub num_toas: usize,
    pub freq_min_mhz: f64,
    pub freq_max_mhz: f64,
    pub median_error_us: f64,
}

impl ToaSummary {
    pub(crate) fn printer(&self) -> InfoPrinter {
        let mut printer = InfoPrinter::new("TOA summary".into());
        printer.push_line(format!("Number of TOAs: {} (of {})", self.num_toas, self.num_total).into());
        if let Some((min, max)) = self.mjd_span {
            printer.push_block(vec![
                format!("MJD span: {min:.3} to {max:.3}").into(),
                format!(
                    "Date span: {} to {}",
                    Epoch::from_mjd_utc(min),
                    Epoch::from_mjd_utc(max)
                )
                .into(),
            ]);
        }
        for site in &self.sites {
            printer.push_block(vec![
                format!("{} TOAs ({})", site.site, site.num_toas).into(),
                format!(
                    "Frequency range: {:.3} to {:.3} MHz",
                    site.freq_min_mhz, site.freq_max_mhz
                )
                .into(),
                format!("Median error: {:.3} us", site.median_error_us).into(),
            ]);
        }
        printer
    }
}
