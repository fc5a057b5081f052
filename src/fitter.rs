// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The interface to whatever fits timing models.
//!
//! Fitting itself happens elsewhere; this crate only inspects the results,
//! to check that a model is ready to be fit and to report on a fit.

use std::str::FromStr;

use strum_macros::Display;
use thiserror::Error;

use crate::{model::TimingModel, toas::ToaSelection};

/// Which residuals to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ResidualType {
    #[strum(serialize = "Pre")]
    Prefit,

    #[strum(serialize = "Post")]
    Postfit,
}

impl FromStr for ResidualType {
    type Err = InvalidResidualType;

    /// Anything mentioning "pre" (e.g. "prefit", "Pre-fit") is
    /// [`ResidualType::Prefit`], and likewise for "post".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match (lower.contains("pre"), lower.contains("post")) {
            (true, false) => Ok(ResidualType::Prefit),
            (false, true) => Ok(ResidualType::Postfit),
            _ => Err(InvalidResidualType(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid residual type '{0}'; expected something like 'prefit' or 'postfit'")]
pub struct InvalidResidualType(pub String);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FitResultError {
    #[error("Got {got} {kind}-fit residuals, but the fit used {expected} TOAs")]
    ResidualCount {
        kind: ResidualType,
        expected: usize,
        got: usize,
    },
}

/// The results of a fit.
pub trait Fitter {
    /// The (fitted) timing model.
    fn model(&self) -> &TimingModel;

    /// The TOAs used in the fit.
    fn toas(&self) -> &ToaSelection<'_>;

    /// Time residuals \[seconds\], one per TOA in [`Fitter::toas`], in the
    /// same order.
    fn residuals(&self, kind: ResidualType) -> &[f64];
}

/// Fit results computed elsewhere.
#[derive(Debug, Clone)]
pub struct FitResult<'a> {
    model: TimingModel,
    toas: ToaSelection<'a>,
    prefit_residuals: Vec<f64>,
    postfit_residuals: Vec<f64>,
}

impl<'a> FitResult<'a> {
    /// Residuals are in seconds. Each residual vector must have one element
    /// per selected TOA.
    pub fn new(
        model: TimingModel,
        toas: ToaSelection<'a>,
        prefit_residuals: Vec<f64>,
        postfit_residuals: Vec<f64>,
    ) -> Result<FitResult<'a>, FitResultError> {
        for (kind, residuals) in [
            (ResidualType::Prefit, &prefit_residuals),
            (ResidualType::Postfit, &postfit_residuals),
        ] {
            if residuals.len() != toas.len() {
                return Err(FitResultError::ResidualCount {
                    kind,
                    expected: toas.len(),
                    got: residuals.len(),
                });
            }
        }

        Ok(FitResult {
            model,
            toas,
            prefit_residuals,
            postfit_residuals,
        })
    }

    pub fn into_model(self) -> TimingModel {
        self.model
    }
}

impl Fitter for FitResult<'_> {
    fn model(&self) -> &TimingModel {
        &self.model
    }

    fn toas(&self) -> &ToaSelection<'_> {
        &self.toas
    }

    fn residuals(&self, kind: ResidualType) -> &[f64] {
        match kind {
            ResidualType::Prefit => &self.prefit_residuals,
            ResidualType::Postfit => &self.postfit_residuals,
        }
    }
}
