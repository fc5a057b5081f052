// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use itertools::Itertools;
use thiserror::Error;
use vec1::Vec1;

use crate::toas::SelectionError;

/// A check that didn't pass.
#[derive(Error, Debug, PartialEq)]
pub enum CheckError {
    #[error("Check '{check}' failed: expected {expected}, found {found}")]
    Mismatch {
        check: &'static str,
        expected: String,
        found: String,
    },

    #[error("Check '{check}' failed: the timing model has no {param} parameter")]
    MissingParam { check: &'static str, param: String },

    #[error("Check '{check}' failed: parameter {param} is frozen, but it should be free")]
    FrozenParam { check: &'static str, param: String },

    #[error("Check 'jumps' failed: expected JUMP -fe parameters for all but one receiver, but these receivers have none: {}", .missing.iter().join(", "))]
    MissingJumps { missing: Vec1<String> },

    #[error("Check '{check}' failed: {err}")]
    Selection {
        check: &'static str,
        err: SelectionError,
    },
}

impl CheckError {
    /// The name of the check that failed.
    pub fn check(&self) -> &'static str {
        match self {
            CheckError::Mismatch { check, .. }
            | CheckError::MissingParam { check, .. }
            | CheckError::FrozenParam { check, .. }
            | CheckError::Selection { check, .. } => check,
            CheckError::MissingJumps { .. } => "jumps",
        }
    }
}
