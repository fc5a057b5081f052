// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Data-preparation helpers for pulsar timing.

The usual flow is: read a [`TimingConfig`], [`load_and_check`] the TOAs and
timing model it describes, narrow the TOAs with [`cuts`], [`center_epochs`]
on what remains, fit (elsewhere), then [`check_fit`] and report on the fit
with [`report`].
 */

pub mod checks;
mod cli;
pub mod config;
pub mod constants;
pub mod cuts;
pub mod epochs;
pub mod fitter;
pub mod load;
pub mod model;
mod printers;
pub mod report;
mod sexagesimal;
pub mod toas;

// Re-exports.
pub use checks::{check_fit, CheckError, Checks};
pub use cli::{Timingkit, TimingkitError};
pub use config::{IgnoreConfig, TimingConfig};
pub use epochs::center_epochs;
pub use fitter::{FitResult, Fitter, ResidualType};
pub use load::{load_and_check, load_and_check_in, write_include_tim};
pub use model::{read_par_file, TimingModel};
pub use toas::{read_tim_file, Toa, ToaSelection, Toas};
