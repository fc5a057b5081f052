// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Load a pulsar's data and run the load-time checks.

use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use log::info;

use crate::{
    checks::Checks, config::TimingConfig, load::load_and_check, TimingkitError,
};

/// Load TOAs and a timing model as described by a configuration file, and run
/// the load-time checks on them. The TOA manifest is written into the current
/// directory.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the configuration file (yaml, toml or json).
    #[clap(name = "CONFIG", parse(from_os_str))]
    config: PathBuf,

    /// Use (and write) a snapshot of the parsed TOAs next to the manifest.
    #[clap(long)]
    use_snapshot: bool,
}

impl CheckArgs {
    pub fn run(self) -> Result<(), TimingkitError> {
        let config = TimingConfig::from_file(&self.config)?;
        let (toas, model) = load_and_check(&config, self.use_snapshot)?;
        toas.select_all().print_summary();
        info!(
            "{}: passed checks {}",
            model.psr_name().unwrap_or(&config.source),
            Checks::load_time().names().join(", ")
        );
        Ok(())
    }
}
