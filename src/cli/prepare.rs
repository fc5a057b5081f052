// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Prepare a pulsar's timing model for fitting.

use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use crate::{
    checks::Checks,
    config::TimingConfig,
    cuts::apply_configured_cuts,
    epochs::center_epochs,
    load::load_and_check,
    report::write_model_par,
    TimingkitError,
};

/// Load and check a pulsar's TOAs and timing model, apply the configured
/// cuts, centre the model's epochs on the remaining TOAs and write the model
/// to `<PSR>_PINT_<YYYYMMDD><SUFFIX>.par`.
#[derive(Parser, Debug)]
pub struct PrepareArgs {
    /// Path to the configuration file (yaml, toml or json).
    #[clap(name = "CONFIG", parse(from_os_str))]
    config: PathBuf,

    /// Use (and write) a snapshot of the parsed TOAs next to the manifest.
    #[clap(long)]
    use_snapshot: bool,

    /// Only keep TOAs with a signal-to-noise ratio above this. Overrides
    /// ignore.snr-cut in the configuration.
    #[clap(long)]
    snr_cut: Option<f64>,

    /// Don't move PEPOCH, POSEPOCH and DMEPOCH to the middle of the data.
    #[clap(long)]
    no_center_epochs: bool,

    /// Appended to the output file name, before the extension.
    #[clap(short, long, default_value = "")]
    suffix: String,

    /// The directory to write the prepared model into.
    #[clap(short, long, parse(from_os_str), default_value = ".")]
    output_dir: PathBuf,
}

impl PrepareArgs {
    pub fn run(self) -> Result<(), TimingkitError> {
        let mut config = TimingConfig::from_file(&self.config)?;
        if let Some(snr_cut) = self.snr_cut {
            config.ignore.snr_cut = Some(snr_cut);
        }

        let (toas, mut model) = load_and_check(&config, self.use_snapshot)?;
        let selection = apply_configured_cuts(&toas.select_all(), &config.ignore, true)?;

        if self.no_center_epochs {
            info!("Not centring epochs");
        } else {
            center_epochs(&mut model, &selection)?;
        }

        // The model is only prepared here, not fit, so this is advisory.
        if let Err(e) = Checks::pre_fit().run(&model, &toas) {
            warn!("The prepared model isn't ready to fit: {e}");
        }

        write_model_par(&model, &self.output_dir, &self.suffix)?;
        Ok(())
    }
}
