// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Loading a pulsar's TOAs and timing model, as described by a
//! [`TimingConfig`].
//!
//! All of the configured TOA files are merged by writing a manifest,
//! `<source>.tim`, that INCLUDEs each of them. The manifest is left on disk.

mod error;
#[cfg(test)]
mod tests;

pub use error::LoadError;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    checks::{check_toa_versions, Checks},
    config::TimingConfig,
    model::{read_par_file, TimingModel},
    toas::{
        read_tim_file,
        snapshot::{read_snapshot, snapshot_path, write_snapshot},
        Toas,
    },
};

/// Write `<source>.tim` in the current directory, INCLUDEing each of
/// `paths` in order. Returns the manifest path.
pub fn write_include_tim<P: AsRef<Path>>(source: &str, paths: &[P]) -> Result<PathBuf, LoadError> {
    write_include_tim_in(Path::new("."), source, paths)
}

/// Write `<source>.tim` in `dir`, INCLUDEing each of `paths` in order. Any
/// existing file is overwritten. Returns the manifest path.
pub fn write_include_tim_in<P: AsRef<Path>>(
    dir: &Path,
    source: &str,
    paths: &[P],
) -> Result<PathBuf, LoadError> {
    let file = dir.join(format!("{source}.tim"));
    let manifest_err = |err| LoadError::Manifest {
        file: file.clone(),
        err,
    };

    let mut out = BufWriter::new(File::create(&file).map_err(manifest_err)?);
    for path in paths {
        writeln!(out, "INCLUDE {}", path.as_ref().display()).map_err(manifest_err)?;
    }
    out.flush().map_err(manifest_err)?;
    debug!("Wrote manifest {} with {} INCLUDEs", file.display(), paths.len());
    Ok(file)
}

/// Load and check TOAs and a timing model, writing the manifest in the
/// current directory. See [`load_and_check_in`].
pub fn load_and_check(
    config: &TimingConfig,
    use_snapshot: bool,
) -> Result<(Toas, TimingModel), LoadError> {
    load_and_check_in(config, use_snapshot, Path::new("."))
}

/// Load TOAs and a timing model and run the load-time checks on them. The
/// TOAs' ephemeris and clock are checked before the model is read. An
/// equatorial model is converted to ecliptic coordinates.
///
/// If `use_snapshot` is true, a snapshot of the parsed TOAs next to the
/// manifest is used if it was made with the same ephemeris and clock
/// corrections, and is (re)written otherwise.
pub fn load_and_check_in(
    config: &TimingConfig,
    use_snapshot: bool,
    work_dir: &Path,
) -> Result<(Toas, TimingModel), LoadError> {
    config.validate()?;

    let manifest = write_include_tim_in(work_dir, &config.source, &config.toa_paths())?;
    let toas = if use_snapshot {
        load_toas_with_snapshot(&manifest, config)?
    } else {
        read_tim_file(&manifest, &config.ephem, &config.bipm)?
    };
    info!("Loaded {} TOAs from {}", toas.len(), manifest.display());
    check_toa_versions(&toas)?;

    let receivers = toas.receivers()?;
    debug!("Receivers: {receivers:?}");

    let mut model = read_par_file(config.par_path())?;
    if model.convert_to_ecliptic()? {
        info!("Converted the timing model to ecliptic coordinates");
    }
    match model.psr_name() {
        Some(name) if name != config.source => {
            warn!(
                "The configured source {} doesn't match the timing model's PSR {name}",
                config.source
            );
        }
        _ => (),
    }

    Checks::model_consistency().run(&model, &toas)?;
    Ok((toas, model))
}

fn load_toas_with_snapshot(manifest: &Path, config: &TimingConfig) -> Result<Toas, LoadError> {
    let snapshot = snapshot_path(manifest);
    if let Some(toas) = read_snapshot(&snapshot)? {
        if toas.ephem == config.ephem && toas.bipm == config.bipm {
            info!("Using TOA snapshot {}", snapshot.display());
            return Ok(toas);
        }
        debug!(
            "Ignoring snapshot {}; it was made with {}/{}",
            snapshot.display(),
            toas.ephem,
            toas.bipm
        );
    }

    let toas = read_tim_file(manifest, &config.ephem, &config.bipm)?;
    write_snapshot(&toas, &snapshot)?;
    Ok(toas)
}
