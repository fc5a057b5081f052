// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A gzipped snapshot of parsed [`Toas`] for faster reloading.
//!
//! Nothing here checks whether the snapshot is stale with respect to the tim
//! files it was made from; that is up to the caller.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use log::debug;

use super::{SnapshotError, Toas};
use crate::constants::SNAPSHOT_EXTENSION;

/// The snapshot path for a tim file, e.g. `J1909-3744.tim.snapshot.gz`.
pub(crate) fn snapshot_path(tim_file: &Path) -> PathBuf {
    let mut name = tim_file.as_os_str().to_owned();
    name.push(".");
    name.push(SNAPSHOT_EXTENSION);
    PathBuf::from(name)
}

pub(crate) fn write_snapshot(toas: &Toas, path: &Path) -> Result<(), SnapshotError> {
    let mut encoder = GzEncoder::new(BufWriter::new(File::create(path)?), Compression::default());
    serde_json::to_writer(&mut encoder, toas)?;
    encoder.finish()?.flush()?;
    debug!("Wrote TOA snapshot {}", path.display());
    Ok(())
}

/// Read a snapshot, if one exists at `path`.
pub(crate) fn read_snapshot(path: &Path) -> Result<Option<Toas>, SnapshotError> {
    if !path.exists() {
        return Ok(None);
    }
    let decoder = GzDecoder::new(BufReader::new(File::open(path)?));
    let toas = serde_json::from_reader(decoder).map_err(|err| SnapshotError::Decode {
        file: path.to_path_buf(),
        err,
    })?;
    debug!("Read TOA snapshot {}", path.display());
    Ok(Some(toas))
}
