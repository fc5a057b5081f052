// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parsing of tempo2-style ("FORMAT 1") tim files.
//!
//! TOA lines look like
//!
//! ```text
//! name freq_mhz mjd error_us site -flag value -flag value ...
//! ```
//!
//! The commands INCLUDE, SKIP/NOSKIP, END, TIME, JUMP, EFAC, EQUAD, EMIN,
//! EMAX, FMIN and FMAX are honoured. FORMAT, MODE, PHASE, INFO and TRACK are
//! accepted and ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, trace, warn};

use super::{TimReadError, Toa, Toas};
use crate::constants::DAYSEC;

/// How deep INCLUDE commands may nest before we assume a cycle.
const MAX_INCLUDE_DEPTH: usize = 32;

/// Commands that carry state between TOA lines. Some of these apply across
/// INCLUDEd files, as they do in tempo2.
struct ReadState {
    skipping: bool,
    ended: bool,
    time_offset_s: f64,
    jump_open: bool,
    num_jumps: usize,
    efac: f64,
    equad_us: f64,
    emin_us: Option<f64>,
    emax_us: Option<f64>,
    fmin_mhz: Option<f64>,
    fmax_mhz: Option<f64>,
}

impl Default for ReadState {
    fn default() -> Self {
        ReadState {
            skipping: false,
            ended: false,
            time_offset_s: 0.0,
            jump_open: false,
            num_jumps: 0,
            efac: 1.0,
            equad_us: 0.0,
            emin_us: None,
            emax_us: None,
            fmin_mhz: None,
            fmax_mhz: None,
        }
    }
}

/// Read a tim file (and anything it INCLUDEs) into [`Toas`], tagged with the
/// given ephemeris and clock-correction versions.
pub fn read_tim_file<P: AsRef<Path>>(file: P, ephem: &str, bipm: &str) -> Result<Toas, TimReadError> {
    let file = file.as_ref();
    let mut state = ReadState::default();
    let mut toas = vec![];
    read_into(file, 0, &mut state, &mut toas)?;
    if toas.is_empty() {
        return Err(TimReadError::NoToas(file.to_path_buf()));
    }
    debug!("Read {} TOAs from {}", toas.len(), file.display());

    let mut toas = Toas::new(toas, ephem, bipm);
    toas.filename = Some(file.to_path_buf());
    Ok(toas)
}

fn read_into(
    file: &Path,
    depth: usize,
    state: &mut ReadState,
    toas: &mut Vec<Toa>,
) -> Result<(), TimReadError> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(TimReadError::IncludeDepth {
            file: file.to_path_buf(),
            max: MAX_INCLUDE_DEPTH,
        });
    }
    trace!("Reading tim file {}", file.display());
    let mut buf = BufReader::new(File::open(file)?);

    let mut line = String::new();
    let mut line_num: u32 = 0;
    while !state.ended && buf.read_line(&mut line)? > 0 {
        line_num += 1;
        parse_line(file, line_num, &line, depth, state, toas)?;
        line.clear();
    }
    Ok(())
}

fn parse_line(
    file: &Path,
    line_num: u32,
    line: &str,
    depth: usize,
    state: &mut ReadState,
    toas: &mut Vec<Toa>,
) -> Result<(), TimReadError> {
    let trimmed = line.trim();
    // Comments and blank lines.
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "C" || trimmed.starts_with("C ")
    {
        return Ok(());
    }

    let items: Vec<&str> = trimmed.split_whitespace().collect();
    let arg = |command: &'static str| {
        items
            .get(1)
            .copied()
            .ok_or_else(|| TimReadError::MissingArgument {
                file: file.to_path_buf(),
                line_num,
                command,
            })
    };
    let float_arg = |command: &'static str| -> Result<f64, TimReadError> {
        let value = arg(command)?;
        value.parse().map_err(|_| TimReadError::ParseFloat {
            file: file.to_path_buf(),
            line_num,
            field: command,
            value: value.to_string(),
        })
    };

    match items[0].to_uppercase().as_str() {
        "SKIP" => state.skipping = true,
        "NOSKIP" => state.skipping = false,
        _ if state.skipping => (),

        "END" => state.ended = true,
        "INCLUDE" => {
            let included = arg("INCLUDE")?;
            read_into(Path::new(included), depth + 1, state, toas)?;
        }
        "TIME" => state.time_offset_s += float_arg("TIME")?,
        "JUMP" => {
            if !state.jump_open {
                state.num_jumps += 1;
            }
            state.jump_open = !state.jump_open;
        }
        "EFAC" => state.efac = float_arg("EFAC")?,
        "EQUAD" => state.equad_us = float_arg("EQUAD")?,
        "EMIN" => state.emin_us = Some(float_arg("EMIN")?),
        "EMAX" => state.emax_us = Some(float_arg("EMAX")?),
        "FMIN" => state.fmin_mhz = Some(float_arg("FMIN")?),
        "FMAX" => state.fmax_mhz = Some(float_arg("FMAX")?),
        "FORMAT" | "MODE" | "PHASE" | "INFO" | "TRACK" => {
            trace!("{}:{line_num}: ignoring {}", file.display(), items[0]);
        }

        _ => {
            if let Some(toa) = parse_toa_line(file, line_num, &items, state)? {
                toas.push(toa);
            }
        }
    }

    Ok(())
}

fn parse_toa_line(
    file: &Path,
    line_num: u32,
    items: &[&str],
    state: &ReadState,
) -> Result<Option<Toa>, TimReadError> {
    if items.len() < 5 {
        return Err(TimReadError::TooFewFields {
            file: file.to_path_buf(),
            line_num,
            num_fields: items.len(),
        });
    }
    let parse_float = |field: &'static str, value: &str| -> Result<f64, TimReadError> {
        value.parse().map_err(|_| TimReadError::ParseFloat {
            file: file.to_path_buf(),
            line_num,
            field,
            value: value.to_string(),
        })
    };
    let freq_mhz = parse_float("frequency", items[1])?;
    let mjd = parse_float("MJD", items[2])?;
    let error_us = parse_float("error", items[3])?;

    let mut flags = IndexMap::new();
    let mut flag_items = items[5..].iter();
    while let Some(token) = flag_items.next() {
        let flag = match token.strip_prefix('-') {
            Some(f) if !f.is_empty() => f,
            _ => {
                return Err(TimReadError::BadFlag {
                    file: file.to_path_buf(),
                    line_num,
                    token: token.to_string(),
                })
            }
        };
        let value = flag_items
            .next()
            .ok_or_else(|| TimReadError::MissingFlagValue {
                file: file.to_path_buf(),
                line_num,
                flag: flag.to_string(),
            })?;
        if flags.insert(flag.to_string(), value.to_string()).is_some() {
            warn!(
                "{}:{line_num}: flag -{flag} is specified more than once; using the last value",
                file.display()
            );
        }
    }

    if state.emin_us.map(|e| error_us < e).unwrap_or(false)
        || state.emax_us.map(|e| error_us > e).unwrap_or(false)
        || state.fmin_mhz.map(|f| freq_mhz < f).unwrap_or(false)
        || state.fmax_mhz.map(|f| freq_mhz > f).unwrap_or(false)
    {
        trace!("{}:{line_num}: TOA excluded by EMIN/EMAX/FMIN/FMAX", file.display());
        return Ok(None);
    }

    if state.jump_open {
        flags.insert("tim_jump".to_string(), state.num_jumps.to_string());
    }

    Ok(Some(Toa {
        name: items[0].to_string(),
        freq_mhz,
        mjd: mjd + state.time_offset_s / DAYSEC,
        error_us: (error_us * state.efac).hypot(state.equad_us),
        site: items[4].to_string(),
        flags,
    }))
}
