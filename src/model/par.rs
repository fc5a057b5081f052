// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading and writing tempo-style par files.
//!
//! Lines look like `NAME VALUE [FIT] [UNCERTAINTY]`, where FIT is 1 for a
//! free parameter and 0 for a frozen one. Mask parameters (e.g. JUMP) carry
//! a key before their value: `JUMP -fe Rcvr1_2 0.0001 1 0.00002`.

use std::fmt::Write;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, trace};

use super::{ParReadError, Param, TimingModel, MASK_PARAMS};

/// Parameter aliases and their canonical names.
const ALIASES: &[(&str, &str)] = &[
    ("PSRJ", "PSR"),
    ("PSRB", "PSR"),
    ("RA", "RAJ"),
    ("DEC", "DECJ"),
    ("LAMBDA", "ELONG"),
    ("BETA", "ELAT"),
    ("PMLAMBDA", "PMELONG"),
    ("PMBETA", "PMELAT"),
];

/// Read a par file into a [`TimingModel`].
pub fn read_par_file<P: AsRef<Path>>(file: P) -> Result<TimingModel, ParReadError> {
    let file = file.as_ref();
    debug!("Reading par file {}", file.display());
    let mut buf = BufReader::new(File::open(file)?);
    parse_par(&mut buf, file)
}

/// Parse a buffer containing a par file. `file` is only used for error
/// messages.
pub fn parse_par<T: BufRead>(buf: &mut T, file: &Path) -> Result<TimingModel, ParReadError> {
    let mut params: Vec<Param> = vec![];
    let mut line = String::new();
    let mut line_num: u32 = 0;

    while buf.read_line(&mut line)? > 0 {
        line_num += 1;
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed == "C"
            || trimmed.starts_with("C ")
        {
            line.clear();
            continue;
        }

        let param = parse_param_line(trimmed, file, line_num)?;
        if param.key.is_empty() && params.iter().any(|p| p.key.is_empty() && p.name == param.name)
        {
            return Err(ParReadError::Duplicate {
                file: file.to_path_buf(),
                line_num,
                name: param.name,
            });
        }
        trace!("{}:{line_num}: {}", file.display(), param.name);
        params.push(param);
        line.clear();
    }

    TimingModel::from_params(params).map_err(|err| ParReadError::Model {
        file: file.to_path_buf(),
        err,
    })
}

fn parse_param_line(line: &str, file: &Path, line_num: u32) -> Result<Param, ParReadError> {
    let mut items = line.split_whitespace();
    // There's always at least one item, because blank lines are skipped.
    let raw_name = items.next().unwrap_or_default().to_uppercase();
    let name = ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw_name)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(raw_name);
    let items: Vec<&str> = items.collect();

    let mut rest = &items[..];
    let mut key = vec![];
    if MASK_PARAMS.contains(&name.as_str()) {
        let key_len = match rest.first() {
            Some(k) if k.starts_with('-') && k.parse::<f64>().is_err() => 2,
            Some(k) if k.eq_ignore_ascii_case("MJD") || k.eq_ignore_ascii_case("FREQ") => 3,
            Some(k) if k.eq_ignore_ascii_case("TEL") || k.eq_ignore_ascii_case("NAME") => 2,
            _ => 0,
        };
        if rest.len() < key_len {
            return Err(ParReadError::IncompleteKey {
                file: file.to_path_buf(),
                line_num,
                key: rest.first().map(|s| s.to_string()).unwrap_or_default(),
                name,
            });
        }
        key = rest[..key_len].iter().map(|s| s.to_string()).collect();
        rest = &rest[key_len..];
    }

    let value = match rest.first() {
        Some(v) => v.to_string(),
        None => {
            return Err(ParReadError::MissingValue {
                file: file.to_path_buf(),
                line_num,
                name,
            })
        }
    };

    // What follows the value is either "FIT UNCERTAINTY", "FIT", or just
    // "UNCERTAINTY". A lone 0 or 1 is ambiguous; like tempo, it's read as a
    // fit flag, so `PX 1.2 1` is a free PX with no uncertainty.
    let (free, uncertainty) = match &rest[1..] {
        [] => (false, None),
        [flag] if *flag == "0" || *flag == "1" => (*flag == "1", None),
        [unc] => (false, Some(unc.to_string())),
        [flag, unc, ..] => (*flag == "1", Some(unc.to_string())),
    };

    Ok(Param {
        name,
        key,
        value,
        free,
        uncertainty,
    })
}

impl TimingModel {
    /// Render the model in par-file syntax.
    pub fn as_parfile(&self) -> String {
        let mut out = String::new();
        for p in &self.params {
            let mut name_and_key = p.name.clone();
            for k in &p.key {
                name_and_key.push(' ');
                name_and_key.push_str(k);
            }
            // Writing to a String can't fail.
            let _ = write!(out, "{name_and_key:<20} {:>25}", p.value);
            match (&p.uncertainty, p.free) {
                (Some(unc), free) => {
                    let _ = write!(out, " {} {unc}", u8::from(free));
                }
                (None, true) => out.push_str(" 1"),
                (None, false) => (),
            }
            out.push('\n');
        }
        out
    }
}
