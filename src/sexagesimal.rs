// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Code for handling conversion to and from the colon-delimited sexagesimal
strings used by par files (e.g. `RAJ 19:09:47.4346749`).
 */

use thiserror::Error;

/// Convert a sexagesimal-formatted string delimited by colons to a float
/// \[degrees\]. The input is assumed to be in "degrees minutes seconds".
/// Missing trailing fields are treated as zero, so "-22:58" is valid.
///
/// The sign is taken from the string rather than the degrees field, so
/// "-00:30:00" is correctly negative.
pub(crate) fn dms_colon_str_to_degrees(s: &str) -> Result<f64, SexagesimalError> {
    let (negative, fields) = parse_colon_fields(s)?;
    let num = fields[0] + fields[1] / 60.0 + fields[2] / 3600.0;
    Ok(if negative { -num } else { num })
}

/// Convert a sexagesimal-formatted string delimited by colons to a float
/// \[degrees\]. The input is assumed to be in "hours minutes seconds".
pub(crate) fn hms_colon_str_to_degrees(s: &str) -> Result<f64, SexagesimalError> {
    let (negative, fields) = parse_colon_fields(s)?;
    let num = 15.0 * (fields[0] + fields[1] / 60.0 + fields[2] / 3600.0);
    Ok(if negative { -num } else { num })
}

fn parse_colon_fields(s: &str) -> Result<(bool, [f64; 3]), SexagesimalError> {
    let trimmed = s.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut fields = [0.0; 3];
    let mut count = 0;
    for elem in unsigned.split(':') {
        if count == 3 {
            return Err(SexagesimalError::WrongFieldCount(s.to_string()));
        }
        fields[count] = elem
            .parse()
            .map_err(|_| SexagesimalError::ParseFloat(s.to_string()))?;
        count += 1;
    }
    if count == 0 || fields.iter().any(|f| *f < 0.0) {
        return Err(SexagesimalError::WrongFieldCount(s.to_string()));
    }
    Ok((negative, fields))
}

/// Convert a number in degrees to a colon-delimited "hours minutes seconds"
/// string, e.g. "19:09:47.434674900".
pub(crate) fn degrees_to_hms_colon(f: f64) -> String {
    let hours = f.rem_euclid(360.0) / 15.0;
    let (h, m, s) = split_sexagesimal(hours);
    format!("{h:02}:{m:02}:{s:012.9}")
}

/// Convert a number in degrees to a colon-delimited "degrees minutes seconds"
/// string, e.g. "-37:44:14.515600000".
pub(crate) fn degrees_to_dms_colon(f: f64) -> String {
    let sign = if f < 0.0 { "-" } else { "+" };
    let (d, m, s) = split_sexagesimal(f.abs());
    format!("{sign}{d:02}:{m:02}:{s:011.8}")
}

fn split_sexagesimal(value: f64) -> (u32, u32, f64) {
    let mut whole = value.trunc() as u32;
    let minutes_f = (value - value.trunc()) * 60.0;
    let mut minutes = minutes_f.trunc() as u32;
    let mut seconds = (minutes_f - minutes_f.trunc()) * 60.0;
    // Guard against something like 59.9999999999 being printed as 60.
    if seconds >= 59.999_999_999_5 {
        seconds = 0.0;
        minutes += 1;
    }
    if minutes == 60 {
        minutes = 0;
        whole += 1;
    }
    (whole, minutes, seconds)
}

#[derive(Error, Debug)]
pub enum SexagesimalError {
    #[error("Sexagesimal string '{0}' doesn't have between one and three colon-delimited fields")]
    WrongFieldCount(String),

    #[error("Couldn't parse a number out of sexagesimal string '{0}'")]
    ParseFloat(String),
}
