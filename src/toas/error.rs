// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

/// Errors associated with reading tempo2-style tim files.
#[derive(Error, Debug)]
pub enum TimReadError {
    #[error("{}:{}: A TOA line needs at least 5 fields (name, frequency, MJD, error, site), but only {} were found", .file.display(), .line_num, .num_fields)]
    TooFewFields {
        file: PathBuf,
        line_num: u32,
        num_fields: usize,
    },

    #[error("{}:{}: Couldn't parse the {} '{}' as a number", .file.display(), .line_num, .field, .value)]
    ParseFloat {
        file: PathBuf,
        line_num: u32,
        field: &'static str,
        value: String,
    },

    #[error("{}:{}: Expected a flag beginning with '-', but found '{}'", .file.display(), .line_num, .token)]
    BadFlag {
        file: PathBuf,
        line_num: u32,
        token: String,
    },

    #[error("{}:{}: Flag '-{}' has no value", .file.display(), .line_num, .flag)]
    MissingFlagValue {
        file: PathBuf,
        line_num: u32,
        flag: String,
    },

    #[error("{}:{}: The {} command is missing its argument", .file.display(), .line_num, .command)]
    MissingArgument {
        file: PathBuf,
        line_num: u32,
        command: &'static str,
    },

    #[error("{}: INCLUDE commands are nested more than {} deep; is a tim file including itself?", .file.display(), .max)]
    IncludeDepth { file: PathBuf, max: usize },

    #[error("No TOAs were found when reading {}", .0.display())]
    NoToas(PathBuf),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

/// Errors associated with narrowing a TOA selection.
#[derive(Error, Debug, PartialEq)]
pub enum SelectionError {
    #[error("TOA {index} ('{name}') has no '-{flag}' flag")]
    MissingFlag {
        flag: String,
        index: usize,
        name: String,
    },

    #[error("TOA {index} has a '-{flag}' flag value '{value}' that couldn't be parsed as a number")]
    ParseFlag {
        flag: String,
        index: usize,
        value: String,
    },

    #[error("A selection mask of length {got} was supplied, but there are {expected} TOAs")]
    MaskLength { expected: usize, got: usize },

    #[error("The TOA selection is empty")]
    Empty,
}

/// Errors associated with the TOA snapshot cache.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Couldn't decode the TOA snapshot {}: {}", .file.display(), .err)]
    Decode { file: PathBuf, err: serde_json::Error },

    #[error("Couldn't encode the TOA snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}
