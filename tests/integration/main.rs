// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod check;
mod prepare;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::str::from_utf8;

use assert_cmd::{output::OutputError, Command};
use indoc::indoc;
use tempfile::TempDir;

fn timingkit() -> Command {
    Command::cargo_bin("timingkit").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Run timingkit in `dir`, returning whether it succeeded, and its stdout and
/// stderr.
fn run_in(dir: &Path, args: &[&str]) -> (bool, String, String) {
    let result = timingkit().current_dir(dir).args(args).ok();
    let success = result.is_ok();
    let (stdout, stderr) = get_cmd_output(result);
    (success, stdout, stderr)
}

const A_TIM: &str = indoc! {"
    FORMAT 1
    C Rcvr1_2 TOAs
    a_1 1400.0 55000.0 1.0 gbt -fe Rcvr1_2 -snr 20
    a_2 1400.0 55010.0 1.0 gbt -fe Rcvr1_2 -snr 5
"};

const B_TIM: &str = indoc! {"
    FORMAT 1
    b_1 800.0 55020.0 2.0 gbt -fe Rcvr_800 -snr 12
    b_2 800.0 55040.0 2.0 gbt -fe Rcvr_800 -snr 40
"};

const PAR: &str = indoc! {"
    PSRJ           J0000+0000
    RAJ            06:40:00.0                1
    DECJ           -10:00:00.0               1
    PMRA           1.0                       1
    PMDEC          2.0                       1
    F0             200.0                     1  1e-12
    F1             -1e-15                    1
    PEPOCH         50000
    POSEPOCH       50000
    DM             10.0
    JUMP -fe Rcvr_800 0.0                    1
"};

/// Set up a pulsar's data in a new directory, with a configuration file
/// named `config.<ext>` that refers to the data with relative paths.
fn setup(ext: &str, ephem: &str, bipm: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("tim")).unwrap();
    fs::create_dir_all(root.join("par")).unwrap();
    fs::write(root.join("tim/a.tim"), A_TIM).unwrap();
    fs::write(root.join("tim/b.tim"), B_TIM).unwrap();
    fs::write(root.join("par/J0000+0000.par"), PAR).unwrap();

    let config = root.join(format!("config.{ext}"));
    let contents = match ext {
        "toml" => format!(
            indoc! {r#"
                source = "J0000+0000"
                tim-directory = "./tim/"
                toas = ["a.tim", "b.tim"]
                par-directory = "./par/"
                timing-model = "J0000+0000.par"
                ephem = "{}"
                bipm = "{}"
            "#},
            ephem, bipm
        ),
        _ => format!(
            indoc! {"
                source: J0000+0000
                tim-directory: ./tim/
                toas: [a.tim, b.tim]
                par-directory: ./par/
                timing-model: J0000+0000.par
                ephem: {}
                bipm: {}
            "},
            ephem, bipm
        ),
    };
    fs::write(&config, contents).unwrap();
    (dir, config)
}

fn read_param(par: &Path, name: &str) -> Option<String> {
    fs::read_to_string(par)
        .unwrap()
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>())
        .find(|items| items.first() == Some(&name))
        .and_then(|items| items.get(1).map(|s| s.to_string()))
}
