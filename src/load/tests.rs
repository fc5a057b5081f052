// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs;

use indoc::indoc;
use serial_test::serial;
use tempfile::TempDir;

use super::*;
use crate::{
    checks::CheckError,
    config::tests::example_config,
    epochs::center_epochs,
    model::{Astrometry, ParReadError},
};

const A_TIM: &str = indoc! {"
    FORMAT 1
    a_1 1400.0 55000.0 1.0 gbt -fe Rcvr1_2 -snr 20
    a_2 1400.0 55010.0 1.0 gbt -fe Rcvr1_2 -snr 5
"};

const B_TIM: &str = indoc! {"
    FORMAT 1
    b_1 800.0 55020.0 2.0 gbt -fe Rcvr_800 -snr 12
    b_2 800.0 55030.0 2.0 gbt -fe Rcvr_800 -snr 40
"};

const PAR: &str = indoc! {"
    PSRJ           J0000+0000
    ELONG          100.0                     1
    ELAT           -10.0                     1
    PMELONG        1.0                       1
    PMELAT         2.0                       1
    F0             200.0                     1
    F1             -1e-15                    1
    PEPOCH         50000
    DM             10.0
    JUMP -fe Rcvr_800 0.0                    1
"};

/// Write tim and par files into `dir`, and return a config pointing at them.
fn setup(dir: &Path, par: &str) -> TimingConfig {
    fs::create_dir_all(dir.join("tim")).unwrap();
    fs::create_dir_all(dir.join("par")).unwrap();
    fs::write(dir.join("tim/a.tim"), A_TIM).unwrap();
    fs::write(dir.join("tim/b.tim"), B_TIM).unwrap();
    fs::write(dir.join("par/J0000+0000.par"), par).unwrap();

    let mut config = example_config();
    config.tim_directory = dir.join("tim");
    config.par_directory = dir.join("par");
    config
}

#[test]
fn test_write_include_tim() {
    let dir = TempDir::new().unwrap();
    let config = example_config();
    let manifest = write_include_tim_in(dir.path(), &config.source, &config.toa_paths()).unwrap();
    assert_eq!(manifest, dir.path().join("J0000+0000.tim"));
    assert_eq!(
        fs::read_to_string(&manifest).unwrap(),
        "INCLUDE ./tim/a.tim\nINCLUDE ./tim/b.tim\n"
    );

    // Writing again overwrites.
    write_include_tim_in(dir.path(), &config.source, &["c.tim"]).unwrap();
    assert_eq!(fs::read_to_string(&manifest).unwrap(), "INCLUDE c.tim\n");
}

#[test]
fn test_load_and_check_in() {
    let dir = TempDir::new().unwrap();
    let config = setup(dir.path(), PAR);
    let (toas, model) = load_and_check_in(&config, false, dir.path()).unwrap();

    assert_eq!(toas.len(), 4);
    assert_eq!(toas.ephem, "DE440");
    assert_eq!(toas.bipm, "BIPM2021");
    assert_eq!(model.psr_name(), Some("J0000+0000"));
    // The manifest stays on disk.
    let manifest = fs::read_to_string(dir.path().join("J0000+0000.tim")).unwrap();
    assert_eq!(manifest.lines().count(), 2);
    assert!(manifest.lines().all(|l| l.starts_with("INCLUDE ")));
}

#[test]
#[serial]
fn test_load_relative_to_working_directory() {
    let dir = TempDir::new().unwrap();
    setup(dir.path(), PAR);
    let config = example_config();

    let old_cwd = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let result = load_and_check(&config, false);
    std::env::set_current_dir(old_cwd).unwrap();

    let (toas, mut model) = result.unwrap();
    let manifest = fs::read_to_string(dir.path().join("J0000+0000.tim")).unwrap();
    assert_eq!(manifest, "INCLUDE ./tim/a.tim\nINCLUDE ./tim/b.tim\n");

    center_epochs(&mut model, &toas.select_all()).unwrap();
    assert_eq!(model.value_f64("PEPOCH").unwrap(), Some(55015.0));
}

#[test]
fn test_load_converts_equatorial_models() {
    let dir = TempDir::new().unwrap();
    let par = indoc! {"
        PSR            J0000+0000
        RAJ            06:40:00.0                1
        DECJ           -10:00:00.0               1
        PMRA           1.0                       1
        PMDEC          2.0                       0
        F0             200.0                     1
        PEPOCH         50000
        JUMP -fe Rcvr_800 0.0                    1
    "};
    let config = setup(dir.path(), par);
    let (_, model) = load_and_check_in(&config, false, dir.path()).unwrap();
    assert_eq!(model.astrometry(), Astrometry::Ecliptic);
    assert!(model.get("ECL").is_some());
    assert!(model.get("PMELONG").unwrap().free);
    assert!(!model.get("PMELAT").unwrap().free);
}

#[test]
fn test_load_runs_checks() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(dir.path(), PAR);
    config.ephem = "DE421".to_string();
    match load_and_check_in(&config, false, dir.path()) {
        Err(LoadError::Check(CheckError::Mismatch { check, found, .. })) => {
            assert_eq!(check, "ephemeris");
            assert_eq!(found, "DE421");
        }
        r => panic!("Unexpected result: {r:?}"),
    }

    // Neither receiver is jumped.
    let config = setup(dir.path(), &PAR.replace("JUMP -fe Rcvr_800", "JUMP -fe Other"));
    match load_and_check_in(&config, false, dir.path()) {
        Err(LoadError::Check(CheckError::MissingJumps { missing })) => {
            assert_eq!(missing.as_vec(), &["Rcvr1_2", "Rcvr_800"]);
        }
        r => panic!("Unexpected result: {r:?}"),
    }
}

#[test]
fn test_load_with_snapshot() {
    let dir = TempDir::new().unwrap();
    let config = setup(dir.path(), PAR);
    let (toas, _) = load_and_check_in(&config, true, dir.path()).unwrap();
    let snapshot = dir.path().join("J0000+0000.tim.snapshot.gz");
    assert!(snapshot.exists());

    // The snapshot is used even though a tim file changed.
    fs::write(
        dir.path().join("tim/b.tim"),
        "b_1 800.0 55020.0 2.0 gbt -fe Rcvr_800 -snr 12\n",
    )
    .unwrap();
    let (toas2, _) = load_and_check_in(&config, true, dir.path()).unwrap();
    assert_eq!(toas, toas2);

    // ... unless it was made for a different ephemeris.
    let mut config = config;
    config.ephem = "de440".to_string();
    let (toas3, _) = load_and_check_in(&config, true, dir.path()).unwrap();
    assert_eq!(toas3.len(), 3);

    // Without the snapshot, the tim files are always read.
    let (toas4, _) = load_and_check_in(&config, false, dir.path()).unwrap();
    assert_eq!(toas4.len(), 3);
}

#[test]
fn test_load_checks_toas_before_reading_the_model() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(dir.path(), PAR);
    config.timing_model = PathBuf::from("nope.par");
    config.bipm = "BIPM2019".to_string();
    match load_and_check_in(&config, false, dir.path()) {
        Err(LoadError::Check(CheckError::Mismatch { check, found, .. })) => {
            assert_eq!(check, "clock");
            assert_eq!(found, "BIPM2019");
        }
        r => panic!("Unexpected result: {r:?}"),
    }
}

#[test]
fn test_load_missing_par() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(dir.path(), PAR);
    config.timing_model = PathBuf::from("nope.par");
    assert!(matches!(
        load_and_check_in(&config, false, dir.path()),
        Err(LoadError::ParRead(ParReadError::IO(_)))
    ));
}
