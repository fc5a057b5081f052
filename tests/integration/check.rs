// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::*;

#[test]
fn test_check_passes() {
    let (dir, config) = setup("yaml", "DE440", "BIPM2021");
    let config = config.display().to_string();
    let (success, stdout, stderr) = run_in(dir.path(), &["check", &config]);
    assert!(success, "check failed: {stderr}");
    assert!(stdout.contains("Number of TOAs: 4"), "{stdout}");
    assert!(
        stdout.contains("passed checks ephemeris, clock, name, jumps"),
        "{stdout}"
    );

    let manifest = fs::read_to_string(dir.path().join("J0000+0000.tim")).unwrap();
    assert_eq!(manifest, "INCLUDE ./tim/a.tim\nINCLUDE ./tim/b.tim\n");
}

#[test]
fn test_check_with_snapshot() {
    let (dir, config) = setup("toml", "DE440", "BIPM2021");
    let config = config.display().to_string();
    for _ in 0..2 {
        let (success, _, stderr) = run_in(dir.path(), &["check", &config, "--use-snapshot"]);
        assert!(success, "check failed: {stderr}");
    }
    assert!(dir.path().join("J0000+0000.tim.snapshot.gz").exists());
}

#[test]
fn test_check_stale_clock() {
    let (dir, config) = setup("yaml", "DE440", "BIPM2019");
    let config = config.display().to_string();
    let (success, _, stderr) = run_in(dir.path(), &["-v", "check", &config]);
    assert!(!success);
    assert!(stderr.contains("Check 'clock' failed"), "{stderr}");
    assert!(stderr.contains("BIPM2019"), "{stderr}");
}

#[test]
fn test_check_bad_config_type() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.ini");
    fs::write(&config, "source = J0000+0000\n").unwrap();
    let config = config.display().to_string();
    let (success, _, stderr) = run_in(dir.path(), &["check", &config]);
    assert!(!success);
    assert!(stderr.contains("unrecognised extension"), "{stderr}");
}
