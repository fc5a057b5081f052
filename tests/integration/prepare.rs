// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::*;

/// The one .par file in `dir` that starts with the pulsar name.
fn output_par(dir: &Path) -> PathBuf {
    let mut pars: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("J0000+0000_PINT_") && n.ends_with(".par"))
                .unwrap_or(false)
        })
        .collect();
    assert_eq!(pars.len(), 1, "{pars:?}");
    pars.remove(0)
}

#[test]
fn test_prepare() {
    let (dir, config) = setup("yaml", "DE440", "BIPM2021");
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    let (success, _, stderr) = run_in(
        dir.path(),
        &[
            "prepare",
            &config.display().to_string(),
            "--output-dir",
            &out.display().to_string(),
            "--suffix",
            "_prepared",
        ],
    );
    assert!(success, "prepare failed: {stderr}");

    let par = output_par(&out);
    assert!(par.to_str().unwrap().ends_with("_prepared.par"));
    assert_eq!(read_param(&par, "PEPOCH").as_deref(), Some("55020"));
    assert_eq!(read_param(&par, "POSEPOCH").as_deref(), Some("55020"));
    assert_eq!(read_param(&par, "DMEPOCH"), None);
    // Converted to ecliptic coordinates.
    assert_eq!(read_param(&par, "ECL").as_deref(), Some("IERS2010"));
    assert!(read_param(&par, "ELONG").is_some());
    assert!(read_param(&par, "RAJ").is_none());
}

#[test]
fn test_prepare_with_snr_cut() {
    let (dir, config) = setup("toml", "DE440", "BIPM2021");
    let config = config.display().to_string();
    let (success, stdout, stderr) = run_in(dir.path(), &["prepare", &config, "--snr-cut", "10"]);
    assert!(success, "prepare failed: {stderr}");
    assert!(stdout.contains("3 of 4 TOAs remain"), "{stdout}");

    // TOAs at 55000, 55020 and 55040 survive.
    let par = output_par(dir.path());
    assert_eq!(read_param(&par, "PEPOCH").as_deref(), Some("55020"));
}

#[test]
fn test_prepare_no_center_epochs() {
    let (dir, config) = setup("yaml", "DE440", "BIPM2021");
    let config = config.display().to_string();
    let (success, _, stderr) = run_in(dir.path(), &["prepare", &config, "--no-center-epochs"]);
    assert!(success, "prepare failed: {stderr}");
    let par = output_par(dir.path());
    assert_eq!(read_param(&par, "PEPOCH").as_deref(), Some("50000"));
    assert_eq!(read_param(&par, "F0").as_deref(), Some("200.0"));
}

#[test]
fn test_prepare_snr_cut_everything() {
    let (dir, config) = setup("yaml", "DE440", "BIPM2021");
    let config = config.display().to_string();
    let (success, _, stderr) = run_in(dir.path(), &["prepare", &config, "--snr-cut", "100"]);
    assert!(!success);
    assert!(stderr.contains("No TOAs are selected"), "{stderr}");
}
