// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use approx::assert_abs_diff_eq;
use indoc::indoc;
use tempfile::TempDir;

use super::*;
use crate::toas::snapshot::{read_snapshot, snapshot_path, write_snapshot};

pub(crate) fn toa(mjd: f64, site: &str, flags: &[(&str, &str)]) -> Toa {
    Toa {
        name: format!("toa_{mjd}"),
        freq_mhz: 1400.0,
        mjd,
        error_us: 1.0,
        site: site.to_string(),
        flags: flags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_read_simple_tim() {
    let dir = TempDir::new().unwrap();
    let tim = write_file(
        &dir,
        "a.tim",
        indoc! {"
            FORMAT 1
            C a comment
            # another comment
            fake.ff 1400.000 55000.1234567890123 1.500 gbt -fe Rcvr1_2 -snr 25.3
            fake.ff 820.000 55001.5 2.000 ao -fe 327 -pta NANOGrav

        "},
    );

    let toas = read_tim_file(&tim, "DE440", "BIPM2021").unwrap();
    assert_eq!(toas.len(), 2);
    assert_eq!(toas.ephem, "DE440");
    assert_eq!(toas.bipm, "BIPM2021");
    assert_eq!(toas.filename.as_deref(), Some(tim.as_path()));

    let first = toas.get(0).unwrap();
    assert_eq!(first.name, "fake.ff");
    assert_abs_diff_eq!(first.freq_mhz, 1400.0);
    assert_abs_diff_eq!(first.mjd, 55000.1234567890123, epsilon = 1e-10);
    assert_abs_diff_eq!(first.error_us, 1.5);
    assert_eq!(first.site, "gbt");
    assert_eq!(first.flag("fe"), Some("Rcvr1_2"));
    assert_eq!(first.flag("snr"), Some("25.3"));
    assert_eq!(first.flag("pta"), None);

    // Flag order is preserved.
    let second = toas.get(1).unwrap();
    assert_eq!(
        second.flags.keys().collect::<Vec<_>>(),
        vec!["fe", "pta"]
    );
}

#[test]
fn test_include_skip_end_and_time() {
    let dir = TempDir::new().unwrap();
    let b = write_file(
        &dir,
        "b.tim",
        indoc! {"
            FORMAT 1
            b1 1400 56000.0 1.0 gbt -fe L-wide
            SKIP
            skipped 1400 56001.0 1.0 gbt -fe L-wide
            NOSKIP
            TIME 43200
            b2 1400 56002.0 1.0 gbt -fe L-wide
            END
            after_end 1400 56003.0 1.0 gbt -fe L-wide
        "},
    );
    let manifest = write_file(&dir, "manifest.tim", &format!("INCLUDE {}\n", b.display()));

    let toas = read_tim_file(&manifest, "DE440", "BIPM2021").unwrap();
    let names: Vec<_> = toas.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["b1", "b2"]);
    // TIME is in seconds.
    assert_abs_diff_eq!(toas.get(1).unwrap().mjd, 56002.5, epsilon = 1e-10);
}

#[test]
fn test_jump_efac_and_error_limits() {
    let dir = TempDir::new().unwrap();
    let tim = write_file(
        &dir,
        "c.tim",
        indoc! {"
            FORMAT 1
            JUMP
            j1 1400 56000.0 1.0 gbt -fe L-wide
            JUMP
            EFAC 2
            e1 1400 56001.0 1.5 gbt -fe L-wide
            EFAC 1
            EMAX 5
            big 1400 56002.0 10.0 gbt -fe L-wide
            small 1400 56003.0 3.0 gbt -fe L-wide
        "},
    );
    let toas = read_tim_file(&tim, "DE440", "BIPM2021").unwrap();
    let names: Vec<_> = toas.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["j1", "e1", "small"]);
    assert_eq!(toas.get(0).unwrap().flag("tim_jump"), Some("1"));
    assert_eq!(toas.get(1).unwrap().flag("tim_jump"), None);
    assert_abs_diff_eq!(toas.get(1).unwrap().error_us, 3.0);
}

#[test]
fn test_bad_tim_lines() {
    let dir = TempDir::new().unwrap();

    let tim = write_file(&dir, "short.tim", "toa 1400 55000.0 1.0\n");
    assert!(matches!(
        read_tim_file(&tim, "DE440", "BIPM2021"),
        Err(TimReadError::TooFewFields { line_num: 1, num_fields: 4, .. })
    ));

    let tim = write_file(&dir, "float.tim", "toa 1400 5500x.0 1.0 gbt\n");
    assert!(matches!(
        read_tim_file(&tim, "DE440", "BIPM2021"),
        Err(TimReadError::ParseFloat { field: "MJD", .. })
    ));

    let tim = write_file(&dir, "flag.tim", "toa 1400 55000.0 1.0 gbt fe Rcvr\n");
    assert!(matches!(
        read_tim_file(&tim, "DE440", "BIPM2021"),
        Err(TimReadError::BadFlag { .. })
    ));

    let tim = write_file(&dir, "value.tim", "toa 1400 55000.0 1.0 gbt -fe\n");
    assert!(matches!(
        read_tim_file(&tim, "DE440", "BIPM2021"),
        Err(TimReadError::MissingFlagValue { .. })
    ));

    let tim = write_file(&dir, "empty.tim", "FORMAT 1\n");
    assert!(matches!(
        read_tim_file(&tim, "DE440", "BIPM2021"),
        Err(TimReadError::NoToas(_))
    ));

    let missing = dir.path().join("does_not_exist.tim");
    assert!(matches!(
        read_tim_file(missing, "DE440", "BIPM2021"),
        Err(TimReadError::IO(_))
    ));
}

#[test]
fn test_self_include_is_caught() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loop.tim");
    write_file(&dir, "loop.tim", &format!("INCLUDE {}\n", path.display()));
    assert!(matches!(
        read_tim_file(&path, "DE440", "BIPM2021"),
        Err(TimReadError::IncludeDepth { .. })
    ));
}

#[test]
fn test_receivers_and_observatories() {
    let toas = Toas::new(
        vec![
            toa(55000.0, "gbt", &[("fe", "Rcvr1_2")]),
            toa(55001.0, "ao", &[("fe", "L-wide")]),
            toa(55002.0, "gbt", &[("fe", "Rcvr1_2")]),
        ],
        "DE440",
        "BIPM2021",
    );
    assert_eq!(
        toas.observatories().into_iter().collect::<Vec<_>>(),
        vec!["ao", "gbt"]
    );
    assert_eq!(
        toas.receivers().unwrap().into_iter().collect::<Vec<_>>(),
        vec!["L-wide".to_string(), "Rcvr1_2".to_string()]
    );

    let toas = Toas::new(
        vec![toa(55000.0, "gbt", &[("fe", "Rcvr1_2")]), toa(55001.0, "ao", &[])],
        "DE440",
        "BIPM2021",
    );
    assert_eq!(
        toas.receivers(),
        Err(SelectionError::MissingFlag {
            flag: "fe".to_string(),
            index: 1,
            name: "toa_55001".to_string(),
        })
    );
}

#[test]
fn test_selection_mjd_window() {
    let toas = Toas::new(
        (0..10).map(|i| toa(55000.0 + i as f64, "gbt", &[])).collect(),
        "DE440",
        "BIPM2021",
    );
    let all = toas.select_all();
    assert!(all.is_unrestricted());
    assert_eq!(all.len(), 10);

    // Inclusive on both ends.
    let window = all.mjd_window(Some(55002.0), Some(55005.0));
    assert_eq!(window.mjds(), vec![55002.0, 55003.0, 55004.0, 55005.0]);
    assert!(window.iter().all(|t| (55002.0..=55005.0).contains(&t.mjd)));

    // No bounds is a no-op.
    let same = window.mjd_window(None, None);
    assert_eq!(same, window);
    assert_eq!(all.mjd_window(None, None).len(), 10);

    // One-sided bounds.
    assert_eq!(all.mjd_window(Some(55008.0), None).len(), 2);
    assert_eq!(all.mjd_window(None, Some(55000.5)).len(), 1);

    // A second cut keeps the first.
    let narrower = window.mjd_window(Some(55004.0), None);
    assert_eq!(narrower.mjds(), vec![55004.0, 55005.0]);

    // The underlying TOAs are never altered.
    assert_eq!(toas.len(), 10);
    assert!(toas.select_all().is_unrestricted());
}

#[test]
fn test_selection_flag_above_is_strict() {
    let toas = Toas::new(
        vec![
            toa(55000.0, "gbt", &[("snr", "5")]),
            toa(55001.0, "gbt", &[("snr", "10")]),
            toa(55002.0, "gbt", &[("snr", "10.0001")]),
            toa(55003.0, "gbt", &[("snr", "300")]),
        ],
        "DE440",
        "BIPM2021",
    );
    let cut = toas.select_all().flag_above("snr", 10.0).unwrap();
    assert_eq!(cut.mjds(), vec![55002.0, 55003.0]);
    assert_eq!(cut.indices().collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn test_selection_flag_errors() {
    let toas = Toas::new(
        vec![
            toa(55000.0, "gbt", &[("snr", "5")]),
            toa(55001.0, "gbt", &[]),
            toa(55002.0, "gbt", &[("snr", "lots")]),
        ],
        "DE440",
        "BIPM2021",
    );
    let all = toas.select_all();
    assert!(matches!(
        all.flag_above("snr", 1.0),
        Err(SelectionError::MissingFlag { index: 1, .. })
    ));

    // Inactive TOAs aren't inspected.
    let first_two = all.mjd_window(None, Some(55000.0));
    assert_eq!(first_two.flag_above("snr", 1.0).unwrap().len(), 1);

    let last = all.mjd_window(Some(55002.0), None);
    assert_eq!(
        last.flag_above("snr", 1.0),
        Err(SelectionError::ParseFlag {
            flag: "snr".to_string(),
            index: 2,
            value: "lots".to_string(),
        })
    );
}

#[test]
fn test_selection_mask_and_sites() {
    let toas = Toas::new(
        vec![
            toa(55000.0, "gbt", &[]),
            toa(55001.0, "ao", &[]),
            toa(55002.0, "gbt", &[]),
        ],
        "DE440",
        "BIPM2021",
    );
    let all = toas.select_all();
    assert_eq!(
        all.select(&[true, false]),
        Err(SelectionError::MaskLength {
            expected: 3,
            got: 2
        })
    );
    let masked = all.select(&[true, true, false]).unwrap();
    assert_eq!(masked.site("gbt").mjds(), vec![55000.0]);
    assert_eq!(all.site("gbt").mjds(), vec![55000.0, 55002.0]);
    assert!(all.site("meerkat").is_empty());
    assert_eq!(masked.mjd_span(), Some((55000.0, 55001.0)));
    assert_eq!(all.site("meerkat").mjd_span(), None);
}

#[test]
fn test_summary() {
    let mut toas = vec![
        toa(55000.0, "gbt", &[]),
        toa(55004.0, "gbt", &[]),
        toa(55002.0, "ao", &[]),
    ];
    toas[1].error_us = 3.0;
    toas[1].freq_mhz = 820.0;
    let toas = Toas::new(toas, "DE440", "BIPM2021");

    let summary = toas.select_all().summary();
    assert_eq!(summary.num_toas, 3);
    assert_eq!(summary.mjd_span, Some((55000.0, 55004.0)));
    assert_eq!(summary.sites.len(), 2);
    assert_eq!(summary.sites[0].site, "ao");
    let gbt = &summary.sites[1];
    assert_eq!(gbt.num_toas, 2);
    assert_abs_diff_eq!(gbt.freq_min_mhz, 820.0);
    assert_abs_diff_eq!(gbt.freq_max_mhz, 1400.0);
    assert_abs_diff_eq!(gbt.median_error_us, 2.0);

    let lines = summary.printer().lines();
    assert_eq!(lines[0], "├ Number of TOAs: 3 (of 3)");
    assert!(lines.iter().any(|l| l.contains("gbt TOAs (2)")));
}

#[test]
fn test_snapshot_round_trip() {
    let dir = TempDir::new().unwrap();
    let tim = dir.path().join("J0000+0000.tim");
    let path = snapshot_path(&tim);
    assert_eq!(path, dir.path().join("J0000+0000.tim.snapshot.gz"));
    assert!(read_snapshot(&path).unwrap().is_none());

    let toas = Toas::new(
        vec![toa(55000.0, "gbt", &[("fe", "Rcvr1_2"), ("snr", "12")])],
        "DE440",
        "BIPM2021",
    );
    write_snapshot(&toas, &path).unwrap();
    let back = read_snapshot(&path).unwrap().unwrap();
    assert_eq!(back, toas);
}
