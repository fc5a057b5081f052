// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision.
 */

/// The Solar System ephemeris that TOAs are expected to be processed with.
pub const LATEST_EPHEM: &str = "DE440";

/// The BIPM clock-correction realisation that TOAs are expected to be
/// processed with.
pub const LATEST_BIPM: &str = "BIPM2021";

/// The tag written into output par-file names, e.g.
/// `J1909-3744_PINT_20240101.par`.
pub const TOOLKIT_TAG: &str = "PINT";

/// The TOA flag carrying the signal-to-noise ratio.
pub const SNR_FLAG: &str = "snr";

/// The TOA flag carrying the receiver/front-end name.
pub const RECEIVER_FLAG: &str = "fe";

/// The extension appended to a manifest path for its TOA snapshot.
pub const SNAPSHOT_EXTENSION: &str = "snapshot.gz";

// Things that should never change.

/// Seconds per day (86400)
pub const DAYSEC: f64 = 86400.0;
/// Days per Julian year (365.25)
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;
/// Milliarcseconds to degrees.
pub const MAS_TO_DEG: f64 = 1.0 / 3_600_000.0;

/// The obliquity of the ecliptic in the IERS2010 conventions \[arcseconds\].
pub const OBLIQUITY_IERS2010_ARCSEC: f64 = 84381.406;
/// The name of the ecliptic convention used when converting models.
pub const ECLIPTIC_CONVENTION: &str = "IERS2010";
