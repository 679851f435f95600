//! Copyright notice passed to the packaging tool.

use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

/// The current UTC calendar year.
///
/// # Errors
///
/// Returns [`SystemTimeError`] if the system clock is before the Unix epoch.
pub fn current_year() -> Result<u32, SystemTimeError> {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    Ok(year_from_epoch(secs))
}

/// Calendar year of a Unix timestamp.
///
/// Uses Howard Hinnant's `civil_from_days` algorithm.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    reason = "day counts and years stay well inside i64/u32 for post-epoch dates"
)]
fn year_from_epoch(epoch_secs: u64) -> u32 {
    let z = (epoch_secs / 86_400) as i64 + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097) as u64;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let year = yoe as i64 + era * 400;
    // Months are counted from March; January and February close the year.
    let year = if mp >= 10 { year + 1 } else { year };
    year as u32
}

/// Render the notice, e.g. `Copyright © 2013-2026 - The Bisq developers`.
///
/// A start year equal to or after `year` collapses to a single year.
#[must_use]
pub fn copyright_notice(start_year: u32, year: u32, holder: &str) -> String {
    if start_year >= year {
        format!("Copyright © {year} - {holder}")
    } else {
        format!("Copyright © {start_year}-{year} - {holder}")
    }
}
