use time::{Duration, PrimitiveDateTime, UtcOffset};
use time_tz::{Offset, OffsetResult, TimeZone};

/// Get the UTC offset of `canonical_timezone` at the wall-clock time `local`.
///
/// An ambiguous time (clocks turned back) takes the earlier offset. A time
/// skipped by a clock change takes the offset from before the change, which
/// lands on the first instant after the gap.
///
/// Returns `None` if `canonical_timezone` is not a known IANA timezone name.
pub fn get_local_offset_at(canonical_timezone: &str, local: PrimitiveDateTime) -> Option<UtcOffset> {
    let tz = time_tz::timezones::get_by_name(canonical_timezone)?;

    let offset = match tz.get_offset_local(&local.assume_utc()) {
        OffsetResult::Some(offset) | OffsetResult::Ambiguous(offset, _) => offset.to_utc(),
        OffsetResult::None => tz
            .get_offset_utc(&(local - Duration::days(1)).assume_utc())
            .to_utc(),
    };

    Some(offset)
}

/// Whether `canonical_timezone` is a known IANA timezone name.
pub fn is_valid_timezone(canonical_timezone: &str) -> bool {
    time_tz::timezones::get_by_name(canonical_timezone).is_some()
}
