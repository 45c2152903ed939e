use time::macros::format_description;
use time::OffsetDateTime;

/// Current UTC time as an RFC 3339 string with fixed microsecond precision,
/// so stored timestamps sort lexicographically.
pub fn now_rfc3339() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

pub fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
    );
    let utc = at.to_offset(time::UtcOffset::UTC);
    utc.format(&format)
        .unwrap_or_else(|_| utc.unix_timestamp().to_string())
}
