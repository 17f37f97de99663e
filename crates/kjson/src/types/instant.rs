//! Absolute UTC points in time with nanosecond resolution.
//!
//! `Instant` stores seconds since the Unix epoch plus a sub-second nanos
//! field in `[0, 1e9)`. Parsing accepts ISO-8601 with an optional UTC
//! offset and normalises to UTC; emission is always the canonical
//! `YYYY-MM-DDTHH:MM:SS[.f]Z` form with the minimum fraction width (0, 3,
//! 6, or 9 digits) that is exact.

use core::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};

const NANOS_PER_SEC: i64 = 1_000_000_000;

// chrono's DateTime covers roughly ±262,000 years; seconds are clamped to
// a comfortably interior window so canonical emission is total.
const MIN_SECONDS: i64 = -8_210_266_876_800; // ~ year -258000
const MAX_SECONDS: i64 = 8_210_298_412_799; // ~ year +262000

/// An absolute point in time, always UTC, with nanosecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    seconds: i64,
    nanos: u32,
}

impl Instant {
    /// The Unix epoch, `1970-01-01T00:00:00Z`.
    #[must_use]
    pub fn epoch() -> Self {
        Instant {
            seconds: 0,
            nanos: 0,
        }
    }

    /// Builds an instant from epoch seconds and additional nanoseconds.
    ///
    /// `nanos` may exceed one second; the excess carries into `seconds`.
    /// Seconds are clamped to the representable calendar range.
    #[must_use]
    pub fn from_unix(seconds: i64, nanos: u32) -> Self {
        let extra = i64::from(nanos) / NANOS_PER_SEC;
        let nanos = nanos % 1_000_000_000;
        let seconds = seconds
            .saturating_add(extra)
            .clamp(MIN_SECONDS, MAX_SECONDS);
        Instant { seconds, nanos }
    }

    /// Builds an instant from signed milliseconds since the epoch (the
    /// kJSONB payload resolution).
    #[must_use]
    pub fn from_unix_millis(millis: i64) -> Self {
        let seconds = millis.div_euclid(1000);
        let nanos = u32::try_from(millis.rem_euclid(1000)).unwrap_or(0) * 1_000_000;
        Instant::from_unix(seconds, nanos)
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub fn unix_seconds(&self) -> i64 {
        self.seconds
    }

    /// Sub-second nanoseconds, in `[0, 1_000_000_000)`.
    #[must_use]
    pub fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Milliseconds since the Unix epoch, truncating sub-millisecond nanos
    /// toward negative infinity.
    #[must_use]
    pub fn unix_millis(&self) -> i64 {
        self.seconds
            .saturating_mul(1000)
            .saturating_add(i64::from(self.nanos / 1_000_000))
    }

    fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.seconds, self.nanos)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }

    /// Writes the canonical `YYYY-MM-DDTHH:MM:SS[.f]Z` text into `out`.
    pub(crate) fn write_canonical(&self, out: &mut String) {
        use core::fmt::Write;

        let dt = self.to_datetime();
        let _ = write!(out, "{}", dt.format("%Y-%m-%dT%H:%M:%S"));
        if self.nanos != 0 {
            if self.nanos % 1_000_000 == 0 {
                let _ = write!(out, ".{:03}", self.nanos / 1_000_000);
            } else if self.nanos % 1_000 == 0 {
                let _ = write!(out, ".{:06}", self.nanos / 1_000);
            } else {
                let _ = write!(out, ".{:09}", self.nanos);
            }
        }
        out.push('Z');
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(dt: DateTime<Utc>) -> Self {
        Instant::from_unix(dt.timestamp(), dt.timestamp_subsec_nanos())
    }
}

impl FromStr for Instant {
    type Err = ();

    /// Parses `YYYY-MM-DDTHH:MM:SS[.fraction][Z|±HH:MM|±HHMM]`.
    ///
    /// A missing offset is read as UTC; any other offset is normalised to
    /// UTC. Leap-second notation folds into the following second.
    fn from_str(s: &str) -> Result<Self, ()> {
        let parsed = DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                // Offset-free local form, interpreted as UTC, and the
                // compact ±HHMM offsets rfc3339 does not cover.
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|naive| naive.and_utc())
                    .or_else(|_| {
                        DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z")
                            .map(|dt| dt.with_timezone(&Utc))
                    })
            })
            .map_err(|_| ())?;
        let mut seconds = parsed.timestamp();
        let mut nanos = parsed.timestamp_subsec_nanos();
        if nanos >= 1_000_000_000 {
            seconds += 1;
            nanos -= 1_000_000_000;
        }
        Ok(Instant::from_unix(seconds, nanos))
    }
}

impl core::fmt::Display for Instant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut buf = String::with_capacity(32);
        self.write_canonical(&mut buf);
        f.write_str(&buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Instant {
        s.parse().unwrap()
    }

    #[test]
    fn parses_utc_form() {
        let t = parse("2025-01-15T10:30:00Z");
        assert_eq!(t.unix_seconds(), 1_736_937_000);
        assert_eq!(t.subsec_nanos(), 0);
    }

    #[test]
    fn normalises_offset_to_utc() {
        let t = parse("2025-01-15T10:30:00+05:30");
        assert_eq!(t.unix_seconds(), 1_736_917_200);
        assert_eq!(t.to_string(), "2025-01-15T05:00:00Z");
    }

    #[test]
    fn missing_offset_is_utc() {
        assert_eq!(parse("2025-01-15T10:30:00"), parse("2025-01-15T10:30:00Z"));
    }

    #[test]
    fn compact_offset_forms() {
        assert_eq!(
            parse("2025-01-15T10:30:00+0530"),
            parse("2025-01-15T10:30:00+05:30")
        );
    }

    #[test]
    fn fraction_parses_to_nanos() {
        assert_eq!(parse("2020-06-01T00:00:00.5Z").subsec_nanos(), 500_000_000);
        assert_eq!(
            parse("2020-06-01T00:00:00.000000001Z").subsec_nanos(),
            1
        );
    }

    #[test]
    fn minimal_fraction_width_on_emit() {
        let base = parse("2020-06-01T00:00:00Z");
        let cases = [
            (0u32, "2020-06-01T00:00:00Z"),
            (120_000_000, "2020-06-01T00:00:00.120Z"),
            (120_300_000, "2020-06-01T00:00:00.120300Z"),
            (120_300_400, "2020-06-01T00:00:00.120300400Z"),
        ];
        for (nanos, expect) in cases {
            let t = Instant::from_unix(base.unix_seconds(), nanos);
            assert_eq!(t.to_string(), expect);
        }
    }

    #[test]
    fn canonical_text_reparses_identically() {
        for s in [
            "1969-12-31T23:59:59Z",
            "1970-01-01T00:00:00Z",
            "2038-01-19T03:14:08.999999999Z",
        ] {
            let t = parse(s);
            assert_eq!(parse(&t.to_string()), t);
        }
    }

    #[test]
    fn millis_round_trip() {
        let t = parse("2025-01-15T10:30:00.123Z");
        assert_eq!(Instant::from_unix_millis(t.unix_millis()), t);
        let pre_epoch = parse("1969-12-31T23:59:59.250Z");
        assert_eq!(Instant::from_unix_millis(pre_epoch.unix_millis()), pre_epoch);
    }

    #[test]
    fn nanos_overflow_carries() {
        let t = Instant::from_unix(10, 2_500_000_000);
        assert_eq!(t.unix_seconds(), 12);
        assert_eq!(t.subsec_nanos(), 500_000_000);
    }

    #[test]
    fn rejects_bad_fields() {
        for s in [
            "2025-13-01T00:00:00Z",
            "2025-01-32T00:00:00Z",
            "2025-01-01T25:00:00Z",
            "not-a-date",
        ] {
            assert!(s.parse::<Instant>().is_err(), "accepted {s:?}");
        }
    }
}
