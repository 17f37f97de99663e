//! ISO-8601 durations.
//!
//! A `Duration` keeps calendar months separate from exact seconds because
//! a month has no fixed length. Weeks and days fold into seconds on parse;
//! years fold into months. The sign applies to the whole span, as in
//! `-P1DT6H`.

use core::str::FromStr;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_WEEK: u64 = 604_800;

/// A signed ISO-8601 duration with month, second, and nanosecond
/// components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Duration {
    negative: bool,
    months: u64,
    seconds: u64,
    nanos: u32,
}

impl Duration {
    /// The zero duration, `PT0S`.
    #[must_use]
    pub fn zero() -> Self {
        Duration::default()
    }

    /// Builds a duration from components, normalising nano overflow into
    /// seconds and the sign of zero.
    #[must_use]
    pub fn new(negative: bool, months: u64, seconds: u64, nanos: u32) -> Self {
        let seconds = seconds + u64::from(nanos) / 1_000_000_000;
        let nanos = nanos % 1_000_000_000;
        let negative = negative && (months != 0 || seconds != 0 || nanos != 0);
        Duration {
            negative,
            months,
            seconds,
            nanos,
        }
    }

    /// Whether the span is negative. Zero is never negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Whether this is the zero duration.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.months == 0 && self.seconds == 0 && self.nanos == 0
    }

    /// Total calendar months (years folded in).
    #[must_use]
    pub fn months(&self) -> u64 {
        self.months
    }

    /// Total exact seconds (weeks, days, hours, minutes folded in).
    #[must_use]
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Sub-second nanoseconds, in `[0, 1_000_000_000)`.
    #[must_use]
    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Writes canonical ISO-8601 text into `out`: zero components are
    /// omitted, days are split out of the second count, and the zero
    /// duration is `PT0S`.
    pub(crate) fn write_canonical(&self, out: &mut String) {
        use core::fmt::Write;

        if self.is_zero() {
            out.push_str("PT0S");
            return;
        }
        if self.negative {
            out.push('-');
        }
        out.push('P');

        let years = self.months / 12;
        let months = self.months % 12;
        if years != 0 {
            let _ = write!(out, "{years}Y");
        }
        if months != 0 {
            let _ = write!(out, "{months}M");
        }

        let days = self.seconds / SECONDS_PER_DAY;
        let mut rest = self.seconds % SECONDS_PER_DAY;
        if days != 0 {
            let _ = write!(out, "{days}D");
        }

        let hours = rest / SECONDS_PER_HOUR;
        rest %= SECONDS_PER_HOUR;
        let minutes = rest / SECONDS_PER_MINUTE;
        let seconds = rest % SECONDS_PER_MINUTE;
        if hours == 0 && minutes == 0 && seconds == 0 && self.nanos == 0 {
            return;
        }
        out.push('T');
        if hours != 0 {
            let _ = write!(out, "{hours}H");
        }
        if minutes != 0 {
            let _ = write!(out, "{minutes}M");
        }
        if seconds != 0 || self.nanos != 0 {
            let _ = write!(out, "{seconds}");
            if self.nanos != 0 {
                let frac = format!("{:09}", self.nanos);
                let _ = write!(out, ".{}", frac.trim_end_matches('0'));
            }
            out.push('S');
        }
    }
}

/// Incremental ISO-8601 duration reader over the text after `P`.
struct Fields<'a> {
    rest: &'a str,
}

impl<'a> Fields<'a> {
    /// Reads the next `<digits><designator>` pair, where the seconds field
    /// may carry a decimal fraction. Returns `(value, fraction_nanos,
    /// designator)`.
    fn next(&mut self) -> Option<Result<(u64, u32, char), ()>> {
        if self.rest.is_empty() {
            return None;
        }
        let digits_end = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if digits_end == 0 {
            return Some(Err(()));
        }
        let value: u64 = match self.rest[..digits_end].parse() {
            Ok(v) => v,
            Err(_) => return Some(Err(())),
        };
        let mut after = &self.rest[digits_end..];

        let mut frac_nanos = 0u32;
        if let Some(frac) = after.strip_prefix('.') {
            let frac_end = frac
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(frac.len());
            if frac_end == 0 {
                return Some(Err(()));
            }
            let mut scaled = String::from(&frac[..frac_end.min(9)]);
            while scaled.len() < 9 {
                scaled.push('0');
            }
            frac_nanos = match scaled.parse() {
                Ok(v) => v,
                Err(_) => return Some(Err(())),
            };
            after = &frac[frac_end..];
        }

        let mut chars = after.chars();
        let designator = match chars.next() {
            Some(c) => c,
            None => return Some(Err(())),
        };
        self.rest = chars.as_str();
        Some(Ok((value, frac_nanos, designator)))
    }
}

impl FromStr for Duration {
    type Err = ();

    /// Parses `-?P[nY][nM][nW][nD][T[nH][nM][n[.f]S]]`.
    ///
    /// At least one component must be present, a `T` must be followed by a
    /// time component, and a fraction is only legal on the seconds field.
    fn from_str(s: &str) -> Result<Self, ()> {
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let body = rest.strip_prefix('P').ok_or(())?;

        let (date_part, time_part) = match body.find('T') {
            Some(at) => (&body[..at], Some(&body[at + 1..])),
            None => (body, None),
        };
        if date_part.is_empty() && time_part.is_none_or(str::is_empty) {
            return Err(());
        }

        let mut months = 0u64;
        let mut seconds = 0u64;
        let mut nanos = 0u32;
        let mut saw_component = false;

        // Designators must appear in order; `order` only ratchets forward.
        let mut order = 0u8;
        let mut take = |rank: u8, order: &mut u8| -> Result<(), ()> {
            if rank <= *order {
                return Err(());
            }
            *order = rank;
            Ok(())
        };

        let mut fields = Fields { rest: date_part };
        while let Some(field) = fields.next() {
            let (value, frac, designator) = field?;
            if frac != 0 {
                return Err(());
            }
            saw_component = true;
            match designator {
                'Y' => {
                    take(1, &mut order)?;
                    months = months.checked_add(value.checked_mul(12).ok_or(())?).ok_or(())?;
                }
                'M' => {
                    take(2, &mut order)?;
                    months = months.checked_add(value).ok_or(())?;
                }
                'W' => {
                    take(3, &mut order)?;
                    seconds = seconds
                        .checked_add(value.checked_mul(SECONDS_PER_WEEK).ok_or(())?)
                        .ok_or(())?;
                }
                'D' => {
                    take(4, &mut order)?;
                    seconds = seconds
                        .checked_add(value.checked_mul(SECONDS_PER_DAY).ok_or(())?)
                        .ok_or(())?;
                }
                _ => return Err(()),
            }
        }

        if let Some(time_part) = time_part {
            if time_part.is_empty() {
                return Err(());
            }
            let mut order = 0u8;
            let mut fields = Fields { rest: time_part };
            while let Some(field) = fields.next() {
                let (value, frac, designator) = field?;
                saw_component = true;
                match designator {
                    'H' => {
                        take(1, &mut order)?;
                        if frac != 0 {
                            return Err(());
                        }
                        seconds = seconds
                            .checked_add(value.checked_mul(SECONDS_PER_HOUR).ok_or(())?)
                            .ok_or(())?;
                    }
                    'M' => {
                        take(2, &mut order)?;
                        if frac != 0 {
                            return Err(());
                        }
                        seconds = seconds
                            .checked_add(value.checked_mul(SECONDS_PER_MINUTE).ok_or(())?)
                            .ok_or(())?;
                    }
                    'S' => {
                        take(3, &mut order)?;
                        seconds = seconds.checked_add(value).ok_or(())?;
                        nanos = frac;
                    }
                    _ => return Err(()),
                }
            }
        }

        if !saw_component {
            return Err(());
        }
        Ok(Duration::new(negative, months, seconds, nanos))
    }
}

impl core::fmt::Display for Duration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut buf = String::with_capacity(24);
        self.write_canonical(&mut buf);
        f.write_str(&buf)
    }
}
