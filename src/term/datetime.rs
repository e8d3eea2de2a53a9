use std::cmp::Ordering;

use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time, UtcOffset};

/// Largest implicit timezone offset, in hours, permitted by XML Schema.
const IMPLICIT_ZONE_HOURS: i8 = 14;

/// Parsed `xsd:dateTime` with an optional explicit timezone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XsdDateTime {
    local: PrimitiveDateTime,
    offset: Option<UtcOffset>,
}

/// Parsed `xsd:date` with an optional explicit timezone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XsdDate {
    date: Date,
    offset: Option<UtcOffset>,
}

impl XsdDateTime {
    /// Parses `YYYY-MM-DDThh:mm:ss[.fff][Z|(+|-)hh:mm]`.
    ///
    /// `24:00:00` is accepted and denotes midnight of the following day.
    pub fn parse(lexical: &str) -> Option<Self> {
        let (rest, offset) = split_timezone(lexical)?;
        let local = match end_of_day(rest) {
            Some(day) => {
                let date = Date::parse(day, format_description!("[year]-[month]-[day]")).ok()?;
                PrimitiveDateTime::new(date.next_day()?, Time::MIDNIGHT)
            }
            None => parse_local(rest)?,
        };
        Some(Self { local, offset })
    }

    /// Explicit timezone offset, if the lexical form carried one.
    pub fn offset(&self) -> Option<UtcOffset> {
        self.offset
    }

    /// Chronological comparison.
    ///
    /// Returns `None` when one side is zoned, the other is not, and the
    /// ±14:00 implicit timezone window leaves the order undetermined.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self.offset, other.offset) {
            (Some(a), Some(b)) => Some(
                self.local
                    .assume_offset(a)
                    .cmp(&other.local.assume_offset(b)),
            ),
            (None, None) => Some(self.local.cmp(&other.local)),
            (Some(_), None) => other.compare(self).map(Ordering::reverse),
            (None, Some(b)) => {
                let instant = other.local.assume_offset(b);
                let widest = UtcOffset::from_hms(IMPLICIT_ZONE_HOURS, 0, 0).ok()?;
                let narrowest = UtcOffset::from_hms(-IMPLICIT_ZONE_HOURS, 0, 0).ok()?;
                let earliest = self.local.assume_offset(widest);
                let latest = self.local.assume_offset(narrowest);
                if latest < instant {
                    Some(Ordering::Less)
                } else if earliest > instant {
                    Some(Ordering::Greater)
                } else {
                    None
                }
            }
        }
    }
}

impl XsdDate {
    /// Parses `YYYY-MM-DD[Z|(+|-)hh:mm]`.
    pub fn parse(lexical: &str) -> Option<Self> {
        let (rest, offset) = split_timezone(lexical)?;
        let date = Date::parse(rest, format_description!("[year]-[month]-[day]")).ok()?;
        Some(Self { date, offset })
    }

    /// Chronological comparison; dates compare as their starting instant.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        self.at_midnight().compare(&other.at_midnight())
    }

    fn at_midnight(&self) -> XsdDateTime {
        XsdDateTime {
            local: PrimitiveDateTime::new(self.date, Time::MIDNIGHT),
            offset: self.offset,
        }
    }
}

fn parse_local(rest: &str) -> Option<PrimitiveDateTime> {
    let parsed = if rest.contains('.') {
        PrimitiveDateTime::parse(
            rest,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        )
    } else {
        PrimitiveDateTime::parse(
            rest,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
    };
    parsed.ok()
}

/// Returns the date part of a `YYYY-MM-DDT24:00:00[.000]` form.
fn end_of_day(rest: &str) -> Option<&str> {
    let (date, time) = rest.split_once('T')?;
    let fraction = time.strip_prefix("24:00:00")?;
    let zeros = match fraction.strip_prefix('.') {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b == b'0'),
        None => fraction.is_empty(),
    };
    zeros.then_some(date)
}

/// Splits a trailing `Z` or `±hh:mm` off a date/time lexical form.
///
/// Returns `None` when a suffix is present but malformed.
fn split_timezone(lexical: &str) -> Option<(&str, Option<UtcOffset>)> {
    if let Some(rest) = lexical.strip_suffix('Z') {
        return Some((rest, Some(UtcOffset::UTC)));
    }
    let bytes = lexical.as_bytes();
    let len = bytes.len();
    if len > 6 && matches!(bytes[len - 6], b'+' | b'-') && bytes[len - 3] == b':' {
        let sign: i8 = if bytes[len - 6] == b'-' { -1 } else { 1 };
        let hours = two_digits(&bytes[len - 5..len - 3])?;
        let minutes = two_digits(&bytes[len - 2..])?;
        if minutes > 59 || (hours, minutes) > (IMPLICIT_ZONE_HOURS, 0) {
            return None;
        }
        let offset = UtcOffset::from_hms(sign * hours, sign * minutes, 0).ok()?;
        return Some((&lexical[..len - 6], Some(offset)));
    }
    Some((lexical, None))
}

fn two_digits(bytes: &[u8]) -> Option<i8> {
    match *bytes {
        [tens, ones] if tens.is_ascii_digit() && ones.is_ascii_digit() => {
            Some(((tens - b'0') * 10 + (ones - b'0')) as i8)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(lexical: &str) -> XsdDateTime {
        XsdDateTime::parse(lexical).expect("valid dateTime")
    }

    #[test]
    fn parses_zoned_and_unzoned_forms() {
        assert!(dt("2024-03-01T10:00:00").offset().is_none());
        assert_eq!(dt("2024-03-01T10:00:00Z").offset(), Some(UtcOffset::UTC));
        assert!(dt("2024-03-01T10:00:00.250-05:00").offset().is_some());
        assert!(XsdDateTime::parse("2024-03-01").is_none());
        assert!(XsdDateTime::parse("2024-13-01T10:00:00").is_none());
        assert!(XsdDateTime::parse("2024-03-01T10:00:00+15:00").is_none());
        assert!(XsdDateTime::parse("2024-03-01T10:00:00+14:30").is_none());
    }

    #[test]
    fn rejects_signed_or_short_zone_fields() {
        assert!(XsdDateTime::parse("2020-01-01T00:00:00+-1:00").is_none());
        assert!(XsdDateTime::parse("2020-01-01T00:00:00+01:-5").is_none());
        assert!(XsdDateTime::parse("2020-01-01T00:00:00+ 1:00").is_none());
        assert!(XsdDate::parse("2020-01-01-+1:00").is_none());
    }

    #[test]
    fn end_of_day_is_next_midnight() {
        let end = dt("2020-01-01T24:00:00");
        assert_eq!(end, dt("2020-01-02T00:00:00"));
        assert_eq!(dt("2020-12-31T24:00:00.000Z"), dt("2021-01-01T00:00:00Z"));
        assert!(XsdDateTime::parse("2020-01-01T24:00:01").is_none());
        assert!(XsdDateTime::parse("2020-01-01T24:00:00.5").is_none());
    }

    #[test]
    fn zoned_values_compare_by_instant() {
        let utc = dt("2024-03-01T10:00:00Z");
        let shifted = dt("2024-03-01T12:00:00+02:00");
        assert_eq!(utc.compare(&shifted), Some(Ordering::Equal));
        let later = dt("2024-03-01T10:30:00Z");
        assert_eq!(utc.compare(&later), Some(Ordering::Less));
    }

    #[test]
    fn mixed_zones_outside_window_are_ordered() {
        let naive = dt("2024-03-01T10:00:00");
        let far_later = dt("2024-03-02T10:00:00Z");
        assert_eq!(naive.compare(&far_later), Some(Ordering::Less));
        assert_eq!(far_later.compare(&naive), Some(Ordering::Greater));
    }

    #[test]
    fn mixed_zones_inside_window_are_indeterminate() {
        let naive = dt("2024-03-01T10:00:00");
        let close = dt("2024-03-01T12:00:00Z");
        assert_eq!(naive.compare(&close), None);
    }

    #[test]
    fn dates_compare_chronologically() {
        let a = XsdDate::parse("2024-01-01").expect("date");
        let b = XsdDate::parse("2024-01-02").expect("date");
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        let zoned = XsdDate::parse("2024-01-01-05:00").expect("zoned date");
        assert!(zoned.offset.is_some());
    }
}
