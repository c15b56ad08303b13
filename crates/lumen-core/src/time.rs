//! Precision-tagged FHIR date/time values.
//!
//! A FHIR search date literal carries an implicit precision: `2013` means the
//! whole of 2013, `2013-01-02` a single day, and `2013-01-02T12:13:14.999Z` a
//! single millisecond. [`FhirDateTime`] keeps the civil value, the precision
//! of the source literal, and its timezone designation as three separate
//! fields, so the literal can be reproduced exactly and turned into a
//! half-open range `[range_low_incl, range_high_excl)` with calendar-correct
//! month rollover and leap-year handling.
//!
//! Timezone rules (per the FHIR search grammar):
//! - Day-or-coarser literals ignore any trailing zone; they denote server-local
//!   calendar ranges.
//! - Minute-or-finer literals keep `Z` as UTC, keep an explicit `±hh:mm`
//!   offset verbatim, and treat a missing zone as server-local.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// FHIR date/time literal grammar: `YYYY[-MM[-DD[Thh:mm[:ss[.fff]][TZ]]]]`.
///
/// A bare `T` and a zone are matched after any date depth (`2013-01-02Z`,
/// `2013-01T-07:00`); whether they are honored depends on the precision. A
/// time component without a full date is rejected after capture.
static DATE_LITERAL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^(?P<year>\d{4})(?:-(?P<month>\d{2})(?:-(?P<day>\d{2}))?)?(?:T(?:(?P<hour>\d{2}):(?P<minute>\d{2})(?::(?P<second>\d{2})(?:\.(?P<frac>\d+))?)?)?)?(?P<zone>Z|[+-]\d{2}:\d{2})?$",
    )
    .expect("invalid date literal regex")
});

/// Precision of a date/time literal, ordered from coarsest to finest.
///
/// There is no hour rank: FHIR requires minutes whenever hours are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePrecision {
    Year,
    Month,
    Day,
    Minute,
    Second,
    Millisecond,
}

/// Timezone designation carried by a date/time literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneSpec {
    /// No zone in the literal; interpreted in the server's local zone.
    Local,
    /// The literal ended in `Z`.
    Utc,
    /// The literal carried an explicit `±hh:mm` offset.
    Offset(UtcOffset),
}

/// A FHIR date/time value together with the precision it was written at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FhirDateTime {
    value: PrimitiveDateTime,
    precision: DatePrecision,
    zone: ZoneSpec,
}

impl FhirDateTime {
    /// The civil date/time, floored to the literal's precision.
    pub fn value(&self) -> PrimitiveDateTime {
        self.value
    }

    pub fn precision(&self) -> DatePrecision {
        self.precision
    }

    pub fn zone(&self) -> ZoneSpec {
        self.zone
    }

    /// Inclusive lower bound of the range denoted by the literal.
    pub fn range_low_incl(&self) -> PrimitiveDateTime {
        self.value
    }

    /// Exclusive upper bound: the value advanced by one unit of its precision,
    /// with all finer components zeroed. Month and year steps follow the
    /// calendar, so `1996-02-28` ends at `1996-02-29T00:00:00` while
    /// `1900-02-28` ends at `1900-03-01T00:00:00`.
    pub fn range_high_excl(&self) -> PrimitiveDateTime {
        let date = self.value.date();
        match self.precision {
            DatePrecision::Year => Date::from_calendar_date(date.year() + 1, Month::January, 1)
                .map(Date::midnight)
                .unwrap_or(PrimitiveDateTime::MAX),
            DatePrecision::Month => {
                let (year, month) = match date.month() {
                    Month::December => (date.year() + 1, Month::January),
                    m => (date.year(), m.next()),
                };
                Date::from_calendar_date(year, month, 1)
                    .map(Date::midnight)
                    .unwrap_or(PrimitiveDateTime::MAX)
            }
            DatePrecision::Day => self.value + Duration::days(1),
            DatePrecision::Minute => self.value + Duration::minutes(1),
            DatePrecision::Second => self.value + Duration::seconds(1),
            DatePrecision::Millisecond => self.value + Duration::milliseconds(1),
        }
    }

    /// Resolve the civil value against the literal's zone.
    pub fn instant(&self) -> OffsetDateTime {
        self.value.assume_offset(self.resolved_offset())
    }

    /// [`Self::range_low_incl`] resolved to an instant.
    pub fn range_low_instant(&self) -> OffsetDateTime {
        self.range_low_incl().assume_offset(self.resolved_offset())
    }

    /// [`Self::range_high_excl`] resolved to an instant.
    pub fn range_high_instant(&self) -> OffsetDateTime {
        self.range_high_excl().assume_offset(self.resolved_offset())
    }

    /// Zoneless literals resolve to the process-local offset, falling back to
    /// UTC when the platform cannot report one.
    fn resolved_offset(&self) -> UtcOffset {
        match self.zone {
            ZoneSpec::Utc => UtcOffset::UTC,
            ZoneSpec::Offset(offset) => offset,
            ZoneSpec::Local => UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }
}

impl FromStr for FhirDateTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = DATE_LITERAL_REGEX
            .captures(s)
            .ok_or_else(|| CoreError::invalid_date(s))?;

        let year: i32 = caps["year"]
            .parse()
            .map_err(|_| CoreError::invalid_date(s))?;
        let month = caps.name("month").map(|m| m.as_str());
        let day = caps.name("day").map(|m| m.as_str());
        let hour = caps.name("hour").map(|m| m.as_str());
        let minute = caps.name("minute").map(|m| m.as_str());
        let second = caps.name("second").map(|m| m.as_str());
        let frac = caps.name("frac").map(|m| m.as_str());

        // A time requires a full calendar date before it.
        if hour.is_some() && day.is_none() {
            return Err(CoreError::invalid_date(s));
        }

        let precision = if frac.is_some() {
            DatePrecision::Millisecond
        } else if second.is_some() {
            DatePrecision::Second
        } else if hour.is_some() && minute.is_some() {
            DatePrecision::Minute
        } else if day.is_some() {
            DatePrecision::Day
        } else if month.is_some() {
            DatePrecision::Month
        } else {
            DatePrecision::Year
        };

        let month_number: u8 = parse_component(month, 1, s)?;
        let month = Month::try_from(month_number).map_err(|_| CoreError::invalid_date(s))?;
        let day: u8 = parse_component(day, 1, s)?;
        let date = Date::from_calendar_date(year, month, day)
            .map_err(|_| CoreError::invalid_date(s))?;

        let time = if precision >= DatePrecision::Minute {
            let hour: u8 = parse_component(hour, 0, s)?;
            let minute: u8 = parse_component(minute, 0, s)?;
            let second: u8 = parse_component(second, 0, s)?;
            Time::from_hms_milli(hour, minute, second, frac.map_or(Ok(0), parse_millis)?)
                .map_err(|_| CoreError::invalid_date(s))?
        } else {
            Time::MIDNIGHT
        };

        // A zone is only meaningful when the literal carries a time component;
        // day-or-coarser literals denote local calendar ranges.
        let zone = if precision >= DatePrecision::Minute {
            match caps.name("zone").map(|m| m.as_str()) {
                None => ZoneSpec::Local,
                Some("Z") => ZoneSpec::Utc,
                Some(offset) => ZoneSpec::Offset(parse_offset(offset, s)?),
            }
        } else {
            ZoneSpec::Local
        };

        Ok(FhirDateTime {
            value: PrimitiveDateTime::new(date, time),
            precision,
            zone,
        })
    }
}

fn parse_component(text: Option<&str>, default: u8, literal: &str) -> Result<u8> {
    match text {
        Some(t) => t.parse().map_err(|_| CoreError::invalid_date(literal)),
        None => Ok(default),
    }
}

/// Fractional seconds are truncated to milliseconds; short fractions are
/// right-padded (`.9` is 900ms, `.09` is 90ms).
fn parse_millis(frac: &str) -> Result<u16> {
    let digits: String = frac.chars().take(3).collect();
    let n: u16 = digits.parse().map_err(|_| CoreError::invalid_date(frac))?;
    Ok(match digits.len() {
        1 => n * 100,
        2 => n * 10,
        _ => n,
    })
}

fn parse_offset(text: &str, literal: &str) -> Result<UtcOffset> {
    let negative = text.starts_with('-');
    let (hours, minutes) = text[1..]
        .split_once(':')
        .ok_or_else(|| CoreError::invalid_date(literal))?;
    let mut hours: i8 = hours.parse().map_err(|_| CoreError::invalid_date(literal))?;
    let mut minutes: i8 = minutes
        .parse()
        .map_err(|_| CoreError::invalid_date(literal))?;
    if negative {
        hours = -hours;
        minutes = -minutes;
    }
    UtcOffset::from_hms(hours, minutes, 0).map_err(|_| CoreError::invalid_date(literal))
}

impl fmt::Display for FhirDateTime {
    /// Reproduces the source literal: precision decides how many components
    /// are written, and the zone is only emitted for minute-or-finer values
    /// (a local zone stays implicit).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.value.date();
        write!(f, "{:04}", date.year())?;
        if self.precision >= DatePrecision::Month {
            write!(f, "-{:02}", u8::from(date.month()))?;
        }
        if self.precision >= DatePrecision::Day {
            write!(f, "-{:02}", date.day())?;
        }
        if self.precision >= DatePrecision::Minute {
            let time = self.value.time();
            write!(f, "T{:02}:{:02}", time.hour(), time.minute())?;
            if self.precision >= DatePrecision::Second {
                write!(f, ":{:02}", time.second())?;
            }
            if self.precision >= DatePrecision::Millisecond {
                write!(f, ".{:03}", time.millisecond())?;
            }
            match self.zone {
                ZoneSpec::Local => {}
                ZoneSpec::Utc => f.write_str("Z")?,
                ZoneSpec::Offset(offset) => {
                    let total = offset.whole_minutes();
                    let sign = if total < 0 { '-' } else { '+' };
                    let abs = total.unsigned_abs();
                    write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)?;
                }
            }
        }
        Ok(())
    }
}

impl Serialize for FhirDateTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FhirDateTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FhirDateTime::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn parse(s: &str) -> FhirDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_millisecond_precision_with_offset() {
        let d = parse("2013-01-02T12:13:14.999-07:00");
        assert_eq!(d.precision(), DatePrecision::Millisecond);
        assert_eq!(d.value(), datetime!(2013-01-02 12:13:14.999));
        assert_eq!(d.zone(), ZoneSpec::Offset(UtcOffset::from_hms(-7, 0, 0).unwrap()));
        assert_eq!(d.to_string(), "2013-01-02T12:13:14.999-07:00");
        assert_eq!(d.instant(), datetime!(2013-01-02 12:13:14.999 -7));
        assert_eq!(d.range_low_instant(), datetime!(2013-01-02 12:13:14.999 -7));
        assert_eq!(d.range_high_instant(), datetime!(2013-01-02 12:13:15 -7));
    }

    #[test]
    fn test_millisecond_precision_utc() {
        let d = parse("2013-01-02T12:13:14.999Z");
        assert_eq!(d.precision(), DatePrecision::Millisecond);
        assert_eq!(d.zone(), ZoneSpec::Utc);
        assert_eq!(d.to_string(), "2013-01-02T12:13:14.999Z");
        assert_eq!(d.instant(), datetime!(2013-01-02 12:13:14.999 UTC));
        assert_eq!(d.range_high_instant(), datetime!(2013-01-02 12:13:15 UTC));
    }

    #[test]
    fn test_millisecond_precision_local() {
        let d = parse("2013-01-02T12:13:14.999");
        assert_eq!(d.precision(), DatePrecision::Millisecond);
        assert_eq!(d.zone(), ZoneSpec::Local);
        assert_eq!(d.value(), datetime!(2013-01-02 12:13:14.999));
        // No zone suffix on a local literal.
        assert_eq!(d.to_string(), "2013-01-02T12:13:14.999");
    }

    #[test]
    fn test_fraction_truncation_and_padding() {
        let d = parse("2013-01-02T12:13:14.9");
        assert_eq!(d.value(), datetime!(2013-01-02 12:13:14.900));
        assert_eq!(d.to_string(), "2013-01-02T12:13:14.900");
        assert_eq!(d.range_high_excl(), datetime!(2013-01-02 12:13:14.901));

        let d = parse("2013-01-02T12:13:14.09");
        assert_eq!(d.value(), datetime!(2013-01-02 12:13:14.090));
        assert_eq!(d.to_string(), "2013-01-02T12:13:14.090");

        let d = parse("2013-01-02T12:13:14.009");
        assert_eq!(d.value(), datetime!(2013-01-02 12:13:14.009));
        assert_eq!(d.to_string(), "2013-01-02T12:13:14.009");
        assert_eq!(d.range_high_excl(), datetime!(2013-01-02 12:13:14.010));

        // Sub-millisecond digits are discarded, not rounded.
        let d = parse("2013-01-02T12:13:14.987654321");
        assert_eq!(d.value(), datetime!(2013-01-02 12:13:14.987));
        assert_eq!(d.to_string(), "2013-01-02T12:13:14.987");
        assert_eq!(d.range_high_excl(), datetime!(2013-01-02 12:13:14.988));
    }

    #[test]
    fn test_second_precision() {
        let d = parse("2013-01-02T12:13:14-07:00");
        assert_eq!(d.precision(), DatePrecision::Second);
        assert_eq!(d.to_string(), "2013-01-02T12:13:14-07:00");
        assert_eq!(d.range_high_instant(), datetime!(2013-01-02 12:13:15 -7));

        let d = parse("2013-01-02T12:13:14Z");
        assert_eq!(d.precision(), DatePrecision::Second);
        assert_eq!(d.to_string(), "2013-01-02T12:13:14Z");

        let d = parse("2013-01-02T12:13:14");
        assert_eq!(d.precision(), DatePrecision::Second);
        assert_eq!(d.zone(), ZoneSpec::Local);
        assert_eq!(d.value(), datetime!(2013-01-02 12:13:14));
        assert_eq!(d.range_high_excl(), datetime!(2013-01-02 12:13:15));
    }

    #[test]
    fn test_minute_precision() {
        let d = parse("2013-01-02T12:13-07:00");
        assert_eq!(d.precision(), DatePrecision::Minute);
        assert_eq!(d.value(), datetime!(2013-01-02 12:13));
        assert_eq!(d.to_string(), "2013-01-02T12:13-07:00");
        assert_eq!(d.range_high_instant(), datetime!(2013-01-02 12:14 -7));

        let d = parse("2013-01-02T12:13Z");
        assert_eq!(d.to_string(), "2013-01-02T12:13Z");
        assert_eq!(d.range_high_instant(), datetime!(2013-01-02 12:14 UTC));

        let d = parse("2013-01-02T12:13");
        assert_eq!(d.zone(), ZoneSpec::Local);
        assert_eq!(d.to_string(), "2013-01-02T12:13");
    }

    // FHIR requires minutes whenever hours are present, so hours-only is invalid.
    #[test]
    fn test_hours_only_is_invalid() {
        assert!("2013-01-02T12".parse::<FhirDateTime>().is_err());
    }

    #[test]
    fn test_day_precision_ignores_zone() {
        // A zone on a date-only literal is discarded.
        let d = parse("2013-01-02T-07:00");
        assert_eq!(d.precision(), DatePrecision::Day);
        assert_eq!(d.zone(), ZoneSpec::Local);
        assert_eq!(d.value(), datetime!(2013-01-02 0:00));
        assert_eq!(d.to_string(), "2013-01-02");

        let d = parse("2013-01-02Z");
        assert_eq!(d.precision(), DatePrecision::Day);
        assert_eq!(d.zone(), ZoneSpec::Local);
        assert_eq!(d.to_string(), "2013-01-02");

        let d = parse("2013-01-02");
        assert_eq!(d.precision(), DatePrecision::Day);
        assert_eq!(d.range_low_incl(), datetime!(2013-01-02 0:00));
        assert_eq!(d.range_high_excl(), datetime!(2013-01-03 0:00));
    }

    #[test]
    fn test_month_precision() {
        for literal in ["2013-01T-07:00", "2013-01Z", "2013-01"] {
            let d = parse(literal);
            assert_eq!(d.precision(), DatePrecision::Month);
            assert_eq!(d.value(), datetime!(2013-01-01 0:00));
            assert_eq!(d.to_string(), "2013-01");
            assert_eq!(d.range_high_excl(), datetime!(2013-02-01 0:00));
        }
    }

    #[test]
    fn test_month_rollover_at_year_end() {
        let d = parse("2013-12");
        assert_eq!(d.range_high_excl(), datetime!(2014-01-01 0:00));
    }

    #[test]
    fn test_year_precision() {
        for literal in ["2013T-07:00", "2013Z", "2013"] {
            let d = parse(literal);
            assert_eq!(d.precision(), DatePrecision::Year);
            assert_eq!(d.value(), datetime!(2013-01-01 0:00));
            assert_eq!(d.to_string(), "2013");
            assert_eq!(d.range_high_excl(), datetime!(2014-01-01 0:00));
        }
    }

    #[test]
    fn test_leap_and_non_leap_years() {
        // Non-leap year
        let d = parse("1995-02-28");
        assert_eq!(d.range_high_excl(), datetime!(1995-03-01 0:00));

        // Leap year
        let d = parse("1996-02-28");
        assert_eq!(d.range_high_excl(), datetime!(1996-02-29 0:00));

        // Centurial non-leap year
        let d = parse("1900-02-28");
        assert_eq!(d.range_high_excl(), datetime!(1900-03-01 0:00));

        // Centurial leap year (divisible by 400)
        let d = parse("2000-02-28");
        assert_eq!(d.range_high_excl(), datetime!(2000-02-29 0:00));
    }

    #[test]
    fn test_range_monotonicity() {
        for literal in [
            "2013",
            "2013-01",
            "2013-01-02",
            "2013-01-02T12:13",
            "2013-01-02T12:13:14",
            "2013-01-02T12:13:14.999",
        ] {
            let d = parse(literal);
            assert!(d.range_low_incl() < d.range_high_excl(), "{literal}");
        }
    }

    #[test]
    fn test_display_roundtrip() {
        for literal in [
            "2013",
            "2013-01",
            "2013-01-02",
            "2013-01-02T12:13",
            "2013-01-02T12:13Z",
            "2013-01-02T12:13:14+05:30",
            "2013-01-02T12:13:14.050-07:00",
        ] {
            let d = parse(literal);
            assert_eq!(d.to_string(), literal);
            assert_eq!(parse(&d.to_string()), d);
        }
    }

    #[test]
    fn test_invalid_literals() {
        for literal in [
            "",
            "abc",
            "2013-1-2",
            "2013-01-02T12",
            "2013-13-01",
            "2013-02-30",
            "2013-01-02T25:00",
            "2013-01-02 12:13",
            "2013T12:13",
            "2013-01T12:13",
        ] {
            assert!(literal.parse::<FhirDateTime>().is_err(), "{literal}");
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let d = parse("2013-01-02T12:13:14.999-07:00");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2013-01-02T12:13:14.999-07:00\"");
        let back: FhirDateTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
