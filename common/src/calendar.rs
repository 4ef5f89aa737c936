//! Calendar [`Date`]s and [`TimeOfDay`]s.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error, From, Into};
use time::{format_description::FormatItem, macros::format_description};

use crate::DateTime;

/// Format of a [`Date`]: `YYYY-MM-DD`.
const DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Format of a [`TimeOfDay`]: `HH:MM`.
const TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour]:[minute]");

/// Calendar date without a time zone.
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Returns the current UTC [`Date`].
    #[must_use]
    pub fn today() -> Self {
        DateTime::now().date()
    }

    /// Returns the [`time::Weekday`] of this [`Date`].
    #[must_use]
    pub fn weekday(self) -> time::Weekday {
        self.0.weekday()
    }

    /// Returns the [`Date`] following this one, if representable.
    #[must_use]
    pub fn next_day(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    /// Returns the [`Date`] preceding this one, if representable.
    #[must_use]
    pub fn previous_day(self) -> Option<Self> {
        self.0.previous_day().map(Self)
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(DATE_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| ParseError::Date)
    }
}

/// Time of a day with a minute precision.
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, Ord, PartialEq, PartialOrd)]
pub struct TimeOfDay(time::Time);

impl TimeOfDay {
    /// Creates a new [`TimeOfDay`] out of the provided `hour` and `minute`.
    ///
    /// [`None`] is returned if either is out of range.
    #[must_use]
    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        time::Time::from_hms(hour, minute, 0).ok().map(Self)
    }

    /// Returns the hour of this [`TimeOfDay`].
    #[must_use]
    pub fn hour(self) -> u8 {
        self.0.hour()
    }

    /// Returns the minute of this [`TimeOfDay`].
    #[must_use]
    pub fn minute(self) -> u8 {
        self.0.minute()
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Time::parse(s, TIME_FORMAT)
            .map(Self)
            .map_err(|_| ParseError::TimeOfDay)
    }
}

/// Error of parsing a [`Date`] or a [`TimeOfDay`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// Not a `YYYY-MM-DD` date.
    #[display("expected `YYYY-MM-DD` date")]
    Date,

    /// Not a `HH:MM` time.
    #[display("expected `HH:MM` time")]
    TimeOfDay,
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in a `YYYY-MM-DD` format.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = super::Date;

    impl Date {
        fn to_output<S: ScalarValue>(d: &Date) -> Value<S> {
            Value::scalar(d.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }

    /// Time of a day in a 24-hour `HH:MM` format.
    #[graphql_scalar(with = Self, parse_token(String))]
    type TimeOfDay = super::TimeOfDay;

    impl TimeOfDay {
        fn to_output<S: ScalarValue>(t: &TimeOfDay) -> Value<S> {
            Value::scalar(t.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `TimeOfDay` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `TimeOfDay` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::{Date, ParseError, TimeOfDay};

    #[test]
    fn parses_dates() {
        let date = Date::from_str("2026-10-19").unwrap();

        assert_eq!(date.to_string(), "2026-10-19");
        assert_eq!(date.weekday(), time::Weekday::Monday);
        assert_eq!(date.next_day().unwrap().to_string(), "2026-10-20");
        assert_eq!(Date::from_str("2026-02-30"), Err(ParseError::Date));
        assert_eq!(Date::from_str("10/19/2026"), Err(ParseError::Date));
    }

    #[test]
    fn parses_times_of_day() {
        assert_eq!(
            TimeOfDay::from_str("09:00").unwrap(),
            TimeOfDay::from_hm(9, 0).unwrap(),
        );
        assert_eq!(TimeOfDay::from_hm(17, 5).unwrap().to_string(), "17:05");
        assert_eq!(TimeOfDay::from_str("24:00"), Err(ParseError::TimeOfDay));
        assert_eq!(TimeOfDay::from_str("9am"), Err(ParseError::TimeOfDay));
        assert!(TimeOfDay::from_hm(12, 60).is_none());
    }
}
