//! Calendar date utilities.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};

/// Calendar date without a time-of-day component.
///
/// Renders and parses as ISO `yyyy-MM-dd`, so its textual form is stable
/// enough to embed into derived identifiers.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] from the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_calendar(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day)
            .ok()
            .map(Self)
    }

    /// Returns the [`Date`] following this one.
    ///
    /// [`None`] is returned on calendar overflow.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    /// Indicates whether this [`Date`] falls on a Saturday or a Sunday.
    #[must_use]
    pub fn is_weekend(self) -> bool {
        matches!(
            self.0.weekday(),
            time::Weekday::Saturday | time::Weekday::Sunday,
        )
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day(),
        )
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ParseError as E;

        let mut parts = s.splitn(3, '-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(E::Malformed);
        };
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err(E::Malformed);
        }

        let year = year.parse::<i32>().map_err(|_| E::Malformed)?;
        let month = month.parse::<u8>().map_err(|_| E::Malformed)?;
        let day = day.parse::<u8>().map_err(|_| E::Malformed)?;

        Self::from_calendar(year, month, day).ok_or(E::OutOfRange)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// String is not shaped as `yyyy-MM-dd`.
    #[display("expected a `yyyy-MM-dd` date")]
    Malformed,

    /// Components don't form a valid calendar date.
    #[display("no such calendar date")]
    OutOfRange,
}

/// Inclusive range of [`Date`]s.
///
/// A [`Range`] whose `end` precedes its `start` is empty, not invalid:
/// iterating it yields nothing and it contains no [`Date`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Range {
    /// First [`Date`] of this [`Range`].
    pub start: Date,

    /// Last [`Date`] of this [`Range`], inclusive.
    pub end: Date,
}

impl Range {
    /// Creates a new [`Range`] between the provided [`Date`]s, inclusive.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Indicates whether this [`Range`] contains no [`Date`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Indicates whether the provided [`Date`] lies within this [`Range`].
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns an [`Iterator`] over the [`Date`]s of this [`Range`], in
    /// ascending order.
    #[must_use]
    pub fn iter(&self) -> Iter {
        Iter {
            next: (!self.is_empty()).then_some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for Range {
    type Item = Date;
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &Range {
    type Item = Date;
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// [`Iterator`] over the [`Date`]s of a [`Range`].
#[derive(Clone, Copy, Debug)]
pub struct Iter {
    /// Next [`Date`] to yield, if any.
    next: Option<Date>,

    /// Last [`Date`] to yield, inclusive.
    end: Date,
}

impl Iterator for Iter {
    type Item = Date;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.next.take()?;
        if date < self.end {
            self.next = date.next();
        }
        Some(date)
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use std::str::FromStr as _;

    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::Date;

    impl serde::Serialize for Date {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Self::from_str(&s).map_err(D::Error::custom)
        }
    }
}
