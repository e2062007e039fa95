use thiserror::Error;
use time::{Date, Month};

/// Smallest accepted year; there is no upper bound here, `cal` decides
const MIN_YEAR: i32 = 1;

/// Values below this are months; values at or above it are years
const YEAR_THRESHOLD: i64 = 100;

/// The span of time shown by a calendar
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Period {
    Month { year: i32, month: Month },
    Year(i32),
}

impl Period {
    /// Normalize zero, one, or two command-line values into a `Period`.
    ///
    /// - No values: the month containing `today`
    /// - One value of at least 100: that whole year
    /// - One value below 100: that month of the current year
    /// - Two values, in either order: the smaller is the month, the larger
    ///   the year
    pub(crate) fn from_args<S: AsRef<str>>(values: &[S], today: Date) -> Result<Period, ArgError> {
        let mut numbers = values
            .iter()
            .map(|v| parse_number(v.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        numbers.sort_unstable();
        match numbers[..] {
            [] => Ok(Period::Month {
                year: today.year(),
                month: today.month(),
            }),
            [n] if n >= YEAR_THRESHOLD => Ok(Period::Year(check_year(n)?)),
            [n] => Ok(Period::Month {
                year: today.year(),
                month: check_month(n)?,
            }),
            [m, y] => Ok(Period::Month {
                year: check_year(y)?,
                month: check_month(m)?,
            }),
            _ => Err(ArgError::TooMany(numbers.len())),
        }
    }

    pub(crate) fn is_year_view(self) -> bool {
        matches!(self, Period::Year(_))
    }

    pub(crate) fn contains(self, date: Date) -> bool {
        match self {
            Period::Month { year, month } => date.year() == year && date.month() == month,
            Period::Year(year) => date.year() == year,
        }
    }

    /// First and last days of the period, inclusive
    pub(crate) fn bounds(self) -> Result<(Date, Date), time::error::ComponentRange> {
        match self {
            Period::Month { year, month } => {
                let first = Date::from_calendar_date(year, month, 1)?;
                let next = month.next();
                let last = if next == Month::January {
                    Date::from_calendar_date(year, Month::December, 31)?
                } else {
                    Date::from_calendar_date(year, next, 1)?
                        .previous_day()
                        .unwrap_or(first)
                };
                Ok((first, last))
            }
            Period::Year(year) => Ok((
                Date::from_calendar_date(year, Month::January, 1)?,
                Date::from_calendar_date(year, Month::December, 31)?,
            )),
        }
    }

    /// Arguments to pass to `cal` in order to display this period
    pub(crate) fn cal_args(self) -> Vec<String> {
        match self {
            Period::Month { year, month } => vec![u8::from(month).to_string(), year.to_string()],
            Period::Year(year) => vec![year.to_string()],
        }
    }
}

fn parse_number(value: &str) -> Result<i64, ArgError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ArgError::NotANumber(value.to_owned()))
}

fn check_month(n: i64) -> Result<Month, ArgError> {
    u8::try_from(n)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or(ArgError::InvalidMonth(n))
}

fn check_year(n: i64) -> Result<i32, ArgError> {
    i32::try_from(n)
        .ok()
        .filter(|&y| y >= MIN_YEAR)
        .ok_or(ArgError::InvalidYear(n))
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ArgError {
    #[error("invalid argument: {0:?} is not a number")]
    NotANumber(String),
    #[error("invalid argument: {0} is not a month number (1..12)")]
    InvalidMonth(i64),
    #[error("invalid argument: year {0} is not a positive year")]
    InvalidYear(i64),
    #[error("invalid argument: expected at most two values, got {0}")]
    TooMany(usize),
}
