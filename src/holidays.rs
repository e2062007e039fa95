use crate::args::Period;
use crate::markup::Output;
use crate::theme::{ColorConfig, Role};
use icalendar::{Calendar, CalendarComponent, Component, Property};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

static ICS_DATE_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year][month][day]");

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

static MONTH_FMT: &[BorrowedFormatItem<'_>] = format_description!("[month repr:short]");

/// Number of holidays listed per line in the year-view listing
const LISTING_COLUMNS: usize = 3;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Holiday {
    pub(crate) date: Date,
    pub(crate) label: String,
}

impl Holiday {
    pub(crate) fn new(date: Date, label: &str) -> Holiday {
        Holiday {
            date,
            label: label.to_owned(),
        }
    }
}

/// A source of holidays for a country
pub(crate) trait HolidayFeed {
    /// Return the holidays for `country` falling between `start` and `end`,
    /// inclusive, sorted by date
    fn fetch(&self, country: &str, start: Date, end: Date) -> Result<Vec<Holiday>, FeedError>;
}

/// Holiday settings supplied alongside a feed
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct HolidayOptions {
    pub(crate) country: String,
    /// List the holidays below the calendar
    pub(crate) verbose: bool,
}

/// Reads holidays from `<dir>/<country>.ics` iCalendar files
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct IcsFeed {
    dir: PathBuf,
}

impl IcsFeed {
    pub(crate) fn new<P: Into<PathBuf>>(dir: P) -> IcsFeed {
        IcsFeed { dir: dir.into() }
    }

    fn path_for(&self, country: &str) -> PathBuf {
        self.dir.join(format!("{country}.ics"))
    }
}

impl HolidayFeed for IcsFeed {
    fn fetch(&self, country: &str, start: Date, end: Date) -> Result<Vec<Holiday>, FeedError> {
        let path = self.path_for(country);
        log::debug!(
            "Reading holidays for {country} from {} to {} out of {}",
            fmt_ymd(start),
            fmt_ymd(end),
            path.display()
        );
        let raw = fs::read_to_string(&path).map_err(|source| FeedError::Read {
            path: path.clone(),
            source,
        })?;
        let mut holidays = parse_ics(&raw).map_err(|msg| FeedError::Parse {
            path: path.clone(),
            msg,
        })?;
        holidays.retain(|h| start <= h.date && h.date <= end);
        holidays.sort();
        log::debug!("Found {} holidays in {}", holidays.len(), path.display());
        Ok(holidays)
    }
}

/// Extract the start date & summary of every event in an iCalendar document.
/// Events without a usable start date are skipped.
fn parse_ics(raw: &str) -> Result<Vec<Holiday>, String> {
    let calendar: Calendar = raw.parse()?;
    let mut holidays = Vec::new();
    for component in &calendar.components {
        let CalendarComponent::Event(event) = component else {
            continue;
        };
        let Some(dtstart) = event.properties().get("DTSTART").map(Property::value) else {
            continue;
        };
        // Date-times (e.g., "20110101T000000Z") are reduced to their date
        let Some(date) = dtstart
            .get(..8)
            .and_then(|s| Date::parse(s, &ICS_DATE_FMT).ok())
        else {
            log::debug!("Skipping event with unparseable DTSTART {dtstart:?}");
            continue;
        };
        let label = event.get_summary().unwrap_or_default().trim();
        holidays.push(Holiday::new(date, label));
    }
    Ok(holidays)
}

/// Fetch the holidays in `period`, sorted by date, logging failures and
/// treating them as "no holidays"
pub(crate) fn holidays_in<F: HolidayFeed>(
    feed: &F,
    options: &HolidayOptions,
    period: Period,
) -> Vec<Holiday> {
    let (start, end) = match period.bounds() {
        Ok(bounds) => bounds,
        Err(e) => {
            log::warn!("Cannot compute date range for {period:?}: {e}");
            return Vec::new();
        }
    };
    match feed.fetch(&options.country, start, end) {
        Ok(mut holidays) => {
            holidays.sort();
            holidays
        }
        Err(e) => {
            log::warn!("Failed to fetch holidays for {}: {e}", options.country);
            Vec::new()
        }
    }
}

/// Format holidays as lines of the form `<month><day>: <label>`, three to a
/// line, or one to a line when a single month is displayed.  Only the month
/// and day are colored; labels are copied as-is so that text in them is
/// never taken for markup.
pub(crate) fn listing(
    holidays: &[Holiday],
    period: Period,
    colors: &ColorConfig,
    output: Output,
) -> String {
    let month_tag = colors.tag(Role::Year);
    let day_tag = colors.tag(Role::Title);
    let per_line = if period.is_year_view() {
        LISTING_COLUMNS
    } else {
        1
    };
    holidays
        .chunks(per_line)
        .map(|chunk| {
            let entries = chunk
                .iter()
                .map(|h| {
                    let month = h
                        .date
                        .format(&MONTH_FMT)
                        .unwrap_or_else(|_| u8::from(h.date.month()).to_string());
                    let heading = output.render(&format!(
                        "{}{}",
                        month_tag.wrap(&month),
                        day_tag.wrap(&format!("{:2}", h.date.day()))
                    ));
                    format!("{heading}: {}", h.label)
                })
                .collect::<Vec<_>>();
            format!("{}\n", entries.join("   "))
        })
        .collect()
}

fn fmt_ymd(date: Date) -> String {
    date.format(&YMD_FMT).unwrap_or_else(|_| date.to_string())
}

#[derive(Debug, Error)]
pub(crate) enum FeedError {
    #[error("failed to read holiday feed {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse holiday feed {}: {msg}", .path.display())]
    Parse { path: PathBuf, msg: String },
}
