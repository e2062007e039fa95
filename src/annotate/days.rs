use super::layout::{column_of, column_range, digit_tokens, find_day, month_abbrev, MONTH_RE};
use super::Mark;
use crate::args::Period;
use crate::holidays::Holiday;
use crate::markup::Tag;
use crate::theme::{ColorConfig, Role};
use std::collections::BTreeSet;
use time::{Date, Month};

/// Location of a day number within calendar text
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DaySpan {
    line: usize,
    start: usize,
    len: usize,
}

impl DaySpan {
    fn into_mark(self, tag: Tag) -> Mark {
        Mark::new(self.line, self.start..(self.start + self.len), tag)
    }
}

/// Mark every date inside the displayed period that has at least one holiday
pub(super) fn holiday_marks(
    lines: &[&str],
    period: Period,
    holidays: &[Holiday],
    colors: &ColorConfig,
) -> Vec<Mark> {
    let tag = colors.tag(Role::Holiday);
    let mut seen = BTreeSet::new();
    holidays
        .iter()
        .filter(|h| period.contains(h.date) && seen.insert(h.date))
        .filter_map(|h| {
            let span = locate(lines, period, h.date);
            if span.is_none() {
                log::debug!("Could not find {} in calendar", h.date);
            }
            span
        })
        .map(|span| span.into_mark(tag.clone()))
        .collect()
}

/// Mark today's date, provided the calendar mentions both the current year
/// and the current month and the period contains today
pub(super) fn today_mark(
    lines: &[&str],
    period: Period,
    today: Date,
    colors: &ColorConfig,
) -> Option<Mark> {
    let year = today.year().to_string();
    let abbrev = month_abbrev(today.month());
    let mentioned = lines.iter().any(|ln| ln.contains(&year))
        && lines.iter().any(|ln| ln.contains(abbrev));
    if !mentioned || !period.contains(today) {
        return None;
    }
    let span = if period.is_year_view() {
        locate_in_year(lines, today.month(), today.day())
            .or_else(|| nth_occurrence(lines, today.day(), occurrence_index(today)))
    } else {
        nth_occurrence(lines, today.day(), 1)
    };
    Some(span?.into_mark(colors.tag(Role::Today)))
}

fn locate(lines: &[&str], period: Period, date: Date) -> Option<DaySpan> {
    if period.is_year_view() {
        locate_in_year(lines, date.month(), date.day())
    } else {
        nth_occurrence(lines, date.day(), 1)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum YearScan {
    SeekingTitle,
    SeekingDay { column: usize },
}

/// Find `day` of `month` in a year view.  The line naming the month fixes
/// which month block to search, and only that block of the following lines is
/// searched, so that a day number shared by the months beside it is never
/// matched.
fn locate_in_year(lines: &[&str], month: Month, day: u8) -> Option<DaySpan> {
    let abbrev = month_abbrev(month);
    let mut state = YearScan::SeekingTitle;
    for (i, line) in lines.iter().enumerate() {
        if MONTH_RE.is_match(line) {
            // A new row of month blocks starts here
            state = match MONTH_RE
                .find_iter(line)
                .find(|m| m.as_str().starts_with(abbrev))
            {
                Some(m) => YearScan::SeekingDay {
                    column: column_of(m.start()),
                },
                None => YearScan::SeekingTitle,
            };
        } else if let YearScan::SeekingDay { column } = state {
            if let Some(start) = find_day(line, day, &column_range(column)) {
                return Some(DaySpan {
                    line: i,
                    start,
                    len: day_len(day),
                });
            }
        }
    }
    None
}

/// Find the `n`th (1-based) whole-token occurrence of `day`, scanning line by
/// line
fn nth_occurrence(lines: &[&str], day: u8, n: usize) -> Option<DaySpan> {
    let needle = day.to_string();
    lines
        .iter()
        .enumerate()
        .flat_map(|(i, line)| digit_tokens(line).map(move |(start, tok)| (i, start, tok)))
        .filter(|&(_, _, tok)| tok == needle)
        .nth(n.checked_sub(1)?)
        .map(|(line, start, tok)| DaySpan {
            line,
            start,
            len: tok.len(),
        })
}

/// The 1-based position of `date`'s month among the months of its year that
/// have a day numbered `date.day()`.  Days 1 through 28 occur in every month,
/// so for them this is the month number.
pub(super) fn occurrence_index(date: Date) -> usize {
    (1..=u8::from(date.month()))
        .filter_map(|m| Month::try_from(m).ok())
        .filter(|&m| Date::from_calendar_date(date.year(), m, date.day()).is_ok())
        .count()
}

fn day_len(day: u8) -> usize {
    if day < 10 {
        1
    } else {
        2
    }
}
