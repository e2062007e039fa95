use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use time::Month;

/// Width of one month block, including the gutter to its right
pub(super) const UNIT_WIDTH: usize = 22;

/// Maximum number of month blocks side by side in a year view
pub(super) const COLUMNS: usize = 3;

/// Offset of the Sunday column within a month block
pub(super) const SUNDAY_OFFSET: usize = 0;

/// Offset of the Saturday column within a month block
pub(super) const SATURDAY_OFFSET: usize = 18;

static MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Full or abbreviated English month names
pub(super) static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:{})[a-z]*\b", MONTH_ABBREVS.join("|")))
        .expect("month regex should be valid")
});

pub(super) static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{4}\b").expect("year regex should be valid"));

pub(super) fn month_abbrev(month: Month) -> &'static str {
    MONTH_ABBREVS[usize::from(u8::from(month)) - 1]
}

/// Index of the month block that the given offset falls in
pub(super) fn column_of(offset: usize) -> usize {
    (offset / UNIT_WIDTH).min(COLUMNS - 1)
}

/// Byte range covered by month block `column`.  The last block extends to
/// the end of the line.
pub(super) fn column_range(column: usize) -> Range<usize> {
    let start = column * UNIT_WIDTH;
    if column + 1 >= COLUMNS {
        start..usize::MAX
    } else {
        start..(start + UNIT_WIDTH)
    }
}

/// Iterate over the maximal runs of ASCII digits in `line`, yielding each
/// run's starting offset and text
pub(super) fn digit_tokens(line: &str) -> DigitTokens<'_> {
    DigitTokens { line, pos: 0 }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct DigitTokens<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Iterator for DigitTokens<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<(usize, &'a str)> {
        let bytes = self.line.as_bytes();
        let start = self.pos + bytes.get(self.pos..)?.iter().position(u8::is_ascii_digit)?;
        let len = bytes[start..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(bytes.len() - start);
        self.pos = start + len;
        Some((start, &self.line[start..self.pos]))
    }
}

/// Find the day number `day` as a whole token starting within `range`
pub(super) fn find_day(line: &str, day: u8, range: &Range<usize>) -> Option<usize> {
    let needle = day.to_string();
    digit_tokens(line)
        .find(|&(start, tok)| range.contains(&start) && tok == needle)
        .map(|(start, _)| start)
}
