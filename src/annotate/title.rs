use super::layout::{MONTH_RE, YEAR_RE};
use super::Mark;
use crate::theme::{ColorConfig, Role};

/// Whether `line` is a title line: either it names a month, or its only
/// content is a four-digit year (the banner above a year view)
pub(super) fn is_title_line(line: &str) -> bool {
    MONTH_RE.is_match(line) || is_year_banner(line)
}

fn is_year_banner(line: &str) -> bool {
    let s = line.trim();
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Color month names with the title color and years with the secondary title
/// color
pub(super) fn title_marks(lines: &[&str], colors: &ColorConfig) -> Vec<Mark> {
    let month_tag = colors.tag(Role::Title);
    let year_tag = colors.tag(Role::Year);
    let mut marks = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if !is_title_line(line) {
            continue;
        }
        for m in MONTH_RE.find_iter(line) {
            marks.push(Mark::new(i, m.range(), month_tag.clone()));
        }
        for m in YEAR_RE.find_iter(line) {
            marks.push(Mark::new(i, m.range(), year_tag.clone()));
        }
    }
    marks
}
