//! Overlaying color markup onto the plain text printed by `cal`.
//!
//! Every pass inspects the unmodified text and reports the spans it wants
//! colored as [`Mark`]s, so that column arithmetic in one pass is never thrown
//! off by markup inserted for another.  The marks are then converted into
//! opening & closing tags and spliced into each line from right to left.
mod days;
mod layout;
mod title;
mod weekend;
use self::days::{holiday_marks, today_mark};
use self::title::title_marks;
use self::weekend::weekend_marks;
use crate::args::Period;
use crate::holidays::Holiday;
use crate::markup::Tag;
use crate::theme::ColorConfig;
use std::ops::Range;
use time::Date;

/// What, besides the calendar text itself, to highlight
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Annotations<'a> {
    pub(crate) period: Period,
    pub(crate) today: Date,
    pub(crate) holidays: &'a [Holiday],
    pub(crate) colors: &'a ColorConfig,
}

impl Annotations<'_> {
    /// Return `text` with color tags inserted.  Line count and the text
    /// outside the tags are unchanged.
    pub(crate) fn apply(&self, text: &str) -> String {
        let lines = text.split('\n').collect::<Vec<_>>();
        // Marks pushed earlier enclose later marks covering the same text
        let mut marks = weekend_marks(&lines, self.colors);
        marks.extend(title_marks(&lines, self.colors));
        marks.extend(holiday_marks(
            &lines,
            self.period,
            self.holidays,
            self.colors,
        ));
        marks.extend(today_mark(&lines, self.period, self.today, self.colors));
        apply_marks(&lines, &marks).join("\n")
    }
}

/// A request to wrap `len` bytes of line `line`, starting at `start`, in
/// `tag`
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Mark {
    line: usize,
    start: usize,
    len: usize,
    tag: Tag,
}

impl Mark {
    pub(crate) fn new(line: usize, range: Range<usize>, tag: Tag) -> Mark {
        Mark {
            line,
            start: range.start,
            len: range.end.saturating_sub(range.start),
            tag,
        }
    }

    fn end(&self) -> usize {
        self.start + self.len
    }
}

/// An opening or closing tag to insert at byte offset `pos`.  Sorting
/// `Insertion`s puts tags at the same offset in output order: closing tags
/// before opening tags, inner closing tags before outer ones, and outer
/// opening tags before inner ones.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
struct Insertion {
    pos: usize,
    opening: bool,
    rank: (usize, usize),
    text: String,
}

fn apply_marks(lines: &[&str], marks: &[Mark]) -> Vec<String> {
    let mut edits = vec![Vec::new(); lines.len()];
    for (order, mark) in marks.iter().enumerate() {
        let Some(line) = lines.get(mark.line) else {
            continue;
        };
        if mark.len == 0 || line.get(mark.start..mark.end()).is_none() {
            continue;
        }
        let Some(slot) = edits.get_mut(mark.line) else {
            continue;
        };
        slot.push(Insertion {
            pos: mark.start,
            opening: true,
            rank: (usize::MAX - mark.len, order),
            text: mark.tag.open(),
        });
        slot.push(Insertion {
            pos: mark.end(),
            opening: false,
            rank: (mark.len, usize::MAX - order),
            text: mark.tag.close(),
        });
    }
    lines
        .iter()
        .zip(edits)
        .map(|(&line, mut inserts)| {
            inserts.sort_unstable();
            let mut line = line.to_owned();
            for ins in inserts.iter().rev() {
                line.insert_str(ins.pos, &ins.text);
            }
            line
        })
        .collect()
}
