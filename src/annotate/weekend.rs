use super::layout::{COLUMNS, SATURDAY_OFFSET, SUNDAY_OFFSET, UNIT_WIDTH};
use super::title::is_title_line;
use super::Mark;
use crate::theme::{ColorConfig, Role};

/// Width of a day cell
const CELL_WIDTH: usize = 2;

/// Color the Saturday and Sunday cells of every month block on each line
/// that is neither a title line nor blank.  Cells that lie beyond the end of
/// a short line are skipped, as are cells containing only blanks.
pub(super) fn weekend_marks(lines: &[&str], colors: &ColorConfig) -> Vec<Mark> {
    // Saturday first: the larger offset within each block is handled first
    let days = [
        (SATURDAY_OFFSET, colors.tag(Role::Saturday)),
        (SUNDAY_OFFSET, colors.tag(Role::Sunday)),
    ];
    let mut marks = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() || is_title_line(line) {
            continue;
        }
        for column in (0..COLUMNS).rev() {
            for (offset, tag) in &days {
                let start = column * UNIT_WIDTH + offset;
                if start >= line.len() {
                    continue;
                }
                let end = (start + CELL_WIDTH).min(line.len());
                match line.get(start..end) {
                    Some(cell) if !cell.trim().is_empty() => {
                        marks.push(Mark::new(i, start..end, tag.clone()));
                    }
                    _ => (),
                }
            }
        }
    }
    marks
}
