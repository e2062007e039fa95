//! Inline color markup.
//!
//! Annotated calendars carry tags of the form `<green>text</green>` for
//! foreground colors and `<on_green>text</on_green>` for background colors.
//! [`Ansi`] turns them into terminal escape sequences and [`strip`] removes
//! them.
use crossterm::style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::Command;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)(on_)?([A-Za-z_]+)>").expect("tag regex should be valid")
});

/// How markup is emitted
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Output {
    /// Inline `<color>…</color>` markup
    Markup,
    /// ANSI escape sequences
    #[default]
    Ansi,
    /// No coloring at all
    Plain,
}

impl Output {
    pub(crate) fn render(self, markup: &str) -> String {
        match self {
            Output::Markup => markup.to_owned(),
            Output::Ansi => Ansi(markup).to_string(),
            Output::Plain => strip(markup),
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Tag {
    color: String,
    background: bool,
}

impl Tag {
    pub(crate) fn foreground(color: &str) -> Tag {
        Tag {
            color: color.to_owned(),
            background: false,
        }
    }

    pub(crate) fn background(color: &str) -> Tag {
        Tag {
            color: color.to_owned(),
            background: true,
        }
    }

    fn name(&self) -> String {
        if self.background {
            format!("on_{}", self.color)
        } else {
            self.color.clone()
        }
    }

    pub(crate) fn open(&self) -> String {
        format!("<{}>", self.name())
    }

    pub(crate) fn close(&self) -> String {
        format!("</{}>", self.name())
    }

    pub(crate) fn wrap(&self, text: &str) -> String {
        format!("{}{text}{}", self.open(), self.close())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Layer {
    color: Color,
    background: bool,
}

impl Layer {
    fn from_captures(caps: &Captures<'_>) -> Option<Layer> {
        let color = Color::try_from(caps.get(3)?.as_str()).ok()?;
        Some(Layer {
            color,
            background: caps.get(2).is_some(),
        })
    }

    fn write_ansi<W: fmt::Write>(self, f: &mut W) -> fmt::Result {
        if self.background {
            SetBackgroundColor(self.color).write_ansi(f)
        } else {
            SetForegroundColor(self.color).write_ansi(f)
        }
    }
}

/// Display adapter that renders markup as ANSI escape sequences.
///
/// Tags nest: closing an inner tag restores the colors of the tags that
/// enclose it.  Tags naming unknown colors and closing tags that do not match
/// the innermost open tag are passed through verbatim.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Ansi<'a>(pub(crate) &'a str);

impl fmt::Display for Ansi<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<Layer> = Vec::new();
        let mut last = 0;
        for caps in TAG_RE.captures_iter(self.0) {
            let Some(m) = caps.get(0) else {
                continue;
            };
            f.write_str(&self.0[last..m.start()])?;
            last = m.end();
            let closing = caps.get(1).is_some_and(|c| !c.as_str().is_empty());
            match Layer::from_captures(&caps) {
                Some(layer) if !closing => {
                    layer.write_ansi(f)?;
                    stack.push(layer);
                }
                Some(layer) if stack.last() == Some(&layer) => {
                    stack.pop();
                    ResetColor.write_ansi(f)?;
                    for outer in &stack {
                        outer.write_ansi(f)?;
                    }
                }
                _ => f.write_str(m.as_str())?,
            }
        }
        f.write_str(&self.0[last..])?;
        if !stack.is_empty() {
            ResetColor.write_ansi(f)?;
        }
        Ok(())
    }
}

/// Remove all tags that name a known color
pub(crate) fn strip(markup: &str) -> String {
    TAG_RE
        .replace_all(markup, |caps: &Captures<'_>| {
            if Layer::from_captures(caps).is_some() {
                String::new()
            } else {
                caps[0].to_owned()
            }
        })
        .into_owned()
}
