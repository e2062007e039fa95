use crate::args::Period;
use std::ffi::OsString;
use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Something that can produce the plain-text calendar for a period
pub(crate) trait CalendarSource {
    fn fetch(&self, period: Period) -> Result<String, CalError>;
}

/// Runs the system's `cal` utility
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SystemCal {
    program: OsString,
}

impl SystemCal {
    pub(crate) fn new() -> SystemCal {
        SystemCal::with_program("cal")
    }

    pub(crate) fn with_program<S: Into<OsString>>(program: S) -> SystemCal {
        SystemCal {
            program: program.into(),
        }
    }
}

impl Default for SystemCal {
    fn default() -> SystemCal {
        SystemCal::new()
    }
}

impl CalendarSource for SystemCal {
    fn fetch(&self, period: Period) -> Result<String, CalError> {
        let args = period.cal_args();
        log::debug!("Running {:?} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(&args)
            // Month names are matched against the English list
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CalError::Spawn {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            return Err(CalError::InvalidArgument(stderr.trim().to_owned()));
        }
        if !output.status.success() {
            return Err(CalError::InvalidArgument(format!(
                "{} exited unsuccessfully: {}",
                self.program.to_string_lossy(),
                output.status
            )));
        }
        let stdout = String::from_utf8(output.stdout).map_err(|_| CalError::Encoding)?;
        Ok(strip_overstrike(&stdout))
    }
}

/// Remove backspace overstrikes (`_\x08X`, `X\x08X`) that some `cal` builds
/// use to highlight the current day
fn strip_overstrike(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch == '\x08' {
            out.pop();
        } else {
            out.push(ch);
        }
    }
    out
}

#[derive(Debug, Error)]
pub(crate) enum CalError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("calendar output was not valid UTF-8")]
    Encoding,
}
