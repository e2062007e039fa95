mod annotate;
mod app;
mod args;
mod cal;
mod config;
mod holidays;
mod markup;
mod theme;
use crate::app::App;
use crate::cal::SystemCal;
use crate::config::{default_holidays_dir, Config};
use crate::holidays::{HolidayOptions, IcsFeed};
use crate::markup::Output;
use crate::theme::ColorConfig;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use thiserror::Error;
use time::OffsetDateTime;

/// Maximum number of MONTH/YEAR values
const MAX_VALUES: usize = 2;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    values: Vec<String>,
    config: Option<PathBuf>,
    colors: Vec<(String, String)>,
    country: Option<String>,
    holidays_dir: Option<PathBuf>,
    verbose: bool,
    no_color: bool,
    markup: bool,
    debug: bool,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    opts.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("color") => {
                    let value = parser.value()?.string()?;
                    match value.split_once('=') {
                        Some((role, color)) => {
                            opts.colors.push((role.to_owned(), color.to_owned()));
                        }
                        None => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(ColorSpecError),
                            })
                        }
                    }
                }
                Arg::Short('C') | Arg::Long("country") => {
                    opts.country = Some(parser.value()?.string()?);
                }
                Arg::Long("holidays-dir") => {
                    opts.holidays_dir = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('v') | Arg::Long("verbose") => opts.verbose = true,
                Arg::Long("no-color") => opts.no_color = true,
                Arg::Long("markup") => opts.markup = true,
                Arg::Long("debug") => opts.debug = true,
                Arg::Value(value) if opts.values.len() < MAX_VALUES => {
                    opts.values.push(value.string()?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                init_logging(opts.debug)?;
                let config = match &opts.config {
                    Some(path) => Config::load(path),
                    None => Config::load_default(),
                }
                .context("failed to load configuration")?;
                let colors = ColorConfig::default()
                    .with_overrides(&config.colors)
                    .with_overrides(opts.colors.iter().map(|(k, v)| (k, v)));
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let output = if opts.no_color {
                    Output::Plain
                } else if opts.markup {
                    Output::Markup
                } else {
                    Output::Ansi
                };
                let app = App::new(SystemCal::new(), colors, today).output(output);
                let rendered = match opts.country.or(config.holidays.country) {
                    Some(country) => {
                        let dir = opts
                            .holidays_dir
                            .or(config.holidays.dir)
                            .or_else(default_holidays_dir)
                            .context("could not determine holiday feed directory")?;
                        let options = HolidayOptions {
                            country,
                            verbose: opts.verbose || config.holidays.verbose,
                        };
                        app.with_holidays(IcsFeed::new(dir), options)
                            .render(&opts.values)
                    }
                    None => app.render(&opts.values),
                };
                match rendered {
                    Ok(text) => {
                        print!("{text}");
                        Ok(())
                    }
                    Err(e) if e.is_invalid_argument() => {
                        Err(anyhow::Error::new(e).context("run `calour --help` for usage"))
                    }
                    Err(e) => Err(anyhow::Error::new(e).context("failed to render calendar")),
                }
            }
            Command::Help => {
                println!("Usage: calour [OPTIONS] [MONTH] [YEAR]");
                println!();
                println!("Colorize the output of cal: weekends, titles, today, and holidays");
                println!();
                println!("A single value below 100 is a month of the current year; a single");
                println!("value of 100 or more is a whole year.");
                println!();
                println!("Options:");
                println!("  -c, --config <FILE>     Read configuration from the given file");
                println!("      --color <ROLE>=<COLOR>");
                println!("                          Set the color for title, year, today,");
                println!("                          saturday, sunday, or holiday");
                println!("  -C, --country <CODE>    Highlight the holidays of the given country");
                println!("      --holidays-dir <DIR>");
                println!("                          Read holiday feeds (<CODE>.ics) from DIR");
                println!("  -v, --verbose           List holidays below the calendar");
                println!("      --no-color          Do not colorize output");
                println!("      --markup            Print color tags instead of escape sequences");
                println!("      --debug             Emit debug logs");
                println!("  -h, --help              Display this help message and exit");
                println!("  -V, --version           Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn init_logging(debug: bool) -> anyhow::Result<()> {
    let mut builder = ConfigBuilder::new();
    let level = if debug {
        builder.set_time_level(LevelFilter::Error);
        builder.set_target_level(LevelFilter::Error);
        LevelFilter::Debug
    } else {
        builder.set_time_level(LevelFilter::Off);
        builder.set_target_level(LevelFilter::Off);
        LevelFilter::Warn
    };
    builder.set_thread_level(LevelFilter::Off);
    builder.set_location_level(LevelFilter::Off);
    TermLogger::init(
        level,
        builder.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to initialize logging")
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("expected ROLE=COLOR")]
struct ColorSpecError;

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_args(args))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(Options::default()));
    }

    #[test]
    fn test_values_and_options() {
        let cmd = parse(&[
            "--color",
            "title=blue",
            "-C",
            "ja",
            "-v",
            "5",
            "2013",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(
            cmd,
            Command::Run(Options {
                values: vec![String::from("5"), String::from("2013")],
                colors: vec![(String::from("title"), String::from("blue"))],
                country: Some(String::from("ja")),
                verbose: true,
                no_color: true,
                ..Options::default()
            })
        );
    }

    #[test]
    fn test_non_numeric_value_is_accepted_by_parser() {
        assert_eq!(
            parse(&["hello"]).unwrap(),
            Command::Run(Options {
                values: vec![String::from("hello")],
                ..Options::default()
            })
        );
    }

    #[test]
    fn test_too_many_values() {
        assert!(parse(&["1", "2", "2000"]).is_err());
    }

    #[test]
    fn test_bad_color_spec() {
        assert!(parse(&["--color", "blue"]).is_err());
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse(&["--debug", "-h"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }
}
