use crate::annotate::Annotations;
use crate::args::{ArgError, Period};
use crate::cal::{CalError, CalendarSource};
use crate::holidays::{holidays_in, listing, HolidayFeed, HolidayOptions, IcsFeed};
use crate::markup::Output;
use crate::theme::ColorConfig;
use thiserror::Error;
use time::Date;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<C, F = IcsFeed> {
    source: C,
    colors: ColorConfig,
    today: Date,
    holidays: Option<(F, HolidayOptions)>,
    output: Output,
}

impl<C: CalendarSource> App<C> {
    pub(crate) fn new(source: C, colors: ColorConfig, today: Date) -> App<C> {
        App {
            source,
            colors,
            today,
            holidays: None,
            output: Output::default(),
        }
    }
}

impl<C: CalendarSource, F: HolidayFeed> App<C, F> {
    pub(crate) fn with_holidays<G: HolidayFeed>(self, feed: G, options: HolidayOptions) -> App<C, G> {
        App {
            source: self.source,
            colors: self.colors,
            today: self.today,
            holidays: Some((feed, options)),
            output: self.output,
        }
    }

    pub(crate) fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Render the calendar for the period described by up to two
    /// month/year values
    pub(crate) fn render<S: AsRef<str>>(&self, values: &[S]) -> Result<String, RenderError> {
        let period = Period::from_args(values, self.today)?;
        log::debug!("Rendering calendar for {period:?}");
        let text = self.source.fetch(period)?;
        let holidays = match &self.holidays {
            Some((feed, options)) => holidays_in(feed, options, period),
            None => Vec::new(),
        };
        let markup = Annotations {
            period,
            today: self.today,
            holidays: &holidays,
            colors: &self.colors,
        }
        .apply(&text);
        let mut out = self.output.render(&markup);
        if self
            .holidays
            .as_ref()
            .is_some_and(|(_, options)| options.verbose)
        {
            out.push_str(&listing(&holidays, period, &self.colors, self.output));
        }
        Ok(out)
    }
}

#[derive(Debug, Error)]
pub(crate) enum RenderError {
    #[error(transparent)]
    Args(#[from] ArgError),
    #[error(transparent)]
    Cal(#[from] CalError),
}

impl RenderError {
    /// Whether the month/year values were rejected, either while being
    /// normalized or by `cal` itself
    pub(crate) fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            RenderError::Args(_) | RenderError::Cal(CalError::InvalidArgument(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::{FeedError, Holiday};
    use crossterm::style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor};
    use std::cell::RefCell;
    use time::macros::date;

    static OCTOBER_2026: &str = concat!(
        "    October 2026      \n",
        "Su Mo Tu We Th Fr Sa  \n",
        "             1  2  3  \n",
        " 4  5  6  7  8  9 10  \n",
        "11 12 13 14 15 16 17  \n",
        "18 19 20 21 22 23 24  \n",
        "25 26 27 28 29 30 31  \n",
        "                      \n",
    );

    static YEAR_2011_Q1: &str = concat!(
        "                            2011\n",
        "\n",
        "      January               February               March\n",
        "Su Mo Tu We Th Fr Sa  Su Mo Tu We Th Fr Sa  Su Mo Tu We Th Fr Sa\n",
        "                   1         1  2  3  4  5         1  2  3  4  5\n",
        " 2  3  4  5  6  7  8   6  7  8  9 10 11 12   6  7  8  9 10 11 12\n",
        " 9 10 11 12 13 14 15  13 14 15 16 17 18 19  13 14 15 16 17 18 19\n",
        "16 17 18 19 20 21 22  20 21 22 23 24 25 26  20 21 22 23 24 25 26\n",
        "23 24 25 26 27 28 29  27 28                 27 28 29 30 31\n",
        "30 31\n",
        "\n",
    );

    /// Returns fixed text and records the periods requested
    #[derive(Debug, Default)]
    struct CannedCal {
        text: &'static str,
        requests: RefCell<Vec<Period>>,
    }

    impl CannedCal {
        fn new(text: &'static str) -> CannedCal {
            CannedCal {
                text,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl CalendarSource for CannedCal {
        fn fetch(&self, period: Period) -> Result<String, CalError> {
            self.requests.borrow_mut().push(period);
            Ok(self.text.to_owned())
        }
    }

    struct Rejecting;

    impl CalendarSource for Rejecting {
        fn fetch(&self, _period: Period) -> Result<String, CalError> {
            Err(CalError::InvalidArgument(String::from(
                "cal: year 2012 not in range",
            )))
        }
    }

    struct FixedHolidays(Vec<Holiday>);

    impl HolidayFeed for FixedHolidays {
        fn fetch(
            &self,
            _country: &str,
            start: Date,
            end: Date,
        ) -> Result<Vec<Holiday>, FeedError> {
            Ok(self
                .0
                .iter()
                .filter(|h| start <= h.date && h.date <= end)
                .cloned()
                .collect())
        }
    }

    fn ja(verbose: bool) -> HolidayOptions {
        HolidayOptions {
            country: String::from("ja"),
            verbose,
        }
    }

    #[test]
    fn test_no_args_is_current_month() {
        let app = App::new(
            CannedCal::new(OCTOBER_2026),
            ColorConfig::default(),
            date!(2026 - 10 - 16),
        )
        .output(Output::Markup);
        let out = app.render::<&str>(&[]).unwrap();
        assert_eq!(
            *app.source.requests.borrow(),
            [Period::Month {
                year: 2026,
                month: time::Month::October
            }]
        );
        assert!(out.starts_with("    <green>October</green> <yellow>2026</yellow>"));
        assert!(out.contains("<on_green>16</on_green>"));
    }

    #[test]
    fn test_single_year_requests_whole_year() {
        let app = App::new(
            CannedCal::new(YEAR_2011_Q1),
            ColorConfig::default(),
            date!(2026 - 10 - 16),
        );
        app.render(&["2011"]).unwrap();
        assert_eq!(*app.source.requests.borrow(), [Period::Year(2011)]);
    }

    #[test]
    fn test_invalid_arguments() {
        let app = App::new(
            CannedCal::new(OCTOBER_2026),
            ColorConfig::default(),
            date!(2026 - 10 - 16),
        );
        for values in [&["45"][..], &["13", "2000"], &["hello"]] {
            let e = app.render(values).unwrap_err();
            assert!(e.is_invalid_argument(), "{values:?}: {e}");
        }
        assert!(app.source.requests.borrow().is_empty());
    }

    #[test]
    fn test_cal_rejection_is_invalid_argument() {
        let app = App::new(Rejecting, ColorConfig::default(), date!(2026 - 10 - 16));
        let e = app.render(&["10", "2012"]).unwrap_err();
        assert!(e.is_invalid_argument());
        assert_eq!(e.to_string(), "invalid argument: cal: year 2012 not in range");
    }

    #[test]
    fn test_today_ansi() {
        let colors = ColorConfig::default().with_overrides([("today", "blue")]);
        let app = App::new(CannedCal::new(OCTOBER_2026), colors, date!(2026 - 10 - 14));
        let out = app.render::<&str>(&[]).unwrap();
        assert!(out.contains(&format!(
            "{}14{}",
            SetBackgroundColor(Color::Blue),
            ResetColor
        )));
        assert!(out.contains(&format!(
            "{}October{}",
            SetForegroundColor(Color::Green),
            ResetColor
        )));
    }

    #[test]
    fn test_plain_output() {
        let app = App::new(
            CannedCal::new(OCTOBER_2026),
            ColorConfig::default(),
            date!(2026 - 10 - 16),
        )
        .output(Output::Plain);
        assert_eq!(app.render::<&str>(&[]).unwrap(), OCTOBER_2026);
    }

    #[test]
    fn test_year_view_31_in_correct_column() {
        let holidays = FixedHolidays(vec![Holiday::new(date!(2011 - 03 - 31), "Test Day")]);
        let app = App::new(
            CannedCal::new(YEAR_2011_Q1),
            ColorConfig::default(),
            date!(2011 - 01 - 31),
        )
        .with_holidays(holidays, ja(false))
        .output(Output::Markup);
        let out = app.render(&["2011"]).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[8],
            concat!(
                "<magenta>23</magenta> 24 25 26 27 28 <cyan>29</cyan>  ",
                "<magenta>27</magenta> 28                 ",
                "<magenta>27</magenta> 28 29 30 <red>31</red>",
            )
        );
        assert_eq!(lines[9], "<magenta>30</magenta> <on_green>31</on_green>");
    }

    #[test]
    fn test_verbose_holiday_listing() {
        let holidays = FixedHolidays(vec![
            Holiday::new(date!(2026 - 10 - 12), "Sports Day"),
            Holiday::new(date!(2026 - 11 - 03), "Culture Day"),
        ]);
        let app = App::new(
            CannedCal::new(OCTOBER_2026),
            ColorConfig::default(),
            date!(2026 - 10 - 16),
        )
        .with_holidays(holidays, ja(true))
        .output(Output::Markup);
        let out = app.render::<&str>(&[]).unwrap();
        assert!(out.contains("<magenta>11</magenta> <red>12</red> 13"));
        assert!(out.ends_with("<yellow>Oct</yellow><green>12</green>: Sports Day\n"));
        assert!(!out.contains("Culture Day"));
    }

    #[test]
    fn test_holiday_labels_are_not_markup() {
        let expected = [
            (Output::Markup, "<red>12</red>"),
            (Output::Plain, "11 12 13"),
        ];
        for (output, day) in expected {
            let holidays = FixedHolidays(vec![
                Holiday::new(date!(2026 - 10 - 12), "Sports Day"),
                Holiday::new(date!(2026 - 10 - 12), "Day <red>of</red> Tags"),
            ]);
            let app = App::new(
                CannedCal::new(OCTOBER_2026),
                ColorConfig::default(),
                date!(2026 - 10 - 16),
            )
            .with_holidays(holidays, ja(true))
            .output(output);
            let out = app.render::<&str>(&[]).unwrap();
            assert!(out.contains(day), "{output:?}: {out}");
            assert!(!out.contains("<red><red>"), "{output:?}: {out}");
            assert!(out.contains(": Day <red>of</red> Tags\n"), "{output:?}: {out}");
            assert!(out.ends_with(": Sports Day\n"), "{output:?}: {out}");
        }
        let holidays = FixedHolidays(vec![Holiday::new(
            date!(2026 - 10 - 12),
            "Day <red>of</red> Tags",
        )]);
        let app = App::new(
            CannedCal::new(OCTOBER_2026),
            ColorConfig::default(),
            date!(2026 - 10 - 16),
        )
        .with_holidays(holidays, ja(true));
        let out = app.render::<&str>(&[]).unwrap();
        assert!(out.contains(&format!(
            "{}12{}",
            SetForegroundColor(Color::Red),
            ResetColor
        )));
        assert!(out.ends_with(&format!(
            "{}Oct{}{}12{}: Day <red>of</red> Tags\n",
            SetForegroundColor(Color::Yellow),
            ResetColor,
            SetForegroundColor(Color::Green),
            ResetColor,
        )));
    }

    #[test]
    fn test_quiet_holidays_not_listed() {
        let holidays = FixedHolidays(vec![Holiday::new(date!(2026 - 10 - 12), "Sports Day")]);
        let app = App::new(
            CannedCal::new(OCTOBER_2026),
            ColorConfig::default(),
            date!(2026 - 10 - 16),
        )
        .with_holidays(holidays, ja(false))
        .output(Output::Markup);
        let out = app.render::<&str>(&[]).unwrap();
        assert!(out.contains("<red>12</red>"));
        assert!(!out.contains("Sports Day"));
    }
}
