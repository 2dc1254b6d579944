//! Resolves the month selected by a client into the interval of sale dates it covers.

use std::ops::Range;

use time::{Date, Month, OffsetDateTime};

use crate::{
    Error,
    timezone::{assume_local, get_local_offset},
};

/// The months in calendar order, as shown in the month selector.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The set of transactions selected by a month query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthFilter {
    /// Transactions with a date of sale in `[start, end)`, where `end` is one
    /// calendar month after `start`.
    Interval(Range<OffsetDateTime>),
    /// The month was missing or not recognised, no transactions match.
    NoMatch,
}

impl MonthFilter {
    /// Resolve a raw `month` query parameter and an optional `year`.
    ///
    /// `month` may be a month name, either in full or abbreviated to three
    /// letters in any case, or a month number from 1 to 12. When `year` is
    /// `None` the current year in `local_timezone` is used. The interval
    /// starts at local midnight on the first day of the month.
    ///
    /// A missing or unrecognised month, or a year outside the supported
    /// calendar range, resolves to [MonthFilter::NoMatch].
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a
    /// valid, canonical timezone name.
    pub fn resolve(
        month: Option<&str>,
        year: Option<i32>,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        let current_offset = get_local_offset(local_timezone)
            .ok_or_else(|| Error::InvalidTimezoneError(local_timezone.to_owned()))?;

        let Some(raw_month) = month.map(str::trim).filter(|month| !month.is_empty()) else {
            return Ok(Self::NoMatch);
        };

        let Some(month) = parse_month(raw_month) else {
            tracing::warn!("Ignoring unrecognised month {raw_month:?}");
            return Ok(Self::NoMatch);
        };

        let year =
            year.unwrap_or_else(|| OffsetDateTime::now_utc().to_offset(current_offset).year());

        match month_interval(year, month, local_timezone) {
            Some(interval) => Ok(Self::Interval(interval)),
            None => {
                tracing::warn!("Ignoring out of range year {year}");
                Ok(Self::NoMatch)
            }
        }
    }
}

/// Parse a month name (full or three-letter, any case) or number (1-12).
pub fn parse_month(text: &str) -> Option<Month> {
    let text = text.trim();

    if let Ok(number) = text.parse::<u8>() {
        return Month::try_from(number).ok();
    }

    let text = text.to_lowercase();

    MONTH_NAMES
        .iter()
        .zip(1u8..)
        .find(|(name, _)| {
            let name = name.to_lowercase();
            name == text || (text.len() == 3 && name.starts_with(&text))
        })
        .and_then(|(_, number)| Month::try_from(number).ok())
}

fn month_interval(
    year: i32,
    month: Month,
    local_timezone: &str,
) -> Option<Range<OffsetDateTime>> {
    let (next_year, next_month) = match month {
        Month::December => (year.checked_add(1)?, Month::January),
        month => (year, month.next()),
    };

    let start = Date::from_calendar_date(year, month, 1).ok()?;
    let end = Date::from_calendar_date(next_year, next_month, 1).ok()?;

    let start = assume_local(start.midnight(), local_timezone)?;
    let end = assume_local(end.midnight(), local_timezone)?;

    Some(start..end)
}

#[cfg(test)]
mod tests {
    use time::{Month, OffsetDateTime, macros::datetime};

    use crate::Error;

    use super::{MonthFilter, parse_month};

    #[test]
    fn parses_month_names_and_numbers() {
        assert_eq!(parse_month("March"), Some(Month::March));
        assert_eq!(parse_month("march"), Some(Month::March));
        assert_eq!(parse_month("MAR"), Some(Month::March));
        assert_eq!(parse_month("3"), Some(Month::March));
        assert_eq!(parse_month("03"), Some(Month::March));
        assert_eq!(parse_month("12"), Some(Month::December));
    }

    #[test]
    fn rejects_unknown_months() {
        assert_eq!(parse_month("0"), None);
        assert_eq!(parse_month("13"), None);
        assert_eq!(parse_month("Marc"), None);
        assert_eq!(parse_month("Ma"), None);
        assert_eq!(parse_month("Smarch"), None);
        assert_eq!(parse_month("-1"), None);
    }

    #[test]
    fn resolves_month_to_half_open_interval() {
        let got = MonthFilter::resolve(Some("March"), Some(2024), "Etc/UTC").unwrap();

        assert_eq!(
            got,
            MonthFilter::Interval(datetime!(2024-03-01 0:00 UTC)..datetime!(2024-04-01 0:00 UTC))
        );
    }

    #[test]
    fn december_rolls_over_to_next_year() {
        let got = MonthFilter::resolve(Some("12"), Some(2023), "Etc/UTC").unwrap();

        assert_eq!(
            got,
            MonthFilter::Interval(datetime!(2023-12-01 0:00 UTC)..datetime!(2024-01-01 0:00 UTC))
        );
    }

    #[test]
    fn interval_starts_at_local_midnight() {
        let got = MonthFilter::resolve(Some("January"), Some(2024), "Pacific/Auckland").unwrap();

        assert_eq!(
            got,
            MonthFilter::Interval(datetime!(2024-01-01 0:00 +13)..datetime!(2024-02-01 0:00 +13))
        );
    }

    #[test]
    fn month_starts_at_local_midnight_across_daylight_saving_change() {
        let got = MonthFilter::resolve(Some("April"), Some(2018), "Australia/Sydney").unwrap();

        let MonthFilter::Interval(april) = got else {
            panic!("want an interval, got {got:?}");
        };
        assert_eq!(
            april,
            datetime!(2018-04-01 0:00 +11)..datetime!(2018-05-01 0:00 +10)
        );
        assert!(april.contains(&datetime!(2018-04-01 0:30 +11)));
        assert!(!april.contains(&datetime!(2018-03-31 23:30 +11)));
    }

    #[test]
    fn defaults_to_current_year() {
        let current_year = OffsetDateTime::now_utc().year();

        let got = MonthFilter::resolve(Some("June"), None, "Etc/UTC").unwrap();

        match got {
            MonthFilter::Interval(interval) => assert_eq!(interval.start.year(), current_year),
            MonthFilter::NoMatch => panic!("want an interval, got NoMatch"),
        }
    }

    #[test]
    fn missing_or_blank_month_matches_nothing() {
        assert_eq!(
            MonthFilter::resolve(None, Some(2024), "Etc/UTC").unwrap(),
            MonthFilter::NoMatch
        );
        assert_eq!(
            MonthFilter::resolve(Some("  "), Some(2024), "Etc/UTC").unwrap(),
            MonthFilter::NoMatch
        );
    }

    #[test]
    fn unrecognised_month_or_year_matches_nothing() {
        assert_eq!(
            MonthFilter::resolve(Some("Smarch"), Some(2024), "Etc/UTC").unwrap(),
            MonthFilter::NoMatch
        );
        assert_eq!(
            MonthFilter::resolve(Some("May"), Some(i32::MAX), "Etc/UTC").unwrap(),
            MonthFilter::NoMatch
        );
    }

    #[test]
    fn invalid_timezone_is_an_error() {
        let result = MonthFilter::resolve(Some("May"), Some(2024), "Not/A_Timezone");

        assert!(matches!(result, Err(Error::InvalidTimezoneError(_))));
    }

    #[test]
    fn same_month_records_match_and_adjacent_months_do_not() {
        let interval = |month| match MonthFilter::resolve(Some(month), Some(2024), "Etc/UTC") {
            Ok(MonthFilter::Interval(interval)) => interval,
            other => panic!("want an interval for {month}, got {other:?}"),
        };
        let march = interval("March");
        let april = interval("April");
        let first = datetime!(2024-03-01 0:00 UTC);
        let last_instant = datetime!(2024-03-31 23:59:59.999999999 UTC);

        assert!(march.contains(&first));
        assert!(march.contains(&last_instant));
        assert!(!april.contains(&first));
        assert!(!april.contains(&last_instant));
        assert!(!april.contains(&april.end));
    }
}
