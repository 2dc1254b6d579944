use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};
use time_tz::{Offset, OffsetDateTimeExt, OffsetResult, PrimitiveDateTimeExt, TimeZone, timezones};

/// Get the current UTC offset of `canonical_timezone`, e.g. "Pacific/Auckland".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Interpret the wall-clock `date_time` as local time in `canonical_timezone`.
///
/// A wall-clock time that occurs twice, when clocks go back, resolves to the
/// earlier instant. A wall-clock time that is skipped, when clocks go forward,
/// resolves to the first instant after the skipped hour.
pub fn assume_local(
    date_time: PrimitiveDateTime,
    canonical_timezone: &str,
) -> Option<OffsetDateTime> {
    let tz = timezones::get_by_name(canonical_timezone)?;

    let local = match date_time.assume_timezone(tz) {
        OffsetResult::Some(local) => local,
        OffsetResult::Ambiguous(first, second) => first.min(second),
        OffsetResult::None => {
            // The offset in effect before the skipped hour lands on the transition.
            let offset_before = tz
                .get_offset_utc(&(date_time.assume_utc() - Duration::DAY))
                .to_utc();
            date_time.assume_offset(offset_before).to_timezone(tz)
        }
    };

    Some(local)
}

#[cfg(test)]
mod tests {
    use time::macros::{datetime, offset};

    use super::{assume_local, get_local_offset};

    #[test]
    fn unknown_timezone_has_no_offset() {
        assert_eq!(get_local_offset("Not/A_Timezone"), None);
        assert_eq!(
            assume_local(datetime!(2024-01-01 0:00), "Not/A_Timezone"),
            None
        );
    }

    #[test]
    fn assumes_daylight_saving_offset_in_summer() {
        let got = assume_local(datetime!(2024-01-01 0:00), "Pacific/Auckland").unwrap();

        assert_eq!(got, datetime!(2024-01-01 0:00 +13));
    }

    #[test]
    fn assumes_standard_offset_in_winter() {
        let got = assume_local(datetime!(2024-07-01 0:00), "Pacific/Auckland").unwrap();

        assert_eq!(got, datetime!(2024-07-01 0:00 +12));
    }

    #[test]
    fn uses_offset_at_local_midnight_on_daylight_saving_end_day() {
        // Sydney left daylight saving at 03:00 on 2018-04-01.
        let got = assume_local(datetime!(2018-04-01 0:00), "Australia/Sydney").unwrap();

        assert_eq!(got, datetime!(2018-04-01 0:00 +11));
    }

    #[test]
    fn repeated_wall_clock_time_resolves_to_earlier_instant() {
        let got = assume_local(datetime!(2018-04-01 2:30), "Australia/Sydney").unwrap();

        assert_eq!(got, datetime!(2018-04-01 2:30 +11));
    }

    #[test]
    fn skipped_wall_clock_time_resolves_to_end_of_gap() {
        // Sao Paulo clocks jumped from 00:00 to 01:00 on 2018-11-04.
        let got = assume_local(datetime!(2018-11-04 0:00), "America/Sao_Paulo").unwrap();

        assert_eq!(got, datetime!(2018-11-04 1:00 -2));
        assert_eq!(got.offset(), offset!(-2));
    }
}
