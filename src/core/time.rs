use time::{Date, Month, OffsetDateTime, PrimitiveDateTime};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

/// First and last calendar day of the given month, or `None` when the
/// month number is outside 1-12.
pub(crate) fn month_bounds(year: i32, month: u8) -> Option<(Date, Date)> {
    let month = Month::try_from(month).ok()?;
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let last = Date::from_calendar_date(year, month, month.length(year)).ok()?;
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_handles_leap_february() {
        let (first, last) = month_bounds(2024, 2).unwrap();
        assert_eq!(first, Date::from_calendar_date(2024, Month::February, 1).unwrap());
        assert_eq!(last, Date::from_calendar_date(2024, Month::February, 29).unwrap());

        let (_, last) = month_bounds(2023, 2).unwrap();
        assert_eq!(last.day(), 28);
    }

    #[test]
    fn month_bounds_full_months() {
        let (first, last) = month_bounds(2025, 12).unwrap();
        assert_eq!(first.day(), 1);
        assert_eq!(last.day(), 31);
    }

    #[test]
    fn month_bounds_rejects_invalid_month() {
        assert!(month_bounds(2025, 0).is_none());
        assert!(month_bounds(2025, 13).is_none());
    }
}
