use std::collections::HashMap;

use time::Date;

use crate::core::time::month_bounds;
use crate::db::models::AttendanceRecord;
use crate::db::types::AttendanceStatus;
use crate::services::error::GradeError;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct AttendanceSummary {
    pub(crate) absent_without_permission: u32,
    pub(crate) absent_with_permission: u32,
}

/// First through last calendar day of the month, inclusive.
pub(crate) fn month_range(year: i32, month: u8) -> Result<(Date, Date), GradeError> {
    month_bounds(year, month)
        .ok_or_else(|| GradeError::validation(format!("Invalid month/year: {month}/{year}")))
}

/// Per-student absence counts. `Absent` counts as without permission,
/// `Excused` as with permission; `Present` and `Late` are not counted.
pub(crate) fn summarize(records: &[AttendanceRecord]) -> HashMap<String, AttendanceSummary> {
    let mut by_student: HashMap<String, AttendanceSummary> = HashMap::new();
    for record in records {
        let summary = by_student.entry(record.student_id.clone()).or_default();
        match record.status {
            AttendanceStatus::Absent => summary.absent_without_permission += 1,
            AttendanceStatus::Excused => summary.absent_with_permission += 1,
            AttendanceStatus::Present | AttendanceStatus::Late => {}
        }
    }
    by_student
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use time::Month;

    fn record(student_id: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: format!("att-{student_id}-{status:?}"),
            student_id: student_id.to_string(),
            class_id: "c1".to_string(),
            date: Date::from_calendar_date(2025, Month::March, 3).unwrap(),
            status,
            created_at: primitive_now_utc(),
        }
    }

    #[test]
    fn month_range_covers_leap_february() {
        let (first, last) = month_range(2024, 2).unwrap();
        assert_eq!(first, Date::from_calendar_date(2024, Month::February, 1).unwrap());
        assert_eq!(last, Date::from_calendar_date(2024, Month::February, 29).unwrap());
    }

    #[test]
    fn month_range_rejects_bad_month() {
        assert!(matches!(month_range(2025, 13), Err(GradeError::Validation(_))));
    }

    #[test]
    fn summarize_classifies_absences() {
        let records = vec![
            record("s1", AttendanceStatus::Absent),
            record("s1", AttendanceStatus::Absent),
            record("s1", AttendanceStatus::Excused),
            record("s1", AttendanceStatus::Present),
            record("s1", AttendanceStatus::Late),
            record("s2", AttendanceStatus::Excused),
        ];

        let summaries = summarize(&records);
        let s1 = summaries.get("s1").copied().unwrap();
        assert_eq!(s1.absent_without_permission, 2);
        assert_eq!(s1.absent_with_permission, 1);

        let s2 = summaries.get("s2").copied().unwrap();
        assert_eq!(s2.absent_without_permission, 0);
        assert_eq!(s2.absent_with_permission, 1);

        assert!(summaries.get("s3").is_none());
    }
}
