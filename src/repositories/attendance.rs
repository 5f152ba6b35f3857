use sqlx::PgPool;
use time::Date;

use crate::db::models::AttendanceRecord;

const COLUMNS: &str = "id, student_id, class_id, date, status, created_at";

pub(crate) async fn list_for_class_in_range(
    pool: &PgPool,
    class_id: &str,
    from: Date,
    to: Date,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {COLUMNS} FROM attendance_records
         WHERE class_id = $1 AND date >= $2 AND date <= $3"
    ))
    .bind(class_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_classes_in_range(
    pool: &PgPool,
    class_ids: &[String],
    from: Date,
    to: Date,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {COLUMNS} FROM attendance_records
         WHERE class_id = ANY($1) AND date >= $2 AND date <= $3"
    ))
    .bind(class_ids)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}
