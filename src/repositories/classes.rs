use sqlx::PgPool;

use crate::db::models::SchoolClass;

const COLUMNS: &str = "id, name, grade, track, is_active, created_at, updated_at";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<SchoolClass>, sqlx::Error> {
    sqlx::query_as::<_, SchoolClass>(&format!(
        "SELECT {COLUMNS} FROM school_classes WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_active_by_grade(
    pool: &PgPool,
    grade: i32,
) -> Result<Vec<SchoolClass>, sqlx::Error> {
    sqlx::query_as::<_, SchoolClass>(&format!(
        "SELECT {COLUMNS} FROM school_classes
         WHERE grade = $1 AND is_active = TRUE
         ORDER BY name, id"
    ))
    .bind(grade)
    .fetch_all(pool)
    .await
}
