use sqlx::PgPool;

use crate::db::models::Subject;

const COLUMNS: &str = "\
    id, code, name, grade, track, max_score, coefficient, is_active, \
    created_at, updated_at";

pub(crate) async fn list_active_by_grade(
    pool: &PgPool,
    grade: i32,
) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "SELECT {COLUMNS} FROM subjects
         WHERE grade = $1 AND is_active = TRUE
         ORDER BY code, id"
    ))
    .bind(grade)
    .fetch_all(pool)
    .await
}
