use sqlx::PgPool;

use crate::db::models::Student;

const COLUMNS: &str = "\
    id, class_id, first_name, last_name, local_name, gender, is_active, \
    created_at, updated_at";

// Display-name ordering mirrors Student::display_name: a blank local_name
// falls back to "first last".
const DISPLAY_NAME: &str =
    "COALESCE(NULLIF(TRIM(local_name), ''), first_name || ' ' || last_name)";

pub(crate) async fn list_active_of_class(
    pool: &PgPool,
    class_id: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {COLUMNS} FROM students
         WHERE class_id = $1 AND is_active = TRUE
         ORDER BY {DISPLAY_NAME}, id"
    ))
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_active_of_classes(
    pool: &PgPool,
    class_ids: &[String],
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {COLUMNS} FROM students
         WHERE class_id = ANY($1) AND is_active = TRUE
         ORDER BY {DISPLAY_NAME}, id"
    ))
    .bind(class_ids)
    .fetch_all(pool)
    .await
}
