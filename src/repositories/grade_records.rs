use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::GradeRecord;

const COLUMNS: &str = "\
    id, student_id, subject_id, class_id, month, year, score, max_score, \
    created_at, updated_at";

pub(crate) async fn list_for_class_period(
    pool: &PgPool,
    class_id: &str,
    month: i32,
    year: i32,
) -> Result<Vec<GradeRecord>, sqlx::Error> {
    sqlx::query_as::<_, GradeRecord>(&format!(
        "SELECT {COLUMNS} FROM grade_records
         WHERE class_id = $1 AND month = $2 AND year = $3"
    ))
    .bind(class_id)
    .bind(month)
    .bind(year)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_classes_period(
    pool: &PgPool,
    class_ids: &[String],
    month: i32,
    year: i32,
) -> Result<Vec<GradeRecord>, sqlx::Error> {
    sqlx::query_as::<_, GradeRecord>(&format!(
        "SELECT {COLUMNS} FROM grade_records
         WHERE class_id = ANY($1) AND month = $2 AND year = $3"
    ))
    .bind(class_ids)
    .bind(month)
    .bind(year)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_class_year(
    pool: &PgPool,
    class_id: &str,
    year: i32,
) -> Result<Vec<GradeRecord>, sqlx::Error> {
    sqlx::query_as::<_, GradeRecord>(&format!(
        "SELECT {COLUMNS} FROM grade_records
         WHERE class_id = $1 AND year = $2"
    ))
    .bind(class_id)
    .bind(year)
    .fetch_all(pool)
    .await
}

/// Records for exactly the given (student, subject) pairs within one
/// class period. `student_ids[i]` pairs with `subject_ids[i]`.
pub(crate) async fn list_for_pairs(
    pool: &PgPool,
    class_id: &str,
    month: i32,
    year: i32,
    student_ids: &[String],
    subject_ids: &[String],
) -> Result<Vec<GradeRecord>, sqlx::Error> {
    sqlx::query_as::<_, GradeRecord>(&format!(
        "SELECT {COLUMNS} FROM grade_records
         WHERE class_id = $1 AND month = $2 AND year = $3
           AND (student_id, subject_id) IN
               (SELECT * FROM unnest($4::text[], $5::text[]))"
    ))
    .bind(class_id)
    .bind(month)
    .bind(year)
    .bind(student_ids)
    .bind(subject_ids)
    .fetch_all(pool)
    .await
}

pub(crate) struct NewGradeRecord {
    pub id: String,
    pub student_id: String,
    pub subject_id: String,
    pub score: f64,
    pub max_score: f64,
}

/// Bulk insert with duplicate-key skip on the period uniqueness constraint.
/// Returns the number of rows actually inserted, which can be lower than
/// `records.len()` when a concurrent call created the same record first.
pub(crate) async fn insert_many(
    pool: &PgPool,
    class_id: &str,
    month: i32,
    year: i32,
    now: PrimitiveDateTime,
    records: &[NewGradeRecord],
) -> Result<u64, sqlx::Error> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut ids = Vec::with_capacity(records.len());
    let mut student_ids = Vec::with_capacity(records.len());
    let mut subject_ids = Vec::with_capacity(records.len());
    let mut scores = Vec::with_capacity(records.len());
    let mut max_scores = Vec::with_capacity(records.len());
    for record in records {
        ids.push(record.id.clone());
        student_ids.push(record.student_id.clone());
        subject_ids.push(record.subject_id.clone());
        scores.push(record.score);
        max_scores.push(record.max_score);
    }

    let result = sqlx::query(
        "INSERT INTO grade_records (
            id, student_id, subject_id, class_id, month, year,
            score, max_score, created_at, updated_at
        )
        SELECT r.id, r.student_id, r.subject_id, $1, $2, $3,
               r.score, r.max_score, $4, $4
        FROM unnest($5::text[], $6::text[], $7::text[], $8::float8[], $9::float8[])
            AS r(id, student_id, subject_id, score, max_score)
        ON CONFLICT (student_id, subject_id, class_id, month, year) DO NOTHING",
    )
    .bind(class_id)
    .bind(month)
    .bind(year)
    .bind(now)
    .bind(&ids)
    .bind(&student_ids)
    .bind(&subject_ids)
    .bind(&scores)
    .bind(&max_scores)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

#[derive(Debug)]
pub(crate) struct ScoreUpdate {
    pub id: String,
    pub score: f64,
}

/// Applies one batch of score updates as a single transaction.
pub(crate) async fn update_scores_batch(
    pool: &PgPool,
    updates: &[ScoreUpdate],
    now: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    if updates.is_empty() {
        return Ok(0);
    }

    let mut ids = Vec::with_capacity(updates.len());
    let mut scores = Vec::with_capacity(updates.len());
    for update in updates {
        ids.push(update.id.clone());
        scores.push(update.score);
    }

    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        "UPDATE grade_records g
         SET score = u.score, updated_at = $3
         FROM unnest($1::text[], $2::float8[]) AS u(id, score)
         WHERE g.id = u.id",
    )
    .bind(&ids)
    .bind(&scores)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(result.rows_affected())
}
