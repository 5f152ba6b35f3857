use std::collections::{HashMap, HashSet};

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::config::GradingSettings;
use crate::core::time::primitive_now_utc;
use crate::db::models::Subject;
use crate::repositories;
use crate::repositories::grade_records::{NewGradeRecord, ScoreUpdate};
use crate::schemas::reconcile::{
    ReconcileItem, ReconcileItemError, ReconcileResponse, WriteStatus,
};
use crate::services::catalog;
use crate::services::error::GradeError;
use crate::services::grid::{self, RecordIndex};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CreateOp {
    pub(crate) student_id: String,
    pub(crate) subject_id: String,
    pub(crate) score: f64,
    /// Subject's max score at partition time, snapshotted into the record.
    pub(crate) max_score: f64,
}

#[derive(Debug)]
pub(crate) struct Partition {
    pub(crate) creates: Vec<CreateOp>,
    pub(crate) updates: Vec<ScoreUpdate>,
    pub(crate) skipped: u64,
    pub(crate) errors: Vec<ReconcileItemError>,
}

/// An item that survived validation, deduplicated to one entry per
/// (student, subject) pair.
#[derive(Debug, Clone)]
pub(crate) struct ValidItem {
    pub(crate) student_id: String,
    pub(crate) subject_id: String,
    pub(crate) score: f64,
    pub(crate) max_score: f64,
}

#[derive(Debug)]
pub(crate) struct ValidatedBatch {
    pub(crate) items: Vec<ValidItem>,
    pub(crate) duplicate_skips: u64,
    pub(crate) errors: Vec<ReconcileItemError>,
}

/// Item validation. Failures are collected per item and never abort the
/// batch. Duplicate (student, subject) pairs keep the last valid score;
/// earlier occurrences count as skips.
pub(crate) fn validate_items(
    items: &[ReconcileItem],
    subjects_by_id: &HashMap<&str, &Subject>,
    roster: &HashSet<String>,
) -> ValidatedBatch {
    let mut winners: Vec<ValidItem> = Vec::new();
    let mut seen: HashMap<(String, String), usize> = HashMap::new();
    let mut duplicate_skips = 0u64;
    let mut errors = Vec::new();

    for item in items {
        let student_id = match non_blank(item.student_id.as_deref()) {
            Some(value) => value,
            None => {
                errors.push(item_error(item, "Student ID is required"));
                continue;
            }
        };
        let subject_id = match non_blank(item.subject_id.as_deref()) {
            Some(value) => value,
            None => {
                errors.push(item_error(item, "Subject ID is required"));
                continue;
            }
        };

        if !roster.contains(&student_id) {
            errors.push(item_error(item, "Unknown student"));
            continue;
        }
        let Some(subject) = subjects_by_id.get(subject_id.as_str()) else {
            errors.push(item_error(item, "Unknown subject"));
            continue;
        };

        let Some(score) = item.score else {
            errors.push(item_error(item, "Score is required"));
            continue;
        };
        if !(score >= 0.0 && score <= subject.max_score) {
            errors.push(item_error(
                item,
                &format!("Score out of range (0-{})", subject.max_score),
            ));
            continue;
        }

        let key = (student_id.clone(), subject_id.clone());
        match seen.get(&key) {
            Some(&index) => {
                duplicate_skips += 1;
                winners[index].score = score;
            }
            None => {
                seen.insert(key, winners.len());
                winners.push(ValidItem {
                    student_id,
                    subject_id,
                    score,
                    max_score: subject.max_score,
                });
            }
        }
    }

    ValidatedBatch { items: winners, duplicate_skips, errors }
}

/// Diff the validated batch against persisted records: a missing record
/// becomes a create, a different score becomes an update, an identical
/// score is a no-op skip.
pub(crate) fn diff_against_existing(batch: ValidatedBatch, existing: &RecordIndex) -> Partition {
    let mut partition = Partition {
        creates: Vec::new(),
        updates: Vec::new(),
        skipped: batch.duplicate_skips,
        errors: batch.errors,
    };

    for item in batch.items {
        match grid::lookup(existing, &item.student_id, &item.subject_id) {
            Some(record) => {
                if record.score == Some(item.score) {
                    partition.skipped += 1;
                } else {
                    partition
                        .updates
                        .push(ScoreUpdate { id: record.id.clone(), score: item.score });
                }
            }
            None => partition.creates.push(CreateOp {
                student_id: item.student_id,
                subject_id: item.subject_id,
                score: item.score,
                max_score: item.max_score,
            }),
        }
    }

    partition
}

pub(crate) fn partition(
    items: &[ReconcileItem],
    subjects_by_id: &HashMap<&str, &Subject>,
    roster: &HashSet<String>,
    existing: &RecordIndex,
) -> Partition {
    diff_against_existing(validate_items(items, subjects_by_id, roster), existing)
}

/// Where the write phase stopped, when it did not run to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteFailurePoint {
    BulkCreate,
    /// 1-based number of the update batch that rolled back.
    UpdateBatch(usize),
}

/// Tally of the write phase; folded into the response by
/// [`summarize_writes`].
#[derive(Debug)]
pub(crate) struct WriteReport {
    pub(crate) created: u64,
    pub(crate) updated: u64,
    pub(crate) planned_updates: usize,
    pub(crate) failure: Option<WriteFailurePoint>,
}

/// Update batches in partition order. Each batch is committed as one
/// transaction; batches are not atomic with each other.
pub(crate) fn update_batches(
    updates: &[ScoreUpdate],
    batch_size: usize,
) -> std::slice::Chunks<'_, ScoreUpdate> {
    updates.chunks(batch_size.max(1))
}

/// Collapses the write tally into the response status: `complete` when
/// nothing failed, `failed` when nothing was persisted before the failure,
/// `partial` otherwise, with a detail saying exactly how far writes got.
pub(crate) fn summarize_writes(report: &WriteReport) -> (WriteStatus, Option<String>) {
    let Some(point) = report.failure else {
        return (WriteStatus::Complete, None);
    };

    let status = if report.created == 0 && report.updated == 0 {
        WriteStatus::Failed
    } else {
        WriteStatus::Partial
    };
    let detail = match point {
        WriteFailurePoint::BulkCreate => {
            "Bulk create failed; no records were written".to_string()
        }
        WriteFailurePoint::UpdateBatch(batch_no) => format!(
            "Update batch {batch_no} failed; {} of {} updates were applied",
            report.updated, report.planned_updates
        ),
    };
    (status, Some(detail))
}

pub(crate) async fn reconcile(
    pool: &PgPool,
    grading: &GradingSettings,
    class_id: &str,
    month: u8,
    year: i32,
    items: Vec<ReconcileItem>,
) -> Result<ReconcileResponse, GradeError> {
    if items.len() > grading.max_reconcile_items {
        return Err(GradeError::validation(format!(
            "Payload has {} items; the limit is {}",
            items.len(),
            grading.max_reconcile_items
        )));
    }

    let class = repositories::classes::find_by_id(pool, class_id)
        .await?
        .ok_or_else(|| GradeError::not_found(format!("Class {class_id} not found")))?;

    let pool_subjects = repositories::subjects::list_active_by_grade(pool, class.grade).await?;
    let subjects = catalog::applicable_subjects(class.grade, class.track, pool_subjects);
    let subjects_by_id: HashMap<&str, &Subject> =
        subjects.iter().map(|subject| (subject.id.as_str(), subject)).collect();

    let roster: HashSet<String> = repositories::students::list_active_of_class(pool, class_id)
        .await?
        .into_iter()
        .map(|student| student.id)
        .collect();

    let batch = validate_items(&items, &subjects_by_id, &roster);

    let month_db = i32::from(month);
    let existing = if batch.items.is_empty() {
        RecordIndex::new()
    } else {
        let mut student_ids = Vec::with_capacity(batch.items.len());
        let mut subject_ids = Vec::with_capacity(batch.items.len());
        for item in &batch.items {
            student_ids.push(item.student_id.clone());
            subject_ids.push(item.subject_id.clone());
        }
        let records = repositories::grade_records::list_for_pairs(
            pool,
            class_id,
            month_db,
            year,
            &student_ids,
            &subject_ids,
        )
        .await?;
        grid::index_records(records)
    };

    let partition = diff_against_existing(batch, &existing);
    let planned_creates = partition.creates.len() as u64;

    let now = primitive_now_utc();
    let new_records: Vec<NewGradeRecord> = partition
        .creates
        .iter()
        .map(|create| NewGradeRecord {
            id: Uuid::new_v4().to_string(),
            student_id: create.student_id.clone(),
            subject_id: create.subject_id.clone(),
            score: create.score,
            max_score: create.max_score,
        })
        .collect();

    let mut skipped = partition.skipped;
    let mut report = WriteReport {
        created: 0,
        updated: 0,
        planned_updates: partition.updates.len(),
        failure: None,
    };

    match repositories::grade_records::insert_many(
        pool, class_id, month_db, year, now, &new_records,
    )
    .await
    {
        Ok(count) => {
            report.created = count;
            // Rows swallowed by the conflict clause were created by a
            // concurrent call; report them as skips.
            skipped += planned_creates - count;
            metrics::counter!("grade_records_written_total", "op" => "create").increment(count);
        }
        Err(err) => {
            tracing::error!(error = %err, class_id, "bulk create of grade records failed");
            report.failure = Some(WriteFailurePoint::BulkCreate);
        }
    }

    if report.failure.is_none() {
        for (batch_no, chunk) in
            update_batches(&partition.updates, grading.update_batch_size).enumerate()
        {
            match repositories::grade_records::update_scores_batch(pool, chunk, now).await {
                Ok(count) => {
                    report.updated += count;
                    metrics::counter!("grade_records_written_total", "op" => "update")
                        .increment(count);
                }
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        class_id,
                        batch = batch_no + 1,
                        "update batch failed; later batches not attempted"
                    );
                    report.failure = Some(WriteFailurePoint::UpdateBatch(batch_no + 1));
                    break;
                }
            }
        }
    }

    let (write_status, detail) = summarize_writes(&report);

    Ok(ReconcileResponse {
        created: report.created,
        updated: report.updated,
        skipped,
        errors: partition.errors,
        write_status,
        detail,
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

fn item_error(item: &ReconcileItem, reason: &str) -> ReconcileItemError {
    ReconcileItemError {
        student_id: item.student_id.clone(),
        subject_id: item.subject_id.clone(),
        reason: reason.to_string(),
    }
}
