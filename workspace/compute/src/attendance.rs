//! Daily attendance marks and summaries.

use std::collections::HashMap;

use chrono::NaiveDate;
use common::AttendanceSummary;
use model::entities::attendance::{self, AttendanceStatus};
use model::entities::student;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info, instrument, trace};

use crate::error::Result;
use crate::lookup::find_student;

/// One mark to save for a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEntry {
    pub student_id: i32,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

/// A student and their mark on a given day, if one was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub student: student::Model,
    pub record: Option<attendance::Model>,
}

/// Saves the marks for `date`, replacing any mark a student already has for
/// that day. Either every entry is saved or none is.
#[instrument(skip(db, entries), fields(entries = entries.len()))]
pub async fn record_attendance(
    db: &DatabaseConnection,
    date: NaiveDate,
    entries: &[AttendanceEntry],
) -> Result<Vec<attendance::Model>> {
    trace!("Saving attendance");
    let txn = db.begin().await?;
    let mut saved = Vec::with_capacity(entries.len());

    for entry in entries {
        find_student(&txn, entry.student_id).await?;

        let existing = attendance::Entity::find()
            .filter(attendance::Column::StudentId.eq(entry.student_id))
            .filter(attendance::Column::Date.eq(date))
            .one(&txn)
            .await?;

        let record = match existing {
            Some(record) => {
                debug!("Replacing attendance {} for student {}", record.id, entry.student_id);
                let mut active: attendance::ActiveModel = record.into();
                active.status = Set(entry.status);
                active.remarks = Set(entry.remarks.clone());
                active.update(&txn).await?
            }
            None => {
                attendance::ActiveModel {
                    student_id: Set(entry.student_id),
                    date: Set(date),
                    status: Set(entry.status),
                    remarks: Set(entry.remarks.clone()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };
        saved.push(record);
    }

    txn.commit().await?;
    info!("Saved {} attendance mark(s) for {}", saved.len(), date);
    Ok(saved)
}

/// Counts marks by status. Late counts as attended for the rate.
pub fn summarize(records: &[attendance::Model]) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();
    for record in records {
        summary.total += 1;
        match record.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Absent => summary.absent += 1,
            AttendanceStatus::Late => summary.late += 1,
            AttendanceStatus::Excused => summary.excused += 1,
        }
    }

    if summary.total > 0 {
        let attended = (summary.present + summary.late) as f64;
        summary.rate = (attended / summary.total as f64 * 1000.0).round() / 10.0;
    }
    summary
}

/// Marks of one student, newest day first, optionally from `since` on.
#[instrument(skip(db))]
pub async fn student_records(
    db: &DatabaseConnection,
    student_id: i32,
    since: Option<NaiveDate>,
) -> Result<Vec<attendance::Model>> {
    find_student(db, student_id).await?;

    let mut query = attendance::Entity::find().filter(attendance::Column::StudentId.eq(student_id));
    if let Some(since) = since {
        query = query.filter(attendance::Column::Date.gte(since));
    }

    Ok(query
        .order_by_desc(attendance::Column::Date)
        .all(db)
        .await?)
}

#[instrument(skip(db))]
pub async fn student_summary(
    db: &DatabaseConnection,
    student_id: i32,
    since: Option<NaiveDate>,
) -> Result<AttendanceSummary> {
    let records = student_records(db, student_id, since).await?;
    Ok(summarize(&records))
}

/// Students ordered by class then name, each with their mark for `date`.
#[instrument(skip(db))]
pub async fn class_roster(
    db: &DatabaseConnection,
    date: NaiveDate,
    class: Option<&str>,
) -> Result<Vec<RosterEntry>> {
    let mut query = student::Entity::find();
    if let Some(class) = class {
        query = query.filter(student::Column::Class.eq(class));
    }

    let students = query
        .order_by_asc(student::Column::Class)
        .order_by_asc(student::Column::Name)
        .order_by_asc(student::Column::Id)
        .all(db)
        .await?;

    let mut marks: HashMap<i32, attendance::Model> = attendance::Entity::find()
        .filter(attendance::Column::Date.eq(date))
        .filter(attendance::Column::StudentId.is_in(students.iter().map(|s| s.id)))
        .all(db)
        .await?
        .into_iter()
        .map(|record| (record.student_id, record))
        .collect();
    debug!("{} of {} student(s) marked on {}", marks.len(), students.len(), date);

    Ok(students
        .into_iter()
        .map(|student| RosterEntry {
            record: marks.remove(&student.id),
            student,
        })
        .collect())
}
