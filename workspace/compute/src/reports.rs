//! Per-student grade reports and dashboard counters.

use std::collections::BTreeMap;

use common::{DashboardCounts, GradeReport, SubjectPerformance, TermSummary};
use model::entities::{grade, school_class, student, teacher};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::{debug, instrument, trace};

use crate::error::Result;
use crate::grading::GradeClassifier;
use crate::lookup::find_student;

/// Decimal places kept on averages.
const AVERAGE_SCALE: u32 = 2;

#[derive(Default)]
struct Accumulator {
    total: Decimal,
    count: u64,
}

impl Accumulator {
    fn add(&mut self, score: Decimal) {
        self.total += score;
        self.count += 1;
    }

    fn average(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        (self.total / Decimal::from(self.count)).round_dp(AVERAGE_SCALE)
    }
}

/// Averages a student's grades per term and per subject.
///
/// The letters in the report are computed from the averages with the
/// thresholds in effect now. Letters stored on individual grades are left
/// alone.
#[instrument(skip(db, classifier))]
pub async fn grade_report(
    db: &DatabaseConnection,
    classifier: &GradeClassifier,
    student_id: i32,
) -> Result<GradeReport> {
    trace!("Building grade report");
    find_student(db, student_id).await?;

    let grades = grade::Entity::find()
        .filter(grade::Column::StudentId.eq(student_id))
        .all(db)
        .await?;
    let thresholds = classifier.current_thresholds(db).await;

    // Year descending, term ascending.
    let mut by_term: BTreeMap<(std::cmp::Reverse<i32>, String), Accumulator> = BTreeMap::new();
    let mut by_subject: BTreeMap<String, Accumulator> = BTreeMap::new();
    for grade in &grades {
        by_term
            .entry((std::cmp::Reverse(grade.year), grade.term.clone()))
            .or_default()
            .add(grade.score);
        by_subject
            .entry(grade.subject.clone())
            .or_default()
            .add(grade.score);
    }

    let terms = by_term
        .into_iter()
        .map(|((year, term), acc)| {
            let average_score = acc.average();
            TermSummary {
                year: year.0,
                term,
                average_score,
                subject_count: acc.count,
                grade: thresholds.letter_for(average_score).to_string(),
            }
        })
        .collect();

    let mut subjects: Vec<SubjectPerformance> = by_subject
        .into_iter()
        .map(|(subject, acc)| {
            let average_score = acc.average();
            SubjectPerformance {
                subject,
                average_score,
                count: acc.count,
                grade: thresholds.letter_for(average_score).to_string(),
            }
        })
        .collect();
    // Stable sort keeps subject names alphabetical among equal averages.
    subjects.sort_by(|a, b| b.average_score.cmp(&a.average_score));

    debug!("Report covers {} grade(s)", grades.len());
    Ok(GradeReport {
        student_id,
        terms,
        subjects,
    })
}

#[instrument(skip(db))]
pub async fn dashboard_counts(db: &DatabaseConnection) -> Result<DashboardCounts> {
    Ok(DashboardCounts {
        students: student::Entity::find().count(db).await?,
        teachers: teacher::Entity::find().count(db).await?,
        classes: school_class::Entity::find().count(db).await?,
    })
}
