//! Fee balances and payment recording.
//!
//! Balances are never stored. They are derived on every read from the fee
//! structure amount and the payments recorded against it. A student owes the
//! fee structures whose `class` equals the student's current class string.

pub mod receipt;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use common::{FeeStructureBalance, FeeSummary, ReceiptBreakdown};
use model::entities::{fee_payment, fee_structure, student};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::{ComputeError, Result};
use crate::lookup::{find_fee_payment, find_fee_structure, find_student};

pub use receipt::{
    RECEIPT_PREFIX, RECEIPT_TOKEN_LEN, RandomReceiptTokens, ReceiptTokenSource,
    format_receipt_number, is_receipt_number,
};

/// How many receipt numbers are tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Computes balances and records payments.
///
/// `today` is the date stamped on new payments and receipts. When it is not
/// pinned the server's local date is read on every call.
#[derive(Clone)]
pub struct FeeLedger {
    today: Option<NaiveDate>,
    max_attempts: u32,
    tokens: Arc<dyn ReceiptTokenSource>,
}

impl Default for FeeLedger {
    fn default() -> Self {
        Self {
            today: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            tokens: Arc::new(RandomReceiptTokens),
        }
    }
}

impl std::fmt::Debug for FeeLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeLedger")
            .field("today", &self.today)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl FeeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger that treats `today` as the current date.
    pub fn new_with_today(today: NaiveDate) -> Self {
        Self {
            today: Some(today),
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_token_source(mut self, tokens: impl ReceiptTokenSource + 'static) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Amount still owed by a student on one fee structure.
    ///
    /// Negative when the student has paid more than the structure amount.
    #[instrument(skip(self, db))]
    pub async fn balance(
        &self,
        db: &DatabaseConnection,
        student_id: i32,
        fee_structure_id: i32,
    ) -> Result<Decimal> {
        trace!("Computing balance");
        find_student(db, student_id).await?;
        let structure = find_fee_structure(db, fee_structure_id).await?;
        let paid = paid_towards(db, student_id, fee_structure_id, None).await?;
        let balance = structure.amount - paid;
        debug!(
            "Fee structure {} amount {} paid {} balance {}",
            structure.id, structure.amount, paid, balance
        );
        Ok(balance)
    }

    /// Sum of the balances of every fee structure of the student's class.
    #[instrument(skip(self, db))]
    pub async fn total_balance(&self, db: &DatabaseConnection, student_id: i32) -> Result<Decimal> {
        Ok(self.fee_summary(db, student_id).await?.balance)
    }

    /// Every fee structure of the student's class with what was paid and what
    /// is left. Structures are ordered newest year first, then by term.
    #[instrument(skip(self, db))]
    pub async fn fee_summary(&self, db: &DatabaseConnection, student_id: i32) -> Result<FeeSummary> {
        trace!("Building fee summary");
        let student = find_student(db, student_id).await?;

        let structures = match &student.class {
            Some(class) => {
                fee_structure::Entity::find()
                    .filter(fee_structure::Column::Class.eq(class.as_str()))
                    .order_by_desc(fee_structure::Column::Year)
                    .order_by_asc(fee_structure::Column::Term)
                    .order_by_asc(fee_structure::Column::Id)
                    .all(db)
                    .await?
            }
            None => {
                debug!("Student {} has no class, no fee structures apply", student_id);
                Vec::new()
            }
        };

        let mut paid_by_structure: HashMap<i32, Decimal> = HashMap::new();
        for payment in student.find_related(fee_payment::Entity).all(db).await? {
            *paid_by_structure
                .entry(payment.fee_structure_id)
                .or_insert(Decimal::ZERO) += payment.amount_paid;
        }

        let structures: Vec<FeeStructureBalance> = structures
            .into_iter()
            .map(|structure| {
                let paid_amount = paid_by_structure
                    .get(&structure.id)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                FeeStructureBalance {
                    fee_structure_id: structure.id,
                    balance: structure.amount - paid_amount,
                    paid_amount,
                    amount: structure.amount,
                    class: structure.class,
                    term: structure.term,
                    year: structure.year,
                    description: structure.description,
                    due_date: structure.due_date,
                }
            })
            .collect();

        let total_fee: Decimal = structures.iter().map(|s| s.amount).sum();
        let total_paid: Decimal = structures.iter().map(|s| s.paid_amount).sum();
        let balance: Decimal = structures.iter().map(|s| s.balance).sum();

        debug!(
            "Student {} owes {} over {} fee structure(s)",
            student_id,
            balance,
            structures.len()
        );
        Ok(FeeSummary {
            student_id,
            class: student.class,
            structures,
            total_fee,
            total_paid,
            balance,
        })
    }

    /// Appends a payment and issues its receipt number.
    ///
    /// Each attempt runs in its own transaction. A receipt number that is
    /// already taken rolls the attempt back and a fresh token is drawn, up to
    /// `max_attempts` times. Amounts are stored as given.
    #[instrument(skip(self, db, remarks))]
    pub async fn record_payment(
        &self,
        db: &DatabaseConnection,
        student_id: i32,
        fee_structure_id: i32,
        amount_paid: Decimal,
        payment_method: &str,
        remarks: Option<String>,
    ) -> Result<fee_payment::Model> {
        trace!("Recording payment");
        let today = self.today();

        for attempt in 1..=self.max_attempts {
            let receipt_number = format_receipt_number(today, &self.tokens.next_token());
            let txn = db.begin().await?;

            let inserted = insert_payment(
                &txn,
                student_id,
                fee_structure_id,
                fee_payment::ActiveModel {
                    student_id: Set(student_id),
                    fee_structure_id: Set(fee_structure_id),
                    amount_paid: Set(amount_paid),
                    date_paid: Set(today),
                    receipt_number: Set(receipt_number.clone()),
                    payment_method: Set(payment_method.to_string()),
                    remarks: Set(remarks.clone()),
                    ..Default::default()
                },
            )
            .await;

            match inserted {
                Ok(payment) => {
                    txn.commit().await?;
                    info!(
                        "Recorded payment {} with receipt {} on attempt {}",
                        payment.id, payment.receipt_number, attempt
                    );
                    return Ok(payment);
                }
                Err(ComputeError::Database(err)) if is_unique_violation(&err) => {
                    txn.rollback().await?;
                    warn!(
                        "Receipt number {} already issued (attempt {}/{}), retrying",
                        receipt_number, attempt, self.max_attempts
                    );
                }
                Err(err) => {
                    txn.rollback().await?;
                    return Err(err);
                }
            }
        }

        error!(
            "Could not allocate a unique receipt number after {} attempts",
            self.max_attempts
        );
        Err(ComputeError::ReceiptCollision {
            attempts: self.max_attempts,
        })
    }

    /// Balance before and after one payment.
    ///
    /// Earlier payments are those on the same student and fee structure with a
    /// smaller id. Payment dates are not consulted.
    #[instrument(skip(self, db))]
    pub async fn receipt_breakdown(
        &self,
        db: &DatabaseConnection,
        payment_id: i32,
    ) -> Result<ReceiptBreakdown> {
        trace!("Computing receipt breakdown");
        let payment = find_fee_payment(db, payment_id).await?;
        let structure = find_fee_structure(db, payment.fee_structure_id).await?;
        let paid_before = paid_towards(
            db,
            payment.student_id,
            payment.fee_structure_id,
            Some(payment.id),
        )
        .await?;

        let previous_balance = structure.amount - paid_before;
        Ok(ReceiptBreakdown {
            payment_id: payment.id,
            previous_balance,
            amount_paid: payment.amount_paid,
            new_balance: previous_balance - payment.amount_paid,
        })
    }

    /// Payments made by a student, newest first.
    #[instrument(skip(self, db))]
    pub async fn payments_for_student(
        &self,
        db: &DatabaseConnection,
        student_id: i32,
    ) -> Result<Vec<fee_payment::Model>> {
        let student = find_student(db, student_id).await?;
        Ok(student
            .find_related(fee_payment::Entity)
            .order_by_desc(fee_payment::Column::Id)
            .all(db)
            .await?)
    }
}

/// Ledger with the server clock and random receipt tokens.
pub fn default_ledger() -> FeeLedger {
    FeeLedger::default()
}

/// Most recent payments across all students, with the paying student.
#[instrument(skip(db))]
pub async fn recent_payments(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<(fee_payment::Model, Option<student::Model>)>> {
    Ok(fee_payment::Entity::find()
        .find_also_related(student::Entity)
        .order_by_desc(fee_payment::Column::Id)
        .limit(limit)
        .all(db)
        .await?)
}

/// Removes a fee structure that has no payments.
#[instrument(skip(db))]
pub async fn delete_fee_structure(db: &DatabaseConnection, id: i32) -> Result<()> {
    let structure = find_fee_structure(db, id).await?;
    let payments = structure.find_related(fee_payment::Entity).count(db).await?;
    if payments > 0 {
        warn!("Fee structure {} still has {} payment(s)", id, payments);
        return Err(ComputeError::FeeStructureInUse { id, payments });
    }

    structure.delete(db).await?;
    info!("Fee structure {} deleted", id);
    Ok(())
}

async fn insert_payment<C: ConnectionTrait>(
    conn: &C,
    student_id: i32,
    fee_structure_id: i32,
    payment: fee_payment::ActiveModel,
) -> Result<fee_payment::Model> {
    find_student(conn, student_id).await?;
    find_fee_structure(conn, fee_structure_id).await?;
    Ok(payment.insert(conn).await?)
}

/// Sum paid by a student towards a fee structure, optionally only by payments
/// with an id below `before_id`.
async fn paid_towards<C: ConnectionTrait>(
    conn: &C,
    student_id: i32,
    fee_structure_id: i32,
    before_id: Option<i32>,
) -> Result<Decimal> {
    let mut query = fee_payment::Entity::find()
        .filter(fee_payment::Column::StudentId.eq(student_id))
        .filter(fee_payment::Column::FeeStructureId.eq(fee_structure_id));
    if let Some(before_id) = before_id {
        query = query.filter(fee_payment::Column::Id.lt(before_id));
    }

    let payments = query.all(conn).await?;
    Ok(payments.iter().map(|p| p.amount_paid).sum())
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
