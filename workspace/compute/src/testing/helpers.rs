use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

use model::entities::{fee_structure, student, teacher};

use crate::fees::{RandomReceiptTokens, ReceiptTokenSource};

pub type Result<T> = std::result::Result<T, DbErr>;

pub async fn new_student(db: &DatabaseConnection, class: Option<&str>) -> Result<student::Model> {
    static STUDENT_ID: AtomicU64 = AtomicU64::new(0);

    let current_id = STUDENT_ID.fetch_add(1, Ordering::SeqCst);
    student::ActiveModel {
        admission_number: Set(format!("ADM-{:04}", current_id)),
        name: Set(format!("Student {}", current_id)),
        class: Set(class.map(str::to_string)),
        has_medical_condition: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_teacher(db: &DatabaseConnection, name: &str) -> Result<teacher::Model> {
    teacher::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_fee_structure(
    db: &DatabaseConnection,
    class: &str,
    term: &str,
    year: i32,
    amount: i64,
) -> Result<fee_structure::Model> {
    fee_structure::ActiveModel {
        class: Set(class.to_string()),
        term: Set(term.to_string()),
        year: Set(year),
        amount: Set(Decimal::from(amount)),
        description: Set(Some(format!("{} fees", term))),
        due_date: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Hands out the given tokens in order, then random ones.
pub struct ScriptedTokens {
    tokens: Mutex<VecDeque<String>>,
}

impl ScriptedTokens {
    pub fn new(tokens: &[&str]) -> Self {
        Self {
            tokens: Mutex::new(tokens.iter().map(|t| t.to_string()).collect()),
        }
    }
}

impl ReceiptTokenSource for ScriptedTokens {
    fn next_token(&self) -> String {
        self.tokens
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| RandomReceiptTokens.next_token())
    }
}
