//! Score to letter-grade classification.
//!
//! The active thresholds live in the `grading_system` row flagged as default.
//! Every classification reads that row again, so a threshold change applies to
//! the next score classified and never to letters already stored on grades.

use model::entities::grade::GradeLetter;
use model::entities::grading_system;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::Result;

/// Inclusive score range for one letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeBand {
    pub min: i32,
    pub max: i32,
}

impl GradeBand {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, score: Decimal) -> bool {
        score >= Decimal::from(self.min) && score <= Decimal::from(self.max)
    }
}

/// The five bands of a threshold table.
///
/// Bands are not required to be ordered or contiguous. The F band is stored
/// for display only: anything outside A to D is an F.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeThresholds {
    pub a: GradeBand,
    pub b: GradeBand,
    pub c: GradeBand,
    pub d: GradeBand,
    pub f: GradeBand,
}

impl Default for GradeThresholds {
    /// Built-in table used when no default row exists. Scores between or
    /// above its bands are an F, as with a stored table.
    fn default() -> Self {
        Self {
            a: GradeBand::new(80, 100),
            b: GradeBand::new(70, 79),
            c: GradeBand::new(60, 69),
            d: GradeBand::new(50, 59),
            f: GradeBand::new(0, 49),
        }
    }
}

impl GradeThresholds {
    /// First band containing `score`, checked A, B, C, D in that order.
    pub fn letter_for(&self, score: Decimal) -> GradeLetter {
        [
            (GradeLetter::A, self.a),
            (GradeLetter::B, self.b),
            (GradeLetter::C, self.c),
            (GradeLetter::D, self.d),
        ]
        .into_iter()
        .find(|(_, band)| band.contains(score))
        .map(|(letter, _)| letter)
        .unwrap_or(GradeLetter::F)
    }

    fn apply_to(&self, active: &mut grading_system::ActiveModel) {
        active.min_a = Set(self.a.min);
        active.max_a = Set(self.a.max);
        active.min_b = Set(self.b.min);
        active.max_b = Set(self.b.max);
        active.min_c = Set(self.c.min);
        active.max_c = Set(self.c.max);
        active.min_d = Set(self.d.min);
        active.max_d = Set(self.d.max);
        active.min_f = Set(self.f.min);
        active.max_f = Set(self.f.max);
    }
}

impl From<&grading_system::Model> for GradeThresholds {
    fn from(model: &grading_system::Model) -> Self {
        Self {
            a: GradeBand::new(model.min_a, model.max_a),
            b: GradeBand::new(model.min_b, model.max_b),
            c: GradeBand::new(model.min_c, model.max_c),
            d: GradeBand::new(model.min_d, model.max_d),
            f: GradeBand::new(model.min_f, model.max_f),
        }
    }
}

/// Maps scores to letters using the stored default thresholds.
#[derive(Debug, Clone, Default)]
pub struct GradeClassifier {
    fallback: GradeThresholds,
}

impl GradeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `fallback` instead of the built-in table when the default row is missing.
    pub fn with_fallback(fallback: GradeThresholds) -> Self {
        Self { fallback }
    }

    /// Classifies `score` against the thresholds in effect right now.
    ///
    /// Never fails: a missing default row or a read error falls back to the
    /// built-in table.
    #[instrument(skip(self, db))]
    pub async fn classify(&self, db: &DatabaseConnection, score: Decimal) -> GradeLetter {
        let letter = self.current_thresholds(db).await.letter_for(score);
        debug!("Score {} classified as {}", score, letter);
        letter
    }

    /// Reads the default threshold row.
    #[instrument(skip(self, db))]
    pub async fn current_thresholds(&self, db: &DatabaseConnection) -> GradeThresholds {
        trace!("Loading default grading thresholds");
        match default_grading_system(db).await {
            Ok(Some(system)) => GradeThresholds::from(&system),
            Ok(None) => {
                warn!("No default grading system configured, using built-in thresholds");
                self.fallback
            }
            Err(e) => {
                error!("Failed to load grading thresholds, using built-in thresholds: {}", e);
                self.fallback
            }
        }
    }
}

/// Returns the grading system row flagged as default, if any.
#[instrument(skip(db))]
pub async fn default_grading_system(
    db: &DatabaseConnection,
) -> Result<Option<grading_system::Model>> {
    find_default(db).await
}

async fn find_default<C: ConnectionTrait>(conn: &C) -> Result<Option<grading_system::Model>> {
    Ok(grading_system::Entity::find()
        .filter(grading_system::Column::IsDefault.eq(true))
        .one(conn)
        .await?)
}

/// Overwrites the default threshold row.
///
/// If no default row exists one is created (reusing the row with the default
/// name when present), and any other row still flagged as default is cleared,
/// so exactly one default row exists afterwards. Bands are stored as given.
#[instrument(skip(db))]
pub async fn update_default_thresholds(
    db: &DatabaseConnection,
    thresholds: GradeThresholds,
) -> Result<grading_system::Model> {
    trace!("Updating default grading thresholds");
    let txn = db.begin().await?;

    let existing = match find_default(&txn).await? {
        Some(system) => Some(system),
        None => {
            warn!("Default grading system missing, recreating it");
            grading_system::Entity::find()
                .filter(grading_system::Column::Name.eq(grading_system::DEFAULT_NAME))
                .one(&txn)
                .await?
        }
    };

    let saved = match existing {
        Some(system) => {
            let mut active: grading_system::ActiveModel = system.into();
            thresholds.apply_to(&mut active);
            active.is_default = Set(true);
            active.update(&txn).await?
        }
        None => {
            let mut active = grading_system::ActiveModel {
                name: Set(grading_system::DEFAULT_NAME.to_string()),
                is_default: Set(true),
                ..Default::default()
            };
            thresholds.apply_to(&mut active);
            active.insert(&txn).await?
        }
    };

    grading_system::Entity::update_many()
        .col_expr(grading_system::Column::IsDefault, Expr::value(false))
        .filter(grading_system::Column::IsDefault.eq(true))
        .filter(grading_system::Column::Id.ne(saved.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    info!("Default grading thresholds updated (system {})", saved.id);
    Ok(saved)
}
