use sea_orm::entity::prelude::*;

/// Name of the row seeded as the default threshold table.
pub const DEFAULT_NAME: &str = "Default Grading System";

/// A letter-grade threshold table. Exactly one row carries `is_default`, and
/// that row is the one used to classify scores.
///
/// Bands are inclusive on both ends. Nothing checks that they are ordered,
/// contiguous or non-overlapping.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "grading_system")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub min_a: i32,
    pub max_a: i32,
    pub min_b: i32,
    pub max_b: i32,
    pub min_c: i32,
    pub max_c: i32,
    pub min_d: i32,
    pub max_d: i32,
    pub min_f: i32,
    pub max_f: i32,
    pub is_default: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
