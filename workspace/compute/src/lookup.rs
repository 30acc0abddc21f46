//! Row lookups that turn a missing row into `ComputeError::NotFound`.

use model::entities::{fee_payment, fee_structure, student};
use sea_orm::{ConnectionTrait, EntityTrait};
use tracing::warn;

use crate::error::{ComputeError, Result};

pub async fn find_student<C: ConnectionTrait>(conn: &C, id: i32) -> Result<student::Model> {
    student::Entity::find_by_id(id).one(conn).await?.ok_or_else(|| {
        warn!("Student with ID {} not found", id);
        ComputeError::not_found("Student", id)
    })
}

pub async fn find_fee_structure<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<fee_structure::Model> {
    fee_structure::Entity::find_by_id(id).one(conn).await?.ok_or_else(|| {
        warn!("Fee structure with ID {} not found", id);
        ComputeError::not_found("Fee structure", id)
    })
}

pub async fn find_fee_payment<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<fee_payment::Model> {
    fee_payment::Entity::find_by_id(id).one(conn).await?.ok_or_else(|| {
        warn!("Fee payment with ID {} not found", id);
        ComputeError::not_found("Fee payment", id)
    })
}
