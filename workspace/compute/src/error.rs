use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A referenced row does not exist
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// Every generated receipt number collided with an existing one
    #[error("Could not allocate a unique receipt number after {attempts} attempts")]
    ReceiptCollision { attempts: u32 },

    /// A fee structure cannot be removed while payments point at it
    #[error("Fee structure {id} has {payments} payment(s) recorded against it")]
    FeeStructureInUse { id: i32, payments: u64 },
}

impl ComputeError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        ComputeError::NotFound { entity, id }
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
