//! Error taxonomy for the scheduling service.

use thiserror::Error;

use slotbook_engine::RuleError;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// The named resource does not exist. No retry will help.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed caller input on a write path.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requested start instant is already held by a confirmed booking.
    /// Callers should prompt for a different time, not report a fault.
    #[error("slot already booked")]
    SlotTaken,

    /// A rule document failed validation on save.
    #[error(transparent)]
    InvalidRule(#[from] RuleError),

    /// Unexpected storage failure, propagated uninterpreted.
    #[error(transparent)]
    Storage(anyhow::Error),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => ServiceError::SlotTaken,
            StoreError::Backend(source) => ServiceError::Storage(source),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
