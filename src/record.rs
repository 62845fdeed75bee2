use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Identity and timestamp columns shared by every persisted entity.
///
/// The serialized form is the public shape: the internal `id` is never
/// written out, only the `uuid`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(skip_serializing)]
    pub id: i64, // internal row id
    pub uuid: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Generates the external identifier for a record that is about to be
/// inserted. Updates never call this.
pub fn assign_identity() -> Uuid {
    Uuid::new_v4()
}

/// Parses an externally supplied uuid. A malformed value cannot match any
/// record, so it is reported as `NotFound` for `entity`.
pub fn parse_uuid(raw: &str, entity: &'static str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(entity))
}
