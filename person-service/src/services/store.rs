use crate::models::{Person, PersonChanges, UpdateOutcome};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// Persistence for person records. Each method is a single storage call.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// All records, in storage iteration order.
    async fn list(&self) -> Result<Vec<Person>, AppError>;

    /// Inserts a new record and returns the identifier assigned by storage.
    /// Any id already set on `person` is discarded.
    async fn insert(&self, person: Person) -> Result<ObjectId, AppError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Person>, AppError>;

    async fn update(&self, id: ObjectId, changes: PersonChanges)
        -> Result<UpdateOutcome, AppError>;

    /// Returns the number of deleted records (0 or 1).
    async fn delete(&self, id: ObjectId) -> Result<u64, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
