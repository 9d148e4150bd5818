//! Process-local store used by `STORAGE_BACKEND=memory` and the test suite.

use crate::models::{Person, PersonChanges, UpdateOutcome};
use crate::services::PersonStore;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryPersonStore {
    people: RwLock<Vec<Person>>,
}

impl InMemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonStore for InMemoryPersonStore {
    async fn list(&self) -> Result<Vec<Person>, AppError> {
        Ok(self.people.read().await.clone())
    }

    async fn insert(&self, mut person: Person) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        person.id = Some(id);
        self.people.write().await.push(person);
        Ok(id)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Person>, AppError> {
        Ok(self
            .people
            .read()
            .await
            .iter()
            .find(|p| p.id == Some(id))
            .cloned())
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: PersonChanges,
    ) -> Result<UpdateOutcome, AppError> {
        let mut people = self.people.write().await;
        let outcome = match people.iter_mut().find(|p| p.id == Some(id)) {
            Some(person) => UpdateOutcome {
                matched_count: 1,
                modified_count: u64::from(changes.apply_to(person)),
            },
            None => UpdateOutcome::default(),
        };
        Ok(outcome)
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, AppError> {
        let mut people = self.people.write().await;
        let before = people.len();
        people.retain(|p| p.id != Some(id));
        Ok((before - people.len()) as u64)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
