use crate::models::{Person, PersonChanges, UpdateOutcome};
use crate::services::PersonStore;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::ClientOptions,
    Client as MongoClient, Collection,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoPersonStore {
    client: MongoClient,
    people: Collection<Person>,
}

impl MongoPersonStore {
    /// Builds the client handle. The driver connects lazily, so an
    /// unreachable server surfaces on the first operation rather than here.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, collection = %collection, "Connecting to MongoDB");

        let mut client_options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        client_options.app_name = Some("person-service".to_string());

        let client = MongoClient::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let people = client.database(database).collection(collection);

        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self { client, people })
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl PersonStore for MongoPersonStore {
    async fn list(&self) -> Result<Vec<Person>, AppError> {
        let cursor = self.people.find(doc! {}, None).await?;
        let people: Vec<Person> = cursor.try_collect().await?;
        Ok(people)
    }

    async fn insert(&self, mut person: Person) -> Result<ObjectId, AppError> {
        person.id = None;
        let result = self.people.insert_one(&person, None).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!(
                "Inserted id is not an ObjectId: {}",
                result.inserted_id
            ))
        })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Person>, AppError> {
        Ok(self.people.find_one(doc! { "_id": id }, None).await?)
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: PersonChanges,
    ) -> Result<UpdateOutcome, AppError> {
        let result = self
            .people
            .update_one(doc! { "_id": id }, changes.to_update_document(), None)
            .await?;

        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, AppError> {
        let result = self.people.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
