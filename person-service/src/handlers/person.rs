use crate::dtos::{
    CreatePersonRequest, DeleteResponse, InsertResponse, PersonResponse, UpdatePersonRequest,
    UpdateResponse,
};
use crate::models::{parse_person_id, Person, PersonChanges};
use crate::startup::AppState;
use axum::{
    extract::State,
    Json,
};
use service_core::error::AppError;
use service_core::utils::{PathParam, ValidatedJson};

/// `GET /person`
pub async fn list_people(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonResponse>>, AppError> {
    let people = state
        .with_store("list", |store| async move { store.list().await })
        .await?;

    tracing::debug!(count = people.len(), "Listed people");

    Ok(Json(people.into_iter().map(PersonResponse::from).collect()))
}

/// `POST /person`
pub async fn create_person(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePersonRequest>,
) -> Result<Json<InsertResponse>, AppError> {
    let person = Person::from(payload);

    let id = state
        .with_store("insert", |store| async move { store.insert(person).await })
        .await?;

    tracing::info!(person_id = %id, "Person created");

    Ok(Json(InsertResponse {
        inserted_id: id.to_hex(),
    }))
}

/// `GET /person/{id}`
pub async fn get_person(
    State(state): State<AppState>,
    PathParam(raw_id): PathParam<String>,
) -> Result<Json<PersonResponse>, AppError> {
    let id = parse_person_id(&raw_id)?;

    let person = state
        .with_store("find_one", move |store| async move { store.find_by_id(id).await })
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Person {} not found", id)))?;

    Ok(Json(PersonResponse::from(person)))
}

/// `PATCH /person/{id}`
///
/// Overwrites each field present in the payload and leaves the others alone.
/// An unknown id is not an error; it reports zero matches.
pub async fn update_person(
    State(state): State<AppState>,
    PathParam(raw_id): PathParam<String>,
    ValidatedJson(payload): ValidatedJson<UpdatePersonRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    let id = parse_person_id(&raw_id)?;
    let changes = PersonChanges::from(payload);

    let outcome = state
        .with_store("update", move |store| async move {
            store.update(id, changes).await
        })
        .await?;

    tracing::info!(
        person_id = %id,
        matched = outcome.matched_count,
        modified = outcome.modified_count,
        "Person updated"
    );

    Ok(Json(UpdateResponse::from(outcome)))
}

/// `DELETE /person/{id}`
///
/// Deleting an id that does not exist succeeds with `deleted_count: 0`.
pub async fn delete_person(
    State(state): State<AppState>,
    PathParam(raw_id): PathParam<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_person_id(&raw_id)?;

    let deleted_count = state
        .with_store("delete", move |store| async move { store.delete(id).await })
        .await?;

    tracing::info!(person_id = %id, deleted = deleted_count, "Person deleted");

    Ok(Json(DeleteResponse { deleted_count }))
}
