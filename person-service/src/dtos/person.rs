use crate::models::{Person, PersonChanges, UpdateOutcome};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Body of `POST /person`. Any `_id` sent by the client is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePersonRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl From<CreatePersonRequest> for Person {
    fn from(req: CreatePersonRequest) -> Self {
        Person::new(req.firstname, req.lastname)
    }
}

/// Body of `PATCH /person/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdatePersonRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl Validate for UpdatePersonRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.firstname.is_none() && self.lastname.is_none() {
            let mut error = ValidationError::new("empty_update");
            error.message = Some("At least one of firstname or lastname must be provided".into());
            errors.add("__all__", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<UpdatePersonRequest> for PersonChanges {
    fn from(req: UpdatePersonRequest) -> Self {
        PersonChanges {
            firstname: req.firstname,
            lastname: req.lastname,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonResponse {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            id: person.id.map(|id| id.to_hex()),
            firstname: person.firstname,
            lastname: person.lastname,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertResponse {
    pub inserted_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<UpdateOutcome> for UpdateResponse {
    fn from(outcome: UpdateOutcome) -> Self {
        Self {
            matched_count: outcome.matched_count,
            modified_count: outcome.modified_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    #[test]
    fn response_renders_id_as_hex_string() {
        let id = ObjectId::new();
        let person = Person {
            id: Some(id),
            firstname: Some("Ada".to_string()),
            lastname: Some("Lovelace".to_string()),
        };

        let body = serde_json::to_value(PersonResponse::from(person)).unwrap();

        assert_eq!(
            body,
            json!({ "_id": id.to_hex(), "firstname": "Ada", "lastname": "Lovelace" })
        );
    }

    #[test]
    fn response_omits_absent_fields() {
        let body = serde_json::to_value(PersonResponse::from(Person::default())).unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn create_request_ignores_client_id() {
        let req: CreatePersonRequest = serde_json::from_value(json!({
            "_id": "507f1f77bcf86cd799439011",
            "firstname": "Ada"
        }))
        .unwrap();

        let person = Person::from(req);
        assert!(person.id.is_none());
        assert_eq!(person.firstname.as_deref(), Some("Ada"));
    }

    #[test]
    fn empty_update_fails_validation() {
        let req: UpdatePersonRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.validate().is_err());

        let req: UpdatePersonRequest =
            serde_json::from_value(json!({ "lastname": "Hopper" })).unwrap();
        assert!(req.validate().is_ok());
    }
}
