use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

/// A person as stored in the `people` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
}

impl Person {
    pub fn new(firstname: Option<String>, lastname: Option<String>) -> Self {
        Self {
            id: None,
            firstname,
            lastname,
        }
    }
}

/// Fields to overwrite on an existing person. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonChanges {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl PersonChanges {
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none() && self.lastname.is_none()
    }

    /// Body of the `$set` operator for this change set.
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(firstname) = &self.firstname {
            set.insert("firstname", firstname.as_str());
        }
        if let Some(lastname) = &self.lastname {
            set.insert("lastname", lastname.as_str());
        }
        set
    }

    pub fn to_update_document(&self) -> Document {
        doc! { "$set": self.to_set_document() }
    }

    /// Applies the changes in place, returning whether anything differed.
    pub fn apply_to(&self, person: &mut Person) -> bool {
        let mut modified = false;
        if let Some(firstname) = &self.firstname {
            if person.firstname.as_ref() != Some(firstname) {
                person.firstname = Some(firstname.clone());
                modified = true;
            }
        }
        if let Some(lastname) = &self.lastname {
            if person.lastname.as_ref() != Some(lastname) {
                person.lastname = Some(lastname.clone());
                modified = true;
            }
        }
        modified
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Parses the hex form of an ObjectId taken from a request path.
pub fn parse_person_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid person id: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_hex_id() {
        let id = ObjectId::new();
        assert_eq!(parse_person_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn rejects_malformed_ids() {
        for raw in ["", "abc", "zzzzzzzzzzzzzzzzzzzzzzzz", "507f1f77bcf86cd79943901"] {
            let err = parse_person_id(raw).unwrap_err();
            assert_eq!(err.code(), "validation", "accepted {:?}", raw);
        }
    }

    #[test]
    fn set_document_contains_only_present_fields() {
        let changes = PersonChanges {
            firstname: Some("Grace".to_string()),
            lastname: None,
        };

        assert_eq!(changes.to_set_document(), doc! { "firstname": "Grace" });
        assert_eq!(
            changes.to_update_document(),
            doc! { "$set": { "firstname": "Grace" } }
        );
    }

    #[test]
    fn apply_reports_modification() {
        let mut person = Person::new(Some("Ada".to_string()), Some("Lovelace".to_string()));

        let same = PersonChanges {
            firstname: Some("Ada".to_string()),
            lastname: None,
        };
        assert!(!same.apply_to(&mut person));

        let rename = PersonChanges {
            firstname: Some("Grace".to_string()),
            lastname: None,
        };
        assert!(rename.apply_to(&mut person));
        assert_eq!(person.firstname.as_deref(), Some("Grace"));
        assert_eq!(person.lastname.as_deref(), Some("Lovelace"));
    }

    #[test]
    fn stored_document_omits_missing_fields() {
        let person = Person::new(Some("Ada".to_string()), None);
        let document = mongodb::bson::to_document(&person).unwrap();

        assert_eq!(document, doc! { "firstname": "Ada" });
    }
}
