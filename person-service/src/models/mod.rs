pub mod person;

pub use person::{parse_person_id, Person, PersonChanges, UpdateOutcome};
