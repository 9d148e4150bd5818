pub mod health;
pub mod person;

pub use health::{
    health_check, method_not_allowed, metrics_endpoint, not_found, readiness_check,
};
pub use person::{create_person, delete_person, get_person, list_people, update_person};
