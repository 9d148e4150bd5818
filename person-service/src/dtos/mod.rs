pub mod person;

pub use person::{
    CreatePersonRequest, DeleteResponse, InsertResponse, PersonResponse, UpdatePersonRequest,
    UpdateResponse,
};
