pub mod path;
pub mod validation;

pub use path::PathParam;
pub use validation::ValidatedJson;
