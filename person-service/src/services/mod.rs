pub mod bounded;
pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use self::bounded::bounded;
pub use self::database::MongoPersonStore;
pub use self::memory::InMemoryPersonStore;
pub use self::metrics::{get_metrics, init_metrics, record_store_operation};
pub use self::store::PersonStore;
