pub mod error;
pub mod store;
pub mod testing;
pub mod types;

pub use error::StorageError;
pub use store::ObjectStore;
pub use types::StoredObject;
