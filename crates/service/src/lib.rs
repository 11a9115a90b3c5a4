//! Service layer around the locally stored passenger list.
//! - `storage`: the key-value storage port and its implementations.
//! - `passenger_store`: load/migrate/CRUD over the list kept under one key.
//! - `select`: option entries for the passenger picker of a booking form.

pub mod errors;
pub mod passenger_store;
pub mod select;
pub mod storage;

pub use errors::ServiceError;
pub use passenger_store::PassengerStore;
pub use select::SelectOption;
pub use storage::{json_file::JsonFileStorage, memory::MemoryStorage, KeyValueStorage};
