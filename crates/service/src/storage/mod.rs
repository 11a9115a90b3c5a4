//! Storage abstractions for the service layer
//!
//! A storage area is a synchronous string-to-string map, the same contract a
//! browser offers for per-origin local storage. `PassengerStore` only talks
//! to this trait, so it runs against memory in tests and a JSON file on disk.

use std::sync::Arc;

use crate::errors::ServiceError;

pub mod json_file;
pub mod memory;

pub trait KeyValueStorage {
    /// Value under `key`, or `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`, replacing whatever was there.
    fn set(&self, key: &str, value: &str) -> Result<(), ServiceError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> Option<String> { (**self).get(key) }
    fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> { (**self).set(key, value) }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get(&self, key: &str) -> Option<String> { (**self).get(key) }
    fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> { (**self).set(key, value) }
}
