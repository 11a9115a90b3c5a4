//! Passenger record shapes and the pure logic around them.
//! - `passenger`: the current (v2) record and its presentation helpers.
//! - `legacy`: the combined-field v1 record and the splitters that upgrade it.
//! - `schema`: detection of which shape a stored JSON value carries, and normalization.
//! - `id`: identifier sources for records that arrive without one.

pub mod coerce;
pub mod id;
pub mod legacy;
pub mod passenger;
pub mod schema;

pub use id::{IdSource, SequenceIds, UuidIds};
pub use passenger::PassengerRecord;
pub use schema::{normalize_passenger, StoredPassenger};
