//! Entity to model mappers
//!
//! This module provides conversions from database rows to domain entities.
//! Enum columns are stored as text, so conversions are fallible and report
//! unknown values as database errors.

mod message;
mod room;

pub use room::room_from_parts;
