//! Subjects backed by JSON documents, and the uniqueness index they can
//! consult.

mod json;
mod unique_index;

pub use json::JsonSubject;
pub use unique_index::InMemoryUniqueIndex;
