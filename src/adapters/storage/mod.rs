//! Storage adapters for the project snapshot.

pub mod file;
