//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system. Implementations live in `src/adapters/`.

pub mod generative_model;
pub mod project_storage;

pub use generative_model::{ContentRequest, ContentResponse, GenerativeModel, InlineImage, Part};
pub use project_storage::ProjectStorage;
