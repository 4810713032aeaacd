//! Project storage port: durable home of the persisted project snapshot.

use crate::error::StudioError;
use crate::project::ProjectSnapshot;

/// Durable client-local storage for one named project snapshot.
pub trait ProjectStorage: Send {
    /// Read the snapshot, or `None` when nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read or decoded.
    fn load(&self) -> Result<Option<ProjectSnapshot>, StudioError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, snapshot: &ProjectSnapshot) -> Result<(), StudioError>;

    /// Discard the stored snapshot. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing snapshot cannot be removed.
    fn clear(&self) -> Result<(), StudioError>;
}
