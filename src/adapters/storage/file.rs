//! JSON file storage for the project snapshot.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StudioError;
use crate::ports::ProjectStorage;
use crate::project::ProjectSnapshot;

/// Name the snapshot is stored under.
pub const PROJECT_KEY: &str = "style-studio-project";

const SNAPSHOT_VERSION: u32 = 0;

#[derive(Serialize, Deserialize)]
struct Envelope {
    state: ProjectSnapshot,
    version: u32,
}

/// Keeps the snapshot in `<dir>/style-studio-project.json`.
#[derive(Debug, Clone)]
pub struct FileProjectStorage {
    path: PathBuf,
}

impl FileProjectStorage {
    /// Store snapshots under `dir`.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self { path: dir.join(format!("{PROJECT_KEY}.json")) }
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectStorage for FileProjectStorage {
    fn load(&self) -> Result<Option<ProjectSnapshot>, StudioError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope: Envelope = serde_json::from_str(&contents)?;
        Ok(Some(envelope.state))
    }

    fn save(&self, snapshot: &ProjectSnapshot) -> Result<(), StudioError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let envelope = Envelope { state: snapshot.clone(), version: SNAPSHOT_VERSION };
        let json = serde_json::to_string_pretty(&envelope)?;
        // Readers never observe a partially written snapshot.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StudioError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
