//! Service context that selects the generative model adapter.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::adapters::live::gemini::GeminiModel;
use crate::adapters::live::unconfigured::UnconfiguredModel;
use crate::adapters::recording::generative_model::RecordingGenerativeModel;
use crate::adapters::replaying::generative_model::ReplayingGenerativeModel;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::StudioError;
use crate::ports::GenerativeModel;
use crate::studio::Studio;

/// Cassette to replay instead of calling the provider.
pub const REPLAY_ENV: &str = "STYLE_STUDIO_REPLAY";

/// Set to `1`/`true` to record provider calls into a cassette.
pub const RECORD_ENV: &str = "STYLE_STUDIO_REC";

/// Bundles the port implementations a run uses.
pub struct ServiceContext {
    /// Generative model port.
    pub model: Box<dyn GenerativeModel>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording adapter is still alive or the
    /// cassette cannot be written.
    pub fn finish(self) -> Result<PathBuf, StudioError> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| StudioError::Config("Recording adapter still has references".into()))?
            .into_inner()
            .map_err(|e| StudioError::Config(format!("Recorder lock poisoned: {e}")))?;
        let count = recorder.len();
        let path = recorder.finish()?;
        info!("Recorded {count} interaction(s)");
        Ok(path)
    }
}

impl ServiceContext {
    /// Pick live, recording or replaying mode from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a replay cassette cannot be loaded.
    pub fn from_env(config: &Config) -> Result<(Self, Option<RecordingSession>), StudioError> {
        if let Ok(cassette_path) = std::env::var(REPLAY_ENV) {
            info!("Replaying provider calls from {cassette_path}");
            return Ok((Self::replaying(Path::new(&cassette_path))?, None));
        }
        if std::env::var(RECORD_ENV).is_ok_and(|v| v == "true" || v == "1") {
            info!("Recording provider calls");
            let (ctx, session) = Self::recording(config);
            return Ok((ctx, Some(session)));
        }
        Ok((Self::live(config), None))
    }

    /// Create a live context. Without a credential every call fails with
    /// [`StudioError::MissingApiKey`].
    #[must_use]
    pub fn live(config: &Config) -> Self {
        let model: Box<dyn GenerativeModel> = match config.api_key() {
            Some(key) => Box::new(GeminiModel::new(key)),
            None => {
                warn!(
                    "No API key found in GOOGLE_AI_API_KEY, GEMINI_API_KEY or the config file; \
                     provider calls will fail"
                );
                Box::new(UnconfiguredModel)
            }
        };
        Self { model }
    }

    /// Create a recording context that wraps the live adapter with a recorder.
    #[must_use]
    pub fn recording(config: &Config) -> (Self, RecordingSession) {
        let live_ctx = Self::live(config);

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".style-studio/cassettes")
            .join(&timestamp)
            .join("generative_model.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-generative_model"),
            get_commit_hash(),
        )));

        let model = RecordingGenerativeModel::new(live_ctx.model, Arc::clone(&recorder));
        (Self { model: Box::new(model) }, RecordingSession { recorder })
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, StudioError> {
        let replayer = Arc::new(Mutex::new(load_cassette(path)?));
        Ok(Self { model: Box::new(ReplayingGenerativeModel::new(replayer)) })
    }

    /// Build the studio facade over this context's model.
    #[must_use]
    pub fn into_studio(self, config: &Config) -> Studio {
        Studio::new(self.model, config.profiles())
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
