//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::profiles::{Profiles, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};

/// Primary credential variable.
pub const API_KEY_ENV: &str = "GOOGLE_AI_API_KEY";

/// Fallback credential variable, accepted for compatibility.
pub const API_KEY_FALLBACK_ENV: &str = "GEMINI_API_KEY";

/// Overrides the directory holding the project snapshot.
pub const PROJECT_DIR_ENV: &str = "STYLE_STUDIO_PROJECT_DIR";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Model identifier overrides.
    #[serde(default)]
    pub models: ModelsConfig,

    /// Project snapshot location.
    #[serde(default)]
    pub project: ProjectConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Google AI API key.
    pub google_ai: Option<String>,
    /// Gemini API key (fallback name).
    pub gemini: Option<String>,
}

/// HTTP server settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "127.0.0.1:3000".to_string(), max_body_bytes: 25 * 1024 * 1024 }
    }
}

/// Model identifier overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Model for treatments and rewrites.
    pub text: String,
    /// Model for image synthesis.
    pub image: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self { text: DEFAULT_TEXT_MODEL.to_string(), image: DEFAULT_IMAGE_MODEL.to_string() }
    }
}

/// Project snapshot location.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    /// Directory holding the snapshot file.
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Resolve the provider credential from the process environment.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        self.api_key_from(|name| std::env::var(name).ok())
    }

    /// Resolve the provider credential: primary variable, fallback variable,
    /// then the two config file entries. Blank values are skipped.
    #[must_use]
    pub fn api_key_from(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        [
            env(API_KEY_ENV),
            env(API_KEY_FALLBACK_ENV),
            self.keys.google_ai.clone(),
            self.keys.gemini.clone(),
        ]
        .into_iter()
        .flatten()
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
    }

    /// Model profiles with any configured model overrides applied.
    #[must_use]
    pub fn profiles(&self) -> Profiles {
        Profiles::new(&self.models.text, &self.models.image)
    }

    /// Directory holding the project snapshot.
    #[must_use]
    pub fn project_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var(PROJECT_DIR_ENV) {
            return PathBuf::from(dir);
        }
        self.project.dir.clone().unwrap_or_else(config_dir)
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `STYLE_STUDIO_CONFIG` environment variable
/// 3. `~/.config/style-studio/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("STYLE_STUDIO_CONFIG") {
        return PathBuf::from(p);
    }

    config_dir().join("config.toml")
}

/// `~/.config/style-studio`, or the working directory without a home.
fn config_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/style-studio")
    } else {
        PathBuf::from(".style-studio")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.keys.google_ai.is_none());
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.server.max_body_bytes, 25 * 1024 * 1024);
        assert_eq!(config.models.text, "gemini-2.0-flash");
        assert_eq!(config.models.image, "gemini-2.0-flash-exp-image-generation");
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.models.text, "gemini-2.0-flash");
    }

    #[test]
    fn load_valid_toml() {
        let dir = std::env::temp_dir().join("style_studio_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[keys]
gemini = "file-key"

[server]
bind = "0.0.0.0:8080"

[models]
image = "gemini-3-pro-image-preview"

[project]
dir = "/tmp/studio-projects"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.keys.gemini.as_deref(), Some("file-key"));
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.max_body_bytes, 25 * 1024 * 1024);
        assert_eq!(config.models.text, "gemini-2.0-flash");
        assert_eq!(config.profiles().image.model, "gemini-3-pro-image-preview");
        assert_eq!(config.project.dir, Some(PathBuf::from("/tmp/studio-projects")));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_invalid_toml() {
        let dir = std::env::temp_dir().join("style_studio_config_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(Config::load(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn primary_env_wins() {
        let config = Config {
            keys: KeysConfig { google_ai: Some("file".into()), gemini: None },
            ..Config::default()
        };
        let key = config.api_key_from(|name| match name {
            API_KEY_ENV => Some("primary".into()),
            API_KEY_FALLBACK_ENV => Some("fallback".into()),
            _ => None,
        });
        assert_eq!(key.as_deref(), Some("primary"));
    }

    #[test]
    fn fallback_env_accepted() {
        let config = Config::default();
        let key = config.api_key_from(|name| {
            (name == API_KEY_FALLBACK_ENV).then(|| "fallback".to_string())
        });
        assert_eq!(key.as_deref(), Some("fallback"));
    }

    #[test]
    fn blank_values_are_skipped() {
        let config = Config {
            keys: KeysConfig { google_ai: Some("  ".into()), gemini: Some("from-file".into()) },
            ..Config::default()
        };
        let key = config.api_key_from(|name| (name == API_KEY_ENV).then(String::new));
        assert_eq!(key.as_deref(), Some("from-file"));
    }

    #[test]
    fn no_key_anywhere() {
        assert!(Config::default().api_key_from(no_env).is_none());
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some("/tmp/my-config.toml"));
        assert_eq!(path, PathBuf::from("/tmp/my-config.toml"));
    }
}
