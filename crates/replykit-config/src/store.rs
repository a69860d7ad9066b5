//! Settings stores.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::loader::ConfigLoader;
use crate::schema::Settings;

/// Backing storage for [`Settings`].
///
/// The background service calls `load` on every request, so a settings
/// change takes effect on the next generation without a restart.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the current settings. A store with nothing saved yields defaults.
    async fn load(&self) -> Result<Settings, ConfigError>;

    /// Replace the stored settings.
    async fn save(&self, settings: &Settings) -> Result<(), ConfigError>;
}

/// TOML file store.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`ConfigLoader::default_path`].
    pub fn at_default_path() -> Result<Self, ConfigError> {
        Ok(Self::new(ConfigLoader::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file as written, leaving `${VAR}` references unexpanded.
    ///
    /// Edits go through this so that [`save`](SettingsStore::save) never
    /// replaces a reference with the secret it points to.
    pub async fn load_unexpanded(&self) -> Result<Settings, ConfigError> {
        match self.read().await? {
            Some(content) => ConfigLoader::load_unexpanded_str(&content),
            None => Ok(Settings::default()),
        }
    }

    async fn read(&self) -> Result<Option<String>, ConfigError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write default settings when no file exists yet.
    ///
    /// Returns `true` when a file was created.
    pub async fn initialize_defaults(&self) -> Result<bool, ConfigError> {
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(false);
        }
        self.save(&Settings::default()).await?;
        info!(path = %self.path.display(), "wrote default settings");
        Ok(true)
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<Settings, ConfigError> {
        match self.read().await? {
            Some(content) => ConfigLoader::load_str(&content),
            None => Ok(Settings::default()),
        }
    }

    async fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = ConfigLoader::to_toml(settings)?;
        tokio::fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// In-memory store.
#[derive(Default)]
pub struct MemorySettingsStore {
    settings: RwLock<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Settings, ConfigError> {
        Ok(self.settings.read().clone())
    }

    async fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        *self.settings.write() = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.toml"));
        assert_eq!(store.load().await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn test_file_store_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(dir.path().join("nested").join("settings.toml"));

        let settings = Settings {
            api_key: Some("sk-saved".to_string()),
            api_provider: Some("anthropic".to_string()),
            language: "en".to_string(),
            ..Default::default()
        };
        store.save(&settings).await.unwrap();

        assert!(store.path().exists());
        assert_eq!(store.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_editing_keeps_env_references_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "apiKey = \"${REPLYKIT_STORE_TEST_KEY}\"\nlanguage = \"fr\"\n").unwrap();
        // SAFETY: unique test-only env var
        unsafe {
            std::env::set_var("REPLYKIT_STORE_TEST_KEY", "sk-plaintext-secret");
        }

        let store = FileSettingsStore::new(path.clone());
        let mut settings = store.load_unexpanded().await.unwrap();
        settings.language = "en".to_string();
        store.save(&settings).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("${REPLYKIT_STORE_TEST_KEY}"));
        assert!(!content.contains("sk-plaintext-secret"));

        let effective = store.load().await.unwrap();
        assert_eq!(effective.api_key.as_deref(), Some("sk-plaintext-secret"));
        assert_eq!(effective.language, "en");
        unsafe {
            std::env::remove_var("REPLYKIT_STORE_TEST_KEY");
        }
    }

    #[tokio::test]
    async fn test_initialize_defaults_only_once() {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.toml"));

        assert!(store.initialize_defaults().await.unwrap());
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("defaultTone = \"friendly\""));
        assert!(content.contains("language = \"fr\""));

        let mut settings = store.load().await.unwrap();
        settings.api_key = Some("sk-kept".to_string());
        store.save(&settings).await.unwrap();

        assert!(!store.initialize_defaults().await.unwrap());
        assert_eq!(store.load().await.unwrap().api_key.as_deref(), Some("sk-kept"));
    }

    #[tokio::test]
    async fn test_file_store_invalid_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "apiKey = [").unwrap();

        let store = FileSettingsStore::new(path);
        assert!(matches!(store.load().await, Err(ConfigError::TomlParse(_))));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemorySettingsStore::default();
        assert!(!store.load().await.unwrap().has_api_key());

        let settings = Settings {
            api_key: Some("sk-mem".to_string()),
            ..Default::default()
        };
        store.save(&settings).await.unwrap();
        assert_eq!(store.load().await.unwrap(), settings);
    }
}
