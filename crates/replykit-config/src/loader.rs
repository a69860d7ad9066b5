//! Settings loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Settings;

const APP_DIR: &str = "replykit";
const SETTINGS_FILE: &str = "settings.toml";

/// Settings loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Settings, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load settings from a string.
    pub fn load_str(content: &str) -> Result<Settings, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        Self::load_unexpanded_str(&expanded)
    }

    /// Parse settings keeping `${VAR}` references as written.
    pub fn load_unexpanded_str(content: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    /// Whether `content` holds any `${VAR}` reference.
    pub fn has_env_refs(content: &str) -> bool {
        content.contains("${")
    }

    /// Serialize settings back to TOML.
    pub fn to_toml(settings: &Settings) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(settings)?)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// `<config dir>/replykit/settings.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_settings() {
        let settings = ConfigLoader::load_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_expand_path() {
        let expanded = ConfigLoader::expand_path("~/.config/replykit");
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_default_path_ends_with_settings_file() {
        if let Ok(path) = ConfigLoader::default_path() {
            assert!(path.ends_with("replykit/settings.toml"));
        }
    }

    #[test]
    fn test_load_camel_case_keys() {
        let content = r#"
            apiKey = "sk-abc"
            apiProvider = "anthropic"
            defaultTone = "humorous"
            language = "de"
        "#;
        let settings = ConfigLoader::load_str(content).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("sk-abc"));
        assert_eq!(settings.api_provider.as_deref(), Some("anthropic"));
        assert_eq!(settings.default_tone, "humorous");
        assert_eq!(settings.language, "de");
    }

    #[test]
    fn test_load_endpoints_table() {
        let content = r#"
            apiProvider = "groq"

            [endpoints]
            groq = "http://127.0.0.1:8081/v1/chat/completions"
        "#;
        let settings = ConfigLoader::load_str(content).unwrap();
        assert_eq!(
            settings.endpoints.groq.as_deref(),
            Some("http://127.0.0.1:8081/v1/chat/completions")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "apiKey = \"sk-file\"").unwrap();
        writeln!(file, "language = \"es\"").unwrap();

        let settings = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("sk-file"));
        assert_eq!(settings.language, "es");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/settings.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("apiKey = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let settings = Settings {
            api_key: Some("sk-1".to_string()),
            api_provider: Some("gemini".to_string()),
            ..Default::default()
        };
        let text = ConfigLoader::to_toml(&settings).unwrap();
        assert!(text.contains("apiKey"));
        assert!(!text.contains("endpoints"));
        assert_eq!(ConfigLoader::load_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: unique test-only env var
        unsafe {
            std::env::set_var("REPLYKIT_TEST_KEY", "sk-from-env");
        }
        let settings = ConfigLoader::load_str("apiKey = \"${REPLYKIT_TEST_KEY}\"").unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("sk-from-env"));
        unsafe {
            std::env::remove_var("REPLYKIT_TEST_KEY");
        }
    }

    #[test]
    fn test_load_unexpanded_keeps_references() {
        let content = "apiKey = \"${NONEXISTENT_REPLYKIT_VAR_12345}\"";
        assert!(ConfigLoader::has_env_refs(content));
        let settings = ConfigLoader::load_unexpanded_str(content).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("${NONEXISTENT_REPLYKIT_VAR_12345}"));
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "apiKey = \"${NONEXISTENT_REPLYKIT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "apiKey = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }
}
