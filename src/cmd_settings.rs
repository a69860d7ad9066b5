//! `settings` command handlers.

use anyhow::{bail, Context};
use tracing::{info, warn};

use replykit_config::{ConfigLoader, ConfigValidator, FileSettingsStore, Settings, SettingsStore};
use replykit_protocols::ProviderId;

use crate::cli::SettingsAction;
use crate::register::register_providers;

pub(crate) async fn handle_settings_command(store: &FileSettingsStore, action: SettingsAction) -> anyhow::Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = store.load_unexpanded().await?;
            println!("# {}", store.path().display());
            print!("{}", ConfigLoader::to_toml(&masked(&settings))?);
            report_validation(&settings)?;
            Ok(())
        }
        SettingsAction::Set {
            api_key,
            provider,
            language,
            tone,
            no_verify,
        } => {
            let mut settings = store.load_unexpanded().await?;
            let key_changed = api_key.is_some();
            if let Some(key) = api_key {
                settings.api_key = Some(key.trim().to_string());
            }
            if let Some(provider) = provider {
                settings.api_provider = Some(provider);
            }
            if let Some(language) = language {
                settings.language = language;
            }
            if let Some(tone) = tone {
                settings.default_tone = tone;
            }

            if !report_validation(&settings)? {
                bail!("settings not saved");
            }
            if key_changed && !no_verify {
                verify_api_key(&settings).await?;
            }
            store.save(&settings).await?;
            info!(path = %store.path().display(), "settings updated");
            println!("Settings saved to {}", store.path().display());
            Ok(())
        }
        SettingsAction::KeyUrl { provider } => {
            let id = match provider {
                Some(name) => ProviderId::parse(&name).with_context(|| format!("unknown provider: {name}"))?,
                None => store.load().await?.provider_config()?.provider,
            };
            println!("{}: {}", id.display_name(), id.api_key_url());
            Ok(())
        }
    }
}

/// Check the configured key with the provider before it is saved.
async fn verify_api_key(settings: &Settings) -> anyhow::Result<()> {
    let effective = ConfigLoader::load_str(&ConfigLoader::to_toml(settings)?)?;
    let config = effective.provider_config()?;
    if !config.is_configured() {
        return Ok(());
    }

    let providers = register_providers(&effective.endpoints)?;
    let provider = providers
        .create(config.provider, &config.api_key, config.language)
        .with_context(|| format!("no adapter registered for {}", config.provider.display_name()))?;

    if let Err(err) = provider.validate_key().await {
        warn!(provider = %config.provider, kind = err.kind().as_str(), "api key rejected");
        bail!("{err}\nsettings not saved (use --no-verify to skip the key check)");
    }
    info!(provider = %config.provider, "api key verified");
    Ok(())
}

/// Print validation findings. Returns whether the settings are valid.
fn report_validation(settings: &Settings) -> anyhow::Result<bool> {
    let result = ConfigValidator::validate(settings)?;
    for warning in &result.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    for error in &result.errors {
        eprintln!("error: {}: {}", error.path, error.message);
    }
    Ok(result.is_valid())
}

/// Mask the API key; `${VAR}` references are shown as written.
fn masked(settings: &Settings) -> Settings {
    let mut settings = settings.clone();
    settings.api_key = settings
        .api_key
        .as_deref()
        .map(|key| if ConfigLoader::has_env_refs(key) { key.to_string() } else { mask_key(key) });
    settings
}

/// Keep the last four characters of a key.
fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sk-abcdef1234"), "*********1234");
        assert_eq!(mask_key("abc"), "***");
        assert_eq!(mask_key(""), "");
    }

    #[test]
    fn test_masked_keeps_env_reference() {
        let settings = Settings {
            api_key: Some("${OPENAI_KEY}".to_string()),
            ..Default::default()
        };
        assert_eq!(masked(&settings).api_key.as_deref(), Some("${OPENAI_KEY}"));
    }

    fn store_with_openai_endpoint(dir: &TempDir, uri: &str) -> FileSettingsStore {
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            format!("apiProvider = \"openai\"\n\n[endpoints]\nopenai = \"{uri}/v1/chat/completions\"\n"),
        )
        .unwrap();
        FileSettingsStore::new(path)
    }

    fn set_key(key: &str, no_verify: bool) -> SettingsAction {
        SettingsAction::Set {
            api_key: Some(key.to_string()),
            provider: None,
            language: None,
            tone: None,
            no_verify,
        }
    }

    #[tokio::test]
    async fn test_set_key_is_verified_before_saving() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v1/models"))
            .and(matchers::header("Authorization", "Bearer sk-good"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": []}"#))
            .expect(1)
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let store = store_with_openai_endpoint(&dir, &server.uri());

        handle_settings_command(&store, set_key("sk-good", false)).await.unwrap();
        assert_eq!(store.load().await.unwrap().api_key.as_deref(), Some("sk-good"));
    }

    #[tokio::test]
    async fn test_rejected_key_is_not_saved() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v1/models"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let store = store_with_openai_endpoint(&dir, &server.uri());

        let err = handle_settings_command(&store, set_key("sk-bad", false)).await.unwrap_err();
        assert!(err.to_string().contains("Clé API OpenAI invalide"));
        assert!(!store.load().await.unwrap().has_api_key());
    }

    #[tokio::test]
    async fn test_no_verify_skips_the_key_check() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(0)
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let store = store_with_openai_endpoint(&dir, &server.uri());

        handle_settings_command(&store, set_key("sk-offline", true)).await.unwrap();
        assert_eq!(store.load().await.unwrap().api_key.as_deref(), Some("sk-offline"));
    }

    #[tokio::test]
    async fn test_set_then_show() {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.toml"));

        handle_settings_command(
            &store,
            SettingsAction::Set {
                api_key: Some(" gsk-key ".to_string()),
                provider: Some("groq".to_string()),
                language: Some("en".to_string()),
                tone: None,
                no_verify: true,
            },
        )
        .await
        .unwrap();

        let saved = store.load().await.unwrap();
        assert_eq!(saved.api_key.as_deref(), Some("gsk-key"));
        assert_eq!(saved.api_provider.as_deref(), Some("groq"));
        assert_eq!(saved.language, "en");
        assert_eq!(saved.default_tone, "friendly");
    }

    #[tokio::test]
    async fn test_set_rejects_unknown_provider() {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.toml"));

        let result = handle_settings_command(
            &store,
            SettingsAction::Set {
                api_key: None,
                provider: Some("mistral".to_string()),
                language: None,
                tone: None,
                no_verify: false,
            },
        )
        .await;
        assert!(result.is_err());
        assert!(!store.path().exists());
    }
}
