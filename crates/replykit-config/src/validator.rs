//! Settings validation.

use crate::error::ConfigError;
use replykit_protocols::{LanguageId, ProviderId, ToneId};

use crate::schema::Settings;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Settings validator.
///
/// Errors block generation; warnings describe values that silently fall
/// back to a default.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the settings.
    pub fn validate(settings: &Settings) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_credentials(settings, &mut result);
        Self::validate_preferences(settings, &mut result);
        Self::validate_endpoints(settings, &mut result);

        Ok(result)
    }

    fn validate_credentials(settings: &Settings, result: &mut ValidationResult) {
        if let Some(name) = settings.api_provider.as_deref() {
            if !name.trim().is_empty() && ProviderId::parse(name).is_none() {
                result.add_error(ValidationError::new(
                    "apiProvider",
                    format!(
                        "Unknown provider '{}', valid values: {:?}",
                        name,
                        ProviderId::ALL.iter().map(|p| p.as_str()).collect::<Vec<_>>()
                    ),
                ));
            }
        }

        if !settings.has_api_key() {
            result.add_warning(ValidationWarning::new(
                "apiKey",
                "API key is not set, generation requests will be refused",
            ));
        }
    }

    fn validate_preferences(settings: &Settings, result: &mut ValidationResult) {
        if ToneId::parse(&settings.default_tone).is_none() {
            result.add_warning(ValidationWarning::new(
                "defaultTone",
                format!("Unknown tone '{}', falling back to friendly", settings.default_tone),
            ));
        }

        if LanguageId::parse(&settings.language).is_none() {
            result.add_warning(ValidationWarning::new(
                "language",
                format!("Unknown language '{}', falling back to fr", settings.language),
            ));
        }
    }

    fn validate_endpoints(settings: &Settings, result: &mut ValidationResult) {
        for provider in ProviderId::ALL {
            if let Some(url) = settings.endpoints.get(provider) {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        format!("endpoints.{}", provider.as_str()),
                        "endpoint must start with http:// or https://",
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
