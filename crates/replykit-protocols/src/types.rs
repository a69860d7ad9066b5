//! Closed identifier sets: tones, UI languages and providers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownIdError;

/// Reply style selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneId {
    #[default]
    Friendly,
    Professional,
    Humorous,
    Informative,
    Supportive,
}

impl ToneId {
    pub const ALL: [ToneId; 5] = [
        ToneId::Friendly,
        ToneId::Professional,
        ToneId::Humorous,
        ToneId::Informative,
        ToneId::Supportive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToneId::Friendly => "friendly",
            ToneId::Professional => "professional",
            ToneId::Humorous => "humorous",
            ToneId::Informative => "informative",
            ToneId::Supportive => "supportive",
        }
    }

    /// Case-insensitive lookup, `None` for anything outside the set.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Button label shown in the reply modal.
    pub fn label(self) -> &'static str {
        match self {
            ToneId::Friendly => "😊 Amical",
            ToneId::Professional => "💼 Professionnel",
            ToneId::Humorous => "😄 Humoristique",
            ToneId::Informative => "📚 Informatif",
            ToneId::Supportive => "💪 Encourageant",
        }
    }
}

impl fmt::Display for ToneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToneId {
    type Err = UnknownIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownIdError::new("tone", s))
    }
}

/// Output / UI language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    #[default]
    Fr,
    En,
    Es,
    De,
}

impl LanguageId {
    pub const ALL: [LanguageId; 4] = [LanguageId::Fr, LanguageId::En, LanguageId::Es, LanguageId::De];

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageId::Fr => "fr",
            LanguageId::En => "en",
            LanguageId::Es => "es",
            LanguageId::De => "de",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Name of the language written in that language.
    pub fn native_name(self) -> &'static str {
        match self {
            LanguageId::Fr => "français",
            LanguageId::En => "English",
            LanguageId::Es => "español",
            LanguageId::De => "Deutsch",
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageId {
    type Err = UnknownIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownIdError::new("language", s))
    }
}

/// External text-generation service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[default]
    OpenAI,
    Anthropic,
    Gemini,
    Groq,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::OpenAI,
        ProviderId::Anthropic,
        ProviderId::Gemini,
        ProviderId::Groq,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::OpenAI => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Gemini => "gemini",
            ProviderId::Groq => "groq",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Human readable name used in error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderId::OpenAI => "OpenAI",
            ProviderId::Anthropic => "Anthropic",
            ProviderId::Gemini => "Gemini",
            ProviderId::Groq => "Groq",
        }
    }

    /// Where the user obtains an API key for this provider.
    pub fn api_key_url(self) -> &'static str {
        match self {
            ProviderId::OpenAI => "https://platform.openai.com/api-keys",
            ProviderId::Anthropic => "https://console.anthropic.com/settings/keys",
            ProviderId::Gemini => "https://aistudio.google.com/app/apikey",
            ProviderId::Groq => "https://console.groq.com/keys",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = UnknownIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownIdError::new("provider", s))
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
