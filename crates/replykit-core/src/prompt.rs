//! Prompt construction.

use replykit_protocols::{LanguageId, ToneId};

/// Renders the single instruction sent to the provider.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the prompt for `context`, quoted verbatim.
    pub fn build(context: &str, tone: ToneId, language: LanguageId) -> String {
        format!(
            "Tu es un assistant qui aide à rédiger des réponses aux commentaires sur les réseaux sociaux.\n\
             \n\
             Contexte du commentaire/discussion auquel répondre:\n\
             \"{context}\"\n\
             \n\
             Génère une réponse {tone} en {language}.\n\
             La réponse doit être:\n\
             - Naturelle et authentique\n\
             - Appropriée pour un forum/réseau social\n\
             - Entre 2 et 4 phrases\n\
             - Sans hashtags ni emojis excessifs\n\
             - Pertinente par rapport au contexte\n\
             \n\
             Réponds uniquement avec le texte de la réponse, sans préfixe ni explication.",
            tone = tone_description(tone, language),
            language = language.native_name(),
        )
    }

    /// Build from wire identifiers. Unknown tones fall back to friendly,
    /// unknown languages to the default language.
    pub fn build_from_ids(context: &str, tone: &str, language: &str) -> String {
        Self::build(
            context,
            ToneId::parse(tone).unwrap_or_default(),
            LanguageId::parse(language).unwrap_or_default(),
        )
    }
}

/// Tone phrasing in the reply language.
pub fn tone_description(tone: ToneId, language: LanguageId) -> &'static str {
    use LanguageId::*;
    use ToneId::*;

    match (tone, language) {
        (Friendly, Fr) => "amical et chaleureux",
        (Friendly, En) => "friendly and warm",
        (Friendly, Es) => "amigable y cálido",
        (Friendly, De) => "freundlich und herzlich",
        (Professional, Fr) => "professionnel et formel",
        (Professional, En) => "professional and formal",
        (Professional, Es) => "profesional y formal",
        (Professional, De) => "professionell und formell",
        (Humorous, Fr) => "humoristique et léger",
        (Humorous, En) => "humorous and light",
        (Humorous, Es) => "humorístico y ligero",
        (Humorous, De) => "humorvoll und leicht",
        (Informative, Fr) => "informatif et détaillé",
        (Informative, En) => "informative and detailed",
        (Informative, Es) => "informativo y detallado",
        (Informative, De) => "informativ und detailliert",
        (Supportive, Fr) => "encourageant et positif",
        (Supportive, En) => "supportive and positive",
        (Supportive, Es) => "alentador y positivo",
        (Supportive, De) => "unterstützend und positiv",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &str = "Question: Faut-il apprendre Rust ?\n\nRéponse: Oui, \"absolument\".";

    #[test]
    fn test_prompt_contains_literal_context() {
        for tone in ToneId::ALL {
            for language in LanguageId::ALL {
                let prompt = PromptBuilder::build(CONTEXT, tone, language);
                assert!(prompt.contains(CONTEXT), "{tone}/{language}");
                assert!(prompt.contains(tone_description(tone, language)));
                assert!(prompt.contains(&format!("en {}.", language.native_name())));
            }
        }
    }

    #[test]
    fn test_prompt_constraints() {
        let prompt = PromptBuilder::build("ctx", ToneId::Professional, LanguageId::En);
        assert!(prompt.starts_with("Tu es un assistant"));
        assert!(prompt.contains("Génère une réponse professional and formal en English."));
        assert!(prompt.contains("Entre 2 et 4 phrases"));
        assert!(prompt.contains("Sans hashtags"));
        assert!(prompt.ends_with("sans préfixe ni explication."));
    }

    #[test]
    fn test_unknown_tone_falls_back_to_friendly() {
        let prompt = PromptBuilder::build_from_ids("ctx", "sarcastic", "de");
        assert!(prompt.contains("freundlich und herzlich"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_french() {
        let prompt = PromptBuilder::build_from_ids("ctx", "humorous", "it");
        assert!(prompt.contains("humoristique et léger en français"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            PromptBuilder::build("a", ToneId::Supportive, LanguageId::Es),
            PromptBuilder::build("a", ToneId::Supportive, LanguageId::Es)
        );
    }
}
