//! Localized user-facing error messages.
//!
//! Templates may contain `{provider}` and `{status}` placeholders.

use super::generation::ErrorKind;
use crate::types::LanguageId;

/// Message template for `kind` in `language`.
pub fn error_template(kind: ErrorKind, language: LanguageId) -> &'static str {
    use ErrorKind::*;
    use LanguageId::*;

    match (kind, language) {
        (NotConfigured, Fr) => "Clé API non configurée. Ouvrez les paramètres de l'extension pour la configurer.",
        (NotConfigured, En) => "API key not configured. Open the extension settings to add one.",
        (NotConfigured, Es) => "Clave API no configurada. Abre los ajustes de la extensión para añadirla.",
        (NotConfigured, De) => "API-Schlüssel nicht konfiguriert. Öffnen Sie die Einstellungen der Erweiterung.",

        (InvalidApiKey, Fr) => "Clé API {provider} invalide. Veuillez vérifier votre configuration.",
        (InvalidApiKey, En) => "Invalid {provider} API key. Please check your settings.",
        (InvalidApiKey, Es) => "Clave API de {provider} inválida. Revisa tu configuración.",
        (InvalidApiKey, De) => "Ungültiger {provider}-API-Schlüssel. Bitte überprüfen Sie Ihre Einstellungen.",

        (Forbidden, Fr) => "Accès refusé par {provider}. Vérifiez que l'API est activée pour cette clé.",
        (Forbidden, En) => "Access denied by {provider}. Check that the API is enabled for this key.",
        (Forbidden, Es) => "Acceso denegado por {provider}. Comprueba que la API esté activada para esta clave.",
        (Forbidden, De) => "Zugriff von {provider} verweigert. Prüfen Sie, ob die API für diesen Schlüssel aktiviert ist.",

        (RateLimited, Fr) => "Limite de requêtes atteinte. Veuillez réessayer plus tard.",
        (RateLimited, En) => "Rate limit reached. Please try again later.",
        (RateLimited, Es) => "Límite de solicitudes alcanzado. Inténtalo de nuevo más tarde.",
        (RateLimited, De) => "Anfragelimit erreicht. Bitte versuchen Sie es später erneut.",

        (ServerError, Fr) => "Erreur serveur {provider}. Veuillez réessayer plus tard.",
        (ServerError, En) => "{provider} server error. Please try again later.",
        (ServerError, Es) => "Error del servidor de {provider}. Inténtalo de nuevo más tarde.",
        (ServerError, De) => "{provider}-Serverfehler. Bitte versuchen Sie es später erneut.",

        (ModelUnavailable, Fr) => "Modèle {provider} non disponible.",
        (ModelUnavailable, En) => "{provider} model unavailable.",
        (ModelUnavailable, Es) => "Modelo de {provider} no disponible.",
        (ModelUnavailable, De) => "{provider}-Modell nicht verfügbar.",

        (ContentBlocked, Fr) => "Contenu bloqué par le filtre de sécurité.",
        (ContentBlocked, En) => "Content blocked by the safety filter.",
        (ContentBlocked, Es) => "Contenido bloqueado por el filtro de seguridad.",
        (ContentBlocked, De) => "Inhalt vom Sicherheitsfilter blockiert.",

        (EmptyResponse, Fr) => "Réponse vide. Réessayez.",
        (EmptyResponse, En) => "Empty response. Please retry.",
        (EmptyResponse, Es) => "Respuesta vacía. Inténtalo de nuevo.",
        (EmptyResponse, De) => "Leere Antwort. Bitte erneut versuchen.",

        (ChannelUnavailable, Fr) => "Rafraîchissez la page (F5).",
        (ChannelUnavailable, En) => "Please refresh the page (F5).",
        (ChannelUnavailable, Es) => "Actualiza la página (F5).",
        (ChannelUnavailable, De) => "Bitte laden Sie die Seite neu (F5).",

        (EmptyContext, Fr) => "Entrez un contexte.",
        (EmptyContext, En) => "Enter a context.",
        (EmptyContext, Es) => "Introduce un contexto.",
        (EmptyContext, De) => "Geben Sie einen Kontext ein.",

        (Unknown, Fr) => "Erreur {provider} ({status})",
        (Unknown, En) => "{provider} error ({status})",
        (Unknown, Es) => "Error de {provider} ({status})",
        (Unknown, De) => "{provider}-Fehler ({status})",
    }
}
