// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

use crate::models::settings::Language;

// Idioma do cliente, tirado do Accept-Language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Locale(pub Language);

impl Locale {
    /// Primeiro idioma suportado na ordem de preferência do cliente; senão inglês.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let lang = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .iter()
                    .find_map(|tag| Language::parse(tag))
            })
            .unwrap_or_default();

        Locale(lang)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Locale::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn locale_for(value: &str) -> Locale {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_str(value).expect("header"));
        Locale::from_headers(&headers)
    }

    #[test]
    fn picks_the_first_supported_language() {
        assert_eq!(locale_for("ar-EG,ar;q=0.9,en;q=0.8"), Locale(Language::Ar));
        assert_eq!(locale_for("fr-FR,ar;q=0.5"), Locale(Language::Ar));
    }

    #[test]
    fn falls_back_to_english() {
        assert_eq!(locale_for("pt-BR"), Locale(Language::En));
        assert_eq!(Locale::from_headers(&HeaderMap::new()), Locale(Language::En));
    }
}
