// src/models/settings.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub const SUPPORTED: [&'static str; 2] = ["en", "ar"];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    /// Aceita "ar", "ar-EG", "EN"...
    pub fn parse(value: &str) -> Option<Self> {
        let primary = value.split('-').next().unwrap_or(value).to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }
}

pub const DEFAULT_BRAND_COLOR: &str = "#2563eb";

/// Preferências de interface. Cada campo vira uma chave string no storage.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
    #[schema(example = "#2563eb")]
    pub brand_color: String,
    /// Logo enviado (data URL). Ausente = sem logo.
    pub logo: Option<String>,
    /// Classes do elemento raiz, sincronizadas com o tema.
    pub root_classes: Vec<String>,
}

pub(crate) fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        let mut err = ValidationError::new("hex_color");
        err.message = Some("invalid_color".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandColorPayload {
    #[validate(custom(function = "validate_hex_color"))]
    #[schema(example = "#0f766e")]
    pub brand_color: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LanguagePayload {
    pub language: Language,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LogoPayload {
    #[validate(length(min = 1, message = "required"))]
    pub logo: String,
}
