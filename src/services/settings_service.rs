// src/services/settings_service.rs

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    common::error::AppError,
    models::settings::{Language, Preferences, Theme, DEFAULT_BRAND_COLOR},
    storage::KeyValueStorage,
};

pub const THEME_KEY: &str = "theme";
pub const LANGUAGE_KEY: &str = "language";
pub const BRAND_COLOR_KEY: &str = "brandColor";
pub const LOGO_KEY: &str = "logo";

const DARK_CLASS: &str = "dark";

/// Preferências da interface. Chave ausente ou valor desconhecido = default.
#[derive(Clone)]
pub struct SettingsService {
    storage: Arc<dyn KeyValueStorage>,
    // Lista de classes do elemento raiz. "dark" presente sse o tema é escuro.
    root_classes: Arc<Mutex<Vec<String>>>,
}

impl SettingsService {
    /// Aplica o tema já gravado logo na criação.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Result<Self, AppError> {
        let service = Self {
            storage,
            root_classes: Arc::default(),
        };
        let theme = service.theme()?;
        sync_dark_class(&mut *service.lock_classes()?, theme);
        Ok(service)
    }

    fn theme(&self) -> Result<Theme, AppError> {
        Ok(self
            .storage
            .get(THEME_KEY)?
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or_default())
    }

    // Tema gravado e classes só mudam com este lock na mão.
    fn lock_classes(&self) -> Result<MutexGuard<'_, Vec<String>>, AppError> {
        self.root_classes
            .lock()
            .map_err(|_| AppError::InternalServerError(anyhow::anyhow!("lock das classes envenenado")))
    }

    pub fn preferences(&self) -> Result<Preferences, AppError> {
        let (theme, root_classes) = {
            let classes = self.lock_classes()?;
            (self.theme()?, classes.clone())
        };

        let language = self
            .storage
            .get(LANGUAGE_KEY)?
            .as_deref()
            .and_then(Language::parse)
            .unwrap_or_default();
        let brand_color = self
            .storage
            .get(BRAND_COLOR_KEY)?
            .unwrap_or_else(|| DEFAULT_BRAND_COLOR.to_string());

        Ok(Preferences {
            theme,
            language,
            brand_color,
            logo: self.storage.get(LOGO_KEY)?,
            root_classes,
        })
    }

    /// Ler, gravar e aplicar acontecem sob o mesmo lock.
    pub fn toggle_theme(&self) -> Result<Preferences, AppError> {
        let next = {
            let mut classes = self.lock_classes()?;
            let next = self.theme()?.toggled();
            self.storage.set(THEME_KEY, next.as_str())?;
            sync_dark_class(&mut classes, next);
            next
        };
        tracing::info!(theme = next.as_str(), "tema alternado");
        self.preferences()
    }

    pub fn set_language(&self, language: Language) -> Result<Preferences, AppError> {
        self.storage.set(LANGUAGE_KEY, language.as_str())?;
        self.preferences()
    }

    /// Cor já validada como `#rrggbb` pelo handler.
    pub fn set_brand_color(&self, color: &str) -> Result<Preferences, AppError> {
        self.storage.set(BRAND_COLOR_KEY, &color.to_ascii_lowercase())?;
        self.preferences()
    }

    pub fn set_logo(&self, logo: &str) -> Result<Preferences, AppError> {
        self.storage.set(LOGO_KEY, logo)?;
        self.preferences()
    }

    pub fn clear_logo(&self) -> Result<Preferences, AppError> {
        self.storage.remove(LOGO_KEY)?;
        self.preferences()
    }
}

fn sync_dark_class(classes: &mut Vec<String>, theme: Theme) {
    classes.retain(|c| c != DARK_CLASS);
    if theme == Theme::Dark {
        classes.push(DARK_CLASS.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileStorage, MemoryStorage};

    #[test]
    fn defaults_when_nothing_is_stored() {
        let settings = SettingsService::new(Arc::new(MemoryStorage::new())).expect("settings");
        let prefs = settings.preferences().expect("prefs");

        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.language, Language::En);
        assert_eq!(prefs.brand_color, "#2563eb");
        assert_eq!(prefs.logo, None);
        assert!(prefs.root_classes.is_empty());
    }

    #[test]
    fn toggling_to_dark_persists_and_adds_the_class() {
        let storage = Arc::new(MemoryStorage::new());
        let settings = SettingsService::new(storage.clone()).expect("settings");

        let prefs = settings.toggle_theme().expect("toggle");

        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(storage.get(THEME_KEY).expect("get").as_deref(), Some("dark"));
        assert!(prefs.root_classes.iter().any(|c| c == "dark"));

        let prefs = settings.toggle_theme().expect("toggle back");
        assert_eq!(storage.get(THEME_KEY).expect("get").as_deref(), Some("light"));
        assert!(!prefs.root_classes.iter().any(|c| c == "dark"));
    }

    #[test]
    fn concurrent_toggles_keep_theme_and_class_in_step() {
        let storage = Arc::new(MemoryStorage::new());
        let settings = SettingsService::new(storage.clone()).expect("settings");

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let settings = settings.clone();
                scope.spawn(move || {
                    for _ in 0..25 {
                        let prefs = settings.toggle_theme().expect("toggle");
                        let dark = prefs.root_classes.iter().any(|c| c == "dark");
                        assert_eq!(dark, prefs.theme == Theme::Dark);
                    }
                });
            }
        });

        // 200 alternâncias: volta ao claro.
        let prefs = settings.preferences().expect("prefs");
        assert_eq!(storage.get(THEME_KEY).expect("get").as_deref(), Some("light"));
        assert_eq!(prefs.theme, Theme::Light);
        assert!(prefs.root_classes.is_empty());
    }

    #[test]
    fn stored_theme_is_applied_on_start() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        {
            let storage = Arc::new(JsonFileStorage::open(&path).expect("open"));
            let settings = SettingsService::new(storage).expect("settings");
            settings.toggle_theme().expect("dark");
            settings.set_language(Language::Ar).expect("ar");
        }

        let storage = Arc::new(JsonFileStorage::open(&path).expect("reopen"));
        let prefs = SettingsService::new(storage).expect("settings").preferences().expect("prefs");
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.language, Language::Ar);
        assert_eq!(prefs.root_classes, vec!["dark".to_string()]);
    }

    #[test]
    fn unknown_stored_values_fall_back_to_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(THEME_KEY, "sepia").expect("set");
        storage.set(LANGUAGE_KEY, "fr").expect("set");
        let prefs = SettingsService::new(storage).expect("settings").preferences().expect("prefs");
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.language, Language::En);
    }

    #[test]
    fn logo_can_be_set_and_cleared() {
        let settings = SettingsService::new(Arc::new(MemoryStorage::new())).expect("settings");
        let prefs = settings.set_logo("data:image/png;base64,AAAA").expect("logo");
        assert!(prefs.logo.is_some());
        assert_eq!(settings.clear_logo().expect("clear").logo, None);
    }
}
