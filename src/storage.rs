// src/storage.rs

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use crate::common::error::AppError;

/// Armazenamento chave-valor de strings (preferências e tokens de sessão).
/// Chave ausente = use o default de quem lê.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex
        .lock()
        .map_err(|_| AppError::InternalServerError(anyhow::anyhow!("lock do storage envenenado")))
}

// --- Memória (testes e execução sem PREFERENCES_PATH) ---

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        lock(&self.entries)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        lock(&self.entries)?.remove(key);
        Ok(())
    }
}

// --- Arquivo JSON ---

/// Um objeto JSON plano `{ "chave": "valor" }`, regravado inteiro a cada escrita.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::info!(path = %path.display(), keys = entries.len(), "storage de preferências aberto");
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // Grava em arquivo temporário e renomeia: nunca fica um JSON pela metade.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    // Memória só muda depois que o arquivo foi gravado.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = lock(&self.entries)?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut entries = lock(&self.entries)?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips_and_removes() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("theme").expect("get"), None);
        storage.set("theme", "dark").expect("set");
        assert_eq!(storage.get("theme").expect("get").as_deref(), Some("dark"));
        storage.remove("theme").expect("remove");
        assert_eq!(storage.get("theme").expect("get"), None);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("prefs.json");

        {
            let storage = JsonFileStorage::open(&path).expect("open");
            storage.set("language", "ar").expect("set");
            storage.set("brandColor", "#0f766e").expect("set");
            storage.remove("brandColor").expect("remove");
        }

        let reopened = JsonFileStorage::open(&path).expect("reopen");
        assert_eq!(reopened.get("language").expect("get").as_deref(), Some("ar"));
        assert_eq!(reopened.get("brandColor").expect("get"), None);
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Um arquivo no lugar do diretório pai: create_dir_all falha.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").expect("write");
        let storage = JsonFileStorage::open(blocker.join("prefs.json")).expect("open");

        assert!(matches!(storage.set("theme", "dark"), Err(AppError::Io(_))));
        assert_eq!(storage.get("theme").expect("get"), None);
    }

    #[test]
    fn corrupt_file_is_an_error_not_a_silent_reset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").expect("write");
        assert!(matches!(JsonFileStorage::open(&path), Err(AppError::Json(_))));
    }
}
