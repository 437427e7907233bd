//! File-backed stores
//!
//! Translation files are JSON or TOML trees. Nested tables are flattened
//! into dot-joined keys, so `{"Customer": {"name": "Name"}}` answers
//! `Customer.name`. The file for a locale is located by probing the
//! candidate resource names from most to least specific.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{StoreFactory, TranslationStore};
use crate::locale::LocaleId;
use crate::resolver::ResolverOptions;
use crate::utils::errors::{KeyglotError, Result};

/// Supported translation file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Toml => "toml",
        }
    }

    /// Parse file contents into a nested JSON value
    fn parse(self, content: &str) -> Result<Value> {
        match self {
            FileFormat::Json => Ok(serde_json::from_str(content)?),
            FileFormat::Toml => {
                let table: toml::Table = toml::from_str(content)?;
                Ok(serde_json::to_value(table)?)
            }
        }
    }
}

/// Store holding the flattened contents of one translation file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Load and flatten a translation file
    pub fn load(path: impl AsRef<Path>, format: FileFormat) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let translations = format.parse(&content)?;

        let Value::Object(map) = translations else {
            return Err(KeyglotError::Config(format!(
                "Invalid translation file format: {}",
                path.display()
            )));
        };

        let mut entries = HashMap::new();
        flatten_into(&mut entries, None, &map);
        debug!(path = %path.display(), keys = entries.len(), "Loaded translation file");

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of flattened keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TranslationStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn resource_id(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }
}

/// Recursively flatten nested tables into dot-joined keys
fn flatten_into(entries: &mut HashMap<String, String>, prefix: Option<&str>, obj: &Map<String, Value>) {
    for (name, value) in obj {
        let key = match prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name.clone(),
        };
        match value {
            Value::Object(nested) => flatten_into(entries, Some(&key), nested),
            Value::String(text) => {
                entries.insert(key, text.clone());
            }
            Value::Null => {}
            other => {
                entries.insert(key, other.to_string());
            }
        }
    }
}

/// Factory locating `<base_name>[_<locale>].<ext>` files under a directory
#[derive(Debug, Clone)]
pub struct FileStoreFactory {
    base_dir: PathBuf,
    base_name: String,
    format: FileFormat,
}

impl FileStoreFactory {
    pub fn new(base_dir: impl Into<PathBuf>, base_name: impl Into<String>, format: FileFormat) -> Self {
        Self {
            base_dir: base_dir.into(),
            base_name: base_name.into(),
            format,
        }
    }

    /// Path of the first existing candidate file for `locale`
    pub fn locate(&self, options: &ResolverOptions, locale: &LocaleId) -> Option<PathBuf> {
        options
            .locale_fallback()
            .candidate_names(&self.base_name, locale)
            .into_iter()
            .map(|name| {
                self.base_dir
                    .join(format!("{}.{}", name, self.format.extension()))
            })
            .find(|path| path.is_file())
    }
}

impl StoreFactory for FileStoreFactory {
    fn create(&self, options: &ResolverOptions, locale: &LocaleId) -> Result<Arc<dyn TranslationStore>> {
        let Some(path) = self.locate(options, locale) else {
            warn!(locale = %locale, base_name = %self.base_name, "No translation file found");
            return Err(KeyglotError::Backend {
                locale: locale.to_string(),
                reason: format!(
                    "no '{}' resource found under {}",
                    self.base_name,
                    self.base_dir.display()
                ),
            });
        };

        let store = FileStore::load(&path, self.format).map_err(|e| KeyglotError::Backend {
            locale: locale.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_json_is_flattened() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "messages.json",
            r#"{"Customer": {"name": "Name", "@include": "Parent;Base", "age": 3}, "empty": null}"#,
        );

        let store = FileStore::load(&path, FileFormat::Json).unwrap();
        assert_eq!(store.get("Customer.name"), Some("Name".to_string()));
        assert_eq!(store.get("Customer.@include"), Some("Parent;Base".to_string()));
        assert_eq!(store.get("Customer.age"), Some("3".to_string()));
        assert_eq!(store.get("empty"), None);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_toml_is_flattened() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "messages.toml", "[Customer]\nname = \"Name\"\n");

        let store = FileStore::load(&path, FileFormat::Toml).unwrap();
        assert_eq!(store.get("Customer.name"), Some("Name".to_string()));
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "messages.json", "[1, 2]");
        assert!(FileStore::load(&path, FileFormat::Json).is_err());
    }

    #[test]
    fn test_factory_picks_most_specific_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "messages.json", r#"{"greeting": "Hello"}"#);
        write(&dir, "messages_de.json", r#"{"greeting": "Hallo"}"#);

        let factory = FileStoreFactory::new(dir.path(), "messages", FileFormat::Json);
        let options = ResolverOptions::default();

        let store = factory.create(&options, &LocaleId::parse("de_AT").unwrap()).unwrap();
        assert_eq!(store.get("greeting"), Some("Hallo".to_string()));
        assert!(store.resource_id().unwrap().ends_with("messages_de.json"));

        let root = factory.create(&options, &LocaleId::root()).unwrap();
        assert_eq!(root.get("greeting"), Some("Hello".to_string()));
    }

    #[test]
    fn test_factory_without_any_file_fails() {
        let dir = TempDir::new().unwrap();
        let factory = FileStoreFactory::new(dir.path(), "messages", FileFormat::Json);
        let result = factory.create(&ResolverOptions::default(), &LocaleId::parse("de").unwrap());
        assert!(matches!(result, Err(KeyglotError::Backend { .. })));
    }
}
