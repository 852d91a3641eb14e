//! Dataset loading utilities
//!
//! Catalog datasets are prepared offline and shipped as JSON (or YAML for
//! hand-maintained catalogs). This module finds a dataset file by name,
//! deserializes it with a source-span diagnostic on failure, and preserves
//! object key order where the catalog semantics depend on it.

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::core::catalog::CatalogError;
use crate::diagnostics::DatasetSyntaxError;

/// On-disk encoding of a dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Yaml,
}

impl DatasetFormat {
    /// Determine format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(DatasetFormat::Json),
            Some("yaml") | Some("yml") => Some(DatasetFormat::Yaml),
            _ => None,
        }
    }
}

/// Find a dataset file by stem (JSON preferred over YAML)
pub fn find_dataset(dir: &Path, name: &str) -> Option<PathBuf> {
    ["json", "yaml", "yml"]
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .find(|p| p.is_file())
}

/// Load and deserialize a dataset file
pub fn load_dataset<T: DeserializeOwned + 'static>(path: &Path) -> Result<T, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset(&content, path)
}

/// Deserialize dataset text, using the path for format detection and diagnostics
pub fn parse_dataset<T: DeserializeOwned + 'static>(content: &str, path: &Path) -> Result<T, CatalogError> {
    let filename = path.display().to_string();

    match DatasetFormat::from_path(path).unwrap_or(DatasetFormat::Json) {
        DatasetFormat::Json => serde_json::from_str(content).map_err(|e| {
            CatalogError::Syntax(DatasetSyntaxError::from_json_error(&e, content, &filename))
        }),
        DatasetFormat::Yaml => serde_yml::from_str(content).map_err(|e| {
            CatalogError::Syntax(DatasetSyntaxError::from_yaml_error(&e, content, &filename))
        }),
    }
}

/// Write a dataset as pretty-printed JSON
pub fn write_dataset<T: Serialize>(path: &Path, value: &T) -> Result<(), CatalogError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CatalogError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CatalogError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, json).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A string-keyed map that keeps the key order of the source document.
///
/// A repeated key keeps its first position and takes the last value.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_find_dataset_prefers_json() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("motors.yaml"), "[]").unwrap();
        assert_eq!(
            find_dataset(dir.path(), "motors").unwrap(),
            dir.path().join("motors.yaml")
        );

        fs::write(dir.path().join("motors.json"), "[]").unwrap();
        assert_eq!(
            find_dataset(dir.path(), "motors").unwrap(),
            dir.path().join("motors.json")
        );
    }

    #[test]
    fn test_find_dataset_missing() {
        let dir = tempdir().unwrap();
        assert!(find_dataset(dir.path(), "bushings").is_none());
    }

    #[test]
    fn test_ordered_map_keeps_document_order() {
        let json = r#"{ "ST1": "8-30-45", "SV2": "8-30-46-M4", "SV1": "8-30-45-M3" }"#;
        let map: OrderedMap<String> = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["ST1", "SV2", "SV1"]);
    }

    #[test]
    fn test_ordered_map_repeated_key_last_wins() {
        let json = r#"{ "SV1": "8-30-45", "ST1": "8-30-46", "SV1": "8-30-45-M3" }"#;
        let map: OrderedMap<String> = serde_json::from_str(json).unwrap();
        assert_eq!(map.len(), 2);
        let entries: Vec<(&str, &str)> = map.iter().map(|(k, v)| (k, v.as_str())).collect();
        assert_eq!(entries, vec![("SV1", "8-30-45-M3"), ("ST1", "8-30-46")]);
    }

    #[test]
    fn test_ordered_map_yaml() {
        let yaml = "b: 1\na: 2\n";
        let map: OrderedMap<u32> = serde_yml::from_str(yaml).unwrap();
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_parse_dataset_reports_syntax_error() {
        let result: Result<Vec<u32>, _> = parse_dataset("[1, 2,", Path::new("broken.json"));
        let err = result.unwrap_err();
        assert!(matches!(err, CatalogError::Syntax(_)));
    }

    #[test]
    fn test_write_then_load_dataset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/values.json");
        write_dataset(&path, &vec![1u32, 2, 3]).unwrap();
        let loaded: Vec<u32> = load_dataset(&path).unwrap();
        assert_eq!(loaded, vec![1, 2, 3]);
    }
}
