//! Adapter catalog - flange adapters per gearbox model and shaft size
//!
//! The prepared dataset is a nested object
//! `model -> shaft key -> adapter type -> part code`, e.g.
//!
//! ```json
//! { "GPB042": { "G08": { "SV1": "8-30-45-M3", "ST1": "8-30-45" } } }
//! ```
//!
//! Shaft keys and part codes are decoded into [`ShaftKey`] and [`PartCode`]
//! at load time. Entry order is kept as written because adapter resolution
//! falls back to the first listed entry.

use serde::Serialize;

use crate::core::catalog::CatalogError;
use crate::core::keys::{PartCode, ShaftKey};
use crate::core::loader::OrderedMap;

/// Raw nested mapping as it appears in the dataset file
pub type RawAdapterCatalog = OrderedMap<OrderedMap<OrderedMap<String>>>;

/// One adapter type offered for a model/shaft combination
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterEntry {
    /// Adapter type label (e.g. "SV1", "ST1")
    pub adapter_type: String,
    /// Part code exactly as written in the catalog
    pub code: String,
    /// Decoded part code
    pub part: PartCode,
}

/// All adapters for one shaft size of a model
#[derive(Debug, Clone, PartialEq)]
pub struct ShaftAdapters {
    pub key: ShaftKey,
    pub entries: Vec<AdapterEntry>,
}

/// All adapters for one gearbox model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAdapters {
    pub model: String,
    pub shafts: Vec<ShaftAdapters>,
}

/// Adapter catalog keyed by gearbox model name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdapterCatalog {
    models: Vec<ModelAdapters>,
}

impl AdapterCatalog {
    /// Decode and validate the raw dataset mapping
    pub fn from_raw(raw: RawAdapterCatalog) -> Result<Self, CatalogError> {
        let mut models = Vec::with_capacity(raw.len());

        for (model, shafts_raw) in raw {
            let mut shafts = Vec::with_capacity(shafts_raw.len());

            for (shaft, types) in shafts_raw {
                let key: ShaftKey = shaft.parse().map_err(|e: crate::core::keys::KeyParseError| {
                    CatalogError::InvalidAdapter {
                        model: model.clone(),
                        shaft: shaft.clone(),
                        adapter_type: String::new(),
                        reason: e.to_string(),
                    }
                })?;

                let mut entries = Vec::with_capacity(types.len());
                for (adapter_type, code) in types {
                    let part: PartCode =
                        code.parse().map_err(|e: crate::core::keys::KeyParseError| {
                            CatalogError::InvalidAdapter {
                                model: model.clone(),
                                shaft: shaft.clone(),
                                adapter_type: adapter_type.clone(),
                                reason: e.to_string(),
                            }
                        })?;
                    entries.push(AdapterEntry {
                        adapter_type,
                        code,
                        part,
                    });
                }

                shafts.push(ShaftAdapters { key, entries });
            }

            models.push(ModelAdapters { model, shafts });
        }

        Ok(Self { models })
    }

    /// Add one entry, creating the model and shaft groups as needed
    pub fn insert(&mut self, model: &str, key: ShaftKey, entry: AdapterEntry) {
        let idx = match self.models.iter().position(|m| m.model == model) {
            Some(idx) => idx,
            None => {
                self.models.push(ModelAdapters {
                    model: model.to_string(),
                    shafts: Vec::new(),
                });
                self.models.len() - 1
            }
        };
        let shafts = &mut self.models[idx].shafts;

        match shafts.iter_mut().find(|s| s.key == key) {
            Some(group) => group.entries.push(entry),
            None => shafts.push(ShaftAdapters {
                key,
                entries: vec![entry],
            }),
        }
    }

    /// Entries registered for a model and shaft size, in catalog order
    pub fn entries_for(&self, model: &str, key: ShaftKey) -> Option<&[AdapterEntry]> {
        self.model(model)?
            .shafts
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.entries.as_slice())
    }

    /// Adapter groups for a model
    pub fn model(&self, model: &str) -> Option<&ModelAdapters> {
        self.models.iter().find(|m| m.model == model)
    }

    /// Largest shaft size registered for a model
    pub fn max_shaft(&self, model: &str) -> Option<f64> {
        self.model(model)?
            .shafts
            .iter()
            .map(|s| s.key.diameter())
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.max(d))))
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelAdapters> {
        self.models.iter()
    }

    /// Number of models with adapters
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// How an adapter was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterMatch {
    /// Part code matches the motor flange exactly
    Exact,
    /// First servo-type ("SV...") adapter for the shaft size
    ServoPreferred,
    /// First adapter listed for the shaft size
    FirstListed,
}

impl std::fmt::Display for AdapterMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterMatch::Exact => write!(f, "exact"),
            AdapterMatch::ServoPreferred => write!(f, "servo-preferred"),
            AdapterMatch::FirstListed => write!(f, "first-listed"),
        }
    }
}

/// Resolved adapter for a motor/gearbox pairing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Adapter {
    /// Gearbox model name (e.g. "GPB042")
    pub reducer_model: String,
    /// Shaft-size key (e.g. "G08")
    pub shaft: String,
    /// Adapter type label (e.g. "SV1")
    #[serde(rename = "type")]
    pub adapter_type: String,
    /// Part code (e.g. "8-30-45-M3")
    pub code: String,
    pub shaft_dia: f64,
    pub centering_dia: f64,
    pub fixing_pcd: f64,
    pub mounting_tap: Option<String>,
    pub matched_by: AdapterMatch,
}

impl Adapter {
    pub fn from_entry(model: &str, key: ShaftKey, entry: &AdapterEntry, matched_by: AdapterMatch) -> Self {
        Self {
            reducer_model: model.to_string(),
            shaft: key.to_string(),
            adapter_type: entry.adapter_type.clone(),
            code: entry.code.clone(),
            shaft_dia: entry.part.shaft_dia,
            centering_dia: entry.part.centering_dia,
            fixing_pcd: entry.part.fixing_pcd,
            mounting_tap: entry.part.mounting_tap.clone(),
            matched_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(json: &str) -> Result<AdapterCatalog, CatalogError> {
        let raw: RawAdapterCatalog = serde_json::from_str(json).unwrap();
        AdapterCatalog::from_raw(raw)
    }

    #[test]
    fn test_from_raw_decodes_keys() {
        let cat = catalog(
            r#"{"GPB042":{"G08":{"SV1":"8-30-45-M3","ST1":"8-30-45"},"G6.35":{"SV1":"6.35-22-30-M3"}}}"#,
        )
        .unwrap();

        assert_eq!(cat.len(), 1);
        let entries = cat.entries_for("GPB042", ShaftKey::from_diameter(8.0)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].adapter_type, "SV1");
        assert_eq!(entries[1].part.mounting_tap, None);

        assert!(cat.entries_for("GPB042", ShaftKey::from_diameter(6.35)).is_some());
        assert!(cat.entries_for("GPB042", ShaftKey::from_diameter(14.0)).is_none());
        assert!(cat.entries_for("GPB060", ShaftKey::from_diameter(8.0)).is_none());
    }

    #[test]
    fn test_max_shaft() {
        let cat = catalog(r#"{"GPB060":{"G08":{"SV1":"8-30-45-M3"},"G14":{"SV1":"14-50-70-M5"}}}"#)
            .unwrap();
        assert_eq!(cat.max_shaft("GPB060"), Some(14.0));
        assert_eq!(cat.max_shaft("GPB042"), None);
    }

    #[test]
    fn test_invalid_code_is_rejected() {
        let err = catalog(r#"{"GPB042":{"G08":{"SV1":"8-30"}}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidAdapter { .. }));
    }

    #[test]
    fn test_invalid_shaft_key_is_rejected() {
        let err = catalog(r#"{"GPB042":{"08":{"SV1":"8-30-45-M3"}}}"#).unwrap_err();
        assert!(err.to_string().contains("GPB042"));
    }

    #[test]
    fn test_insert_groups_entries() {
        let mut cat = AdapterCatalog::default();
        let key = ShaftKey::from_diameter(8.0);
        let entry = AdapterEntry {
            adapter_type: "SV1".to_string(),
            code: "8-30-45-M3".to_string(),
            part: "8-30-45-M3".parse().unwrap(),
        };
        cat.insert("GPB042", key, entry.clone());
        cat.insert("GPB042", key, AdapterEntry { adapter_type: "SV2".to_string(), ..entry });
        assert_eq!(cat.entries_for("GPB042", key).unwrap().len(), 2);
    }
}
