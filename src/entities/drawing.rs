//! Drawing index - 2D drawings and 3D CAD files per gearbox configuration

use serde::{Deserialize, Serialize};

use crate::core::catalog::CatalogError;
use crate::core::keys::DrawingKey;
use crate::core::loader::OrderedMap;

/// Files registered under one drawing key, as paths relative to the drawing root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingSet {
    /// 2D drawings
    #[serde(default)]
    pub pdf: Vec<String>,

    /// 3D CAD models
    #[serde(default)]
    pub step: Vec<String>,
}

impl DrawingSet {
    pub fn is_empty(&self) -> bool {
        self.pdf.is_empty() && self.step.is_empty()
    }

    /// Append another set's files
    pub fn extend(&mut self, other: &DrawingSet) {
        self.pdf.extend(other.pdf.iter().cloned());
        self.step.extend(other.step.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.pdf.len() + self.step.len()
    }
}

/// Drawing index keyed by [`DrawingKey`], in index order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingIndex {
    entries: Vec<(DrawingKey, DrawingSet)>,
}

impl DrawingIndex {
    /// Decode the raw `key -> { pdf, step }` dataset mapping
    pub fn from_raw(raw: OrderedMap<DrawingSet>) -> Result<Self, CatalogError> {
        let mut index = DrawingIndex::default();
        for (key, set) in raw {
            let key: DrawingKey = key.parse().map_err(CatalogError::InvalidDrawingKey)?;
            index.insert(key, set);
        }
        Ok(index)
    }

    /// Exact-key lookup
    pub fn get(&self, key: &DrawingKey) -> Option<&DrawingSet> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Add files under a key, merging with an existing entry
    pub fn insert(&mut self, key: DrawingKey, set: DrawingSet) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.extend(&set),
            None => self.entries.push((key, set)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DrawingKey, &DrawingSet)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for DrawingIndex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, set) in &self.entries {
            map.serialize_entry(&key.to_string(), set)?;
        }
        map.end()
    }
}
