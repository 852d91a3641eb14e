//! Drawing lookup and drawing-index building
//!
//! Drawings are filed under `series|size|stage|bore|TAP`. A lookup never
//! shows a drawing for the wrong mounting tap: when the motor has a tap
//! only the exact key is tried, and only a tap-less motor gets every drawing
//! sharing the `series|size|stage|bore` prefix.

use std::path::Path;
use walkdir::WalkDir;

use crate::core::catalog::CatalogError;
use crate::core::keys::DrawingKey;
use crate::entities::drawing::{DrawingIndex, DrawingSet};
use crate::entities::{Motor, Ratio, Reducer};

/// One way of finding drawings for a key
pub trait DrawingStrategy {
    fn name(&self) -> &'static str;

    /// Files for the key, or `None` to defer to the next strategy
    fn lookup(&self, index: &DrawingIndex, key: &DrawingKey) -> Option<DrawingSet>;
}

/// Exact `prefix|TAP` entry; only for keys carrying a tap
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactKey;

impl DrawingStrategy for ExactKey {
    fn name(&self) -> &'static str {
        "exact-key"
    }

    fn lookup(&self, index: &DrawingIndex, key: &DrawingKey) -> Option<DrawingSet> {
        key.mounting_tap.as_ref()?;
        index.get(key).filter(|set| !set.is_empty()).cloned()
    }
}

/// Every entry sharing the key's prefix, merged in index order; only for tap-less keys
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixMerge;

impl DrawingStrategy for PrefixMerge {
    fn name(&self) -> &'static str {
        "prefix-merge"
    }

    fn lookup(&self, index: &DrawingIndex, key: &DrawingKey) -> Option<DrawingSet> {
        if key.mounting_tap.is_some() {
            return None;
        }
        let mut merged = DrawingSet::default();
        for (_, set) in index.iter().filter(|(k, _)| k.same_prefix(key)) {
            merged.extend(set);
        }
        Some(merged).filter(|set| !set.is_empty())
    }
}

pub const DEFAULT_STRATEGIES: &[&dyn DrawingStrategy] = &[&ExactKey, &PrefixMerge];

/// Drawing key for a pairing; `None` if the ratio has no stage label
pub fn drawing_key(motor: &Motor, reducer: &Reducer, ratio: Ratio) -> Option<DrawingKey> {
    let stage = reducer.stage(ratio)?;
    Some(DrawingKey::new(
        reducer.series.clone(),
        reducer.size,
        stage.to_uppercase(),
        reducer.shaft_hole_diameter,
        motor.mounting_tap.as_deref().filter(|t| !t.is_empty()),
    ))
}

/// Find drawings for a key with the default strategies
pub fn find_drawings(index: &DrawingIndex, key: &DrawingKey) -> Option<DrawingSet> {
    for strategy in DEFAULT_STRATEGIES {
        if let Some(set) = strategy.lookup(index, key) {
            tracing::debug!(key = %key, strategy = strategy.name(), files = set.len(), "drawings resolved");
            return Some(set);
        }
    }
    tracing::debug!(key = %key, "no drawings registered");
    None
}

/// Parse a drawing file name such as `GPB042-L1-(8-30-45-M3).PDF`
pub fn parse_drawing_filename(name: &str) -> Option<DrawingKey> {
    let open = name.find('(')?;
    let close = open + name[open..].find(')')?;
    if !name[close + 1..].starts_with('.') {
        return None;
    }

    let head = name[..open].strip_suffix('-')?;
    let (model, stage) = head.split_once('-')?;
    if stage.is_empty() || stage.contains('-') {
        return None;
    }

    let digits_at = model.find(|c: char| c.is_ascii_digit())?;
    let (series, size) = model.split_at(digits_at);
    if series.is_empty()
        || !series.chars().all(|c| c.is_ascii_alphabetic())
        || !size.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let size: u32 = size.parse().ok()?;

    let code: Vec<&str> = name[open + 1..close].split('-').collect();
    if code.len() < 3 {
        return None;
    }
    let bore: f64 = code[0].parse().ok()?;
    let last = code[code.len() - 1];
    let tap = last
        .strip_prefix('M')
        .or_else(|| last.strip_prefix('m'))
        .filter(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        .map(|_| last);

    Some(DrawingKey::new(
        series.to_uppercase(),
        size,
        stage.to_uppercase(),
        bore,
        tap,
    ))
}

/// Build a drawing index from `<root>/pdf/<series>/*` and `<root>/dwg/<series>/*`.
///
/// Files under `pdf` become 2D drawings, files under `dwg` become 3D CAD.
/// Paths are stored relative to `root`. Unrecognised file names are skipped.
pub fn build_index(root: &Path) -> Result<DrawingIndex, CatalogError> {
    let mut index = DrawingIndex::default();

    for folder in ["pdf", "dwg"] {
        let dir = root.join(folder);
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "drawing folder missing");
            continue;
        }

        for entry in WalkDir::new(&dir)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| CatalogError::Io {
                path: dir.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let Some(key) = parse_drawing_filename(&file_name) else {
                tracing::debug!(file = %file_name, "skipping unrecognised drawing name");
                continue;
            };

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let mut set = DrawingSet::default();
            if folder == "pdf" {
                set.pdf.push(relative);
            } else {
                set.step.push(relative);
            }
            index.insert(key, set);
        }
    }

    tracing::info!(root = %root.display(), keys = index.len(), "drawing index built");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::OrderedMap;
    use std::fs;
    use tempfile::tempdir;

    fn index() -> DrawingIndex {
        let json = r#"{
            "GPB|042|L1|8|M3": { "pdf": ["pdf/GPB/GPB042-L1-(8-30-45-M3).PDF"], "step": ["dwg/GPB/GPB042-L1-(8-30-45-M3).STEP"] },
            "GPB|042|L1|8|M4": { "pdf": ["pdf/GPB/GPB042-L1-(8-30-46-M4).PDF"], "step": [] },
            "GPB|042|L2|8|M3": { "pdf": ["pdf/GPB/GPB042-L2-(8-30-45-M3).PDF"], "step": [] },
            "GPB|042|L1|8|M5": { "pdf": [], "step": [] }
        }"#;
        let raw: OrderedMap<DrawingSet> = serde_json::from_str(json).unwrap();
        DrawingIndex::from_raw(raw).unwrap()
    }

    #[test]
    fn test_exact_key_with_tap() {
        let key = DrawingKey::new("GPB", 42, "L1", 8.0, Some("m4"));
        let set = find_drawings(&index(), &key).unwrap();
        assert_eq!(set.pdf, vec!["pdf/GPB/GPB042-L1-(8-30-46-M4).PDF"]);
        assert!(set.step.is_empty());
    }

    #[test]
    fn test_unmatched_tap_yields_nothing() {
        let key = DrawingKey::new("GPB", 42, "L1", 8.0, Some("M6"));
        assert!(find_drawings(&index(), &key).is_none());

        // Registered but empty counts as no drawings, and does not merge
        let empty = DrawingKey::new("GPB", 42, "L1", 8.0, Some("M5"));
        assert!(find_drawings(&index(), &empty).is_none());
    }

    #[test]
    fn test_prefix_merge_without_tap() {
        let key = DrawingKey::new("GPB", 42, "L1", 8.0, None);
        let set = find_drawings(&index(), &key).unwrap();
        assert_eq!(set.pdf.len(), 2);
        assert_eq!(set.step.len(), 1);
        assert!(set.pdf[0].contains("M3"));
        assert!(set.pdf[1].contains("M4"));
    }

    #[test]
    fn test_prefix_merge_no_match() {
        let key = DrawingKey::new("GPB", 60, "L1", 14.0, None);
        assert!(find_drawings(&index(), &key).is_none());
    }

    #[test]
    fn test_parse_drawing_filename() {
        let key = parse_drawing_filename("GPB042-L1-(8-30-45-M3).PDF").unwrap();
        assert_eq!(key.to_string(), "GPB|042|L1|8|M3");

        let key = parse_drawing_filename("gsg120-l2-(19-70-90-M6).step").unwrap();
        assert_eq!(key.to_string(), "GSG|120|L2|19|M6");

        let key = parse_drawing_filename("GPB042-L1-(6.35-22-30-M3).PDF").unwrap();
        assert_eq!(key.bore, 6.35);

        let untapped = parse_drawing_filename("GPB042-L1-(8-30-45).PDF").unwrap();
        assert!(untapped.mounting_tap.is_none());

        assert!(parse_drawing_filename("GPB042-L1.PDF").is_none());
        assert!(parse_drawing_filename("readme.txt").is_none());
        assert!(parse_drawing_filename("042-L1-(8-30-45-M3).PDF").is_none());
        assert!(parse_drawing_filename("GPB042-L1-(8-30-45-M3)").is_none());
    }

    #[test]
    fn test_drawing_key_for_pairing() {
        use crate::entities::RatioSpec;
        use std::collections::BTreeMap;

        let mut data = BTreeMap::new();
        data.insert(Ratio::new(10.0), RatioSpec::new(24.0, 0.95, "L1"));
        let reducer = Reducer::new("GPB", 42, 8.0, data);

        let motor = Motor::new("M1", "Acme", "A1", 8.0, 2.39, 3000.0).with_flange(30.0, 45.0, "m3");
        let key = drawing_key(&motor, &reducer, Ratio::new(10.0)).unwrap();
        assert_eq!(key.to_string(), "GPB|042|L1|8|M3");

        assert!(drawing_key(&motor, &reducer, Ratio::new(20.0)).is_none());
    }

    #[test]
    fn test_build_index_from_folders() {
        let tmp = tempdir().unwrap();
        let pdf = tmp.path().join("pdf/GPB");
        let dwg = tmp.path().join("dwg/GPB");
        fs::create_dir_all(&pdf).unwrap();
        fs::create_dir_all(&dwg).unwrap();
        fs::write(pdf.join("GPB042-L1-(8-30-45-M3).PDF"), b"").unwrap();
        fs::write(pdf.join("notes.txt"), b"").unwrap();
        fs::write(dwg.join("GPB042-L1-(8-30-45-M3).STEP"), b"").unwrap();
        fs::write(dwg.join("GPB042-L2-(8-30-45-M3).STEP"), b"").unwrap();

        let index = build_index(tmp.path()).unwrap();
        assert_eq!(index.len(), 2);

        let key = DrawingKey::new("GPB", 42, "L1", 8.0, Some("M3"));
        let set = index.get(&key).unwrap();
        assert_eq!(set.pdf, vec!["pdf/GPB/GPB042-L1-(8-30-45-M3).PDF"]);
        assert_eq!(set.step, vec!["dwg/GPB/GPB042-L1-(8-30-45-M3).STEP"]);
    }

    #[test]
    fn test_build_index_missing_folders() {
        let tmp = tempdir().unwrap();
        assert!(build_index(tmp.path()).unwrap().is_empty());
    }
}
