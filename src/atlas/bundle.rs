use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key under which the dataset description is exposed.
pub const DESCRIPTION_KEY: &str = "description";

// ---------------------------------------------------------------------------
// AtlasBundle – what a fetch call hands back
// ---------------------------------------------------------------------------

/// Local files of one fetched atlas plus its description.
///
/// Built once per fetch call and never mutated afterwards. Entries keep the
/// declaration order of the dataset's logical keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasBundle {
    description: String,
    files: Vec<(String, PathBuf)>,
}

impl AtlasBundle {
    /// Pair `keys` with `paths` by position.
    ///
    /// Callers are expected to pass sequences of equal length; extra items
    /// on either side are ignored.
    pub fn new<K, P>(description: impl Into<String>, keys: K, paths: P) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        P: IntoIterator<Item = PathBuf>,
    {
        AtlasBundle {
            description: description.into(),
            files: keys.into_iter().map(Into::into).zip(paths).collect(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Local path for a logical key.
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| p.as_path())
    }

    /// Whether `key` is present, `"description"` included.
    pub fn contains_key(&self, key: &str) -> bool {
        key == DESCRIPTION_KEY || self.get(key).is_some()
    }

    /// `"description"` followed by every logical key in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(DESCRIPTION_KEY).chain(self.files.iter().map(|(k, _)| k.as_str()))
    }

    /// `(logical key, path)` pairs in declaration order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &Path)> + '_ {
        self.files.iter().map(|(k, p)| (k.as_str(), p.as_path()))
    }

    /// Number of file entries (the description is not counted).
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Serialized as a flat map: `description` first, then each key → path.
impl Serialize for AtlasBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.files.len() + 1))?;
        map.serialize_entry(DESCRIPTION_KEY, &self.description)?;
        for (key, path) in &self.files {
            map.serialize_entry(key, path)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AtlasBundle {
        AtlasBundle::new(
            "two files",
            ["lut", "img"],
            vec![PathBuf::from("/c/a.lut"), PathBuf::from("/c/a.nii")],
        )
    }

    #[test]
    fn keys_start_with_description() {
        let bundle = sample();
        assert_eq!(bundle.keys().collect::<Vec<_>>(), ["description", "lut", "img"]);
        assert!(bundle.contains_key("description"));
        assert!(!bundle.contains_key("anat"));
    }

    #[test]
    fn lookup_by_key() {
        let bundle = sample();
        assert_eq!(bundle.get("img"), Some(Path::new("/c/a.nii")));
        assert_eq!(bundle.get("description"), None);
        assert_eq!(bundle.description(), "two files");
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn serializes_as_flat_map() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "description": "two files",
                "lut": "/c/a.lut",
                "img": "/c/a.nii",
            })
        );
    }
}
