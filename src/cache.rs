use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    name: String,
}

/// Best-effort JSON-file cache, one file per key, under `dir`. Any I/O
/// failure is swallowed: callers fall through to the network path.
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        let content = std::fs::read_to_string(path).ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;
        Some(entry.name)
    }

    pub fn put(&self, key: &str, name: &str) {
        if std::fs::create_dir_all(&self.dir).is_err() {
            return;
        }
        let entry = CacheEntry { name: name.to_string() };
        if let Ok(serialized) = serde_json::to_string(&entry) {
            let _ = std::fs::write(self.path_for(key), serialized);
        }
    }
}

/// Formats a `[lng, lat]` coordinate into the cache key used by the
/// reference implementation: `"<lat5>_<lon5>"`.
pub fn cache_key(lat: f64, lon: f64) -> String {
    format!("{lat:.5}_{lon:.5}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_format() {
        assert_eq!(cache_key(34.05, -118.25), "34.05000_-118.25000");
    }

    #[test]
    fn roundtrip_through_a_temp_dir() {
        let dir = std::env::temp_dir().join(format!("eld_cache_test_{}", std::process::id()));
        let cache = DiskCache::new(&dir);
        let key = cache_key(34.05, -118.25);
        assert!(cache.get(&key).is_none());
        cache.put(&key, "Los Angeles, CA");
        assert_eq!(cache.get(&key).as_deref(), Some("Los Angeles, CA"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn path_for_is_scoped_to_dir() {
        let cache = DiskCache::new(Path::new("location_cache"));
        assert_eq!(
            cache.path_for("34.05000_-118.25000"),
            Path::new("location_cache/34.05000_-118.25000.json")
        );
    }
}
