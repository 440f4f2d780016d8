use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Set once at startup by main() from the --data-dir argument.
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Call this from main() before any load/save operations.
pub fn set_data_dir(path: PathBuf) {
    let _ = DATA_DIR.set(path);
}

pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = DATA_DIR.get() {
        return Ok(dir.clone());
    }
    // Fallback when running tests or if set_data_dir was not called
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(cwd.join("config"))
}

pub trait Persistable: Sized + Default + Serialize + for<'de> Deserialize<'de> {
    fn filename() -> &'static str;
    fn is_json() -> bool;

    fn load() -> Result<Self> {
        Self::load_from(&get_data_dir()?)
    }

    /// Load from an explicit directory, bypassing the global `DATA_DIR`.
    /// A missing or blank file yields `Default`; anything unparseable is an
    /// error and nothing is returned.
    fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(Self::filename());
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        if Self::is_json() {
            serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse JSON from {}", path.display()))
        } else {
            serde_norway::from_str(&contents)
                .with_context(|| format!("failed to parse YAML from {}", path.display()))
        }
    }

    /// Save to an explicit directory, bypassing the global `DATA_DIR`.
    fn save_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create dir {}", dir.display()))?;
        let path = dir.join(Self::filename());
        let contents = if Self::is_json() {
            serde_json::to_string_pretty(self).context("failed to serialize JSON")?
        } else {
            serde_norway::to_string(self).context("failed to serialize YAML")?
        };
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    /// Minimal Persistable implementation for testing serialization logic.
    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct TestJsonData {
        value: String,
    }

    impl Persistable for TestJsonData {
        fn filename() -> &'static str {
            "test_data.json"
        }
        fn is_json() -> bool {
            true
        }
    }

    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct TestYamlData {
        count: u32,
    }

    impl Persistable for TestYamlData {
        fn filename() -> &'static str {
            "test_data.yaml"
        }
        fn is_json() -> bool {
            false
        }
    }

    #[test]
    fn test_get_data_dir_returns_a_path() {
        assert!(get_data_dir().is_ok());
    }

    #[test]
    fn test_load_from_returns_default_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let result = TestJsonData::load_from(tmp.path()).unwrap();
        assert_eq!(result, TestJsonData::default());
    }

    #[test]
    fn test_load_from_returns_default_when_file_blank() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("test_data.json"), "  \n").unwrap();
        let result = TestJsonData::load_from(tmp.path()).unwrap();
        assert_eq!(result, TestJsonData::default());
    }

    #[test]
    fn test_load_from_rejects_malformed_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("test_data.json"), "{\"value\": ").unwrap();
        let err = TestJsonData::load_from(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse JSON"));
    }

    #[test]
    fn test_json_save_to_and_load_from_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let data = TestJsonData { value: "round-trip".to_string() };
        data.save_to(tmp.path()).unwrap();
        let loaded = TestJsonData::load_from(tmp.path()).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_yaml_save_to_and_load_from_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let data = TestYamlData { count: 99 };
        data.save_to(tmp.path()).unwrap();
        let loaded = TestYamlData::load_from(tmp.path()).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_event_data_save_to_load_from() {
        use crate::data::event::{Event, EventData};
        let tmp = TempDir::new().unwrap();
        let mut data = EventData::default();
        data.push("2025-5-1", Event::new("Conference", "", "all day"));
        data.save_to(tmp.path()).unwrap();
        let loaded = EventData::load_from(tmp.path()).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_save_to_creates_directory_if_missing() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        let data = TestJsonData { value: "nested".to_string() };
        data.save_to(&nested).unwrap();
        let loaded = TestJsonData::load_from(&nested).unwrap();
        assert_eq!(loaded, data);
    }
}
