use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Set once at startup by main() from the --data-dir argument.
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Call this from main() before any load operations.
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

/// A file in the data directory. Files are read at startup; only `init`
/// writes them. Session state is never saved back.
pub trait Persistable: Sized + Default + Serialize + for<'de> Deserialize<'de> {
    fn filename() -> &'static str;
    fn is_json() -> bool;

    fn load() -> Result<Self> {
        Self::load_from(&get_data_dir()?)
    }

    /// Load from an explicit directory. A missing file yields `Default`.
    fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(Self::filename());
        if !path.exists() {
            debug!(path = %path.display(), "no file, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::decode(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    fn exists_in(dir: &Path) -> bool {
        dir.join(Self::filename()).exists()
    }

    /// Save to an explicit directory, creating it when missing.
    fn save_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create dir {}", dir.display()))?;
        let path = dir.join(Self::filename());
        fs::write(&path, self.encode()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    fn decode(contents: &str) -> Result<Self> {
        if Self::is_json() {
            serde_json::from_str(contents).context("invalid JSON")
        } else {
            serde_norway::from_str(contents).context("invalid YAML")
        }
    }

    fn encode(&self) -> Result<String> {
        if Self::is_json() {
            serde_json::to_string_pretty(self).context("failed to serialize JSON")
        } else {
            serde_norway::to_string(self).context("failed to serialize YAML")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct JsonFile {
        value: String,
    }

    impl Persistable for JsonFile {
        fn filename() -> &'static str {
            "test_data.json"
        }
        fn is_json() -> bool {
            true
        }
    }

    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct YamlFile {
        count: u32,
    }

    impl Persistable for YamlFile {
        fn filename() -> &'static str {
            "test_data.yaml"
        }
        fn is_json() -> bool {
            false
        }
    }

    #[test]
    fn test_load_from_returns_default_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(JsonFile::load_from(tmp.path()).unwrap(), JsonFile::default());
        assert!(!JsonFile::exists_in(tmp.path()));
    }

    #[test]
    fn test_json_save_to_and_load_from() {
        let tmp = TempDir::new().unwrap();
        let data = JsonFile { value: "hello".to_string() };
        data.save_to(tmp.path()).unwrap();
        assert!(JsonFile::exists_in(tmp.path()));
        assert_eq!(JsonFile::load_from(tmp.path()).unwrap(), data);
    }

    #[test]
    fn test_yaml_save_to_and_load_from() {
        let tmp = TempDir::new().unwrap();
        let data = YamlFile { count: 42 };
        data.save_to(tmp.path()).unwrap();
        let raw = fs::read_to_string(tmp.path().join("test_data.yaml")).unwrap();
        assert!(raw.contains("count: 42"));
        assert_eq!(YamlFile::load_from(tmp.path()).unwrap(), data);
    }

    #[test]
    fn test_save_to_creates_directory_if_missing() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        let data = JsonFile { value: "nested".to_string() };
        data.save_to(&nested).unwrap();
        assert_eq!(JsonFile::load_from(&nested).unwrap(), data);
    }

    #[test]
    fn test_load_from_reports_parse_error_with_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("test_data.json"), "{ not json").unwrap();
        let err = JsonFile::load_from(tmp.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("test_data.json"));
    }
}
