use anyhow::Result;
use std::fs;
use std::path::Path;
use timetable::data::persistence::get_data_dir;
use timetable::data::{AppSettings, Persistable, SeedData};
use tracing::info;

pub fn run() -> Result<()> {
    let dir = get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir)?;
    println!("Data files initialized successfully.");
    Ok(())
}

/// Writes the default config.yaml and seed.json into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    AppSettings::default().save_to(dir)?;
    SeedData::builtin().save_to(dir)?;
    info!(dir = %dir.display(), "wrote default data files");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_in_dir_creates_all_files() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        assert!(tmp.path().join("config.yaml").exists(), "config.yaml missing");
        assert!(tmp.path().join("seed.json").exists(), "seed.json missing");
    }

    #[test]
    fn test_config_yaml_has_grid_settings() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        let content = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
        assert!(content.contains("settings"), "config.yaml missing 'settings' key");
        assert!(content.contains("column_width: 10"));
        assert_eq!(AppSettings::load_from(tmp.path()).unwrap(), AppSettings::default());
    }

    #[test]
    fn test_seed_json_matches_builtin() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        let content = fs::read_to_string(tmp.path().join("seed.json")).unwrap();
        assert!(content.contains("\"schedule-1\""));
        assert!(content.contains("\"range\""));
        assert_eq!(SeedData::load_from(tmp.path()).unwrap(), SeedData::builtin());
    }

    #[test]
    fn test_run_in_dir_overwrites_existing_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("seed.json"), "{ broken").unwrap();
        run_in_dir(tmp.path()).unwrap();
        assert_eq!(SeedData::load_from(tmp.path()).unwrap(), SeedData::builtin());
    }
}
