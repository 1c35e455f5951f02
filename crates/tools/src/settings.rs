use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dungeon_core::DungeonConfig;

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub room_min_size: Option<usize>,
    pub room_max_size: Option<usize>,
    pub room_count: Option<usize>,
    pub seed: Option<u64>,
}

pub fn load_config(path: &Path) -> Result<DungeonConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Starts from the file (or defaults) and applies every override that is set.
pub fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> Result<DungeonConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => DungeonConfig::default(),
    };

    if let Some(width) = overrides.width {
        config.width = width;
    }
    if let Some(height) = overrides.height {
        config.height = height;
    }
    if let Some(room_min_size) = overrides.room_min_size {
        config.room_min_size = room_min_size;
    }
    if let Some(room_max_size) = overrides.room_max_size {
        config.room_max_size = room_max_size;
    }
    if let Some(room_count) = overrides.room_count {
        config.room_count = room_count;
    }
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file_or_overrides() {
        let config = resolve_config(None, &Overrides::default()).unwrap();
        assert_eq!(config, DungeonConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dungeon.toml");
        fs::write(&path, "room_count = 3\nseed = 99\n").unwrap();

        let config = resolve_config(Some(&path), &Overrides::default()).unwrap();
        assert_eq!(config.room_count, 3);
        assert_eq!(config.seed, 99);
        assert_eq!(config.width, DungeonConfig::default().width);
    }

    #[test]
    fn test_cli_overrides_beat_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dungeon.toml");
        fs::write(&path, "width = 60\nheight = 30\nseed = 5\n").unwrap();

        let overrides = Overrides { height: Some(50), seed: Some(7), ..Overrides::default() };
        let config = resolve_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.width, 60);
        assert_eq!(config.height, 50);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_missing_file_reports_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let error = resolve_config(Some(&path), &Overrides::default()).unwrap_err();
        assert!(format!("{error}").contains("absent.toml"));
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "width = \"wide\"\n").unwrap();
        let error = resolve_config(Some(&path), &Overrides::default()).unwrap_err();
        assert!(format!("{error:#}").contains("Failed to parse"));
    }
}
