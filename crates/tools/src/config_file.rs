//! TOML dungeon configuration files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use dungeon_core::{DungeonConfig, DungeonResult};
use serde::{Deserialize, Serialize};

pub const CONFIG_FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    CONFIG_FORMAT_VERSION
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DungeonConfigFile {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default)]
    pub dungeon: DungeonConfig,
}

impl DungeonConfigFile {
    pub fn new(dungeon: DungeonConfig) -> Self {
        Self { format_version: CONFIG_FORMAT_VERSION, dungeon }
    }

    /// The config that produced `result`, pinned to the seed it ran with.
    pub fn for_replay(config: &DungeonConfig, result: &DungeonResult) -> Self {
        Self::new(DungeonConfig { seed: Some(result.seed.value()), ..config.clone() })
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: Self = toml::from_str(content).context("invalid dungeon config TOML")?;
        if file.format_version > CONFIG_FORMAT_VERSION {
            bail!(
                "config format version {} is newer than supported version {}",
                file.format_version,
                CONFIG_FORMAT_VERSION
            );
        }
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize dungeon config")
    }

    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, self.to_toml_string()?)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_core::GridCell;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let file = DungeonConfigFile::parse(
            r#"
            [dungeon]
            corridor_count = 9
            seed = 42

            [dungeon.start]
            x = 3
            y = -4

            [dungeon.room_walk]
            iterations = 2
            "#,
        )
        .expect("parse");

        let defaults = DungeonConfig::default();
        assert_eq!(file.format_version, CONFIG_FORMAT_VERSION);
        assert_eq!(file.dungeon.corridor_count, 9);
        assert_eq!(file.dungeon.seed, Some(42));
        assert_eq!(file.dungeon.start, GridCell::new(3, -4));
        assert_eq!(file.dungeon.room_walk.iterations, 2);
        assert_eq!(file.dungeon.room_walk.walk_length, defaults.room_walk.walk_length);
        assert_eq!(file.dungeon.corridor_length, defaults.corridor_length);
        assert_eq!(file.dungeon.rooms, defaults.rooms);
    }

    #[test]
    fn newer_format_version_is_rejected() {
        let err = DungeonConfigFile::parse("format_version = 99\n").unwrap_err();
        assert!(err.to_string().contains("newer"));
    }

    #[test]
    fn config_file_atomic_write_and_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("dungeon.toml");
        let file = DungeonConfigFile::new(DungeonConfig {
            corridor_width: 2,
            seed: Some(7),
            ..DungeonConfig::default()
        });

        file.write_atomic(&path).expect("write");
        let loaded = DungeonConfigFile::load(&path).expect("load");
        assert_eq!(file, loaded);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn saved_replay_config_reproduces_an_unseeded_run() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("replay.toml");
        let config = DungeonConfig { corridor_count: 3, ..DungeonConfig::default() };
        let result = dungeon_core::generate_dungeon(&config).expect("valid config");
        assert!(result.seed.is_generated());

        DungeonConfigFile::for_replay(&config, &result).write_atomic(&path).expect("write");
        let loaded = DungeonConfigFile::load(&path).expect("load");
        assert_eq!(loaded.dungeon.seed, Some(result.seed.value()));

        let replayed = dungeon_core::generate_dungeon(&loaded.dungeon).expect("replay");
        assert_eq!(replayed.fingerprint(), result.fingerprint());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("absent.toml");
        let err = DungeonConfigFile::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }
}
