//! User configuration (`config.toml`).

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use quire_core::{SpreadsheetDefaults, UserProfile};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store: StoreConfig,
    pub spreadsheet: SpreadsheetDefaults,
    pub autosave: AutosaveConfig,
    pub user: UserConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Documents file; defaults to `<data_dir>/documents.json`.
    pub path: Option<PathBuf>,
    /// Signed-in profile; defaults to `profile.json` next to the documents file.
    pub profile: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutosaveConfig {
    pub delay_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        AutosaveConfig {
            delay_ms: quire_core::DEFAULT_AUTOSAVE_DELAY.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    pub email: String,
    pub full_name: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        UserConfig {
            email: "local@quire".to_string(),
            full_name: String::new(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "quire")
}

pub fn default_config_path() -> Option<PathBuf> {
    let proj = project_dirs()?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

fn data_dir() -> PathBuf {
    project_dirs()
        .map(|proj| proj.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".quire"))
}

impl Config {
    /// Load `explicit` if given (it must exist), else the user config file if
    /// present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Config::default()),
            },
        };

        let meta = std::fs::metadata(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            bail!(
                "Refusing to read {}: config file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            );
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Config::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content)?;
        if config.spreadsheet.columns == 0 || config.spreadsheet.rows == 0 {
            bail!("spreadsheet.rows and spreadsheet.columns must be at least 1");
        }
        let width = config.spreadsheet.column_width;
        if !width.is_finite() || width <= 0.0 {
            bail!("spreadsheet.column_width must be a positive number");
        }
        Ok(config)
    }

    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| data_dir().join("documents.json"))
    }

    pub fn profile_path(&self, store_path: &Path) -> PathBuf {
        if let Some(path) = &self.store.profile {
            return path.clone();
        }
        match store_path.parent() {
            Some(dir) => dir.join("profile.json"),
            None => PathBuf::from("profile.json"),
        }
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave.delay_ms)
    }

    pub fn seed_profile(&self) -> UserProfile {
        UserProfile::new(&self.user.email, &self.user.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.spreadsheet, SpreadsheetDefaults::default());
        assert_eq!(config.autosave_delay(), Duration::from_millis(1000));
        assert_eq!(config.user.email, "local@quire");
        assert!(config.store_path().ends_with("documents.json"));
    }

    #[test]
    fn test_profile_defaults_next_to_store() {
        let config = Config::parse("").unwrap();
        assert_eq!(
            config.profile_path(Path::new("/data/q/docs.json")),
            PathBuf::from("/data/q/profile.json")
        );
        let config = Config::parse("[store]\nprofile = \"/p.json\"\n").unwrap();
        assert_eq!(
            config.profile_path(Path::new("/data/q/docs.json")),
            PathBuf::from("/p.json")
        );
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [store]
            path = "/tmp/docs.json"

            [spreadsheet]
            columns = 4

            [autosave]
            delay_ms = 250

            [user]
            email = "ada@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.store_path(), PathBuf::from("/tmp/docs.json"));
        assert_eq!(config.spreadsheet.columns, 4);
        assert_eq!(config.spreadsheet.rows, 10);
        assert_eq!(config.autosave_delay(), Duration::from_millis(250));
        assert_eq!(config.seed_profile().email, "ada@example.com");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::parse("[store]\nfile = \"x\"\n").is_err());
        assert!(Config::parse("[theme]\nname = \"dark\"\n").is_err());
    }

    #[test]
    fn test_invalid_sheet_shape_rejected() {
        assert!(Config::parse("[spreadsheet]\ncolumns = 0\n").is_err());
        assert!(Config::parse("[spreadsheet]\ncolumn_width = -5.0\n").is_err());
    }

    #[test]
    fn test_non_finite_column_width_rejected() {
        for value in ["nan", "inf", "+inf", "-inf"] {
            let content = format!("[spreadsheet]\ncolumn_width = {}\n", value);
            assert!(Config::parse(&content).is_err(), "accepted {}", value);
        }
        let config = Config::parse("[spreadsheet]\ncolumn_width = 80\n").unwrap();
        assert_eq!(config.spreadsheet.column_width, 80.0);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[spreadsheet]\nrows = 3\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.spreadsheet.rows, 3);
    }

    #[test]
    fn default_config_path_is_deterministic() {
        // Should never panic and should either be Some(path) or None.
        let _ = default_config_path();
    }
}
