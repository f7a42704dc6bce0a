//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/famtree/famtree.toml`
//! 3. Local config: `<dir>/.famtree.toml` (working directory by default)
//! 4. Environment variables: `FAMTREE_*` prefix, `__` between nested keys

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{NamePolicy, SpouseRemoval, TreeOptions};

/// CSV export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    /// Write the `name,details,spouse-info,depth` header line
    pub header: bool,
    /// Directory relative export targets are resolved against
    pub dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            header: true,
            dir: None,
        }
    }
}

/// Raw export config for intermediate parsing (`None` = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawExportConfig {
    pub header: Option<bool>,
    pub dir: Option<PathBuf>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub name_policy: Option<NamePolicy>,
    pub spouse_removal: Option<SpouseRemoval>,
    pub export: RawExportConfig,
}

/// Unified configuration for famtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// `first-match` (duplicates allowed) or `unique`
    pub name_policy: NamePolicy,
    /// `one-sided` or `mutual`
    pub spouse_removal: SpouseRemoval,
    pub export: ExportConfig,
}

/// Get the XDG config directory for famtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "famtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("famtree.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".famtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            name_policy: self.name_policy,
            spouse_removal: self.spouse_removal,
        }
    }

    /// Resolve an export target: relative paths go under `export.dir` if set.
    pub fn resolve_export_path(&self, target: &Path) -> PathBuf {
        match &self.export.dir {
            Some(dir) if target.is_relative() => dir.join(target),
            _ => target.to_path_buf(),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.export.dir {
            self.export.dir = Some(PathBuf::from(expand_env_vars(&dir.to_string_lossy())));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            name_policy: overlay.name_policy.unwrap_or(self.name_policy),
            spouse_removal: overlay.spouse_removal.unwrap_or(self.spouse_removal),
            export: ExportConfig {
                header: overlay.export.header.unwrap_or(self.export.header),
                dir: overlay
                    .export
                    .dir
                    .clone()
                    .or_else(|| self.export.dir.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory holding `.famtree.toml`, if any
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply FAMTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FAMTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(&config, "name_policy")? {
            settings.name_policy = val;
        }
        if let Some(val) = env_value(&config, "spouse_removal")? {
            settings.spouse_removal = val;
        }
        if let Some(val) = env_value(&config, "export.header")? {
            settings.export.header = val;
        }
        if let Some(val) = env_value::<String>(&config, "export.dir")? {
            settings.export.dir = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# famtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/famtree/famtree.toml
#   Local:  ./.famtree.toml
#   Env:    FAMTREE_* environment variables (FAMTREE_EXPORT__HEADER=false)

# Names are looked up depth-first, first match wins.
# "unique" rejects adding a name that is already used in the tree.
# name_policy = "first-match"

# "one-sided" keeps the removed spouse's link back to the member,
# "mutual" removes both sides.
# spouse_removal = "one-sided"

[export]
# Write the name,details,spouse-info,depth header line
# header = true

# Directory for relative export targets
# dir = "~/genealogy"
"#
        .to_string()
    }
}

fn env_value<T: DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_then_compatible_behavior() {
        let settings = Settings::default();
        assert_eq!(settings.name_policy, NamePolicy::FirstMatch);
        assert_eq!(settings.spouse_removal, SpouseRemoval::OneSided);
        assert!(settings.export.header);
        assert_eq!(settings.export.dir, None);
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings::default();
        let overlay: RawSettings = toml::from_str(
            r#"
            spouse_removal = "mutual"
            [export]
            header = false
            "#,
        )
        .unwrap();

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.name_policy, NamePolicy::FirstMatch);
        assert_eq!(merged.spouse_removal, SpouseRemoval::Mutual);
        assert!(!merged.export.header);
    }

    #[test]
    fn given_unknown_policy_when_parsing_then_error() {
        let result: Result<RawSettings, _> = toml::from_str(r#"name_policy = "sometimes""#);
        assert!(result.is_err());
    }

    #[test]
    fn given_local_config_when_loading_then_applied() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(local_config_path(dir.path()), "name_policy = \"unique\"\n").unwrap();

        let settings = Settings::load(Some(dir.path())).unwrap();

        assert_eq!(settings.name_policy, NamePolicy::Unique);
        assert_eq!(settings.tree_options().name_policy, NamePolicy::Unique);
    }

    #[test]
    fn given_tilde_in_export_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings::default();
        settings.export.dir = Some(PathBuf::from("~/genealogy"));

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.export.dir.unwrap();
        assert!(dir.starts_with(&home), "{}", dir.display());
    }

    #[test]
    fn given_export_dir_when_resolving_then_only_relative_targets_move() {
        let mut settings = Settings::default();
        settings.export.dir = Some(PathBuf::from("/data/out"));

        assert_eq!(
            settings.resolve_export_path(Path::new("smith.csv")),
            PathBuf::from("/data/out/smith.csv")
        );
        assert_eq!(
            settings.resolve_export_path(Path::new("/tmp/smith.csv")),
            PathBuf::from("/tmp/smith.csv")
        );
    }

    #[test]
    fn given_settings_when_serialized_then_roundtrips_through_toml() {
        let mut settings = Settings::default();
        settings.spouse_removal = SpouseRemoval::Mutual;
        let text = settings.to_toml().unwrap();
        assert!(text.contains("spouse_removal = \"mutual\""));
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_then_it_parses() {
        let parsed: Result<RawSettings, _> = toml::from_str(&Settings::template());
        assert!(parsed.is_ok());
    }
}
