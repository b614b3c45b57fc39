// config.rs — Project layout and location vocabulary.
//
// PawConfig determines where records and moderation events live. The
// `for_project()` constructor produces the standard `.paw/` layout; `load()`
// additionally applies overrides from `.paw/config.toml` when it exists:
//
//   locations = ["图书馆草坪", "学五食堂后", "操场看台", "宿舍区", "北门车棚"]
//   events_log = "/var/log/paw/events.jsonl"

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PawError;

/// The picker entry that means "let me type a place". Never a real location.
pub const MANUAL_ENTRY_LABEL: &str = "手动输入...";

pub const DEFAULT_LOCATIONS: [&str; 4] = ["图书馆草坪", "学五食堂后", "操场看台", "宿舍区"];

/// Coarse campus spots offered by the intake form.
///
/// Free text is also accepted by intake; these are only the presets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationVocabulary {
    presets: Vec<String>,
}

impl LocationVocabulary {
    pub fn new(presets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            presets: presets.into_iter().map(Into::into).collect(),
        }
    }

    /// Presets followed by the manual-entry option, as shown in the picker.
    pub fn options(&self) -> Vec<&str> {
        self.presets
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(MANUAL_ENTRY_LABEL))
            .collect()
    }

    /// True for input that names no place at all.
    pub fn is_blank(&self, label: &str) -> bool {
        let label = label.trim();
        label.is_empty() || label == MANUAL_ENTRY_LABEL
    }
}

impl Default for LocationVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATIONS)
    }
}

/// On-disk overrides. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    locations: Option<Vec<String>>,
    events_log: Option<PathBuf>,
}

/// Where a Paw Planet project keeps its state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PawConfig {
    /// Root directory of the project.
    pub project_root: PathBuf,

    /// Directory holding the record logs (animals, sightings, reports).
    pub data_dir: PathBuf,

    /// Append-only moderation event log.
    pub events_log: PathBuf,

    #[serde(default)]
    pub locations: LocationVocabulary,
}

impl PawConfig {
    /// Create a config with the standard `.paw/` layout for a project.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref().to_path_buf();
        let paw_dir = root.join(".paw");
        Self {
            project_root: root,
            data_dir: paw_dir.clone(),
            events_log: paw_dir.join("events.jsonl"),
            locations: LocationVocabulary::default(),
        }
    }

    /// `for_project` plus any overrides in `.paw/config.toml`.
    pub fn load(project_root: impl AsRef<Path>) -> Result<Self, PawError> {
        let mut config = Self::for_project(project_root);
        let path = config.config_file();
        if !path.exists() {
            return Ok(config);
        }

        let content = fs::read_to_string(&path).map_err(|source| PawError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|source| PawError::ConfigError {
            path: path.display().to_string(),
            source,
        })?;

        if let Some(locations) = file.locations {
            config.locations = LocationVocabulary::new(locations);
        }
        if let Some(events_log) = file.events_log {
            config.events_log = if events_log.is_absolute() {
                events_log
            } else {
                config.project_root.join(events_log)
            };
        }

        tracing::debug!(path = %path.display(), "applied config overrides");
        Ok(config)
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn for_project_uses_paw_dir() {
        let config = PawConfig::for_project("/srv/campus");
        assert_eq!(config.data_dir, PathBuf::from("/srv/campus/.paw"));
        assert_eq!(
            config.events_log,
            PathBuf::from("/srv/campus/.paw/events.jsonl")
        );
        // Presets plus the manual-entry option.
        assert_eq!(config.locations.options().len(), DEFAULT_LOCATIONS.len() + 1);
    }

    #[test]
    fn load_without_file_is_defaults() {
        let dir = tempdir().unwrap();
        let config = PawConfig::load(dir.path()).unwrap();
        assert_eq!(config.locations, LocationVocabulary::default());
    }

    #[test]
    fn load_applies_overrides() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".paw")).unwrap();
        fs::write(
            dir.path().join(".paw/config.toml"),
            "locations = [\"北门车棚\"]\nevents_log = \"logs/events.jsonl\"\n",
        )
        .unwrap();

        let config = PawConfig::load(dir.path()).unwrap();
        assert_eq!(config.locations.options(), vec!["北门车棚", MANUAL_ENTRY_LABEL]);
        assert_eq!(config.events_log, dir.path().join("logs/events.jsonl"));
    }

    #[test]
    fn malformed_config_is_reported() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".paw")).unwrap();
        fs::write(dir.path().join(".paw/config.toml"), "locations = 3").unwrap();
        assert!(matches!(
            PawConfig::load(dir.path()),
            Err(PawError::ConfigError { .. })
        ));
    }

    #[test]
    fn manual_entry_counts_as_blank() {
        let vocab = LocationVocabulary::default();
        assert!(vocab.is_blank("   "));
        assert!(vocab.is_blank(MANUAL_ENTRY_LABEL));
        assert!(!vocab.is_blank("图书馆草坪"));
        assert!(!vocab.is_blank("北门车棚"));
        assert_eq!(vocab.options().last(), Some(&MANUAL_ENTRY_LABEL));
    }
}
