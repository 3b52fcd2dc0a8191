//! Settings file loading.
//!
//! Settings live in a TOML file, `hps.toml` in the working directory unless
//! `--config` names one:
//!
//! ```toml
//! [sanitize]
//! enforce_staff_domain = true
//! allowed_domains = ["dadeschools.net"]
//!
//! [import]
//! min_confidence = 0.7
//!
//! [import.synonyms]
//! homeroom = ["Period 1 Teacher"]
//!
//! [rate_limits.issue_pass]
//! max_requests = 15
//! window_secs = 60
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hps_map::{DEFAULT_MIN_CONFIDENCE, SynonymTable};
use hps_model::StudentField;
use hps_roster::ImportOptions;
use hps_sanitize::{Clock, RateLimitConfig, RateLimiters};
use hps_validate::{ValidationPolicy, Validator};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file looked up when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "hps.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("import.min_confidence must be between 0 and 1 (got {value})")]
    MinConfidence { value: f64 },
    #[error("unknown roster field '{name}' in import.synonyms")]
    UnknownField { name: String },
    #[error("rate limit '{name}' must allow at least one request in a non-empty window")]
    EmptyRateLimit { name: String },
}

/// Roster import settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub min_confidence: f64,
    /// Extra header names per field, keyed by snake_case field name.
    pub synonyms: BTreeMap<String, Vec<String>>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            synonyms: BTreeMap::new(),
        }
    }
}

/// All user-configurable settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sanitize: ValidationPolicy,
    pub import: ImportSettings,
    /// Overrides for the built-in limiters; new names add limiters.
    pub rate_limits: BTreeMap<String, RateLimitConfig>,
}

impl Settings {
    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let value = self.import.min_confidence;
        if !(0.0..=1.0).contains(&value) {
            return Err(SettingsError::MinConfidence { value });
        }
        if let Some(name) = self
            .import
            .synonyms
            .keys()
            .find(|name| StudentField::parse(name).is_none())
        {
            return Err(SettingsError::UnknownField { name: name.clone() });
        }
        if let Some((name, _)) = self
            .rate_limits
            .iter()
            .find(|(_, config)| config.max_requests == 0 || config.window_secs == 0)
        {
            return Err(SettingsError::EmptyRateLimit { name: name.clone() });
        }
        Ok(())
    }

    pub fn validator(&self) -> Validator {
        Validator::new(self.sanitize.clone())
    }

    /// Import options, with `min_confidence` overriding the file's value.
    pub fn import_options(&self, min_confidence: Option<f64>) -> ImportOptions {
        let mut synonyms = SynonymTable::default();
        for (name, extra) in &self.import.synonyms {
            if let Some(field) = StudentField::parse(name) {
                synonyms.extend(field, extra);
            }
        }
        ImportOptions {
            min_confidence: min_confidence.unwrap_or(self.import.min_confidence),
            synonyms,
        }
    }

    /// Built-in limits merged with the configured overrides.
    pub fn rate_limit_configs(&self) -> BTreeMap<String, RateLimitConfig> {
        let mut configs = RateLimiters::default_configs();
        configs.extend(
            self.rate_limits
                .iter()
                .map(|(name, config)| (name.clone(), *config)),
        );
        configs
    }

    pub fn rate_limiters(&self, clock: Arc<dyn Clock>) -> RateLimiters {
        RateLimiters::with_configs(self.rate_limit_configs(), clock)
    }
}

/// Loads settings.
///
/// With an explicit `path`, any read or parse failure is an error. Without
/// one, [`DEFAULT_SETTINGS_FILE`] is used if it exists; a missing or broken
/// default file falls back to defaults with a warning.
///
/// # Errors
///
/// Returns [`SettingsError`] for an unreadable or invalid explicit file, or
/// for out-of-range values in any file that was read.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let settings = match path {
        Some(path) => read_settings(path)?,
        None => {
            let path = Path::new(DEFAULT_SETTINGS_FILE);
            match read_settings(path) {
                Ok(settings) => settings,
                Err(SettingsError::Read { source, .. })
                    if source.kind() == io::ErrorKind::NotFound =>
                {
                    tracing::debug!("no settings file found, using defaults");
                    Settings::default()
                }
                Err(error) => {
                    tracing::warn!("{error}, using defaults");
                    Settings::default()
                }
            }
        }
    };
    settings.validate()?;
    Ok(settings)
}

fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "loaded settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn settings_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = settings_file("");
        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.rate_limit_configs().len(), 4);
    }

    #[test]
    fn test_full_file() {
        let file = settings_file(
            r#"
[sanitize]
enforce_staff_domain = true
allowed_domains = ["Example.EDU"]

[import]
min_confidence = 0.75

[import.synonyms]
homeroom = ["Period 1 Teacher"]

[rate_limits.issue_pass]
max_requests = 15
window_secs = 30

[rate_limits.export_report]
max_requests = 1
window_secs = 3600
"#,
        );
        let settings = load_settings(Some(file.path())).unwrap();

        assert!(settings.sanitize.enforce_staff_domain);
        assert!(settings.sanitize.allowed_domains.is_allowed("a@example.edu"));

        let options = settings.import_options(None);
        assert_eq!(options.min_confidence, 0.75);
        assert!(
            options
                .synonyms
                .synonyms(StudentField::Homeroom)
                .contains(&"period 1 teacher".to_string())
        );
        assert_eq!(settings.import_options(Some(0.9)).min_confidence, 0.9);

        let configs = settings.rate_limit_configs();
        assert_eq!(configs["issue_pass"], RateLimitConfig::new(15, 30));
        assert_eq!(configs["send_broadcast"], RateLimitConfig::new(3, 60));
        assert_eq!(configs.len(), 5);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn test_explicit_bad_toml_is_error() {
        let file = settings_file("[import\nmin_confidence = ");
        let err = load_settings(Some(file.path())).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_out_of_range_values() {
        let file = settings_file("[import]\nmin_confidence = 1.5\n");
        assert!(matches!(
            load_settings(Some(file.path())),
            Err(SettingsError::MinConfidence { .. })
        ));

        let file = settings_file("[import.synonyms]\nshoe_size = [\"Shoe\"]\n");
        assert!(matches!(
            load_settings(Some(file.path())),
            Err(SettingsError::UnknownField { .. })
        ));

        let file = settings_file("[rate_limits.issue_pass]\nmax_requests = 0\nwindow_secs = 60\n");
        assert!(matches!(
            load_settings(Some(file.path())),
            Err(SettingsError::EmptyRateLimit { .. })
        ));
    }
}
