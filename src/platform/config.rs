// DomainLens - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolved platform paths for DomainLens configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/domainlens/ or %APPDATA%\DomainLens\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Use an explicit configuration directory (`--config-dir`).
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file can be used with
/// an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[dataset]` section.
    pub dataset: DatasetSection,
    /// `[vocabulary]` section.
    pub vocabulary: VocabularySection,
    /// `[moats]` section.
    pub moats: MoatsSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[dataset]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DatasetSection {
    /// Dataset file loaded at startup when no path is given on the command line.
    pub path: Option<String>,
    /// Single-character field delimiter.
    pub delimiter: Option<String>,
    /// Maximum number of data rows accepted.
    pub max_rows: Option<usize>,
}

/// `[vocabulary]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct VocabularySection {
    /// Canonical brand codes.
    pub brands: Option<Vec<String>>,
    /// Measure names.
    pub measures: Option<Vec<String>>,
}

/// `[moats]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct MoatsSection {
    /// Display labels keyed by moat number, e.g. `labels = { 1 = "Supply Chain" }`.
    pub labels: Option<BTreeMap<String, String>>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Dataset --
    pub dataset_path: PathBuf,
    pub delimiter: u8,
    pub max_rows: usize,

    // -- Vocabulary --
    pub brand_codes: Vec<String>,
    pub measures: Vec<String>,
    /// Moat labels keyed by moat number with leading zeros stripped.
    pub moat_labels: BTreeMap<String, String>,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Body font size in points.
    pub font_size: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(constants::DEFAULT_DATASET_PATH),
            delimiter: constants::DEFAULT_DELIMITER,
            max_rows: constants::DEFAULT_MAX_ROWS,
            brand_codes: owned(constants::DEFAULT_BRAND_CODES),
            measures: owned(constants::DEFAULT_MEASURES),
            moat_labels: constants::DEFAULT_MOAT_LABELS
                .iter()
                .map(|(n, l)| ((*n).to_string(), (*l).to_string()))
                .collect(),
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults plus one warning, so the application
/// still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    let raw = match read_raw_config(&config_path) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
            return (AppConfig::default(), warnings);
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Read and parse config.toml. `Ok(None)` when the file does not exist.
fn read_raw_config(path: &Path) -> Result<Option<RawConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();
    let mut reject = |field: &str, value: String, expected: String, default: String| {
        let err = ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value,
            expected,
        };
        warnings.push(format!("{err}. Using default ({default})."));
    };

    // -- Dataset --
    if let Some(path) = raw.dataset.path {
        if path.trim().is_empty() {
            reject(
                "dataset.path",
                path,
                "a file path".to_string(),
                constants::DEFAULT_DATASET_PATH.to_string(),
            );
        } else {
            config.dataset_path = PathBuf::from(path.trim());
        }
    }

    if let Some(delimiter) = raw.dataset.delimiter {
        let byte = match delimiter.as_bytes() {
            [b] if b.is_ascii() && !matches!(b, b'"' | b'\n' | b'\r') => Some(*b),
            _ => None,
        };
        match byte {
            Some(b) => config.delimiter = b,
            None => reject(
                "dataset.delimiter",
                delimiter,
                "a single ASCII character other than a quote or newline".to_string(),
                "\",\"".to_string(),
            ),
        }
    }

    if let Some(rows) = raw.dataset.max_rows {
        if (constants::MIN_MAX_ROWS..=constants::ABSOLUTE_MAX_ROWS).contains(&rows) {
            config.max_rows = rows;
        } else {
            reject(
                "dataset.max_rows",
                rows.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_MAX_ROWS,
                    constants::ABSOLUTE_MAX_ROWS
                ),
                constants::DEFAULT_MAX_ROWS.to_string(),
            );
        }
    }

    // -- Vocabulary --
    if let Some(brands) = raw.vocabulary.brands {
        match clean_vocabulary(&brands) {
            Some(codes) => config.brand_codes = codes,
            None => reject(
                "vocabulary.brands",
                format!("{brands:?}"),
                "at least one non-blank code".to_string(),
                constants::DEFAULT_BRAND_CODES.join(", "),
            ),
        }
    }

    if let Some(measures) = raw.vocabulary.measures {
        match clean_vocabulary(&measures) {
            Some(names) => config.measures = names,
            None => reject(
                "vocabulary.measures",
                format!("{measures:?}"),
                "at least one non-blank name".to_string(),
                constants::DEFAULT_MEASURES.join(", "),
            ),
        }
    }

    // -- Moats: labels replace the built-in set entirely --
    if let Some(labels) = raw.moats.labels {
        let mut accepted = BTreeMap::new();
        for (key, label) in labels {
            match moat_key(&key) {
                Some(number) if !label.trim().is_empty() => {
                    accepted.insert(number, label.trim().to_string());
                }
                _ => reject(
                    "moats.labels",
                    format!("{key} = {label:?}"),
                    "a moat number mapped to a non-blank label".to_string(),
                    "entry ignored".to_string(),
                ),
            }
        }
        config.moat_labels = accepted;
    }

    // -- UI: theme --
    if let Some(theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            _ => reject(
                "ui.theme",
                theme,
                "\"dark\" or \"light\"".to_string(),
                "dark".to_string(),
            ),
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            reject(
                "ui.font_size",
                size.to_string(),
                format!("{}-{}", constants::MIN_FONT_SIZE, constants::MAX_FONT_SIZE),
                constants::DEFAULT_FONT_SIZE.to_string(),
            );
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            reject(
                "logging.level",
                level,
                "error, warn, info, debug or trace".to_string(),
                constants::DEFAULT_LOG_LEVEL.to_string(),
            );
        }
    }

    config
}

/// Trimmed, non-blank entries with case-insensitive duplicates removed
/// (first spelling wins). `None` when nothing usable remains.
fn clean_vocabulary(items: &[String]) -> Option<Vec<String>> {
    let mut cleaned: Vec<String> = Vec::with_capacity(items.len());
    for item in items.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !cleaned.iter().any(|c| c.eq_ignore_ascii_case(item)) {
            cleaned.push(item.to_string());
        }
    }
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Moat number key with leading zeros stripped; `None` unless all digits.
fn moat_key(key: &str) -> Option<String> {
    let key = key.trim();
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let stripped = key.trim_start_matches('0');
    let number = if stripped.is_empty() { "0" } else { stripped };
    Some(number.to_string())
}
