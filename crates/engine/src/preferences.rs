//! User preferences: defaults, on-disk JSON and a swappable shared snapshot.

use crate::error::{EngineError, Result};
use crate::file_size::{SizeLimits, DEFAULT_HARD_LIMIT, DEFAULT_WARNING_LIMIT};
use crate::platform::Platform;
use crate::report::Locale;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Overrides the preferences file location
pub const CONFIG_ENV: &str = "DYNAMIC_RULES_CONFIG";
const CONFIG_DIR_NAME: &str = "dynamic-rules";
const CONFIG_FILE_NAME: &str = "config.json";

const DEFAULT_PRINCIPLE: &str = "⚠️ Kullanıcı ile GERÇEKÇİ konuşulacak.\n\
❌ ASLA iyimser olunmayacak!\n\
✓ Riskler açıkça belirtilecek\n\
✓ Sorunlar net ifade edilecek\n\
✓ Gerçekçi beklentiler sunulacak";

const DEFAULT_BEHAVIORS: [&str; 3] = [
    "no_github_push_without_consent",
    "no_file_growth_beyond_700_lines",
    "remove_unused_imports_and_dead_code",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Tr,
    En,
    De,
    Fr,
}

impl Language {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tr => "tr",
            Self::En => "en",
            Self::De => "de",
            Self::Fr => "fr",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "tr" => Some(Self::Tr),
            "en" => Some(Self::En),
            "de" => Some(Self::De),
            "fr" => Some(Self::Fr),
            _ => None,
        }
    }

    /// Report locale; only Turkish has its own templates
    pub const fn locale(self) -> Locale {
        match self {
            Self::Tr => Locale::Tr,
            Self::En | Self::De | Self::Fr => Locale::En,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Realistic,
    Optimistic,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguagePrefs {
    pub user_communication: Language,
    /// Always `en`
    pub code_and_tech: String,
}

impl Default for LanguagePrefs {
    fn default() -> Self {
        Self {
            user_communication: Language::Tr,
            code_and_tech: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommunicationPrefs {
    pub tone: Tone,
    pub principle: String,
}

impl Default for CommunicationPrefs {
    fn default() -> Self {
        Self {
            tone: Tone::Realistic,
            principle: DEFAULT_PRINCIPLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileSizeLimitPrefs {
    pub warning: usize,
    pub hard: usize,
}

impl Default for FileSizeLimitPrefs {
    fn default() -> Self {
        Self {
            warning: DEFAULT_WARNING_LIMIT,
            hard: DEFAULT_HARD_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafeModePrefs {
    pub enabled: bool,
    pub behaviors: Vec<String>,
}

impl Default for SafeModePrefs {
    fn default() -> Self {
        Self {
            enabled: true,
            behaviors: DEFAULT_BEHAVIORS.iter().map(|b| (*b).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformPrefs {
    pub detected: Platform,
    pub check_git_hub: bool,
}

impl Default for PlatformPrefs {
    fn default() -> Self {
        Self {
            detected: Platform::Windows,
            check_git_hub: true,
        }
    }
}

/// Persisted user preferences.
///
/// Missing sections and fields fall back to their defaults when loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub language: LanguagePrefs,
    pub communication: CommunicationPrefs,
    pub file_size_limit: FileSizeLimitPrefs,
    pub safe_mode: SafeModePrefs,
    pub platform: PlatformPrefs,
}

impl Preferences {
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.size_limits().validate()?;
        if self.language.code_and_tech != "en" {
            return Err("language.codeAndTech must be \"en\"".to_string());
        }
        Ok(())
    }

    pub fn size_limits(&self) -> SizeLimits {
        SizeLimits {
            warning: self.file_size_limit.warning,
            hard: self.file_size_limit.hard,
        }
    }

    pub fn locale(&self) -> Locale {
        self.language.user_communication.locale()
    }

    /// Parse and validate a preferences document
    pub fn from_json(raw: &str) -> Result<Self> {
        let prefs: Self = serde_json::from_str(raw)?;
        prefs.validate().map_err(EngineError::invalid_preferences)?;
        Ok(prefs)
    }

    /// Read preferences from `path`. `Ok(None)` when no file exists.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_json(&raw).map(Some),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Read preferences from `path`, falling back to defaults when the file is
    /// missing, unreadable or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => {
                log::debug!("no preferences at {}", path.display());
                Self::default()
            }
            Err(err) => {
                log::debug!("ignoring preferences at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Validate and write to `path` through a temp file and a rename, so
    /// readers see either the old document or the new one.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate().map_err(EngineError::invalid_preferences)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomic(path, &serde_json::to_vec_pretty(self)?)
    }

    /// Value at a dotted key such as `fileSizeLimit.hard`
    pub fn get_dotted(&self, key: &str) -> Result<Value> {
        let mut node = serde_json::to_value(self)?;
        for segment in key.split('.') {
            node = match node {
                Value::Object(mut map) => map
                    .remove(segment)
                    .ok_or_else(|| EngineError::InvalidConfigKey(key.to_string()))?,
                _ => return Err(EngineError::InvalidConfigKey(key.to_string())),
            };
        }
        Ok(node)
    }

    /// Copy with one dotted key replaced. The raw value is read as JSON when it
    /// parses, else as a plain string; the result must validate.
    pub fn with_dotted(&self, key: &str, raw_value: &str) -> Result<Self> {
        let value = serde_json::from_str::<Value>(raw_value)
            .unwrap_or_else(|_| Value::String(raw_value.to_string()));

        let mut root = serde_json::to_value(self)?;
        let mut segments = key.split('.').peekable();
        let mut node = &mut root;
        while let Some(segment) = segments.next() {
            let map = node
                .as_object_mut()
                .ok_or_else(|| EngineError::InvalidConfigKey(key.to_string()))?;
            let slot = map
                .get_mut(segment)
                .ok_or_else(|| EngineError::InvalidConfigKey(key.to_string()))?;
            if segments.peek().is_none() {
                *slot = value;
                break;
            }
            node = slot;
        }

        let updated: Self = serde_json::from_value(root)
            .map_err(|err| EngineError::invalid_preferences(format!("{key}: {err}")))?;
        updated
            .validate()
            .map_err(EngineError::invalid_preferences)?;
        Ok(updated)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(CONFIG_FILE_NAME);
    let tmp = path.with_file_name(format!(".{file_name}.tmp-{}", std::process::id()));

    {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}

/// Preferences file location: `$DYNAMIC_RULES_CONFIG`, else
/// `<config_dir>/dynamic-rules/config.json`.
pub fn config_path() -> PathBuf {
    config_path_from(env::var_os(CONFIG_ENV))
}

fn config_path_from(override_path: Option<OsString>) -> PathBuf {
    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Process-wide preferences handle.
///
/// Readers take an `Arc` snapshot; writers swap the whole snapshot, so a
/// reader never sees a half-applied update.
#[derive(Debug)]
pub struct PreferencesStore {
    path: Option<PathBuf>,
    current: RwLock<Arc<Preferences>>,
}

impl PreferencesStore {
    /// Load from `path`; later writes persist there
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = Preferences::load_or_default(&path);
        Self {
            path: Some(path),
            current: RwLock::new(Arc::new(prefs)),
        }
    }

    /// Load from the default location
    pub fn open_default() -> Self {
        Self::open(config_path())
    }

    /// Memory-only store; writes are never persisted
    pub fn detached(prefs: Preferences) -> Self {
        Self {
            path: None,
            current: RwLock::new(Arc::new(prefs)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn snapshot(&self) -> Arc<Preferences> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-read the backing file.
    ///
    /// A missing file resets to defaults. A file that cannot be read, parsed
    /// or validated leaves the current snapshot in place.
    pub fn reload(&self) -> Arc<Preferences> {
        let Some(path) = &self.path else {
            return self.snapshot();
        };
        match Preferences::load(path) {
            Ok(Some(prefs)) => self.swap(prefs),
            Ok(None) => self.swap(Preferences::default()),
            Err(err) => {
                log::warn!(
                    "keeping current preferences; {} is not usable: {err}",
                    path.display()
                );
                self.snapshot()
            }
        }
    }

    pub fn set(&self, key: &str, raw_value: &str) -> Result<Arc<Preferences>> {
        let updated = self.snapshot().with_dotted(key, raw_value)?;
        self.persist(updated)
    }

    pub fn reset(&self) -> Result<Arc<Preferences>> {
        self.persist(Preferences::default())
    }

    fn persist(&self, prefs: Preferences) -> Result<Arc<Preferences>> {
        if let Some(path) = &self.path {
            prefs.save(path)?;
            log::info!("preferences written to {}", path.display());
        }
        Ok(self.swap(prefs))
    }

    fn swap(&self, prefs: Preferences) -> Arc<Preferences> {
        let next = Arc::new(prefs);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        next
    }
}
