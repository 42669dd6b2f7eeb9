//! User settings for fintrack
//!
//! Persists the local profile identity and display preferences. The
//! local user id is generated the first time settings are created and
//! stays stable from then on; `fintrack init` records the email that
//! completes the identity.

use serde::{Deserialize, Serialize};

use super::paths::FintrackPaths;
use crate::auth::Identity;
use crate::error::Error;
use crate::models::UserId;

/// User settings for fintrack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Stable local user id, owner key for all gateway records
    pub user_id: UserId,

    /// Email recorded by `fintrack init`; identity is incomplete without it
    #[serde(default)]
    pub email: Option<String>,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Whether initial setup has been completed
    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_date_format() -> String {
    "%-d %b %Y".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            user_id: UserId::new(),
            email: None,
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, creating defaults if no file exists yet
    pub fn load_or_create(paths: &FintrackPaths) -> Result<Self, Error> {
        let path = paths.settings_file();
        if path.exists() {
            Self::load(paths)
        } else {
            let settings = Self::default();
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Load settings from disk
    pub fn load(paths: &FintrackPaths) -> Result<Self, Error> {
        let path = paths.settings_file();
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FintrackPaths) -> Result<(), Error> {
        paths.ensure_directories()?;
        let path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(&path, contents)
            .map_err(|e| Error::Config(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// The local identity, if setup recorded an email
    pub fn identity(&self) -> Option<Identity> {
        self.email
            .as_ref()
            .map(|email| Identity::new(self.user_id, email.clone()))
    }
}
