use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConsoleError;

pub const BASE_URL_KEY: &str = "civic_baseUrl";
pub const API_KEY_KEY: &str = "civic_apiKey";

const API_SUFFIX: &str = "/api";

/// Key-value storage the connection settings persist in.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ConsoleError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConsoleError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub base_url: String,
    pub api_key: String,
}

impl ConnectionSettings {
    /// Trims both values and drops trailing slashes from the base url.
    pub fn normalized(base_url: &str, api_key: &str) -> Self {
        ConnectionSettings {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        }
    }
}

pub fn default_base_url(origin: &str) -> String {
    format!("{}{API_SUFFIX}", origin.trim_end_matches('/'))
}

/// Persisted settings, falling back to `<origin>/api` and an empty key.
pub fn load<S: SettingsStore + ?Sized>(
    store: &S,
    origin: &str,
) -> Result<ConnectionSettings, ConsoleError> {
    let base_url = store
        .get(BASE_URL_KEY)?
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| default_base_url(origin));
    let api_key = store.get(API_KEY_KEY)?.unwrap_or_default();

    Ok(ConnectionSettings {
        base_url: base_url.trim_end_matches('/').to_string(),
        api_key,
    })
}

pub fn save<S: SettingsStore + ?Sized>(
    store: &S,
    form: &ConnectionSettings,
) -> Result<ConnectionSettings, ConsoleError> {
    let settings = ConnectionSettings::normalized(&form.base_url, &form.api_key);
    store.set(BASE_URL_KEY, &settings.base_url)?;
    store.set(API_KEY_KEY, &settings.api_key)?;

    Ok(settings)
}

#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ConsoleError> {
        Ok(Self::from_db(sled::open(path)?))
    }

    pub fn from_db(db: sled::Db) -> Self {
        SledStore { db }
    }
}

impl SettingsStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConsoleError> {
        match self.db.get(key)? {
            Some(value) => String::from_utf8(value.to_vec())
                .map(Some)
                .map_err(|_| ConsoleError::Encoding(key.to_string())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConsoleError> {
        self.db.insert(key, value.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }
}
