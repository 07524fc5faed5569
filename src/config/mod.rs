//! Process-level settings that pick and locate the storage backend.

use std::{env, fmt, path::PathBuf};

use tracing::warn;

pub const STORAGE_TYPE_VAR: &str = "STORAGE_TYPE";
pub const STORAGE_URL_VAR: &str = "STORAGE_URL";
pub const DEFAULT_STORAGE_URL: &str = "data";
const DATABASE_FILE: &str = "expenses.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Json,
    Sqlite,
}

impl BackendKind {
    /// Unknown or empty values fall back to the file backend.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "json" => BackendKind::Json,
            "sqlite" | "sql" => BackendKind::Sqlite,
            other => {
                warn!(backend = other, "unknown storage type, using json");
                BackendKind::Json
            }
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Json => f.write_str("json"),
            BackendKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub kind: BackendKind,
    /// Data directory for the file backend; database file or directory for SQLite.
    pub url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            kind: BackendKind::Json,
            url: DEFAULT_STORAGE_URL.into(),
        }
    }
}

impl StorageSettings {
    pub fn json(dir: impl Into<String>) -> Self {
        Self {
            kind: BackendKind::Json,
            url: dir.into(),
        }
    }

    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            kind: BackendKind::Sqlite,
            url: path.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = lookup(STORAGE_TYPE_VAR)
            .map(|value| BackendKind::parse(&value))
            .unwrap_or_default();
        let url = lookup(STORAGE_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_URL.to_string());
        Self { kind, url }
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.url)
    }

    /// A URL without a file extension names a directory that holds `expenses.db`.
    pub fn database_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.url);
        if path.extension().is_some() {
            path
        } else {
            path.join(DATABASE_FILE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> StorageSettings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorageSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_json_in_data_dir() {
        let settings = settings(&[]);
        assert_eq!(settings, StorageSettings::default());
        assert_eq!(settings.data_dir(), PathBuf::from("data"));
    }

    #[test]
    fn reads_sqlite_selection() {
        let settings = settings(&[("STORAGE_TYPE", "SQLite"), ("STORAGE_URL", "/var/lib/app.db")]);
        assert_eq!(settings.kind, BackendKind::Sqlite);
        assert_eq!(settings.database_path(), PathBuf::from("/var/lib/app.db"));
    }

    #[test]
    fn unknown_type_falls_back_to_json() {
        let settings = settings(&[("STORAGE_TYPE", "postgres"), ("STORAGE_URL", "  ")]);
        assert_eq!(settings.kind, BackendKind::Json);
        assert_eq!(settings.url, "data");
    }

    #[test]
    fn directory_url_gets_database_file() {
        let settings = StorageSettings::sqlite("store");
        assert_eq!(settings.database_path(), PathBuf::from("store").join("expenses.db"));
    }
}
