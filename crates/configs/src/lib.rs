use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

pub const DEFAULT_STORAGE_KEY: &str = "rb-passenger-templates";
pub const DEFAULT_DATA_FILE: &str = "data/passengers.json";
pub const DEFAULT_UNNAMED_PASSENGER: &str = "Пассажир";
pub const DEFAULT_NEW_PASSENGER: &str = "Новый пассажир";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub labels: LabelsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Key under which the whole passenger list is stored.
    #[serde(default = "default_key")]
    pub key: String,
    /// File backing the persistent storage area.
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { key: default_key(), data_file: default_data_file() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LabelsConfig {
    #[serde(default = "default_unnamed_passenger")]
    pub unnamed_passenger: String,
    #[serde(default = "default_new_passenger")]
    pub new_passenger: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self { unnamed_passenger: default_unnamed_passenger(), new_passenger: default_new_passenger() }
    }
}

fn default_key() -> String { DEFAULT_STORAGE_KEY.into() }
fn default_data_file() -> String { DEFAULT_DATA_FILE.into() }
fn default_unnamed_passenger() -> String { DEFAULT_UNNAMED_PASSENGER.into() }
fn default_new_passenger() -> String { DEFAULT_NEW_PASSENGER.into() }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like [`AppConfig::load_and_validate`], but a missing config file yields defaults.
    pub fn load_or_default() -> Result<Self> {
        let path = config_path();
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize_from_env();
        self.storage.normalize()?;
        self.labels.normalize();
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        // PASSENGERS_DATA_FILE wins over the TOML value
        if let Ok(file) = std::env::var("PASSENGERS_DATA_FILE") {
            if !file.trim().is_empty() {
                self.data_file = file;
            }
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.key.trim().is_empty() {
            self.key = default_key();
        }
        if self.data_file.trim().is_empty() {
            return Err(anyhow!("storage.data_file is empty; set it in config.toml or PASSENGERS_DATA_FILE"));
        }
        Ok(())
    }
}

impl LabelsConfig {
    fn normalize(&mut self) {
        if self.unnamed_passenger.trim().is_empty() {
            self.unnamed_passenger = default_unnamed_passenger();
        }
        if self.new_passenger.trim().is_empty() {
            self.new_passenger = default_new_passenger();
        }
    }
}
