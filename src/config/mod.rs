use crate::core::calculator::classifier::HourThresholds;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_full_day_hours")]
    pub full_day_hours: f64,
    #[serde(default = "default_half_day_hours")]
    pub half_day_hours: f64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_full_day_hours() -> f64 {
    8.0
}
fn default_half_day_hours() -> f64 {
    4.0
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            full_day_hours: default_full_day_hours(),
            half_day_hours: default_half_day_hours(),
            log_level: default_log_level(),
        }
    }

    /// `~/.marketops`, or `./.marketops` when no home directory is known.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".marketops")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("marketops.conf")
    }

    /// Return the full path of the default SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("marketops.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.half_day_hours <= 0.0 || self.full_day_hours <= self.half_day_hours {
            return Err(AppError::Config(format!(
                "expected 0 < half_day_hours < full_day_hours, got {} and {}",
                self.half_day_hours, self.full_day_hours
            )));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> HourThresholds {
        HourThresholds {
            full_day: self.full_day_hours,
            half_day: self.half_day_hours,
        }
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create the config directory and file (unless `is_test`), returning
    /// the database path to initialize.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<String> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Self::with_database(db_path.clone());
            fs::write(Self::config_file(), config.to_yaml()?)?;
        } else if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(db_path.to_string_lossy().to_string())
    }
}
