use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Environment variable holding the SMTP password (never stored in the config file).
pub const SMTP_PASSWORD_ENV: &str = "ROVERTIME_SMTP_PASSWORD";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Fixed organizational UTC offset used for end instants and naive timestamps.
    /// No daylight-saving adjustment is applied.
    #[serde(default = "default_org_offset")]
    pub organization_utc_offset_hours: i32,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub sender_email: String,
    #[serde(default = "default_smtp_timeout")]
    pub smtp_timeout_secs: u64,
    #[serde(default = "default_busy_timeout")]
    pub db_busy_timeout_ms: u64,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

fn default_org_offset() -> i32 {
    2
}
fn default_smtp_host() -> String {
    "smtp-mail.outlook.com".to_string()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_smtp_timeout() -> u64 {
    30
}
fn default_busy_timeout() -> u64 {
    5000
}
fn default_server_port() -> u16 {
    8001
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
            organization_utc_offset_hours: default_org_offset(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            sender_email: String::new(),
            smtp_timeout_secs: default_smtp_timeout(),
            db_busy_timeout_ms: default_busy_timeout(),
            server_port: default_server_port(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rovertime")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".rovertime")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rovertime.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rovertime.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content).map_err(|e| {
                AppError::Config(format!("cannot parse {}: {}", path.display(), e))
            })
        } else {
            Ok(Config::default())
        }
    }

    /// SMTP password from the environment, if set.
    pub fn smtp_password() -> Option<String> {
        env::var(SMTP_PASSWORD_ENV).ok().filter(|p| !p.is_empty())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            crate::utils::path::resolve_under(&dir, &name)
        } else {
            dir.join("rovertime.sqlite")
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config::with_database(db_path.clone());
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
