use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
}

/// Where the snapshot files live.
#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub dir: String,
}

impl DataConfig {
    pub fn flights_path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join("flights.json")
    }

    pub fn passengers_path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join("passengers.json")
    }

    pub fn bookings_path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join("bookings.json")
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Layers `default`, the RUN_MODE file, `local`, and `GATEWING__`
    /// environment variables, later sources overriding earlier ones.
    pub fn load_from(config_dir: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let config_dir = config_dir.as_ref();

        let s = config::Config::builder()
            .add_source(config::File::from(config_dir.join("default")))
            // Environment-specific file is optional
            .add_source(config::File::from(config_dir.join(&run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::from(config_dir.join("local")).required(false))
            // Eg. GATEWING__DATA__DIR=/var/lib/gatewing
            .add_source(config::Environment::with_prefix("GATEWING").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
