//! CLI settings: flags, then `PATHPAY_DATA_DIR`, then a YAML config file.
//!
//! ```yaml
//! data_dir: /var/lib/pathpay
//! category: mortgage
//! repayment_frequency: biweekly
//! amortization_method: equalPrincipalPayment
//! ```

use log::debug;
use pathpay_core::amortization::{AmortizationMethod, RepaymentFrequency};
use pathpay_core::forms::LoanCategory;
use pathpay_core::storage::{CompareStore, FileStore, HistoryStore};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub category: Option<LoanCategory>,
    pub repayment_frequency: Option<RepaymentFrequency>,
    pub amortization_method: Option<AmortizationMethod>,
}

impl Config {
    /// Load `explicit`, or the per-user config file when it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.is_file() => p,
                _ => return Ok(Config::default()),
            },
        };

        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        let config: Config = serde_yaml::from_str(&raw)
            .map_err(|e| format!("Failed to parse config '{}': {}", path.display(), e))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".config").join("pathpay").join("config.yaml"))
}

/// Resolved runtime settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub data_dir: PathBuf,
}

impl Context {
    /// `flag` already carries `PATHPAY_DATA_DIR` when clap found it in the environment.
    pub fn resolve(flag: Option<PathBuf>, config: Config) -> Result<Context, Box<dyn std::error::Error>> {
        let data_dir = match flag.or_else(|| config.data_dir.clone()) {
            Some(dir) => dir,
            None => home_dir()
                .map(|h| h.join(".local").join("share").join("pathpay"))
                .ok_or("No data directory: pass --data-dir, set PATHPAY_DATA_DIR or HOME")?,
        };
        debug!("data directory: {}", data_dir.display());
        Ok(Context { config, data_dir })
    }

    pub fn history(&self) -> HistoryStore<FileStore> {
        HistoryStore::new(FileStore::new(&self.data_dir))
    }

    pub fn compare(&self) -> CompareStore<FileStore> {
        CompareStore::new(FileStore::new(&self.data_dir))
    }
}
