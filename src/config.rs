use std::fs;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::assemble::Assembler;
use crate::domain::ParsePolicy;
use crate::error::MicroarrayError;
use crate::store::{Store, default_data_dir};

pub const CONFIG_FILE: &str = "microarray.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    pub parse_policy: Option<ParsePolicy>,
    #[serde(default)]
    pub verify_probe_ids: Option<bool>,
    #[serde(default)]
    pub parallel: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data_dir: Utf8PathBuf,
    pub parse_policy: ParsePolicy,
    pub verify_probe_ids: bool,
    pub parallel: bool,
}

impl ResolvedConfig {
    pub fn store(&self) -> Store {
        Store::new_with_root(self.data_dir.clone())
    }

    pub fn assembler(&self) -> Assembler {
        Assembler::new()
            .with_policy(self.parse_policy)
            .with_probe_verification(self.verify_probe_ids)
            .with_parallel(self.parallel)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, MicroarrayError> {
        let config_path = match path {
            Some(path) => Utf8PathBuf::from(path),
            None => Utf8PathBuf::from(CONFIG_FILE),
        };

        if path.is_none() && !config_path.as_std_path().exists() {
            return Err(MicroarrayError::MissingConfig);
        }

        let content = fs::read_to_string(config_path.as_std_path())
            .map_err(|_| MicroarrayError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| MicroarrayError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, MicroarrayError> {
        let data_dir = match config.data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        Ok(ResolvedConfig {
            data_dir,
            parse_policy: config.parse_policy.unwrap_or_default(),
            verify_probe_ids: config.verify_probe_ids.unwrap_or(false),
            parallel: config.parallel.unwrap_or(false),
        })
    }
}
