//! Call configuration: a JSON file whose fields can each be overridden by a
//! command-line flag

use anyhow::{Context, Result};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub abi: Option<PathBuf>,
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
}

/// Values given on the command line; they take precedence over the file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub address: Option<String>,
    pub abi: Option<PathBuf>,
    pub rpc_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallConfig {
    pub address: Address,
    pub abi: PathBuf,
    pub rpc_url: String,
    pub poll_interval: Duration,
}

/// Reads a config file. A relative `abi` path is resolved against the
/// file's directory.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let content =
        std::fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
    let mut config: FileConfig =
        serde_json::from_str(&content).context("Failed to parse config JSON")?;

    if let (Some(abi), Some(dir)) = (config.abi.as_mut(), path.parent()) {
        if abi.is_relative() {
            *abi = dir.join(&*abi);
        }
    }
    Ok(config)
}

impl CallConfig {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let address = overrides
            .address
            .or(file.address)
            .context("No contract address given (use --address or the config file)")?;
        let abi = overrides
            .abi
            .or(file.abi)
            .context("No ABI file given (use --abi or the config file)")?;
        let rpc_url = overrides
            .rpc_url
            .or(file.rpc_url)
            .context("No RPC endpoint given (use --rpc-url or the config file)")?;
        let poll_interval_ms = overrides
            .poll_interval_ms
            .or(file.poll_interval_ms)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        Ok(Self {
            address: parse_address(&address)?,
            abi,
            rpc_url,
            poll_interval: Duration::from_millis(poll_interval_ms),
        })
    }
}

/// Parses a contract address, enforcing the checksum on mixed-case input.
pub fn parse_address(text: &str) -> Result<Address> {
    let text = text.trim();
    abiconsole_abi::parse_address(text).context(format!("Invalid contract address: {}", text))
}
