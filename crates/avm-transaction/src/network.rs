//! Network parameters needed to build transactions.
//!
//! Presets cover mainnet, Fuji and a local network; anything else can be
//! loaded from JSON with [`NetworkConfig::from_json`].

use avm_primitives::Id;
use serde::{Deserialize, Serialize};

use crate::constants::CodecId;
use crate::error::{Result, TransactionError};

/// Mainnet network ID.
pub const MAINNET_ID: u32 = 1;
/// Fuji testnet network ID.
pub const FUJI_ID: u32 = 5;
/// Default local network ID.
pub const LOCAL_ID: u32 = 12345;

/// Default fee burned by a transfer, in nAVAX.
pub const DEFAULT_TX_FEE: u64 = 1_000_000;
/// Default fee burned when creating an asset, in nAVAX.
pub const DEFAULT_CREATION_TX_FEE: u64 = 10_000_000;

/// Map a network ID to its bech32 human-readable part.
pub fn hrp_for_network_id(network_id: u32) -> &'static str {
    match network_id {
        1 => "avax",
        2 => "cascade",
        3 => "denali",
        4 => "everest",
        5 => "fuji",
        12345 => "local",
        _ => "custom",
    }
}

/// Parameters of one network's X-chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network_id: u32,
    pub hrp: String,
    pub x_chain_id: Id,
    pub avax_asset_id: Id,
    #[serde(default = "default_tx_fee")]
    pub tx_fee: u64,
    #[serde(default = "default_creation_tx_fee")]
    pub creation_tx_fee: u64,
}

fn default_tx_fee() -> u64 {
    DEFAULT_TX_FEE
}

fn default_creation_tx_fee() -> u64 {
    DEFAULT_CREATION_TX_FEE
}

impl NetworkConfig {
    fn preset(network_id: u32, x_chain_id: &str, avax_asset_id: &str) -> Result<Self> {
        Ok(NetworkConfig {
            network_id,
            hrp: hrp_for_network_id(network_id).to_string(),
            x_chain_id: x_chain_id.parse()?,
            avax_asset_id: avax_asset_id.parse()?,
            tx_fee: DEFAULT_TX_FEE,
            creation_tx_fee: DEFAULT_CREATION_TX_FEE,
        })
    }

    /// Mainnet (network 1).
    pub fn mainnet() -> Result<Self> {
        Self::preset(
            MAINNET_ID,
            "2oYMBNV4eNHyqk2fjjV5nVQLDbtmNJzq5s3qs3Lo6ftnC6FByM",
            "FvwEAhmxKfeiG8SnEvq42hc6whRyY3EFYAvebMqDNDGCgxN5Z",
        )
    }

    /// Fuji testnet (network 5).
    pub fn fuji() -> Result<Self> {
        Self::preset(
            FUJI_ID,
            "2JVSBoinj9C2J33VntvzYtVJNZdN2NKiwwKjcumHUWEb5DbBrm",
            "U8iRqJoiJm8xZHAacmvYyZVwqQx6uDNtQeP3CQ6fcgQk3JqnK",
        )
    }

    /// Local network (network 12345).
    pub fn local() -> Result<Self> {
        Self::preset(
            LOCAL_ID,
            "2eNy1mUFdmaxXNj1eQHUe7Np4gju9sJsEtWQ4MX3ToiNKuADed",
            "2fombhL7aGPwj3KH4bfrmJwW6PVnMobf9Y2fn9GwxiAAJyFDbe",
        )
    }

    /// The preset for a well-known network ID.
    ///
    /// # Returns
    /// `Config` error for IDs without a preset.
    pub fn for_network_id(network_id: u32) -> Result<Self> {
        match network_id {
            MAINNET_ID => Self::mainnet(),
            FUJI_ID => Self::fuji(),
            LOCAL_ID => Self::local(),
            other => Err(TransactionError::Config(format!(
                "no preset for network id {}",
                other
            ))),
        }
    }

    /// Load a configuration from JSON.
    ///
    /// Fees default to the standard values when omitted.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TransactionError::Config(e.to_string()))
    }

    /// Build context targeting this network's X-chain.
    pub fn context(&self) -> BuildContext {
        BuildContext {
            network_id: self.network_id,
            blockchain_id: self.x_chain_id,
            codec_id: CodecId::Zero,
        }
    }
}

/// Where a built transaction is headed and which codec it uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildContext {
    pub network_id: u32,
    pub blockchain_id: Id,
    pub codec_id: CodecId,
}

impl BuildContext {
    /// Context with codec 0.
    pub fn new(network_id: u32, blockchain_id: Id) -> Self {
        BuildContext {
            network_id,
            blockchain_id,
            codec_id: CodecId::Zero,
        }
    }

    /// Same context under another codec.
    pub fn with_codec(mut self, codec_id: CodecId) -> Self {
        self.codec_id = codec_id;
        self
    }
}
