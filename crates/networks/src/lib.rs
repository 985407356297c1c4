//! Static network registry consumed by the wallet session.
//!
//! The session never constructs network data itself: it resolves the chain id
//! reported by the provider against this registry and falls back to
//! [`Network::Unknown`] for anything unmapped.

use std::{env, fmt, str::FromStr};

use alloy_primitives::ChainId;
use serde::{Deserialize, Serialize};

/// Environment variable used by [`Networks::from_env`] to pick the current
/// network.
pub const NETWORK_ENV_VAR: &str = "HEARTH_NETWORK";

/// Identifier of a supported network.
///
/// `Unknown` is a sentinel for chain ids the registry has no entry for; it is
/// never an error to encounter one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Unknown,
}

impl Network {
    /// The chain id the provider reports for this network, if it has one.
    pub const fn chain_id(&self) -> Option<ChainId> {
        match self {
            Self::Mainnet => Some(30),
            Self::Testnet => Some(31),
            Self::Unknown => None,
        }
    }

    /// Resolves a provider-reported chain id, falling back to `Unknown`.
    pub const fn from_chain_id(chain_id: ChainId) -> Self {
        match chain_id {
            30 => Self::Mainnet,
            31 => Self::Testnet,
            _ => Self::Unknown,
        }
    }

    /// Static metadata for this network, `None` for `Unknown`.
    pub const fn metadata(&self) -> Option<&'static NetworkMetadata> {
        match self {
            Self::Mainnet => Some(&MAINNET),
            Self::Testnet => Some(&TESTNET),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(ParseNetworkError(other.to_string())),
        }
    }
}

/// The string did not name a selectable network.
///
/// `unknown` is intentionally not parseable: it exists only as a resolution
/// fallback, not as something to run against.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a known network (expected `mainnet` or `testnet`)")]
pub struct ParseNetworkError(String);

/// Static, read-only description of a network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NetworkMetadata {
    pub network: Network,
    pub name: &'static str,
    pub chain_id: ChainId,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    /// Symbol of the chain's native currency.
    pub native_symbol: &'static str,
    pub native_decimals: u8,
}

/// Rootstock mainnet.
pub const MAINNET: NetworkMetadata = NetworkMetadata {
    network: Network::Mainnet,
    name: "RSK Mainnet",
    chain_id: 30,
    rpc_url: "https://public-node.rsk.co",
    explorer_url: "https://explorer.rsk.co",
    native_symbol: "RBTC",
    native_decimals: 18,
};

/// Rootstock testnet.
pub const TESTNET: NetworkMetadata = NetworkMetadata {
    network: Network::Testnet,
    name: "RSK Testnet",
    chain_id: 31,
    rpc_url: "https://public-node.testnet.rsk.co",
    explorer_url: "https://explorer.testnet.rsk.co",
    native_symbol: "tRBTC",
    native_decimals: 18,
};

/// Registry handle: the configured current network plus chain-id resolution.
///
/// Cheap to copy around; the actual tables are static.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Networks {
    current: Network,
}

impl Networks {
    /// A registry whose current network is `current`.
    pub const fn new(current: Network) -> Self {
        Self { current }
    }

    /// Reads the current network from [`NETWORK_ENV_VAR`], defaulting to
    /// mainnet when the variable is unset.
    pub fn from_env() -> Result<Self, ParseNetworkError> {
        match env::var(NETWORK_ENV_VAR) {
            Ok(raw) => raw.parse().map(Self::new),
            Err(_) => Ok(Self::new(Network::Mainnet)),
        }
    }

    /// The configured current network.
    pub const fn current(&self) -> Network {
        self.current
    }

    /// Metadata for the configured current network.
    pub const fn current_metadata(&self) -> Option<&'static NetworkMetadata> {
        self.current.metadata()
    }

    /// Resolves a provider-reported chain id against the registry.
    pub const fn by_chain_id(&self, chain_id: ChainId) -> Network {
        Network::from_chain_id(chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_chain_ids() {
        assert_eq!(Network::from_chain_id(30), Network::Mainnet);
        assert_eq!(Network::from_chain_id(31), Network::Testnet);
    }

    #[test]
    fn unmapped_chain_id_is_unknown() {
        assert_eq!(Network::from_chain_id(1), Network::Unknown);
        assert_eq!(Network::from_chain_id(u64::MAX), Network::Unknown);
    }

    #[test]
    fn chain_id_roundtrip() {
        for network in [Network::Mainnet, Network::Testnet] {
            let id = network.chain_id().unwrap();
            assert_eq!(Network::from_chain_id(id), network);
        }
        assert_eq!(Network::Unknown.chain_id(), None);
    }

    #[test]
    fn parses_network_names() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!(" Testnet ".parse::<Network>().unwrap(), Network::Testnet);
        assert!("unknown".parse::<Network>().is_err());
        assert!("ropsten".parse::<Network>().is_err());
    }

    #[test]
    fn registry_resolution() {
        let networks = Networks::new(Network::Testnet);
        assert_eq!(networks.current(), Network::Testnet);
        assert_eq!(networks.by_chain_id(30), Network::Mainnet);
        assert_eq!(networks.by_chain_id(5), Network::Unknown);
        assert_eq!(networks.current_metadata().unwrap().native_symbol, "tRBTC");
    }

    #[test]
    fn metadata_chain_ids_match_enum() {
        assert_eq!(MAINNET.chain_id, Network::Mainnet.chain_id().unwrap());
        assert_eq!(TESTNET.chain_id, Network::Testnet.chain_id().unwrap());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Network::Mainnet).unwrap(), "\"mainnet\"");
        assert_eq!(serde_json::from_str::<Network>("\"testnet\"").unwrap(), Network::Testnet);
    }
}
