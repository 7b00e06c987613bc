use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The set of chains the indexer knows how to normalize records for.
///
/// Adding a chain means adding one variant here plus, per record kind, either
/// reusing a base parser or supplying a chain-specific subclass (see
/// `indexer_parsers`). The compiler enforces exhaustiveness on both the
/// [`ChainType::family`] match below and every parser dispatch match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainType {
    /// Arbitrum One and its testnets.
    Arbitrum,
    /// Cronos zkEVM, an L2 on the ZKsync stack.
    CronosZkevm,
    /// Ethereum mainnet and its testnets.
    Ethereum,
    /// ZKsync's "Zero" network.
    Zero,
    /// ZKsync Era mainnet.
    Zksync,
    /// ZKsync Era Sepolia testnet.
    ZksyncSepolia,
}

/// The record shape a [`ChainType`] normalizes to.
///
/// Several `ChainType` variants share a wire format and therefore a parser
/// implementation; `family` is the many-to-one map from chain to shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainFamily {
    /// Arbitrum-shaped blocks, transactions, and logs.
    Arbitrum,
    /// Ethereum-shaped blocks, transactions, and logs.
    Ethereum,
    /// ZKsync-shaped blocks, transactions, and logs (also used by Cronos
    /// zkEVM, Zero, and ZKsync Sepolia).
    ZkSync,
}

impl ChainType {
    /// Returns the record family this chain normalizes to.
    pub const fn family(&self) -> ChainFamily {
        match self {
            Self::Arbitrum => ChainFamily::Arbitrum,
            Self::Ethereum => ChainFamily::Ethereum,
            Self::CronosZkevm | Self::Zero | Self::Zksync | Self::ZksyncSepolia => {
                ChainFamily::ZkSync
            }
        }
    }

    /// The canonical lowercase-ascii name used in config files, metrics
    /// labels, and dataset directory names.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Arbitrum => "arbitrum",
            Self::CronosZkevm => "cronos_zkevm",
            Self::Ethereum => "ethereum",
            Self::Zero => "zero",
            Self::Zksync => "zksync",
            Self::ZksyncSepolia => "zksync_sepolia",
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a config file names a chain this indexer does not recognize.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized chain name: {0}")]
pub struct UnknownChainType(pub String);

impl FromStr for ChainType {
    type Err = UnknownChainType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arbitrum" => Ok(Self::Arbitrum),
            "cronos_zkevm" => Ok(Self::CronosZkevm),
            "ethereum" => Ok(Self::Ethereum),
            "zero" => Ok(Self::Zero),
            "zksync" => Ok(Self::Zksync),
            "zksync_sepolia" => Ok(Self::ZksyncSepolia),
            other => Err(UnknownChainType(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_variant_through_its_canonical_name() {
        let variants = [
            ChainType::Arbitrum,
            ChainType::CronosZkevm,
            ChainType::Ethereum,
            ChainType::Zero,
            ChainType::Zksync,
            ChainType::ZksyncSepolia,
        ];
        for chain in variants {
            assert_eq!(chain.as_str().parse::<ChainType>().unwrap(), chain);
        }
    }

    #[test]
    fn zksync_like_chains_share_the_zksync_family() {
        assert_eq!(ChainType::Zksync.family(), ChainFamily::ZkSync);
        assert_eq!(ChainType::ZksyncSepolia.family(), ChainFamily::ZkSync);
        assert_eq!(ChainType::Zero.family(), ChainFamily::ZkSync);
        assert_eq!(ChainType::CronosZkevm.family(), ChainFamily::ZkSync);
    }

    #[test]
    fn rejects_unknown_chain_name() {
        assert!("optimism".parse::<ChainType>().is_err());
    }
}
