//! Network parameters and access-control role identifiers used by the
//! deployment tooling.

use std::fmt::{self, Display};

use clap::ValueEnum;

/// Chain parameters of a supported network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Confirmations to wait for before treating a transaction as final.
    pub confirmations: u64,
    /// Expected block production interval, in seconds.
    pub block_time: u64,
}

/// Ethereum mainnet.
pub const MAINNET: NetworkConfig = NetworkConfig {
    chain_id: 1,
    confirmations: 6,
    block_time: 12,
};

/// The Flare main network.
pub const FLARE: NetworkConfig = NetworkConfig {
    chain_id: 14,
    confirmations: 2,
    block_time: 3,
};

/// Songbird, Flare's canary network.
pub const SONGBIRD: NetworkConfig = NetworkConfig {
    chain_id: 19,
    confirmations: 2,
    block_time: 3,
};

/// The networks the tooling can deploy to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Network {
    Mainnet,
    Flare,
    Songbird,
}

impl Network {
    /// Chain parameters of this network.
    pub const fn config(self) -> &'static NetworkConfig {
        match self {
            Network::Mainnet => &MAINNET,
            Network::Flare => &FLARE,
            Network::Songbird => &SONGBIRD,
        }
    }

    /// The supported network with the given chain id, if any.
    pub fn from_chain_id(chain_id: u64) -> Option<Network> {
        [Network::Mainnet, Network::Flare, Network::Songbird]
            .into_iter()
            .find(|network| network.config().chain_id == chain_id)
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Flare => write!(f, "flare"),
            Network::Songbird => write!(f, "songbird"),
        }
    }
}

/// Identifier of the default admin role.
pub const ADMIN_ROLE: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Identifier of the minter role.
pub const MINTER_ROLE: &str =
    "0x9f2df0fed2c77648de5860a4cc508cd0818c85b8b8a1ab4ceeef8d981c8956a6";

/// Identifier of the executor role.
pub const EXECUTOR_ROLE: &str =
    "0x7df25b80a735481726715f23762c442a7a5dd1f57687a1a58c213f5c7af0717b";

/// Identifier of the slasher role.
pub const SLASHER_ROLE: &str =
    "0x7df25b80a735481726715f23762c442a7a5dd1f57687a1a58c213f5c7af0717c";

/// Access-control roles recognized by the deployed contracts.
///
/// The identifiers are opaque `bytes32` values matching the ones compiled
/// into the contracts; the tooling forwards them without interpreting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Minter,
    Executor,
    Slasher,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Minter, Role::Executor, Role::Slasher];

    /// The identifier the contracts use for this role.
    pub const fn identifier(self) -> &'static str {
        match self {
            Role::Admin => ADMIN_ROLE,
            Role::Minter => MINTER_ROLE,
            Role::Executor => EXECUTOR_ROLE,
            Role::Slasher => SLASHER_ROLE,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Minter => write!(f, "minter"),
            Role::Executor => write!(f, "executor"),
            Role::Slasher => write!(f, "slasher"),
        }
    }
}
