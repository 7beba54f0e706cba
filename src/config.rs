use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::constants::Network;

/// Main entrypoint to `flare-deploy`.
pub fn run() -> eyre::Result<()> {
    let config = Config::parse();
    config.command.run()
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Config {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(name = "deploy")]
    Deploy(Deploy),
    #[command(name = "verify")]
    Verify(Verify),
}

impl Commands {
    pub fn run(&self) -> eyre::Result<()> {
        match self {
            Commands::Deploy(command) => crate::deployer::deploy(command),
            Commands::Verify(command) => crate::verifier::verify(command),
        }
    }
}

/// Deploy a contract from its compiled artifact.
#[derive(Parser, Debug)]
pub struct Deploy {
    /// Name of the contract artifact to deploy.
    #[arg(long)]
    pub contract: String,
    /// Directory holding the compiled contract artifacts.
    #[arg(long, default_value = "artifacts")]
    pub artifacts: PathBuf,
    /// Constructor arguments, matched against the artifact ABI.
    #[arg(long)]
    pub args: Vec<String>,
    /// Network to deploy to.
    #[arg(long, value_enum)]
    pub network: Network,
    /// JSON-RPC endpoint of the network.
    #[arg(short, long)]
    pub endpoint: String,
    #[command(flatten)]
    pub auth: Auth,
}

/// Submit a deployed contract's source for verification.
#[derive(Parser, Debug)]
pub struct Verify {
    /// Address of the deployed contract.
    #[arg(long)]
    pub address: String,
    /// Name of the contract artifact it was deployed from.
    #[arg(long)]
    pub contract: String,
    /// Directory holding the compiled contract artifacts.
    #[arg(long, default_value = "artifacts")]
    pub artifacts: PathBuf,
    /// Constructor arguments the contract was deployed with.
    #[arg(long)]
    pub args: Vec<String>,
    /// Network the contract lives on.
    #[arg(long, value_enum)]
    pub network: Network,
    /// Verifier binary to drive.
    #[arg(long, default_value = "forge")]
    pub verifier: String,
    /// Explorer API endpoint, when not the verifier's default.
    #[arg(long)]
    pub verifier_url: Option<String>,
}

/// Signing key of the deployer.
#[derive(Args, Debug)]
pub struct Auth {
    /// Private key in plain hex.
    #[arg(long)]
    pub private_key: Option<String>,
    /// Path to a file holding the private key.
    #[arg(long)]
    pub private_key_file: Option<PathBuf>,
    /// Path to an encrypted keystore.
    #[arg(long)]
    pub keystore: Option<PathBuf>,
    /// Path to a file holding the keystore password.
    #[arg(long)]
    pub keystore_password_file: Option<PathBuf>,
}
