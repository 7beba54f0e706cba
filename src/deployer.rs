//! Contract deployment against a JSON-RPC endpoint.

use std::path::PathBuf;

use alloy::{
    dyn_abi::DynSolValue,
    network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
    primitives::{Address, B256, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::eth::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use eyre::{bail, Context, ContextCompat};
use owo_colors::OwoColorize;
use tokio::runtime::Builder;

use crate::{
    artifact::Artifact,
    config::Deploy,
    constants::Network,
    formatting::{format_gas, format_wait},
};

/// Runs the `deploy` command.
pub fn deploy(config: &Deploy) -> eyre::Result<()> {
    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(deploy_impl(config))
}

async fn deploy_impl(config: &Deploy) -> eyre::Result<()> {
    let signer = config.auth.signer()?;
    let artifact = Artifact::load(&config.artifacts, &config.contract)?;
    let args = artifact.coerce_args(&config.args)?;

    let factory = RpcFactory::new(
        config.endpoint.as_str(),
        signer,
        config.artifacts.clone(),
        config.network,
    );

    let parameters = config.network.config();
    println!("deploying to RPC: {}", &config.endpoint.bright_magenta());
    println!(
        "waiting for {}",
        format_wait(parameters.confirmations, parameters.block_time)
    );

    let contract = deploy_contract(&factory, &config.contract, &args).await?;

    println!("deployed code: {}", contract.address.bright_purple());
    println!(
        "deployment tx hash: {}",
        contract.transaction_hash.bright_magenta()
    );
    println!("deployed with {}", format_gas(contract.gas_used));

    Ok(())
}

/// Handle to a contract deployed through a [`ContractFactory`].
#[derive(Debug, Clone)]
pub struct DeployedContract {
    /// Name the contract was deployed under.
    pub name: String,
    /// Address the network assigned to the contract.
    pub address: Address,
    /// Hash of the deployment transaction.
    pub transaction_hash: B256,
    /// Gas spent by the deployment transaction.
    pub gas_used: U256,
}

/// Turns contract names into deployed contracts.
///
/// Implementations resolve the name to deployable code, submit the deployment
/// transaction and wait for it to be confirmed. Every failure along the way
/// surfaces in the returned result.
#[allow(async_fn_in_trait)]
pub trait ContractFactory {
    /// Deploys the named contract with the given constructor arguments.
    async fn deploy(&self, name: &str, args: &[DynSolValue])
        -> eyre::Result<DeployedContract>;
}

/// Deploys `name` through `factory` and returns the deployed handle.
///
/// Failures propagate to the caller: an unresolvable name, a rejected
/// transaction and a failed confirmation all fail the deploy. There is no
/// retry; calling this twice submits two independent transactions.
pub async fn deploy_contract<F>(
    factory: &F,
    name: &str,
    args: &[DynSolValue],
) -> eyre::Result<DeployedContract>
where
    F: ContractFactory,
{
    factory
        .deploy(name, args)
        .await
        .wrap_err_with(|| format!("failed to deploy {name}"))
}

/// [`ContractFactory`] bound to a JSON-RPC endpoint and a signing key.
///
/// Contract names are resolved against a directory of compiled artifacts.
pub struct RpcFactory {
    endpoint: String,
    signer: PrivateKeySigner,
    artifacts: PathBuf,
    network: Network,
}

impl RpcFactory {
    pub fn new(
        endpoint: impl Into<String>,
        signer: PrivateKeySigner,
        artifacts: impl Into<PathBuf>,
        network: Network,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            signer,
            artifacts: artifacts.into(),
            network,
        }
    }
}

impl ContractFactory for RpcFactory {
    async fn deploy(
        &self,
        name: &str,
        args: &[DynSolValue],
    ) -> eyre::Result<DeployedContract> {
        let artifact = Artifact::load(&self.artifacts, name)?;
        let init_code = artifact.init_code(args)?;

        let rpc_url = self.endpoint.parse()?;
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(EthereumWallet::from(self.signer.clone()))
            .on_http(rpc_url);

        let config = self.network.config();
        let chain_id = provider.get_chain_id().await?;
        if chain_id != config.chain_id {
            bail!(
                "endpoint serves chain id {chain_id}, expected {} for {}",
                config.chain_id,
                self.network,
            );
        }

        let tx = TransactionRequest::default()
            .into_create()
            .with_input(init_code);
        let receipt = provider
            .send_transaction(tx)
            .await?
            .with_required_confirmations(config.confirmations)
            .get_receipt()
            .await?;
        let address = receipt
            .contract_address()
            .wrap_err("failed to read contract address from tx receipt")?;

        Ok(DeployedContract {
            name: name.to_owned(),
            address,
            transaction_hash: receipt.transaction_hash,
            gas_used: U256::from(receipt.gas_used),
        })
    }
}
