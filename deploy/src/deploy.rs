use std::{io::Write, path::PathBuf, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use ethers::{
    contract::ContractFactory,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::H160,
    utils::to_checksum,
};

use crate::{
    constants::{CONSTRUCTOR_ARGS, EXIT_FAILURE, EXIT_SUCCESS},
    contracts::{Artifacts, Blueprint},
    utils::{constructor_tokens, parse_chain_id, parse_wallet},
};

/// Blueprint lookup and deployment submission on some network.
#[async_trait]
pub trait ContractDeployer {
    async fn get_contract_factory(&self, name: &str) -> Result<Blueprint>;

    /// Deploys `blueprint` with `args` and returns the address once the
    /// deployment is confirmed.
    async fn deploy(&self, blueprint: &Blueprint, args: &[&str]) -> Result<H160>;
}

pub struct Deploy {
    client: Arc<SignerMiddleware<Provider<Http>, LocalWallet>>,
    artifacts: Artifacts,
    confirmations: usize,
    legacy: bool,
}

impl Deploy {
    pub async fn new(
        rpc: &str,
        sk: &str,
        artifacts: impl Into<PathBuf>,
        confirmations: usize,
        legacy: bool,
    ) -> Result<Self> {
        let wallet = parse_wallet(sk)?;
        let provider = Provider::<Http>::try_from(rpc)?;

        let chain_id = parse_chain_id(provider.get_chainid().await?)?;
        log::info!("deployer {:?} on chain {}", wallet.address(), chain_id);

        let client = Arc::new(SignerMiddleware::new(
            provider,
            wallet.with_chain_id(chain_id),
        ));

        Ok(Self {
            client,
            artifacts: Artifacts::new(artifacts),
            confirmations,
            legacy,
        })
    }
}

#[async_trait]
impl ContractDeployer for Deploy {
    async fn get_contract_factory(&self, name: &str) -> Result<Blueprint> {
        self.artifacts.get_contract_factory(name)
    }

    async fn deploy(&self, blueprint: &Blueprint, args: &[&str]) -> Result<H160> {
        let tokens = constructor_tokens(&blueprint.abi, args)?;
        let factory = ContractFactory::new(
            blueprint.abi.clone(),
            blueprint.bytecode.clone(),
            self.client.clone(),
        );

        let mut deployer = factory
            .deploy_tokens(tokens)?
            .confirmations(self.confirmations);
        if self.legacy {
            deployer = deployer.legacy();
        }

        let (contract, receipt) = deployer.send_with_receipt().await?;
        log::info!(
            "{}:{} deployment transaction hash:{:?} gas used:{:?}",
            blueprint.source_name,
            blueprint.contract_name,
            receipt.transaction_hash,
            receipt.gas_used
        );
        Ok(contract.address())
    }
}

/// Resolves `contract`, deploys it with the fixed constructor arguments and
/// prints the resulting address to `out`.
pub async fn run<D>(deployer: &D, contract: &str, out: &mut impl Write) -> Result<H160>
where
    D: ContractDeployer + Sync,
{
    let blueprint = deployer.get_contract_factory(contract).await?;
    let address = deployer.deploy(&blueprint, &CONSTRUCTOR_ARGS).await?;
    writeln!(out, "Contract deployed to: {}", to_checksum(&address, None))?;
    Ok(address)
}

/// Maps the outcome of a run to the process exit status, printing the error
/// chain to `err` on failure.
pub fn exit_status<T>(result: Result<T>, err: &mut impl Write) -> u8 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            log::debug!("deployment failed: {}", e);
            let _ = writeln!(err, "{:?}", e);
            EXIT_FAILURE
        }
    }
}
