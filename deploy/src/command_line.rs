use std::{io::Write, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use ethers::types::H160;

use crate::{
    constants::DEFAULT_CONTRACT_NAME,
    deploy::{self, Deploy},
};

/// Deploys the token contract with its fixed constructor arguments.
#[derive(Debug, Parser)]
pub struct CommandLine {
    /// JSON-RPC endpoint of the target network
    #[clap(short, long, env = "DEPLOY_RPC_URL", default_value = "http://127.0.0.1:8545")]
    rpc: String,

    /// Hex encoded private key of the deployer
    #[clap(long, env = "DEPLOYER_PRIVATE_KEY", hide_env_values = true)]
    sk: String,

    /// Directory holding the compiled contract artifacts
    #[clap(short, long, env = "DEPLOY_ARTIFACTS", default_value = "artifacts")]
    artifacts: PathBuf,

    /// Name of the contract to deploy
    #[clap(short, long, env = "DEPLOY_CONTRACT", default_value = DEFAULT_CONTRACT_NAME)]
    contract: String,

    #[clap(long, env = "DEPLOY_CONFIRMATIONS", default_value_t = 1)]
    confirmations: usize,

    /// Send a legacy (pre EIP-1559) deployment transaction
    #[clap(long)]
    legacy: bool,
}

impl CommandLine {
    pub async fn execute(self, out: &mut impl Write) -> Result<H160> {
        let deployer = Deploy::new(
            &self.rpc,
            &self.sk,
            self.artifacts,
            self.confirmations,
            self.legacy,
        )
        .await?;
        deploy::run(&deployer, &self.contract, out).await
    }
}
