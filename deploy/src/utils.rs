use anyhow::{anyhow, bail, Context, Result};
use ethers::{
    abi::{
        token::{LenientTokenizer, Tokenizer},
        Abi, Token,
    },
    signers::LocalWallet,
    types::U256,
    utils::hex,
};

/// Length in bytes of a secp256k1 private key
const PRIVATE_KEY_LEN: usize = 32;

pub fn parse_wallet(sk: &str) -> Result<LocalWallet> {
    let bytes = hex::decode(sk.strip_prefix("0x").unwrap_or(sk))
        .map_err(|_| anyhow!("private key format error"))?;
    if bytes.len() != PRIVATE_KEY_LEN {
        bail!("private key format error");
    }
    Ok(LocalWallet::from_bytes(&bytes)?)
}

pub fn parse_chain_id(chain_id: U256) -> Result<u64> {
    u64::try_from(chain_id).map_err(|_| anyhow!("chain id {} does not fit in u64", chain_id))
}

/// Encodes literal constructor arguments against the constructor parameter
/// types declared in `abi`.
pub fn constructor_tokens(abi: &Abi, args: &[&str]) -> Result<Vec<Token>> {
    let inputs = abi
        .constructor()
        .map(|c| c.inputs.as_slice())
        .unwrap_or_default();
    if inputs.len() != args.len() {
        bail!(
            "constructor expects {} arguments, got {}",
            inputs.len(),
            args.len()
        );
    }

    inputs
        .iter()
        .zip(args)
        .map(|(param, value)| {
            LenientTokenizer::tokenize(&param.kind, value).with_context(|| {
                format!(
                    "invalid value {:?} for constructor parameter `{}` ({})",
                    value, param.name, param.kind
                )
            })
        })
        .collect()
}
