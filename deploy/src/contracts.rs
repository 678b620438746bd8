//! Lookup of compiled contract blueprints from an artifacts directory.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use ethers::{abi::Abi, types::Bytes, utils::hex};
use serde::Deserialize;

use crate::constants::BUILD_INFO_DIR;

/// A compiled contract ready to be handed to a contract factory.
#[derive(Debug, Clone)]
pub struct Blueprint {
    pub contract_name: String,
    pub source_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    contract_name: String,
    #[serde(default)]
    source_name: String,
    abi: Abi,
    bytecode: String,
    #[serde(default)]
    link_references: BTreeMap<String, serde_json::Value>,
}

pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the blueprint of `name`, failing when it is missing, ambiguous
    /// or not deployable as is.
    pub fn get_contract_factory(&self, name: &str) -> Result<Blueprint> {
        let mut candidates = Vec::new();
        collect_candidates(&self.root, &format!("{name}.json"), &mut candidates)
            .with_context(|| format!("failed to read artifacts under {:?}", self.root))?;

        let mut matches = Vec::new();
        for path in candidates {
            let artifact = read_artifact(&path)?;
            if artifact.contract_name == name {
                matches.push((path, artifact));
            }
        }

        let (path, artifact) = match matches.len() {
            0 => bail!(
                "artifact for contract `{}` not found under {:?}",
                name,
                self.root
            ),
            1 => matches.remove(0),
            _ => {
                let sources = matches
                    .iter()
                    .map(|(_, a)| format!("{}:{}", a.source_name, a.contract_name))
                    .collect::<Vec<_>>()
                    .join(", ");
                bail!(
                    "contract name `{}` is ambiguous, use one of: {}",
                    name,
                    sources
                )
            }
        };
        log::debug!("resolved {} from {:?}", name, path);

        into_blueprint(artifact, &path)
    }
}

fn collect_candidates(dir: &Path, file_name: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if path.file_name().is_some_and(|n| n == BUILD_INFO_DIR) {
                continue;
            }
            collect_candidates(&path, file_name, out)?;
        } else if path.file_name().is_some_and(|n| n == file_name) {
            out.push(path);
        }
    }
    Ok(())
}

fn read_artifact(path: &Path) -> Result<Artifact> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("malformed artifact {:?}", path))
}

fn into_blueprint(artifact: Artifact, path: &Path) -> Result<Blueprint> {
    if !artifact.link_references.is_empty() {
        let libraries = artifact
            .link_references
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        bail!(
            "contract `{}` needs linked libraries ({}), which are not supported",
            artifact.contract_name,
            libraries
        );
    }

    let code = artifact
        .bytecode
        .strip_prefix("0x")
        .unwrap_or(&artifact.bytecode);
    if code.is_empty() {
        bail!(
            "contract `{}` is abstract and can't be deployed",
            artifact.contract_name
        );
    }
    let bytecode = hex::decode(code)
        .map_err(|e| anyhow!("invalid bytecode in {:?}: {}", path, e))?
        .into();

    Ok(Blueprint {
        contract_name: artifact.contract_name,
        source_name: artifact.source_name,
        abi: artifact.abi,
        bytecode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_ABI: &str = r#"[{"type":"constructor","stateMutability":"nonpayable","inputs":[{"name":"owner","type":"string","internalType":"string"},{"name":"supply","type":"uint256","internalType":"uint256"}]}]"#;

    fn write_artifact(root: &Path, source: &str, name: &str, bytecode: &str, links: &str) {
        let dir = root.join("contracts").join(source);
        fs::create_dir_all(&dir).unwrap();
        let json = format!(
            r#"{{"_format":"hh-sol-artifact-1","contractName":"{name}","sourceName":"contracts/{source}","abi":{TOKEN_ABI},"bytecode":"{bytecode}","deployedBytecode":"0x","linkReferences":{links},"deployedLinkReferences":{{}}}}"#
        );
        fs::write(dir.join(format!("{name}.json")), json).unwrap();
        fs::write(
            dir.join(format!("{name}.dbg.json")),
            r#"{"_format":"hh-sol-dbg-1","buildInfo":"../../build-info/x.json"}"#,
        )
        .unwrap();
    }

    #[test]
    fn resolves_blueprint_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "SinsoToken.sol", "SinsoToken", "0x6080", "{}");
        fs::create_dir_all(dir.path().join("build-info")).unwrap();
        fs::write(dir.path().join("build-info").join("SinsoToken.json"), "{}").unwrap();

        let blueprint = Artifacts::new(dir.path())
            .get_contract_factory("SinsoToken")
            .unwrap();

        assert_eq!(blueprint.contract_name, "SinsoToken");
        assert_eq!(blueprint.source_name, "contracts/SinsoToken.sol");
        assert_eq!(blueprint.bytecode.to_vec(), vec![0x60, 0x80]);
        assert_eq!(blueprint.abi.constructor().unwrap().inputs.len(), 2);
    }

    #[test]
    fn missing_contract_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "SinsoToken.sol", "SinsoToken", "0x6080", "{}");

        let err = Artifacts::new(dir.path())
            .get_contract_factory("OtherToken")
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Artifacts::new(dir.path().join("nope"))
            .get_contract_factory("SinsoToken")
            .is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "SinsoToken.sol", "SinsoToken", "0x6080", "{}");
        std::os::unix::fs::symlink(dir.path(), dir.path().join("contracts").join("loop")).unwrap();

        let blueprint = Artifacts::new(dir.path())
            .get_contract_factory("SinsoToken")
            .unwrap();
        assert_eq!(blueprint.source_name, "contracts/SinsoToken.sol");
    }

    #[test]
    fn ambiguous_name_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "SinsoToken.sol", "SinsoToken", "0x6080", "{}");
        write_artifact(dir.path(), "Legacy.sol", "SinsoToken", "0x6080", "{}");

        let err = Artifacts::new(dir.path())
            .get_contract_factory("SinsoToken")
            .unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn abstract_contract_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "IToken.sol", "IToken", "0x", "{}");

        let err = Artifacts::new(dir.path())
            .get_contract_factory("IToken")
            .unwrap_err();
        assert!(err.to_string().contains("abstract"));
    }

    #[test]
    fn unlinked_contract_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "SinsoToken.sol",
            "SinsoToken",
            "0x60__$abc$__",
            r#"{"contracts/Math.sol":{"Math":[{"length":20,"start":1}]}}"#,
        );

        let err = Artifacts::new(dir.path())
            .get_contract_factory("SinsoToken")
            .unwrap_err();
        assert!(err.to_string().contains("contracts/Math.sol"));
    }
}
