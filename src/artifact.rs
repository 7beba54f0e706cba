//! Loading and encoding of compiled contract artifacts.
//!
//! The Solidity toolchain writes one JSON artifact per contract; resolving a
//! contract name means reading `<artifacts-dir>/<Name>.json` and pulling the
//! ABI and creation bytecode out of it.

use std::{fs, path::Path};

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, Specifier},
    json_abi::JsonAbi,
};
use eyre::{bail, Context};
use serde::Deserialize;

/// A compiled contract artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    /// Name of the contract, as written by the compiler.
    #[serde(rename = "contractName", default)]
    pub contract_name: String,
    /// The contract's ABI.
    pub abi: JsonAbi,
    /// Creation bytecode as a hex string.
    pub bytecode: String,
}

impl Artifact {
    /// Reads the artifact for `name` from `dir`.
    pub fn load(dir: impl AsRef<Path>, name: &str) -> eyre::Result<Artifact> {
        let path = dir.as_ref().join(format!("{name}.json"));
        let contents = fs::read_to_string(&path)
            .wrap_err_with(|| format!("no artifact for {name} at {}", path.display()))?;
        serde_json::from_str(&contents)
            .wrap_err_with(|| format!("malformed artifact at {}", path.display()))
    }

    /// ABI types of the constructor inputs. Empty when the contract has no
    /// constructor.
    pub fn constructor_types(&self) -> eyre::Result<Vec<DynSolType>> {
        let Some(constructor) = &self.abi.constructor else {
            return Ok(vec![]);
        };
        constructor
            .inputs
            .iter()
            .map(|param| {
                param
                    .resolve()
                    .wrap_err_with(|| format!("unresolvable constructor input {}", param.ty))
            })
            .collect()
    }

    /// Coerces raw argument strings against the constructor's input types.
    pub fn coerce_args(&self, raw: &[String]) -> eyre::Result<Vec<DynSolValue>> {
        let types = self.constructor_types()?;
        if types.len() != raw.len() {
            bail!(
                "constructor of {} takes {} arguments, {} given",
                self.contract_name,
                types.len(),
                raw.len()
            );
        }

        types
            .iter()
            .zip(raw)
            .map(|(ty, value)| {
                ty.coerce_str(value)
                    .wrap_err_with(|| format!("{value} is not a valid {ty}"))
            })
            .collect()
    }

    /// Creation bytecode with the ABI-encoded constructor arguments appended.
    pub fn init_code(&self, args: &[DynSolValue]) -> eyre::Result<Vec<u8>> {
        let arity = self
            .abi
            .constructor
            .as_ref()
            .map_or(0, |constructor| constructor.inputs.len());
        if args.len() != arity {
            bail!(
                "constructor of {} takes {} arguments, {} given",
                self.contract_name,
                arity,
                args.len()
            );
        }

        let bytecode = hex::decode(self.bytecode.trim_start_matches("0x"))
            .wrap_err("artifact bytecode is not valid hex")?;
        if args.is_empty() {
            return Ok(bytecode);
        }

        let encoded = DynSolValue::Tuple(args.to_vec()).abi_encode_params();
        Ok([bytecode, encoded].concat())
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        dyn_abi::DynSolValue,
        primitives::{Address, U256},
    };

    use super::Artifact;

    const VAULT: &str = r#"{
        "contractName": "Vault",
        "abi": [
            {
                "type": "constructor",
                "stateMutability": "nonpayable",
                "inputs": [
                    { "name": "cap", "type": "uint256", "internalType": "uint256" },
                    { "name": "governance", "type": "address", "internalType": "address" }
                ]
            }
        ],
        "bytecode": "0x6080604052"
    }"#;

    const NO_CONSTRUCTOR: &str = r#"{
        "contractName": "Registry",
        "abi": [],
        "bytecode": "0x60806040"
    }"#;

    fn vault() -> Artifact {
        serde_json::from_str(VAULT).unwrap()
    }

    #[test]
    fn coerces_constructor_args() {
        let artifact = vault();
        let raw = [
            "42".to_owned(),
            "0x1111111111111111111111111111111111111111".to_owned(),
        ];
        let args = artifact.coerce_args(&raw).unwrap();

        let expected = vec![
            DynSolValue::Uint(U256::from(42), 256),
            DynSolValue::Address(Address::repeat_byte(0x11)),
        ];
        assert_eq!(expected, args);
    }

    #[test]
    fn rejects_wrong_arity() {
        let artifact = vault();
        let raw = ["42".to_owned()];
        assert!(artifact.coerce_args(&raw).is_err());

        let args = [DynSolValue::Uint(U256::from(42), 256)];
        assert!(artifact.init_code(&args).is_err());
    }

    #[test]
    fn rejects_invalid_values() {
        let artifact = vault();
        let raw = ["not-a-number".to_owned(), "0x11".to_owned()];
        assert!(artifact.coerce_args(&raw).is_err());
    }

    #[test]
    fn appends_encoded_args() {
        let artifact = vault();
        let args = vec![
            DynSolValue::Uint(U256::from(42), 256),
            DynSolValue::Address(Address::repeat_byte(0x11)),
        ];
        let init_code = artifact.init_code(&args).unwrap();

        let expected = hex::decode(concat!(
            "6080604052",
            "000000000000000000000000000000000000000000000000000000000000002a",
            "0000000000000000000000001111111111111111111111111111111111111111",
        ))
        .unwrap();
        assert_eq!(expected, init_code);
    }

    #[test]
    fn bare_bytecode_without_constructor() {
        let artifact: Artifact = serde_json::from_str(NO_CONSTRUCTOR).unwrap();
        let init_code = artifact.init_code(&[]).unwrap();
        assert_eq!(hex::decode("60806040").unwrap(), init_code);

        let args = [DynSolValue::Bool(true)];
        assert!(artifact.init_code(&args).is_err());
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Vault.json"), VAULT).unwrap();

        let artifact = Artifact::load(dir.path(), "Vault").unwrap();
        assert_eq!("Vault", artifact.contract_name);
        assert_eq!("0x6080604052", artifact.bytecode);

        assert!(Artifact::load(dir.path(), "Missing").is_err());
    }
}
