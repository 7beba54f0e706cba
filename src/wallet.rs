//! Resolution of the deployer's signing key.

use std::fs;

use alloy::signers::local::{LocalSigner, PrivateKeySigner};
use eyre::{eyre, Context, Result};

use crate::config::Auth;

impl Auth {
    /// Resolves the configured key material into a signer.
    ///
    /// An inline key wins over a key file, which wins over a keystore.
    pub fn signer(&self) -> Result<PrivateKeySigner> {
        if let Some(key) = &self.private_key {
            return key.trim().parse().wrap_err("invalid private key");
        }

        if let Some(path) = &self.private_key_file {
            let key =
                fs::read_to_string(path).wrap_err("could not read private key file")?;
            return key.trim().parse().wrap_err("invalid private key");
        }

        let keystore = self
            .keystore
            .as_ref()
            .ok_or_else(|| eyre!("no signing key configured"))?;
        let password = match &self.keystore_password_file {
            Some(path) => fs::read_to_string(path)
                .wrap_err("could not read keystore password file")?
                .trim_end()
                .to_owned(),
            None => String::new(),
        };

        LocalSigner::decrypt_keystore(keystore, password)
            .wrap_err("could not decrypt keystore")
    }
}
