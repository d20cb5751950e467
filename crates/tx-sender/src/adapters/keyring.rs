//! Development keyring
//!
//! Deterministic identities derived from seed phrases such as `//Alice`.
//! Signatures are SHA-256 commitments, not verifiable signatures.

use parking_lot::RwLock;
use primitive_types::H256;
use sha2::{Digest, Sha256};

use crate::domain::{
    AccountAddress, AccountRef, KeyMaterial, KeyringError, Nonce, SignedTransaction,
    SigningIdentity, UnsignedTransaction,
};
use crate::ports::outbound::Keyring;

/// Well-known development seeds.
pub const DEV_SEEDS: [&str; 6] = ["//Alice", "//Bob", "//Charlie", "//Dave", "//Eve", "//Ferdie"];

/// `(secret, public_key)` for a seed phrase.
fn derive(seed: &str) -> ([u8; 32], [u8; 32]) {
    let mut secret = [0u8; 32];
    secret.copy_from_slice(&Sha256::digest(seed.as_bytes()));
    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(&Sha256::digest(secret));
    (secret, public_key)
}

/// In-memory keyring
#[derive(Debug, Default)]
pub struct DevKeyring {
    identities: RwLock<Vec<SigningIdentity>>,
}

impl DevKeyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyring holding the [`DEV_SEEDS`] identities.
    pub fn with_dev_accounts() -> Self {
        let keyring = Self::new();
        for seed in DEV_SEEDS {
            keyring.add_seed(seed);
        }
        keyring
    }

    /// Derive and store the identity for `seed`, returning its address.
    ///
    /// Adding the same seed twice is a no-op.
    pub fn add_seed(&self, seed: &str) -> AccountAddress {
        let (secret, public_key) = derive(seed);
        let address = AccountAddress::new(format!("0x{}", hex::encode(public_key)));

        let mut identities = self.identities.write();
        if !identities.iter().any(|id| id.address == address) {
            identities.push(SigningIdentity {
                address: address.clone(),
                public_key,
                key: KeyMaterial::new(secret.to_vec()),
            });
        }
        address
    }

    /// Address for `seed` if it has been added.
    pub fn address_of(&self, seed: &str) -> Option<AccountAddress> {
        let (_, public_key) = derive(seed);
        self.identities
            .read()
            .iter()
            .find(|id| id.public_key == public_key)
            .map(|id| id.address.clone())
    }

    pub fn addresses(&self) -> Vec<AccountAddress> {
        self.identities
            .read()
            .iter()
            .map(|id| id.address.clone())
            .collect()
    }
}

impl Keyring for DevKeyring {
    fn resolve(&self, account: &AccountRef) -> Result<SigningIdentity, KeyringError> {
        let identities = self.identities.read();
        let found = match account {
            AccountRef::Address(address) => identities.iter().find(|id| &id.address == address),
            AccountRef::PublicKey(key) => identities.iter().find(|id| &id.public_key == key),
        };
        found
            .cloned()
            .ok_or_else(|| KeyringError::UnknownAccount(account.to_string()))
    }

    fn sign(
        &self,
        identity: &SigningIdentity,
        tx: &UnsignedTransaction,
        nonce: Nonce,
    ) -> Result<SignedTransaction, KeyringError> {
        if identity.key.expose().is_empty() {
            return Err(KeyringError::Signing(format!(
                "no key material for {}",
                identity.address
            )));
        }

        let signature = Sha256::new()
            .chain_update(identity.key.expose())
            .chain_update(&tx.encoded_call)
            .chain_update(nonce.to_le_bytes())
            .finalize()
            .to_vec();

        let hash = Sha256::new()
            .chain_update(identity.public_key)
            .chain_update(nonce.to_le_bytes())
            .chain_update(&tx.encoded_call)
            .chain_update(&signature)
            .finalize();

        Ok(SignedTransaction {
            hash: H256::from_slice(&hash),
            signer: identity.address.clone(),
            nonce,
            call: tx.clone(),
            signature,
        })
    }

    fn render_human_readable(&self, tx: &SignedTransaction) -> serde_json::Value {
        serde_json::json!({
            "hash": format!("{:?}", tx.hash),
            "signer": tx.signer.as_str(),
            "nonce": tx.nonce,
            "method": {
                "section": tx.call.section,
                "method": tx.call.method,
                "args": tx.call.args,
            },
            "signature": format!("0x{}", hex::encode(&tx.signature)),
        })
    }
}
