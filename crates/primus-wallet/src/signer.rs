//! Message signers.
//!
//! Signatures follow the Ethereum personal-message convention (EIP-191):
//! the message is prefixed with `"\x19Ethereum Signed Message:\n" + len`,
//! hashed with keccak256 and signed with a recoverable secp256k1 signature
//! encoded as `r || s || v` where `v = 27 + recovery_id`.

use async_trait::async_trait;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use primus_types::Address;
use sha3::{Digest, Keccak256};
use std::path::Path;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{WalletError, WalletResult};

/// Something that can sign messages on behalf of an account
#[async_trait]
pub trait Signer: Send + Sync {
    /// Account the signer controls
    fn address(&self) -> Address;

    /// Sign an arbitrary message (EIP-191 personal message)
    async fn sign_message(&self, message: &[u8]) -> WalletResult<Vec<u8>>;
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Digest signed for a personal message
pub fn eip191_hash(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()).as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Skip the 0x04 SEC1 tag
    Address::from_hash(&keccak256(&point.as_bytes()[1..]))
}

/// Recover the signing account from a 65-byte personal-message signature
pub fn recover_address(message: &[u8], signature: &[u8]) -> WalletResult<Address> {
    if signature.len() != 65 {
        return Err(WalletError::InvalidSignature(format!(
            "expected 65 bytes, got {}",
            signature.len()
        )));
    }

    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| WalletError::InvalidSignature(e.to_string()))?;
    let v = signature[64];
    let recovery_id = RecoveryId::from_byte(v.checked_sub(27).unwrap_or(v))
        .ok_or_else(|| WalletError::InvalidSignature(format!("bad recovery byte {}", v)))?;

    let key = VerifyingKey::recover_from_prehash(&eip191_hash(message), &sig, recovery_id)
        .map_err(|e| WalletError::InvalidSignature(e.to_string()))?;

    Ok(address_of(&key))
}

/// Signer backed by a secp256k1 key held in memory
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl LocalSigner {
    pub fn new(key: SigningKey) -> Self {
        let address = address_of(key.verifying_key());
        Self { key, address }
    }

    /// Create a signer with a fresh random key
    pub fn generate() -> Self {
        Self::new(SigningKey::random(&mut rand::rngs::OsRng))
    }

    /// Parse a 32-byte private key in hex (optional `0x`, whitespace ignored)
    pub fn from_hex(hex_key: &str) -> WalletResult<Self> {
        let trimmed = hex_key.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(
            hex::decode(digits).map_err(|e| WalletError::InvalidKey(e.to_string()))?,
        );
        if bytes.len() != 32 {
            return Err(WalletError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let key =
            SigningKey::from_slice(&bytes).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        Ok(Self::new(key))
    }

    /// Load a hex-encoded key file
    pub async fn from_file(path: impl AsRef<Path>) -> WalletResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading signing key");
        let contents = Zeroizing::new(tokio::fs::read_to_string(path).await?);
        Self::from_hex(&contents)
    }

    /// Write the key as hex; the file is created or truncated
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> WalletResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let encoded = Zeroizing::new(format!("0x{}\n", self.private_key_hex()));
        tokio::fs::write(path, encoded.as_bytes()).await?;
        Ok(())
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.key.to_bytes())
    }

    /// Compressed SEC1 public key, hex encoded
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.key.verifying_key().to_encoded_point(true).as_bytes())
    }

    pub fn sign_message_sync(&self, message: &[u8]) -> WalletResult<Vec<u8>> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&eip191_hash(message))
            .map_err(|e| WalletError::InvalidSignature(e.to_string()))?;

        let mut out = signature.to_bytes().to_vec();
        out.push(27 + recovery_id.to_byte());
        Ok(out)
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Signer for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_message(&self, message: &[u8]) -> WalletResult<Vec<u8>> {
        self.sign_message_sync(message)
    }
}
