use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use blake2::{digest::consts::U32, Blake2b, Digest};
use ed25519_dalek::{Signer, SigningKey};

use crate::error::{ArbResult, ArbitrageError};

type Blake2b256 = Blake2b<U32>;

const ED25519_FLAG: u8 = 0x00;
// Intent prefix for a transaction: scope TransactionData, version V0, app Sui.
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

pub trait TransactionSigner: Send + Sync {
    fn address(&self) -> &str;

    fn sign_transaction(&self, tx_bytes: &[u8]) -> ArbResult<String>;
}

pub struct Ed25519Signer {
    signing_key: SigningKey,
    address: String,
}

impl Ed25519Signer {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let address = derive_address(&signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();
        let stripped = encoded.strip_prefix("0x").unwrap_or(encoded);

        if stripped.len() == 64 {
            if let Ok(bytes) = hex::decode(stripped) {
                return Self::from_slice(&bytes);
            }
        }

        let bytes = BASE64
            .decode(encoded)
            .map_err(|_| anyhow!("Private key is neither 32-byte hex nor base64"))?;

        match bytes.len() {
            33 if bytes[0] == ED25519_FLAG => Self::from_slice(&bytes[1..]),
            33 => Err(anyhow!(
                "Unsupported key scheme flag {:#04x}, only ed25519 is supported",
                bytes[0]
            )),
            32 => Self::from_slice(&bytes),
            n => Err(anyhow!("Private key has unexpected length {}", n)),
        }
    }

    fn from_slice(bytes: &[u8]) -> Result<Self> {
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| anyhow!("Ed25519 seed must be 32 bytes"))?;
        Ok(Self::from_seed(seed))
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

impl TransactionSigner for Ed25519Signer {
    fn address(&self) -> &str {
        &self.address
    }

    fn sign_transaction(&self, tx_bytes: &[u8]) -> ArbResult<String> {
        if tx_bytes.is_empty() {
            return Err(ArbitrageError::submission("refusing to sign empty transaction"));
        }

        let mut hasher = Blake2b256::new();
        hasher.update(TRANSACTION_INTENT);
        hasher.update(tx_bytes);
        let digest = hasher.finalize();

        let signature = self.signing_key.sign(&digest);

        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(&self.public_key());

        Ok(BASE64.encode(serialized))
    }
}

fn derive_address(public_key: &[u8; 32]) -> String {
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(public_key);
    format!("0x{}", hex::encode(hasher.finalize()))
}
