use crate::error::{JagerError, Result};
use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, B256};
use alloy::signers::local::PrivateKeySigner;
use tracing::info;
use zeroize::Zeroize;

/// Environment variables checked for the signing key, in order.
pub const PRIVATE_KEY_ENV_VARS: [&str; 2] = ["JAGER_PRIVATE_KEY", "PRIVATE_KEY"];

/// Wallet for signing pool transactions
///
/// # Security
/// The hex private key is zeroized right after the signer is built and is
/// never stored in the struct. `Debug` prints the address only.
#[derive(Clone)]
pub struct Wallet {
    inner: PrivateKeySigner,
}

/// A signed transaction ready for `eth_sendRawTransaction`
#[derive(Debug, Clone)]
pub struct SignedTx {
    pub hash: B256,
    pub raw: Bytes,
}

impl Wallet {
    /// Create a wallet from a private key hex string
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        // Remove 0x prefix if present
        let mut secure_key = private_key.trim().trim_start_matches("0x").to_string();

        let parsed = secure_key.parse::<PrivateKeySigner>();
        secure_key.zeroize();

        let inner = parsed.map_err(|e| JagerError::Wallet(format!("Invalid private key: {}", e)))?;

        info!("Wallet initialized: {} (private key zeroized from memory)", inner.address());

        Ok(Self { inner })
    }

    /// Create a wallet from the environment, if a key is set
    ///
    /// Returns `Ok(None)` when no key variable is present, so read-only
    /// commands work without one.
    pub fn from_env() -> Result<Option<Self>> {
        for var in PRIVATE_KEY_ENV_VARS {
            if let Ok(mut private_key) = std::env::var(var) {
                if private_key.trim().is_empty() {
                    continue;
                }
                let result = Self::from_private_key(&private_key);
                private_key.zeroize();
                return result.map(Some);
            }
        }
        Ok(None)
    }

    /// Get the wallet address
    pub fn address(&self) -> Address {
        self.inner.address()
    }

    /// Sign a legacy (EIP-155) transaction and encode it for broadcast
    pub fn sign_legacy(&self, mut tx: TxLegacy) -> Result<SignedTx> {
        let signature = self
            .inner
            .sign_transaction_sync(&mut tx)
            .map_err(|e| JagerError::Signature(format!("Failed to sign transaction: {}", e)))?;

        let signed = tx.into_signed(signature);
        let hash = *signed.hash();
        let envelope = TxEnvelope::from(signed);

        Ok(SignedTx {
            hash,
            raw: envelope.encoded_2718().into(),
        })
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish()
    }
}
