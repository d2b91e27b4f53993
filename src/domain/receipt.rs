use alloy::primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// Log emitted by a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Outcome of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: B256,
    /// `status == 1` on chain
    pub success: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub logs: Vec<ReceiptLog>,
}

impl TxReceipt {
    pub fn hash_hex(&self) -> String {
        format!("{:?}", self.tx_hash)
    }
}
