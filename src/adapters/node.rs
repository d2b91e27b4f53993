//! Node RPC boundary
//!
//! `NodeRpc` is the narrow set of JSON-RPC calls the pool client needs.
//! `HttpNode` backs it with an alloy HTTP provider; tests swap in fakes.

use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionInput, TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::domain::{ReceiptLog, TxReceipt};
use crate::error::{JagerError, Result};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// `eth_chainId`
    async fn chain_id(&self) -> Result<u64>;

    /// `eth_call` against the latest block
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    /// `eth_getTransactionCount`
    async fn transaction_count(&self, account: Address) -> Result<u64>;

    /// `eth_gasPrice`
    async fn gas_price(&self) -> Result<u128>;

    /// `eth_sendRawTransaction`, returns the hash reported by the node
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256>;

    /// `eth_getTransactionReceipt`, `None` while the tx is pending
    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TxReceipt>>;
}

/// `NodeRpc` over an HTTP(S) JSON-RPC endpoint
#[derive(Clone)]
pub struct HttpNode {
    provider: DynProvider,
    endpoint: String,
}

impl HttpNode {
    pub fn new(endpoint: &str) -> Result<Self> {
        let url: Url = endpoint.trim().parse().map_err(|e| {
            JagerError::Validation(format!("Invalid RPC URL {}: {}", endpoint, e))
        })?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            endpoint: endpoint.trim().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for HttpNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpNode")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl NodeRpc for HttpNode {
    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| JagerError::remote_read("eth_chainId", e))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let request = TransactionRequest::default()
            .to(to)
            .input(TransactionInput::new(data));
        self.provider
            .call(request)
            .await
            .map_err(|e| JagerError::remote_read("eth_call", e))
    }

    async fn transaction_count(&self, account: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(account)
            .await
            .map_err(|e| JagerError::remote_read("eth_getTransactionCount", e))
    }

    async fn gas_price(&self) -> Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| JagerError::remote_read("eth_gasPrice", e))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256> {
        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| JagerError::Submission {
                op: "eth_sendRawTransaction",
                reason: e.to_string(),
            })?;
        let hash = *pending.tx_hash();
        debug!("Transaction sent: {:?}", hash);
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TxReceipt>> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| JagerError::remote_read("eth_getTransactionReceipt", e))?;
        Ok(receipt.map(|r| to_domain_receipt(&r)))
    }
}

fn to_domain_receipt(receipt: &TransactionReceipt) -> TxReceipt {
    let logs = receipt
        .inner
        .logs()
        .iter()
        .map(|log| ReceiptLog {
            address: log.address(),
            topics: log.topics().to_vec(),
            data: log.data().data.clone(),
        })
        .collect();

    TxReceipt {
        tx_hash: receipt.transaction_hash,
        success: receipt.status(),
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
        logs,
    }
}
