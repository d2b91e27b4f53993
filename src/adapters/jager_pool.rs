//! Client for the Jager LP staking pool
//!
//! Reads go through `eth_call` with ABI encoding from the `sol!` bindings
//! below. Writes are built as legacy transactions, signed locally with the
//! configured wallet and broadcast raw, then the receipt is awaited with a
//! bounded timeout. One call submits at most one transaction; nothing here
//! retries a submission.

use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, TxKind, B256, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::node::{HttpNode, NodeRpc};
use crate::domain::{checksum, normalize_address, ContractSnapshot, PoolInfo, TxReceipt, UserInfo};
use crate::error::{JagerError, Result};
use crate::signing::Wallet;

/// Jager LP pool on BSC mainnet
pub const JAGER_POOL_BSC: &str = "0x5C08E98F14e462B75C9b3566128f75915B78aee7";
pub const DEFAULT_GAS_LIMIT: u64 = 2_000_000;

// The deployed contract also has a payable `receive()`; nothing here sends
// plain value to it, so it is left out of the bindings.
sol! {
    #[allow(missing_docs)]
    interface IJagerPool {
        function LPToken() external view returns (address);
        function jagerToken() external view returns (address);
        function airdrop() external view returns (address);
        function endBlock() external view returns (uint256);
        function lockTime() external view returns (uint256);
        function releaseBlockNumber() external view returns (uint256);
        function rewardPerBlock() external view returns (uint256);

        function poolInfo() external view returns (
            uint256 accLPPerShare,
            uint256 totalAmount,
            uint256 lastRewardBlock,
            uint256 totalReward,
            uint256 releaseReward
        );

        function pendingReward(address account) external view returns (uint256);

        function userInfo(address account) external view returns (
            uint256 amount,
            uint256 rewardDebt,
            uint256 pending,
            uint256 lockEndedTimestamp
        );

        function deposit(uint256 amount) external;
        function withdraw(uint256 amount) external;
        function claim() external;
        function updatePool() external;
        function addReward(uint256 amount) external;
        function addLiquidity(uint256 tokenAmount) external payable;
    }
}

/// Gas and confirmation settings for write calls
#[derive(Debug, Clone)]
pub struct TxSettings {
    /// Fixed gas limit; the pool's calls are cheap and estimation adds a round-trip
    pub gas_limit: u64,
    /// How long to wait for a receipt after broadcast
    pub confirmation_timeout: Duration,
    /// Delay between receipt polls
    pub receipt_poll_interval: Duration,
}

impl Default for TxSettings {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            confirmation_timeout: Duration::from_secs(120),
            receipt_poll_interval: Duration::from_secs(3),
        }
    }
}

/// Client for one deployed pool contract
pub struct JagerPool<N: NodeRpc = HttpNode> {
    node: N,
    address: Address,
    chain_id: u64,
    wallet: Option<Wallet>,
    tx: TxSettings,
}

impl JagerPool<HttpNode> {
    /// Connect to the pool through an HTTP(S) node
    ///
    /// The node is probed with `eth_chainId`; an unreachable node is a
    /// `Connection` error. The chain id is kept for EIP-155 signing.
    pub async fn connect(
        address: &str,
        endpoint: &str,
        wallet: Option<Wallet>,
        tx: TxSettings,
    ) -> Result<Self> {
        let address = normalize_address(address)?;
        let node = HttpNode::new(endpoint)?;

        let chain_id = node
            .chain_id()
            .await
            .map_err(|e| JagerError::Connection {
                endpoint: node.endpoint().to_string(),
                reason: e.to_string(),
            })?;

        info!(
            "Connected to {} (chain {}), pool {}",
            node.endpoint(),
            chain_id,
            checksum(&address)
        );

        Ok(Self::new(node, address, chain_id, wallet, tx))
    }
}

impl<N: NodeRpc> JagerPool<N> {
    /// Build a client over an already connected node
    pub fn new(
        node: N,
        address: Address,
        chain_id: u64,
        wallet: Option<Wallet>,
        tx: TxSettings,
    ) -> Self {
        Self {
            node,
            address,
            chain_id,
            wallet,
            tx,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Address of the configured signer, if any
    pub fn signer_address(&self) -> Option<Address> {
        self.wallet.as_ref().map(Wallet::address)
    }

    pub fn can_sign(&self) -> bool {
        self.wallet.is_some()
    }

    // ==================== Reads ====================

    async fn read<C: SolCall>(&self, op: &'static str, call: C) -> Result<C::Return> {
        let data = self
            .node
            .call(self.address, call.abi_encode().into())
            .await
            .map_err(|e| match e {
                JagerError::RemoteRead { reason, .. } => JagerError::RemoteRead { op, reason },
                other => other,
            })?;

        C::abi_decode_returns(&data).map_err(|e| JagerError::decode(op, e))
    }

    pub async fn lp_token_address(&self) -> Result<Address> {
        self.read("LPToken", IJagerPool::LPTokenCall {}).await
    }

    pub async fn jager_token_address(&self) -> Result<Address> {
        self.read("jagerToken", IJagerPool::jagerTokenCall {}).await
    }

    pub async fn airdrop_address(&self) -> Result<Address> {
        self.read("airdrop", IJagerPool::airdropCall {}).await
    }

    pub async fn end_block(&self) -> Result<U256> {
        self.read("endBlock", IJagerPool::endBlockCall {}).await
    }

    /// Lock duration applied to new deposits, in seconds
    pub async fn lock_time(&self) -> Result<U256> {
        self.read("lockTime", IJagerPool::lockTimeCall {}).await
    }

    pub async fn release_block_number(&self) -> Result<U256> {
        self.read("releaseBlockNumber", IJagerPool::releaseBlockNumberCall {})
            .await
    }

    pub async fn reward_per_block(&self) -> Result<U256> {
        self.read("rewardPerBlock", IJagerPool::rewardPerBlockCall {})
            .await
    }

    pub async fn pool_info(&self) -> Result<PoolInfo> {
        let r = self.read("poolInfo", IJagerPool::poolInfoCall {}).await?;
        Ok(PoolInfo {
            acc_lp_per_share: r.accLPPerShare,
            total_amount: r.totalAmount,
            last_reward_block: r.lastRewardBlock,
            total_reward: r.totalReward,
            release_reward: r.releaseReward,
        })
    }

    pub async fn user_info(&self, account: Address) -> Result<UserInfo> {
        let r = self
            .read("userInfo", IJagerPool::userInfoCall { account })
            .await?;
        Ok(UserInfo {
            amount: r.amount,
            reward_debt: r.rewardDebt,
            pending: r.pending,
            lock_ended_timestamp: r.lockEndedTimestamp,
        })
    }

    /// Reward claimable by `account` at the current block
    pub async fn pending_reward(&self, account: Address) -> Result<U256> {
        self.read("pendingReward", IJagerPool::pendingRewardCall { account })
            .await
    }

    /// Static pool parameters plus current pool info
    pub async fn snapshot(&self) -> Result<ContractSnapshot> {
        Ok(ContractSnapshot {
            contract: self.address,
            lp_token: self.lp_token_address().await?,
            jager_token: self.jager_token_address().await?,
            airdrop: self.airdrop_address().await?,
            end_block: self.end_block().await?,
            lock_time: self.lock_time().await?,
            release_block_number: self.release_block_number().await?,
            reward_per_block: self.reward_per_block().await?,
            pool: self.pool_info().await?,
        })
    }

    // ==================== Writes ====================

    pub async fn deposit(&self, amount: U256) -> Result<TxReceipt> {
        let call = IJagerPool::depositCall { amount };
        self.submit("deposit", call.abi_encode(), U256::ZERO).await
    }

    pub async fn withdraw(&self, amount: U256) -> Result<TxReceipt> {
        let call = IJagerPool::withdrawCall { amount };
        self.submit("withdraw", call.abi_encode(), U256::ZERO).await
    }

    pub async fn claim(&self) -> Result<TxReceipt> {
        let call = IJagerPool::claimCall {};
        self.submit("claim", call.abi_encode(), U256::ZERO).await
    }

    pub async fn update_pool(&self) -> Result<TxReceipt> {
        let call = IJagerPool::updatePoolCall {};
        self.submit("updatePool", call.abi_encode(), U256::ZERO)
            .await
    }

    pub async fn add_reward(&self, amount: U256) -> Result<TxReceipt> {
        let call = IJagerPool::addRewardCall { amount };
        self.submit("addReward", call.abi_encode(), U256::ZERO).await
    }

    /// Add liquidity; `native_amount` (wei) is sent as the transaction value
    pub async fn add_liquidity(&self, token_amount: U256, native_amount: U256) -> Result<TxReceipt> {
        let call = IJagerPool::addLiquidityCall {
            tokenAmount: token_amount,
        };
        self.submit("addLiquidity", call.abi_encode(), native_amount)
            .await
    }

    /// Sign, broadcast and confirm one transaction to the pool
    async fn submit(&self, op: &'static str, input: Vec<u8>, value: U256) -> Result<TxReceipt> {
        let wallet = self
            .wallet
            .as_ref()
            .ok_or(JagerError::NoCredential { op })?;
        let from = wallet.address();

        let nonce = self.node.transaction_count(from).await?;
        let gas_price = self.node.gas_price().await?;

        let tx = TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price,
            gas_limit: self.tx.gas_limit,
            to: TxKind::Call(self.address),
            value,
            input: input.into(),
        };
        let signed = wallet.sign_legacy(tx)?;

        info!(
            op,
            nonce,
            gas_price,
            tx_hash = ?signed.hash,
            "Submitting transaction from {}",
            checksum(&from)
        );

        let hash = self
            .node
            .send_raw_transaction(signed.raw)
            .await
            .map_err(|e| match e {
                JagerError::Submission { reason, .. } => JagerError::Submission { op, reason },
                other => other,
            })?;

        if hash != signed.hash {
            warn!(
                "Node reported hash {:?} for {} but the signed tx hashes to {:?}",
                hash, op, signed.hash
            );
        }

        self.wait_for_receipt(hash).await
    }

    /// Poll for the receipt until it appears or the confirmation timeout hits
    ///
    /// Poll errors are logged and polling continues: the transaction is
    /// already out, and giving up early would only hide its outcome.
    async fn wait_for_receipt(&self, hash: B256) -> Result<TxReceipt> {
        let poll = async {
            loop {
                match self.node.transaction_receipt(hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => debug!("Receipt for {:?} not available yet", hash),
                    Err(e) => warn!("Receipt poll for {:?} failed: {}", hash, e),
                }
                tokio::time::sleep(self.tx.receipt_poll_interval).await;
            }
        };

        let receipt = tokio::time::timeout(self.tx.confirmation_timeout, poll)
            .await
            .map_err(|_| JagerError::ConfirmationTimeout {
                tx_hash: format!("{:?}", hash),
                waited_secs: self.tx.confirmation_timeout.as_secs(),
            })?;

        info!(
            "Transaction {:?} mined in block {:?} (status: {}, gas used: {})",
            receipt.tx_hash,
            receipt.block_number,
            if receipt.success { "success" } else { "reverted" },
            receipt.gas_used
        );

        Ok(receipt)
    }
}

impl<N: NodeRpc> std::fmt::Debug for JagerPool<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JagerPool")
            .field("address", &checksum(&self.address))
            .field("chain_id", &self.chain_id)
            .field("signer", &self.signer_address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::node::MockNodeRpc;
    use alloy::consensus::TxEnvelope;
    use alloy::eips::eip2718::Decodable2718;
    use alloy::primitives::{hex, Bytes};
    use alloy::sol_types::SolValue;
    use std::sync::{Arc, Mutex};

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn pool_address() -> Address {
        normalize_address(JAGER_POOL_BSC).unwrap()
    }

    fn fast_settings() -> TxSettings {
        TxSettings {
            gas_limit: DEFAULT_GAS_LIMIT,
            confirmation_timeout: Duration::from_millis(200),
            receipt_poll_interval: Duration::from_millis(10),
        }
    }

    fn pool(node: MockNodeRpc, wallet: Option<Wallet>) -> JagerPool<MockNodeRpc> {
        JagerPool::new(node, pool_address(), 56, wallet, fast_settings())
    }

    fn wallet() -> Wallet {
        Wallet::from_private_key(TEST_KEY).unwrap()
    }

    fn receipt(hash: B256, success: bool) -> TxReceipt {
        TxReceipt {
            tx_hash: hash,
            success,
            block_number: Some(42_000_000),
            gas_used: 85_000,
            logs: vec![],
        }
    }

    #[test]
    fn test_selectors_match_deployed_abi() {
        assert_eq!(IJagerPool::claimCall::SELECTOR, hex!("4e71d92d"));
        assert_eq!(IJagerPool::pendingRewardCall::SELECTOR, hex!("f40f0f52"));
        assert_eq!(IJagerPool::userInfoCall::SELECTOR, hex!("1959a002"));
        assert_eq!(IJagerPool::poolInfoCall::SELECTOR, hex!("5a2f3d09"));
        assert_eq!(IJagerPool::depositCall::SELECTOR, hex!("b6b55f25"));
        assert_eq!(IJagerPool::withdrawCall::SELECTOR, hex!("2e1a7d4d"));
        assert_eq!(IJagerPool::updatePoolCall::SELECTOR, hex!("e3161ddd"));
        assert_eq!(IJagerPool::addRewardCall::SELECTOR, hex!("74de4ec4"));
        assert_eq!(IJagerPool::addLiquidityCall::SELECTOR, hex!("51c6590a"));
        assert_eq!(IJagerPool::LPTokenCall::SELECTOR, hex!("011cee36"));
        assert_eq!(IJagerPool::rewardPerBlockCall::SELECTOR, hex!("8ae39cac"));
    }

    #[tokio::test]
    async fn test_pending_reward_encodes_account_and_decodes_u256() {
        let account = Address::repeat_byte(0xab);
        let reward = U256::from(14_000_000_000u64);

        let mut node = MockNodeRpc::new();
        node.expect_call()
            .withf(move |to, data| {
                *to == pool_address()
                    && data[..4] == IJagerPool::pendingRewardCall::SELECTOR
                    && data[16..36] == account[..]
            })
            .times(1)
            .returning(move |_, _| Ok(reward.abi_encode().into()));

        let got = pool(node, None).pending_reward(account).await.unwrap();
        assert_eq!(got, reward);
    }

    #[tokio::test]
    async fn test_pool_info_decodes_all_fields() {
        let mut node = MockNodeRpc::new();
        node.expect_call().returning(|_, _| {
            let fields = (
                U256::from(1u64),
                U256::from(2u64),
                U256::from(3u64),
                U256::from(4u64),
                U256::from(5u64),
            );
            Ok(fields.abi_encode_params().into())
        });

        let info = pool(node, None).pool_info().await.unwrap();
        assert_eq!(info.acc_lp_per_share, U256::from(1u64));
        assert_eq!(info.total_amount, U256::from(2u64));
        assert_eq!(info.last_reward_block, U256::from(3u64));
        assert_eq!(info.total_reward, U256::from(4u64));
        assert_eq!(info.release_reward, U256::from(5u64));
    }

    #[tokio::test]
    async fn test_user_info_decodes_all_fields() {
        let mut node = MockNodeRpc::new();
        node.expect_call().returning(|_, _| {
            let fields = (
                U256::from(10u64),
                U256::from(20u64),
                U256::from(30u64),
                U256::from(1_700_000_000u64),
            );
            Ok(fields.abi_encode_params().into())
        });

        let info = pool(node, None)
            .user_info(Address::repeat_byte(1))
            .await
            .unwrap();
        assert_eq!(info.amount, U256::from(10u64));
        assert_eq!(info.reward_debt, U256::from(20u64));
        assert_eq!(info.pending, U256::from(30u64));
        assert_eq!(info.lock_ended_timestamp, U256::from(1_700_000_000u64));
    }

    #[tokio::test]
    async fn test_empty_return_data_is_decode_error() {
        let mut node = MockNodeRpc::new();
        node.expect_call().returning(|_, _| Ok(Bytes::new()));

        let err = pool(node, None).end_block().await.unwrap_err();
        assert!(
            matches!(err, JagerError::Decode { op: "endBlock", .. }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_node_failure_is_remote_read_with_operation_name() {
        let mut node = MockNodeRpc::new();
        node.expect_call()
            .returning(|_, _| Err(JagerError::remote_read("eth_call", "connection refused")));

        let err = pool(node, None).lock_time().await.unwrap_err();
        match err {
            JagerError::RemoteRead { op, reason } => {
                assert_eq!(op, "lockTime");
                assert!(reason.contains("connection refused"));
            }
            other => panic!("expected RemoteRead, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_writes_without_key_never_touch_the_node() {
        // no expectations: any node call would panic
        let client = pool(MockNodeRpc::new(), None);

        let results = [
            client.claim().await,
            client.deposit(U256::from(1u64)).await,
            client.withdraw(U256::from(1u64)).await,
            client.update_pool().await,
            client.add_reward(U256::from(1u64)).await,
            client.add_liquidity(U256::from(1u64), U256::from(1u64)).await,
        ];

        for result in results {
            assert!(matches!(result, Err(JagerError::NoCredential { .. })));
        }
    }

    #[tokio::test]
    async fn test_claim_builds_signs_and_confirms() {
        let captured: Arc<Mutex<Option<Bytes>>> = Arc::new(Mutex::new(None));
        let tx_hash = Arc::new(Mutex::new(B256::ZERO));
        let signer = wallet().address();

        let mut node = MockNodeRpc::new();
        node.expect_transaction_count()
            .withf(move |account| *account == signer)
            .times(1)
            .returning(|_| Ok(9));
        node.expect_gas_price()
            .times(1)
            .returning(|| Ok(1_000_000_000));

        let sink = captured.clone();
        let hash_sink = tx_hash.clone();
        node.expect_send_raw_transaction()
            .times(1)
            .returning(move |raw| {
                let hash = alloy::primitives::keccak256(&raw);
                *sink.lock().unwrap() = Some(raw);
                *hash_sink.lock().unwrap() = hash;
                Ok(hash)
            });

        // pending once, then mined
        let mut polls = 0;
        node.expect_transaction_receipt().returning(move |hash| {
            polls += 1;
            if polls < 2 {
                Ok(None)
            } else {
                Ok(Some(receipt(hash, true)))
            }
        });

        let got = pool(node, Some(wallet())).claim().await.unwrap();
        assert!(got.success);
        assert_eq!(got.tx_hash, *tx_hash.lock().unwrap());

        let raw = captured.lock().unwrap().clone().unwrap();
        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap();
        let legacy = envelope.as_legacy().expect("legacy transaction");
        let tx = legacy.tx();
        assert_eq!(tx.chain_id, Some(56));
        assert_eq!(tx.nonce, 9);
        assert_eq!(tx.gas_price, 1_000_000_000);
        assert_eq!(tx.gas_limit, DEFAULT_GAS_LIMIT);
        assert_eq!(tx.to, TxKind::Call(pool_address()));
        assert_eq!(tx.value, U256::ZERO);
        assert_eq!(tx.input.as_ref(), IJagerPool::claimCall::SELECTOR.as_slice());
    }

    #[tokio::test]
    async fn test_add_liquidity_sends_native_value() {
        let captured: Arc<Mutex<Option<Bytes>>> = Arc::new(Mutex::new(None));

        let mut node = MockNodeRpc::new();
        node.expect_transaction_count().returning(|_| Ok(0));
        node.expect_gas_price().returning(|| Ok(3_000_000_000));
        let sink = captured.clone();
        node.expect_send_raw_transaction().returning(move |raw| {
            let hash = alloy::primitives::keccak256(&raw);
            *sink.lock().unwrap() = Some(raw);
            Ok(hash)
        });
        node.expect_transaction_receipt()
            .returning(|hash| Ok(Some(receipt(hash, true))));

        let token_amount = U256::from(5_000u64);
        let native = U256::from(10u64).pow(U256::from(17u64));
        pool(node, Some(wallet()))
            .add_liquidity(token_amount, native)
            .await
            .unwrap();

        let raw = captured.lock().unwrap().clone().unwrap();
        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap();
        let tx = envelope.as_legacy().unwrap().tx().clone();
        assert_eq!(tx.value, native);

        let decoded = IJagerPool::addLiquidityCall::abi_decode(&tx.input).unwrap();
        assert_eq!(decoded.tokenAmount, token_amount);
    }

    #[tokio::test]
    async fn test_rejected_broadcast_is_submission_error() {
        let mut node = MockNodeRpc::new();
        node.expect_transaction_count().returning(|_| Ok(0));
        node.expect_gas_price().returning(|| Ok(1));
        node.expect_send_raw_transaction().returning(|_| {
            Err(JagerError::Submission {
                op: "eth_sendRawTransaction",
                reason: "insufficient funds for gas".into(),
            })
        });

        let err = pool(node, Some(wallet()))
            .deposit(U256::from(1u64))
            .await
            .unwrap_err();
        match err {
            JagerError::Submission { op, reason } => {
                assert_eq!(op, "deposit");
                assert!(reason.contains("insufficient funds"));
            }
            other => panic!("expected Submission, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_receipt_times_out() {
        let mut node = MockNodeRpc::new();
        node.expect_transaction_count().returning(|_| Ok(0));
        node.expect_gas_price().returning(|| Ok(1));
        node.expect_send_raw_transaction()
            .returning(|raw| Ok(alloy::primitives::keccak256(&raw)));
        node.expect_transaction_receipt().returning(|_| Ok(None));

        let err = pool(node, Some(wallet())).claim().await.unwrap_err();
        assert!(matches!(err, JagerError::ConfirmationTimeout { .. }));
    }

    #[tokio::test]
    async fn test_receipt_poll_errors_are_tolerated() {
        let mut node = MockNodeRpc::new();
        node.expect_transaction_count().returning(|_| Ok(0));
        node.expect_gas_price().returning(|| Ok(1));
        node.expect_send_raw_transaction()
            .returning(|raw| Ok(alloy::primitives::keccak256(&raw)));

        let mut polls = 0;
        node.expect_transaction_receipt().returning(move |hash| {
            polls += 1;
            if polls == 1 {
                Err(JagerError::remote_read("eth_getTransactionReceipt", "502"))
            } else {
                Ok(Some(receipt(hash, false)))
            }
        });

        let got = pool(node, Some(wallet())).update_pool().await.unwrap();
        assert!(!got.success);
    }
}
