pub mod jager_pool;
pub mod node;

pub use jager_pool::{JagerPool, TxSettings, DEFAULT_GAS_LIMIT, JAGER_POOL_BSC};
pub use node::{HttpNode, NodeRpc};
