pub mod wallet;

pub use wallet::{SignedTx, Wallet, PRIVATE_KEY_ENV_VARS};
