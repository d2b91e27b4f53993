//! Strategy module
//!
//! Reward polling and the claim decision.

pub mod claimer;

pub use claimer::{ensure_can_claim, AutoClaimer, ClaimerConfig, RewardSource, TickOutcome};
