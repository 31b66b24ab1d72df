pub mod asset;
pub mod contract;
pub mod decay;
pub mod delegation;
pub mod end_block;
pub mod error;
mod events;
pub mod query;
pub mod rebalance;
pub mod reward;
pub mod state;
pub mod take_rate;
