#![cfg(not(target_arch = "wasm32"))]

/// cosmwasm_std::testing overrides and the in-memory chain modules
mod bank;
mod mock_chain;
mod mocks;
mod staking;

pub use bank::MockBank;
pub use mock_chain::MockChain;
pub use mocks::*;
pub use staking::{MockStaking, MockValidator};
