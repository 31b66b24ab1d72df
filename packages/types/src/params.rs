use alliance_utils::{error::ValidationError, helpers::integer_param_gt_zero};
use cosmwasm_schema::cw_serde;

#[cw_serde]
pub struct Params {
    /// Delay (in seconds) between the creation of an asset and the start of its rewards
    pub reward_delay_time: u64,
    /// Length (in seconds) of a take rate interval
    pub take_rate_claim_interval: u64,
    /// Last time the take rate was collected. 0 until the take rate clock starts
    pub last_take_rate_claim_time: u64,
}

impl Params {
    pub fn validate(&self) -> Result<(), ValidationError> {
        integer_param_gt_zero(self.reward_delay_time, "reward_delay_time")?;
        integer_param_gt_zero(self.take_rate_claim_interval, "take_rate_claim_interval")?;
        Ok(())
    }
}
