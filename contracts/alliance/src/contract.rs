use alliance_types::{
    keepers::Keepers,
    msg::{ExecuteMsg, InstantiateMsg, QueryMsg, SudoMsg},
    params::Params,
};
use cosmwasm_std::{to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response};
use cw2::set_contract_version;
use cw_utils::nonpayable;
use mars_owner::OwnerInit::SetInitialOwner;

use crate::{
    asset::{create_alliance, delete_alliance, update_alliance},
    delegation::{delegate, redelegate, undelegate, validator_created},
    end_block::end_block,
    error::ContractResult,
    query,
    reward::claim_delegation_rewards,
    state::{OWNER, PARAMS},
};

const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

// The engine drives the chain's bonding and bank modules synchronously, so the host passes them
// in with every call that can move tokens. Queries only read storage.

pub fn instantiate(
    deps: DepsMut,
    _: Env,
    _: MessageInfo,
    msg: InstantiateMsg,
) -> ContractResult<Response> {
    set_contract_version(deps.storage, format!("crates.io:{CONTRACT_NAME}"), CONTRACT_VERSION)?;

    OWNER.initialize(
        deps.storage,
        deps.api,
        SetInitialOwner {
            owner: msg.owner,
        },
    )?;

    let params = Params {
        reward_delay_time: msg.reward_delay_time,
        take_rate_claim_interval: msg.take_rate_claim_interval,
        last_take_rate_claim_time: 0,
    };
    params.validate()?;
    PARAMS.save(deps.storage, &params)?;

    Ok(Response::default())
}

pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    keepers: &mut dyn Keepers,
    msg: ExecuteMsg,
) -> ContractResult<Response> {
    nonpayable(&info)?;

    match msg {
        ExecuteMsg::CreateAlliance {
            denom,
            reward_weight,
            reward_weight_range,
            take_rate,
            reward_change_rate,
            reward_change_interval,
        } => create_alliance(
            deps,
            env,
            info,
            denom,
            reward_weight,
            reward_weight_range,
            take_rate,
            reward_change_rate,
            reward_change_interval,
        ),
        ExecuteMsg::UpdateAlliance {
            denom,
            reward_weight,
            take_rate,
            reward_change_rate,
            reward_change_interval,
        } => update_alliance(
            deps,
            env,
            info,
            keepers,
            denom,
            reward_weight,
            take_rate,
            reward_change_rate,
            reward_change_interval,
        ),
        ExecuteMsg::DeleteAlliance {
            denom,
        } => delete_alliance(deps, info, denom),
        ExecuteMsg::UpdateParams {
            reward_delay_time,
            take_rate_claim_interval,
        } => update_params(deps, info, reward_delay_time, take_rate_claim_interval),
        ExecuteMsg::UpdateOwner(update) => Ok(OWNER.update(deps, info, update)?),
        ExecuteMsg::Delegate {
            validator,
            amount,
        } => delegate(deps, env, info, keepers, validator, amount),
        ExecuteMsg::Undelegate {
            validator,
            amount,
        } => undelegate(deps, env, info, keepers, validator, amount),
        ExecuteMsg::Redelegate {
            src_validator,
            dst_validator,
            amount,
        } => redelegate(deps, env, info, keepers, src_validator, dst_validator, amount),
        ExecuteMsg::ClaimDelegationRewards {
            validator,
            denom,
        } => claim_delegation_rewards(deps, env, info, keepers, validator, denom),
    }
}

pub fn sudo(
    deps: DepsMut,
    env: Env,
    keepers: &mut dyn Keepers,
    msg: SudoMsg,
) -> ContractResult<Response> {
    match msg {
        SudoMsg::EndBlock {} => end_block(deps, env, keepers),
        SudoMsg::ValidatorCreated {
            validator,
        } => validator_created(deps, validator),
    }
}

pub fn query(deps: Deps, _: Env, msg: QueryMsg) -> ContractResult<Binary> {
    let res = match msg {
        QueryMsg::Owner {} => to_json_binary(&OWNER.query(deps.storage)?),
        QueryMsg::Params {} => to_json_binary(&PARAMS.load(deps.storage)?),
        QueryMsg::Alliance {
            denom,
        } => to_json_binary(&query::query_alliance(deps, denom)?),
        QueryMsg::Alliances {
            start_after,
            limit,
        } => to_json_binary(&query::query_alliances(deps, start_after, limit)?),
        QueryMsg::Validator {
            validator,
        } => to_json_binary(&query::query_validator(deps, validator)?),
        QueryMsg::Delegation {
            delegator,
            validator,
            denom,
        } => to_json_binary(&query::query_delegation(deps, delegator, validator, denom)?),
        QueryMsg::DelegatorDelegations {
            delegator,
            start_after,
            limit,
        } => to_json_binary(&query::query_delegator_delegations(
            deps,
            delegator,
            start_after,
            limit,
        )?),
        QueryMsg::PendingRewards {
            delegator,
            validator,
            denom,
        } => to_json_binary(&query::query_pending_rewards(deps, delegator, validator, denom)?),
        QueryMsg::RewardWeightSnapshots {
            denom,
            validator,
            start_height,
            limit,
        } => to_json_binary(&query::query_reward_weight_snapshots(
            deps,
            denom,
            validator,
            start_height,
            limit,
        )?),
        QueryMsg::RebalanceQueued {} => to_json_binary(&query::query_rebalance_queued(deps)?),
    };
    res.map_err(Into::into)
}

fn update_params(
    deps: DepsMut,
    info: MessageInfo,
    reward_delay_time: Option<u64>,
    take_rate_claim_interval: Option<u64>,
) -> ContractResult<Response> {
    OWNER.assert_owner(deps.storage, &info.sender)?;

    let mut params = PARAMS.load(deps.storage)?;
    if let Some(delay) = reward_delay_time {
        params.reward_delay_time = delay;
    }
    if let Some(interval) = take_rate_claim_interval {
        params.take_rate_claim_interval = interval;
    }
    params.validate()?;
    PARAMS.save(deps.storage, &params)?;

    Ok(Response::new()
        .add_attribute("action", "update_params")
        .add_attribute("reward_delay_time", params.reward_delay_time.to_string())
        .add_attribute("take_rate_claim_interval", params.take_rate_claim_interval.to_string()))
}
