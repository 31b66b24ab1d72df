use alliance::{
    contract::{execute, instantiate},
    error::ContractError,
};
use alliance_testing::mock_info;
use alliance_types::{
    msg::{ExecuteMsg, InstantiateMsg, QueryMsg},
    params::Params,
};
use alliance_utils::error::ValidationError;
use cosmwasm_std::testing::mock_dependencies;
use mars_owner::{OwnerError, OwnerResponse, OwnerUpdate};
use test_case::test_case;

use super::helpers::{th_env, th_query, th_setup, OWNER, REWARD_DELAY, TAKE_RATE_INTERVAL};

#[test]
fn instantiate_stores_owner_and_params() {
    let (deps, _) = th_setup();

    let owner: OwnerResponse = th_query(deps.as_ref(), QueryMsg::Owner {});
    assert_eq!(owner.owner.unwrap(), OWNER);
    assert_eq!(owner.proposed, None);

    let params: Params = th_query(deps.as_ref(), QueryMsg::Params {});
    assert_eq!(
        params,
        Params {
            reward_delay_time: REWARD_DELAY,
            take_rate_claim_interval: TAKE_RATE_INTERVAL,
            last_take_rate_claim_time: 0,
        }
    );
}

#[test_case(0, 100, "reward_delay_time"; "zero reward delay")]
#[test_case(60, 0, "take_rate_claim_interval"; "zero take rate interval")]
fn instantiate_rejects_zero_params(delay: u64, interval: u64, param_name: &str) {
    let mut deps = mock_dependencies();
    let err = instantiate(
        deps.as_mut(),
        th_env(1, 0),
        mock_info(OWNER),
        InstantiateMsg {
            owner: OWNER.to_string(),
            reward_delay_time: delay,
            take_rate_claim_interval: interval,
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        ContractError::Validation(ValidationError::InvalidParam {
            param_name: param_name.to_string(),
            invalid_value: "0".to_string(),
            predicate: "> 0".to_string(),
        })
    );
}

#[test]
fn only_owner_can_update_params() {
    let (mut deps, mut chain) = th_setup();
    let err = execute(
        deps.as_mut(),
        th_env(2, 10),
        mock_info("doctor_otto_983"),
        &mut chain,
        ExecuteMsg::UpdateParams {
            reward_delay_time: Some(1),
            take_rate_claim_interval: None,
        },
    )
    .unwrap_err();
    assert_eq!(err, ContractError::Owner(OwnerError::NotOwner {}));
}

#[test]
fn owner_updates_params() {
    let (mut deps, mut chain) = th_setup();

    let res = execute(
        deps.as_mut(),
        th_env(2, 10),
        mock_info(OWNER),
        &mut chain,
        ExecuteMsg::UpdateParams {
            reward_delay_time: None,
            take_rate_claim_interval: Some(7_200),
        },
    )
    .unwrap();
    assert!(res
        .attributes
        .iter()
        .any(|a| a.key == "take_rate_claim_interval" && a.value == "7200"));

    let params: Params = th_query(deps.as_ref(), QueryMsg::Params {});
    assert_eq!(params.reward_delay_time, REWARD_DELAY);
    assert_eq!(params.take_rate_claim_interval, 7_200);

    let err = execute(
        deps.as_mut(),
        th_env(3, 20),
        mock_info(OWNER),
        &mut chain,
        ExecuteMsg::UpdateParams {
            reward_delay_time: None,
            take_rate_claim_interval: Some(0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::Validation(ValidationError::InvalidParam { .. })));

    // a rejected update leaves the stored params alone
    let params: Params = th_query(deps.as_ref(), QueryMsg::Params {});
    assert_eq!(params.take_rate_claim_interval, 7_200);
}

#[test]
fn owner_role_can_be_transferred() {
    let (mut deps, mut chain) = th_setup();
    let new_owner = "miles_morales";

    let err = execute(
        deps.as_mut(),
        th_env(2, 10),
        mock_info(new_owner),
        &mut chain,
        ExecuteMsg::UpdateOwner(OwnerUpdate::ProposeNewOwner {
            proposed: new_owner.to_string(),
        }),
    )
    .unwrap_err();
    assert_eq!(err, ContractError::Owner(OwnerError::NotOwner {}));

    execute(
        deps.as_mut(),
        th_env(2, 10),
        mock_info(OWNER),
        &mut chain,
        ExecuteMsg::UpdateOwner(OwnerUpdate::ProposeNewOwner {
            proposed: new_owner.to_string(),
        }),
    )
    .unwrap();
    let owner: OwnerResponse = th_query(deps.as_ref(), QueryMsg::Owner {});
    assert_eq!(owner.proposed.unwrap(), new_owner);

    execute(
        deps.as_mut(),
        th_env(3, 20),
        mock_info(new_owner),
        &mut chain,
        ExecuteMsg::UpdateOwner(OwnerUpdate::AcceptProposed),
    )
    .unwrap();
    let owner: OwnerResponse = th_query(deps.as_ref(), QueryMsg::Owner {});
    assert_eq!(owner.owner.unwrap(), new_owner);
    assert_eq!(owner.proposed, None);

    // the previous owner lost its rights
    let err = execute(
        deps.as_mut(),
        th_env(4, 30),
        mock_info(OWNER),
        &mut chain,
        ExecuteMsg::UpdateParams {
            reward_delay_time: Some(1),
            take_rate_claim_interval: None,
        },
    )
    .unwrap_err();
    assert_eq!(err, ContractError::Owner(OwnerError::NotOwner {}));
}
