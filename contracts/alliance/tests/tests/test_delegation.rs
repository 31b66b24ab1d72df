use alliance::{
    contract::{execute, query},
    error::{ContractError, ContractResult},
};
use alliance_testing::{mock_info, MockChain};
use alliance_types::{
    asset::AllianceAsset,
    keepers::{ValidatorStatus, ALLIANCE_MODULE},
    msg::{
        DelegateResponse, DelegationResponse, ExecuteMsg, QueryMsg, UnbondingResponse,
        ValidatorResponse,
    },
};
use cosmwasm_std::{
    coin, from_json, testing::mock_info as mock_info_with_funds, Decimal, Decimal256, Response,
    Uint128,
};
use cw_utils::PaymentError;

use super::helpers::{
    dec, th_claim, th_create_alliance, th_delegate, th_end_block, th_env, th_query, th_setup,
    th_undelegate, MockDeps, GENESIS_TIME, VAL1, VAL2, VAL3,
};

const USER: &str = "user";
const UNBONDING_TIME: u64 = 1_814_400;

fn setup() -> (MockDeps, MockChain) {
    let (mut deps, mut chain) = th_setup();
    th_create_alliance(&mut deps, &mut chain, th_env(1, 0), "aaa", dec("1"), Decimal::zero());
    (deps, chain)
}

fn query_delegation(deps: &MockDeps, validator: &str) -> DelegationResponse {
    th_query(
        deps.as_ref(),
        QueryMsg::Delegation {
            delegator: USER.to_string(),
            validator: validator.to_string(),
            denom: "aaa".to_string(),
        },
    )
}

fn query_alliance(deps: &MockDeps) -> AllianceAsset {
    th_query(
        deps.as_ref(),
        QueryMsg::Alliance {
            denom: "aaa".to_string(),
        },
    )
}

fn redelegate(
    deps: &mut MockDeps,
    chain: &mut MockChain,
    seconds: u64,
    src: &str,
    dst: &str,
    amount: u128,
) -> ContractResult<Response> {
    execute(
        deps.as_mut(),
        th_env(10, seconds),
        mock_info(USER),
        chain,
        ExecuteMsg::Redelegate {
            src_validator: src.to_string(),
            dst_validator: dst.to_string(),
            amount: coin(amount, "aaa"),
        },
    )
}

#[test]
fn delegate_issues_shares_and_takes_custody() {
    let (mut deps, mut chain) = setup();

    let res =
        th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, VAL1, 1_000, "aaa").unwrap();
    let data: DelegateResponse = from_json(res.data.unwrap()).unwrap();
    assert_eq!(data.shares, Decimal256::from_ratio(1_000u128, 1u128));

    assert_eq!(chain.balance(USER, "aaa"), Uint128::zero());
    assert_eq!(chain.balance(ALLIANCE_MODULE, "aaa"), Uint128::new(1_000));

    let delegation = query_delegation(&deps, VAL1);
    assert_eq!(delegation.balance, Uint128::new(1_000));
    assert_eq!(delegation.last_reward_claim_height, 2);

    let asset = query_alliance(&deps);
    assert_eq!(asset.total_tokens, Uint128::new(1_000));
    assert_eq!(asset.total_validator_shares, Decimal256::from_ratio(1_000u128, 1u128));

    let queued: bool = th_query(deps.as_ref(), QueryMsg::RebalanceQueued {});
    assert!(queued);

    // a second delegation adds to the first
    th_delegate(&mut deps, &mut chain, th_env(3, 20), USER, VAL1, 500, "aaa").unwrap();
    assert_eq!(query_delegation(&deps, VAL1).balance, Uint128::new(1_500));

    let delegations: Vec<DelegationResponse> = th_query(
        deps.as_ref(),
        QueryMsg::DelegatorDelegations {
            delegator: USER.to_string(),
            start_after: None,
            limit: None,
        },
    );
    assert_eq!(delegations.len(), 1);
    assert_eq!(delegations[0].validator, VAL1);
}

#[test]
fn delegate_checks_asset_amount_and_validator() {
    let (mut deps, mut chain) = setup();

    let err = th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, VAL1, 1_000, "bbb")
        .unwrap_err();
    assert_eq!(
        err,
        ContractError::UnknownAsset {
            denom: "bbb".to_string()
        }
    );

    let err =
        th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, VAL1, 0, "aaa").unwrap_err();
    assert_eq!(err, ContractError::InvalidAmount {});

    let err = th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, "nobody", 1_000, "aaa")
        .unwrap_err();
    assert_eq!(
        err,
        ContractError::UnknownValidator {
            validator: "nobody".to_string()
        }
    );
}

#[test]
fn messages_do_not_accept_funds() {
    let (mut deps, mut chain) = setup();
    let err = execute(
        deps.as_mut(),
        th_env(2, 10),
        mock_info_with_funds(USER, &[coin(1_000, "aaa")]),
        &mut chain,
        ExecuteMsg::Delegate {
            validator: VAL1.to_string(),
            amount: coin(1_000, "aaa"),
        },
    )
    .unwrap_err();
    assert_eq!(err, ContractError::Payment(PaymentError::NonPayable {}));
}

#[test]
fn undelegate_releases_tokens_after_unbonding() {
    let (mut deps, mut chain) = setup();
    th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, VAL1, 1_000, "aaa").unwrap();

    let err = th_undelegate(&mut deps, &mut chain, th_env(3, 20), USER, VAL1, 1_001, "aaa")
        .unwrap_err();
    assert_eq!(
        err,
        ContractError::InsufficientTokens {
            available: "1000".to_string(),
            requested: "1001".to_string(),
        }
    );

    let res =
        th_undelegate(&mut deps, &mut chain, th_env(3, 20), USER, VAL1, 400, "aaa").unwrap();
    let data: UnbondingResponse = from_json(res.data.unwrap()).unwrap();
    assert_eq!(data.completion_time, GENESIS_TIME + 20 + UNBONDING_TIME);

    assert_eq!(query_delegation(&deps, VAL1).balance, Uint128::new(600));
    assert_eq!(query_alliance(&deps).total_tokens, Uint128::new(600));

    // not matured yet
    th_end_block(&mut deps, &mut chain, th_env(4, 19 + UNBONDING_TIME));
    assert_eq!(chain.balance(USER, "aaa"), Uint128::zero());

    let res = th_end_block(&mut deps, &mut chain, th_env(5, 20 + UNBONDING_TIME));
    assert!(res.events.iter().any(|e| e.ty == "alliance/complete_undelegation"));
    assert_eq!(chain.balance(USER, "aaa"), Uint128::new(400));
    assert_eq!(chain.balance(ALLIANCE_MODULE, "aaa"), Uint128::new(600));

    // paid once only
    th_end_block(&mut deps, &mut chain, th_env(6, 30 + UNBONDING_TIME));
    assert_eq!(chain.balance(USER, "aaa"), Uint128::new(400));
}

#[test]
fn full_undelegation_clears_the_share_pools() {
    let (mut deps, mut chain) = setup();
    th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, VAL1, 1_000, "aaa").unwrap();
    th_undelegate(&mut deps, &mut chain, th_env(3, 20), USER, VAL1, 1_000, "aaa").unwrap();

    let err = query_delegation_err(&deps);
    assert!(matches!(err, ContractError::DelegationNotFound { .. }));

    let validator: ValidatorResponse = th_query(
        deps.as_ref(),
        QueryMsg::Validator {
            validator: VAL1.to_string(),
        },
    );
    assert!(validator.total_delegator_shares.is_empty());
    assert!(validator.validator_shares.is_empty());

    let asset = query_alliance(&deps);
    assert!(asset.total_tokens.is_zero());
    assert!(asset.total_validator_shares.is_zero());

    let err =
        th_undelegate(&mut deps, &mut chain, th_env(4, 30), USER, VAL1, 1, "aaa").unwrap_err();
    assert!(matches!(err, ContractError::DelegationNotFound { .. }));
}

fn query_delegation_err(deps: &MockDeps) -> ContractError {
    query(
        deps.as_ref(),
        th_env(1, 0),
        QueryMsg::Delegation {
            delegator: USER.to_string(),
            validator: VAL1.to_string(),
            denom: "aaa".to_string(),
        },
    )
    .unwrap_err()
}

#[test]
fn redelegate_moves_shares_between_validators() {
    let (mut deps, mut chain) = setup();
    th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, VAL1, 1_000, "aaa").unwrap();

    let err = redelegate(&mut deps, &mut chain, 20, VAL1, VAL1, 100).unwrap_err();
    assert_eq!(err, ContractError::SelfRedelegation {});

    let res = redelegate(&mut deps, &mut chain, 20, VAL1, VAL2, 400).unwrap();
    let data: UnbondingResponse = from_json(res.data.unwrap()).unwrap();
    assert_eq!(data.completion_time, GENESIS_TIME + 20 + UNBONDING_TIME);

    assert_eq!(query_delegation(&deps, VAL1).balance, Uint128::new(600));
    assert_eq!(query_delegation(&deps, VAL2).balance, Uint128::new(400));
    // custody does not move
    assert_eq!(chain.balance(ALLIANCE_MODULE, "aaa"), Uint128::new(1_000));
    assert_eq!(query_alliance(&deps).total_tokens, Uint128::new(1_000));

    let delegations: Vec<DelegationResponse> = th_query(
        deps.as_ref(),
        QueryMsg::DelegatorDelegations {
            delegator: USER.to_string(),
            start_after: Some((VAL1.to_string(), "aaa".to_string())),
            limit: None,
        },
    );
    assert_eq!(delegations.len(), 1);
    assert_eq!(delegations[0].validator, VAL2);
}

#[test]
fn redelegated_tokens_are_locked_until_maturity() {
    let (mut deps, mut chain) = setup();
    th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, VAL1, 1_000, "aaa").unwrap();
    redelegate(&mut deps, &mut chain, 20, VAL1, VAL2, 400).unwrap();

    chain.add_validator(VAL3, ValidatorStatus::Bonded, 1_000_000);
    let err = redelegate(&mut deps, &mut chain, 30, VAL2, VAL3, 100).unwrap_err();
    assert_eq!(
        err,
        ContractError::RedelegationInProgress {
            validator: VAL2.to_string(),
            completion_time: GENESIS_TIME + 20 + UNBONDING_TIME,
        }
    );

    // val1 did not receive a redelegation
    redelegate(&mut deps, &mut chain, 30, VAL1, VAL3, 100).unwrap();

    th_end_block(&mut deps, &mut chain, th_env(11, 20 + UNBONDING_TIME));
    redelegate(&mut deps, &mut chain, 21 + UNBONDING_TIME, VAL2, VAL3, 100).unwrap();
    assert_eq!(query_delegation(&deps, VAL3).balance, Uint128::new(200));
}

#[test]
fn amounts_with_eighteen_decimals_are_delegated_and_rewarded() {
    // 1_000 tokens of an asset with 18 decimals
    const AMOUNT: u128 = 1_000_000_000_000_000_000_000;
    let (mut deps, mut chain) = setup();

    let res =
        th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, VAL1, AMOUNT, "aaa").unwrap();
    let data: DelegateResponse = from_json(res.data.unwrap()).unwrap();
    assert_eq!(data.shares, Decimal256::from_ratio(AMOUNT, 1u128));
    assert_eq!(query_delegation(&deps, VAL1).balance, Uint128::new(AMOUNT));
    assert_eq!(query_alliance(&deps).total_tokens, Uint128::new(AMOUNT));

    th_end_block(&mut deps, &mut chain, th_env(3, 60));
    chain.accrue_rewards(VAL1, &[coin(1_000_000, "stake")]);
    th_claim(&mut deps, &mut chain, th_env(4, 70), USER, VAL1, "aaa").unwrap();
    assert_eq!(chain.balance(USER, "stake"), Uint128::new(1_000_000));

    th_undelegate(&mut deps, &mut chain, th_env(5, 80), USER, VAL1, AMOUNT / 4, "aaa").unwrap();
    assert_eq!(query_delegation(&deps, VAL1).balance, Uint128::new(AMOUNT / 4 * 3));
    assert_eq!(
        query_alliance(&deps).total_validator_shares,
        Decimal256::from_ratio(AMOUNT / 4 * 3, 1u128)
    );
}

#[test]
fn delegator_delegations_page_through_validators_and_denoms() {
    let (mut deps, mut chain) = setup();
    th_create_alliance(&mut deps, &mut chain, th_env(1, 0), "bbb", dec("1"), Decimal::zero());
    th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, VAL2, 300, "aaa").unwrap();
    th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, VAL1, 200, "bbb").unwrap();
    th_delegate(&mut deps, &mut chain, th_env(2, 10), USER, VAL1, 100, "aaa").unwrap();
    th_delegate(&mut deps, &mut chain, th_env(2, 10), "other", VAL1, 900, "aaa").unwrap();

    let page = |start_after: Option<(&str, &str)>, limit: u32| {
        let delegations: Vec<DelegationResponse> = th_query(
            deps.as_ref(),
            QueryMsg::DelegatorDelegations {
                delegator: USER.to_string(),
                start_after: start_after.map(|(v, d)| (v.to_string(), d.to_string())),
                limit: Some(limit),
            },
        );
        delegations
            .into_iter()
            .map(|d| format!("{}/{}/{}", d.validator, d.denom, d.balance))
            .collect::<Vec<_>>()
    };

    assert_eq!(page(None, 2), vec!["val1/aaa/100", "val1/bbb/200"]);
    assert_eq!(page(Some((VAL1, "aaa")), 2), vec!["val1/bbb/200", "val2/aaa/300"]);
    assert_eq!(page(Some((VAL1, "bbb")), 2), vec!["val2/aaa/300"]);
    assert!(page(Some((VAL2, "aaa")), 2).is_empty());
}
