use alliance::contract::sudo;
use alliance_types::{
    asset::AllianceAsset,
    msg::{QueryMsg, RewardWeightSnapshotResponse, SudoMsg, ValidatorResponse},
};
use cosmwasm_std::{coin, Decimal, Response};

use super::helpers::{
    dec, th_claim, th_create_alliance, th_delegate, th_end_block, th_env, th_query, th_setup,
    th_update_weight, MockDeps, REWARD_DELAY, VAL1, VAL2,
};

fn query_alliance(deps: &MockDeps) -> AllianceAsset {
    th_query(
        deps.as_ref(),
        QueryMsg::Alliance {
            denom: "aaa".to_string(),
        },
    )
}

fn query_snapshots(deps: &MockDeps, validator: &str) -> Vec<RewardWeightSnapshotResponse> {
    th_query(
        deps.as_ref(),
        QueryMsg::RewardWeightSnapshots {
            denom: "aaa".to_string(),
            validator: validator.to_string(),
            start_height: None,
            limit: None,
        },
    )
}

fn event_position(res: &Response, ty: &str) -> Option<usize> {
    res.events.iter().position(|event| event.ty == ty)
}

#[test]
fn assets_are_initialized_once_their_rewards_start() {
    let (mut deps, mut chain) = th_setup();
    th_create_alliance(&mut deps, &mut chain, th_env(1, 0), "aaa", dec("1"), Decimal::zero());

    let res = th_end_block(&mut deps, &mut chain, th_env(2, REWARD_DELAY - 1));
    assert_eq!(event_position(&res, "alliance/initialize_asset"), None);
    assert!(!query_alliance(&deps).is_initialized);
    assert!(query_snapshots(&deps, VAL1).is_empty());

    let res = th_end_block(&mut deps, &mut chain, th_env(3, REWARD_DELAY));
    let event = &res.events[event_position(&res, "alliance/initialize_asset").unwrap()];
    assert!(event.attributes.iter().any(|a| a.key == "snapshots" && a.value == "2"));
    assert!(query_alliance(&deps).is_initialized);

    // one zero weight snapshot per validator closes the warm-up
    for validator in [VAL1, VAL2] {
        let snapshots = query_snapshots(&deps, validator);
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].height, 3);
        assert_eq!(snapshots[0].snapshot.prev_reward_weight, Decimal::zero());
    }

    let res = th_end_block(&mut deps, &mut chain, th_env(4, REWARD_DELAY + 10));
    assert_eq!(event_position(&res, "alliance/initialize_asset"), None);
    assert_eq!(query_snapshots(&deps, VAL1).len(), 1);
}

#[test]
fn activation_runs_before_the_rebalance() {
    let (mut deps, mut chain) = th_setup();
    th_create_alliance(&mut deps, &mut chain, th_env(1, 0), "aaa", dec("1"), Decimal::zero());
    th_delegate(&mut deps, &mut chain, th_env(2, 0), "user1", VAL1, 1_000_000, "aaa").unwrap();

    let res = th_end_block(&mut deps, &mut chain, th_env(3, REWARD_DELAY));
    assert!(res.attributes.iter().any(|a| a.key == "action" && a.value == "end_block"));

    let initialize = event_position(&res, "alliance/initialize_asset").unwrap();
    let rebalance = event_position(&res, "alliance/rebalance").unwrap();
    assert!(initialize < rebalance);
}

#[test]
fn validator_created_resets_the_validator_account() {
    let (mut deps, mut chain) = th_setup();
    th_create_alliance(&mut deps, &mut chain, th_env(1, 0), "aaa", dec("1"), Decimal::zero());
    th_delegate(&mut deps, &mut chain, th_env(2, 0), "user1", VAL1, 1_000_000, "aaa").unwrap();
    th_end_block(&mut deps, &mut chain, th_env(3, REWARD_DELAY));

    chain.accrue_rewards(VAL1, &[coin(1_000_000, "stake")]);
    th_claim(&mut deps, &mut chain, th_env(4, REWARD_DELAY + 10), "user1", VAL1, "aaa").unwrap();

    let validator: ValidatorResponse = th_query(
        deps.as_ref(),
        QueryMsg::Validator {
            validator: VAL1.to_string(),
        },
    );
    assert!(!validator.global_reward_indices.is_empty());
    assert!(!validator.validator_shares.is_empty());

    let res = sudo(
        deps.as_mut(),
        th_env(5, REWARD_DELAY + 20),
        &mut chain,
        SudoMsg::ValidatorCreated {
            validator: VAL1.to_string(),
        },
    )
    .unwrap();
    assert_eq!(res.events[0].ty, "alliance/validator_created");

    let validator: ValidatorResponse = th_query(
        deps.as_ref(),
        QueryMsg::Validator {
            validator: VAL1.to_string(),
        },
    );
    assert!(validator.global_reward_indices.is_empty());
    assert!(validator.total_delegator_shares.is_empty());
    assert!(validator.validator_shares.is_empty());
}

#[test]
fn snapshot_pages_keep_a_height_together() {
    let (mut deps, mut chain) = th_setup();
    th_create_alliance(&mut deps, &mut chain, th_env(1, 0), "aaa", dec("1"), Decimal::zero());
    th_end_block(&mut deps, &mut chain, th_env(3, REWARD_DELAY));
    th_update_weight(&mut deps, &mut chain, th_env(4, REWARD_DELAY + 10), "aaa", dec("2"))
        .unwrap();
    th_update_weight(&mut deps, &mut chain, th_env(4, REWARD_DELAY + 10), "aaa", dec("3"))
        .unwrap();
    th_update_weight(&mut deps, &mut chain, th_env(5, REWARD_DELAY + 20), "aaa", dec("4"))
        .unwrap();

    let page = |start_height: Option<u64>| -> Vec<(u64, Decimal)> {
        let snapshots: Vec<RewardWeightSnapshotResponse> = th_query(
            deps.as_ref(),
            QueryMsg::RewardWeightSnapshots {
                denom: "aaa".to_string(),
                validator: VAL1.to_string(),
                start_height,
                limit: Some(1),
            },
        );
        snapshots.into_iter().map(|s| (s.height, s.snapshot.prev_reward_weight)).collect()
    };

    assert_eq!(page(None), vec![(3, Decimal::zero())]);
    // both changes at height 4 come back together, past the limit
    assert_eq!(page(Some(4)), vec![(4, dec("1")), (4, dec("2"))]);
    assert_eq!(page(Some(5)), vec![(5, dec("3"))]);
    assert!(page(Some(6)).is_empty());
}
