#![cfg(test)]

use soroban_sdk::{
    testutils::{Address as _, MockAuth, MockAuthInvoke},
    Address, Env, IntoVal, String,
};

use crate::{CappedToken, CappedTokenClient, TokenError};

const CAP: i128 = 1_000_000;

fn setup_env() -> (Env, CappedTokenClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(CappedToken, ());
    let client = CappedTokenClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(
        &owner,
        &CAP,
        &7,
        &String::from_str(&env, "Sale Token"),
        &String::from_str(&env, "SALE"),
    );

    (env, client, owner)
}

#[test]
fn test_initialize() {
    let (env, client, owner) = setup_env();

    assert_eq!(client.owner(), owner);
    assert_eq!(client.cap(), CAP);
    assert_eq!(client.total_supply(), 0);
    assert_eq!(client.decimals(), 7);
    assert_eq!(client.symbol(), String::from_str(&env, "SALE"));
    assert!(!client.minting_finished());
}

#[test]
fn test_double_initialize_rejected() {
    let (env, client, owner) = setup_env();

    let result = client.try_initialize(
        &owner,
        &CAP,
        &7,
        &String::from_str(&env, "Other"),
        &String::from_str(&env, "OTH"),
    );
    assert_eq!(result.unwrap_err().unwrap(), TokenError::AlreadyInitialized);
}

#[test]
fn test_mint_up_to_cap() {
    let (env, client, _owner) = setup_env();
    let holder = Address::generate(&env);

    client.mint(&holder, &(CAP - 1));
    client.mint(&holder, &1);

    assert_eq!(client.balance(&holder), CAP);
    assert_eq!(client.total_supply(), CAP);

    let result = client.try_mint(&holder, &1);
    assert_eq!(result.unwrap_err().unwrap(), TokenError::CapExceeded);
}

#[test]
fn test_mint_fails_after_finish_minting() {
    let (env, client, _owner) = setup_env();
    let holder = Address::generate(&env);

    client.mint(&holder, &10);
    client.finish_minting();
    assert!(client.minting_finished());

    // Finishing again is harmless.
    client.finish_minting();
    assert!(client.minting_finished());

    let result = client.try_mint(&holder, &1);
    assert_eq!(result.unwrap_err().unwrap(), TokenError::MintingFinished);
    assert_eq!(client.balance(&holder), 10);
}

#[test]
fn test_negative_mint_rejected() {
    let (env, client, _owner) = setup_env();
    let holder = Address::generate(&env);

    let result = client.try_mint(&holder, &-5);
    assert_eq!(result.unwrap_err().unwrap(), TokenError::InvalidAmount);
}

#[test]
fn test_transfer_ownership() {
    let (env, client, _owner) = setup_env();
    let next = Address::generate(&env);

    client.transfer_ownership(&next);
    assert_eq!(client.owner(), next);
}

#[test]
fn test_transfer_between_holders() {
    let (env, client, _owner) = setup_env();
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);

    client.mint(&alice, &500);
    client.transfer(&alice, &bob, &200);

    assert_eq!(client.balance(&alice), 300);
    assert_eq!(client.balance(&bob), 200);

    let result = client.try_transfer(&alice, &bob, &301);
    assert_eq!(result.unwrap_err().unwrap(), TokenError::InsufficientBalance);
}

#[test]
fn test_mint_requires_owner_auth() {
    let env = Env::default();
    let contract_id = env.register(CappedToken, ());
    let client = CappedTokenClient::new(&env, &contract_id);
    let owner = Address::generate(&env);
    let name = String::from_str(&env, "Sale Token");
    let symbol = String::from_str(&env, "SALE");

    client
        .mock_auths(&[MockAuth {
            address: &owner,
            invoke: &MockAuthInvoke {
                contract: &contract_id,
                fn_name: "initialize",
                args: (owner.clone(), CAP, 7u32, name.clone(), symbol.clone()).into_val(&env),
                sub_invokes: &[],
            },
        }])
        .initialize(&owner, &CAP, &7, &name, &symbol);

    // Nobody signs for the owner here.
    let holder = Address::generate(&env);
    assert!(client.try_mint(&holder, &1).is_err());
    assert_eq!(client.total_supply(), 0);
}
