//! Refund vault: custody of contributed funds until the sale resolves.
//!
//! Funds sit in the sale contract's own balance of the native asset. The
//! vault tracks what each contributor paid and, once the sale is finalized,
//! either forwards everything to the beneficiary or lets every contributor
//! pull their deposit back.

use soroban_sdk::{contracttype, token, Address, Env};

use crate::{events, ContractError, DataKey};

const DEPOSIT_TTL_THRESHOLD: u32 = 17_280 * 7;
const DEPOSIT_TTL_EXTEND_TO: u32 = 17_280 * 30;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum VaultState {
    /// Accepting deposits; the outcome of the sale is not known yet.
    Active,
    /// Goal missed: contributors may claim their deposits back.
    Refunding,
    /// Goal reached: funds were forwarded to the beneficiary.
    Closed,
}

pub(crate) fn open(env: &Env) {
    env.storage()
        .instance()
        .set(&DataKey::VaultState, &VaultState::Active);
    env.storage().instance().set(&DataKey::VaultBalance, &0i128);
}

pub(crate) fn state(env: &Env) -> Result<VaultState, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::VaultState)
        .ok_or(ContractError::NotInitialized)
}

pub(crate) fn balance(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::VaultBalance)
        .unwrap_or(0)
}

pub(crate) fn deposited_of(env: &Env, contributor: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Deposit(contributor.clone()))
        .unwrap_or(0)
}

/// Records funds that were already moved into the contract's balance.
pub(crate) fn deposit(env: &Env, contributor: &Address, amount: i128) -> Result<(), ContractError> {
    match state(env)? {
        VaultState::Active => {}
        VaultState::Refunding | VaultState::Closed => return Err(ContractError::AlreadyResolved),
    }

    let recorded = deposited_of(env, contributor)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let total = balance(env)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;

    write_deposit(env, contributor, recorded);
    env.storage().instance().set(&DataKey::VaultBalance, &total);
    Ok(())
}

/// Forwards the whole balance to `beneficiary`. No refunds are possible
/// afterwards.
pub(crate) fn close(
    env: &Env,
    native_token: &Address,
    beneficiary: &Address,
) -> Result<(), ContractError> {
    match state(env)? {
        VaultState::Active => {
            let amount = balance(env);
            env.storage()
                .instance()
                .set(&DataKey::VaultState, &VaultState::Closed);
            env.storage().instance().set(&DataKey::VaultBalance, &0i128);

            if amount > 0 {
                token::Client::new(env, native_token).transfer(
                    &env.current_contract_address(),
                    beneficiary,
                    &amount,
                );
            }

            events::vault_closed(env, beneficiary, amount);
            Ok(())
        }
        VaultState::Refunding | VaultState::Closed => Err(ContractError::AlreadyResolved),
    }
}

pub(crate) fn enable_refunds(env: &Env) -> Result<(), ContractError> {
    match state(env)? {
        VaultState::Active => {
            env.storage()
                .instance()
                .set(&DataKey::VaultState, &VaultState::Refunding);
            events::refunds_enabled(env);
            Ok(())
        }
        VaultState::Refunding | VaultState::Closed => Err(ContractError::AlreadyResolved),
    }
}

/// Pays a contributor back everything they deposited and returns the amount.
pub(crate) fn refund(
    env: &Env,
    native_token: &Address,
    contributor: &Address,
) -> Result<i128, ContractError> {
    match state(env)? {
        VaultState::Refunding => {}
        VaultState::Active | VaultState::Closed => return Err(ContractError::RefundsNotEnabled),
    }

    let amount = deposited_of(env, contributor);
    if amount <= 0 {
        return Err(ContractError::NothingToRefund);
    }

    // Zero the entry before paying out.
    write_deposit(env, contributor, 0);
    env.storage()
        .instance()
        .set(&DataKey::VaultBalance, &(balance(env) - amount));

    token::Client::new(env, native_token).transfer(
        &env.current_contract_address(),
        contributor,
        &amount,
    );

    events::refunded(env, contributor, amount);
    Ok(amount)
}

fn write_deposit(env: &Env, contributor: &Address, amount: i128) {
    let key = DataKey::Deposit(contributor.clone());
    env.storage().persistent().set(&key, &amount);
    env.storage()
        .persistent()
        .extend_ttl(&key, DEPOSIT_TTL_THRESHOLD, DEPOSIT_TTL_EXTEND_TO);
}
