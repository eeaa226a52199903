#![no_std]
#![allow(missing_docs)]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, String, Symbol,
};

#[cfg(test)]
mod test;

const BALANCE_TTL_THRESHOLD: u32 = 17_280 * 7;
const BALANCE_TTL_EXTEND_TO: u32 = 17_280 * 30;

const EVENT_MINT: Symbol = symbol_short!("mint");
const EVENT_MINT_DONE: Symbol = symbol_short!("mint_done");
const EVENT_OWNER_SET: Symbol = symbol_short!("owner_set");
const EVENT_TRANSFER: Symbol = symbol_short!("transfer");

// ── Data Types ──────────────────────────────────────────────────────────────

#[derive(Clone)]
#[contracttype]
pub struct TokenMetadata {
    pub decimals: u32,
    pub name: String,
    pub symbol: String,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Administrator allowed to mint and to hand over ownership.
    Owner,
    /// Hard limit on total supply.
    Cap,
    /// Tokens minted so far.
    TotalSupply,
    /// Set once by `finish_minting`, never cleared.
    MintingFinished,
    Metadata,
    /// Balance of a single holder.
    Balance(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TokenError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    MintingFinished = 3,
    CapExceeded = 4,
    InvalidAmount = 5,
    InsufficientBalance = 6,
}

// ── Contract ────────────────────────────────────────────────────────────────

/// Capped, mintable token whose minting can be permanently switched off.
///
/// The crowdsale controller holds ownership of this ledger for the duration
/// of the sale and hands it back after finalization.
#[contract]
pub struct CappedToken;

#[contractimpl]
impl CappedToken {
    /// Creates the ledger with a fixed supply cap.
    pub fn initialize(
        env: Env,
        owner: Address,
        cap: i128,
        decimals: u32,
        name: String,
        symbol: String,
    ) -> Result<(), TokenError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(TokenError::AlreadyInitialized);
        }
        if cap <= 0 {
            return Err(TokenError::InvalidAmount);
        }

        owner.require_auth();

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Cap, &cap);
        env.storage().instance().set(&DataKey::TotalSupply, &0i128);
        env.storage().instance().set(&DataKey::MintingFinished, &false);
        env.storage().instance().set(
            &DataKey::Metadata,
            &TokenMetadata {
                decimals,
                name,
                symbol,
            },
        );

        Ok(())
    }

    /// Mints `amount` new tokens to `to`. Owner only.
    ///
    /// Fails once minting has been finished or when the total supply would
    /// exceed the cap.
    pub fn mint(env: Env, to: Address, amount: i128) -> Result<(), TokenError> {
        let owner = read_owner(&env)?;
        owner.require_auth();

        if amount < 0 {
            return Err(TokenError::InvalidAmount);
        }
        if Self::minting_finished(env.clone()) {
            return Err(TokenError::MintingFinished);
        }

        let cap: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Cap)
            .ok_or(TokenError::NotInitialized)?;
        let supply = Self::total_supply(env.clone());
        let new_supply = supply
            .checked_add(amount)
            .ok_or(TokenError::CapExceeded)?;
        if new_supply > cap {
            return Err(TokenError::CapExceeded);
        }

        env.storage().instance().set(&DataKey::TotalSupply, &new_supply);
        write_balance(&env, &to, read_balance(&env, &to) + amount);

        env.events().publish((EVENT_MINT, to), amount);
        Ok(())
    }

    /// Permanently disables minting. Calling it again is a no-op.
    pub fn finish_minting(env: Env) -> Result<(), TokenError> {
        let owner = read_owner(&env)?;
        owner.require_auth();

        if !Self::minting_finished(env.clone()) {
            env.storage().instance().set(&DataKey::MintingFinished, &true);
            env.events().publish((EVENT_MINT_DONE,), ());
        }
        Ok(())
    }

    pub fn transfer_ownership(env: Env, new_owner: Address) -> Result<(), TokenError> {
        let owner = read_owner(&env)?;
        owner.require_auth();

        env.storage().instance().set(&DataKey::Owner, &new_owner);
        env.events().publish((EVENT_OWNER_SET, owner), new_owner);
        Ok(())
    }

    /// Moves tokens between holders. The sender must authorize.
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), TokenError> {
        from.require_auth();

        if amount < 0 {
            return Err(TokenError::InvalidAmount);
        }
        let from_balance = read_balance(&env, &from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance);
        }

        write_balance(&env, &from, from_balance - amount);
        write_balance(&env, &to, read_balance(&env, &to) + amount);

        env.events().publish((EVENT_TRANSFER, from, to), amount);
        Ok(())
    }

    // ── View helpers ────────────────────────────────────────────────────

    pub fn cap(env: Env) -> i128 {
        env.storage().instance().get(&DataKey::Cap).unwrap_or(0)
    }

    pub fn total_supply(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0)
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        read_balance(&env, &id)
    }

    pub fn minting_finished(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::MintingFinished)
            .unwrap_or(false)
    }

    pub fn owner(env: Env) -> Result<Address, TokenError> {
        read_owner(&env)
    }

    pub fn decimals(env: Env) -> Result<u32, TokenError> {
        Ok(read_metadata(&env)?.decimals)
    }

    pub fn name(env: Env) -> Result<String, TokenError> {
        Ok(read_metadata(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, TokenError> {
        Ok(read_metadata(&env)?.symbol)
    }
}

fn read_owner(env: &Env) -> Result<Address, TokenError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(TokenError::NotInitialized)
}

fn read_metadata(env: &Env) -> Result<TokenMetadata, TokenError> {
    env.storage()
        .instance()
        .get(&DataKey::Metadata)
        .ok_or(TokenError::NotInitialized)
}

fn read_balance(env: &Env, id: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(id.clone()))
        .unwrap_or(0)
}

fn write_balance(env: &Env, id: &Address, amount: i128) {
    let key = DataKey::Balance(id.clone());
    env.storage().persistent().set(&key, &amount);
    env.storage()
        .persistent()
        .extend_ttl(&key, BALANCE_TTL_THRESHOLD, BALANCE_TTL_EXTEND_TO);
}
