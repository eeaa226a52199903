#![no_std]
#![allow(missing_docs)]

use soroban_sdk::{contract, contracterror, contractimpl, contracttype, token, Address, Env, Vec};

mod bonus;
mod events;
mod ledger;
mod vault;

pub use bonus::{BonusSchedule, NO_BONUS_PERCENT};
pub use ledger::{MintableTokenClient, MintableTokenInterface};
pub use vault::VaultState;

#[cfg(test)]
extern crate std;



// ── Constants ───────────────────────────────────────────────────────────────

/// Contract version constant.
///
/// Must be incremented with every contract upgrade so external tools can
/// detect logic changes at a given contract address.
const CONTRACT_VERSION: u32 = 1;

/// Base units in one whole unit of the native asset (stroops per lumen).
pub const NATIVE_UNIT: i128 = 10_000_000;

/// Smallest accepted contribution: 0.1 native unit.
pub const MIN_CONTRIBUTION: i128 = NATIVE_UNIT / 10;

/// Fixed-point scale of the base rate `usd_per_native / usd_per_token`.
pub const RATE_SCALE: i128 = 100_000;

pub const PERCENT_BASE: i128 = 100;

/// Shares of the token cap minted at finalization.
pub const BENEFICIARY_ALLOCATION_PERCENT: i128 = 23;
pub const TEAM_ALLOCATION_PERCENT: i128 = 11;
pub const BOUNTY_ALLOCATION_PERCENT: i128 = 3;

// ── Data Types ──────────────────────────────────────────────────────────────

/// Sale parameters, fixed at initialization.
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct CrowdsaleConfig {
    /// First ledger timestamp at which contributions are accepted.
    pub opening_time: u64,
    /// Contributions are refused from this timestamp on.
    pub closing_time: u64,
    /// Price of one native unit in USD.
    pub usd_per_native: i128,
    /// Price of one token in USD, same scale as `usd_per_native`.
    pub usd_per_token: i128,
    /// Soft cap in native base units.
    pub goal: i128,
    /// Hard cap in native base units.
    pub cap: i128,
    /// Advisory target supply of the sale; not enforced.
    pub token_target_supply: i128,
    /// Beneficiary of the raised funds and of the project allocation.
    pub wallet: Address,
    /// Asset contract contributions are paid in.
    pub native_token: Address,
    /// Token ledger the sale mints into. The sale must own it.
    pub token: Address,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct AllocationWallets {
    pub team: Address,
    pub bounty: Address,
}

/// Aggregated view of the sale.
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct SaleInfo {
    pub config: CrowdsaleConfig,
    pub total_raised: i128,
    pub has_closed: bool,
    pub goal_reached: bool,
    pub finalized: bool,
    pub vault_state: VaultState,
}

/// Represents all storage keys used by the crowdsale contract.
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Operator allowed to configure the sale.
    Owner,
    /// The `CrowdsaleConfig`.
    Config,
    /// Current `BonusSchedule`.
    BonusSchedule,
    /// Team and bounty wallets, needed for finalization.
    AdditionalWallets,
    /// Total native amount accepted so far.
    TotalRaised,
    /// Set once by `finalize`.
    Finalized,
    /// Refund vault lifecycle.
    VaultState,
    /// Native funds currently held by the vault.
    VaultBalance,
    /// Cumulative deposit of a contributor.
    Deposit(Address),
}

// ── Contract Error ──────────────────────────────────────────────────────────

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidTimeWindow = 3,
    InvalidAmount = 4,
    CapBelowGoal = 5,
    Unauthorized = 6,
    InvalidSchedule = 7,
    WindowClosed = 8,
    BelowMinimum = 9,
    ScheduleNotSet = 10,
    CapExceeded = 11,
    TooEarly = 12,
    AlreadyFinalized = 13,
    WalletsNotSet = 14,
    AlreadyResolved = 15,
    RefundsNotEnabled = 16,
    NothingToRefund = 17,
    ArithmeticOverflow = 18,
}

// ── Contract ────────────────────────────────────────────────────────────────

/// Time-boxed token sale with tiered bonuses, soft and hard caps and a
/// refund vault.
#[contract]
pub struct CrowdsaleContract;

#[contractimpl]
impl CrowdsaleContract {
    /// Initializes the sale.
    ///
    /// # Arguments
    /// * `owner`  – Operator allowed to set bonuses and allocation wallets.
    /// * `config` – Sale parameters, see [`CrowdsaleConfig`].
    ///
    /// The token ledger named in `config` has to be handed over to this
    /// contract before the first contribution, since every purchase mints.
    pub fn initialize(env: Env, owner: Address, config: CrowdsaleConfig) -> Result<(), ContractError> {
        // Prevent re-initialization.
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(ContractError::AlreadyInitialized);
        }

        let now = env.ledger().timestamp();
        if config.opening_time < now || config.opening_time >= config.closing_time {
            return Err(ContractError::InvalidTimeWindow);
        }
        if config.usd_per_native <= 0
            || config.usd_per_token <= 0
            || config.goal <= 0
            || config.cap <= 0
            || config.token_target_supply <= 0
        {
            return Err(ContractError::InvalidAmount);
        }
        if config.cap < config.goal {
            return Err(ContractError::CapBelowGoal);
        }

        owner.require_auth();

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage()
            .instance()
            .set(&DataKey::BonusSchedule, &BonusSchedule::empty(&env));
        env.storage().instance().set(&DataKey::TotalRaised, &0i128);
        env.storage().instance().set(&DataKey::Finalized, &false);
        vault::open(&env);

        events::initialized(&env, &owner, config.opening_time, config.closing_time);
        Ok(())
    }

    /// Replaces the bonus schedule. Owner only.
    ///
    /// `offsets` are seconds after opening time and must be strictly
    /// increasing; `percents[i]` applies until `offsets[i]` has elapsed.
    /// Passing two empty vectors disables contributions again.
    pub fn set_bonus_times(
        env: Env,
        caller: Address,
        offsets: Vec<u64>,
        percents: Vec<u32>,
    ) -> Result<(), ContractError> {
        require_owner(&env, &caller)?;
        if is_finalized(&env) {
            return Err(ContractError::AlreadyFinalized);
        }

        let schedule = BonusSchedule::new(offsets, percents)?;
        env.storage()
            .instance()
            .set(&DataKey::BonusSchedule, &schedule);

        events::bonus_times_set(&env, schedule.len());
        Ok(())
    }

    /// Sets the team and bounty wallets used by `finalize`. Owner only.
    pub fn set_additional_wallets(
        env: Env,
        caller: Address,
        team: Address,
        bounty: Address,
    ) -> Result<(), ContractError> {
        require_owner(&env, &caller)?;
        if is_finalized(&env) {
            return Err(ContractError::AlreadyFinalized);
        }

        let wallets = AllocationWallets { team, bounty };
        env.storage()
            .instance()
            .set(&DataKey::AdditionalWallets, &wallets);

        events::wallets_set(&env, &wallets.team, &wallets.bounty);
        Ok(())
    }

    /// Contribute native funds and receive tokens at the current rate.
    ///
    /// Returns the number of tokens minted to the contributor.
    pub fn contribute(env: Env, contributor: Address, amount: i128) -> Result<i128, ContractError> {
        Self::buy_tokens(env, contributor.clone(), contributor, amount)
    }

    /// Buys tokens for `beneficiary`, paid by `purchaser`.
    ///
    /// The deposit is recorded against the purchaser, who is the one refunded
    /// if the goal is missed. A contribution that would push the raised total
    /// above the cap is rejected as a whole.
    pub fn buy_tokens(
        env: Env,
        purchaser: Address,
        beneficiary: Address,
        amount: i128,
    ) -> Result<i128, ContractError> {
        purchaser.require_auth();

        let config = read_config(&env)?;
        let now = env.ledger().timestamp();
        let raised = read_total_raised(&env);

        if is_finalized(&env) || !is_open(&config, now, raised) {
            return Err(ContractError::WindowClosed);
        }
        if amount < MIN_CONTRIBUTION {
            return Err(ContractError::BelowMinimum);
        }

        let bonus_percent = read_schedule(&env)
            .percent_at(now - config.opening_time)
            .ok_or(ContractError::ScheduleNotSet)?;

        let new_raised = raised
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        if new_raised > config.cap {
            return Err(ContractError::CapExceeded);
        }

        let tokens = token_amount(
            amount,
            config.usd_per_native,
            config.usd_per_token,
            bonus_percent,
        )?;

        // Pull the funds into custody, then mint against them.
        token::Client::new(&env, &config.native_token).transfer(
            &purchaser,
            &env.current_contract_address(),
            &amount,
        );
        MintableTokenClient::new(&env, &config.token).mint(&beneficiary, &tokens);

        vault::deposit(&env, &purchaser, amount)?;
        env.storage().instance().set(&DataKey::TotalRaised, &new_raised);

        events::token_purchase(&env, &purchaser, &beneficiary, amount, tokens);
        Ok(tokens)
    }

    /// Resolves the sale. Callable by anyone, exactly once, after closing.
    ///
    /// If the goal was reached the vault forwards all funds to the wallet,
    /// otherwise refunds are opened. In both cases 23% / 11% / 3% of the
    /// token cap are minted to the wallet / team / bounty, minting is
    /// switched off for good and token ownership returns to the operator.
    pub fn finalize(env: Env) -> Result<(), ContractError> {
        if is_finalized(&env) {
            return Err(ContractError::AlreadyFinalized);
        }

        let config = read_config(&env)?;
        let raised = read_total_raised(&env);
        if !has_closed(&config, env.ledger().timestamp(), raised) {
            return Err(ContractError::TooEarly);
        }

        let wallets: AllocationWallets = env
            .storage()
            .instance()
            .get(&DataKey::AdditionalWallets)
            .ok_or(ContractError::WalletsNotSet)?;
        let owner = read_owner(&env)?;

        let goal_reached = raised >= config.goal;
        if goal_reached {
            vault::close(&env, &config.native_token, &config.wallet)?;
        } else {
            vault::enable_refunds(&env)?;
        }

        let token = MintableTokenClient::new(&env, &config.token);
        let token_cap = token.cap();
        token.mint(
            &config.wallet,
            &allocation(token_cap, BENEFICIARY_ALLOCATION_PERCENT)?,
        );
        token.mint(&wallets.team, &allocation(token_cap, TEAM_ALLOCATION_PERCENT)?);
        token.mint(
            &wallets.bounty,
            &allocation(token_cap, BOUNTY_ALLOCATION_PERCENT)?,
        );
        token.finish_minting();
        token.transfer_ownership(&owner);

        env.storage().instance().set(&DataKey::Finalized, &true);

        events::finalized(&env, raised, goal_reached);
        Ok(())
    }

    /// Refund a contributor, pull-based.
    ///
    /// Only possible after finalization when the goal was missed. Pays back
    /// the full cumulative deposit and returns it; a second claim fails with
    /// `NothingToRefund`.
    pub fn claim_refund(env: Env, contributor: Address) -> Result<i128, ContractError> {
        contributor.require_auth();

        let config = read_config(&env)?;
        vault::refund(&env, &config.native_token, &contributor)
    }

    /// Hands the operator role to `new_owner`. Owner only.
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), ContractError> {
        require_owner(&env, &caller)?;

        env.storage().instance().set(&DataKey::Owner, &new_owner);
        events::ownership_transferred(&env, &caller, &new_owner);
        Ok(())
    }

    // ── View helpers ────────────────────────────────────────────────────

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        read_owner(&env)
    }

    pub fn opening_time(env: Env) -> Result<u64, ContractError> {
        Ok(read_config(&env)?.opening_time)
    }

    pub fn closing_time(env: Env) -> Result<u64, ContractError> {
        Ok(read_config(&env)?.closing_time)
    }

    pub fn usd_per_token(env: Env) -> Result<i128, ContractError> {
        Ok(read_config(&env)?.usd_per_token)
    }

    pub fn usd_per_native(env: Env) -> Result<i128, ContractError> {
        Ok(read_config(&env)?.usd_per_native)
    }

    /// Base rate without bonus, scaled by `RATE_SCALE` and truncated.
    /// Purchases do not use this truncated value.
    pub fn rate(env: Env) -> Result<i128, ContractError> {
        let config = read_config(&env)?;
        let scaled = config
            .usd_per_native
            .checked_mul(RATE_SCALE)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Ok(scaled / config.usd_per_token)
    }

    /// Returns the beneficiary wallet.
    pub fn wallet(env: Env) -> Result<Address, ContractError> {
        Ok(read_config(&env)?.wallet)
    }

    pub fn goal(env: Env) -> Result<i128, ContractError> {
        Ok(read_config(&env)?.goal)
    }

    pub fn cap(env: Env) -> Result<i128, ContractError> {
        Ok(read_config(&env)?.cap)
    }

    pub fn token(env: Env) -> Result<Address, ContractError> {
        Ok(read_config(&env)?.token)
    }

    pub fn native_token(env: Env) -> Result<Address, ContractError> {
        Ok(read_config(&env)?.native_token)
    }

    pub fn token_target_supply(env: Env) -> Result<i128, ContractError> {
        Ok(read_config(&env)?.token_target_supply)
    }

    pub fn min_contribution(_env: Env) -> i128 {
        MIN_CONTRIBUTION
    }

    pub fn total_raised(env: Env) -> i128 {
        read_total_raised(&env)
    }

    pub fn has_started(env: Env) -> Result<bool, ContractError> {
        Ok(env.ledger().timestamp() >= read_config(&env)?.opening_time)
    }

    /// True once the closing time has passed or the cap has been reached.
    pub fn has_closed(env: Env) -> Result<bool, ContractError> {
        let config = read_config(&env)?;
        Ok(has_closed(
            &config,
            env.ledger().timestamp(),
            read_total_raised(&env),
        ))
    }

    pub fn goal_reached(env: Env) -> Result<bool, ContractError> {
        Ok(read_total_raised(&env) >= read_config(&env)?.goal)
    }

    pub fn cap_reached(env: Env) -> Result<bool, ContractError> {
        Ok(read_total_raised(&env) >= read_config(&env)?.cap)
    }

    pub fn is_finalized(env: Env) -> bool {
        is_finalized(&env)
    }

    pub fn get_bonus_times(env: Env) -> Vec<u64> {
        read_schedule(&env).offsets
    }

    pub fn get_bonus_times_percents(env: Env) -> Vec<u32> {
        read_schedule(&env).percents
    }

    /// Percent a contribution made right now would receive, or `None`
    /// outside the sale window or while no schedule is set.
    pub fn current_bonus_percent(env: Env) -> Result<Option<u32>, ContractError> {
        let config = read_config(&env)?;
        let now = env.ledger().timestamp();
        if now < config.opening_time || now >= config.closing_time {
            return Ok(None);
        }
        Ok(read_schedule(&env).percent_at(now - config.opening_time))
    }

    pub fn additional_wallets(env: Env) -> Option<AllocationWallets> {
        env.storage().instance().get(&DataKey::AdditionalWallets)
    }

    /// Returns the native amount held for a contributor.
    pub fn deposited_of(env: Env, contributor: Address) -> i128 {
        vault::deposited_of(&env, &contributor)
    }

    pub fn vault_state(env: Env) -> Result<VaultState, ContractError> {
        vault::state(&env)
    }

    pub fn vault_balance(env: Env) -> i128 {
        vault::balance(&env)
    }

    /// Returns complete sale information in a single call.
    pub fn sale_info(env: Env) -> Result<SaleInfo, ContractError> {
        let config = read_config(&env)?;
        let total_raised = read_total_raised(&env);
        let has_closed = has_closed(&config, env.ledger().timestamp(), total_raised);
        let goal_reached = total_raised >= config.goal;

        Ok(SaleInfo {
            config,
            total_raised,
            has_closed,
            goal_reached,
            finalized: is_finalized(&env),
            vault_state: vault::state(&env)?,
        })
    }

    /// Returns the contract version.
    pub fn version(_env: Env) -> u32 {
        CONTRACT_VERSION
    }
}

// ── Internals ───────────────────────────────────────────────────────────────

/// Tokens bought with `amount` native base units at `bonus_percent`.
///
/// All numerators are multiplied before the single division, so the result
/// is truncated exactly once.
pub fn token_amount(
    amount: i128,
    usd_per_native: i128,
    usd_per_token: i128,
    bonus_percent: u32,
) -> Result<i128, ContractError> {
    let numerator = amount
        .checked_mul(usd_per_native)
        .and_then(|v| v.checked_mul(RATE_SCALE))
        .and_then(|v| v.checked_mul(bonus_percent as i128))
        .ok_or(ContractError::ArithmeticOverflow)?;
    let denominator = PERCENT_BASE
        .checked_mul(usd_per_token)
        .ok_or(ContractError::ArithmeticOverflow)?;

    Ok(numerator / denominator)
}

fn allocation(token_cap: i128, percent: i128) -> Result<i128, ContractError> {
    token_cap
        .checked_mul(percent)
        .map(|v| v / PERCENT_BASE)
        .ok_or(ContractError::ArithmeticOverflow)
}

fn is_open(config: &CrowdsaleConfig, now: u64, raised: i128) -> bool {
    now >= config.opening_time && now < config.closing_time && raised < config.cap
}

fn has_closed(config: &CrowdsaleConfig, now: u64, raised: i128) -> bool {
    now >= config.closing_time || raised >= config.cap
}

fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
    let owner = read_owner(env)?;
    if *caller != owner {
        return Err(ContractError::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}

fn read_owner(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(ContractError::NotInitialized)
}

fn read_config(env: &Env) -> Result<CrowdsaleConfig, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(ContractError::NotInitialized)
}

fn read_schedule(env: &Env) -> BonusSchedule {
    env.storage()
        .instance()
        .get(&DataKey::BonusSchedule)
        .unwrap_or_else(|| BonusSchedule::empty(env))
}

fn read_total_raised(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalRaised)
        .unwrap_or(0)
}

fn is_finalized(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Finalized)
        .unwrap_or(false)
}
