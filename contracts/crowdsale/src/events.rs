use soroban_sdk::{symbol_short, Address, Env, Symbol};

const SALE: Symbol = symbol_short!("sale");

const EVENT_INIT: Symbol = symbol_short!("init");
const EVENT_BONUS_SET: Symbol = symbol_short!("bonus_set");
const EVENT_WALLETS: Symbol = symbol_short!("wallets");
const EVENT_PURCHASE: Symbol = symbol_short!("purchase");
const EVENT_VAULT_CLOSED: Symbol = symbol_short!("vlt_close");
const EVENT_REFUNDS_ENABLED: Symbol = symbol_short!("refund_on");
const EVENT_REFUNDED: Symbol = symbol_short!("refunded");
const EVENT_FINALIZED: Symbol = symbol_short!("finalized");
const EVENT_OWNER_SET: Symbol = symbol_short!("owner_set");

pub(crate) fn initialized(env: &Env, owner: &Address, opening_time: u64, closing_time: u64) {
    env.events()
        .publish((SALE, EVENT_INIT, owner.clone()), (opening_time, closing_time));
}

pub(crate) fn bonus_times_set(env: &Env, tiers: u32) {
    env.events().publish((SALE, EVENT_BONUS_SET), tiers);
}

pub(crate) fn wallets_set(env: &Env, team: &Address, bounty: &Address) {
    env.events()
        .publish((SALE, EVENT_WALLETS), (team.clone(), bounty.clone()));
}

pub(crate) fn token_purchase(
    env: &Env,
    purchaser: &Address,
    beneficiary: &Address,
    value: i128,
    tokens: i128,
) {
    env.events().publish(
        (SALE, EVENT_PURCHASE, purchaser.clone(), beneficiary.clone()),
        (value, tokens),
    );
}

pub(crate) fn vault_closed(env: &Env, beneficiary: &Address, amount: i128) {
    env.events()
        .publish((SALE, EVENT_VAULT_CLOSED, beneficiary.clone()), amount);
}

pub(crate) fn refunds_enabled(env: &Env) {
    env.events().publish((SALE, EVENT_REFUNDS_ENABLED), ());
}

pub(crate) fn refunded(env: &Env, contributor: &Address, amount: i128) {
    env.events()
        .publish((SALE, EVENT_REFUNDED, contributor.clone()), amount);
}

pub(crate) fn finalized(env: &Env, total_raised: i128, goal_reached: bool) {
    env.events()
        .publish((SALE, EVENT_FINALIZED), (total_raised, goal_reached));
}

pub(crate) fn ownership_transferred(env: &Env, previous: &Address, new_owner: &Address) {
    env.events().publish(
        (SALE, EVENT_OWNER_SET, previous.clone()),
        new_owner.clone(),
    );
}
