use soroban_sdk::{contractclient, Address, Env};

/// The part of the token ledger the sale drives.
///
/// `mint` must fail once `finish_minting` has been called; the sale relies
/// on that to stop supply growth after finalization.
#[contractclient(name = "MintableTokenClient")]
pub trait MintableTokenInterface {
    fn mint(env: Env, to: Address, amount: i128);

    fn cap(env: Env) -> i128;

    fn balance(env: Env, id: Address) -> i128;

    fn finish_minting(env: Env);

    fn minting_finished(env: Env) -> bool;

    fn transfer_ownership(env: Env, new_owner: Address);

    fn owner(env: Env) -> Address;
}
