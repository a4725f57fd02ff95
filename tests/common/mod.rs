// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use wallet::application::LedgerService;
use wallet::domain::{Account, Money, SequentialIdGenerator};

/// Helper to create a ledger with deterministic ids (`id-1`, `id-2`, ...)
pub fn test_service() -> LedgerService {
    LedgerService::with_id_generator(SequentialIdGenerator::new("id"))
}

/// Test fixture: standard account setup
pub struct StandardAccounts;

impl StandardAccounts {
    /// Register three accounts, as the classic wallet tests do
    pub fn create_basic(service: &mut LedgerService) -> Result<Vec<Account>> {
        let phones = ["+9929888444444", "+9929888444445", "+9929888444446"];
        let mut accounts = Vec::new();
        for phone in phones {
            accounts.push(service.register_account(phone)?);
        }
        Ok(accounts)
    }

    /// Register the basic accounts and deposit `amount` into each
    pub fn create_funded(service: &mut LedgerService, amount: Money) -> Result<Vec<Account>> {
        let mut funded = Vec::new();
        for account in Self::create_basic(service)? {
            funded.push(service.deposit(account.id, amount)?);
        }
        Ok(funded)
    }
}

/// Current balance of an account, panicking if it is missing
pub fn balance_of(service: &LedgerService, account_id: i64) -> Money {
    service
        .find_account_by_id(account_id)
        .expect("account should exist")
        .balance
}
