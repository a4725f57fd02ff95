use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{Account, AccountId, Favorite, Money, Payment, PaymentCategory};

use super::{AppError, LedgerService};

/// A cloneable, thread-safe handle to one ledger.
///
/// Every call holds a single lock over the whole service, so lookup-then-mutate
/// sequences such as `reject` run atomically and the account-id counter is never
/// raced.
#[derive(Clone, Default)]
pub struct SharedLedger {
    inner: Arc<Mutex<LedgerService>>,
}

impl SharedLedger {
    pub fn new(service: LedgerService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    /// Run `f` with exclusive access to the service.
    pub fn with<R>(&self, f: impl FnOnce(&mut LedgerService) -> R) -> R {
        f(&mut self.lock())
    }

    // Service operations validate before mutating, so a poisoned lock still guards
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, LedgerService> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register_account(&self, phone: impl Into<String>) -> Result<Account, AppError> {
        self.lock().register_account(phone)
    }

    pub fn find_account_by_id(&self, account_id: AccountId) -> Result<Account, AppError> {
        self.lock().find_account_by_id(account_id).cloned()
    }

    pub fn deposit(&self, account_id: AccountId, amount: Money) -> Result<Account, AppError> {
        self.lock().deposit(account_id, amount)
    }

    pub fn pay(
        &self,
        account_id: AccountId,
        amount: Money,
        category: impl Into<PaymentCategory>,
    ) -> Result<Payment, AppError> {
        self.lock().pay(account_id, amount, category)
    }

    pub fn reject(&self, payment_id: &str) -> Result<Payment, AppError> {
        self.lock().reject(payment_id)
    }

    pub fn repeat(&self, payment_id: &str) -> Result<Payment, AppError> {
        self.lock().repeat(payment_id)
    }

    pub fn favorite_payment(
        &self,
        payment_id: &str,
        name: impl Into<String>,
    ) -> Result<Favorite, AppError> {
        self.lock().favorite_payment(payment_id, name)
    }

    pub fn pay_from_favorite(&self, favorite_id: &str) -> Result<Payment, AppError> {
        self.lock().pay_from_favorite(favorite_id)
    }
}
