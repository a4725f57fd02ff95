use tracing::{debug, info, warn};

use crate::domain::{
    Account, AccountId, Favorite, IdGenerator, Money, Payment, PaymentCategory, PaymentStatus,
    UuidGenerator,
};
use crate::storage::{LedgerStats, Repository};

use super::reporting::{AccountStatement, CategoryReport, build_category_report};
use super::AppError;

/// Application service providing every ledger operation.
/// This is the primary interface for any client (CLI, script replay, tests).
///
/// Every operation validates before it mutates, so a returned error leaves the
/// ledger exactly as it was.
pub struct LedgerService {
    repo: Repository,
    ids: Box<dyn IdGenerator>,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerService {
    /// Create an empty ledger that names payments and favorites with UUIDs.
    pub fn new() -> Self {
        Self::with_id_generator(UuidGenerator)
    }

    /// Create an empty ledger using the given identifier source.
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            repo: Repository::new(),
            ids: Box::new(ids),
        }
    }

    // ========================
    // Account operations
    // ========================

    /// Register a new account with a zero balance.
    pub fn register_account(&mut self, phone: impl Into<String>) -> Result<Account, AppError> {
        let phone = phone.into();
        if self.repo.get_account_by_phone(&phone).is_some() {
            return Err(AppError::PhoneAlreadyRegistered(phone));
        }

        let account = Account::new(self.repo.next_account_id(), phone);
        self.repo.save_account(account.clone());

        info!(account_id = account.id, phone = %account.phone, "account registered");
        Ok(account)
    }

    pub fn find_account_by_id(&self, account_id: AccountId) -> Result<&Account, AppError> {
        debug!(account_id, "looking up account");
        self.repo
            .get_account(account_id)
            .ok_or(AppError::AccountNotFound(account_id))
    }

    pub fn account_by_phone(&self, phone: &str) -> Option<&Account> {
        self.repo.get_account_by_phone(phone)
    }

    /// Add funds to an account. Returns the account after the credit.
    pub fn deposit(&mut self, account_id: AccountId, amount: Money) -> Result<Account, AppError> {
        if amount <= 0 {
            return Err(AppError::AmountMustBePositive(amount));
        }

        let account = self
            .repo
            .get_account_mut(account_id)
            .ok_or(AppError::AccountNotFound(account_id))?;

        if !account.can_credit(amount) {
            return Err(AppError::BalanceOverflow {
                account_id,
                balance: account.balance,
                amount,
            });
        }

        account.credit(amount);

        info!(account_id, amount, balance = account.balance, "deposit applied");
        Ok(account.clone())
    }

    /// All accounts in registration order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.repo.list_accounts()
    }

    // ========================
    // Payment operations
    // ========================

    pub fn find_payment_by_id(&self, payment_id: &str) -> Result<&Payment, AppError> {
        debug!(payment_id, "looking up payment");
        self.repo
            .get_payment(payment_id)
            .ok_or_else(|| AppError::PaymentNotFound(payment_id.to_string()))
    }

    /// Debit an account and record an in-progress payment against `category`.
    pub fn pay(
        &mut self,
        account_id: AccountId,
        amount: Money,
        category: impl Into<PaymentCategory>,
    ) -> Result<Payment, AppError> {
        if amount <= 0 {
            return Err(AppError::AmountMustBePositive(amount));
        }

        let account = self
            .repo
            .get_account_mut(account_id)
            .ok_or(AppError::AccountNotFound(account_id))?;

        if !account.can_cover(amount) {
            return Err(AppError::NotEnoughBalance {
                account_id,
                balance: account.balance,
                required: amount,
            });
        }

        account.debit(amount);
        let balance = account.balance;

        let payment = Payment::new(self.ids.next_id(), account_id, amount, category);
        self.repo.save_payment(payment.clone());

        info!(
            payment_id = %payment.id,
            account_id,
            amount,
            category = %payment.category,
            balance,
            "payment recorded"
        );
        Ok(payment)
    }

    /// Mark a payment as failed and refund its amount to the owning account.
    ///
    /// A payment that already failed cannot be rejected again, so the refund
    /// happens at most once. Both the status change and the refund are checked
    /// before either is applied.
    pub fn reject(&mut self, payment_id: &str) -> Result<Payment, AppError> {
        let payment = self.check_transition(payment_id, PaymentStatus::Fail)?;
        let (account_id, amount) = (payment.account_id, payment.amount);

        if let Some(account) = self.repo.get_account(account_id) {
            if !account.can_credit(amount) {
                return Err(AppError::BalanceOverflow {
                    account_id,
                    balance: account.balance,
                    amount,
                });
            }
        }

        let payment = self.set_status(payment_id, PaymentStatus::Fail)?;

        match self.repo.get_account_mut(account_id) {
            Some(account) => {
                account.credit(amount);
                info!(
                    payment_id,
                    account_id,
                    refunded = amount,
                    balance = account.balance,
                    "payment rejected"
                );
            }
            None => warn!(
                payment_id,
                account_id,
                "payment rejected but owning account is missing, refund skipped"
            ),
        }

        Ok(payment)
    }

    /// Settlement confirmation: moves an in-progress payment to `Ok`.
    pub fn confirm_payment(&mut self, payment_id: &str) -> Result<Payment, AppError> {
        self.check_transition(payment_id, PaymentStatus::Ok)?;
        let payment = self.set_status(payment_id, PaymentStatus::Ok)?;
        info!(payment_id, "payment confirmed");
        Ok(payment)
    }

    /// Pay again with the terms of an existing payment.
    pub fn repeat(&mut self, payment_id: &str) -> Result<Payment, AppError> {
        let original = self.find_payment_by_id(payment_id)?;
        let (account_id, amount, category) =
            (original.account_id, original.amount, original.category.clone());

        debug!(payment_id, "repeating payment");
        self.pay(account_id, amount, category)
    }

    /// Payments in the order they were recorded.
    pub fn payments(&self) -> &[Payment] {
        self.repo.list_payments()
    }

    pub fn payments_for_account(&self, account_id: AccountId) -> Result<Vec<&Payment>, AppError> {
        self.find_account_by_id(account_id)?;
        Ok(self.repo.list_payments_for_account(account_id).collect())
    }

    fn check_transition(&self, payment_id: &str, to: PaymentStatus) -> Result<&Payment, AppError> {
        let payment = self.find_payment_by_id(payment_id)?;

        if !payment.status.can_transition_to(to) {
            return Err(AppError::InvalidStatusTransition {
                payment_id: payment_id.to_string(),
                from: payment.status,
                to,
            });
        }

        Ok(payment)
    }

    fn set_status(&mut self, payment_id: &str, to: PaymentStatus) -> Result<Payment, AppError> {
        let payment = self
            .repo
            .get_payment_mut(payment_id)
            .ok_or_else(|| AppError::PaymentNotFound(payment_id.to_string()))?;
        payment.status = to;
        Ok(payment.clone())
    }

    // ========================
    // Favorite operations
    // ========================

    pub fn find_favorite_by_id(&self, favorite_id: &str) -> Result<&Favorite, AppError> {
        debug!(favorite_id, "looking up favorite");
        self.repo
            .get_favorite(favorite_id)
            .ok_or_else(|| AppError::FavoriteNotFound(favorite_id.to_string()))
    }

    /// Save the terms of a payment as a named favorite.
    pub fn favorite_payment(
        &mut self,
        payment_id: &str,
        name: impl Into<String>,
    ) -> Result<Favorite, AppError> {
        let payment = self
            .repo
            .get_payment(payment_id)
            .ok_or_else(|| AppError::PaymentNotFound(payment_id.to_string()))?;

        let favorite = Favorite::from_payment(self.ids.next_id(), name, payment);
        self.repo.save_favorite(favorite.clone());

        info!(
            favorite_id = %favorite.id,
            payment_id,
            name = %favorite.name,
            "favorite saved"
        );
        Ok(favorite)
    }

    /// Make a new payment from a saved favorite.
    pub fn pay_from_favorite(&mut self, favorite_id: &str) -> Result<Payment, AppError> {
        let favorite = self.find_favorite_by_id(favorite_id)?;
        let (account_id, amount, category) =
            (favorite.account_id, favorite.amount, favorite.category.clone());

        debug!(favorite_id, "paying from favorite");
        self.pay(account_id, amount, category)
    }

    pub fn favorites(&self) -> &[Favorite] {
        self.repo.list_favorites()
    }

    // ========================
    // Reporting
    // ========================

    pub fn stats(&self) -> LedgerStats {
        self.repo.stats()
    }

    /// Spending per category, counting every payment that has not failed.
    pub fn category_report(&self) -> CategoryReport {
        build_category_report(self.repo.list_payments())
    }

    pub fn account_statement(&self, account_id: AccountId) -> Result<AccountStatement, AppError> {
        let account = self.find_account_by_id(account_id)?.clone();
        let payments: Vec<Payment> = self
            .repo
            .list_payments_for_account(account_id)
            .cloned()
            .collect();
        let favorites: Vec<Favorite> = self
            .repo
            .list_favorites()
            .iter()
            .filter(|f| f.account_id == account_id)
            .cloned()
            .collect();
        let spent: Money = payments
            .iter()
            .filter(|p| p.status != PaymentStatus::Fail)
            .map(|p| p.amount)
            .sum();

        Ok(AccountStatement {
            account,
            payments,
            favorites,
            spent,
        })
    }
}
