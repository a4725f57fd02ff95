use std::collections::{BTreeMap, HashMap};

use crate::domain::{Account, AccountId, Favorite, FavoriteId, Money, Payment, PaymentId, Phone};

/// Counters for a quick health view of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStats {
    pub account_count: usize,
    pub payment_count: usize,
    pub favorite_count: usize,
    /// Saturates at `Money::MAX`.
    pub total_balance: Money,
}

/// In-memory storage for accounts, payments and favorites.
///
/// Accounts are keyed by their monotonic id, so iteration follows registration order.
/// Payments and favorites are append-only vectors with an id -> position index.
#[derive(Debug, Default)]
pub struct Repository {
    last_account_id: AccountId,
    accounts: BTreeMap<AccountId, Account>,
    phones: HashMap<Phone, AccountId>,
    payments: Vec<Payment>,
    payment_index: HashMap<PaymentId, usize>,
    favorites: Vec<Favorite>,
    favorite_index: HashMap<FavoriteId, usize>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Account operations
    // ========================

    /// Reserve the next account id. The first id handed out is 1.
    pub fn next_account_id(&mut self) -> AccountId {
        self.last_account_id += 1;
        self.last_account_id
    }

    pub fn save_account(&mut self, account: Account) {
        self.phones.insert(account.phone.clone(), account.id);
        self.accounts.insert(account.id, account);
    }

    pub fn get_account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    pub fn get_account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(&id)
    }

    pub fn get_account_by_phone(&self, phone: &str) -> Option<&Account> {
        self.phones.get(phone).and_then(|id| self.accounts.get(id))
    }

    pub fn list_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    // ========================
    // Payment operations
    // ========================

    pub fn save_payment(&mut self, payment: Payment) {
        self.payment_index.insert(payment.id.clone(), self.payments.len());
        self.payments.push(payment);
    }

    pub fn get_payment(&self, id: &str) -> Option<&Payment> {
        self.payment_index.get(id).map(|&pos| &self.payments[pos])
    }

    pub fn get_payment_mut(&mut self, id: &str) -> Option<&mut Payment> {
        let pos = *self.payment_index.get(id)?;
        self.payments.get_mut(pos)
    }

    pub fn list_payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn list_payments_for_account(
        &self,
        account_id: AccountId,
    ) -> impl Iterator<Item = &Payment> {
        self.payments
            .iter()
            .filter(move |p| p.account_id == account_id)
    }

    // ========================
    // Favorite operations
    // ========================

    pub fn save_favorite(&mut self, favorite: Favorite) {
        self.favorite_index.insert(favorite.id.clone(), self.favorites.len());
        self.favorites.push(favorite);
    }

    pub fn get_favorite(&self, id: &str) -> Option<&Favorite> {
        self.favorite_index.get(id).map(|&pos| &self.favorites[pos])
    }

    pub fn list_favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    // ========================
    // Stats
    // ========================

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            account_count: self.accounts.len(),
            payment_count: self.payments.len(),
            favorite_count: self.favorites.len(),
            total_balance: self
                .accounts
                .values()
                .fold(0, |total, a| total.saturating_add(a.balance)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_ids_start_at_one() {
        let mut repo = Repository::new();
        assert_eq!(repo.next_account_id(), 1);
        assert_eq!(repo.next_account_id(), 2);
    }

    #[test]
    fn test_accounts_by_id_and_phone() {
        let mut repo = Repository::new();
        let id = repo.next_account_id();
        repo.save_account(Account::new(id, "+1000"));

        assert_eq!(repo.get_account(id).map(|a| a.phone.as_str()), Some("+1000"));
        assert_eq!(repo.get_account_by_phone("+1000").map(|a| a.id), Some(id));
        assert!(repo.get_account(99).is_none());
        assert!(repo.get_account_by_phone("+2000").is_none());
    }

    #[test]
    fn test_payments_keep_insertion_order() {
        let mut repo = Repository::new();
        repo.save_payment(Payment::new("b".into(), 1, 10, "mobile"));
        repo.save_payment(Payment::new("a".into(), 2, 20, "mobile"));
        repo.save_payment(Payment::new("c".into(), 1, 30, "internet"));

        let ids: Vec<&str> = repo.list_payments().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);

        let for_first: Vec<&str> = repo
            .list_payments_for_account(1)
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(for_first, ["b", "c"]);

        repo.get_payment_mut("a").unwrap().amount = 25;
        assert_eq!(repo.get_payment("a").unwrap().amount, 25);
    }

    #[test]
    fn test_stats() {
        let mut repo = Repository::new();
        let id = repo.next_account_id();
        let mut account = Account::new(id, "+1000");
        account.credit(700);
        repo.save_account(account);

        let payment = Payment::new("p".into(), id, 10, "mobile");
        repo.save_favorite(Favorite::from_payment("f".into(), "fav", &payment));
        repo.save_payment(payment);

        assert_eq!(
            repo.stats(),
            LedgerStats {
                account_count: 1,
                payment_count: 1,
                favorite_count: 1,
                total_balance: 700,
            }
        );
        assert!(repo.get_favorite("f").is_some());
        assert!(repo.get_favorite("p").is_none());
    }

    #[test]
    fn test_total_balance_saturates() {
        let mut repo = Repository::new();
        for phone in ["+1000", "+2000"] {
            let mut account = Account::new(repo.next_account_id(), phone);
            account.credit(Money::MAX);
            repo.save_account(account);
        }

        assert_eq!(repo.stats().total_balance, Money::MAX);
    }
}
