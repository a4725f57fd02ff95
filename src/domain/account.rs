use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Money;

pub type AccountId = i64;
pub type Phone = String;

/// A registered wallet account. The phone number is the external identity,
/// the numeric id is assigned by the repository in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub phone: Phone,
    /// Balance in minor units, never negative.
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: AccountId, phone: impl Into<Phone>) -> Self {
        Self {
            id,
            phone: phone.into(),
            balance: 0,
            created_at: Utc::now(),
        }
    }

    pub fn can_cover(&self, amount: Money) -> bool {
        self.balance >= amount
    }

    /// False when crediting `amount` would overflow the balance.
    pub fn can_credit(&self, amount: Money) -> bool {
        self.balance.checked_add(amount).is_some()
    }

    /// Callers check `can_credit` first.
    pub fn credit(&mut self, amount: Money) {
        debug_assert!(self.can_credit(amount), "credit would overflow balance");
        self.balance += amount;
    }

    /// Callers check `can_cover` first.
    pub fn debit(&mut self, amount: Money) {
        debug_assert!(self.can_cover(amount), "debit would overdraw account");
        self.balance -= amount;
    }
}
