use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Money, Payment, PaymentCategory};

pub type FavoriteId = String;

/// A named payment template. Captures the terms of a payment at the moment it
/// was saved and is never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub name: String,
    pub amount: Money,
    pub account_id: AccountId,
    pub category: PaymentCategory,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn from_payment(id: FavoriteId, name: impl Into<String>, payment: &Payment) -> Self {
        Self {
            id,
            name: name.into(),
            amount: payment.amount,
            account_id: payment.account_id,
            category: payment.category.clone(),
            created_at: Utc::now(),
        }
    }
}
