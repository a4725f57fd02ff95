use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Money};

pub type PaymentId = String;
pub type PaymentCategory = String;

/// Lifecycle of a payment. New payments are `InProgress`; `Ok` is set by a
/// settlement confirmation and `Fail` by a rejection. `Fail` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "INPROGRESS")]
    InProgress,
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAIL")]
    Fail,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::InProgress => "INPROGRESS",
            PaymentStatus::Ok => "OK",
            PaymentStatus::Fail => "FAIL",
        }
    }

    /// InProgress -> Ok, InProgress -> Fail and Ok -> Fail are the only moves.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (*self, next),
            (PaymentStatus::InProgress, PaymentStatus::Ok)
                | (PaymentStatus::InProgress, PaymentStatus::Fail)
                | (PaymentStatus::Ok, PaymentStatus::Fail)
        )
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A debit of `amount` from an account, booked against a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub account_id: AccountId,
    /// Amount in minor units (always positive)
    pub amount: Money,
    pub category: PaymentCategory,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        id: PaymentId,
        account_id: AccountId,
        amount: Money,
        category: impl Into<PaymentCategory>,
    ) -> Self {
        Self {
            id,
            account_id,
            amount,
            category: category.into(),
            status: PaymentStatus::InProgress,
            created_at: Utc::now(),
        }
    }

    /// True when both payments describe the same debit, ignoring identity and time.
    pub fn same_terms(&self, other: &Payment) -> bool {
        self.account_id == other.account_id
            && self.amount == other.amount
            && self.category == other.category
    }
}
