use thiserror::Error;

use crate::domain::{AccountId, FavoriteId, Money, PaymentId, PaymentStatus, Phone};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Phone already registered: {0}")]
    PhoneAlreadyRegistered(Phone),

    #[error("Amount must be greater than zero, got {0}")]
    AmountMustBePositive(Money),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    #[error("Favorite not found: {0}")]
    FavoriteNotFound(FavoriteId),

    #[error("Not enough balance in account {account_id}: balance {balance}, required {required}")]
    NotEnoughBalance {
        account_id: AccountId,
        balance: Money,
        required: Money,
    },

    #[error("Balance overflow in account {account_id}: balance {balance}, credit {amount}")]
    BalanceOverflow {
        account_id: AccountId,
        balance: Money,
        amount: Money,
    },

    #[error("Payment {payment_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        payment_id: PaymentId,
        from: PaymentStatus,
        to: PaymentStatus,
    },
}
