mod common;

use anyhow::Result;
use common::{balance_of, test_service};
use wallet::application::AppError;
use wallet::domain::PaymentStatus;

#[test]
fn test_end_to_end_session() -> Result<()> {
    let mut service = test_service();

    let account = service.register_account("+1000")?;
    assert_eq!(account.id, 1);
    assert_eq!(account.balance, 0);

    service.deposit(account.id, 100)?;
    assert_eq!(balance_of(&service, account.id), 100);

    let p1 = service.pay(account.id, 30, "mobile")?;
    assert_eq!(balance_of(&service, account.id), 70);
    assert_eq!(p1.status, PaymentStatus::InProgress);

    service.reject(&p1.id)?;
    assert_eq!(balance_of(&service, account.id), 100);
    assert_eq!(service.find_payment_by_id(&p1.id)?.status, PaymentStatus::Fail);

    let p2 = service.pay(account.id, 10, "mobile")?;
    assert_eq!(balance_of(&service, account.id), 90);

    let p3 = service.repeat(&p2.id)?;
    assert_ne!(p3.id, p2.id);
    assert_eq!(p3.amount, 10);
    assert_eq!(p3.category, "mobile");
    assert_eq!(balance_of(&service, account.id), 80);

    Ok(())
}

#[test]
fn test_failures_leave_state_untouched() -> Result<()> {
    let mut service = test_service();
    let account = service.register_account("+1000")?;
    service.deposit(account.id, 50)?;
    let payment = service.pay(account.id, 20, "mobile")?;
    let before = service.stats();

    let failures = [
        service.register_account("+1000").map(|_| ()),
        service.deposit(account.id, 0).map(|_| ()),
        service.deposit(99, 10).map(|_| ()),
        service.pay(account.id, -5, "mobile").map(|_| ()),
        service.pay(99, 5, "mobile").map(|_| ()),
        service.pay(account.id, 31, "mobile").map(|_| ()),
        service.reject("missing").map(|_| ()),
        service.repeat("missing").map(|_| ()),
        service.favorite_payment("missing", "name").map(|_| ()),
        service.pay_from_favorite("missing").map(|_| ()),
        service.confirm_payment("missing").map(|_| ()),
    ];

    assert!(failures.iter().all(|r| r.is_err()));
    assert_eq!(service.stats(), before);
    assert_eq!(balance_of(&service, account.id), 30);
    assert_eq!(
        service.find_payment_by_id(&payment.id)?.status,
        PaymentStatus::InProgress
    );

    Ok(())
}

#[test]
fn test_error_kinds() -> Result<()> {
    let mut service = test_service();
    let account = service.register_account("+1000")?;
    service.deposit(account.id, 10)?;

    assert_eq!(
        service.register_account("+1000").unwrap_err(),
        AppError::PhoneAlreadyRegistered("+1000".into())
    );
    assert_eq!(
        service.deposit(account.id, -1).unwrap_err(),
        AppError::AmountMustBePositive(-1)
    );
    assert_eq!(
        service.find_account_by_id(1777).unwrap_err(),
        AppError::AccountNotFound(1777)
    );
    assert_eq!(
        service.find_payment_by_id("nope").unwrap_err(),
        AppError::PaymentNotFound("nope".into())
    );
    assert_eq!(
        service.find_favorite_by_id("nope").unwrap_err(),
        AppError::FavoriteNotFound("nope".into())
    );
    assert_eq!(
        service.pay(account.id, 11, "mobile").unwrap_err(),
        AppError::NotEnoughBalance {
            account_id: account.id,
            balance: 10,
            required: 11,
        }
    );

    Ok(())
}

#[test]
fn test_error_messages() {
    let err = AppError::NotEnoughBalance {
        account_id: 3,
        balance: 10,
        required: 25,
    };
    assert_eq!(
        err.to_string(),
        "Not enough balance in account 3: balance 10, required 25"
    );
    assert_eq!(
        AppError::PhoneAlreadyRegistered("+1000".into()).to_string(),
        "Phone already registered: +1000"
    );
}
