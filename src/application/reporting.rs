use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Account, Favorite, Money, Payment, PaymentStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub categories: Vec<CategorySummary>,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Money,
    pub count: usize,
    pub average: Money,
    pub percentage: f64,
}

/// Everything the ledger holds for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatement {
    pub account: Account,
    pub payments: Vec<Payment>,
    pub favorites: Vec<Favorite>,
    /// Sum of payments that have not failed
    pub spent: Money,
}

/// Group non-failed payments by category, largest total first.
/// Totals saturate at `Money::MAX`.
/// Ties are broken by category name so the order is stable.
pub fn build_category_report(payments: &[Payment]) -> CategoryReport {
    let mut totals: HashMap<&str, (Money, usize)> = HashMap::new();

    for payment in payments.iter().filter(|p| p.status != PaymentStatus::Fail) {
        let entry = totals.entry(payment.category.as_str()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(payment.amount);
        entry.1 += 1;
    }

    let total = totals
        .values()
        .fold(0, |acc: Money, (sum, _)| acc.saturating_add(*sum));

    let mut categories: Vec<CategorySummary> = totals
        .into_iter()
        .map(|(category, (sum, count))| CategorySummary {
            category: category.to_string(),
            total: sum,
            count,
            average: sum / count as Money,
            percentage: if total > 0 {
                sum as f64 * 100.0 / total as f64
            } else {
                0.0
            },
        })
        .collect();

    categories.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    CategoryReport { categories, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(id: &str, amount: Money, category: &str, status: PaymentStatus) -> Payment {
        let mut payment = Payment::new(id.into(), 1, amount, category);
        payment.status = status;
        payment
    }

    #[test]
    fn test_empty_report() {
        let report = build_category_report(&[]);
        assert!(report.categories.is_empty());
        assert_eq!(report.total, 0);
    }

    #[test]
    fn test_groups_and_skips_failed() {
        let payments = vec![
            payment("1", 300, "mobile", PaymentStatus::InProgress),
            payment("2", 100, "mobile", PaymentStatus::Ok),
            payment("3", 600, "rent", PaymentStatus::InProgress),
            payment("4", 999, "rent", PaymentStatus::Fail),
        ];

        let report = build_category_report(&payments);
        assert_eq!(report.total, 1000);
        assert_eq!(report.categories.len(), 2);

        let rent = &report.categories[0];
        assert_eq!(rent.category, "rent");
        assert_eq!(rent.total, 600);
        assert_eq!(rent.count, 1);
        assert!((rent.percentage - 60.0).abs() < f64::EPSILON);

        let mobile = &report.categories[1];
        assert_eq!(mobile.count, 2);
        assert_eq!(mobile.average, 200);
    }

    #[test]
    fn test_totals_saturate() {
        let payments = vec![
            payment("1", Money::MAX, "rent", PaymentStatus::Ok),
            payment("2", Money::MAX, "rent", PaymentStatus::Ok),
            payment("3", 10, "mobile", PaymentStatus::InProgress),
        ];

        let report = build_category_report(&payments);
        assert_eq!(report.total, Money::MAX);
        assert_eq!(report.categories[0].category, "rent");
        assert_eq!(report.categories[0].total, Money::MAX);
        assert_eq!(report.categories[0].count, 2);
    }
}
