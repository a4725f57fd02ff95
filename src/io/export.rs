use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::LedgerService;
use crate::domain::{Account, Favorite, Payment};

/// Full ledger state, suitable for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub accounts: Vec<Account>,
    pub payments: Vec<Payment>,
    pub favorites: Vec<Favorite>,
}

impl LedgerSnapshot {
    pub fn capture(service: &LedgerService) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            accounts: service.accounts().cloned().collect(),
            payments: service.payments().to_vec(),
            favorites: service.favorites().to_vec(),
        }
    }
}

/// Exporter for converting ledger state to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export the whole ledger as pretty-printed JSON
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<()> {
        let snapshot = LedgerSnapshot::capture(self.service);
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Export accounts to CSV format
    pub fn export_accounts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "phone", "balance"])?;

        let mut count = 0;
        for account in self.service.accounts() {
            csv_writer.write_record([
                account.id.to_string(),
                account.phone.clone(),
                account.balance.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export payments to CSV format
    pub fn export_payments_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "account_id", "amount", "category", "status"])?;

        for payment in self.service.payments() {
            csv_writer.write_record([
                payment.id.clone(),
                payment.account_id.to_string(),
                payment.amount.to_string(),
                payment.category.clone(),
                payment.status.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(self.service.payments().len())
    }
}
