use std::collections::HashMap;
use std::io::Read;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::LedgerService;
use crate::domain::{AccountId, Money, parse_money};

/// One operation a script line can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScriptOp {
    Register,
    Deposit,
    Pay,
    Reject,
    Confirm,
    Repeat,
    Favorite,
    PayFavorite,
}

/// A script line: `op,ref,amount,category,name,as`.
///
/// `ref` is a phone for `register`, otherwise an account id, payment id, favorite id
/// or a label bound by an earlier line's `as` column.
#[derive(Debug, Clone, Deserialize)]
struct ScriptLine {
    op: ScriptOp,
    #[serde(rename = "ref")]
    target: String,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "as", default)]
    label: Option<String>,
}

/// Result of replaying a script
#[derive(Debug, Clone, Default)]
pub struct ReplayReport {
    pub applied: usize,
    pub failed: usize,
    pub errors: Vec<ReplayError>,
}

/// A line that could not be applied
#[derive(Debug, Clone)]
pub struct ReplayError {
    pub line: usize,
    pub error: String,
}

/// Replays CSV scripts against a ledger, continuing past failing lines.
pub struct ScriptRunner<'a> {
    service: &'a mut LedgerService,
    labels: HashMap<String, String>,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(service: &'a mut LedgerService) -> Self {
        Self {
            service,
            labels: HashMap::new(),
        }
    }

    /// Id bound to `label`, if any line has bound it.
    pub fn label(&self, label: &str) -> Option<&str> {
        self.labels.get(label).map(String::as_str)
    }

    pub fn run<R: Read>(&mut self, reader: R) -> Result<ReplayReport> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .context("Failed to read script header")?
            .clone();
        let mut record = csv::StringRecord::new();
        let mut report = ReplayReport::default();

        while csv_reader
            .read_record(&mut record)
            .context("Failed to read script")?
        {
            let line_no = record
                .position()
                .and_then(|pos| usize::try_from(pos.line()).ok())
                .unwrap_or_default();

            let outcome = record
                .deserialize(Some(&headers))
                .context("Failed to parse script line")
                .and_then(|script_line: ScriptLine| self.apply(&script_line));

            match outcome {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    warn!(line = line_no, error = %e, "script line failed");
                    report.failed += 1;
                    report.errors.push(ReplayError {
                        line: line_no,
                        error: format!("{:#}", e),
                    });
                }
            }
        }

        debug!(
            applied = report.applied,
            failed = report.failed,
            "script replay finished"
        );
        Ok(report)
    }

    fn apply(&mut self, line: &ScriptLine) -> Result<()> {
        let bound = match line.op {
            ScriptOp::Register => {
                let account = self.service.register_account(line.target.as_str())?;
                account.id.to_string()
            }
            ScriptOp::Deposit => {
                let account_id = self.resolve_account(&line.target)?;
                let amount = required_amount(line)?;
                self.service.deposit(account_id, amount)?;
                account_id.to_string()
            }
            ScriptOp::Pay => {
                let account_id = self.resolve_account(&line.target)?;
                let amount = required_amount(line)?;
                let category = line
                    .category
                    .clone()
                    .context("pay requires a category")?;
                self.service.pay(account_id, amount, category)?.id
            }
            ScriptOp::Reject => {
                let payment_id = self.resolve(&line.target);
                self.service.reject(&payment_id)?.id
            }
            ScriptOp::Confirm => {
                let payment_id = self.resolve(&line.target);
                self.service.confirm_payment(&payment_id)?.id
            }
            ScriptOp::Repeat => {
                let payment_id = self.resolve(&line.target);
                self.service.repeat(&payment_id)?.id
            }
            ScriptOp::Favorite => {
                let payment_id = self.resolve(&line.target);
                let name = line.name.clone().context("favorite requires a name")?;
                self.service.favorite_payment(&payment_id, name)?.id
            }
            ScriptOp::PayFavorite => {
                let favorite_id = self.resolve(&line.target);
                self.service.pay_from_favorite(&favorite_id)?.id
            }
        };

        if let Some(label) = &line.label {
            self.labels.insert(label.clone(), bound);
        }
        Ok(())
    }

    fn resolve(&self, reference: &str) -> String {
        self.labels
            .get(reference)
            .cloned()
            .unwrap_or_else(|| reference.to_string())
    }

    fn resolve_account(&self, reference: &str) -> Result<AccountId> {
        let resolved = self.resolve(reference);
        resolved
            .parse()
            .with_context(|| format!("Invalid account reference '{}'", reference))
    }
}

fn required_amount(line: &ScriptLine) -> Result<Money> {
    let raw = line.amount.as_deref().context("amount is required")?;
    parse_money(raw).with_context(|| format!("Invalid amount '{}'", raw))
}
