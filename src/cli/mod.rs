use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{CategoryReport, LedgerService};
use crate::domain::{SequentialIdGenerator, UuidGenerator, format_money};
use crate::io::{Exporter, ReplayReport, ScriptRunner};

/// Wallet - in-memory payments ledger
#[derive(Parser)]
#[command(name = "wallet")]
#[command(about = "Replay wallet scripts: accounts, payments, rejections, repeats and favorites")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (info-level logs unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// How payment and favorite ids are generated
    #[arg(long, value_enum, global = true, default_value_t = IdScheme::Uuid)]
    pub ids: IdScheme,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdScheme {
    /// Random UUID v4
    Uuid,
    /// Deterministic id-1, id-2, ...
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a CSV script and print the resulting ledger
    Run {
        /// Script file (header: op,ref,amount,category,name,as)
        script: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay a CSV script and print spending per category
    Report {
        /// Script file
        script: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },

    /// Walk through a register / deposit / pay / reject / repeat session
    Demo,
}

impl Cli {
    fn service(&self) -> LedgerService {
        match self.ids {
            IdScheme::Uuid => LedgerService::with_id_generator(UuidGenerator),
            IdScheme::Sequential => LedgerService::with_id_generator(SequentialIdGenerator::default()),
        }
    }

    pub fn run(self) -> Result<()> {
        let mut service = self.service();

        match self.command {
            Commands::Run {
                script,
                format,
                output,
            } => {
                let report = replay(&mut service, &script)?;
                print_replay_summary(&report);

                match output {
                    Some(path) => {
                        let file = File::create(&path)
                            .with_context(|| format!("Failed to create {}", path.display()))?;
                        write_ledger(&service, format, file)?;
                        eprintln!("Ledger written to {}", path.display());
                    }
                    None => write_ledger(&service, format, io::stdout().lock())?,
                }
            }

            Commands::Report { script, format } => {
                let report = replay(&mut service, &script)?;
                print_replay_summary(&report);

                let categories = service.category_report();
                match format {
                    ReportFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&categories)?);
                    }
                    ReportFormat::Table => print_category_report(&categories),
                }
            }

            Commands::Demo => run_demo(&mut service)?,
        }

        Ok(())
    }
}

fn replay(service: &mut LedgerService, script: &Path) -> Result<ReplayReport> {
    let file = File::open(script)
        .with_context(|| format!("Failed to open script {}", script.display()))?;
    ScriptRunner::new(service).run(file)
}

fn print_replay_summary(report: &ReplayReport) {
    eprintln!("Applied {} line(s), {} failed", report.applied, report.failed);
    for error in &report.errors {
        eprintln!("  line {}: {}", error.line, error.error);
    }
}

fn write_ledger<W: Write>(service: &LedgerService, format: OutputFormat, mut out: W) -> Result<()> {
    let exporter = Exporter::new(service);
    match format {
        OutputFormat::Json => exporter.export_json(out)?,
        OutputFormat::Csv => {
            exporter.export_accounts_csv(&mut out)?;
            writeln!(out)?;
            exporter.export_payments_csv(&mut out)?;
        }
        OutputFormat::Table => write_tables(service, &mut out)?,
    }
    Ok(())
}

fn write_tables<W: Write>(service: &LedgerService, out: &mut W) -> Result<()> {
    writeln!(out, "{:<6} {:<18} {:>12}", "ID", "PHONE", "BALANCE")?;
    writeln!(out, "{}", "-".repeat(38))?;
    for account in service.accounts() {
        writeln!(
            out,
            "{:<6} {:<18} {:>12}",
            account.id,
            truncate(&account.phone, 18),
            format_money(account.balance)
        )?;
    }

    if !service.payments().is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "{:<38} {:<8} {:>10} {:<14} {:<10}",
            "PAYMENT", "ACCOUNT", "AMOUNT", "CATEGORY", "STATUS"
        )?;
        writeln!(out, "{}", "-".repeat(84))?;
        for payment in service.payments() {
            writeln!(
                out,
                "{:<38} {:<8} {:>10} {:<14} {:<10}",
                payment.id,
                payment.account_id,
                format_money(payment.amount),
                truncate(&payment.category, 14),
                payment.status
            )?;
        }
    }

    if !service.favorites().is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "{:<38} {:<20} {:<8} {:>10} {:<14}",
            "FAVORITE", "NAME", "ACCOUNT", "AMOUNT", "CATEGORY"
        )?;
        writeln!(out, "{}", "-".repeat(94))?;
        for favorite in service.favorites() {
            writeln!(
                out,
                "{:<38} {:<20} {:<8} {:>10} {:<14}",
                favorite.id,
                truncate(&favorite.name, 20),
                favorite.account_id,
                format_money(favorite.amount),
                truncate(&favorite.category, 14)
            )?;
        }
    }

    let stats = service.stats();
    writeln!(out)?;
    writeln!(
        out,
        "{} account(s), {} payment(s), {} favorite(s), total balance {}",
        stats.account_count,
        stats.payment_count,
        stats.favorite_count,
        format_money(stats.total_balance)
    )?;
    Ok(())
}

fn print_category_report(report: &CategoryReport) {
    if report.categories.is_empty() {
        println!("No payments recorded.");
        return;
    }

    println!(
        "{:<16} {:>6} {:>12} {:>12} {:>7}",
        "CATEGORY", "COUNT", "TOTAL", "AVERAGE", "SHARE"
    );
    println!("{}", "-".repeat(57));
    for summary in &report.categories {
        println!(
            "{:<16} {:>6} {:>12} {:>12} {:>6.1}%",
            truncate(&summary.category, 16),
            summary.count,
            format_money(summary.total),
            format_money(summary.average),
            summary.percentage
        );
    }
    println!("{}", "-".repeat(57));
    println!("{:<16} {:>6} {:>12}", "TOTAL", "", format_money(report.total));
}

fn run_demo(service: &mut LedgerService) -> Result<()> {
    let account = service.register_account("+1000")?;
    println!("Registered account {} ({})", account.id, account.phone);

    let account = service.deposit(account.id, 100)?;
    println!("Deposited 1.00, balance {}", format_money(account.balance));

    let first = service.pay(account.id, 30, "mobile")?;
    println!(
        "Paid {} for {}: {} [{}], balance {}",
        format_money(first.amount),
        first.category,
        first.id,
        first.status,
        format_money(service.find_account_by_id(account.id)?.balance)
    );

    let rejected = service.reject(&first.id)?;
    println!(
        "Rejected {} [{}], balance {}",
        rejected.id,
        rejected.status,
        format_money(service.find_account_by_id(account.id)?.balance)
    );

    let second = service.pay(account.id, 10, "mobile")?;
    println!(
        "Paid {} for {}: {}, balance {}",
        format_money(second.amount),
        second.category,
        second.id,
        format_money(service.find_account_by_id(account.id)?.balance)
    );

    let repeated = service.repeat(&second.id)?;
    println!(
        "Repeated {} as {}, balance {}",
        second.id,
        repeated.id,
        format_money(service.find_account_by_id(account.id)?.balance)
    );

    let favorite = service.favorite_payment(&repeated.id, "Mobile top-up")?;
    let from_favorite = service.pay_from_favorite(&favorite.id)?;
    println!(
        "Saved favorite '{}' and paid {} from it, balance {}",
        favorite.name,
        format_money(from_favorite.amount),
        format_money(service.find_account_by_id(account.id)?.balance)
    );

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from([
            "wallet", "--ids", "sequential", "run", "script.csv", "--format", "json",
        ])
        .unwrap();

        assert_eq!(cli.ids, IdScheme::Sequential);
        match cli.command {
            Commands::Run { script, format, output } => {
                assert_eq!(script, PathBuf::from("script.csv"));
                assert_eq!(format, OutputFormat::Json);
                assert!(output.is_none());
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_report_formats() {
        let cli = Cli::try_parse_from(["wallet", "report", "script.csv", "-f", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Report {
                format: ReportFormat::Json,
                ..
            }
        ));

        assert!(Cli::try_parse_from(["wallet", "report", "script.csv", "--format", "csv"]).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("mobile", 14), "mobile");
        assert_eq!(truncate("a-very-long-category", 10), "a-very-...");
    }

    #[test]
    fn test_table_output() {
        let mut service = LedgerService::with_id_generator(SequentialIdGenerator::default());
        run_demo(&mut service).unwrap();

        let mut out = Vec::new();
        write_ledger(&service, OutputFormat::Table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("+1000"));
        assert!(text.contains("Mobile top-up"));
        assert!(text.contains("1 account(s), 4 payment(s), 1 favorite(s), total balance 0.70"));
    }
}
