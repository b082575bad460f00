use anyhow::Result;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::ledger::{LedgerRepository, TransactionFilter};
use crate::models::{Transaction, TransactionKind};
use crate::ops;

/// Starter categories shown when the ledger is still empty.
const SUGGESTED_CATEGORIES: &[&str] = &[
    "Work",
    "Food",
    "Transportation",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Bills",
    "Education",
    "Travel",
    "Other",
];

pub(crate) fn as_cli(args: &[String], repo: &mut LedgerRepository) -> Result<()> {
    match args[1].as_str() {
        "list" | "ls" => cli_list(&args[2..], repo),
        "add" => cli_add(&args[2..], repo),
        "edit" => cli_edit(&args[2..], repo),
        "delete" | "rm" => cli_delete(&args[2..], repo),
        "summary" | "s" => cli_summary(repo),
        "categories" => cli_categories(repo),
        "clear" => cli_clear(repo),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("finledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("FinLedger — local-only personal finance ledger");
    println!();
    println!("Usage: finledger <command>");
    println!();
    println!("Commands:");
    println!("  list [income|expense]           List transactions, newest first");
    println!("    --category <name>             Only this category");
    println!("  add <title> <amount> <income|expense> <category> [description]");
    println!("    --date <YYYY-MM-DDTHH:MM:SS>  Timestamp (default: now)");
    println!("  edit <id>                       Replace fields of a transaction");
    println!("    --title <t> --amount <a> --category <c> --description <d>");
    println!("  delete <id>                     Delete a transaction by id");
    println!("  summary                         Print income/expense/balance totals");
    println!("  categories                      List categories in use");
    println!("  clear                           Delete every transaction");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
}

fn parse_kind(s: &str) -> Result<TransactionKind> {
    match s.to_lowercase().as_str() {
        "income" | "in" => Ok(TransactionKind::Income),
        "expense" | "out" => Ok(TransactionKind::Expense),
        other => anyhow::bail!("Expected income or expense, got: {other}"),
    }
}

fn cli_list(args: &[String], repo: &mut LedgerRepository) -> Result<()> {
    let category = args
        .windows(2)
        .find(|w| w[0] == "--category")
        .map(|w| w[1].clone());

    let filter = if let Some(category) = category {
        TransactionFilter::Category(category)
    } else if let Some(kind) = args.first().filter(|a| !a.starts_with('-')) {
        TransactionFilter::Kind(parse_kind(kind)?)
    } else {
        TransactionFilter::All
    };

    let txns = match filter {
        TransactionFilter::All => {
            // Full listing goes through the use-case path
            let sub = ops::list_transactions(repo)?;
            sub.latest().unwrap_or_default()
        }
        other => repo.transactions(&other)?,
    };

    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<5} {:<19} {:<24} {:<16} {:>12}",
        "ID", "Date", "Title", "Category", "Amount"
    );
    println!("{}", "─".repeat(80));
    for txn in &txns {
        println!(
            "{:<5} {:<19} {:<24} {:<16} {:>12}",
            txn.id.unwrap_or(0),
            txn.date.format("%Y-%m-%d %H:%M:%S"),
            txn.title,
            txn.category,
            format!("${:.2}", txn.signed_amount()),
        );
    }
    let income = txns.iter().filter(|t| t.is_income()).count();
    let expense = txns.iter().filter(|t| t.is_expense()).count();
    println!("{} transactions ({income} income, {expense} expense)", txns.len());
    Ok(())
}

fn cli_add(args: &[String], repo: &mut LedgerRepository) -> Result<()> {
    if args.len() < 4 {
        anyhow::bail!(
            "Usage: finledger add <title> <amount> <income|expense> <category> [description] [--date <ISO>]"
        );
    }

    let title = args[0].clone();
    let amount = Decimal::from_str(&args[1])
        .map_err(|_| anyhow::anyhow!("Not a valid amount: {}", args[1]))?;
    let kind = parse_kind(&args[2])?;
    let category = args[3].clone();

    let date = match args.windows(2).find(|w| w[0] == "--date") {
        Some(w) => NaiveDateTime::parse_from_str(&w[1], "%Y-%m-%dT%H:%M:%S")
            .map_err(|_| anyhow::anyhow!("Not a valid date-time: {}", w[1]))?,
        None => chrono::Local::now().naive_local(),
    };

    let mut txn = Transaction::new(title, amount, kind, category, date);
    txn.description = args
        .get(4)
        .filter(|a| !a.starts_with('-'))
        .map(|a| a.to_string());

    ops::add_transaction(repo, &txn)?;
    println!("Added: {} (${:.2} {})", txn.title, txn.amount, txn.kind);
    Ok(())
}

fn cli_edit(args: &[String], repo: &mut LedgerRepository) -> Result<()> {
    let id: i64 = args
        .first()
        .and_then(|a| a.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("Usage: finledger edit <id> [--title <t>] [--amount <a>] [--category <c>] [--description <d>]"))?;

    let mut txn = repo
        .transaction_by_id(id)?
        .ok_or_else(|| anyhow::anyhow!("No transaction with id {id}"))?;

    for pair in args[1..].windows(2) {
        match pair[0].as_str() {
            "--title" => txn.title = pair[1].clone(),
            "--amount" => {
                txn.amount = Decimal::from_str(&pair[1])
                    .map_err(|_| anyhow::anyhow!("Not a valid amount: {}", pair[1]))?;
            }
            "--category" => txn.category = pair[1].clone(),
            "--description" => txn.description = Some(pair[1].clone()),
            _ => {}
        }
    }

    repo.update(&txn)?;
    println!("Updated transaction {id}");
    Ok(())
}

fn cli_delete(args: &[String], repo: &mut LedgerRepository) -> Result<()> {
    let id: i64 = args
        .first()
        .and_then(|a| a.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("Usage: finledger delete <id>"))?;

    ops::delete_transaction(repo, id)?;
    println!("Deleted transaction {id}");
    Ok(())
}

fn cli_summary(repo: &mut LedgerRepository) -> Result<()> {
    // The initial snapshot is queued at subscribe time, so this does not block.
    let sub = ops::financial_summary(repo)?;
    let summary = sub.recv().unwrap_or_default();

    println!("FinLedger — summary");
    println!("{}", "─".repeat(40));
    println!("  Income:     ${:.2}", summary.total_income);
    println!("  Expenses:   ${:.2}", summary.total_expense);
    println!("  Balance:    ${:.2}", summary.total_balance);
    println!("  Total Txns: {}", summary.transaction_count);
    if !summary.is_positive_balance() {
        println!();
        println!("  Spending exceeds income.");
    }
    Ok(())
}

fn cli_categories(repo: &mut LedgerRepository) -> Result<()> {
    let sub = repo.watch_categories()?;
    let categories = sub.recv().unwrap_or_default();
    if categories.is_empty() {
        println!("No categories yet. Some ideas:");
        for name in SUGGESTED_CATEGORIES {
            println!("  {name}");
        }
        return Ok(());
    }
    for name in &categories {
        println!("{name}");
    }
    Ok(())
}

fn cli_clear(repo: &mut LedgerRepository) -> Result<()> {
    repo.delete_all()?;
    println!("Ledger cleared");
    Ok(())
}
