#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn date(day: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn income(amount: Decimal) -> Transaction {
    Transaction::new(
        "Salary".into(),
        amount,
        TransactionKind::Income,
        "Work".into(),
        date(1),
    )
}

fn expense(amount: Decimal) -> Transaction {
    Transaction::new(
        "Rent".into(),
        amount,
        TransactionKind::Expense,
        "Housing".into(),
        date(2),
    )
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_new_has_no_id() {
    let txn = income(dec!(100));
    assert!(txn.id.is_none());
    assert!(txn.description.is_none());
}

#[test]
fn test_signed_amount() {
    assert_eq!(income(dec!(100.50)).signed_amount(), dec!(100.50));
    assert_eq!(expense(dec!(100.50)).signed_amount(), dec!(-100.50));
    assert_eq!(expense(Decimal::ZERO).signed_amount(), Decimal::ZERO);
}

#[test]
fn test_kind_predicates() {
    let txn = income(dec!(1));
    assert!(txn.is_income());
    assert!(!txn.is_expense());

    let txn = expense(dec!(1));
    assert!(txn.is_expense());
    assert!(!txn.is_income());
}

#[test]
fn test_kind_display() {
    assert_eq!(format!("{}", TransactionKind::Income), "Income");
    assert_eq!(format!("{}", TransactionKind::Expense), "Expense");
}

// ── FinancialSummary ──────────────────────────────────────────

#[test]
fn test_summary_empty() {
    let summary = FinancialSummary::compute(&[]);
    assert_eq!(summary.total_income, Decimal::ZERO);
    assert_eq!(summary.total_expense, Decimal::ZERO);
    assert_eq!(summary.total_balance, Decimal::ZERO);
    assert_eq!(summary.transaction_count, 0);
    assert!(summary.is_positive_balance());
}

#[test]
fn test_summary_salary_and_rent() {
    let txns = vec![income(dec!(3000)), expense(dec!(1200))];
    let summary = FinancialSummary::compute(&txns);
    assert_eq!(summary.total_income, dec!(3000));
    assert_eq!(summary.total_expense, dec!(1200));
    assert_eq!(summary.total_balance, dec!(1800));
    assert_eq!(summary.transaction_count, 2);
    assert!(summary.is_positive_balance());
}

#[test]
fn test_summary_only_expenses() {
    let txns = vec![expense(dec!(200)), expense(dec!(80))];
    let summary = FinancialSummary::compute(&txns);
    assert_eq!(summary.total_income, Decimal::ZERO);
    assert_eq!(summary.total_expense, dec!(280));
    assert_eq!(summary.total_balance, dec!(-280));
    assert_eq!(summary.transaction_count, 2);
    assert!(!summary.is_positive_balance());
}

#[test]
fn test_summary_balance_is_income_minus_expense() {
    let txns = vec![
        income(dec!(10.10)),
        income(dec!(0.01)),
        expense(dec!(3.33)),
        expense(dec!(7.00)),
    ];
    let summary = FinancialSummary::compute(&txns);
    assert_eq!(
        summary.total_balance,
        summary.total_income - summary.total_expense
    );
}

#[test]
fn test_summary_count_includes_every_kind() {
    let txns = vec![income(dec!(1)), expense(dec!(1)), income(dec!(1))];
    assert_eq!(FinancialSummary::compute(&txns).transaction_count, 3);
}

#[test]
fn test_summary_zero_balance_is_positive() {
    let txns = vec![income(dec!(50)), expense(dec!(50))];
    let summary = FinancialSummary::compute(&txns);
    assert_eq!(summary.total_balance, Decimal::ZERO);
    assert!(summary.is_positive_balance());
}

#[test]
fn test_summary_exact_decimal_sums() {
    // 0.1 + 0.2 is exact in Decimal, unlike binary floats
    let txns = vec![income(dec!(0.1)), income(dec!(0.2)), expense(dec!(0.3))];
    let summary = FinancialSummary::compute(&txns);
    assert_eq!(summary.total_income, dec!(0.3));
    assert_eq!(summary.total_balance, Decimal::ZERO);
}
