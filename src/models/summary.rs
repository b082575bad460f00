use rust_decimal::Decimal;

use super::transaction::{Transaction, TransactionKind};

/// Derived income/expense/balance/count aggregate over a transaction set.
/// Never persisted; recomputed in full whenever the underlying set changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_balance: Decimal,
    pub transaction_count: usize,
}

impl FinancialSummary {
    /// Single-pass aggregation. Every record counts toward
    /// `transaction_count`; sums are partitioned by kind.
    pub fn compute(transactions: &[Transaction]) -> Self {
        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => total_income += txn.amount,
                TransactionKind::Expense => total_expense += txn.amount,
            }
        }
        Self {
            total_income,
            total_expense,
            total_balance: total_income - total_expense,
            transaction_count: transactions.len(),
        }
    }

    /// Zero balance counts as positive by convention.
    pub fn is_positive_balance(&self) -> bool {
        self.total_balance >= Decimal::ZERO
    }
}
