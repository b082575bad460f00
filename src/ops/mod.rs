//! Ledger use-cases: thin, stateless orchestration over the repository.
//! Every fault from the persistence layer is returned as a typed failure,
//! never an uncaught panic.

use rust_decimal::Decimal;

use crate::ledger::{LedgerError, LedgerRepository, Subscription, TransactionFilter};
use crate::models::{FinancialSummary, Transaction};

/// Live listing of the full ledger, date descending.
pub(crate) fn list_transactions(
    repo: &mut LedgerRepository,
) -> Result<Subscription<Vec<Transaction>>, LedgerError> {
    repo.watch_transactions(TransactionFilter::All)
}

/// Validates and records a new transaction. A negative magnitude would
/// silently corrupt the sign-by-kind convention, so it is rejected here
/// rather than stored.
pub(crate) fn add_transaction(
    repo: &mut LedgerRepository,
    txn: &Transaction,
) -> Result<(), LedgerError> {
    if txn.title.trim().is_empty() {
        return Err(LedgerError::EmptyTitle);
    }
    if txn.amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount(txn.amount));
    }
    repo.insert(txn)
}

/// Completes successfully even when the id does not exist.
pub(crate) fn delete_transaction(
    repo: &mut LedgerRepository,
    id: i64,
) -> Result<(), LedgerError> {
    repo.delete_by_id(id)
}

/// Live income/expense/balance/count aggregate, recomputed on every write.
pub(crate) fn financial_summary(
    repo: &mut LedgerRepository,
) -> Result<Subscription<FinancialSummary>, LedgerError> {
    repo.watch_summary()
}
