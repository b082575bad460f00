mod watch;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::sync::mpsc::Sender;

use crate::db::Database;
use crate::models::{FinancialSummary, Transaction, TransactionKind};

pub(crate) use watch::Subscription;

/// Failures surfaced by the repository and use-case layer. Store faults are
/// caught here exactly once and carry the store's message text.
#[derive(Debug, thiserror::Error)]
pub(crate) enum LedgerError {
    #[error("transaction title must not be empty")]
    EmptyTitle,
    #[error("transaction amount must not be negative: {0}")]
    NegativeAmount(Decimal),
    #[error("no transaction with id {0}")]
    NotFound(i64),
    #[error("{0}")]
    Store(String),
}

impl LedgerError {
    fn store(err: anyhow::Error) -> Self {
        let reason = err.to_string();
        if reason.is_empty() {
            Self::Store("storage operation failed".into())
        } else {
            Self::Store(reason)
        }
    }
}

/// Which slice of the ledger a read observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransactionFilter {
    All,
    Kind(TransactionKind),
    Category(String),
    DateRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

enum Watcher {
    Transactions {
        filter: TransactionFilter,
        tx: Sender<Vec<Transaction>>,
    },
    Summary {
        tx: Sender<FinancialSummary>,
    },
    Categories {
        tx: Sender<Vec<String>>,
    },
}

impl Watcher {
    /// Re-runs the watcher's query and emits a fresh snapshot. `Ok(false)`
    /// means the observer dropped its subscription and the watcher should be
    /// pruned. A failed query keeps the watcher and its observer's last-known
    /// state: no emission, no retry.
    fn refresh(&self, db: &Database) -> anyhow::Result<bool> {
        match self {
            Self::Transactions { filter, tx } => Ok(tx.send(query(db, filter)?).is_ok()),
            Self::Summary { tx } => {
                // Always the domain summation rule, never the store's
                // native aggregate path.
                let snapshot = FinancialSummary::compute(&db.get_transactions()?);
                Ok(tx.send(snapshot).is_ok())
            }
            Self::Categories { tx } => Ok(tx.send(db.get_distinct_categories()?).is_ok()),
        }
    }
}

fn query(db: &Database, filter: &TransactionFilter) -> anyhow::Result<Vec<Transaction>> {
    match filter {
        TransactionFilter::All => db.get_transactions(),
        TransactionFilter::Kind(kind) => db.get_transactions_by_kind(*kind),
        TransactionFilter::Category(category) => db.get_transactions_by_category(category),
        TransactionFilter::DateRange { start, end } => {
            db.get_transactions_by_date_range(*start, *end)
        }
    }
}

/// Maps between the store and the domain model and publishes live result
/// sets. Owns the store handle outright: constructed with an opened
/// `Database`, torn down by dropping. No global singleton handle exists.
pub(crate) struct LedgerRepository {
    db: Database,
    watchers: Vec<Watcher>,
}

impl LedgerRepository {
    pub(crate) fn new(db: Database) -> Self {
        Self {
            db,
            watchers: Vec::new(),
        }
    }

    // ── Snapshot reads ────────────────────────────────────────

    pub(crate) fn transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerError> {
        query(&self.db, filter).map_err(LedgerError::store)
    }

    pub(crate) fn transaction_by_id(&self, id: i64) -> Result<Option<Transaction>, LedgerError> {
        self.db.get_transaction_by_id(id).map_err(LedgerError::store)
    }

    pub(crate) fn categories(&self) -> Result<Vec<String>, LedgerError> {
        self.db.get_distinct_categories().map_err(LedgerError::store)
    }

    pub(crate) fn summary(&self) -> Result<FinancialSummary, LedgerError> {
        let all = self.db.get_transactions().map_err(LedgerError::store)?;
        Ok(FinancialSummary::compute(&all))
    }

    // ── Live reads ────────────────────────────────────────────

    pub(crate) fn watch_transactions(
        &mut self,
        filter: TransactionFilter,
    ) -> Result<Subscription<Vec<Transaction>>, LedgerError> {
        let initial = self.transactions(&filter)?;
        let (tx, sub) = watch::subscription();
        let _ = tx.send(initial);
        self.watchers.push(Watcher::Transactions { filter, tx });
        Ok(sub)
    }

    pub(crate) fn watch_summary(&mut self) -> Result<Subscription<FinancialSummary>, LedgerError> {
        let initial = self.summary()?;
        let (tx, sub) = watch::subscription();
        let _ = tx.send(initial);
        self.watchers.push(Watcher::Summary { tx });
        Ok(sub)
    }

    pub(crate) fn watch_categories(&mut self) -> Result<Subscription<Vec<String>>, LedgerError> {
        let initial = self.categories()?;
        let (tx, sub) = watch::subscription();
        let _ = tx.send(initial);
        self.watchers.push(Watcher::Categories { tx });
        Ok(sub)
    }

    #[cfg(test)]
    pub(crate) fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &Database {
        &self.db
    }

    // ── Writes ────────────────────────────────────────────────

    /// The store assigns the new id; it is not surfaced here. Callers that
    /// need it re-read via a listing or `transaction_by_id`.
    pub(crate) fn insert(&mut self, txn: &Transaction) -> Result<(), LedgerError> {
        self.db.insert_transaction(txn).map_err(LedgerError::store)?;
        self.notify();
        Ok(())
    }

    /// Full replacement of the record matching `txn.id`. Updating a record
    /// that does not exist is a reported failure, not a silent no-op.
    pub(crate) fn update(&mut self, txn: &Transaction) -> Result<(), LedgerError> {
        let id = match txn.id {
            Some(id) => id,
            None => return Err(LedgerError::NotFound(0)),
        };
        let rows = self
            .db
            .update_transaction(id, txn)
            .map_err(LedgerError::store)?;
        if rows == 0 {
            return Err(LedgerError::NotFound(id));
        }
        self.notify();
        Ok(())
    }

    /// No-op (not an error) when the id does not exist.
    pub(crate) fn delete_by_id(&mut self, id: i64) -> Result<(), LedgerError> {
        self.db.delete_transaction(id).map_err(LedgerError::store)?;
        self.notify();
        Ok(())
    }

    pub(crate) fn delete_all(&mut self) -> Result<(), LedgerError> {
        self.db
            .delete_all_transactions()
            .map_err(LedgerError::store)?;
        self.notify();
        Ok(())
    }

    /// Re-emits every live query after a successful write, pruning watchers
    /// whose observers are gone.
    fn notify(&mut self) {
        let db = &self.db;
        self.watchers
            .retain(|watcher| watcher.refresh(db).unwrap_or(true));
    }
}
