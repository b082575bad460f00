mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::{Transaction, TransactionKind};

/// ISO-8601 local date-time, e.g. `2024-01-15T09:30:00`. Fixed-width, so
/// lexicographic order on the stored text matches chronological order.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, thiserror::Error)]
#[error("unknown transaction type: {0}")]
struct UnknownKind(String);

fn kind_to_db(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "INCOME",
        TransactionKind::Expense => "EXPENSE",
    }
}

fn kind_from_db(s: &str) -> std::result::Result<TransactionKind, UnknownKind> {
    match s {
        "INCOME" => Ok(TransactionKind::Income),
        "EXPENSE" => Ok(TransactionKind::Expense),
        other => Err(UnknownKind(other.to_string())),
    }
}

fn date_to_db(date: NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Test-only escape hatch for simulating store faults.
    #[cfg(test)]
    pub(crate) fn raw_execute(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Writes ────────────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO transactions (title, amount, category, type, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                txn.title,
                txn.amount.to_string(),
                txn.category,
                kind_to_db(txn.kind),
                date_to_db(txn.date),
                txn.description,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Full replacement of the record matching `txn.id`. Returns the number
    /// of rows touched (zero when no such id exists).
    pub(crate) fn update_transaction(&self, id: i64, txn: &Transaction) -> Result<usize> {
        let rows = self.conn.execute(
            "UPDATE transactions
             SET title = ?1, amount = ?2, category = ?3, type = ?4, date = ?5, description = ?6
             WHERE id = ?7",
            params![
                txn.title,
                txn.amount.to_string(),
                txn.category,
                kind_to_db(txn.kind),
                date_to_db(txn.date),
                txn.description,
                id,
            ],
        )?;
        Ok(rows)
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub(crate) fn delete_all_transactions(&self) -> Result<()> {
        self.conn.execute("DELETE FROM transactions", [])?;
        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────

    pub(crate) fn get_transaction_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            "SELECT id, title, amount, category, type, date, description
             FROM transactions WHERE id = ?1",
            params![id],
            row_to_transaction,
        );
        match result {
            Ok(txn) => Ok(Some(txn)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, amount, category, type, date, description
             FROM transactions ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map([], row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transactions_by_kind(&self, kind: TransactionKind) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, amount, category, type, date, description
             FROM transactions WHERE type = ?1 ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![kind_to_db(kind)], row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transactions_by_category(&self, category: &str) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, amount, category, type, date, description
             FROM transactions WHERE category = ?1 ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![category], row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Inclusive on both ends.
    pub(crate) fn get_transactions_by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, amount, category, type, date, description
             FROM transactions WHERE date BETWEEN ?1 AND ?2 ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map(
            params![date_to_db(start), date_to_db(end)],
            row_to_transaction,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_distinct_categories(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT category FROM transactions ORDER BY category ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Aggregate pushdown ────────────────────────────────────
    //
    // Convenience queries evaluated inside SQLite. The repository's summary
    // path deliberately does not use these: the domain-level summation rule
    // in FinancialSummary::compute is the single source of truth.

    pub(crate) fn total_balance(&self) -> Result<Decimal> {
        let total: String = self.conn.query_row(
            "SELECT CAST(COALESCE(SUM(CASE WHEN type = 'INCOME' THEN amount ELSE -amount END), 0) AS TEXT)
             FROM transactions",
            [],
            |row| row.get(0),
        )?;
        Ok(Decimal::from_str(&total).unwrap_or_default())
    }

    pub(crate) fn total_by_kind(&self, kind: TransactionKind) -> Result<Decimal> {
        let total: String = self.conn.query_row(
            "SELECT CAST(COALESCE(SUM(amount), 0) AS TEXT) FROM transactions WHERE type = ?1",
            params![kind_to_db(kind)],
            |row| row.get(0),
        )?;
        Ok(Decimal::from_str(&total).unwrap_or_default())
    }
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let amount_str: String = row.get(2)?;
    let kind_str: String = row.get(4)?;
    let date_str: String = row.get(5)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        category: row.get(3)?,
        kind: kind_from_db(&kind_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?,
        date: NaiveDateTime::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?,
        description: row.get(6)?,
    })
}
