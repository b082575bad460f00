use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// The two kinds of ledger entry. Closed set: the store adapter rejects
/// anything else at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// A single ledger entry. Immutable value snapshot: any change is a full
/// replacement by id, never a partial patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// `None` until the store assigns an id on insert.
    pub id: Option<i64>,
    pub title: String,
    /// Unsigned magnitude; the sign lives in `kind`.
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
}

impl Transaction {
    pub fn new(
        title: String,
        amount: Decimal,
        kind: TransactionKind,
        category: String,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            title,
            amount,
            kind,
            category,
            description: None,
            date,
        }
    }

    /// Amount with the sign implied by the kind: income positive,
    /// expense negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}
