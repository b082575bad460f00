mod summary;
mod transaction;

pub use summary::FinancialSummary;
pub use transaction::{Transaction, TransactionKind};

#[cfg(test)]
mod tests;
