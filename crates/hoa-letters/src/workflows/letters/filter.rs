use super::ledger::LedgerRow;
use rust_decimal::Decimal;
use tracing::warn;

/// Keeps rows that are worth a letter: an identified account with a mailable address and a
/// balance at or above the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerFilter {
    minimum_balance: Decimal,
}

impl Default for LedgerFilter {
    fn default() -> Self {
        Self::new(Decimal::new(1000, 2))
    }
}

impl LedgerFilter {
    pub fn new(minimum_balance: Decimal) -> Self {
        Self { minimum_balance }
    }

    pub fn minimum_balance(&self) -> Decimal {
        self.minimum_balance
    }

    pub fn accepts(&self, row: &LedgerRow) -> bool {
        !row.account.is_empty()
            && row.balance >= self.minimum_balance
            && row.category.is_mailable()
    }

    pub fn apply(&self, rows: Vec<LedgerRow>) -> Vec<LedgerRow> {
        let unidentified = rows.iter().filter(|row| row.account.is_empty()).count();
        if unidentified > 0 {
            warn!(rows = unidentified, "dropping ledger rows without an account number");
        }
        rows.into_iter().filter(|row| self.accepts(row)).collect()
    }
}
