//! Ledger-to-letter consolidation.
//!
//! A raw export carries one row per owner, account, and address type. The pipeline filters the
//! rows that warrant a letter, groups them per account, and emits one record per account tagged
//! as a single-address (Letter 1) or dual-address (Letter 2) letter.

pub mod address;
pub mod aggregator;
pub mod classifier;
pub mod contacts;
pub mod export;
pub mod filter;
pub mod ledger;
pub mod normalizer;
pub mod render;
pub mod source;
pub mod table;

pub use address::AddressLines;
pub use aggregator::{group_accounts, AccountGroup};
pub use classifier::{build_record, LetterAddresses, LetterDates, LetterRecord, LetterVariant};
pub use contacts::AssociationEmailIndex;
pub use export::{export_batch, write_letter_csv, ExportError, ExportSummary};
pub use filter::LedgerFilter;
pub use ledger::{load_ledger, AddressCategory, LedgerRow};
pub use render::{
    execute_plan, plan_renders, ContextFileRenderer, LetterRenderer, RenderJob, RenderPlan,
    RenderTemplates,
};
pub use source::{latest_export, SourceError};
pub use table::{RawTable, TableError};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

/// Structural problems that stop a run before any letter is built.
#[derive(Debug, thiserror::Error)]
pub enum LetterError {
    #[error("{source_name} is missing required column '{column}'")]
    MissingColumn {
        source_name: &'static str,
        column: &'static str,
    },
    #[error("{source_name} has no {description} column (headers: {headers})")]
    UnresolvedColumn {
        source_name: &'static str,
        description: &'static str,
        headers: String,
    },
    #[error(transparent)]
    Table(#[from] TableError),
}

impl LetterError {
    pub(crate) fn unresolved(
        source_name: &'static str,
        description: &'static str,
        table: &RawTable,
    ) -> Self {
        Self::UnresolvedColumn {
            source_name,
            description,
            headers: table.headers().join(", "),
        }
    }
}

/// Run parameters supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterOptions {
    pub today: NaiveDate,
    pub minimum_balance: Decimal,
}

impl LetterOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            minimum_balance: LedgerFilter::default().minimum_balance(),
        }
    }

    pub fn with_minimum_balance(mut self, minimum_balance: Decimal) -> Self {
        self.minimum_balance = minimum_balance;
        self
    }
}

/// Letters of one run, partitioned by variant, each in ascending account order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterBatch {
    pub letter1: Vec<LetterRecord>,
    pub letter2: Vec<LetterRecord>,
}

impl LetterBatch {
    pub fn records(&self, variant: LetterVariant) -> &[LetterRecord] {
        match variant {
            LetterVariant::Letter1 => &self.letter1,
            LetterVariant::Letter2 => &self.letter2,
        }
    }

    pub fn len(&self) -> usize {
        self.letter1.len() + self.letter2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letter1.is_empty() && self.letter2.is_empty()
    }

    fn push(&mut self, record: LetterRecord) {
        match record.variant() {
            LetterVariant::Letter1 => self.letter1.push(record),
            LetterVariant::Letter2 => self.letter2.push(record),
        }
    }
}

/// Runs filter, grouping, and classification over an already-loaded ledger export.
pub fn build_letter_batch(
    ledger: &RawTable,
    emails: &AssociationEmailIndex,
    options: &LetterOptions,
) -> Result<LetterBatch, LetterError> {
    let rows = load_ledger(ledger)?;
    let total_rows = rows.len();

    let eligible = LedgerFilter::new(options.minimum_balance).apply(rows);
    let eligible_rows = eligible.len();
    let groups = group_accounts(eligible);

    let dates = LetterDates::for_date(options.today);
    let mut batch = LetterBatch::default();
    for group in &groups {
        if let Some(record) = build_record(group, &dates, emails) {
            batch.push(record);
        }
    }

    let unresolved_emails = batch
        .letter1
        .iter()
        .chain(&batch.letter2)
        .filter(|record| record.email_address.is_empty())
        .count();

    info!(
        total_rows,
        eligible_rows,
        accounts = groups.len(),
        letter1 = batch.letter1.len(),
        letter2 = batch.letter2.len(),
        unresolved_emails,
        "letter batch built"
    );

    Ok(batch)
}
