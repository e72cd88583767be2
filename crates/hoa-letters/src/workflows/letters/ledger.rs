use super::normalizer::{clean_cell, coalesce, parse_balance};
use super::table::{RawRow, RawTable, ASSOCIATION_COLUMN};
use super::LetterError;
use rust_decimal::Decimal;

pub const ACCOUNT_COLUMN: &str = "Account #";
pub const ADDRESS_TYPE_COLUMN: &str = "Address Type";
pub const BALANCE_COLUMN: &str = "Balance";

const PROPERTY_ADDRESS_LABEL: &str = "Property Address";
const OWNERS_OFFSITE_ADDRESS_LABEL: &str = "Owner's Offsite Address";

/// Which mailing address a ledger row describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressCategory {
    PropertyAddress,
    OwnersOffsiteAddress,
    Other(String),
}

impl AddressCategory {
    /// Matches the export's labels exactly; padding or casing differences yield `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            PROPERTY_ADDRESS_LABEL => Self::PropertyAddress,
            OWNERS_OFFSITE_ADDRESS_LABEL => Self::OwnersOffsiteAddress,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::PropertyAddress => PROPERTY_ADDRESS_LABEL,
            Self::OwnersOffsiteAddress => OWNERS_OFFSITE_ADDRESS_LABEL,
            Self::Other(raw) => raw,
        }
    }

    pub fn is_mailable(&self) -> bool {
        matches!(self, Self::PropertyAddress | Self::OwnersOffsiteAddress)
    }
}

/// One owner/account/address-type row of the ledger export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub account: String,
    pub category: AddressCategory,
    pub balance: Decimal,
    pub association: String,
    pub first_name: String,
    pub last_name: String,
    pub street_number: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Column positions resolved once per export.
#[derive(Debug, Clone, Copy)]
pub struct LedgerColumns {
    account: usize,
    category: usize,
    balance: usize,
    association: usize,
    first_name: Option<usize>,
    last_name: Option<usize>,
    street_number: Option<usize>,
    address_line: Option<usize>,
    city: Option<usize>,
    state: Option<usize>,
    zip: Option<usize>,
}

impl LedgerColumns {
    pub fn resolve(table: &RawTable) -> Result<Self, LetterError> {
        let required = |column: &'static str| {
            table
                .column_index(column)
                .ok_or(LetterError::MissingColumn {
                    source_name: "ledger export",
                    column,
                })
        };

        let account = required(ACCOUNT_COLUMN)?;
        let category = required(ADDRESS_TYPE_COLUMN)?;
        let balance = required(BALANCE_COLUMN)?;
        let association = ASSOCIATION_COLUMN.resolve(table.headers()).ok_or_else(|| {
            LetterError::unresolved("ledger export", ASSOCIATION_COLUMN.description, table)
        })?;

        Ok(Self {
            account,
            category,
            balance,
            association,
            first_name: table.column_index("First Name"),
            last_name: table.column_index("Last Name"),
            street_number: table.column_index("Street #"),
            address_line: table.column_index("Address 1"),
            city: table.column_index("City"),
            state: table.column_index("State"),
            zip: table.column_index("Zip Code"),
        })
    }

    fn read(&self, row: &RawRow<'_>) -> LedgerRow {
        let text = |column: Option<usize>| clean_cell(&coalesce([row.cell(column)]));

        LedgerRow {
            account: text(Some(self.account)),
            category: AddressCategory::parse(row.cell(Some(self.category)).unwrap_or_default()),
            balance: parse_balance(&text(Some(self.balance))),
            association: text(Some(self.association)),
            first_name: text(self.first_name),
            last_name: text(self.last_name),
            street_number: text(self.street_number),
            address_line: text(self.address_line),
            city: text(self.city),
            state: text(self.state),
            zip: text(self.zip),
        }
    }
}

/// Validates the export schema, then converts every row.
pub fn load_ledger(table: &RawTable) -> Result<Vec<LedgerRow>, LetterError> {
    let columns = LedgerColumns::resolve(table)?;
    Ok(table.rows().map(|row| columns.read(&row)).collect())
}
