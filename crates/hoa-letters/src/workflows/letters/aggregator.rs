use super::ledger::{AddressCategory, LedgerRow};
use std::collections::BTreeMap;

/// Filtered ledger rows for one account, split by address category in export order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountGroup {
    account: String,
    property_rows: Vec<LedgerRow>,
    offsite_rows: Vec<LedgerRow>,
}

impl AccountGroup {
    fn new(account: String) -> Self {
        Self {
            account,
            property_rows: Vec::new(),
            offsite_rows: Vec::new(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn property_rows(&self) -> &[LedgerRow] {
        &self.property_rows
    }

    pub fn offsite_rows(&self) -> &[LedgerRow] {
        &self.offsite_rows
    }

    pub fn first_property(&self) -> Option<&LedgerRow> {
        self.property_rows.first()
    }

    pub fn first_offsite(&self) -> Option<&LedgerRow> {
        self.offsite_rows.first()
    }

    /// Row that sources the owner, association, and balance fields.
    pub fn canonical_row(&self) -> Option<&LedgerRow> {
        self.first_property().or_else(|| self.first_offsite())
    }

    pub fn has_both_addresses(&self) -> bool {
        !self.property_rows.is_empty() && !self.offsite_rows.is_empty()
    }
}

/// Groups filtered rows by exact account identifier, ascending.
///
/// Rows outside the two mailable categories are not members of any partition and are skipped.
pub fn group_accounts(rows: Vec<LedgerRow>) -> Vec<AccountGroup> {
    let mut groups: BTreeMap<String, AccountGroup> = BTreeMap::new();

    for row in rows {
        let is_property = match row.category {
            AddressCategory::PropertyAddress => true,
            AddressCategory::OwnersOffsiteAddress => false,
            AddressCategory::Other(_) => continue,
        };
        let group = groups
            .entry(row.account.clone())
            .or_insert_with(|| AccountGroup::new(row.account.clone()));
        if is_property {
            group.property_rows.push(row);
        } else {
            group.offsite_rows.push(row);
        }
    }

    groups.into_values().collect()
}
