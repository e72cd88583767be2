use super::address::AddressLines;
use super::aggregator::AccountGroup;
use super::contacts::AssociationEmailIndex;
use super::normalizer::format_amount;
use chrono::{Datelike, NaiveDate};
use serde::ser::{Serialize, SerializeMap, Serializer};

const LETTER_DATE_FORMAT: &str = "%B %d, %Y";

const LETTER1_FIELDS: &[&str] = &[
    "date",
    "last_day_of_month",
    "ownersName",
    "associationName",
    "accNum",
    "amount",
    "emailAddress",
    "propertyAddress",
    "propertyAddress_st_unit",
    "propertyAddress_city_state_zip",
];

const LETTER2_FIELDS: &[&str] = &[
    "date",
    "last_day_of_month",
    "ownersName",
    "associationName",
    "accNum",
    "amount",
    "emailAddress",
    "propertyAddress",
    "propertyAddress_st_unit",
    "propertyAddress_city_state_zip",
    "ownersOffsiteAddress",
    "ownersOffsiteAddress_st_unit",
    "ownersOffsiteAddress_city_state_zip",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum LetterVariant {
    Letter1,
    Letter2,
}

impl LetterVariant {
    pub const fn ordered() -> [Self; 2] {
        [Self::Letter1, Self::Letter2]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Letter1 => "Letter 1",
            Self::Letter2 => "Letter 2",
        }
    }

    /// Template substitution keys carried by records of this variant, in export order.
    pub const fn field_names(self) -> &'static [&'static str] {
        match self {
            Self::Letter1 => LETTER1_FIELDS,
            Self::Letter2 => LETTER2_FIELDS,
        }
    }

    pub fn for_group(group: &AccountGroup) -> Self {
        if group.has_both_addresses() {
            Self::Letter2
        } else {
            Self::Letter1
        }
    }
}

/// Both letter dates, rendered as `October 16, 2026`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterDates {
    pub today: String,
    pub last_day_of_month: String,
}

impl LetterDates {
    pub fn for_date(today: NaiveDate) -> Self {
        Self {
            today: today.format(LETTER_DATE_FORMAT).to_string(),
            last_day_of_month: last_day_of_month(today)
                .format(LETTER_DATE_FORMAT)
                .to_string(),
        }
    }
}

pub(crate) fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

/// Address block of a letter. The dual form exists only when both addresses are on file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LetterAddresses {
    Single(AddressLines),
    Dual {
        property: AddressLines,
        offsite: AddressLines,
    },
}

/// One consolidated, letter-ready account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterRecord {
    pub date: String,
    pub last_day_of_month: String,
    pub owners_name: String,
    pub association_name: String,
    pub account_number: String,
    pub amount: String,
    pub email_address: String,
    pub addresses: LetterAddresses,
}

impl LetterRecord {
    pub fn variant(&self) -> LetterVariant {
        match self.addresses {
            LetterAddresses::Single(_) => LetterVariant::Letter1,
            LetterAddresses::Dual { .. } => LetterVariant::Letter2,
        }
    }

    pub fn property_address(&self) -> &AddressLines {
        match &self.addresses {
            LetterAddresses::Single(property) => property,
            LetterAddresses::Dual { property, .. } => property,
        }
    }

    pub fn offsite_address(&self) -> Option<&AddressLines> {
        match &self.addresses {
            LetterAddresses::Single(_) => None,
            LetterAddresses::Dual { offsite, .. } => Some(offsite),
        }
    }

    /// Key/value pairs named by [`LetterVariant::field_names`], in the same order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let property = self.property_address();
        let mut values = vec![
            self.date.as_str(),
            self.last_day_of_month.as_str(),
            self.owners_name.as_str(),
            self.association_name.as_str(),
            self.account_number.as_str(),
            self.amount.as_str(),
            self.email_address.as_str(),
            property.full.as_str(),
            property.street_unit.as_str(),
            property.city_state_zip.as_str(),
        ];
        if let Some(offsite) = self.offsite_address() {
            values.extend([
                offsite.full.as_str(),
                offsite.street_unit.as_str(),
                offsite.city_state_zip.as_str(),
            ]);
        }

        self.variant()
            .field_names()
            .iter()
            .copied()
            .zip(values)
            .collect()
    }
}

impl Serialize for LetterRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (key, value) in fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Builds the letter for one account group; `None` only for a group without rows.
pub fn build_record(
    group: &AccountGroup,
    dates: &LetterDates,
    emails: &AssociationEmailIndex,
) -> Option<LetterRecord> {
    let canonical = group.canonical_row()?;

    let owners_name = format!("{} {}", canonical.first_name, canonical.last_name)
        .trim()
        .to_string();
    let association_name = canonical.association.clone();
    let email_address = emails.lookup(&association_name).to_string();

    let property = AddressLines::from_row(group.first_property().or(Some(canonical)));
    let addresses = match LetterVariant::for_group(group) {
        LetterVariant::Letter2 => LetterAddresses::Dual {
            property,
            offsite: AddressLines::from_row(group.first_offsite()),
        },
        LetterVariant::Letter1 => LetterAddresses::Single(property),
    };

    Some(LetterRecord {
        date: dates.today.clone(),
        last_day_of_month: dates.last_day_of_month.clone(),
        owners_name,
        association_name,
        account_number: group.account().to_string(),
        amount: format_amount(canonical.balance),
        email_address,
        addresses,
    })
}
