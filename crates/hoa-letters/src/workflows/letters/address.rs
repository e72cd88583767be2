use super::ledger::LedgerRow;
use super::normalizer::clean_street_number;
use serde::Serialize;

/// Mailing address rendered whole and split into its two letter lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressLines {
    pub full: String,
    pub street_unit: String,
    pub city_state_zip: String,
}

impl AddressLines {
    /// Missing rows compose to three empty strings.
    pub fn from_row(row: Option<&LedgerRow>) -> Self {
        let Some(row) = row else {
            return Self::default();
        };

        let street_unit = street_unit_line(row);
        let city_state_zip = city_state_zip_line(row);
        let full = join_lines(&street_unit, &city_state_zip);
        Self {
            full,
            street_unit,
            city_state_zip,
        }
    }
}

pub fn street_unit_line(row: &LedgerRow) -> String {
    let street_number = clean_street_number(&row.street_number);
    join_present(&[street_number.as_str(), row.address_line.as_str()])
}

pub fn city_state_zip_line(row: &LedgerRow) -> String {
    join_present(&[row.city.as_str(), row.state.as_str(), row.zip.as_str()])
}

pub fn full_address(row: &LedgerRow) -> String {
    join_lines(&street_unit_line(row), &city_state_zip_line(row))
}

fn join_lines(street_unit: &str, city_state_zip: &str) -> String {
    match (street_unit.is_empty(), city_state_zip.is_empty()) {
        (false, false) => format!("{street_unit}, {city_state_zip}"),
        (false, true) => street_unit.to_string(),
        (true, _) => city_state_zip.to_string(),
    }
}

fn join_present(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::letters::ledger::AddressCategory;
    use rust_decimal::Decimal;

    fn address(street: &str, line: &str, city: &str, state: &str, zip: &str) -> LedgerRow {
        LedgerRow {
            account: "A-1".to_string(),
            category: AddressCategory::PropertyAddress,
            balance: Decimal::ZERO,
            association: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            street_number: street.to_string(),
            address_line: line.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            zip: zip.to_string(),
        }
    }

    #[test]
    fn full_address_joins_both_lines_with_comma() {
        let row = address("100", "Main St", "Springfield", "IL", "62704");
        assert_eq!(full_address(&row), "100 Main St, Springfield IL 62704");
    }

    #[test]
    fn full_address_omits_missing_halves() {
        assert_eq!(full_address(&address("100", "Main St", "", "", "")), "100 Main St");
        assert_eq!(full_address(&address("", "", "Ames", "", "50010")), "Ames 50010");
        assert_eq!(full_address(&address("", "", "", "", "")), "");
    }

    #[test]
    fn street_line_cleans_float_street_numbers() {
        let row = address("221.0", "Baker St Unit 2", "", "", "");
        assert_eq!(street_unit_line(&row), "221 Baker St Unit 2");
        assert_eq!(street_unit_line(&address("", "PO Box 9", "", "", "")), "PO Box 9");
        assert_eq!(street_unit_line(&address("12A", "", "", "", "")), "12A");
    }

    #[test]
    fn address_lines_split_the_full_address() {
        let row = address("5", "Elm Ct", "Ames", "IA", "50010");
        let lines = AddressLines::from_row(Some(&row));
        assert_eq!(lines.full, "5 Elm Ct, Ames IA 50010");
        assert_eq!(lines.street_unit, "5 Elm Ct");
        assert_eq!(lines.city_state_zip, "Ames IA 50010");
        assert_eq!(AddressLines::from_row(None), AddressLines::default());
    }
}
