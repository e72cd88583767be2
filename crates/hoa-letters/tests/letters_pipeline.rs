use chrono::NaiveDate;
use hoa_letters::workflows::letters::normalizer::{clean_street_number, format_money};
use hoa_letters::workflows::letters::{
    build_letter_batch, AssociationEmailIndex, LetterError, LetterOptions, LetterVariant,
    RawTable,
};

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid run date")
}

fn sample_ledger() -> RawTable {
    let data = include_bytes!("fixtures/converted_sample.csv");
    RawTable::from_reader(&data[..]).expect("sample ledger parses")
}

fn sample_emails() -> AssociationEmailIndex {
    let data = include_bytes!("fixtures/emails.csv");
    let roster = RawTable::from_reader(&data[..]).expect("sample roster parses");
    AssociationEmailIndex::from_table(&roster).expect("roster index builds")
}

#[test]
fn sample_export_produces_one_letter_per_eligible_account() {
    let batch = build_letter_batch(&sample_ledger(), &sample_emails(), &LetterOptions::new(run_date()))
        .expect("batch builds");

    let letter1: Vec<_> = batch
        .letter1
        .iter()
        .map(|record| record.account_number.as_str())
        .collect();
    let letter2: Vec<_> = batch
        .letter2
        .iter()
        .map(|record| record.account_number.as_str())
        .collect();

    assert_eq!(letter1, ["10-0007", "10-0150", "10-0300"]);
    assert_eq!(letter2, ["10-0042"]);
    assert!(batch.letter1.iter().all(|record| record.variant() == LetterVariant::Letter1));
    assert!(batch.letter2.iter().all(|record| record.variant() == LetterVariant::Letter2));
}

#[test]
fn dual_address_account_carries_both_address_blocks() {
    let batch = build_letter_batch(&sample_ledger(), &sample_emails(), &LetterOptions::new(run_date()))
        .expect("batch builds");
    let record = &batch.letter2[0];

    assert_eq!(record.owners_name, "Maria Santos");
    assert_eq!(record.amount, "$1,275.40");
    assert_eq!(record.email_address, "board@willowcreek.org");
    assert_eq!(record.date, "October 16, 2026");
    assert_eq!(record.last_day_of_month, "October 31, 2026");

    let property = record.property_address();
    assert_eq!(property.full, "1450 Willow Creek Dr, Ankeny IA 50023");
    assert_eq!(property.street_unit, "1450 Willow Creek Dr");
    assert_eq!(property.city_state_zip, "Ankeny IA 50023");

    let offsite = record.offsite_address().expect("offsite block");
    assert_eq!(offsite.full, "88 Harbor View Ln Apt 4B, Tampa FL 33602");
}

#[test]
fn single_address_accounts_tolerate_partial_data() {
    let batch = build_letter_batch(&sample_ledger(), &sample_emails(), &LetterOptions::new(run_date()))
        .expect("batch builds");

    let boundary = &batch.letter1[0];
    assert_eq!(boundary.amount, "$10.00");
    assert_eq!(boundary.property_address().full, "12A Birch Ct, Ankeny IA");
    assert_eq!(boundary.email_address, "board@willowcreek.org");

    let offsite_only = &batch.letter1[1];
    assert_eq!(offsite_only.owners_name, "Chen");
    assert_eq!(
        offsite_only.property_address().full,
        "5 Lake Shore Blvd, Chicago IL 60611"
    );
    assert!(offsite_only.offsite_address().is_none());
    assert_eq!(offsite_only.email_address, "");

    let missing_street = &batch.letter1[2];
    assert_eq!(missing_street.property_address().street_unit, "Cedar Bluff Unit 7");
    assert_eq!(missing_street.email_address, "cedar@bluff.org");
}

#[test]
fn single_property_row_yields_single_letter1() {
    let csv = "Account #,Address Type,Balance,Association Name,Street #,Address 1,City,State,Zip Code\n\
77,Property Address,50.00,Oak HOA,100,Main St,Springfield,IL,62704\n";
    let ledger = RawTable::from_reader(csv.as_bytes()).expect("parse");
    let batch = build_letter_batch(
        &ledger,
        &AssociationEmailIndex::empty(),
        &LetterOptions::new(run_date()),
    )
    .expect("batch builds");

    assert!(batch.letter2.is_empty());
    assert_eq!(batch.letter1.len(), 1);
    let record = &batch.letter1[0];
    assert_eq!(record.property_address().full, "100 Main St, Springfield IL 62704");
    assert!(record.offsite_address().is_none());
    assert_eq!(record.fields().len(), LetterVariant::Letter1.field_names().len());
}

#[test]
fn roster_without_association_column_is_a_schema_error() {
    let roster = RawTable::from_reader("Name,Email\nOak,a@x.com\n".as_bytes()).expect("parse");
    let error = AssociationEmailIndex::from_table(&roster).expect_err("schema error");
    assert!(matches!(
        error,
        LetterError::UnresolvedColumn {
            source_name: "contact roster",
            ..
        }
    ));
}

#[test]
fn normalizer_examples_hold() {
    assert_eq!(clean_street_number("123.0"), "123");
    assert_eq!(clean_street_number("45.50"), "45.50");
    assert_eq!(clean_street_number("12A"), "12A");
    assert_eq!(clean_street_number(""), "");
    assert_eq!(format_money("1234.5"), "$1,234.50");
    assert_eq!(format_money("abc"), "");
}
