use super::classifier::{LetterRecord, LetterVariant};
use super::LetterBatch;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write letter CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode render context: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no letter templates found (missing {letter1} and {letter2})")]
    NoTemplates { letter1: String, letter2: String },
}

impl ExportError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Writes records of one variant as a BOM-prefixed CSV keyed by the template placeholders.
pub fn write_letter_csv<W: Write>(
    mut writer: W,
    variant: LetterVariant,
    records: &[LetterRecord],
) -> Result<(), ExportError> {
    writer
        .write_all(UTF8_BOM)
        .map_err(|source| ExportError::Csv(source.into()))?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(variant.field_names())?;
    for record in records {
        csv_writer.write_record(record.fields().iter().map(|(_, value)| *value))?;
    }
    csv_writer
        .flush()
        .map_err(|source| ExportError::Csv(source.into()))?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub letter1_path: PathBuf,
    pub letter2_path: PathBuf,
    pub letter1_rows: usize,
    pub letter2_rows: usize,
}

pub fn export_file_name(variant: LetterVariant) -> &'static str {
    match variant {
        LetterVariant::Letter1 => "letters_letter1.csv",
        LetterVariant::Letter2 => "letters_letter2.csv",
    }
}

/// Writes both variant CSVs into `output_dir`, creating it when needed.
pub fn export_batch(batch: &LetterBatch, output_dir: &Path) -> Result<ExportSummary, ExportError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ExportError::io(output_dir, source))?;

    Ok(ExportSummary {
        letter1_path: write_variant(batch, output_dir, LetterVariant::Letter1)?,
        letter2_path: write_variant(batch, output_dir, LetterVariant::Letter2)?,
        letter1_rows: batch.letter1.len(),
        letter2_rows: batch.letter2.len(),
    })
}

fn write_variant(
    batch: &LetterBatch,
    output_dir: &Path,
    variant: LetterVariant,
) -> Result<PathBuf, ExportError> {
    let path = output_dir.join(export_file_name(variant));
    let file = std::fs::File::create(&path).map_err(|source| ExportError::io(&path, source))?;
    let records = batch.records(variant);
    write_letter_csv(file, variant, records)?;
    info!(
        path = %path.display(),
        rows = records.len(),
        variant = variant.label(),
        "letter CSV written"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::letters::address::AddressLines;
    use crate::workflows::letters::classifier::LetterAddresses;

    fn lines(full: &str, street_unit: &str, city_state_zip: &str) -> AddressLines {
        AddressLines {
            full: full.to_string(),
            street_unit: street_unit.to_string(),
            city_state_zip: city_state_zip.to_string(),
        }
    }

    fn record(account: &str, addresses: LetterAddresses) -> LetterRecord {
        LetterRecord {
            date: "October 16, 2026".to_string(),
            last_day_of_month: "October 31, 2026".to_string(),
            owners_name: "Ann Lee".to_string(),
            association_name: "Oak Ridge HOA".to_string(),
            account_number: account.to_string(),
            amount: "$1,050.00".to_string(),
            email_address: String::new(),
            addresses,
        }
    }

    #[test]
    fn letter1_csv_has_bom_header_and_quoted_values() {
        let property = lines("12 Oak Ln, Ames IA 50010", "12 Oak Ln", "Ames IA 50010");
        let mut buffer = Vec::new();
        write_letter_csv(
            &mut buffer,
            LetterVariant::Letter1,
            &[record("300", LetterAddresses::Single(property))],
        )
        .expect("csv written");

        assert!(buffer.starts_with(UTF8_BOM));
        let text = String::from_utf8(buffer[UTF8_BOM.len()..].to_vec()).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("date,last_day_of_month,ownersName,associationName,accNum,amount,emailAddress,propertyAddress,propertyAddress_st_unit,propertyAddress_city_state_zip")
        );
        assert_eq!(
            lines.next(),
            Some("\"October 16, 2026\",\"October 31, 2026\",Ann Lee,Oak Ridge HOA,300,\"$1,050.00\",,\"12 Oak Ln, Ames IA 50010\",12 Oak Ln,Ames IA 50010")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn export_batch_writes_both_variant_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("output");
        let batch = LetterBatch {
            letter1: vec![],
            letter2: vec![record(
                "100",
                LetterAddresses::Dual {
                    property: lines("44 Maple Ct", "44 Maple Ct", ""),
                    offsite: lines("9 Pine Rd, Boone IA", "9 Pine Rd", "Boone IA"),
                },
            )],
        };

        let summary = export_batch(&batch, &output).expect("export succeeds");
        assert_eq!(summary.letter1_rows, 0);
        assert_eq!(summary.letter2_rows, 1);
        assert_eq!(summary.letter1_path, output.join("letters_letter1.csv"));

        let letter2 = std::fs::read_to_string(&summary.letter2_path).expect("read letter2");
        assert!(letter2.contains("ownersOffsiteAddress_city_state_zip"));
        assert!(letter2.contains("\"9 Pine Rd, Boone IA\""));

        let letter1 = std::fs::read_to_string(&summary.letter1_path).expect("read letter1");
        assert_eq!(letter1.trim_start_matches('\u{feff}').lines().count(), 1);
    }
}
