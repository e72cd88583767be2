use super::normalizer::{clean_cell, coalesce, normalize_key};
use super::table::{RawTable, ASSOCIATION_COLUMN, EMAIL_COLUMN};
use super::LetterError;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Association name to contact email, keyed by [`normalize_key`]. The first roster entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationEmailIndex {
    entries: HashMap<String, String>,
}

impl AssociationEmailIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut index = Self::default();
        for (association, email) in pairs {
            index.insert_first(association, email);
        }
        index
    }

    pub fn from_table(table: &RawTable) -> Result<Self, LetterError> {
        let association_column = ASSOCIATION_COLUMN.resolve(table.headers()).ok_or_else(|| {
            LetterError::unresolved("contact roster", ASSOCIATION_COLUMN.description, table)
        })?;
        let email_column = EMAIL_COLUMN
            .resolve(table.headers())
            .ok_or_else(|| LetterError::unresolved("contact roster", EMAIL_COLUMN.description, table))?;

        let mut index = Self::default();
        for row in table.rows() {
            let association = clean_cell(&coalesce([row.cell(Some(association_column))]));
            let email = clean_cell(&coalesce([row.cell(Some(email_column))]));
            index.insert_first(&association, &email);
        }

        debug!(entries = index.len(), "association email index built");
        Ok(index)
    }

    /// Loads the roster at `path`. A missing file yields an empty index so every letter is
    /// produced with a blank email; a roster without the needed columns is still an error.
    pub fn from_optional_path<P: AsRef<Path>>(path: P) -> Result<Self, LetterError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "contact roster not found; email addresses will be blank");
            return Ok(Self::empty());
        }

        let table = RawTable::from_path(path)?;
        Self::from_table(&table)
    }

    fn insert_first(&mut self, association: &str, email: &str) {
        let key = normalize_key(association);
        let email = email.trim();
        if key.is_empty() || email.is_empty() {
            return;
        }
        self.entries.entry(key).or_insert_with(|| email.to_string());
    }

    /// Email for `association`, or an empty string when unknown.
    pub fn lookup(&self, association: &str) -> &str {
        let key = normalize_key(association);
        if key.is_empty() {
            return "";
        }
        self.entries.get(&key).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let index = AssociationEmailIndex::from_pairs([("  Oak Ridge HOA ", "board@oakridge.org")]);
        assert_eq!(index.lookup("oak ridge hoa"), "board@oakridge.org");
        assert_eq!(index.lookup("OAK   RIDGE\tHOA"), "board@oakridge.org");
        assert_eq!(index.lookup("Elm Ridge HOA"), "");
        assert_eq!(index.lookup(""), "");
    }

    #[test]
    fn first_roster_entry_wins() {
        let index =
            AssociationEmailIndex::from_pairs([("Oak HOA", "a@x.com"), ("Oak HOA", "b@x.com")]);
        assert_eq!(index.lookup("Oak HOA"), "a@x.com");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn blank_names_or_emails_are_excluded() {
        let index = AssociationEmailIndex::from_pairs([
            ("Oak HOA", "  "),
            ("", "orphan@x.com"),
            ("Oak HOA", "late@x.com"),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("oak hoa"), "late@x.com");
    }

    #[test]
    fn from_table_resolves_flexible_headers() {
        let csv = "HOA Name,Manager,Contact Email\n\
Oak Ridge,Pat,oak@x.com\n\
oak  ridge,Sam,second@x.com\n\
Maple Court,Lee,nan\n";
        let table = RawTable::from_reader(Cursor::new(csv)).expect("parse");
        let index = AssociationEmailIndex::from_table(&table).expect("index builds");

        assert_eq!(index.lookup("Oak Ridge"), "oak@x.com");
        assert_eq!(index.lookup("Maple Court"), "");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn from_table_requires_an_email_column() {
        let csv = "Association Name,Phone\nOak Ridge,555-0100\n";
        let table = RawTable::from_reader(Cursor::new(csv)).expect("parse");
        let error = AssociationEmailIndex::from_table(&table).expect_err("schema error");
        assert!(error.to_string().contains("email"));
    }

    #[test]
    fn missing_roster_file_degrades_to_empty_index() {
        let index = AssociationEmailIndex::from_optional_path("./no-such-roster.csv")
            .expect("missing roster tolerated");
        assert!(index.is_empty());
    }
}
