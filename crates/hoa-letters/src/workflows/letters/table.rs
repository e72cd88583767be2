use std::io::Read;
use std::path::Path;

/// Failure while reading a delimited export from disk or memory.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Header-addressed rows of string cells, as exported from the accounting system.
///
/// Headers are trimmed; cells are kept verbatim and cleaned by their readers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(index, header)| {
                if index == 0 {
                    header.trim_start_matches('\u{feff}').to_string()
                } else {
                    header.to_string()
                }
            })
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.rows.iter().map(|cells| RawRow { cells })
    }
}

/// A borrowed row; short rows read as missing cells.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    cells: &'a [String],
}

impl<'a> RawRow<'a> {
    pub fn cell(&self, column: Option<usize>) -> Option<&'a str> {
        column
            .and_then(|index| self.cells.get(index))
            .map(String::as_str)
    }
}

/// Ordered header lookup: exact candidates in priority order, then a case-insensitive
/// substring match over the headers in their given order.
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver {
    pub description: &'static str,
    pub exact: &'static [&'static str],
    pub contains: Option<&'static str>,
}

impl ColumnResolver {
    pub fn resolve(&self, headers: &[String]) -> Option<usize> {
        for candidate in self.exact {
            if let Some(index) = headers.iter().position(|header| header == candidate) {
                return Some(index);
            }
        }

        let needle = self.contains?.to_lowercase();
        headers
            .iter()
            .position(|header| header.to_lowercase().contains(&needle))
    }
}

pub const ASSOCIATION_COLUMN: ColumnResolver = ColumnResolver {
    description: "association name",
    exact: &["Association Name", "HOA Name", "Association"],
    contains: Some("assoc"),
};

pub const EMAIL_COLUMN: ColumnResolver = ColumnResolver {
    description: "email",
    exact: &[],
    contains: Some("email"),
};
