//! ADQL query construction for the exoplanet archive.
//!
//! Every query selects the same fixed projection ([`COLUMNS`]) so the parser
//! can rely on one header contract. Object names only reach a query as an
//! escaped string literal built from a validated [`ObjectName`].

use std::fmt;

use qtty::Parsecs;

/// Planet name column.
pub const COL_NAME: &str = "pl_name";
/// Planet radius in Earth radii.
pub const COL_RADIUS: &str = "pl_rade";
/// System distance in parsecs.
pub const COL_DISTANCE: &str = "sy_dist";
/// Host star effective temperature in kelvin.
pub const COL_STAR_TEMP: &str = "st_teff";
/// Right ascension in degrees.
pub const COL_RA: &str = "ra";
/// Declination in degrees.
pub const COL_DEC: &str = "dec";

/// Projection requested by every query, in header order.
pub const COLUMNS: [&str; 6] = [
    COL_NAME,
    COL_RADIUS,
    COL_DISTANCE,
    COL_STAR_TEMP,
    COL_RA,
    COL_DEC,
];

/// Longest name accepted from a caller.
pub const MAX_NAME_LEN: usize = 128;

/// Reasons a caller-supplied object name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Exoplanet name is required.")]
    Empty,
    #[error("Exoplanet name is too long ({len} characters, max {max}).")]
    TooLong { len: usize, max: usize },
    #[error("Exoplanet name contains control characters.")]
    ControlCharacter,
}

/// A validated catalog object name.
///
/// Surrounding whitespace is trimmed; the inner text is kept verbatim
/// (catalog names contain spaces, dashes and occasionally apostrophes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectName(String);

impl ObjectName {
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_NAME_LEN {
            return Err(NameError::TooLong {
                len,
                max: MAX_NAME_LEN,
            });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(NameError::ControlCharacter);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as a quoted ADQL string literal, single quotes doubled.
    pub fn to_adql_literal(&self) -> String {
        format!("'{}'", self.0.replace('\'', "''"))
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How the candidate query restricts the population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateFilter {
    /// Catalog-side cut on the scalar system distance.
    WithinDistance(Parsecs),
    /// Everything except the target; proximity is decided client-side.
    Unbounded,
}

/// Builds the two queries issued per request against one catalog table.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn select_clause(&self) -> String {
        format!("SELECT {} FROM {}", COLUMNS.join(", "), self.table)
    }

    /// Query for the target record, matched on exact name.
    pub fn target_query(&self, name: &ObjectName) -> String {
        format!(
            "{} WHERE {} = {}",
            self.select_clause(),
            COL_NAME,
            name.to_adql_literal()
        )
    }

    /// Query for the candidate population, always excluding the target itself.
    pub fn candidate_query(&self, name: &ObjectName, filter: CandidateFilter) -> String {
        let exclude = format!("{} <> {}", COL_NAME, name.to_adql_literal());
        match filter {
            CandidateFilter::WithinDistance(max) => format!(
                "{} WHERE {} <= {} AND {}",
                self.select_clause(),
                COL_DISTANCE,
                max.value(),
                exclude
            ),
            CandidateFilter::Unbounded => format!("{} WHERE {}", self.select_clause(), exclude),
        }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new("ps")
    }
}
