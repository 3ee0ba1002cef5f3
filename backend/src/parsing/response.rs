//! CSV response decoding.
//!
//! Columns are located by name in the header, so the catalog may reorder
//! or add columns freely. A row whose field count differs from the header
//! is dropped with a warning, never decoded into a shifted record.

use tracing::warn;

use crate::catalog::query::{
    COL_DEC, COL_DISTANCE, COL_NAME, COL_RA, COL_RADIUS, COL_STAR_TEMP,
};
use crate::models::CelestialRecord;

/// Errors raised when a body breaks the header/column contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Response body is empty")]
    EmptyBody,

    #[error("Response header is missing column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("Malformed CSV: {message}")]
    Csv { message: String },
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        ParseError::Csv {
            message: err.to_string(),
        }
    }
}

/// Decoded catalog answer.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogResponse {
    /// Header only: the query matched nothing.
    NoData,
    /// At least one record, in response order.
    Records(Vec<CelestialRecord>),
}

impl CatalogResponse {
    pub fn is_empty(&self) -> bool {
        matches!(self, CatalogResponse::NoData)
    }

    pub fn records(&self) -> &[CelestialRecord] {
        match self {
            CatalogResponse::NoData => &[],
            CatalogResponse::Records(records) => records,
        }
    }

    pub fn into_records(self) -> Vec<CelestialRecord> {
        match self {
            CatalogResponse::NoData => Vec::new(),
            CatalogResponse::Records(records) => records,
        }
    }
}

/// Positions of the projected columns within one response header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    name: usize,
    radius: usize,
    distance: usize,
    star_temp: usize,
    ra: usize,
    dec: usize,
}

impl ColumnIndex {
    fn from_header(header: &csv::StringRecord) -> Result<Self, ParseError> {
        let find = |column: &'static str| {
            header
                .iter()
                .position(|h| h.eq_ignore_ascii_case(column))
                .ok_or(ParseError::MissingColumn { column })
        };

        Ok(Self {
            name: find(COL_NAME)?,
            radius: find(COL_RADIUS)?,
            distance: find(COL_DISTANCE)?,
            star_temp: find(COL_STAR_TEMP)?,
            ra: find(COL_RA)?,
            dec: find(COL_DEC)?,
        })
    }
}

/// Required numeric cell: unparseable or empty becomes `NaN`.
fn required_number(cell: Option<&str>) -> f64 {
    cell.and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Optional numeric cell: anything but a finite, non-negative number is absent.
fn optional_number(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Parse a catalog CSV body into records.
///
/// # Returns
/// * `Ok(CatalogResponse::NoData)` - header present, no usable rows
/// * `Ok(CatalogResponse::Records(_))` - one record per well-formed row, in order
/// * `Err(ParseError)` - empty body or missing column
pub fn parse_catalog_response(body: &str) -> Result<CatalogResponse, ParseError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ParseError::EmptyBody);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let header = reader.headers()?;
    let columns = ColumnIndex::from_header(header)?;
    let expected = header.len();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        if row.len() != expected {
            warn!(
                "Skipping catalog row at line {}: {} fields, header has {}",
                line,
                row.len(),
                expected
            );
            continue;
        }

        let name = row.get(columns.name).unwrap_or_default();
        if name.is_empty() {
            warn!("Skipping catalog row without a name at line {}", line);
            continue;
        }

        let mut record = CelestialRecord::new(
            name,
            required_number(row.get(columns.distance)),
            required_number(row.get(columns.ra)),
            required_number(row.get(columns.dec)),
        );
        record.radius_earths = optional_number(row.get(columns.radius));
        record.star_temp_kelvin = optional_number(row.get(columns.star_temp));
        records.push(record);
    }

    if records.is_empty() {
        Ok(CatalogResponse::NoData)
    } else {
        Ok(CatalogResponse::Records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "pl_name,pl_rade,sy_dist,st_teff,ra,dec";

    #[test]
    fn test_header_only_is_no_data() {
        let result = parse_catalog_response(&format!("{}\n", HEADER)).unwrap();
        assert_eq!(result, CatalogResponse::NoData);
        assert!(result.records().is_empty());
    }

    #[test]
    fn test_parses_rows_in_order() {
        let body = format!(
            "{}\nKepler-22 b,2.1,190.5,5518,289.2,47.9\nProxima Cen b,1.07,1.3,3050,217.4,-62.7\n",
            HEADER
        );
        let records = parse_catalog_response(&body).unwrap().into_records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Kepler-22 b");
        assert_eq!(records[0].radius_earths, Some(2.1));
        assert_eq!(records[0].distance_parsecs.value(), 190.5);
        assert_eq!(records[0].star_temp_kelvin, Some(5518.0));
        assert_eq!(records[0].right_ascension_deg.value(), 289.2);
        assert_eq!(records[1].name, "Proxima Cen b");
        assert_eq!(records[1].declination_deg.value(), -62.7);
    }

    #[test]
    fn test_reordered_and_extra_columns() {
        let body = "dec,ra,pl_name,extra,st_teff,sy_dist,pl_rade\n-5.0,10.0,GJ 1214 b,x,3250,14.6,2.7\n";
        let records = parse_catalog_response(body).unwrap().into_records();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "GJ 1214 b");
        assert_eq!(records[0].right_ascension_deg.value(), 10.0);
        assert_eq!(records[0].declination_deg.value(), -5.0);
        assert_eq!(records[0].distance_parsecs.value(), 14.6);
        assert_eq!(records[0].radius_earths, Some(2.7));
    }

    #[test]
    fn test_empty_cells() {
        let body = format!("{}\nTOI-700 d,,31.1,,97.1,\n", HEADER);
        let records = parse_catalog_response(&body).unwrap().into_records();

        assert_eq!(records[0].radius_earths, None);
        assert_eq!(records[0].star_temp_kelvin, None);
        assert!(records[0].declination_deg.value().is_nan());
        assert!(!records[0].has_valid_coordinates());
    }

    #[test]
    fn test_unparseable_numbers() {
        let body = format!("{}\nX b,big,far,hot,abc,12\n", HEADER);
        let records = parse_catalog_response(&body).unwrap().into_records();

        assert_eq!(records[0].radius_earths, None);
        assert!(records[0].distance_parsecs.value().is_nan());
        assert!(records[0].right_ascension_deg.value().is_nan());
        assert_eq!(records[0].declination_deg.value(), 12.0);
    }

    #[test]
    fn test_quoted_name_with_comma() {
        let body = format!("{}\n\"Odd, Name b\",1.0,5.0,4000,1.0,2.0\n", HEADER);
        let records = parse_catalog_response(&body).unwrap().into_records();
        assert_eq!(records[0].name, "Odd, Name b");
        assert_eq!(records[0].distance_parsecs.value(), 5.0);
    }

    #[test]
    fn test_short_row_is_skipped() {
        let body = format!(
            "{}\nGood b,1,2,3,4,5\nShort b,1.0\nAlso good b,1,2,3,4,5\n",
            HEADER
        );
        let records = parse_catalog_response(&body).unwrap().into_records();

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Good b", "Also good b"]);
        assert_eq!(records[1].distance_parsecs.value(), 2.0);
    }

    #[test]
    fn test_unquoted_embedded_comma_row_is_skipped() {
        let body = format!(
            "{}\nOdd, Name b,1.0,5.0,4000,1.0,2.0\nY b,1.0,6.0,4000,1.0,2.0\n",
            HEADER
        );
        let records = parse_catalog_response(&body).unwrap().into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Y b");
    }

    #[test]
    fn test_only_ragged_rows_is_no_data() {
        let body = format!("{}\nX b,1.0,5.0\nZ b,1,2,3,4,5,6\n", HEADER);
        assert_eq!(parse_catalog_response(&body).unwrap(), CatalogResponse::NoData);
    }

    #[test]
    fn test_missing_column() {
        let body = "pl_name,sy_dist,st_teff,ra,dec\nX b,5.0,4000,1.0,2.0\n";
        assert_eq!(
            parse_catalog_response(body).unwrap_err(),
            ParseError::MissingColumn { column: "pl_rade" }
        );
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(parse_catalog_response("  \n").unwrap_err(), ParseError::EmptyBody);
    }

    #[test]
    fn test_error_document_is_malformed() {
        let body = "<?xml version=\"1.0\"?>\n<VOTABLE><RESOURCE type=\"results\"></RESOURCE></VOTABLE>";
        assert!(parse_catalog_response(body).is_err());
    }

    #[test]
    fn test_nameless_rows_are_skipped() {
        let body = format!("{}\n,1.0,5.0,4000,1.0,2.0\nY b,1.0,6.0,4000,1.0,2.0\n", HEADER);
        let records = parse_catalog_response(&body).unwrap().into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Y b");

        let only_nameless = format!("{}\n,1.0,5.0,4000,1.0,2.0\n", HEADER);
        assert!(parse_catalog_response(&only_nameless).unwrap().is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let body = format!("{}\r\nA b,1,2,3,4,5\r\nB b,1,2,3,4,5\r\n", HEADER);
        assert_eq!(parse_catalog_response(&body).unwrap().records().len(), 2);
    }
}
