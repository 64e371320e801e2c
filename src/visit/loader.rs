//! Load visit schedules from CSV
//!
//! Required columns: `id,date,travel_fee,consulting_fee`, in any order. Headers
//! and fields are trimmed. Blank dates load as drafts, blank fees as zero and
//! blank ids as `visit-{row}`.

use super::Visit;
use crate::error::{PlannerError, PlannerResult};
use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder, Trim};
use std::path::Path;

/// Date format used in visit files
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header names every visit file must carry
pub const REQUIRED_COLUMNS: [&str; 4] = ["id", "date", "travel_fee", "consulting_fee"];

/// Raw CSV row before parsing
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: Option<String>,
    date: Option<String>,
    travel_fee: Option<String>,
    consulting_fee: Option<String>,
}

impl CsvRow {
    /// `row` is 1-based and counts data rows only
    fn to_visit(self, row: usize) -> PlannerResult<Visit> {
        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("visit-{}", row),
        };

        let date = match self.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| PlannerError::InvalidDate {
                    row,
                    value: raw.to_string(),
                })?,
            ),
            _ => None,
        };

        Ok(Visit {
            id,
            date,
            travel_fee: parse_fee(self.travel_fee.as_deref(), "travel_fee", row)?,
            consulting_fee: parse_fee(self.consulting_fee.as_deref(), "consulting_fee", row)?,
        })
    }
}

fn parse_fee(raw: Option<&str>, field: &'static str, row: usize) -> PlannerResult<f64> {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Ok(0.0);
    }

    let invalid = || PlannerError::InvalidFee {
        row,
        field,
        value: raw.to_string(),
    };

    let fee: f64 = raw.parse().map_err(|_| invalid())?;
    if !fee.is_finite() || fee < 0.0 {
        return Err(invalid());
    }
    Ok(fee)
}

/// Load all visits from a CSV file
pub fn load_visits<P: AsRef<Path>>(path: P) -> PlannerResult<Vec<Visit>> {
    let reader = reader_builder().from_path(path)?;
    read_visits(reader)
}

/// Load visits from any reader (e.g., string buffer, stdin)
pub fn load_visits_from_reader<R: std::io::Read>(reader: R) -> PlannerResult<Vec<Visit>> {
    read_visits(reader_builder().from_reader(reader))
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.trim(Trim::All);
    builder
}

fn check_headers<R: std::io::Read>(reader: &mut Reader<R>) -> PlannerResult<()> {
    let headers = reader.headers()?;
    match REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        Some(column) => Err(PlannerError::MissingColumn { column: *column }),
        None => Ok(()),
    }
}

fn read_visits<R: std::io::Read>(mut reader: Reader<R>) -> PlannerResult<Vec<Visit>> {
    check_headers(&mut reader)?;
    let mut visits = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        visits.push(row.to_visit(index + 1)?);
    }

    log::debug!("Loaded {} visits", visits.len());
    Ok(visits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_visits_from_reader() {
        let data = "\
id,date,travel_fee,consulting_fee
kickoff,2024-01-15,250,1000
,2024-03-02,,750.50
draft,,0,0
";
        let visits = load_visits_from_reader(data.as_bytes()).expect("valid csv");
        assert_eq!(visits.len(), 3);

        assert_eq!(visits[0].id, "kickoff");
        assert_eq!(visits[0].date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(visits[0].amount(), 1250.0);

        assert_eq!(visits[1].id, "visit-2");
        assert_eq!(visits[1].travel_fee, 0.0);
        assert_eq!(visits[1].consulting_fee, 750.5);

        assert_eq!(visits[2].date, None);
    }

    #[test]
    fn test_bad_date_reports_row() {
        let data = "id,date,travel_fee,consulting_fee\na,2024-01-01,0,10\nb,15/01/2024,0,10\n";
        match load_visits_from_reader(data.as_bytes()) {
            Err(PlannerError::InvalidDate { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "15/01/2024");
            }
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_fee_rejected() {
        let data = "id,date,travel_fee,consulting_fee\na,2024-01-01,-5,10\n";
        assert!(matches!(
            load_visits_from_reader(data.as_bytes()),
            Err(PlannerError::InvalidFee { field: "travel_fee", .. })
        ));
    }

    #[test]
    fn test_empty_file_loads_nothing() {
        let data = "id,date,travel_fee,consulting_fee\n";
        assert!(load_visits_from_reader(data.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_padded_headers_are_trimmed() {
        let data = "id, date, travel_fee, consulting_fee\na, 2024-01-01, 0, 10\n";
        let visits = load_visits_from_reader(data.as_bytes()).expect("padded csv");

        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].id, "a");
        assert_eq!(visits[0].date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(visits[0].consulting_fee, 10.0);
        assert_eq!(visits[0].amount(), 10.0);
    }

    #[test]
    fn test_columns_in_any_order() {
        let data = "consulting_fee,id,travel_fee,date\n10,a,5,2024-01-01\n";
        let visits = load_visits_from_reader(data.as_bytes()).unwrap();
        assert_eq!(visits[0].travel_fee, 5.0);
        assert_eq!(visits[0].consulting_fee, 10.0);
    }

    #[test]
    fn test_misspelled_header_rejected() {
        let data = "id,date,travel_fee,consulting_fees\na,2024-01-01,0,10\n";
        assert!(matches!(
            load_visits_from_reader(data.as_bytes()),
            Err(PlannerError::MissingColumn { column: "consulting_fee" })
        ));
    }

    #[test]
    fn test_missing_column_rejected() {
        let data = "id,date,consulting_fee\na,2024-01-01,10\n";
        assert!(matches!(
            load_visits_from_reader(data.as_bytes()),
            Err(PlannerError::MissingColumn { column: "travel_fee" })
        ));

        assert!(matches!(
            load_visits_from_reader("".as_bytes()),
            Err(PlannerError::MissingColumn { column: "id" })
        ));
    }
}
