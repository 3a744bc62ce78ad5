//! CSV import of application snapshots exported from the applications query.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{parse_count, parse_decimal, ApplicationId, ScoringInput};

#[derive(Debug)]
pub enum SnapshotImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingApplicationId { line: u64 },
}

impl std::fmt::Display for SnapshotImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotImportError::Io(err) => write!(f, "failed to read snapshot export: {}", err),
            SnapshotImportError::Csv(err) => write!(f, "invalid snapshot CSV data: {}", err),
            SnapshotImportError::MissingApplicationId { line } => {
                write!(f, "snapshot row on line {} has no application_id", line)
            }
        }
    }
}

impl std::error::Error for SnapshotImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotImportError::Io(err) => Some(err),
            SnapshotImportError::Csv(err) => Some(err),
            SnapshotImportError::MissingApplicationId { .. } => None,
        }
    }
}

impl From<std::io::Error> for SnapshotImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SnapshotImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct SnapshotImporter;

impl SnapshotImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<(ApplicationId, ScoringInput)>, SnapshotImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Rows keep their export order. Unknown columns are ignored.
    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<(ApplicationId, ScoringInput)>, SnapshotImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut record = csv::StringRecord::new();
        let mut snapshots = Vec::new();

        while csv_reader.read_record(&mut record)? {
            let row: SnapshotRow = record.deserialize(Some(&headers))?;
            let line = record.position().map(|position| position.line()).unwrap_or(0);
            let id = row
                .application_id
                .clone()
                .ok_or(SnapshotImportError::MissingApplicationId { line })?;
            snapshots.push((ApplicationId(id), row.into_input()));
        }

        Ok(snapshots)
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    application_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    applicant_salary: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    marital_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    total_household_income: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    outstanding_debts: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    number_of_dependents: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    dependent_count: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    asnaf_category: Option<String>,
}

impl SnapshotRow {
    fn into_input(self) -> ScoringInput {
        ScoringInput {
            applicant_salary: self.applicant_salary.as_deref().and_then(parse_decimal),
            marital_status: self.marital_status,
            total_household_income: self
                .total_household_income
                .as_deref()
                .and_then(parse_decimal),
            outstanding_debts: self.outstanding_debts.as_deref().and_then(parse_decimal),
            number_of_dependents: self.number_of_dependents.as_deref().and_then(parse_count),
            dependent_count: self.dependent_count.as_deref().and_then(parse_count),
            asnaf_category: self.asnaf_category,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty() && !value.eq_ignore_ascii_case("null")))
}
