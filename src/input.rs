//! Grade-file loading.
//!
//! SIS exports arrive as Latin-1 CSV with a header row. Columns are located
//! by name so the combined-name and split-name layouts both load through the
//! same path.

use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::StringRecord;
use tracing::info;

use crate::grading::normalize::normalize_name;
use crate::grading::types::{CourseRecord, StudentName};

/// Reads every course row from a grades export.
///
/// A missing file or a file with no data rows is an error; reports must
/// never be produced from half-loaded input.
pub fn load_course_records(path: &Path) -> Result<Vec<CourseRecord>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("could not read grades file {}", path.display()))?;
    let text = decode_latin1(&bytes);

    if text.trim().is_empty() {
        bail!("no data was found in {}", path.display());
    }

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .context("grades file has no readable header row")?
        .clone();
    let columns = Columns::locate(&headers)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.context("malformed row in grades file")?;
        records.push(columns.parse_row(&row));
    }

    if records.is_empty() {
        bail!("no data rows were found in {}", path.display());
    }

    info!(path = %path.display(), rows = records.len(), "grades file loaded");
    Ok(records)
}

/// Latin-1 bytes map one-to-one onto the first 256 Unicode code points.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Column positions resolved from the header row.
struct Columns {
    student_id: usize,
    name: NameColumns,
    grade_level: usize,
    grade: usize,
    scale: usize,
    credits: Option<usize>,
}

enum NameColumns {
    Combined(usize),
    Split { first: usize, last: usize },
}

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let name = match column(headers, "LastFirst") {
            Some(idx) => NameColumns::Combined(idx),
            None => NameColumns::Split {
                first: column(headers, "First_Name")
                    .context("grades file needs a LastFirst or First_Name/Last_Name column")?,
                last: column(headers, "Last_Name")
                    .context("grades file needs a LastFirst or First_Name/Last_Name column")?,
            },
        };

        Ok(Self {
            student_id: column(headers, "Student_Number")
                .context("grades file is missing the Student_Number column")?,
            name,
            grade_level: column(headers, "Grade_level")
                .context("grades file is missing the Grade_level column")?,
            grade: column(headers, "Grade")
                .context("grades file is missing the Grade column")?,
            scale: column(headers, "Gradescaleid")
                .context("grades file is missing the Gradescaleid column")?,
            credits: column(headers, "Earned_Credits"),
        })
    }

    fn parse_row(&self, row: &StringRecord) -> CourseRecord {
        let field = |idx: usize| row.get(idx).unwrap_or("").trim().to_string();
        let numeric =
            |idx: usize| row.get(idx).and_then(|value| value.trim().parse::<f64>().ok());

        let name = match self.name {
            NameColumns::Combined(idx) => StudentName::Combined(field(idx)),
            NameColumns::Split { first, last } => StudentName::Split {
                first: normalize_name(row.get(first).unwrap_or("")),
                last: normalize_name(row.get(last).unwrap_or("")),
            },
        };

        CourseRecord {
            student_id: field(self.student_id),
            name,
            grade_level: field(self.grade_level),
            raw_grade: row.get(self.grade).unwrap_or("").to_string(),
            scale: field(self.scale),
            credits: self.credits.and_then(numeric),
            added_value: numeric(self.scale),
        }
    }
}
