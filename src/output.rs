//! Report writing: per-student summaries, per-course detail, and the roster
//! TSV.

use anyhow::Result;
use csv::WriterBuilder;
use tracing::info;

use crate::grading::normalize::{canonical_grade_char, normalize_grade};
use crate::grading::points::ScoringPolicy;
use crate::grading::types::{CourseRecord, Letter, NormalizedGrade, StudentGpa, StudentName};

/// Formats a GPA for reporting: two decimals, blank when undefined.
fn format_gpa(gpa: Option<f64>) -> String {
    gpa.map(|g| format!("{g:.2}")).unwrap_or_default()
}

/// Writes the per-student summary CSV.
///
/// The header follows the name layout of the input: one `student_name`
/// column for combined names, `first_name`/`last_name` otherwise.
pub fn write_summary(path: &str, students: &[StudentGpa]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let split = matches!(
        students.first(),
        Some(student) if matches!(student.key.name, StudentName::Split { .. })
    );
    if split {
        writer.write_record(["student_id", "first_name", "last_name", "grade_level", "gpa"])?;
    } else {
        writer.write_record(["student_id", "student_name", "grade_level", "gpa"])?;
    }

    for student in students {
        let gpa = format_gpa(student.gpa());
        match &student.key.name {
            StudentName::Combined(name) => writer.write_record([
                &student.key.student_id,
                name,
                &student.key.grade_level,
                &gpa,
            ])?,
            StudentName::Split { first, last } => writer.write_record([
                &student.key.student_id,
                first,
                last,
                &student.key.grade_level,
                &gpa,
            ])?,
        }
    }

    writer.flush()?;
    info!(path, students = students.len(), "summary written");
    Ok(())
}

/// Writes the detailed per-course report: every input row with its computed
/// weighting columns. Rows excluded from GPA get a blank points column.
pub fn write_detailed(path: &str, records: &[CourseRecord], policy: &ScoringPolicy) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let split = matches!(
        records.first(),
        Some(record) if matches!(record.name, StudentName::Split { .. })
    );
    let mut header = vec!["student_id"];
    if split {
        header.extend(["first_name", "last_name"]);
    } else {
        header.push("student_name");
    }
    header.extend([
        "grade_level",
        "grade",
        "letter",
        "gpa_added_value",
        "credits",
        "weighted_points",
    ]);
    writer.write_record(&header)?;

    for record in records {
        let letter = canonical_grade_char(&record.raw_grade)
            .map(String::from)
            .unwrap_or_default();
        let added = match normalize_grade(&record.raw_grade) {
            NormalizedGrade::Letter(Letter::F) => 0.0,
            _ => record.added_value.unwrap_or(0.0),
        };
        let points = policy
            .score(record.clone())
            .map(|scored| scored.points.to_string())
            .unwrap_or_default();
        let credits = record.credits.map(|c| c.to_string()).unwrap_or_default();

        let mut row = vec![record.student_id.clone()];
        match &record.name {
            StudentName::Combined(name) => row.push(name.clone()),
            StudentName::Split { first, last } => {
                row.push(first.clone());
                row.push(last.clone());
            }
        }
        row.extend([
            record.grade_level.clone(),
            record.raw_grade.trim().to_string(),
            letter,
            added.to_string(),
            credits,
            points,
        ]);
        writer.write_record(&row)?;
    }

    writer.flush()?;
    info!(path, rows = records.len(), "detailed report written");
    Ok(())
}

/// Writes the roster GPA report as tab-separated values.
pub fn write_roster_report(path: &str, students: &[StudentGpa]) -> Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    writer.write_record(["FirstName", "LastName", "ID", "GradeLevel", "GPA"])?;

    for student in students {
        let (first, last) = match &student.key.name {
            StudentName::Split { first, last } => (first.as_str(), last.as_str()),
            StudentName::Combined(name) => (name.as_str(), ""),
        };
        let gpa = format_gpa(student.gpa());
        writer.write_record([
            first,
            last,
            student.key.student_id.as_str(),
            student.key.grade_level.as_str(),
            gpa.as_str(),
        ])?;
    }

    writer.flush()?;
    info!(path, students = students.len(), "roster report written");
    Ok(())
}
