//! Trait and types for pulling rosters and stored grades from a student
//! information system.

use anyhow::Result;

use gpa_calc::grading::types::CourseRecord;

/// One student from the SIS roster.
#[derive(Debug, Clone)]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub grade_level: String,
}

/// Abstraction over a SIS backend that can list students and their stored
/// grade rows.
#[async_trait::async_trait]
pub trait RosterApi {
    /// Returns every student visible to the API credentials.
    async fn list_students(&self) -> Result<Vec<Student>>;

    /// Returns one student's stored grade rows, optionally filtered to a
    /// single term. A pagination failure yields the rows fetched before the
    /// failure rather than an error.
    async fn student_grades(
        &self,
        student: &Student,
        term: Option<&str>,
    ) -> Result<Vec<CourseRecord>>;
}
