//! Accumulates scored courses into per-student GPA totals.

use std::collections::HashMap;

use crate::grading::types::{ScoredCourse, StudentGpa, StudentKey};

/// Per-student point accumulator.
///
/// Entries keep first-seen order so report output is deterministic. Roster
/// students registered with [`GpaAggregator::ensure_student`] appear in the
/// output even when none of their courses was counted.
#[derive(Debug, Default)]
pub struct GpaAggregator {
    index: HashMap<StudentKey, usize>,
    students: Vec<StudentGpa>,
}

impl GpaAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a student without contributing any points.
    pub fn ensure_student(&mut self, key: StudentKey) {
        self.slot(key);
    }

    /// Adds a scored course to its student's totals.
    pub fn record(&mut self, course: &ScoredCourse) {
        let slot = self.slot(course.record.key());
        let entry = &mut self.students[slot];
        entry.total_points += course.points;
        entry.course_count += 1;
    }

    fn slot(&mut self, key: StudentKey) -> usize {
        if let Some(&slot) = self.index.get(&key) {
            return slot;
        }
        let slot = self.students.len();
        self.students.push(StudentGpa {
            key: key.clone(),
            total_points: 0.0,
            course_count: 0,
        });
        self.index.insert(key, slot);
        slot
    }

    /// Finishes aggregation, yielding students in first-seen order.
    pub fn finish(self) -> Vec<StudentGpa> {
        self.students
    }
}
