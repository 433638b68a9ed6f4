use std::env;
use std::fs;
use std::path::PathBuf;

use gpa_calc::grading::aggregate::GpaAggregator;
use gpa_calc::grading::points::ScoringPolicy;
use gpa_calc::grading::types::{CourseRecord, StudentName};
use gpa_calc::input::load_course_records;
use gpa_calc::output::{write_roster_report, write_summary};

fn temp_path(name: &str) -> PathBuf {
    env::temp_dir().join(name)
}

#[test]
fn test_honors_file_pipeline_end_to_end() {
    let input = temp_path("gpa_calc_e2e_grades.csv");
    let output = temp_path("gpa_calc_e2e_summary.csv");
    fs::write(
        &input,
        "Student_Number,LastFirst,Grade_level,Grade,Gradescaleid\n\
         S1,\"Doe, Jane\",9,A,AP Grades\n\
         S1,\"Doe, Jane\",9,B,Regular\n\
         S1,\"Doe, Jane\",9,P,Pass/Fail\n",
    )
    .unwrap();

    let policy = ScoringPolicy::honors_summary("AP Grades");
    let records = load_course_records(&input).unwrap();
    let mut aggregator = GpaAggregator::new();
    for record in records {
        if let Some(scored) = policy.score(record) {
            aggregator.record(&scored);
        }
    }
    let students = aggregator.finish();
    write_summary(&output.display().to_string(), &students).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    fs::remove_file(&input).unwrap();
    fs::remove_file(&output).unwrap();

    // AP bonus: (4+1) + 3 over 2 counted courses; "P" row is left out
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].course_count, 2);
    assert_eq!(students[0].gpa(), Some(4.0));

    let mut lines = content.lines();
    assert_eq!(lines.next().unwrap(), "student_id,student_name,grade_level,gpa");
    assert_eq!(lines.next().unwrap(), "S1,\"Doe, Jane\",9,4.00");
    assert_eq!(lines.next(), None);
}

#[test]
fn test_credit_weighted_pipeline_end_to_end() {
    let input = temp_path("gpa_calc_e2e_weighted.csv");
    fs::write(
        &input,
        "Student_Number,First_Name,Last_Name,Grade_level,Grade,Gradescaleid,Earned_Credits\n\
         S2,jane,doe,10,B,0.5,1.0\n\
         S2,jane,doe,10,F,2.0,1.0\n",
    )
    .unwrap();

    let policy = ScoringPolicy::credit_weighted();
    let records = load_course_records(&input).unwrap();
    fs::remove_file(&input).unwrap();

    let mut aggregator = GpaAggregator::new();
    for record in records {
        if let Some(scored) = policy.score(record) {
            aggregator.record(&scored);
        }
    }
    let students = aggregator.finish();

    // B: (3 + 0.5) * 2 = 7; F: added value forced to 0, (0 + 0) * 2 = 0
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].total_points, 7.0);
    assert_eq!(students[0].course_count, 2);
    assert_eq!(students[0].gpa(), Some(3.5));
}

#[test]
fn test_roster_pipeline_reports_blank_gpa_for_ungraded_student() {
    let output = temp_path("gpa_calc_e2e_roster.tsv");
    let policy = ScoringPolicy::live_roster();

    let graded = CourseRecord {
        student_id: "1001".to_string(),
        name: StudentName::Split {
            first: "Jane".to_string(),
            last: "Doe".to_string(),
        },
        grade_level: "11".to_string(),
        raw_grade: "A".to_string(),
        scale: "AP".to_string(),
        credits: None,
        added_value: None,
    };
    let pass_only = CourseRecord {
        student_id: "1002".to_string(),
        name: StudentName::Split {
            first: "John".to_string(),
            last: "Roe".to_string(),
        },
        grade_level: "11".to_string(),
        raw_grade: "P".to_string(),
        scale: "Standard".to_string(),
        credits: None,
        added_value: None,
    };

    let mut aggregator = GpaAggregator::new();
    aggregator.ensure_student(graded.key());
    aggregator.ensure_student(pass_only.key());
    for record in [graded, pass_only] {
        if let Some(scored) = policy.score(record) {
            aggregator.record(&scored);
        }
    }

    let students = aggregator.finish();
    write_roster_report(&output.display().to_string(), &students).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    fs::remove_file(&output).unwrap();

    let mut lines = content.lines();
    assert_eq!(lines.next().unwrap(), "FirstName\tLastName\tID\tGradeLevel\tGPA");
    assert_eq!(lines.next().unwrap(), "Jane\tDoe\t1001\t11\t5.00");
    // only a pass/fail course: the GPA column stays empty, never 0.00
    assert_eq!(lines.next().unwrap(), "John\tRoe\t1002\t11\t");
}
