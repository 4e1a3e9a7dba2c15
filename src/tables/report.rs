//! Chart aggregates over the table files.

use std::collections::HashMap;
use std::path::Path;

use super::{CompletionStatus, TableError};
use crate::planner::schedule::{parse_date, round_to};

const PROGRESS_COLUMNS: &[&str] = &["Date", "Completed Hours", "Status"];
const FEEDBACK_COLUMNS: &[&str] = &["Exam", "Rating", "Feedback"];
const EXAM_COLUMN: &str = "Exam";

/// Aggregate outcome; `NoData` covers a missing file and an empty selection.
#[derive(Clone, Debug, PartialEq)]
pub enum Report<T> {
    NoData,
    Data(T),
}

/// The table header does not carry the columns a report needs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Table format is incorrect: expected columns {expected:?}, found {found:?}")]
pub struct DataFormatError {
    pub expected: Vec<String>,
    pub found: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Format(#[from] DataFormatError),
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressSummary {
    pub total_days: usize,
    pub completed_days: usize,
    /// Percentage, two decimals.
    pub completion_rate: f64,
    /// Completed hours per logged date, oldest first.
    pub hours_by_date: Vec<(String, Option<f64>)>,
    /// Rows per status value, most frequent first.
    pub status_counts: Vec<(String, usize)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackRow {
    pub exam: String,
    pub rating: Option<f64>,
    pub feedback: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackSummary {
    pub rows: Vec<FeedbackRow>,
    /// Mean of the numeric ratings, two decimals.
    pub average_rating: Option<f64>,
    /// Rows per rating value, lowest rating first.
    pub rating_counts: Vec<(String, usize)>,
}

struct Table {
    headers: Vec<String>,
    rows: Vec<csv::StringRecord>,
}

impl Table {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    fn require(&self, names: &[&str]) -> Result<Vec<usize>, DataFormatError> {
        names
            .iter()
            .map(|name| self.column(name))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| DataFormatError {
                expected: names.iter().map(|name| name.to_string()).collect(),
                found: self.headers.clone(),
            })
    }

    fn retain_subject(&mut self, subject: Option<&str>) {
        let (Some(subject), Some(exam)) = (subject, self.column(EXAM_COLUMN)) else {
            return;
        };
        self.rows.retain(|row| cell(row, exam) == subject);
    }
}

pub fn progress_report(
    path: &Path,
    subject: Option<&str>,
) -> Result<Report<ProgressSummary>, ReportError> {
    let Some(mut table) = read_table(path)? else {
        return Ok(Report::NoData);
    };
    let columns = table.require(PROGRESS_COLUMNS)?;
    let (date_col, hours_col, status_col) = (columns[0], columns[1], columns[2]);
    table.retain_subject(subject);
    if table.rows.is_empty() {
        return Ok(Report::NoData);
    }

    let total_days = table.rows.len();
    let completed_label = CompletionStatus::Completed.label();
    let completed_days = table
        .rows
        .iter()
        .filter(|row| cell(row, status_col) == completed_label)
        .count();
    let completion_rate = round_to(completed_days as f64 / total_days as f64 * 100.0, 2);

    let mut dated: Vec<_> = table
        .rows
        .iter()
        .map(|row| {
            let date = cell(row, date_col);
            (
                parse_date(date).ok(),
                date.to_string(),
                parse_number(cell(row, hours_col)),
            )
        })
        .collect();
    // Stable: unparseable dates keep file order after all parsed ones.
    dated.sort_by_key(|(parsed, _, _)| (parsed.is_none(), *parsed));
    let hours_by_date = dated
        .into_iter()
        .map(|(_, label, hours)| (label, hours))
        .collect();

    let status_counts = count_values(table.rows.iter().map(|row| cell(row, status_col)));

    Ok(Report::Data(ProgressSummary {
        total_days,
        completed_days,
        completion_rate,
        hours_by_date,
        status_counts,
    }))
}

pub fn feedback_report(
    path: &Path,
    subject: Option<&str>,
) -> Result<Report<FeedbackSummary>, ReportError> {
    let Some(mut table) = read_table(path)? else {
        return Ok(Report::NoData);
    };
    let columns = table.require(FEEDBACK_COLUMNS)?;
    let (exam_col, rating_col, feedback_col) = (columns[0], columns[1], columns[2]);
    table.retain_subject(subject);
    if table.rows.is_empty() {
        return Ok(Report::NoData);
    }

    let rows: Vec<FeedbackRow> = table
        .rows
        .iter()
        .map(|row| FeedbackRow {
            exam: cell(row, exam_col).to_string(),
            rating: parse_number(cell(row, rating_col)),
            feedback: cell(row, feedback_col).to_string(),
        })
        .collect();

    let ratings: Vec<f64> = rows.iter().filter_map(|row| row.rating).collect();
    let average_rating = (!ratings.is_empty())
        .then(|| round_to(ratings.iter().sum::<f64>() / ratings.len() as f64, 2));

    let mut by_rating: Vec<(f64, usize)> = Vec::new();
    for rating in &ratings {
        match by_rating.iter_mut().find(|(value, _)| value == rating) {
            Some((_, count)) => *count += 1,
            None => by_rating.push((*rating, 1)),
        }
    }
    by_rating.sort_by(|a, b| a.0.total_cmp(&b.0));
    let rating_counts = by_rating
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();

    Ok(Report::Data(FeedbackSummary {
        rows,
        average_rating,
        rating_counts,
    }))
}

fn read_table(path: &Path) -> Result<Option<Table>, TableError> {
    if !path.exists() {
        return Ok(None);
    }
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|header| header.trim().to_string())
        .collect::<Vec<String>>();
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;
    // A 0-byte file is what the recorder treats as not yet created.
    if headers.is_empty() && rows.is_empty() {
        return Ok(None);
    }
    Ok(Some(Table { headers, rows }))
}

fn cell(row: &csv::StringRecord, index: usize) -> &str {
    row.get(index).unwrap_or("").trim()
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn count_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }
    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|value| (value.to_string(), counts.get(value).copied().unwrap_or(0)))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{FeedbackRecord, ProgressRecord, append_record};
    use tempfile::tempdir;
    use time::macros::date;

    fn log(path: &Path, exam: &str, day: time::Date, hours: f64, status: CompletionStatus) {
        let record = ProgressRecord::new(exam, day, 3.0, hours, status, "").unwrap();
        append_record(path, &record).unwrap();
    }

    #[test]
    fn two_days_one_completed_is_fifty_percent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress_log.csv");
        log(&path, "Math", date!(2026 - 10 - 20), 3.0, CompletionStatus::Completed);
        log(&path, "Math", date!(2026 - 10 - 19), 0.0, CompletionStatus::Missed);
        log(&path, "Physics", date!(2026 - 10 - 19), 2.0, CompletionStatus::Completed);

        let Report::Data(summary) = progress_report(&path, Some("Math")).unwrap() else {
            panic!("expected data");
        };
        assert_eq!(summary.total_days, 2);
        assert_eq!(summary.completed_days, 1);
        assert_eq!(summary.completion_rate, 50.0);
        assert_eq!(
            summary.hours_by_date,
            vec![
                ("2026-10-19".to_string(), Some(0.0)),
                ("2026-10-20".to_string(), Some(3.0)),
            ]
        );
    }

    #[test]
    fn unmatched_subject_and_missing_file_are_no_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress_log.csv");
        assert_eq!(progress_report(&path, Some("Math")).unwrap(), Report::NoData);
        log(&path, "Math", date!(2026 - 10 - 19), 1.0, CompletionStatus::Completed);
        assert_eq!(progress_report(&path, Some("History")).unwrap(), Report::NoData);
    }

    #[test]
    fn file_without_exam_column_is_not_filtered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress_log.csv");
        std::fs::write(
            &path,
            "Date,Completed Hours,Status\n\
             2026-10-19,2,Completed\n\
             2026-10-20,1,Partially Completed\n\
             2026-10-21,0,Missed\n",
        )
        .unwrap();
        let Report::Data(summary) = progress_report(&path, Some("Anything")).unwrap() else {
            panic!("expected data");
        };
        assert_eq!(summary.total_days, 3);
        assert_eq!(summary.completion_rate, 33.33);
    }

    #[test]
    fn non_numeric_hours_and_bad_dates_degrade() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress_log.csv");
        std::fs::write(
            &path,
            "Exam,Date,Planned Hours,Completed Hours,Status,Notes\n\
             Math,yesterday,3,lots,Missed,\n\
             Math,2026-10-21,3,2.5,Completed,\n\
             Math,2026-10-20,3,1,Missed\n",
        )
        .unwrap();
        let Report::Data(summary) = progress_report(&path, Some("Math")).unwrap() else {
            panic!("expected data");
        };
        assert_eq!(
            summary.hours_by_date,
            vec![
                ("2026-10-20".to_string(), Some(1.0)),
                ("2026-10-21".to_string(), Some(2.5)),
                ("yesterday".to_string(), None),
            ]
        );
        assert_eq!(
            summary.status_counts,
            vec![("Missed".to_string(), 2), ("Completed".to_string(), 1)]
        );
    }

    #[test]
    fn empty_table_file_is_no_data() {
        let dir = tempdir().unwrap();
        let progress = dir.path().join("progress_log.csv");
        let feedback = dir.path().join("feedback.csv");
        std::fs::write(&progress, "").unwrap();
        std::fs::write(&feedback, "").unwrap();
        assert_eq!(progress_report(&progress, Some("Math")).unwrap(), Report::NoData);
        assert_eq!(feedback_report(&feedback, None).unwrap(), Report::NoData);
    }

    #[test]
    fn progress_with_wrong_header_reports_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress_log.csv");
        std::fs::write(&path, "Day,Hours\n2026-10-19,2\n").unwrap();
        let Err(ReportError::Format(format)) = progress_report(&path, Some("Math")) else {
            panic!("expected format error");
        };
        assert_eq!(format.expected, vec!["Date", "Completed Hours", "Status"]);
        assert_eq!(format.found, vec!["Day", "Hours"]);
    }

    #[test]
    fn wrong_header_reports_expected_and_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feedback.csv");
        std::fs::write(&path, "Subject,Stars\nMath,5\n").unwrap();
        let err = feedback_report(&path, None).unwrap_err();
        let ReportError::Format(format) = err else {
            panic!("expected format error");
        };
        assert_eq!(format.expected, vec!["Exam", "Rating", "Feedback"]);
        assert_eq!(format.found, vec!["Subject", "Stars"]);
    }

    #[test]
    fn feedback_average_and_distribution() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feedback.csv");
        for (exam, rating) in [("Math", 5), ("Math", 4), ("Math", 4), ("Art", 1)] {
            append_record(&path, &FeedbackRecord::new(exam, rating, "ok").unwrap()).unwrap();
        }
        let Report::Data(all) = feedback_report(&path, None).unwrap() else {
            panic!("expected data");
        };
        assert_eq!(all.rows.len(), 4);
        assert_eq!(all.average_rating, Some(3.5));
        assert_eq!(
            all.rating_counts,
            vec![
                ("1".to_string(), 1),
                ("4".to_string(), 2),
                ("5".to_string(), 1)
            ]
        );

        let Report::Data(math) = feedback_report(&path, Some("Math")).unwrap() else {
            panic!("expected data");
        };
        assert_eq!(math.average_rating, Some(4.33));
    }

    #[test]
    fn non_numeric_ratings_are_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feedback.csv");
        std::fs::write(&path, "Exam,Rating,Feedback\nMath,great,\"loved it, really\"\n").unwrap();
        let Report::Data(summary) = feedback_report(&path, None).unwrap() else {
            panic!("expected data");
        };
        assert_eq!(summary.rows[0].rating, None);
        assert_eq!(summary.rows[0].feedback, "loved it, really");
        assert_eq!(summary.average_rating, None);
        assert!(summary.rating_counts.is_empty());
    }
}
