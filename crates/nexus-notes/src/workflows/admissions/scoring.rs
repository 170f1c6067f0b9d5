//! Admission Point Score (APS) table.
//!
//! Each percentage mark maps to a point bucket; the APS is the sum over all subjects.

use serde::Serialize;

/// Inclusive lower bound of each bucket, best first. Anything below the last bound scores 1.
const THRESHOLDS: [(i64, u8); 6] = [(80, 7), (70, 6), (60, 5), (50, 4), (40, 3), (30, 2)];
const FLOOR_POINTS: u8 = 1;

/// Points for a single mark. Total over all integers: marks below 30, including zero and
/// negative values, score the floor of 1 point.
pub fn points_for_mark(mark: i64) -> u8 {
    THRESHOLDS
        .iter()
        .find(|(bound, _)| mark >= *bound)
        .map(|(_, points)| *points)
        .unwrap_or(FLOOR_POINTS)
}

/// Reads the leading integer of free-form input: optional whitespace, an optional sign, then
/// decimal digits. Trailing text is ignored (`"65%"` is 65, `"12.7"` is 12). `None` when no
/// digits lead the input.
pub fn parse_mark(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    seen.then(|| if negative { -value } else { value })
}

/// Mark used for scoring: unparsable or missing input counts as 0.
pub fn mark_value(raw: &str) -> i64 {
    parse_mark(raw).unwrap_or(0)
}

/// Anything that carries a subject name and a mark that can be scored.
pub trait ScoredSubject {
    fn subject(&self) -> &str;
    /// Mark after coercion; see [`mark_value`].
    fn mark(&self) -> i64;
}

impl ScoredSubject for (&str, &str) {
    fn subject(&self) -> &str {
        self.0
    }

    fn mark(&self) -> i64 {
        mark_value(self.1)
    }
}

impl ScoredSubject for (&str, i64) {
    fn subject(&self) -> &str {
        self.0
    }

    fn mark(&self) -> i64 {
        self.1
    }
}

/// Sum of [`points_for_mark`] across `entries`.
pub fn total_score<S: ScoredSubject>(entries: &[S]) -> u32 {
    entries
        .iter()
        .map(|entry| u32::from(points_for_mark(entry.mark())))
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectScore {
    pub subject: String,
    pub mark: i64,
    pub points: u8,
}

/// Per-subject points alongside the APS total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub subjects: Vec<SubjectScore>,
    pub total: u32,
}

pub fn score_breakdown<S: ScoredSubject>(entries: &[S]) -> ScoreBreakdown {
    let subjects: Vec<SubjectScore> = entries
        .iter()
        .map(|entry| {
            let mark = entry.mark();
            SubjectScore {
                subject: entry.subject().to_string(),
                mark,
                points: points_for_mark(mark),
            }
        })
        .collect();
    let total = subjects.iter().map(|score| u32::from(score.points)).sum();

    ScoreBreakdown { subjects, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        assert_eq!(points_for_mark(100), 7);
        assert_eq!(points_for_mark(80), 7);
        assert_eq!(points_for_mark(79), 6);
        assert_eq!(points_for_mark(70), 6);
        assert_eq!(points_for_mark(69), 5);
        assert_eq!(points_for_mark(60), 5);
        assert_eq!(points_for_mark(59), 4);
        assert_eq!(points_for_mark(50), 4);
        assert_eq!(points_for_mark(49), 3);
        assert_eq!(points_for_mark(40), 3);
        assert_eq!(points_for_mark(39), 2);
        assert_eq!(points_for_mark(30), 2);
        assert_eq!(points_for_mark(29), 1);
    }

    #[test]
    fn zero_and_negative_marks_score_the_floor() {
        assert_eq!(points_for_mark(0), 1);
        assert_eq!(points_for_mark(-5), 1);
        assert_eq!(points_for_mark(i64::MIN), 1);
    }

    #[test]
    fn totals_sum_bucket_points() {
        let entries: [(&str, i64); 3] = [("Math", 80), ("English", 65), ("Science", 45)];
        assert_eq!(total_score(&entries), 15);
    }

    #[test]
    fn unparsable_marks_still_score_one_point() {
        let entries = [("Math", ""), ("English", "65")];
        assert_eq!(total_score(&entries), 6);
    }

    #[test]
    fn leading_integer_parsing() {
        assert_eq!(parse_mark("65"), Some(65));
        assert_eq!(parse_mark("  72 "), Some(72));
        assert_eq!(parse_mark("65%"), Some(65));
        assert_eq!(parse_mark("12.7"), Some(12));
        assert_eq!(parse_mark("-5"), Some(-5));
        assert_eq!(parse_mark("+40"), Some(40));
        assert_eq!(parse_mark(""), None);
        assert_eq!(parse_mark("abc"), None);
        assert_eq!(parse_mark("-"), None);
        assert_eq!(parse_mark("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(mark_value("n/a"), 0);
    }

    #[test]
    fn breakdown_reports_each_subject() {
        let breakdown = score_breakdown(&[("Physics", "81"), ("History", "seventy")]);
        assert_eq!(breakdown.total, 8);
        assert_eq!(
            breakdown.subjects[1],
            SubjectScore {
                subject: "History".to_string(),
                mark: 0,
                points: 1,
            }
        );
    }
}
