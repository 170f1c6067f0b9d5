//! Hierarchical autocomplete candidates for the university → faculty → module facets.
//!
//! Every function is a full pass over the supplied snapshot. Matching is exact and
//! case-sensitive; an absent or empty filter means "no constraint".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::Note;

/// Read access to the three facet fields of a record.
pub trait FacetRecord {
    fn university(&self) -> &str;
    fn faculty(&self) -> &str;
    fn module(&self) -> &str;
}

impl FacetRecord for Note {
    fn university(&self) -> &str {
        &self.university
    }

    fn faculty(&self) -> &str {
        &self.faculty
    }

    fn module(&self) -> &str {
        &self.module
    }
}

/// The caller's current narrowing choice. Values need not exist in any record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSelection {
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub faculty: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
}

impl FacetSelection {
    pub fn new(university: Option<&str>, faculty: Option<&str>, module: Option<&str>) -> Self {
        Self {
            university: university.map(str::to_string),
            faculty: faculty.map(str::to_string),
            module: module.map(str::to_string),
        }
    }
}

/// Candidate lists for every facet level under one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetCandidates {
    pub universities: Vec<String>,
    pub faculties: Vec<String>,
    pub modules: Vec<String>,
}

impl FacetCandidates {
    pub fn derive<R: FacetRecord>(records: &[R], selection: &FacetSelection) -> Self {
        let university = selection.university.as_deref();
        let faculty = selection.faculty.as_deref();

        Self {
            universities: university_candidates(records),
            faculties: faculty_candidates(records, university),
            modules: module_candidates(records, university, faculty),
        }
    }
}

pub fn university_candidates<R: FacetRecord>(records: &[R]) -> Vec<String> {
    distinct_sorted(records.iter().map(FacetRecord::university))
}

pub fn faculty_candidates<R: FacetRecord>(
    records: &[R],
    university_filter: Option<&str>,
) -> Vec<String> {
    distinct_sorted(
        records
            .iter()
            .filter(|record| matches_filter(record.university(), university_filter))
            .map(FacetRecord::faculty),
    )
}

pub fn module_candidates<R: FacetRecord>(
    records: &[R],
    university_filter: Option<&str>,
    faculty_filter: Option<&str>,
) -> Vec<String> {
    distinct_sorted(
        records
            .iter()
            .filter(|record| {
                matches_filter(record.university(), university_filter)
                    && matches_filter(record.faculty(), faculty_filter)
            })
            .map(FacetRecord::module),
    )
}

fn matches_filter(value: &str, filter: Option<&str>) -> bool {
    match filter {
        None | Some("") => true,
        Some(expected) => value == expected,
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str, &'static str, &'static str);

    impl FacetRecord for Row {
        fn university(&self) -> &str {
            self.0
        }

        fn faculty(&self) -> &str {
            self.1
        }

        fn module(&self) -> &str {
            self.2
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row("Wits", "Engineering", "ELEN2000"),
            Row("UCT", "Science", "MAM1000"),
            Row("Wits", "Science", "PHYS1000"),
            Row("UCT", "Science", "CSC1015"),
            Row("Wits", "Engineering", "MECN2011"),
            Row("Wits", "Engineering", "ELEN2000"),
            Row("wits", "Commerce", "ACCN1000"),
        ]
    }

    #[test]
    fn universities_are_sorted_and_unique() {
        let candidates = university_candidates(&rows());
        assert_eq!(candidates, vec!["UCT", "Wits", "wits"]);
        assert!(candidates.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn empty_collection_yields_empty_lists() {
        let empty: Vec<Row> = Vec::new();
        assert!(university_candidates(&empty).is_empty());
        assert!(faculty_candidates(&empty, Some("Wits")).is_empty());
        assert!(module_candidates(&empty, None, None).is_empty());
    }

    #[test]
    fn faculty_filter_is_exact_and_case_sensitive() {
        let records = rows();
        assert_eq!(
            faculty_candidates(&records, Some("Wits")),
            vec!["Engineering", "Science"]
        );
        assert_eq!(faculty_candidates(&records, Some("wits")), vec!["Commerce"]);
        assert!(faculty_candidates(&records, Some("Stellenbosch")).is_empty());
    }

    #[test]
    fn absent_and_empty_filters_consider_everything() {
        let records = rows();
        let all = faculty_candidates(&records, None);
        assert_eq!(all, vec!["Commerce", "Engineering", "Science"]);
        assert_eq!(faculty_candidates(&records, Some("")), all);
    }

    #[test]
    fn narrowing_never_introduces_new_faculties() {
        let records = rows();
        let all = faculty_candidates(&records, Some(""));
        for university in university_candidates(&records) {
            for faculty in faculty_candidates(&records, Some(university.as_str())) {
                assert!(all.contains(&faculty));
            }
        }
    }

    #[test]
    fn module_filters_apply_conjunctively() {
        let records = rows();
        assert_eq!(
            module_candidates(&records, Some("Wits"), Some("Engineering")),
            vec!["ELEN2000", "MECN2011"]
        );
        assert_eq!(
            module_candidates(&records, None, Some("Science")),
            vec!["CSC1015", "MAM1000", "PHYS1000"]
        );
        assert_eq!(
            module_candidates(&records, Some("UCT"), Some("")),
            vec!["CSC1015", "MAM1000"]
        );
        assert!(module_candidates(&records, Some("UCT"), Some("Engineering")).is_empty());
    }

    #[test]
    fn module_candidates_are_idempotent() {
        let records = rows();
        let first = module_candidates(&records, Some("Wits"), None);
        let second = module_candidates(&records, Some("Wits"), None);
        assert_eq!(first, second);
    }

    #[test]
    fn derive_threads_selection_through_each_level() {
        let selection = FacetSelection::new(Some("UCT"), Some("Science"), Some("ignored"));
        let candidates = FacetCandidates::derive(&rows(), &selection);
        assert_eq!(candidates.universities, vec!["UCT", "Wits", "wits"]);
        assert_eq!(candidates.faculties, vec!["Science"]);
        assert_eq!(candidates.modules, vec!["CSC1015", "MAM1000"]);
    }
}
