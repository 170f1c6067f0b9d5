//! Admission Point Score calculator and the subject session feeding career consultations.

pub mod router;
pub mod scoring;
pub mod session;

pub use router::admissions_router;
pub use scoring::{
    mark_value, parse_mark, points_for_mark, score_breakdown, total_score, ScoreBreakdown,
    ScoredSubject, SubjectScore,
};
pub use session::{
    AdmissionSession, EntryField, EntryId, SessionError, SubjectEntry, SubjectInput, SubjectMark,
    MIN_ENTRIES,
};
