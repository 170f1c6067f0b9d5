use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::Note;

/// Moderation figures shown on the admin and personal dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_notes: usize,
    pub verified_notes: usize,
    /// Whole percentage of verified notes, `0` for an empty catalog.
    pub verification_rate: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributions: Option<usize>,
}

impl CatalogStats {
    pub fn from_notes(notes: &[Note], author: Option<&str>) -> Self {
        let total_notes = notes.len();
        let verified_notes = notes.iter().filter(|note| note.is_verified).count();
        let verification_rate = if total_notes == 0 {
            0
        } else {
            ((verified_notes as f64 / total_notes as f64) * 100.0).round() as u8
        };
        let contributions =
            author.map(|name| notes.iter().filter(|note| note.author == name).count());

        Self {
            total_notes,
            verified_notes,
            verification_rate,
            contributions,
        }
    }
}

/// One contributor's figures for their profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorStats {
    pub author: String,
    pub total: usize,
    pub verified: usize,
    /// Distinct universities the author has written for.
    pub institutions: usize,
}

impl AuthorStats {
    /// Counts only the notes whose author equals `author` exactly.
    pub fn from_notes(notes: &[Note], author: &str) -> Self {
        let own: Vec<&Note> = notes.iter().filter(|note| note.author == author).collect();
        let institutions = own
            .iter()
            .map(|note| note.university.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            author: author.to_string(),
            total: own.len(),
            verified: own.iter().filter(|note| note.is_verified).count(),
            institutions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::catalog::tests::common::note;

    #[test]
    fn empty_catalog_reports_zero_rate() {
        let stats = CatalogStats::from_notes(&[], Some("thandi"));
        assert_eq!(stats.total_notes, 0);
        assert_eq!(stats.verification_rate, 0);
        assert_eq!(stats.contributions, Some(0));
    }

    #[test]
    fn rate_is_rounded_percentage() {
        let mut notes = vec![
            note("1", "A", "UCT", "Science", "X"),
            note("2", "B", "UCT", "Science", "X"),
            note("3", "C", "UCT", "Science", "X"),
        ];
        notes[0].is_verified = true;
        notes[1].is_verified = true;
        notes[2].author = "thandi".to_string();

        let stats = CatalogStats::from_notes(&notes, Some("thandi"));
        assert_eq!(stats.verified_notes, 2);
        assert_eq!(stats.verification_rate, 67);
        assert_eq!(stats.contributions, Some(1));
        assert!(CatalogStats::from_notes(&notes, None).contributions.is_none());
    }

    #[test]
    fn author_stats_cover_only_their_notes() {
        let mut notes = vec![
            note("1", "A", "UCT", "Science", "X"),
            note("2", "B", "Wits", "Science", "Y"),
            note("3", "C", "UCT", "Law", "Z"),
            note("4", "D", "Stellenbosch", "Law", "Z"),
        ];
        for entry in notes.iter_mut().take(3) {
            entry.author = "thandi".to_string();
        }
        notes[1].is_verified = true;
        notes[3].is_verified = true;

        let stats = AuthorStats::from_notes(&notes, "thandi");
        assert_eq!(stats.total, 3);
        assert_eq!(stats.verified, 1);
        assert_eq!(stats.institutions, 2);

        let stranger = AuthorStats::from_notes(&notes, "sipho");
        assert_eq!((stranger.total, stranger.verified, stranger.institutions), (0, 0, 0));
    }
}
