//! Fixed personas, prompt templates and temperatures for each assistant task.

use serde::{Deserialize, Serialize};

use super::model::{ChatTurn, GenerationRequest};
use crate::workflows::admissions::SubjectMark;
use crate::workflows::catalog::Note;

const TUTOR: &str =
    "You are a world-class academic tutor. Be professional, concise, and educational.";
const STUDY_BUDDY: &str = "You are 'Nexus Study Buddy', a friendly and highly intelligent \
academic mentor. You help students understand complex concepts, solve problems step-by-step, \
and provide motivation. Keep answers structured with bullet points where helpful.";
const STRATEGIST: &str =
    "You are an expert academic strategist. Create high-efficiency study plans.";
const COUNSELOR: &str = "You are a professional University Career Counselor. You have deep \
knowledge of global university entrance requirements, especially South African APS systems.";

/// Title and module of a note contributing to a study guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyNote {
    pub title: String,
    #[serde(default)]
    pub module: String,
}

impl From<&Note> for StudyNote {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            module: note.module.clone(),
        }
    }
}

pub(crate) fn summary(title: &str, content: &str) -> GenerationRequest {
    let prompt = format!(
        "You are an academic assistant. Summarize the following university note titled \"{title}\".\n\
         Provide a concise abstract (3-4 sentences) and a list of 5 key concepts mentioned.\n\
         Return the result in plain text format.\n\n\
         Note content:\n{content}"
    );
    single_turn(TUTOR, prompt, 0.7)
}

pub(crate) fn chat(message: &str, history: &[ChatTurn]) -> GenerationRequest {
    let mut turns = history.to_vec();
    turns.push(ChatTurn::user(message));
    GenerationRequest {
        system_instruction: STUDY_BUDDY.to_string(),
        turns,
        temperature: 0.8,
    }
}

pub(crate) fn study_guide(notes: &[StudyNote]) -> GenerationRequest {
    let prompt = format!(
        "Based on this library of notes: {}, generate a 1-week intensive Study Guide.\n\
         Include a daily schedule, prioritized topics based on typical difficulty, and 3 mock \
         exam questions.",
        library_context(notes)
    );
    single_turn(STRATEGIST, prompt, 0.6)
}

pub(crate) fn career_advice(subjects: &[SubjectMark], aps: u32) -> GenerationRequest {
    let prompt = format!(
        "Grade 12 student with APS: {aps}. Subjects: {}.\n\
         Recommend 5 university degrees they are likely to qualify for and excel in.\n\
         Mention specific requirements they meet or miss (e.g., Math requirements for \
         Engineering).",
        subject_summary(subjects)
    );
    single_turn(COUNSELOR, prompt, 0.7)
}

/// `"<title> (<module>)"` per note, comma separated.
pub(crate) fn library_context(notes: &[StudyNote]) -> String {
    notes
        .iter()
        .map(|note| format!("{} ({})", note.title, note.module))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `"<name>: <mark>%"` per subject, comma separated.
pub(crate) fn subject_summary(subjects: &[SubjectMark]) -> String {
    subjects
        .iter()
        .map(|subject| format!("{}: {}%", subject.name, subject.mark))
        .collect::<Vec<_>>()
        .join(", ")
}

fn single_turn(system: &str, prompt: String, temperature: f32) -> GenerationRequest {
    GenerationRequest {
        system_instruction: system.to_string(),
        turns: vec![ChatTurn::user(prompt)],
        temperature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assistant::model::ChatRole;

    #[test]
    fn study_guide_lists_titles_with_modules() {
        let notes = vec![
            StudyNote {
                title: "Limits".to_string(),
                module: "MAM1000".to_string(),
            },
            StudyNote {
                title: "Graphs".to_string(),
                module: "CSC2001".to_string(),
            },
        ];
        assert_eq!(library_context(&notes), "Limits (MAM1000), Graphs (CSC2001)");

        let request = study_guide(&notes);
        assert_eq!(request.temperature, 0.6);
        assert!(request.turns[0]
            .text
            .starts_with("Based on this library of notes: Limits (MAM1000), Graphs (CSC2001),"));
    }

    #[test]
    fn career_prompt_carries_aps_and_marks() {
        let subjects = vec![
            SubjectMark {
                name: "Mathematics".to_string(),
                mark: 81,
            },
            SubjectMark {
                name: "English".to_string(),
                mark: 64,
            },
        ];
        assert_eq!(subject_summary(&subjects), "Mathematics: 81%, English: 64%");

        let request = career_advice(&subjects, 12);
        assert!(request.system_instruction.contains("South African APS"));
        assert!(request.turns[0]
            .text
            .starts_with("Grade 12 student with APS: 12. Subjects: Mathematics: 81%, English: 64%."));
    }

    #[test]
    fn chat_appends_the_new_message_after_history() {
        let history = vec![ChatTurn::user("Hi"), ChatTurn::model("Hello!")];
        let request = chat("Explain recursion", &history);

        assert_eq!(request.temperature, 0.8);
        assert_eq!(request.turns.len(), 3);
        assert_eq!(request.turns[2].role, ChatRole::User);
        assert_eq!(request.turns[2].text, "Explain recursion");
        assert!(request.system_instruction.starts_with("You are 'Nexus Study Buddy'"));
    }

    #[test]
    fn summary_includes_title_and_body() {
        let request = summary("Eigenvalues", "Spectral theorem notes");
        assert_eq!(request.temperature, 0.7);
        assert!(request.turns[0].text.contains("titled \"Eigenvalues\""));
        assert!(request.turns[0].text.ends_with("Spectral theorem notes"));
    }
}
