use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::model::{ChatTurn, GenerationRequest, GenerativeModel};
use super::prompts::{self, StudyNote};
use crate::workflows::admissions::{total_score, AdmissionSession, SessionError, SubjectMark};
use crate::workflows::catalog::Note;

/// Study guides draw on at most this many notes.
pub const STUDY_GUIDE_NOTE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantTask {
    Summary,
    Chat,
    StudyGuide,
    CareerAdvice,
}

impl AssistantTask {
    pub const fn label(self) -> &'static str {
        match self {
            AssistantTask::Summary => "summary",
            AssistantTask::Chat => "chat",
            AssistantTask::StudyGuide => "study_guide",
            AssistantTask::CareerAdvice => "career_advice",
        }
    }

    /// Text shown to the user when the model call fails.
    pub const fn fallback_message(self) -> &'static str {
        match self {
            AssistantTask::Summary => "Unable to generate AI summary at this time.",
            AssistantTask::Chat => {
                "I'm having trouble connecting to my brain right now. Please try again!"
            }
            AssistantTask::StudyGuide => "Failed to generate study guide.",
            AssistantTask::CareerAdvice => "Error generating career advice.",
        }
    }
}

/// Model output, or the task's fallback text with `degraded` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantReply {
    pub text: String,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistantError {
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("there are no notes to build a study guide from")]
    NoNotes,
    #[error("Please fill in all subject details: {0}")]
    IncompleteSubjects(#[from] SessionError),
}

/// Single-call passthroughs to the generative model with fixed prompts.
pub struct StudyAssistant<M> {
    model: Arc<M>,
}

impl<M> StudyAssistant<M>
where
    M: GenerativeModel + 'static,
{
    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }

    pub async fn summarize_note(&self, title: &str, content: &str) -> AssistantReply {
        self.run(AssistantTask::Summary, prompts::summary(title, content))
            .await
    }

    pub async fn chat(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<AssistantReply, AssistantError> {
        if message.trim().is_empty() {
            return Err(AssistantError::EmptyMessage);
        }
        Ok(self
            .run(AssistantTask::Chat, prompts::chat(message, history))
            .await)
    }

    /// Only the first [`STUDY_GUIDE_NOTE_LIMIT`] notes reach the prompt.
    pub async fn study_guide(&self, notes: &[StudyNote]) -> AssistantReply {
        let notes = &notes[..notes.len().min(STUDY_GUIDE_NOTE_LIMIT)];
        self.run(AssistantTask::StudyGuide, prompts::study_guide(notes))
            .await
    }

    /// Study guide over the leading catalog notes; an empty catalog is refused.
    pub async fn catalog_study_guide(&self, notes: &[Note]) -> Result<AssistantReply, AssistantError> {
        if notes.is_empty() {
            return Err(AssistantError::NoNotes);
        }
        let library: Vec<StudyNote> = notes
            .iter()
            .take(STUDY_GUIDE_NOTE_LIMIT)
            .map(StudyNote::from)
            .collect();
        Ok(self.study_guide(&library).await)
    }

    pub async fn career_advice(&self, subjects: &[SubjectMark], aps: u32) -> AssistantReply {
        self.run(
            AssistantTask::CareerAdvice,
            prompts::career_advice(subjects, aps),
        )
        .await
    }

    /// Validates the session before consulting; the APS sent is the session's own total.
    pub async fn consult(
        &self,
        session: &AdmissionSession,
    ) -> Result<AssistantReply, AssistantError> {
        let subjects = session.consultation_marks()?;
        let aps = total_score(&subjects);
        Ok(self.career_advice(&subjects, aps).await)
    }

    async fn run(&self, task: AssistantTask, request: GenerationRequest) -> AssistantReply {
        match self.model.generate(request).await {
            Ok(text) => {
                info!(task = task.label(), "assistant reply generated");
                AssistantReply {
                    text,
                    degraded: false,
                }
            }
            Err(error) => {
                warn!(%error, task = task.label(), "assistant call failed; using fallback text");
                AssistantReply {
                    text: task.fallback_message().to_string(),
                    degraded: true,
                }
            }
        }
    }
}
