//! AI study assistant: note summaries, tutoring chat, study guides and career advice.

pub mod gemini;
pub mod model;
pub mod prompts;
pub mod router;
pub mod service;

pub use gemini::GeminiClient;
pub use model::{ChatRole, ChatTurn, GenerationRequest, GenerativeModel, ModelError};
pub use prompts::StudyNote;
pub use router::assistant_router;
pub use service::{
    AssistantError, AssistantReply, AssistantTask, StudyAssistant, STUDY_GUIDE_NOTE_LIMIT,
};
