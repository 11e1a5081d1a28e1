//! Photo analysis and the assistant chat around it.

pub mod backend;
pub mod conversation;

pub use backend::{AssistantBackend, Diagnosis, DiagnosisResult, HttpBackend, SimulatedBackend};
pub use conversation::{ChatMessage, Conversation, Role};
