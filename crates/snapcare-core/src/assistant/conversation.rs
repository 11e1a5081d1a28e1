//! Chat transcript with the assistant.

use serde::{Deserialize, Serialize};

use super::backend::{AssistantBackend, DiagnosisResult};
use crate::error::{Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// Ordered transcript plus the diagnosis it is about, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    diagnosis: Option<DiagnosisResult>,
}

impl Conversation {
    /// New conversation opened by the assistant's greeting.
    pub fn new(greeting: &str) -> Self {
        let mut conv = Self::default();
        if !greeting.trim().is_empty() {
            conv.push(Role::Assistant, greeting.to_string());
        }
        conv
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Messages the user has sent so far.
    pub fn user_turns(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }

    pub fn diagnosis(&self) -> Option<&DiagnosisResult> {
        self.diagnosis.as_ref()
    }

    fn push(&mut self, role: Role, text: String) {
        self.messages.push(ChatMessage { role, text });
    }

    /// Record an analysis result and have the assistant summarise it.
    pub fn attach_diagnosis(&mut self, result: DiagnosisResult) {
        self.push(Role::Assistant, result.summary());
        self.diagnosis = Some(result);
    }

    /// Text sent to the backend alongside each message: the diagnosis (if
    /// any) followed by the transcript so far.
    pub fn context(&self) -> String {
        let mut out = String::new();
        match &self.diagnosis {
            Some(DiagnosisResult::Diagnosis(d)) => {
                out.push_str(&format!("Description: {}\n", d.description));
                out.push_str(&format!("Diagnosis: {}\n", d.diagnosis));
            }
            Some(DiagnosisResult::NoFindings) => {
                out.push_str("Diagnosis: no injuries found in the photo\n");
            }
            None => {}
        }
        out.push_str("Transcript:\n");
        for m in &self.messages {
            let who = match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            out.push_str(&format!("{who}: {}\n", m.text));
        }
        out
    }

    /// Append the user's message, ask the backend, append the reply.
    ///
    /// The user's message stays in the transcript even if the backend call
    /// fails, matching what the chat screen already shows.
    pub async fn send<B: AssistantBackend>(
        &mut self,
        backend: &B,
        text: &str,
    ) -> Result<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyField("message".into()).into());
        }
        let context = self.context();
        self.push(Role::User, text.to_string());

        let reply = backend.chat(text, &context).await?;
        self.push(Role::Assistant, reply);
        Ok(&self.messages[self.messages.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::backend::{Diagnosis, SimulatedBackend};

    #[test]
    fn greeting_opens_transcript() {
        let conv = Conversation::new("Hello");
        assert_eq!(conv.messages().len(), 1);
        assert_eq!(conv.messages()[0].role, Role::Assistant);
        assert!(Conversation::new("  ").messages().is_empty());
    }

    #[test]
    fn diagnosis_goes_into_context() {
        let mut conv = Conversation::new("Hello");
        conv.attach_diagnosis(DiagnosisResult::Diagnosis(Diagnosis {
            description: "Small cut on thumb".into(),
            search_query: String::new(),
            relevant_links: vec![],
            page_contents: Default::default(),
            diagnosis: "Clean and cover with a bandage.".into(),
        }));
        let ctx = conv.context();
        assert!(ctx.starts_with("Description: Small cut on thumb\n"));
        assert!(ctx.contains("assistant: Clean and cover with a bandage.\n"));
        assert_eq!(conv.messages().len(), 2);
    }

    #[tokio::test]
    async fn send_appends_user_and_reply() {
        let backend = SimulatedBackend::new(vec!["Keep it dry.".into()]);
        let mut conv = Conversation::new("Hello");
        let reply = conv.send(&backend, "  Can I shower?  ").await.unwrap();
        assert_eq!(reply.text, "Keep it dry.");

        let roles: Vec<_> = conv.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(conv.user_turns(), 1);
        assert_eq!(conv.messages()[1].text, "Can I shower?");
    }

    #[tokio::test]
    async fn send_rejects_blank_message() {
        let backend = SimulatedBackend::default();
        let mut conv = Conversation::new("Hello");
        assert!(conv.send(&backend, "   ").await.is_err());
        assert_eq!(conv.messages().len(), 1);
    }

    #[tokio::test]
    async fn failed_reply_keeps_user_message() {
        let backend = SimulatedBackend::new(vec![]);
        let mut conv = Conversation::new("");
        assert!(conv.send(&backend, "hello?").await.is_err());
        assert_eq!(conv.messages().len(), 1);
        assert_eq!(conv.messages()[0].role, Role::User);
    }
}
