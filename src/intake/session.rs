//! Per-conversation session value.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::llm::{ChatMessage, Role};

use super::model::CandidateRecord;
use super::state::{FlowStep, Transition};

/// Everything one conversation owns. Not shared between surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Role-tagged history sent to the LLM. Element 0 is the system message.
    pub transcript: Vec<ChatMessage>,
    pub step: FlowStep,
    pub candidate: CandidateRecord,
    pub questions_asked: u32,
    pub tech_responses: Vec<String>,
}

impl Session {
    /// A fresh session whose transcript holds only the system instruction.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            transcript: vec![ChatMessage::system(system_prompt)],
            step: FlowStep::Start,
            candidate: CandidateRecord::default(),
            questions_asked: 0,
            tech_responses: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.step.is_terminal()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.transcript.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.transcript.push(ChatMessage::assistant(content));
    }

    /// Transcript without the system message, as shown to the candidate.
    pub fn visible_history(&self) -> Vec<ChatMessage> {
        self.transcript
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned()
            .collect()
    }

    /// Whether any transcript message contains `needle`.
    pub fn has_message_containing(&self, needle: &str) -> bool {
        self.transcript.iter().any(|m| m.content.contains(needle))
    }

    /// Apply a state machine transition.
    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Exit => {
                self.step = FlowStep::Done;
            }
            Transition::Recorded { field, value, next } => {
                self.candidate.set(field, value);
                self.step = next;
                if next == FlowStep::AskQuestions {
                    self.questions_asked = 0;
                }
            }
            Transition::Answered { answer, next } => {
                self.tech_responses.push(answer);
                self.questions_asked += 1;
                self.step = next;
            }
            Transition::Unchanged => {}
        }
    }
}
