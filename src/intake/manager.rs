//! IntakeManager — drives one LLM call per turn and advances the intake
//! state machine on the candidate's raw input.

use std::sync::Arc;

use crate::config::GenerationParams;
use crate::llm::{ChatMessage, CompletionRequest, FinishReason, LlmProvider};

use super::prompts::{CLOSING_MESSAGE, SYSTEM_PROMPT, apology};
use super::session::Session;
use super::state::transition;

/// What a UI surface receives after every event.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Non-system messages, oldest first.
    pub history: Vec<ChatMessage>,
    pub session: Session,
    /// Always empty: the input box is cleared after each turn.
    pub cleared_input: String,
}

/// Coordinates the intake flow. Holds no per-conversation state.
pub struct IntakeManager {
    llm: Arc<dyn LlmProvider>,
    params: GenerationParams,
    system_prompt: String,
}

impl IntakeManager {
    pub fn new(llm: Arc<dyn LlmProvider>, params: GenerationParams) -> Self {
        Self {
            llm,
            params,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replace the default system instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Start a session and fetch the greeting.
    ///
    /// This is the only place the system message is inserted. The visible
    /// history is just the greeting (or the apology if the call failed).
    pub async fn start_session(&self) -> TurnOutcome {
        let mut session = Session::new(self.system_prompt.clone());
        tracing::info!(session_id = %session.id, model = self.llm.model_name(), "Intake session started");

        let greeting = self.generate(&mut session).await;

        TurnOutcome {
            history: vec![ChatMessage::assistant(greeting)],
            session,
            cleared_input: String::new(),
        }
    }

    /// Process one candidate message.
    ///
    /// 1. Append the user message (unless empty).
    /// 2. Ask the LLM for a reply; on failure append an apology instead.
    /// 3. Advance the state machine on the raw input, whatever the LLM said.
    /// 4. On reaching `Done`, append the closing message once.
    pub async fn submit(&self, mut session: Session, text: &str) -> TurnOutcome {
        if !text.is_empty() {
            session.push_user(text);
        }

        self.generate(&mut session).await;

        let previous = session.step;
        session.apply(transition(session.step, session.questions_asked, text));
        if session.step != previous {
            tracing::info!(
                session_id = %session.id,
                from = %previous,
                to = %session.step,
                "Intake step advanced"
            );
        }

        let mut history = session.visible_history();

        if session.is_complete() && !session.has_message_containing(CLOSING_MESSAGE) {
            session.push_assistant(CLOSING_MESSAGE);
            history.push(ChatMessage::assistant(CLOSING_MESSAGE));
            tracing::info!(
                session_id = %session.id,
                fields = session.candidate.len(),
                answers = session.tech_responses.len(),
                "Intake complete"
            );
        }

        TurnOutcome {
            history,
            session,
            cleared_input: String::new(),
        }
    }

    /// Run one completion over the full transcript and append the result.
    ///
    /// Returns the text that was appended: the model's reply, or an apology
    /// embedding the error. No retry.
    async fn generate(&self, session: &mut Session) -> String {
        let request = CompletionRequest::new(session.transcript.clone())
            .with_max_tokens(self.params.max_tokens)
            .with_temperature(self.params.temperature)
            .with_top_p(self.params.top_p);

        let reply = match self.llm.complete(request).await {
            Ok(response) => {
                tracing::debug!(
                    session_id = %session.id,
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    finish_reason = ?response.finish_reason,
                    response_id = response.response_id.as_deref().unwrap_or("-"),
                    "LLM reply received"
                );
                if response.finish_reason == FinishReason::Length {
                    tracing::warn!(session_id = %session.id, "LLM reply truncated at max_tokens");
                }
                response.content
            }
            Err(e) => {
                tracing::warn!(session_id = %session.id, step = %session.step, "LLM call failed: {}", e);
                apology(&e)
            }
        };

        session.push_assistant(reply.clone());
        reply
    }
}
