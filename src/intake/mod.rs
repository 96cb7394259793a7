//! Candidate intake: the conversational hiring-assistant flow.
//!
//! The LLM writes every prompt and acknowledgment the candidate sees, while a
//! fixed state machine walks the contact form one field at a time and then
//! counts three technical answers. Progress never depends on what the model
//! said, so a failed or off-script reply cannot stall the intake.

pub mod manager;
pub mod model;
pub mod prompts;
pub mod routes;
pub mod session;
pub mod state;

pub use manager::{IntakeManager, TurnOutcome};
pub use model::{CandidateField, CandidateRecord};
pub use routes::{IntakeRouteState, SessionSlot, SessionStore, intake_routes, spawn_pruner};
pub use session::Session;
pub use state::{FlowStep, TECH_QUESTION_COUNT, Transition, transition};
