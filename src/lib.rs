//! TalentScout hiring assistant.

pub mod channels;
pub mod config;
pub mod error;
pub mod intake;
pub mod llm;
