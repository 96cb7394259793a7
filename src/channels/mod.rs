//! UI surfaces that drive an intake conversation.

pub mod cli;

pub use cli::CliChannel;
