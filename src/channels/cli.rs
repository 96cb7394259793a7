//! CLI channel — stdin/stdout REPL for a single intake conversation.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::intake::prompts::BANNER;
use crate::intake::{IntakeManager, TurnOutcome};
use crate::llm::Role;

/// A CLI channel that owns exactly one session.
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }

    /// Run against the process's stdin/stdout.
    pub async fn run_stdio(&self, manager: &IntakeManager) -> std::io::Result<TurnOutcome> {
        let reader = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        self.run(manager, reader, &mut stdout).await
    }

    /// Drive the conversation until the intake is done or input ends.
    ///
    /// Each line is one submission. Only assistant messages the candidate has
    /// not seen yet are printed. Returns the final outcome.
    pub async fn run<R, W>(
        &self,
        manager: &IntakeManager,
        reader: R,
        out: &mut W,
    ) -> std::io::Result<TurnOutcome>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{BANNER}\n")?;

        let mut outcome = manager.start_session().await;
        let mut shown = print_new(out, &outcome, 0)?;

        let mut lines = reader.lines();
        while !outcome.session.is_complete() {
            // Prompt on stderr so stdout carries only the conversation.
            eprint!("> ");

            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    return Err(e);
                }
            };

            outcome = manager.submit(outcome.session, &line).await;
            shown = print_new(out, &outcome, shown)?;
        }

        if outcome.session.is_complete() && !outcome.session.candidate.is_empty() {
            writeln!(out, "\n{}\n", outcome.session.candidate.summary())?;
        }
        Ok(outcome)
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Print assistant messages past `already_shown`; returns the new count.
fn print_new<W: Write>(out: &mut W, outcome: &TurnOutcome, already_shown: usize) -> std::io::Result<usize> {
    for message in outcome.history.iter().skip(already_shown) {
        if message.role == Role::Assistant {
            writeln!(out, "\n{}\n", message.content)?;
        }
    }
    Ok(outcome.history.len())
}
