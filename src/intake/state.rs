//! Intake state machine — tracks which step the candidate is on.
//!
//! Progress is decided only by the step and the candidate's raw input. The
//! LLM's reply is never consulted.

use serde::{Deserialize, Serialize};

use super::model::CandidateField;

/// Number of technical questions answered before the intake closes.
pub const TECH_QUESTION_COUNT: u32 = 3;

/// The steps of the intake conversation.
///
/// Progresses linearly: Start → Email → Phone → Experience → Position →
/// Location → TechStack → AskQuestions → Done. An exit keyword jumps straight
/// to Done from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    #[default]
    Start,
    Email,
    Phone,
    Experience,
    Position,
    Location,
    TechStack,
    AskQuestions,
    Done,
}

impl FlowStep {
    /// Whether this step is terminal (intake is over).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<FlowStep> {
        use FlowStep::*;
        match self {
            Start => Some(Email),
            Email => Some(Phone),
            Phone => Some(Experience),
            Experience => Some(Position),
            Position => Some(Location),
            Location => Some(TechStack),
            TechStack => Some(AskQuestions),
            AskQuestions => Some(Done),
            Done => None,
        }
    }

    /// The candidate field whose value is collected while on this step.
    pub fn collects(&self) -> Option<CandidateField> {
        use FlowStep::*;
        match self {
            Start => Some(CandidateField::FullName),
            Email => Some(CandidateField::Email),
            Phone => Some(CandidateField::Phone),
            Experience => Some(CandidateField::Experience),
            Position => Some(CandidateField::Position),
            Location => Some(CandidateField::Location),
            TechStack => Some(CandidateField::TechStack),
            AskQuestions | Done => None,
        }
    }
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Experience => "experience",
            Self::Position => "position",
            Self::Location => "location",
            Self::TechStack => "tech_stack",
            Self::AskQuestions => "ask_questions",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// The effect of one user message on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Exit keyword: jump to Done, touch nothing else.
    Exit,
    /// Store `value` in `field`, then move to `next`.
    Recorded {
        field: CandidateField,
        value: String,
        next: FlowStep,
    },
    /// Append a technical answer; `next` is Done once enough were given.
    Answered { answer: String, next: FlowStep },
    /// Nothing changes.
    Unchanged,
}

/// Case-insensitive match on the exit keywords.
pub fn is_exit_command(input: &str) -> bool {
    let folded = input.to_lowercase();
    folded == "exit" || folded == "quit"
}

/// Compute the transition for `input` at `step`.
///
/// `questions_asked` is only read on `AskQuestions`. An empty submission
/// never changes anything, so it cannot wipe a field. Any other input,
/// whitespace included, is taken verbatim.
pub fn transition(step: FlowStep, questions_asked: u32, input: &str) -> Transition {
    if is_exit_command(input) {
        return Transition::Exit;
    }
    if input.is_empty() {
        return Transition::Unchanged;
    }

    use FlowStep::*;
    let record = |field: CandidateField, next: FlowStep| Transition::Recorded {
        field,
        value: input.to_string(),
        next,
    };
    match step {
        Start => record(CandidateField::FullName, Email),
        Email => record(CandidateField::Email, Phone),
        Phone => record(CandidateField::Phone, Experience),
        Experience => record(CandidateField::Experience, Position),
        Position => record(CandidateField::Position, Location),
        Location => record(CandidateField::Location, TechStack),
        TechStack => record(CandidateField::TechStack, AskQuestions),
        AskQuestions => {
            let next = if questions_asked + 1 >= TECH_QUESTION_COUNT {
                Done
            } else {
                AskQuestions
            };
            Transition::Answered {
                answer: input.to_string(),
                next,
            }
        }
        Done => Transition::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STEPS: [FlowStep; 9] = [
        FlowStep::Start,
        FlowStep::Email,
        FlowStep::Phone,
        FlowStep::Experience,
        FlowStep::Position,
        FlowStep::Location,
        FlowStep::TechStack,
        FlowStep::AskQuestions,
        FlowStep::Done,
    ];

    #[test]
    fn next_walks_all_steps() {
        let mut current = FlowStep::Start;
        for expected in &ALL_STEPS[1..] {
            let next = current.next().unwrap();
            assert_eq!(next, *expected);
            current = next;
        }
        assert!(current.next().is_none());
    }

    #[test]
    fn is_terminal() {
        assert!(FlowStep::Done.is_terminal());
        assert!(!FlowStep::Start.is_terminal());
        assert!(!FlowStep::AskQuestions.is_terminal());
    }

    #[test]
    fn display_matches_serde() {
        for step in ALL_STEPS {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json, "Display and serde should match for {step:?}");
        }
    }

    #[test]
    fn field_steps_record_and_advance() {
        let expected = [
            (FlowStep::Start, CandidateField::FullName, FlowStep::Email),
            (FlowStep::Email, CandidateField::Email, FlowStep::Phone),
            (FlowStep::Phone, CandidateField::Phone, FlowStep::Experience),
            (FlowStep::Experience, CandidateField::Experience, FlowStep::Position),
            (FlowStep::Position, CandidateField::Position, FlowStep::Location),
            (FlowStep::Location, CandidateField::Location, FlowStep::TechStack),
            (FlowStep::TechStack, CandidateField::TechStack, FlowStep::AskQuestions),
        ];
        for (step, field, next) in expected {
            assert_eq!(
                transition(step, 0, "some value"),
                Transition::Recorded {
                    field,
                    value: "some value".to_string(),
                    next,
                },
                "at step {step}"
            );
        }
    }

    #[test]
    fn exit_keywords_from_every_step() {
        for step in ALL_STEPS {
            for word in ["exit", "Exit", "QUIT", "quit", "eXiT"] {
                assert_eq!(transition(step, 1, word), Transition::Exit, "{word} at {step}");
            }
        }
    }

    #[test]
    fn exit_requires_exact_word() {
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command(" quit"));
        assert!(!is_exit_command("quitting"));
        assert!(!is_exit_command(""));
    }

    #[test]
    fn questions_close_after_third_answer() {
        assert_eq!(
            transition(FlowStep::AskQuestions, 0, "a1"),
            Transition::Answered {
                answer: "a1".into(),
                next: FlowStep::AskQuestions
            }
        );
        assert_eq!(
            transition(FlowStep::AskQuestions, 1, "a2"),
            Transition::Answered {
                answer: "a2".into(),
                next: FlowStep::AskQuestions
            }
        );
        assert_eq!(
            transition(FlowStep::AskQuestions, 2, "a3"),
            Transition::Answered {
                answer: "a3".into(),
                next: FlowStep::Done
            }
        );
    }

    #[test]
    fn done_is_a_no_op() {
        assert_eq!(transition(FlowStep::Done, 3, "anything else?"), Transition::Unchanged);
    }

    #[test]
    fn empty_input_changes_nothing() {
        for step in ALL_STEPS {
            assert_eq!(transition(step, 0, ""), Transition::Unchanged);
        }
    }

    #[test]
    fn whitespace_input_is_accepted_verbatim() {
        assert_eq!(
            transition(FlowStep::Start, 0, " "),
            Transition::Recorded {
                field: CandidateField::FullName,
                value: " ".to_string(),
                next: FlowStep::Email,
            }
        );
        assert_eq!(
            transition(FlowStep::AskQuestions, 0, "   "),
            Transition::Answered {
                answer: "   ".to_string(),
                next: FlowStep::AskQuestions,
            }
        );
    }

    #[test]
    fn table_agrees_with_step_helpers() {
        for step in ALL_STEPS {
            if let Transition::Recorded { field, next, .. } = transition(step, 0, "v") {
                assert_eq!(step.collects(), Some(field), "field at {step}");
                assert_eq!(step.next(), Some(next), "next after {step}");
            }
        }
    }

    #[test]
    fn values_are_kept_verbatim() {
        match transition(FlowStep::Email, 0, "  not-an-email  ") {
            Transition::Recorded { value, .. } => assert_eq!(value, "  not-an-email  "),
            other => panic!("unexpected {other:?}"),
        }
    }
}
