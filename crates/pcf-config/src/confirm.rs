//! Interactive overwrite confirmation.
//!
//! The confirmation is a small state machine driven by answers from an
//! [`AnswerSource`]. Each answer is a single character (or nothing, when the
//! input is exhausted). The machine starts in [`ConfirmState::Prompting`]
//! with the retry budget and ends in one of the three terminal states.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Prompt shown before every answer.
pub const CONFIRM_PROMPT: &str = "Are you going to overwrite it? (y/n): ";

/// States of the confirmation machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmState {
    /// Waiting for an answer; `remaining` answers are still allowed.
    Prompting { remaining: u32 },
    /// The user answered yes.
    Accepted,
    /// The user answered no.
    Declined,
    /// The retry budget ran out without a valid answer.
    Exhausted,
}

impl ConfirmState {
    /// Initial state for a retry budget.
    pub fn start(budget: u32) -> Self {
        if budget == 0 {
            ConfirmState::Exhausted
        } else {
            ConfirmState::Prompting { remaining: budget }
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, ConfirmState::Prompting { .. })
    }

    /// Transition on one answer. Terminal states absorb every input.
    pub fn step(self, answer: Option<char>) -> Self {
        let ConfirmState::Prompting { remaining } = self else {
            return self;
        };
        match answer {
            Some('y' | 'Y') => ConfirmState::Accepted,
            Some('n' | 'N') => ConfirmState::Declined,
            _ if remaining <= 1 => ConfirmState::Exhausted,
            _ => ConfirmState::Prompting {
                remaining: remaining - 1,
            },
        }
    }
}

/// Supplies answers to the confirmation prompt.
pub trait AnswerSource {
    /// Show `prompt` and return the first character of the answer, or `None`
    /// when no answer could be read.
    fn answer(&mut self, prompt: &str) -> Option<char>;
}

/// Run the machine until it reaches a terminal state.
pub fn confirm(budget: u32, source: &mut dyn AnswerSource) -> ConfirmState {
    let mut state = ConfirmState::start(budget);
    while !state.is_terminal() {
        let answer = source.answer(CONFIRM_PROMPT);
        state = state.step(answer);
        tracing::debug!(answer = ?answer, state = ?state, "overwrite confirmation");
    }
    state
}

/// Answers read line by line from a reader, with prompts written to a writer.
///
/// Only the first character of each line counts; the rest of the line is
/// discarded.
pub struct LineAnswers<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> LineAnswers<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        LineAnswers { reader, prompt_out }
    }
}

impl LineAnswers<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr and read from stdin.
    pub fn terminal() -> Self {
        LineAnswers::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> AnswerSource for LineAnswers<R, W> {
    fn answer(&mut self, prompt: &str) -> Option<char> {
        if let Err(e) = write!(self.prompt_out, "{}", prompt).and_then(|()| self.prompt_out.flush()) {
            tracing::debug!(error = %e, "failed to show the confirmation prompt");
        }
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => line.chars().next().filter(|c| *c != '\n' && *c != '\r'),
        }
    }
}

/// A fixed sequence of answers, for non-interactive runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnswers {
    answers: VecDeque<Option<char>>,
    asked: usize,
}

impl ScriptedAnswers {
    pub fn new(answers: impl IntoIterator<Item = Option<char>>) -> Self {
        ScriptedAnswers {
            answers: answers.into_iter().collect(),
            asked: 0,
        }
    }

    /// A source that never has an answer.
    pub fn none() -> Self {
        Self::default()
    }

    /// How many times the prompt was shown.
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl AnswerSource for ScriptedAnswers {
    fn answer(&mut self, _prompt: &str) -> Option<char> {
        self.asked += 1;
        self.answers.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_transitions() {
        let s = ConfirmState::start(2);
        assert_eq!(s, ConfirmState::Prompting { remaining: 2 });
        assert_eq!(s.step(Some('y')), ConfirmState::Accepted);
        assert_eq!(s.step(Some('N')), ConfirmState::Declined);
        assert_eq!(s.step(Some('x')), ConfirmState::Prompting { remaining: 1 });
        assert_eq!(
            s.step(Some('x')).step(None),
            ConfirmState::Exhausted
        );
    }

    #[test]
    fn test_terminal_states_absorb() {
        assert_eq!(ConfirmState::Accepted.step(Some('n')), ConfirmState::Accepted);
        assert_eq!(ConfirmState::Declined.step(Some('y')), ConfirmState::Declined);
        assert_eq!(ConfirmState::Exhausted.step(Some('y')), ConfirmState::Exhausted);
    }

    #[test]
    fn test_zero_budget_is_exhausted() {
        assert_eq!(ConfirmState::start(0), ConfirmState::Exhausted);
        let mut source = ScriptedAnswers::new([Some('y')]);
        assert_eq!(confirm(0, &mut source), ConfirmState::Exhausted);
        assert_eq!(source.asked(), 0);
    }

    #[test]
    fn test_three_invalid_answers_exhaust() {
        let mut source = ScriptedAnswers::new([Some('x'), Some('?'), None, Some('y')]);
        assert_eq!(confirm(3, &mut source), ConfirmState::Exhausted);
        assert_eq!(source.asked(), 3);
    }

    #[test]
    fn test_stops_at_first_valid_answer() {
        let mut source = ScriptedAnswers::new([Some('q'), Some('Y'), Some('n')]);
        assert_eq!(confirm(5, &mut source), ConfirmState::Accepted);
        assert_eq!(source.asked(), 2);
    }

    #[test]
    fn test_line_answers_take_first_char() {
        let input = b"yes please\nno\n" as &[u8];
        let mut prompts = Vec::new();
        let mut source = LineAnswers::new(input, &mut prompts);
        assert_eq!(source.answer(CONFIRM_PROMPT), Some('y'));
        assert_eq!(source.answer(CONFIRM_PROMPT), Some('n'));
        assert_eq!(source.answer(CONFIRM_PROMPT), None);
        let shown = String::from_utf8(prompts).unwrap();
        assert_eq!(shown.matches("(y/n)").count(), 3);
    }

    struct ClosedWriter;

    impl Write for ClosedWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_line_answers_survive_failed_prompt() {
        let input = b"y\n" as &[u8];
        let mut source = LineAnswers::new(input, ClosedWriter);
        assert_eq!(confirm(1, &mut source), ConfirmState::Accepted);
    }

    #[test]
    fn test_line_answers_empty_line_is_invalid() {
        let input = b"\nn\n" as &[u8];
        let mut source = LineAnswers::new(input, io::sink());
        assert_eq!(confirm(2, &mut source), ConfirmState::Declined);
    }
}
