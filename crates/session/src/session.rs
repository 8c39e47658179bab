use crate::error::{ErrorKind, Result};
use crate::{Feedback, FeedbackTiming, Mode, SwipeDirection};
use recall_store::Card;
use std::time::Duration;

/// Running count of correct answers, one counter per mode.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tally {
    pub cards: u32,
    pub question_answer: u32,
}

/// Observable state of a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Waiting for the user to pick a mode.
    ModeSelection,
    /// A mode was picked but the set has no cards. Only a reset leaves this.
    NoCards,
    /// Showing the current card and waiting for a swipe or an answer.
    Studying,
    /// A correct answer is flashing; call [`Session::advance`] once the
    /// feedback delay has passed.
    AwaitingAdvance,
    /// A wrong answer was revealed; call [`Session::acknowledge`] once the
    /// user dismisses it.
    AwaitingAcknowledgement,
}

/// Result of checking a typed answer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    Correct {
        /// Delay before the session should auto-advance.
        advance_after: Duration,
    },
    Incorrect {
        /// The stored answer, shown to the user before moving on.
        expected: String,
    },
}

/// Answers match when they are equal ignoring case.
pub fn answers_match(given: &str, expected: &str) -> bool {
    given.to_lowercase() == expected.to_lowercase()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Pending {
    Advance,
    Acknowledge,
}

#[derive(Debug)]
struct Study {
    mode: Mode,
    cards: Vec<Card>,
    index: usize,
    typed: String,
    feedback: Feedback,
    pending: Option<Pending>,
}
impl Study {
    fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.cards.len();
        self.index
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    ModeSelection,
    Studying(Study),
}

/// A single run through the cards of one set.
///
/// The session is purely in-memory: the caller fetches the cards once when a
/// mode is chosen and hands them over. The deck never runs out; advancing
/// past the last card wraps around to the first, so a session only ends when
/// it is reset.
///
/// ```
/// use recall_session::{Mode, Phase, Session};
///
/// let mut session = Session::default();
/// assert_eq!(session.phase(), Phase::ModeSelection);
/// session.choose(Mode::Cards, Vec::new());
/// assert_eq!(session.phase(), Phase::NoCards);
/// session.reset();
/// assert_eq!(session.phase(), Phase::ModeSelection);
/// ```
#[derive(Debug, Default)]
pub struct Session {
    state: State,
    tally: Tally,
    timing: FeedbackTiming,
}

impl Session {
    pub fn new(timing: FeedbackTiming) -> Self {
        Self { timing, ..Self::default() }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn phase(&self) -> Phase {
        match &self.state {
            State::ModeSelection => Phase::ModeSelection,
            State::Studying(study) if study.cards.is_empty() => Phase::NoCards,
            State::Studying(study) => match study.pending {
                None => Phase::Studying,
                Some(Pending::Advance) => Phase::AwaitingAdvance,
                Some(Pending::Acknowledge) => Phase::AwaitingAcknowledgement,
            },
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match &self.state {
            State::ModeSelection => None,
            State::Studying(study) => Some(study.mode),
        }
    }

    /// Position of the current card, if there is one.
    pub fn index(&self) -> Option<usize> {
        self.study().ok().map(|study| study.index)
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.study().ok().and_then(|study| study.cards.get(study.index))
    }

    pub fn card_count(&self) -> usize {
        match &self.state {
            State::ModeSelection => 0,
            State::Studying(study) => study.cards.len(),
        }
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn feedback(&self) -> Feedback {
        match &self.state {
            State::ModeSelection => Feedback::Neutral,
            State::Studying(study) => study.feedback,
        }
    }

    /// The answer typed so far in question & answer mode.
    pub fn typed_answer(&self) -> &str {
        match &self.state {
            State::ModeSelection => "",
            State::Studying(study) => &study.typed,
        }
    }

    pub fn timing(&self) -> FeedbackTiming {
        self.timing
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Start studying `cards` in the given mode.
    ///
    /// Starts over from the first card with both counters at zero and no
    /// typed answer or feedback carried over.
    pub fn choose(&mut self, mode: Mode, cards: Vec<Card>) {
        tracing::debug!(%mode, cards = cards.len(), "Starting study session");
        self.tally = Tally::default();
        self.state = State::Studying(Study {
            mode,
            cards,
            index: 0,
            typed: String::new(),
            feedback: Feedback::Neutral,
            pending: None,
        });
    }

    /// Drop the loaded cards and both counters, and go back to mode selection.
    pub fn reset(&mut self) {
        tracing::debug!("Resetting study session");
        self.tally = Tally::default();
        self.state = State::ModeSelection;
    }

    /// Swipe the current card away (cards mode).
    ///
    /// A right swipe counts as correct. Either way the next card is shown;
    /// returns its index.
    pub fn swipe(&mut self, direction: SwipeDirection) -> Result<usize> {
        let study = Self::study_mut(&mut self.state, Mode::Cards)?;
        if direction.is_correct() {
            self.tally.cards += 1;
        }
        Ok(study.next())
    }

    /// Replace the typed answer (question & answer mode).
    pub fn type_answer(&mut self, text: impl Into<String>) -> Result<()> {
        let study = Self::study_mut(&mut self.state, Mode::QuestionAnswer)?;
        study.typed = text.into();
        Ok(())
    }

    /// Check the typed answer against the current card (question & answer mode).
    ///
    /// A correct answer flashes positive feedback and must be followed by
    /// [`advance`](Self::advance) once the returned delay has passed.
    /// A wrong answer flashes negative feedback and reveals the expected
    /// answer; the user must [`acknowledge`](Self::acknowledge) it.
    pub fn submit(&mut self) -> Result<Verdict> {
        let timing = self.timing;
        let study = Self::study_mut(&mut self.state, Mode::QuestionAnswer)?;
        if study.pending.is_some() {
            exn::bail!(ErrorKind::FeedbackPending);
        }
        let expected = &study.cards[study.index].answer;
        if answers_match(&study.typed, expected) {
            self.tally.question_answer += 1;
            study.feedback = Feedback::Positive;
            study.pending = Some(Pending::Advance);
            Ok(Verdict::Correct { advance_after: timing.total() })
        } else {
            let expected = expected.clone();
            study.feedback = Feedback::Negative;
            study.pending = Some(Pending::Acknowledge);
            Ok(Verdict::Incorrect { expected })
        }
    }

    /// Type and check an answer in one step.
    pub fn submit_answer(&mut self, text: impl Into<String>) -> Result<Verdict> {
        self.type_answer(text)?;
        self.submit()
    }

    /// Move on after a correct answer, clearing the typed answer. Returns the
    /// index of the next card.
    pub fn advance(&mut self) -> Result<usize> {
        let study = Self::study_mut(&mut self.state, Mode::QuestionAnswer)?;
        if study.pending != Some(Pending::Advance) {
            exn::bail!(ErrorKind::NoFeedback);
        }
        study.typed.clear();
        study.feedback = Feedback::Neutral;
        study.pending = None;
        Ok(study.next())
    }

    /// Move on after the user dismissed a wrong answer. Returns the index of
    /// the next card.
    pub fn acknowledge(&mut self) -> Result<usize> {
        let study = Self::study_mut(&mut self.state, Mode::QuestionAnswer)?;
        if study.pending != Some(Pending::Acknowledge) {
            exn::bail!(ErrorKind::NoFeedback);
        }
        study.feedback = Feedback::Neutral;
        study.pending = None;
        Ok(study.next())
    }

    fn study(&self) -> Result<&Study> {
        match &self.state {
            State::ModeSelection => exn::bail!(ErrorKind::NotStarted),
            State::Studying(study) if study.cards.is_empty() => exn::bail!(ErrorKind::NoCards),
            State::Studying(study) => Ok(study),
        }
    }

    fn study_mut(state: &mut State, mode: Mode) -> Result<&mut Study> {
        match state {
            State::ModeSelection => exn::bail!(ErrorKind::NotStarted),
            State::Studying(study) if study.cards.is_empty() => exn::bail!(ErrorKind::NoCards),
            State::Studying(study) if study.mode != mode => exn::bail!(ErrorKind::WrongMode(study.mode)),
            State::Studying(study) => Ok(study),
        }
    }
}
