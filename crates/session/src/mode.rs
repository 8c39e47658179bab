use derive_more::Display;

/// How the cards of a set are drilled.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Swipe through flippable cards; a right swipe means "I knew it".
    #[display("cards")]
    Cards,
    /// Type the answer to each question.
    #[display("question & answer")]
    QuestionAnswer,
}

/// Direction a card was swiped in.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum SwipeDirection {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}
impl SwipeDirection {
    /// Classify a released drag by its horizontal displacement.
    ///
    /// Anything within `threshold` of the origin is not a swipe and the card
    /// snaps back into place.
    pub fn classify(dx: f32, threshold: f32) -> Option<Self> {
        if dx > threshold {
            Some(Self::Right)
        } else if dx < -threshold {
            Some(Self::Left)
        } else {
            None
        }
    }

    /// Only a right swipe counts as a correct answer.
    pub fn is_correct(self) -> bool {
        self == Self::Right
    }
}
