use std::time::Duration;

/// Transient colour flashed behind the question after an answer is checked.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Feedback {
    #[default]
    Neutral,
    Positive,
    Negative,
}
impl Feedback {
    /// Background colour for the feedback state.
    pub fn color(self) -> &'static str {
        match self {
            Self::Neutral => "rgba(255,255,255,0)",
            Self::Positive => "#7ECC87",
            Self::Negative => "#FE7171",
        }
    }
}

/// Timing of the feedback flash: fade in, hold, fade out.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FeedbackTiming {
    pub fade: Duration,
    pub hold: Duration,
}
impl FeedbackTiming {
    pub fn new(fade: Duration, hold: Duration) -> Self {
        Self { fade, hold }
    }

    /// How long the flash runs before a correct answer auto-advances (or
    /// before the correct answer is revealed after a wrong one).
    pub fn total(&self) -> Duration {
        self.fade + self.hold + self.fade
    }
}
impl Default for FeedbackTiming {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_millis(1000))
    }
}
