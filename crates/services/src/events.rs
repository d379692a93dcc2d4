/// Inputs consumed by the quiz controller, one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    /// Countdown tick from the timer sequence with the given generation.
    Tick { generation: u64 },
    /// The fullscreen signal changed.
    Fullscreen(bool),
    /// Option selected for the question currently displayed.
    Select(usize),
    /// Option selected for an explicit question.
    SelectFor { question: usize, option: usize },
    /// "Next" requested.
    Advance,
    /// Stop processing events.
    Shutdown,
}
