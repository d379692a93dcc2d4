mod controller;
mod machine;

// Public API of the session subsystem.
pub use crate::error::QuizError;
pub use controller::QuizController;
pub use machine::{Advance, QuizSession, Tick};
