mod answers;
mod bank;
mod question;
mod score;
mod session;
mod settings;

pub use answers::AnswerRecord;
pub use bank::{BankError, QuestionBank};
pub use question::{Question, QuestionError, QuestionRecord};
pub use score::{FinishReason, QuizOutcome, Score};
pub use session::{SessionPhase, SessionState};
pub use settings::{QuizSettings, SettingsError};
