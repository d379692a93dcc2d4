#![forbid(unsafe_code)]

pub mod error;
pub mod events;
pub mod gate;
pub mod render;
pub mod sessions;
pub mod source;
pub mod timer;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{LoadError, QuizError};
pub use events::QuizEvent;
pub use gate::{FullscreenGate, FullscreenSignal, GateChange, ManualSignal};
pub use render::{Notice, Presenter, QuestionView, RecordingPresenter, RenderEvent};
pub use sessions::{Advance, QuizController, QuizSession, Tick};
pub use source::{HttpSource, JsonFileSource, QuestionSource, StaticSource};
pub use timer::{TimerDriver, TimerHandle};
