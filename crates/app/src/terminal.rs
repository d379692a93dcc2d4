use std::io::{self, Write};

use quiz_core::model::Score;
use services::{Notice, Presenter, QuestionView};

/// Line-oriented presenter writing to stdout.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    quiz_visible: bool,
}

impl TerminalPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&self, text: &str) {
        let mut out = io::stdout().lock();
        // A closed stdout just means nobody is watching any more.
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

impl Presenter for TerminalPresenter {
    fn show_question(&mut self, view: &QuestionView) {
        self.emit(&render_question(view));
    }

    fn show_finished(&mut self, score: Score) {
        self.quiz_visible = false;
        self.emit(&format!(
            "\n== Quiz Results ==\nYou scored {score}.\n(press q to exit)"
        ));
    }

    fn show_fullscreen_prompt(&mut self, visible: bool) {
        if visible {
            self.quiz_visible = false;
            self.emit("\nThe quiz is paused. Press f to return to fullscreen and continue.");
        } else {
            self.quiz_visible = true;
        }
    }

    fn show_time_left(&mut self, text: &str) {
        if self.quiz_visible {
            self.emit(text);
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.emit(&format!("! {}", notice.message()));
    }
}

/// Text block for one question; options are numbered from 1.
#[must_use]
pub fn render_question(view: &QuestionView) -> String {
    let mut text = format!(
        "\nQuestion {}/{}: {}\n",
        view.index + 1,
        view.total,
        view.prompt
    );
    for (i, option) in view.options.iter().enumerate() {
        let mark = if view.selected == Some(i) { "x" } else { " " };
        text.push_str(&format!("  [{mark}] {}. {option}\n", i + 1));
    }
    text.push_str("Type an option number, then n for next.");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_selected_option() {
        let view = QuestionView {
            index: 1,
            total: 3,
            prompt: "Capital of France?".into(),
            options: vec!["Rome".into(), "Paris".into()],
            selected: Some(1),
        };
        let text = render_question(&view);
        assert!(text.contains("Question 2/3: Capital of France?"));
        assert!(text.contains("[ ] 1. Rome"));
        assert!(text.contains("[x] 2. Paris"));
    }
}
