use services::{FullscreenSignal, ManualSignal, QuizEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;

/// A single line typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    /// Zero-based option index.
    Select(usize),
    Next,
    EnterFullscreen,
    LeaveFullscreen,
    Quit,
}

#[must_use]
pub fn parse_command(line: &str) -> Option<InputCommand> {
    let line = line.trim();
    match line {
        "n" | "next" => Some(InputCommand::Next),
        "f" | "fullscreen" => Some(InputCommand::EnterFullscreen),
        "x" | "exit" => Some(InputCommand::LeaveFullscreen),
        "q" | "quit" => Some(InputCommand::Quit),
        _ => line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(InputCommand::Select),
    }
}

/// Forward stdin lines to the controller until quit or end of input.
pub async fn read_input(mut signal: ManualSignal, events: UnboundedSender<QuizEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                log::error!("failed to read input: {err}");
                break;
            }
        };

        let event = match parse_command(&line) {
            Some(InputCommand::Select(option)) => QuizEvent::Select(option),
            Some(InputCommand::Next) => QuizEvent::Advance,
            Some(InputCommand::EnterFullscreen) => {
                if !signal.request() {
                    log::warn!("error attempting to enable fullscreen mode");
                    continue;
                }
                QuizEvent::Fullscreen(signal.current())
            }
            Some(InputCommand::LeaveFullscreen) => {
                signal.leave();
                QuizEvent::Fullscreen(signal.current())
            }
            Some(InputCommand::Quit) => break,
            None => {
                if !line.trim().is_empty() {
                    log::warn!("unrecognized input: {line:?}");
                }
                continue;
            }
        };

        if events.send(event).is_err() {
            return;
        }
    }
    let _ = events.send(QuizEvent::Shutdown);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_based_option_numbers() {
        assert_eq!(parse_command("1"), Some(InputCommand::Select(0)));
        assert_eq!(parse_command(" 3 "), Some(InputCommand::Select(2)));
        assert_eq!(parse_command("0"), None);
    }

    #[test]
    fn parses_words_and_letters() {
        assert_eq!(parse_command("n"), Some(InputCommand::Next));
        assert_eq!(parse_command("fullscreen"), Some(InputCommand::EnterFullscreen));
        assert_eq!(parse_command("x"), Some(InputCommand::LeaveFullscreen));
        assert_eq!(parse_command("quit"), Some(InputCommand::Quit));
        assert_eq!(parse_command("maybe"), None);
    }
}
