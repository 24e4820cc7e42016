//! UI utilities for the client.

use std::{cell::RefCell, io::Write, thread::JoinHandle};

use rustyline::{
    Context, Editor, Helper, completion::Completer, error::ReadlineError, highlight::Highlighter,
    hint::Hinter, history::DefaultHistory, validate::Validator,
};
use tokio::sync::mpsc;

/// Events produced by the readline thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSignal {
    /// The edit buffer changed
    Keystroke,
    /// A line was submitted (may be blank)
    Line(String),
    /// Ctrl+C / Ctrl+D
    Exit,
}

/// Print a line above the prompt, then redisplay the prompt
pub fn print_line(line: &str, name: &str) {
    print!("\r{}\n", line);
    redisplay_prompt(name);
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(name: &str) {
    print!("{}> ", name);
    std::io::stdout().flush().ok();
}

/// Reports edits of the line buffer as keystrokes.
///
/// rustyline asks the hinter for a hint after every edit, which is the only
/// per-keystroke hook it exposes.
struct TypingHelper {
    signals: mpsc::UnboundedSender<InputSignal>,
    last_line: RefCell<String>,
}

impl Hinter for TypingHelper {
    type Hint = String;

    fn hint(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let mut last_line = self.last_line.borrow_mut();
        if *last_line != line {
            *last_line = line.to_string();
            if !line.is_empty() {
                let _ = self.signals.send(InputSignal::Keystroke);
            }
        }
        None
    }
}

impl Completer for TypingHelper {
    type Candidate = String;
}

impl Highlighter for TypingHelper {}

impl Validator for TypingHelper {}

impl Helper for TypingHelper {}

/// Spawn the blocking readline loop.
///
/// The thread outlives individual sessions so that reconnecting keeps the
/// same terminal state; it stops after `Exit` or when the receiver is dropped.
pub fn spawn_input_thread(
    name: String,
    signals: mpsc::UnboundedSender<InputSignal>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut rl: Editor<TypingHelper, DefaultHistory> = match Editor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                let _ = signals.send(InputSignal::Exit);
                return;
            }
        };
        rl.set_helper(Some(TypingHelper {
            signals: signals.clone(),
            last_line: RefCell::new(String::new()),
        }));

        let prompt = format!("{}> ", name);

        loop {
            let signal = match rl.readline(&prompt) {
                Ok(line) => {
                    if let Some(helper) = rl.helper() {
                        helper.last_line.borrow_mut().clear();
                    }
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                    }
                    InputSignal::Line(line)
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    InputSignal::Exit
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    InputSignal::Exit
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    InputSignal::Exit
                }
            };
            let exit = signal == InputSignal::Exit;
            if signals.send(signal).is_err() || exit {
                break;
            }
        }
    })
}
