//! Typing debounce.
//!
//! The first keystroke of a burst emits `Typing`; every keystroke re-arms an
//! idle timer, and `StopTyping` is emitted when the timer fires or the line is
//! submitted. Only transitions are emitted.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::{sync::mpsc, task::JoinHandle};

/// Idle period after the last keystroke before `StopTyping` is emitted
pub const TYPING_IDLE: Duration = Duration::from_millis(900);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingSignal {
    Typing,
    StopTyping,
}

pub struct TypingDebouncer {
    signals: mpsc::UnboundedSender<TypingSignal>,
    typing: Arc<AtomicBool>,
    idle_timer: Option<JoinHandle<()>>,
    idle: Duration,
}

impl TypingDebouncer {
    pub fn new(signals: mpsc::UnboundedSender<TypingSignal>, idle: Duration) -> Self {
        Self {
            signals,
            typing: Arc::new(AtomicBool::new(false)),
            idle_timer: None,
            idle,
        }
    }

    /// A keystroke was observed
    pub fn on_input(&mut self) {
        if !self.typing.swap(true, Ordering::SeqCst) {
            self.emit(TypingSignal::Typing);
        }
        self.rearm();
    }

    /// The current line was submitted
    pub fn on_submit(&mut self) {
        self.abort_timer();
        if self.typing.swap(false, Ordering::SeqCst) {
            self.emit(TypingSignal::StopTyping);
        }
    }

    /// Forget the current burst without emitting anything (the session is over)
    pub fn cancel(&mut self) {
        self.abort_timer();
        self.typing.store(false, Ordering::SeqCst);
    }

    fn rearm(&mut self) {
        self.abort_timer();
        let typing = Arc::clone(&self.typing);
        let signals = self.signals.clone();
        let idle = self.idle;
        self.idle_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(idle).await;
            if typing.swap(false, Ordering::SeqCst) {
                let _ = signals.send(TypingSignal::StopTyping);
            }
        }));
    }

    fn abort_timer(&mut self) {
        if let Some(timer) = self.idle_timer.take() {
            timer.abort();
        }
    }

    fn emit(&self, signal: TypingSignal) {
        if self.signals.send(signal).is_err() {
            tracing::debug!("Typing signal receiver is gone");
        }
    }
}

impl Drop for TypingDebouncer {
    fn drop(&mut self) {
        self.abort_timer();
    }
}
