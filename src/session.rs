use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::search::{Debouncer, FilterPass, SearchFilter};

/// What the search field reports to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// The field now contains this text.
    Changed(String),
    /// Escape: clear the field right away.
    Escape,
    /// Run whatever is pending without waiting out the quiet period.
    Submit,
}

impl InputEvent {
    /// Maps one stdin line to an event. ESC or `:clear` clear the field.
    pub fn from_line(line: &str) -> Self {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        match trimmed {
            "\u{1b}" | ":clear" => Self::Escape,
            ":go" => Self::Submit,
            other => Self::Changed(other.to_string()),
        }
    }
}

/// Sends one event per line of `reader` until it ends or the receiver goes
/// away. Bytes that are not UTF-8 are replaced rather than ending the input.
/// Returns the number of lines forwarded.
pub async fn forward_lines<R>(mut reader: R, tx: mpsc::Sender<InputEvent>) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut sent = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                if tx.send(InputEvent::from_line(&line)).await.is_err() {
                    break;
                }
                sent += 1;
            }
            Err(e) => {
                log::warn!("stopped reading input: {e}");
                break;
            }
        }
    }
    sent
}

/// Drives a [`SearchFilter`] from input events through a debounce gate.
/// At most one filter pass runs at a time; it runs on the session's task.
pub struct Session {
    filter: SearchFilter,
    debouncer: Debouncer<String>,
    passes: usize,
}

impl Session {
    pub fn new(filter: SearchFilter, debouncer: Debouncer<String>) -> Self {
        Self {
            filter,
            debouncer,
            passes: 0,
        }
    }

    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Runs until `events` closes. A value still pending at that point fires
    /// at its deadline before the session returns.
    pub async fn run<F>(&mut self, mut events: mpsc::Receiver<InputEvent>, mut sink: F)
    where
        F: FnMut(&FilterPass),
    {
        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                event = events.recv() => match event {
                    Some(InputEvent::Changed(value)) => {
                        self.debouncer.push(value, Instant::now());
                    }
                    Some(InputEvent::Escape) => {
                        self.debouncer.cancel();
                        self.passes += 1;
                        sink(self.filter.clear());
                    }
                    Some(InputEvent::Submit) => {
                        if let Some(value) = self.debouncer.flush() {
                            self.execute(&value, &mut sink);
                        }
                    }
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(value) = self.debouncer.poll(Instant::now()) {
                        self.execute(&value, &mut sink);
                    }
                }
            }
        }

        if let Some(deadline) = self.debouncer.deadline() {
            sleep_until(deadline).await;
            if let Some(value) = self.debouncer.flush() {
                self.execute(&value, &mut sink);
            }
        }
        log::debug!("session closed after {} passes", self.passes);
    }

    fn execute<F>(&mut self, value: &str, sink: &mut F)
    where
        F: FnMut(&FilterPass),
    {
        self.passes += 1;
        sink(self.filter.set_term(value));
    }
}
