//! Terminal front end
//!
//! A reader thread publishes stdin lines on a bounded channel; a display
//! thread drains the output channel to stdout. The worker awaits input on the
//! channel instead of polling.

use super::{Console, InputSource, OutputSink};
use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Lines that can be typed ahead of the worker
const INPUT_BUFFER: usize = 16;

struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl OutputSink for ChannelSink {
    fn append(&self, text: &str) {
        // The display thread only stops after every sender is gone
        let _ = self.tx.send(text.to_string());
    }
}

struct ChannelInput {
    rx: mpsc::Receiver<String>,
}

#[async_trait]
impl InputSource for ChannelInput {
    async fn next_line(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

/// Starts the terminal reader/display threads
pub struct TerminalFrontend;

impl TerminalFrontend {
    /// Spawn the front-end threads and return the console wired to them
    pub fn spawn() -> io::Result<(Console, TerminalHandle)> {
        let (out_tx, out_rx) = mpsc::unbounded_channel::<String>();
        let (in_tx, in_rx) = mpsc::channel::<String>(INPUT_BUFFER);

        let display = thread::Builder::new()
            .name("display".into())
            .spawn(move || display_loop(out_rx))?;

        // Blocked on stdin until the process exits, so it is never joined
        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || read_loop(in_tx))?;

        let console = Console::new(
            std::sync::Arc::new(ChannelSink { tx: out_tx }),
            Box::new(ChannelInput { rx: in_rx }),
        );

        Ok((console, TerminalHandle { display: Some(display) }))
    }
}

/// Owns the display thread
pub struct TerminalHandle {
    display: Option<JoinHandle<()>>,
}

impl TerminalHandle {
    /// Drop the console and wait until all pending output has been shown
    pub fn finish(mut self, console: Console) {
        drop(console);
        if let Some(display) = self.display.take() {
            if display.join().is_err() {
                warn!("display thread panicked");
            }
        }
    }
}

fn display_loop(mut rx: mpsc::UnboundedReceiver<String>) {
    let stdout = io::stdout();
    while let Some(text) = rx.blocking_recv() {
        let mut out = stdout.lock();
        if out.write_all(text.as_bytes()).and_then(|_| out.flush()).is_err() {
            break;
        }
    }
    debug!("display channel closed");
}

fn read_loop(tx: mpsc::Sender<String>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to read from stdin");
                break;
            }
        }
    }
    debug!("stdin closed");
}
