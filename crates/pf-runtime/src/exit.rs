//! Cooperative exit signalling.
//!
//! The loop polls once per iteration; any out-of-band source may trip the
//! shared flag. The stdin watcher is the reference source: the operator
//! enters `c` to stop the loop.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tracing::info;

/// Non-blocking exit poll, checked once per iteration.
pub trait ExitSignal {
    fn poll_exit(&mut self) -> bool;
}

/// Atomic exit flag shared between the loop and its front-ends.
#[derive(Debug, Clone, Default)]
pub struct SharedExitFlag(Arc<AtomicBool>);

impl SharedExitFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop at the next iteration boundary.
    pub fn trip(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_tripped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl ExitSignal for SharedExitFlag {
    fn poll_exit(&mut self) -> bool {
        self.is_tripped()
    }
}

/// Watch stdin for the exit keystroke and trip the flag.
///
/// The thread parks in a blocking read and ends when stdin closes; it is
/// deliberately not joined on shutdown.
pub fn spawn_stdin_watcher(flag: SharedExitFlag) -> thread::JoinHandle<()> {
    info!("enter 'c' to stop the loop");
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(text) if text.trim() == "c" => {
                    flag.trip();
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    })
}
