// debounce.rs
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// Delays propagation of a rapidly-changing text value.
///
/// A value is forwarded to the output receiver only once the input has been
/// quiet for the whole window; every new input restarts the window and
/// discards the previous pending value. Dropping the `Debouncer` cancels
/// whatever is still pending, so the consumer never sees a late update.
pub struct Debouncer {
    input: Option<Sender<String>>,
    worker: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> (Self, Receiver<String>) {
        let (input_tx, input_rx) = mpsc::channel::<String>();
        let (output_tx, output_rx) = mpsc::channel::<String>();

        let worker = std::thread::spawn(move || run(input_rx, output_tx, window));

        (
            Self {
                input: Some(input_tx),
                worker: Some(worker),
            },
            output_rx,
        )
    }

    /// Feed the next raw value. Restarts the quiescence window.
    pub fn update(&self, value: impl Into<String>) {
        if let Some(input) = &self.input {
            // A send error just means the consumer side is gone already.
            let _ = input.send(value.into());
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        // Disconnect the input first so the worker wakes up and exits
        // without propagating a pending value.
        self.input.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run(input: Receiver<String>, output: Sender<String>, window: Duration) {
    loop {
        // Idle: block until something is typed.
        let mut pending = match input.recv() {
            Ok(value) => value,
            Err(_) => return,
        };

        // Armed: every newer value replaces the pending one and restarts
        // the window; silence for a full window propagates the last value.
        loop {
            match input.recv_timeout(window) {
                Ok(value) => pending = value,
                Err(RecvTimeoutError::Timeout) => {
                    if output.send(pending).is_err() {
                        return;
                    }
                    break;
                }
                // Torn down mid-window: the pending value dies with us.
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }
}
