//! Background conversion worker.
//!
//! The pipeline runs on its own thread. Progress streams back over an
//! unbounded channel and the finished animation (or error) is handed over
//! exactly once through a oneshot channel, so the worker never touches any
//! playback state.

use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot};

use super::{CancelToken, ConversionError, ConversionPipeline, Progress};
use crate::frame::{AsciiAnimation, RawFrame};

type ConversionResult = Result<AsciiAnimation, ConversionError>;

/// Handle to a conversion running in the background.
pub struct ConversionHandle {
    cancel: CancelToken,
    progress: mpsc::UnboundedReceiver<Progress>,
    result: oneshot::Receiver<ConversionResult>,
    thread: Option<JoinHandle<()>>,
}

impl ConversionPipeline {
    /// Start converting `frames` on a dedicated worker thread.
    pub fn spawn(self, frames: Vec<RawFrame>) -> Result<ConversionHandle, ConversionError> {
        let cancel = CancelToken::new();
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = oneshot::channel();

        let worker_cancel = cancel.clone();
        let thread = thread::Builder::new()
            .name("glyphreel-convert".to_string())
            .spawn(move || {
                let result = self.convert(frames, &worker_cancel, |p| {
                    // Receiver may be gone if the caller only awaits the result
                    let _ = progress_tx.send(p);
                });
                if result_tx.send(result).is_err() {
                    log::debug!("Conversion finished but nobody is waiting for it");
                }
            })
            .map_err(ConversionError::Spawn)?;

        Ok(ConversionHandle {
            cancel,
            progress: progress_rx,
            result: result_rx,
            thread: Some(thread),
        })
    }
}

impl ConversionHandle {
    /// Ask the worker to stop before its next frame.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A token that cancels this conversion, for use from other tasks.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Progress stream; closes when the worker finishes.
    pub fn progress(&mut self) -> &mut mpsc::UnboundedReceiver<Progress> {
        &mut self.progress
    }

    /// Wait for the final result.
    pub async fn wait(mut self) -> ConversionResult {
        let result = (&mut self.result)
            .await
            .unwrap_or(Err(ConversionError::WorkerLost));
        self.join();
        result
    }

    /// Wait for the final result, calling `on_progress` for every report.
    pub async fn wait_with_progress<F>(mut self, mut on_progress: F) -> ConversionResult
    where
        F: FnMut(Progress),
    {
        let mut progress_open = true;
        let result = loop {
            tokio::select! {
                maybe = self.progress.recv(), if progress_open => {
                    match maybe {
                        Some(p) => on_progress(p),
                        None => progress_open = false,
                    }
                }
                result = &mut self.result => {
                    break result.unwrap_or(Err(ConversionError::WorkerLost));
                }
            }
        };

        // Reports sent just before the result
        while let Ok(p) = self.progress.try_recv() {
            on_progress(p);
        }
        self.join();
        result
    }

    /// Block the current thread until the result arrives.
    ///
    /// Must not be called from inside an async runtime.
    pub fn blocking_wait(self) -> ConversionResult {
        let ConversionHandle { result, thread, .. } = self;
        let result = result
            .blocking_recv()
            .unwrap_or(Err(ConversionError::WorkerLost));
        join_worker(thread);
        result
    }

    fn join(&mut self) {
        join_worker(self.thread.take());
    }
}

fn join_worker(thread: Option<JoinHandle<()>>) {
    if let Some(thread) = thread {
        // The result was already sent (or dropped), so the thread is at its end
        if thread.join().is_err() {
            log::error!("Conversion worker panicked");
        }
    }
}
