use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use crate::ApplicationError;

#[derive(Debug)]
pub enum TaskPoll<T> {
    Pending,
    Ready(T),
    /// Canceled, already taken, or the worker died without a result.
    Closed,
}

/// One-shot background job. Dropping the handle cancels it; a canceled job
/// never hands its result back.
pub struct Task<T> {
    receiver: mpsc::Receiver<T>,
    canceled: Arc<AtomicBool>,
    taken: bool,
}

impl<T: Send + 'static> Task<T> {
    pub fn spawn<F>(name: &str, work: F) -> Result<Self, ApplicationError>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let canceled = Arc::new(AtomicBool::new(false));
        let worker_canceled = Arc::clone(&canceled);

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let output = work();
                if worker_canceled.load(Ordering::SeqCst) {
                    tracing::debug!("dropping result of canceled task");
                    return;
                }
                let _ = sender.send(output);
            })
            .map_err(|error| ApplicationError::Io(format!("failed to spawn {name}: {error}")))?;

        Ok(Self {
            receiver,
            canceled,
            taken: false,
        })
    }
}

impl<T> Task<T> {
    pub fn poll(&mut self) -> TaskPoll<T> {
        if self.taken || self.is_canceled() {
            return TaskPoll::Closed;
        }
        match self.receiver.try_recv() {
            Ok(output) => {
                self.taken = true;
                TaskPoll::Ready(output)
            }
            Err(mpsc::TryRecvError::Empty) => TaskPoll::Pending,
            Err(mpsc::TryRecvError::Disconnected) => TaskPoll::Closed,
        }
    }

    /// Blocks until the worker finishes. `None` when canceled or the worker
    /// died.
    pub fn wait(mut self) -> Option<T> {
        if self.taken || self.is_canceled() {
            return None;
        }
        let output = self.receiver.recv().ok()?;
        if self.is_canceled() {
            return None;
        }
        self.taken = true;
        Some(output)
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        if !self.taken {
            self.cancel();
        }
    }
}
