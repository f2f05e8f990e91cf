//! Deferred work queue
//!
//! Navigation requested while a render pass is reading navigation state must
//! not mutate that state in place. Such requests are queued here and run on
//! the next turn of the host's event loop, when the host calls
//! [`Dispatcher::run_pending`].

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Single-threaded queue of deferred jobs
///
/// Cloning yields another handle to the same queue.
///
/// # Example
///
/// ```rust
/// use morph_state::Dispatcher;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let dispatcher = Dispatcher::new();
/// let runs = Arc::new(AtomicUsize::new(0));
///
/// let counter = runs.clone();
/// dispatcher.defer(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
/// assert_eq!(runs.load(Ordering::SeqCst), 0);
///
/// assert_eq!(dispatcher.run_pending(), 1);
/// assert_eq!(runs.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Job>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Job>>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create an empty queue
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Queue `job` for the next turn
    pub fn defer(&self, job: impl FnOnce() + Send + 'static) {
        // The receiver lives as long as any handle, so the send cannot fail.
        let _ = self.tx.send(Box::new(job));
    }

    /// Number of queued jobs
    pub fn pending(&self) -> usize {
        self.rx.lock().len()
    }

    /// Run one turn: every job queued before this call, in order
    ///
    /// Jobs deferred by the jobs themselves wait for the following turn.
    /// Returns the number of jobs run.
    pub fn run_pending(&self) -> usize {
        let jobs: Vec<Job> = {
            let mut rx = self.rx.lock();
            let count = rx.len();
            (0..count).filter_map(|_| rx.try_recv().ok()).collect()
        };

        let ran = jobs.len();
        for job in jobs {
            job();
        }
        if ran > 0 {
            tracing::trace!(jobs = ran, "Ran deferred navigation jobs");
        }
        ran
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pending", &self.pending())
            .finish()
    }
}
