use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Abstraction over a handle that can be queried for completion and aborted.
pub trait Abortable {
    /// Abort the underlying task if it is still running.
    fn abort(&mut self);
    /// Return `true` if the underlying task has completed.
    fn is_finished(&self) -> bool;
}

impl Abortable for JoinHandle<()> {
    fn abort(&mut self) {
        // JoinHandle::abort takes &self
        Self::abort(self);
    }

    fn is_finished(&self) -> bool {
        Self::is_finished(self)
    }
}

/// Abstraction over a stop signal.
pub trait Stoppable {
    /// Send a best-effort stop signal to request graceful shutdown.
    fn send(self);
}

impl Stoppable for watch::Sender<bool> {
    fn send(self) {
        let _ = Self::send(&self, true);
    }
}

/// Drop-time logic for stream handles:
/// - send a best-effort stop signal if present
/// - abort the task if it hasn't finished yet
pub fn drop_impl<H, S>(inner: &mut Option<H>, stop_tx: &mut Option<S>)
where
    H: Abortable,
    S: Stoppable,
{
    if let Some(tx) = stop_tx.take() {
        tx.send();
    }
    if let Some(mut h) = inner.take()
        && !h.is_finished()
    {
        h.abort();
    }
}

/// Owner handle for one background streaming session.
///
/// Dropping the handle requests cooperative shutdown and aborts the task if
/// it is still running; call [`StreamHandle::wait`] to let the session
/// finish gracefully instead.
#[derive(Debug)]
pub struct StreamHandle {
    inner: Option<JoinHandle<()>>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl StreamHandle {
    /// Wrap a spawned session task and its stop signal.
    #[must_use]
    pub const fn new(join: JoinHandle<()>, stop_tx: watch::Sender<bool>) -> Self {
        Self {
            inner: Some(join),
            stop_tx: Some(stop_tx),
        }
    }

    /// Request cooperative cancellation. The session observes the signal at
    /// its next suspension point; in-flight upstream calls are abandoned on
    /// a best-effort basis.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            tx.send();
        }
    }

    /// Whether the session task has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the session task to finish without aborting it.
    pub async fn wait(mut self) {
        if let Some(join) = self.inner.take() {
            let _ = join.await;
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        drop_impl(&mut self.inner, &mut self.stop_tx);
    }
}
