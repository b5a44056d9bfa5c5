/*
 * Interfaces the strip consumes but does not implement: the request executor
 * that performs network calls off the UI thread, and the persistence store
 * that loads and saves projects and settings. Both report failures through
 * their own error enums so the host can render them as status text.
 *
 * Background results come back through `CompletionSender`. It can be cloned
 * into any thread; each send pushes onto a channel owned by the strip and
 * then calls the waker so the host schedules `TabStrip::drain_completions`
 * on the UI thread. Nothing on the sending side touches tab state.
 */

use crate::content::{ProjectTree, RequestSpec, ResponseRecord, Settings};
use crate::types::TabId;

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("certificate error: {0}")]
    Certificate(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed data in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Invoked exactly once with the outcome, on whatever thread the executor
/// finishes on.
pub type CompletionCallback = Box<dyn FnOnce(Result<ResponseRecord, ExecutorError>) + Send>;

pub trait RequestExecutor {
    fn send(&mut self, request: RequestSpec, timeout: Duration, on_complete: CompletionCallback);
}

pub trait PersistenceStore {
    fn load_project(&mut self, path: &Path) -> Result<ProjectTree, PersistenceError>;
    fn save_project(&mut self, path: &Path, project: &ProjectTree) -> Result<(), PersistenceError>;
    fn load_settings(&mut self, path: &Path) -> Result<Settings, PersistenceError>;
    fn save_settings(&mut self, path: &Path, settings: &Settings) -> Result<(), PersistenceError>;
}

/// Schedules the owning thread; typically posts a window message.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// A finished background request, addressed to the tab that issued it.
#[derive(Debug)]
pub struct Completion {
    pub tab: TabId,
    pub outcome: Result<ResponseRecord, ExecutorError>,
}

#[derive(Clone)]
pub struct CompletionSender {
    tx: Sender<Completion>,
    waker: Waker,
}

impl fmt::Debug for CompletionSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSender").finish_non_exhaustive()
    }
}

impl CompletionSender {
    pub fn send(&self, completion: Completion) {
        let tab = completion.tab;
        if self.tx.send(completion).is_err() {
            log::trace!("[Completions] strip is gone, dropping result for {tab:?}");
            return;
        }
        (self.waker)();
    }

    /// Wraps this sender into an executor callback bound to `tab`.
    pub fn callback_for(&self, tab: TabId) -> CompletionCallback {
        let sender = self.clone();
        Box::new(move |outcome| sender.send(Completion { tab, outcome }))
    }
}

pub(crate) fn completion_channel(waker: Waker) -> (CompletionSender, Receiver<Completion>) {
    let (tx, rx) = unbounded();
    (CompletionSender { tx, waker }, rx)
}
