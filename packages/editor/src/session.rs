//! # Tracking Session
//!
//! Runs one [`Tracker`] inside a single tokio task and talks to it over a
//! channel. The task owns all tracker state, so no locks are needed.
//!
//! - every edit re-arms a debounce deadline; when it expires the dirty
//!   fields are recomputed
//! - a commit runs the transport round-trip as a spawned task while the
//!   session keeps accepting edits; recompute stays paused until the
//!   round-trip resolves, then edited fields are recomputed at once
//! - a second commit while one is in flight is rejected
//!
//! The session stops once every [`TrackerHandle`] has been dropped.

use crate::change::{ChangeRequest, Field, Snapshot};
use crate::config::CommitMode;
use crate::errors::{EditorError, TransportError};
use crate::tracker::{CommitReceipt, Tracker, TrackerStatus};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Storage layer that applies a patch request and returns the result
pub trait PatchTransport: Send + Sync + 'static {
    fn apply_patch(
        &self,
        document_id: &str,
        request: ChangeRequest,
    ) -> impl Future<Output = Result<Snapshot, TransportError>> + Send;
}

type Reply<T> = oneshot::Sender<Result<T, EditorError>>;

enum Command {
    Edit { field: Field, value: String },
    Toggle { id: String, reply: Reply<bool> },
    SelectAll { selected: bool },
    Flush { reply: oneshot::Sender<TrackerStatus> },
    Commit { mode: CommitMode, reply: Reply<CommitReceipt> },
    Discard { reply: Reply<Snapshot> },
    Status { reply: oneshot::Sender<TrackerStatus> },
}

/// Cloneable handle to a running session
#[derive(Clone)]
pub struct TrackerHandle {
    commands: mpsc::Sender<Command>,
}

impl TrackerHandle {
    async fn send(&self, command: Command) -> Result<(), EditorError> {
        self.commands.send(command).await.map_err(|_| EditorError::SessionClosed)
    }

    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T, EditorError> {
        let (reply, response) = oneshot::channel();
        self.send(command(reply)).await?;
        response.await.map_err(|_| EditorError::SessionClosed)?
    }

    /// Record a new field value; recompute happens after the debounce
    pub async fn edit(&self, field: Field, value: impl Into<String>) -> Result<(), EditorError> {
        self.send(Command::Edit {
            field,
            value: value.into(),
        })
        .await
    }

    pub async fn toggle(&self, id: impl Into<String>) -> Result<bool, EditorError> {
        let id = id.into();
        self.request(|reply| Command::Toggle { id, reply }).await
    }

    pub async fn select_all(&self, selected: bool) -> Result<(), EditorError> {
        self.send(Command::SelectAll { selected }).await
    }

    /// Recompute dirty fields now instead of waiting for the debounce
    pub async fn flush(&self) -> Result<TrackerStatus, EditorError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Flush { reply }).await?;
        response.await.map_err(|_| EditorError::SessionClosed)
    }

    /// Commit pending changes; resolves once the transport has answered
    pub async fn commit(&self, mode: CommitMode) -> Result<CommitReceipt, EditorError> {
        self.request(|reply| Command::Commit { mode, reply }).await
    }

    pub async fn discard(&self) -> Result<Snapshot, EditorError> {
        self.request(|reply| Command::Discard { reply }).await
    }

    pub async fn status(&self) -> Result<TrackerStatus, EditorError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Status { reply }).await?;
        response.await.map_err(|_| EditorError::SessionClosed)
    }
}

struct InFlight {
    task: JoinHandle<Result<Snapshot, TransportError>>,
    reply: Reply<CommitReceipt>,
}

pub struct TrackerSession<T: PatchTransport> {
    tracker: Tracker,
    transport: Arc<T>,
    commands: mpsc::Receiver<Command>,
    deadline: Option<Instant>,
    in_flight: Option<InFlight>,
}

impl<T: PatchTransport> TrackerSession<T> {
    /// Start a session on the current tokio runtime
    pub fn spawn(tracker: Tracker, transport: Arc<T>) -> TrackerHandle {
        let (tx, rx) = mpsc::channel(64);
        let session = Self {
            tracker,
            transport,
            commands: rx,
            deadline: None,
            in_flight: None,
        };

        tokio::spawn(session.run());
        TrackerHandle { commands: tx }
    }

    async fn run(mut self) {
        loop {
            let deadline = self.deadline;

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.deadline = None;
                    self.tracker.recompute_dirty();
                }
                result = wait_for_commit(&mut self.in_flight), if self.in_flight.is_some() => {
                    self.resolve_commit(result);
                }
            }
        }

        tracing::debug!(document = %self.tracker.document_id(), "tracking session closed");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Edit { field, value } => {
                self.tracker.edit(field, value);
                self.deadline = Some(Instant::now() + self.tracker.config().edit_debounce());
            }
            Command::Toggle { id, reply } => {
                let _ = reply.send(self.tracker.toggle(&id));
            }
            Command::SelectAll { selected } => self.tracker.select_all(selected),
            Command::Flush { reply } => {
                self.deadline = None;
                self.tracker.recompute_dirty();
                let _ = reply.send(self.tracker.status());
            }
            Command::Commit { mode, reply } => self.start_commit(mode, reply),
            Command::Discard { reply } => {
                let result = self.tracker.discard();
                if result.is_ok() {
                    self.deadline = None;
                }
                let _ = reply.send(result);
            }
            Command::Status { reply } => {
                let _ = reply.send(self.tracker.status());
            }
        }
    }

    fn start_commit(&mut self, mode: CommitMode, reply: Reply<CommitReceipt>) {
        if self.in_flight.is_some() {
            let _ = reply.send(Err(EditorError::CommitInFlight));
            return;
        }

        // Commit what the user sees, not what the last debounce saw
        self.deadline = None;
        self.tracker.recompute_dirty();

        let plan = match self.tracker.begin_commit(mode) {
            Ok(plan) => plan,
            Err(error) => {
                let _ = reply.send(Err(error));
                return;
            }
        };

        let transport = Arc::clone(&self.transport);
        let document_id = self.tracker.document_id().to_string();
        let task = tokio::spawn(async move { transport.apply_patch(&document_id, plan.request).await });

        self.in_flight = Some(InFlight { task, reply });
    }

    fn resolve_commit(&mut self, result: Result<Snapshot, TransportError>) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };

        let outcome = self.tracker.finish_commit(result);
        self.tracker.recompute_dirty();
        let _ = in_flight.reply.send(outcome);
    }
}

async fn wait_for_commit(in_flight: &mut Option<InFlight>) -> Result<Snapshot, TransportError> {
    match in_flight {
        Some(in_flight) => match (&mut in_flight.task).await {
            Ok(result) => result,
            Err(error) => Err(TransportError::Aborted(error.to_string())),
        },
        None => std::future::pending().await,
    }
}
