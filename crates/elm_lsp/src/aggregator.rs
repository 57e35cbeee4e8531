//! Owner of every file's diagnostics.
//!
//! Producers never touch the store directly: they send commands through a
//! [`DiagnosticsHandle`] to a single actor task that applies them in send order and
//! schedules the resulting publishes.

use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tower_lsp::lsp_types::Url;

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::file_diagnostics::FileDiagnostics;
use crate::publish::{DiagnosticsSink, Flush, PublishScheduler};

/// Synchronous core of the aggregator: `Url -> FileDiagnostics`.
#[derive(Debug, Default)]
pub struct DiagnosticsStore {
    files: FxHashMap<Url, FileDiagnostics>,
}

impl DiagnosticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces one slot of `uri` and reports whether the merged list changed.
    ///
    /// Records are created lazily: an empty list for an unknown file is a no-op. A record
    /// left with no diagnostics at all is dropped.
    pub fn update(
        &mut self,
        uri: &Url,
        kind: DiagnosticKind,
        diagnostics: Vec<Diagnostic>,
    ) -> bool {
        let Some(file) = self.files.get_mut(uri) else {
            if diagnostics.is_empty() {
                return false;
            }
            let mut file = FileDiagnostics::default();
            file.update(kind, diagnostics);
            self.files.insert(uri.clone(), file);
            return true;
        };
        let changed = file.update(kind, diagnostics);
        if file.is_empty() {
            self.files.remove(uri);
        }
        changed
    }

    /// Forgets `uri`; returns whether a record existed.
    pub fn delete(&mut self, uri: &Url) -> bool {
        self.files.remove(uri).is_some()
    }

    pub fn get(&self, uri: &Url) -> Vec<Diagnostic> {
        self.files.get(uri).map(FileDiagnostics::get).unwrap_or_default()
    }

    /// Adds an empty entry to `results` for every file that still holds `kind` diagnostics
    /// but is missing from a fresh whole-project run, so applying `results` clears it.
    pub fn reset_missing(
        &self,
        results: &mut FxHashMap<Url, Vec<Diagnostic>>,
        kind: DiagnosticKind,
    ) {
        for (uri, file) in &self.files {
            if !file.for_kind(kind).is_empty() && !results.contains_key(uri) {
                results.insert(uri.clone(), Vec::new());
            }
        }
    }

    /// Empties the `kind` slot of every file; returns the files whose output changed, sorted.
    pub fn clear_kind(&mut self, kind: DiagnosticKind) -> Vec<Url> {
        let mut affected: Vec<Url> = self
            .files
            .iter()
            .filter(|(_, file)| !file.for_kind(kind).is_empty())
            .map(|(uri, _)| uri.clone())
            .collect();
        affected.sort();
        affected.retain(|uri| self.update(uri, kind, Vec::new()));
        affected
    }

    pub fn uris(&self) -> Vec<Url> {
        let mut uris: Vec<Url> = self.files.keys().cloned().collect();
        uris.sort();
        uris
    }
}

#[derive(Debug)]
enum Command {
    Update {
        uri: Url,
        kind: DiagnosticKind,
        diagnostics: Vec<Diagnostic>,
    },
    /// A whole-project result set; files it no longer mentions are cleared.
    Replace {
        kind: DiagnosticKind,
        results: FxHashMap<Url, Vec<Diagnostic>>,
    },
    ClearKind(DiagnosticKind),
    Delete(Url),
    Get {
        uri: Url,
        reply: oneshot::Sender<Vec<Diagnostic>>,
    },
}

/// Cloneable entry point of the aggregator actor.
#[derive(Debug, Clone)]
pub struct DiagnosticsHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl DiagnosticsHandle {
    pub fn update(&self, uri: Url, kind: DiagnosticKind, diagnostics: Vec<Diagnostic>) {
        self.send(Command::Update {
            uri,
            kind,
            diagnostics,
        });
    }

    pub fn replace_all(&self, kind: DiagnosticKind, results: FxHashMap<Url, Vec<Diagnostic>>) {
        self.send(Command::Replace { kind, results });
    }

    pub fn clear_kind(&self, kind: DiagnosticKind) {
        self.send(Command::ClearKind(kind));
    }

    pub fn delete(&self, uri: Url) {
        self.send(Command::Delete(uri));
    }

    /// Current merged diagnostics of `uri`, after every command sent before this call.
    pub async fn get(&self, uri: Url) -> Vec<Diagnostic> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Get { uri, reply });
        response.await.unwrap_or_default()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!("diagnostics aggregator has stopped; dropping command");
        }
    }
}

pub struct DiagnosticsAggregator<S> {
    store: DiagnosticsStore,
    scheduler: PublishScheduler,
    sink: Arc<S>,
}

impl<S: DiagnosticsSink> DiagnosticsAggregator<S> {
    /// Starts the actor. It runs until every handle is dropped, then publishes whatever is
    /// still waiting for its window and stops.
    pub fn spawn(sink: Arc<S>, window: Duration) -> (DiagnosticsHandle, JoinHandle<()>) {
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (flush_tx, flushes) = mpsc::unbounded_channel();
        let aggregator = DiagnosticsAggregator {
            store: DiagnosticsStore::new(),
            scheduler: PublishScheduler::new(window, flush_tx),
            sink,
        };
        let task = tokio::spawn(aggregator.run(commands, flushes));
        (
            DiagnosticsHandle {
                commands: commands_tx,
            },
            task,
        )
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut flushes: mpsc::UnboundedReceiver<Flush>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
                Some(flush) = flushes.recv() => {
                    if self.scheduler.take_due(&flush) {
                        self.publish(flush.uri).await;
                    }
                }
            }
        }

        if !self.scheduler.is_idle() {
            tracing::debug!("flushing pending diagnostics before shutdown");
        }
        for uri in self.scheduler.drain() {
            self.publish(uri).await;
        }
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Update {
                uri,
                kind,
                diagnostics,
            } => {
                if self.store.update(&uri, kind, diagnostics) {
                    self.scheduler.request(uri);
                }
            }
            Command::Replace { kind, mut results } => {
                self.store.reset_missing(&mut results, kind);
                let mut uris: Vec<Url> = results.keys().cloned().collect();
                uris.sort();
                for uri in uris {
                    let diagnostics = results.remove(&uri).unwrap_or_default();
                    if self.store.update(&uri, kind, diagnostics) {
                        self.scheduler.request(uri);
                    }
                }
            }
            Command::ClearKind(kind) => {
                for uri in self.store.clear_kind(kind) {
                    self.scheduler.request(uri);
                }
            }
            Command::Delete(uri) => {
                self.store.delete(&uri);
                self.scheduler.cancel(&uri);
                // Always sent, so the client drops anything it still shows for the file.
                self.sink.publish(uri, Vec::new()).await;
            }
            Command::Get { uri, reply } => {
                let _ = reply.send(self.store.get(&uri));
            }
        }
    }

    async fn publish(&self, uri: Url) {
        let diagnostics = self.store.get(&uri);
        tracing::debug!(uri = %uri, count = diagnostics.len(), "publishing diagnostics");
        self.sink.publish(uri, diagnostics).await;
    }
}
