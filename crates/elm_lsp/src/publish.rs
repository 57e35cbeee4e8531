use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tower_lsp::Client;
use tower_lsp::lsp_types::Url;

use crate::diagnostic::Diagnostic;

/// Republish requests for one file arriving within this window collapse into one emission.
pub const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(50);

/// Where merged diagnostics go. Every call fully replaces what the client shows for `uri`.
#[tower_lsp::async_trait]
pub trait DiagnosticsSink: Send + Sync + 'static {
    async fn publish(&self, uri: Url, diagnostics: Vec<Diagnostic>);
}

#[tower_lsp::async_trait]
impl DiagnosticsSink for Client {
    async fn publish(&self, uri: Url, diagnostics: Vec<Diagnostic>) {
        let diagnostics = diagnostics.iter().map(Diagnostic::to_lsp).collect();
        self.publish_diagnostics(uri, diagnostics, None).await;
    }
}

/// A timer that elapsed. Only the latest timer of a file is honoured.
#[derive(Debug)]
pub(crate) struct Flush {
    pub(crate) uri: Url,
    generation: u64,
}

struct Pending {
    generation: u64,
    timer: AbortHandle,
}

/// One timer per file. The first request opens the window; requests arriving while it is
/// open ride along, since the emission reads the file's state only when the window closes.
pub(crate) struct PublishScheduler {
    window: Duration,
    pending: FxHashMap<Url, Pending>,
    generation: u64,
    elapsed: mpsc::UnboundedSender<Flush>,
}

impl PublishScheduler {
    pub(crate) fn new(window: Duration, elapsed: mpsc::UnboundedSender<Flush>) -> Self {
        Self {
            window,
            pending: FxHashMap::default(),
            generation: 0,
            elapsed,
        }
    }

    /// Opens a window for `uri` unless one is already open. A pending timer is never
    /// restarted: a file edited without pause still publishes once per window, and the
    /// emission reads the store when the window closes, so later requests lose nothing.
    pub(crate) fn request(&mut self, uri: Url) {
        if self.pending.contains_key(&uri) {
            return;
        }
        self.generation += 1;
        let generation = self.generation;
        let window = self.window;
        let elapsed = self.elapsed.clone();
        let flush_uri = uri.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // The receiver is gone only once the aggregator has shut down.
            let _ = elapsed.send(Flush {
                uri: flush_uri,
                generation,
            });
        });
        self.pending.insert(
            uri,
            Pending {
                generation,
                timer: timer.abort_handle(),
            },
        );
    }

    /// Whether `flush` is still current; a current flush closes its file's window.
    pub(crate) fn take_due(&mut self, flush: &Flush) -> bool {
        match self.pending.get(&flush.uri) {
            Some(pending) if pending.generation == flush.generation => {
                self.pending.remove(&flush.uri);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cancel(&mut self, uri: &Url) {
        if let Some(pending) = self.pending.remove(uri) {
            pending.timer.abort();
        }
    }

    /// Stops every timer and returns the files that were still waiting, sorted.
    pub(crate) fn drain(&mut self) -> Vec<Url> {
        let mut uris: Vec<Url> = self
            .pending
            .drain()
            .map(|(uri, pending)| {
                pending.timer.abort();
                uri
            })
            .collect();
        uris.sort();
        uris
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
