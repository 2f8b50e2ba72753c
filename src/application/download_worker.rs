use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::application::progress::ProgressNormalizer;
use crate::domain::DownloadRequest;
use crate::fetch::{FetchJob, MediaFetcher};

/// Event stream contract: zero or more `Progress` values in non-decreasing
/// order, then exactly one `Finished`, which is always the last event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    Progress(u8),
    Finished(DownloadOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed,
    Canceled,
    AlreadyExists,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Running,
    Completed,
    Canceled,
    AlreadyExists,
    Failed,
}

/// Cancellation is advisory: the fetch call is not preemptible, so a cancel
/// requested mid-transfer lets the transfer finish and only changes the
/// reported outcome. The flag is write-once intent shared with the UI thread.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One download session. Owned by the background task once spawned; the UI
/// keeps only a `CancelHandle` and the event stream.
pub struct DownloadTask {
    request: DownloadRequest,
    cancel: CancelHandle,
    state: TaskState,
}

impl DownloadTask {
    pub fn new(request: DownloadRequest) -> Self {
        Self {
            request,
            cancel: CancelHandle::default(),
            state: TaskState::Idle,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Runs the task on the tokio executor and returns its ordered event
    /// stream. The stream ends right after the terminal event.
    pub fn spawn(
        self,
        fetcher: Arc<dyn MediaFetcher>,
        downloads_dir: PathBuf,
    ) -> BoxStream<'static, DownloadEvent> {
        // Spawning is deferred to the first poll so the task lands on the
        // runtime that drives the stream.
        Box::pin(
            futures::stream::once(async move {
                let (tx, rx) = mpsc::unbounded_channel();
                tokio::spawn(self.run(fetcher, downloads_dir, tx));
                futures::stream::unfold(rx, |mut rx| async move {
                    rx.recv().await.map(|event| (event, rx))
                })
            })
            .flatten(),
        )
    }

    async fn run(
        mut self,
        fetcher: Arc<dyn MediaFetcher>,
        downloads_dir: PathBuf,
        events: mpsc::UnboundedSender<DownloadEvent>,
    ) {
        self.state = TaskState::Running;
        tracing::info!(url = %self.request.url, "download task started");

        let outcome = self.drive(fetcher, downloads_dir, &events).await;
        self.state = match outcome {
            DownloadOutcome::Completed => TaskState::Completed,
            DownloadOutcome::Canceled => TaskState::Canceled,
            DownloadOutcome::AlreadyExists => TaskState::AlreadyExists,
            DownloadOutcome::Failed(_) => TaskState::Failed,
        };
        tracing::info!(state = ?self.state, "download task finished");

        let _ = events.send(DownloadEvent::Finished(outcome));
        // Sender drops here, ending the stream after the terminal event.
    }

    async fn drive(
        &self,
        fetcher: Arc<dyn MediaFetcher>,
        downloads_dir: PathBuf,
        events: &mpsc::UnboundedSender<DownloadEvent>,
    ) -> DownloadOutcome {
        if let Err(e) = tokio::fs::create_dir_all(&downloads_dir).await {
            return DownloadOutcome::Failed(e.to_string());
        }

        let output_path = downloads_dir.join(self.request.output_filename());

        // Pre-flight probe against the templated path. A name carrying
        // placeholders resolved only at fetch time will not match an existing
        // file; see DESIGN.md.
        if matches!(tokio::fs::try_exists(&output_path).await, Ok(true)) {
            return DownloadOutcome::AlreadyExists;
        }

        // A cancel that lands before the fetch begins stops it from starting
        // at all.
        if self.cancel.is_canceled() {
            return DownloadOutcome::Canceled;
        }

        let job = FetchJob::for_request(&self.request, output_path);
        let (raw_tx, mut raw_rx) = mpsc::channel(32);

        let fetch = fetcher.fetch(job, raw_tx);
        tokio::pin!(fetch);

        let mut normalizer = ProgressNormalizer::new();
        let result = loop {
            tokio::select! {
                Some(raw) = raw_rx.recv() => {
                    if let Some(pct) = normalizer.normalize(&raw) {
                        let _ = events.send(DownloadEvent::Progress(pct));
                    }
                }
                result = &mut fetch => break result,
            }
        };

        // The fetcher dropped its sender on return; flush whatever is still
        // queued so Progress(100) lands before the terminal event.
        while let Some(raw) = raw_rx.recv().await {
            if let Some(pct) = normalizer.normalize(&raw) {
                let _ = events.send(DownloadEvent::Progress(pct));
            }
        }

        // An error from the collaborator wins over a pending cancel; the
        // cancel flag is only consulted once the call returned cleanly.
        match result {
            Err(e) => DownloadOutcome::Failed(e.to_string()),
            Ok(()) if self.cancel.is_canceled() => DownloadOutcome::Canceled,
            Ok(()) => DownloadOutcome::Completed,
        }
    }
}
