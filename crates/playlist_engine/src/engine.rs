use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_error, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::catalog::CatalogClient;
use crate::fetch::{CatalogSettings, YouTubeCatalogClient};
use crate::ingest::IngestPipeline;
use crate::{EngineEvent, IngestError, IngestRequest, RequestId};

enum EngineCommand {
    Ingest {
        request_id: RequestId,
        request: IngestRequest,
    },
}

/// Runs ingestions on a background tokio runtime and reports results over a
/// channel, so the owner of the store never blocks on the network.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: CatalogSettings) -> Result<Self, IngestError> {
        let max_pages = settings.max_pages;
        let client = YouTubeCatalogClient::new(settings)?;
        Ok(Self::with_client(Arc::new(client), max_pages))
    }

    pub fn with_client(client: Arc<dyn CatalogClient>, max_pages: usize) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let pipeline = IngestPipeline::new(client, max_pages);
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start ingestion runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let pipeline = pipeline.clone();
                let event_tx = event_tx.clone();
                let cancel = worker_cancel.child_token();
                runtime.spawn(async move {
                    handle_command(&pipeline, command, &cancel, event_tx).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx,
            cancel,
        }
    }

    pub fn enqueue(&self, request_id: RequestId, request: IngestRequest) {
        if self
            .cmd_tx
            .send(EngineCommand::Ingest {
                request_id,
                request,
            })
            .is_err()
        {
            engine_warn!("Ingestion worker is gone; request {} dropped", request_id);
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the worker has stopped.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    /// Aborts every in-flight and future ingestion on this handle.
    pub fn cancel_all(&self) {
        self.cancel.cancel();
    }
}

async fn handle_command(
    pipeline: &IngestPipeline,
    command: EngineCommand,
    cancel: &CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Ingest {
            request_id,
            request,
        } => {
            let result = pipeline
                .ingest(&request.playlist_id, &request.credential, cancel)
                .await;
            if let Err(err) = &result {
                engine_warn!("Ingestion {} failed: {}", request_id, err);
            }
            let _ = event_tx.send(EngineEvent::IngestCompleted { request_id, result });
        }
    }
}
