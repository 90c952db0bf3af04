use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use pdfdeck_core::{Command, Document, RemoteGateway};

use crate::tui_event::BackendEvent;

/// Side effects requested by the app, executed off the UI loop.
#[derive(Debug)]
pub enum Effect {
    /// Read a file from disk before it can be selected. `seq` is echoed back
    /// on the resulting event.
    LoadDocument { seq: u64, path: PathBuf },
    /// Run a workflow command against the service.
    Dispatch(Command),
}

/// Runs effects on tokio tasks and reports back through the event channel.
pub struct Backend {
    gateway: Arc<dyn RemoteGateway>,
    tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
}

impl Backend {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        tx: mpsc::UnboundedSender<BackendEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            gateway,
            tx,
            cancel,
        }
    }

    pub fn run(&self, effect: Effect) {
        match effect {
            Effect::LoadDocument { seq, path } => self.load_document(seq, path),
            Effect::Dispatch(command) => self.dispatch(command),
        }
    }

    fn load_document(&self, seq: u64, path: PathBuf) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // Reading a large PDF is blocking file IO
            let read_path = path.clone();
            let loaded = tokio::task::spawn_blocking(move || Document::from_path(&read_path))
                .await
                .unwrap_or_else(|e| Err(std::io::Error::other(format!("task join error: {e}"))));

            let event = match loaded {
                Ok(document) => BackendEvent::DocumentLoaded { seq, document },
                Err(e) => BackendEvent::DocumentUnreadable {
                    seq,
                    path,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(event);
        });
    }

    /// Fire the command once. Superseded commands still run to completion;
    /// the workflow discards their results by epoch.
    fn dispatch(&self, command: Command) {
        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        let cancel = self.cancel.clone();
        log::debug!(
            "dispatching {} (epoch {})",
            command.operation(),
            command.epoch()
        );
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                completion = command.run(gateway.as_ref()) => {
                    let _ = tx.send(BackendEvent::Completed(completion));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    use async_trait::async_trait;
    use pdfdeck_core::{
        Completion, Extraction, GatewayError, GenerationRequest, Slide, Topic, Workflow,
    };

    struct OneTopic;

    #[async_trait]
    impl RemoteGateway for OneTopic {
        async fn extract_topics(&self, _document: &Document) -> Result<Extraction, GatewayError> {
            Ok(Extraction {
                topics: vec![Topic {
                    id: "t1".into(),
                    title: "Intro".into(),
                    description: "Opening".into(),
                }],
                ..Extraction::default()
            })
        }

        async fn generate_slides(
            &self,
            _request: &GenerationRequest,
        ) -> Result<Vec<Slide>, GatewayError> {
            Ok(Vec::new())
        }
    }

    fn backend() -> (Backend, mpsc::UnboundedReceiver<BackendEvent>, CancellationToken) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        (Backend::new(Arc::new(OneTopic), tx, cancel.clone()), rx, cancel)
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<BackendEvent>) -> BackendEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("backend event timed out")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn loads_document_from_disk() {
        let (backend, mut rx, _cancel) = backend();
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.7").unwrap();

        backend.run(Effect::LoadDocument {
            seq: 7,
            path: file.path().to_path_buf(),
        });
        match next_event(&mut rx).await {
            BackendEvent::DocumentLoaded { seq, document } => {
                assert_eq!(seq, 7);
                assert_eq!(document.bytes, b"%PDF-1.7");
                assert!(document.file_name.ends_with(".pdf"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let (backend, mut rx, _cancel) = backend();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.pdf");

        backend.run(Effect::LoadDocument {
            seq: 3,
            path: path.clone(),
        });
        match next_event(&mut rx).await {
            BackendEvent::DocumentUnreadable {
                seq, path: reported, ..
            } => {
                assert_eq!(seq, 3);
                assert_eq!(reported, path);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatch_reports_completion() {
        let (backend, mut rx, _cancel) = backend();
        let mut workflow = Workflow::new();
        let command = workflow.select_file(Document::new("a.pdf", vec![1, 2, 3]));

        backend.run(Effect::Dispatch(command));
        match next_event(&mut rx).await {
            BackendEvent::Completed(completion @ Completion::Extracted { .. }) => {
                workflow.apply(completion);
                assert_eq!(workflow.state().topics().len(), 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancelled_backend_sends_nothing() {
        let (backend, mut rx, cancel) = backend();
        cancel.cancel();
        let mut workflow = Workflow::new();
        backend.run(Effect::Dispatch(workflow.select_file(Document::new("a.pdf", vec![1]))));

        let waited = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(waited.is_err());
    }
}
