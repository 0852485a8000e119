use std::sync::Arc;
use std::time::Duration;

use fraudscope_core::{AnalysisResult, BackendStatus, CandidateFile};
use fraudscope_engine::{
    run_animator, AnimatorSettings, BackendSettings, EngineEvent, EngineHandle, EngineSettings,
    EventSink, ProbeError, ScoringBackend, TransportError, UploadError,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestSink {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

fn test_sink() -> (Arc<TestSink>, mpsc::UnboundedReceiver<EngineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(TestSink { tx }), rx)
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<EngineEvent>) -> EngineEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event before timeout")
        .expect("engine still running")
}

/// Backend double that echoes the file name and never touches the network.
struct EchoBackend {
    reachable: bool,
}

#[async_trait::async_trait]
impl ScoringBackend for EchoBackend {
    async fn probe(&self) -> Result<(), ProbeError> {
        if self.reachable {
            Ok(())
        } else {
            Err(TransportError::Network("connection refused".into()).into())
        }
    }

    async fn upload(&self, file: CandidateFile) -> Result<AnalysisResult, UploadError> {
        Ok(AnalysisResult {
            filename: file.name,
            ..AnalysisResult::default()
        })
    }
}

fn quiet_animator() -> AnimatorSettings {
    AnimatorSettings {
        cadence: Duration::from_secs(3600),
        ..AnimatorSettings::default()
    }
}

#[tokio::test]
async fn probe_reports_connected_and_disconnected() {
    let (sink, mut rx) = test_sink();
    let up = EngineHandle::with_backend(
        Arc::new(EchoBackend { reachable: true }),
        quiet_animator(),
        sink.clone(),
    )
    .expect("engine");
    up.probe();
    assert_eq!(
        next_event(&mut rx).await,
        EngineEvent::ProbeFinished(BackendStatus::Connected)
    );

    let down = EngineHandle::with_backend(
        Arc::new(EchoBackend { reachable: false }),
        quiet_animator(),
        sink,
    )
    .expect("engine");
    down.probe();
    assert_eq!(
        next_event(&mut rx).await,
        EngineEvent::ProbeFinished(BackendStatus::Disconnected)
    );
}

#[tokio::test]
async fn submit_reports_attempt_with_result() {
    let (sink, mut rx) = test_sink();
    let engine = EngineHandle::with_backend(
        Arc::new(EchoBackend { reachable: true }),
        quiet_animator(),
        sink,
    )
    .expect("engine");

    engine.submit(42, CandidateFile::new("batch.csv", Vec::new()));

    match next_event(&mut rx).await {
        EngineEvent::UploadFinished { attempt, result } => {
            assert_eq!(attempt, 42);
            assert_eq!(result.expect("ok").filename, "batch.csv");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn upload_through_http_backend_reports_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (sink, mut rx) = test_sink();
    let engine = EngineHandle::new(
        EngineSettings {
            backend: BackendSettings {
                base_url: server.uri(),
                ..BackendSettings::default()
            },
            animator: quiet_animator(),
        },
        sink,
    )
    .expect("engine");

    engine.submit(1, CandidateFile::new("batch.csv", b"amount\n1\n".to_vec()));

    match next_event(&mut rx).await {
        EngineEvent::UploadFinished { attempt, result } => {
            assert_eq!(attempt, 1);
            assert!(matches!(
                result,
                Err(UploadError::Transport(TransportError::HttpStatus { status: 500, .. }))
            ));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn animator_ticks_on_cadence_until_cancelled() {
    let (sink, mut rx) = test_sink();
    let cancel = CancellationToken::new();
    let settings = AnimatorSettings::default();

    let task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { run_animator(settings, cancel, sink.as_ref()).await })
    };

    tokio::time::sleep(Duration::from_millis(16_000)).await;
    cancel.cancel();
    task.await.expect("animator task");

    let mut ticks = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            EngineEvent::CountersAdvanced {
                transactions,
                fraud,
            } => {
                assert!(transactions < 5);
                assert!(fraud <= 1);
                ticks += 1;
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(ticks, 3);
}

#[tokio::test]
async fn dropping_engine_stops_animator() {
    let (sink, mut rx) = test_sink();
    let engine = EngineHandle::with_backend(
        Arc::new(EchoBackend { reachable: true }),
        AnimatorSettings {
            cadence: Duration::from_millis(20),
            ..AnimatorSettings::default()
        },
        sink,
    )
    .expect("engine");
    engine.start_animator();

    assert!(matches!(
        next_event(&mut rx).await,
        EngineEvent::CountersAdvanced { .. }
    ));
    drop(engine);

    // Once the worker winds down every sink clone is released.
    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while rx.recv().await.is_some() {}
    })
    .await;
    assert!(closed.is_ok());
}
