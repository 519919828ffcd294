//! End-to-end tests: a real listener on an ephemeral port, driven over HTTP.

use std::sync::Arc;
use std::time::{Duration, Instant};

use gcm_core::{LoggingLayer, MemorySink, SendError, StubGcmService, ACK_TOKEN};
use gcm_server::endpoint::EndpointConfig;
use gcm_server::network::{LifecycleController, LifecycleState};
use gcm_server::{FatalTrigger, NetworkConfig, NetworkModule, Supervisor, TerminationSignal};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;

struct TestServer {
    base_url: String,
    sink: Arc<MemorySink>,
    lifecycle: Arc<LifecycleController>,
    signal: Option<oneshot::Sender<TerminationSignal>>,
    supervisor: JoinHandle<FatalTrigger>,
}

impl TestServer {
    async fn spawn(delay: Duration) -> Self {
        let sink = Arc::new(MemorySink::new());
        let service = ServiceBuilder::new()
            .layer(LoggingLayer::new(sink.clone()))
            .service(StubGcmService);

        let config = NetworkConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            endpoint: EndpointConfig { delay },
            ..NetworkConfig::default()
        };
        let mut module = NetworkModule::new(config, Arc::new(service));
        let port = module.start().await.expect("bind ephemeral port");
        let lifecycle = module.lifecycle();

        let (signal_tx, signal_rx) = oneshot::channel::<TerminationSignal>();
        let signals = async move {
            match signal_rx.await {
                Ok(sig) => FatalTrigger::Signal(sig),
                Err(_) => std::future::pending().await,
            }
        };

        let supervisor = tokio::spawn(
            Supervisor::new(Arc::clone(&lifecycle)).run(module.serve(), signals),
        );

        let server = Self {
            base_url: format!("http://127.0.0.1:{port}"),
            sink,
            lifecycle,
            signal: Some(signal_tx),
            supervisor,
        };
        server.wait_until_running().await;
        server
    }

    async fn wait_until_running(&self) {
        for _ in 0..200 {
            if self.lifecycle.state() == LifecycleState::Running {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("server never reached Running");
    }

    fn send_url(&self) -> String {
        format!("{}/gcm/send", self.base_url)
    }

    async fn terminate(&mut self) -> FatalTrigger {
        let tx = self.signal.take().expect("signal already sent");
        tx.send(TerminationSignal::Terminate).unwrap();
        tokio::time::timeout(Duration::from_secs(2), &mut self.supervisor)
            .await
            .expect("supervisor should stop within 2s")
            .unwrap()
    }
}

#[tokio::test]
async fn post_registration_id_returns_ack() {
    let server = TestServer::spawn(Duration::ZERO).await;

    let response = reqwest::Client::new()
        .post(server.send_url())
        .body("abc123")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), ACK_TOKEN);

    let records = server.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].input, "abc123");
    assert_eq!(records[0].output, ACK_TOKEN);
    assert_eq!(records[0].error, None);
}

#[tokio::test]
async fn post_empty_body_returns_empty_input_failure() {
    let server = TestServer::spawn(Duration::ZERO).await;

    let response = reqwest::Client::new()
        .post(server.send_url())
        .body("")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(body["kind"], "empty_input");
    assert_eq!(body["error"], "empty registration id");

    assert_eq!(server.sink.records()[0].error, Some(SendError::EmptyInput));
}

#[tokio::test]
async fn configured_delay_bounds_latency_from_below() {
    let server = TestServer::spawn(Duration::from_millis(50)).await;

    let start = Instant::now();
    let response = reqwest::Client::new()
        .post(server.send_url())
        .body("abc123")
        .send()
        .await
        .unwrap();
    let body = response.text().await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(body, ACK_TOKEN);
}

#[tokio::test]
async fn concurrent_requests_each_log_one_record() {
    let server = TestServer::spawn(Duration::ZERO).await;
    let client = reqwest::Client::new();

    let requests = (0..16).map(|i| {
        let client = client.clone();
        let url = server.send_url();
        async move {
            let body = if i % 2 == 0 { format!("device-{i}") } else { String::new() };
            client.post(url).body(body).send().await.unwrap().status()
        }
    });
    let statuses = spawn_all(requests).await;

    assert_eq!(statuses.iter().filter(|s| s.is_success()).count(), 8);
    assert_eq!(server.sink.len(), 16);
}

#[tokio::test]
async fn termination_signal_stops_idle_server() {
    let mut server = TestServer::spawn(Duration::ZERO).await;

    let start = Instant::now();
    let trigger = server.terminate().await;

    assert!(matches!(
        trigger,
        FatalTrigger::Signal(TerminationSignal::Terminate)
    ));
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(server.lifecycle.state(), LifecycleState::Stopped);

    // The aborted listener releases its socket.
    let addr = server.base_url.trim_start_matches("http://").to_string();
    let mut refused = false;
    for _ in 0..100 {
        if tokio::net::TcpStream::connect(&addr).await.is_err() {
            refused = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(refused, "listener should stop accepting after shutdown");
}

/// In-flight requests are not drained: shutdown completes while a delayed
/// request is still pending.
#[tokio::test]
async fn shutdown_does_not_wait_for_in_flight_requests() {
    let mut server = TestServer::spawn(Duration::from_millis(800)).await;

    let url = server.send_url();
    let in_flight = tokio::spawn(async move {
        reqwest::Client::new().post(url).body("abc123").send().await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let start = Instant::now();
    server.terminate().await;
    assert!(start.elapsed() < Duration::from_millis(500));
    assert!(server.sink.is_empty(), "business call still waiting on delay");

    in_flight.abort();
}

/// A client that gives up mid-delay does not stop the business call.
#[tokio::test]
async fn client_timeout_does_not_cut_delay_short() {
    let server = TestServer::spawn(Duration::from_millis(300)).await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let result = client.post(server.send_url()).body("abc123").send().await;
    assert!(result.unwrap_err().is_timeout());
    assert!(server.sink.is_empty());

    tokio::time::sleep(Duration::from_millis(600)).await;
    let records = server.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].input, "abc123");
    assert_eq!(records[0].output, ACK_TOKEN);
}

async fn spawn_all<F, T>(futures: impl Iterator<Item = F>) -> Vec<T>
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = futures.map(tokio::spawn).collect();
    let mut out = Vec::with_capacity(handles.len());
    for handle in handles {
        out.push(handle.await.unwrap());
    }
    out
}
