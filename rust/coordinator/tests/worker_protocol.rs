//! End-to-end tests: a real listener driven by the worker HTTP client.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use tilefarm_coordinator::{serve, CoordinatorState};
use tilefarm_core::{
    ClientConfig, CoordinatorClient, CoordinatorConfig, HttpCoordinatorClient, TileGrid,
};

struct TestCoordinator {
    state: Arc<CoordinatorState>,
    client: HttpCoordinatorClient,
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestCoordinator {
    async fn start(width: u32, height: u32, machines: u32, threads: u32) -> Self {
        let mut config = CoordinatorConfig::default();
        config.image.width = width;
        config.image.height = height;
        config.cluster.machines = machines;
        config.cluster.threads_per_machine = threads;
        config.validate().unwrap();

        let state = Arc::new(CoordinatorState::from_config(&config));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let (tx, rx) = oneshot::channel();
        tokio::spawn(serve(listener, state.clone(), async {
            let _ = rx.await;
        }));

        let client = HttpCoordinatorClient::new(ClientConfig {
            base_url: base_url.clone(),
            request_timeout_ms: 5_000,
        })
        .unwrap();

        Self {
            state,
            client,
            base_url,
            shutdown: Some(tx),
        }
    }
}

impl Drop for TestCoordinator {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

#[tokio::test]
async fn test_single_worker_renders_whole_image() {
    let coordinator = TestCoordinator::start(100, 100, 1, 1).await;
    let client = &coordinator.client;
    let grid = TileGrid::new(100, 100, 32);

    // Gate is closed until the only expected worker says hello.
    assert_eq!(client.request_tile().await.unwrap(), None);

    client.hello().await.unwrap();

    let mut seen = HashSet::new();
    for _ in 0..16 {
        let assignment = client.request_tile().await.unwrap().expect("tile available");
        assert_eq!(assignment.rect, grid.tile_rect(assignment.index));
        assert!(seen.insert(assignment.index), "tile {} handed out twice", assignment.index);
    }
    assert_eq!(seen, (0..16).collect::<HashSet<_>>());
    assert_eq!(client.request_tile().await.unwrap(), None);

    let snapshot = coordinator.state.snapshot().await;
    assert_eq!(snapshot.to_string(), "active=100%, assigned=100%, finished=0%");

    for index in &seen {
        client.report_done(i64::from(*index)).await.unwrap();
    }
    let snapshot = coordinator.state.snapshot().await;
    assert_eq!(snapshot.progress.finished, 16);
}

#[tokio::test]
async fn test_status_after_two_tiles() {
    let coordinator = TestCoordinator::start(100, 100, 1, 1).await;
    let client = &coordinator.client;

    client.hello().await.unwrap();
    client.request_tile().await.unwrap().unwrap();
    client.request_tile().await.unwrap().unwrap();

    assert_eq!(
        coordinator.state.snapshot().await.to_string(),
        "active=100%, assigned=12.5%, finished=0%"
    );
}

#[tokio::test]
async fn test_repeated_done_counts_once() {
    let coordinator = TestCoordinator::start(100, 100, 1, 1).await;
    let client = &coordinator.client;

    client.report_done(5).await.unwrap();
    client.report_done(5).await.unwrap();

    assert_eq!(coordinator.state.snapshot().await.progress.finished, 1);
}

#[tokio::test]
async fn test_cluster_gate_waits_for_every_thread() {
    let coordinator = TestCoordinator::start(64, 64, 2, 2).await;
    let client = &coordinator.client;

    for _ in 0..3 {
        client.hello().await.unwrap();
        assert_eq!(client.request_tile().await.unwrap(), None);
    }

    client.hello().await.unwrap();
    assert!(client.request_tile().await.unwrap().is_some());
}

#[tokio::test]
async fn test_many_workers_share_the_pool() {
    let coordinator = TestCoordinator::start(320, 320, 2, 4).await;
    let base_url = coordinator.base_url.clone();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = coordinator.state.clone();
        let client = HttpCoordinatorClient::new(ClientConfig {
            base_url: base_url.clone(),
            request_timeout_ms: 5_000,
        })
        .unwrap();
        handles.push(tokio::spawn(async move {
            client.hello().await.unwrap();
            let mut rendered = Vec::new();
            loop {
                match client.request_tile().await.unwrap() {
                    Some(assignment) => {
                        client.report_done(i64::from(assignment.index)).await.unwrap();
                        rendered.push(assignment.index);
                    }
                    // Empty while the gate is closed; once open it means drained.
                    None => {
                        let snapshot = state.snapshot().await;
                        if snapshot.registered >= snapshot.expected_workers {
                            break rendered;
                        }
                        tokio::task::yield_now().await;
                    }
                }
            }
        }));
    }

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.await.unwrap());
    }

    assert_eq!(all.len(), 100);
    assert_eq!(all.into_iter().collect::<HashSet<_>>().len(), 100);

    let snapshot = coordinator.state.snapshot().await;
    assert_eq!(snapshot.progress.finished, 100);
    assert_eq!(snapshot.to_string(), "active=100%, assigned=100%, finished=100%");
}

#[tokio::test]
async fn test_unknown_path_is_rejected() {
    let coordinator = TestCoordinator::start(32, 32, 1, 1).await;

    let response = reqwest::get(format!("{}/metrics", coordinator.base_url))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().await.unwrap().is_empty());
    assert_eq!(coordinator.state.snapshot().await.registered, 0);
}
