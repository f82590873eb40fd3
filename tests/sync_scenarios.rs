use krushimind_sync::domain::entities::{IdentificationDraft, ListingDraft};
use krushimind_sync::{AppConfig, AppState, OutboxStatus, SyncReport};
use mockito::Matcher;
use serde_json::json;
use std::path::Path;

fn config_for(server_url: &str, db_path: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = format!("sqlite://{}?mode=rwc", db_path.display());
    config.network.base_url = server_url.to_string();
    config.network.probe_timeout_secs = 2;
    config.network.push_timeout_secs = 2;
    config
}

fn tomato_listing() -> ListingDraft {
    ListingDraft {
        product_name: "Tomatoes".to_string(),
        product_type: "vegetable".to_string(),
        quantity: 25.0,
        unit: "kg".to_string(),
        price: 22.5,
        description: Some("Fresh harvest".to_string()),
        contact_info: Some("9876543210".to_string()),
        image_data: None,
    }
}

#[tokio::test]
async fn listing_created_offline_syncs_after_reconnect() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(config_for(&server.url(), &dir.path().join("krushimind.db")))
        .await
        .unwrap();

    // Server down: the record lands locally and waits in the queue.
    let down = server
        .mock("HEAD", "/api/ping")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let id = state.records.store_listing(tomato_listing()).await.unwrap();
    let report = state.sync.sync_if_possible().await;
    assert_eq!(report, SyncReport::aborted());
    assert_eq!(state.outbox.list_pending(50).await.unwrap().len(), 1);

    // Server comes back.
    down.remove_async().await;
    server
        .mock("HEAD", "/api/ping")
        .match_query(Matcher::Any)
        .with_status(200)
        .create_async()
        .await;
    let push = server
        .mock("POST", "/api/marketplace")
        .match_body(Matcher::PartialJson(json!({
            "productName": "Tomatoes",
            "quantity": 25.0
        })))
        .with_status(201)
        .with_body(r#"{"id": 7, "message": "Listing created"}"#)
        .expect(1)
        .create_async()
        .await;

    let report = state.sync.sync_if_possible().await;
    assert_eq!(report, SyncReport::completed(1, 0));
    push.assert_async().await;

    let listing = state.records.get_listing(id).await.unwrap().unwrap();
    assert!(listing.synced);
    assert!(state.outbox.list_pending(50).await.unwrap().is_empty());

    state.shutdown().await;
}

#[tokio::test]
async fn rejected_pushes_retry_up_to_the_ceiling_then_stop() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(config_for(&server.url(), &dir.path().join("krushimind.db")))
        .await
        .unwrap();

    server
        .mock("HEAD", "/api/ping")
        .match_query(Matcher::Any)
        .with_status(200)
        .create_async()
        .await;
    let push = server
        .mock("POST", "/api/marketplace")
        .with_status(500)
        .with_body("server exploded")
        .expect(5)
        .create_async()
        .await;

    state.records.store_listing(tomato_listing()).await.unwrap();
    let entry_id = state.outbox.list_pending(50).await.unwrap()[0].id;

    for _ in 0..4 {
        let report = state.sync.sync_if_possible().await;
        assert_eq!(report, SyncReport::completed(0, 0));
    }
    let report = state.sync.sync_if_possible().await;
    assert_eq!(report, SyncReport::completed(0, 1));

    let entry = state.outbox.get_entry(entry_id).await.unwrap().unwrap();
    assert_eq!(entry.status, OutboxStatus::Failed);
    assert_eq!(entry.attempts, 5);

    // Abandoned entries are never pushed again.
    let report = state.sync.sync_if_possible().await;
    assert_eq!(report, SyncReport::completed(0, 0));
    push.assert_async().await;

    state.shutdown().await;
}

#[tokio::test]
async fn identification_is_pushed_to_its_own_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(config_for(&server.url(), &dir.path().join("krushimind.db")))
        .await
        .unwrap();

    server
        .mock("HEAD", "/api/ping")
        .match_query(Matcher::Any)
        .with_status(200)
        .create_async()
        .await;
    let push = server
        .mock("POST", "/api/identifications")
        .match_body(Matcher::PartialJson(json!({
            "imageData": "base64-leaf-photo",
            "result": {"disease": "leaf rust", "confidence": 0.91}
        })))
        .with_status(200)
        .with_body(r#"{"id": "srv-1"}"#)
        .expect(1)
        .create_async()
        .await;

    state
        .records
        .store_identification(IdentificationDraft {
            image_data: "base64-leaf-photo".to_string(),
            result: json!({"disease": "leaf rust", "confidence": 0.91}),
        })
        .await
        .unwrap();

    let report = state.sync.sync_if_possible().await;
    assert_eq!(report, SyncReport::completed(1, 0));
    push.assert_async().await;

    state.shutdown().await;
}

#[tokio::test]
async fn local_data_and_queue_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("krushimind.db");

    {
        let state = AppState::new(config_for("http://localhost:3000", &db_path))
            .await
            .unwrap();
        state.records.store_listing(tomato_listing()).await.unwrap();
        state
            .records
            .set_preference("language", json!("hi"))
            .await
            .unwrap();
        state.shutdown().await;
    }

    let state = AppState::new(config_for("http://localhost:3000", &db_path))
        .await
        .unwrap();

    let listings = state.records.listings(None).await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].product_name, "Tomatoes");
    assert!(!listings[0].synced);

    let pending = state.outbox.list_pending(50).await.unwrap();
    assert_eq!(pending.len(), 1);

    assert_eq!(
        state.records.get_preference("language").await.unwrap(),
        Some(json!("hi"))
    );

    state.shutdown().await;
}
