mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use tasksync::{Priority, Task, TaskStatus};
use tower::ServiceExt;

fn task(id: &str, title: &str, age_secs: i64) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        status: TaskStatus::Pending,
        priority: Priority::Medium,
        assigned_user_id: String::new(),
        due_date: None,
        last_updated: Utc::now() - Duration::seconds(age_secs),
    }
}

fn sync_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/internal/sync")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_sync_inserts_unknown_task() {
    let (app, state) = common::standalone_app("node-b");
    let incoming = task("t-1", "from peer", 0);

    let response = app
        .oneshot(sync_request(serde_json::json!({
            "origin_node": "node-a",
            "task": incoming,
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.store.get("t-1").unwrap().title, "from peer");
}

#[tokio::test]
async fn test_sync_stale_record_is_acknowledged_but_ignored() {
    let (app, state) = common::standalone_app("node-b");
    state.store.create(task("t-1", "local newer", 0));

    let response = app
        .oneshot(sync_request(serde_json::json!({
            "task": task("t-1", "remote older", 60),
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.store.get("t-1").unwrap().title, "local newer");
}

#[tokio::test]
async fn test_sync_tombstone_removes_task() {
    let (app, state) = common::standalone_app("node-b");
    state.store.create(task("t-1", "doomed", 30));

    let response = app
        .oneshot(sync_request(serde_json::json!({
            "tombstone": { "id": "t-1", "deleted_at": Utc::now() },
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.store.get("t-1").is_err());
    assert_eq!(state.store.tombstone_count(), 1);
}

#[tokio::test]
async fn test_sync_empty_request_is_noop() {
    let (app, state) = common::standalone_app("node-b");

    let response = app
        .oneshot(sync_request(serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.store.is_empty());
}

#[tokio::test]
async fn test_snapshot_lists_tasks_and_tombstones() {
    let (app, state) = common::standalone_app("node-b");
    state.store.create(task("keep", "kept", 10));
    state.store.create(task("drop", "dropped", 10));
    state.store.delete("drop").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/internal/snapshot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["node_id"], "node-b");
    assert_eq!(json["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(json["tasks"][0]["id"], "keep");
    assert_eq!(json["tombstones"][0]["id"], "drop");
}

#[tokio::test]
async fn test_status_without_peers() {
    let (app, state) = common::standalone_app("node-b");
    state.store.create(task("t-1", "one", 0));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/internal/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["node_id"], "node-b");
    assert_eq!(json["replication_enabled"], false);
    assert_eq!(json["task_count"], 1);
    assert_eq!(json["peers"].as_array().unwrap().len(), 0);
}
