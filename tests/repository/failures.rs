use std::sync::Arc;

use instant_api::{
    DocumentRepository, DocumentStore, FindOptions, Query, Repository, RepositoryError,
    StoreError, StoreQuery,
};
use serde_json::json;

use crate::support::{attrs, FlakyStore};

fn flaky() -> (Arc<FlakyStore>, DocumentRepository<FlakyStore>) {
    let store = Arc::new(FlakyStore::new());
    let repo = DocumentRepository::new(store.clone(), "users");
    (store, repo)
}

fn unavailable(operation: &str) -> RepositoryError {
    RepositoryError::Store(StoreError::Unavailable(format!("{operation} is down")))
}

#[tokio::test]
async fn store_failures_propagate_unchanged() {
    let (store, users) = flaky();
    let created = users.create(attrs(json!({ "name": "Ada" }))).await.unwrap();

    store.fail("query");
    let err = users.find(Query::all(), FindOptions::default()).await.unwrap_err();
    assert_eq!(err, unavailable("query"));
    assert_eq!(err.status_code(), 503);

    store.fail("get");
    assert_eq!(
        users
            .find_by_id(&created.id, FindOptions::default())
            .await
            .unwrap_err(),
        unavailable("get")
    );
    assert_eq!(users.delete(&created.id).await.unwrap_err(), unavailable("get"));

    store.fail("merge");
    assert_eq!(
        users
            .update(&created.id, attrs(json!({ "age": 1 })))
            .await
            .unwrap_err(),
        unavailable("merge")
    );
}

#[tokio::test]
async fn failed_create_writes_nothing() {
    let (store, users) = flaky();
    store.fail("add");

    let err = users.create(attrs(json!({ "name": "Ada" }))).await.unwrap_err();
    assert_eq!(err, unavailable("add"));

    store.heal("add");
    assert!(users
        .find(Query::all(), FindOptions::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn create_many_stops_at_first_failure_and_keeps_earlier_items() {
    let (store, users) = flaky();
    store.fail_after("add", 2);

    let err = users
        .create_many(vec![
            attrs(json!({ "n": 1 })),
            attrs(json!({ "n": 2 })),
            attrs(json!({ "n": 3 })),
            attrs(json!({ "n": 4 })),
        ])
        .await
        .unwrap_err();
    assert_eq!(err, unavailable("add"));

    let stored = store
        .inner()
        .query("users", &StoreQuery::new().order_by("n"))
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn update_or_create_surfaces_lookup_failures() {
    let (store, users) = flaky();
    store.fail("query");

    let err = users
        .update_or_create(Query::all().eq("email", "x@y.z"), attrs(json!({ "a": 1 })))
        .await
        .unwrap_err();
    assert_eq!(err, unavailable("query"));
}

#[tokio::test]
async fn resolution_failures_fail_the_read() {
    let (store, users) = flaky();
    users
        .create_with_id("ada", attrs(json!({ "team": "teams/core" })))
        .await
        .unwrap();

    // The document itself is found by the query; dereferencing the team is not.
    store.fail("get");
    let err = users.find(Query::all(), FindOptions::default()).await.unwrap_err();
    assert_eq!(err, unavailable("get"));

    let shallow = users
        .find(Query::all(), FindOptions::new().shallow())
        .await
        .unwrap();
    assert_eq!(shallow[0].get("team"), Some(json!("teams/core")));
}

#[tokio::test]
async fn invalid_ids_are_rejected_before_writing() {
    let (_, users) = flaky();

    for id in ["", "teams/core", "_hidden"] {
        let err = users
            .create_with_id(id, attrs(json!({ "name": "x" })))
            .await
            .unwrap_err();
        assert_eq!(err, RepositoryError::InvalidId(id.to_string()));
        assert_eq!(err.status_code(), 400);
    }
    assert!(users
        .find(Query::all(), FindOptions::default())
        .await
        .unwrap()
        .is_empty());
}
