use instant_api::{DeleteResult, FindOptions, Query, Repository};
use serde_json::json;

use crate::support::{attrs, repo};

#[tokio::test]
async fn create_then_find_by_id_round_trips() {
    let users = repo("users");

    let created = users
        .create(attrs(json!({ "name": "Ada", "age": 36, "tags": ["math"] })))
        .await
        .unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.get("name"), Some(json!("Ada")));

    let found = users
        .find_by_id(&created.id, FindOptions::default())
        .await
        .unwrap();
    assert_eq!(found, Some(created));
}

#[tokio::test]
async fn serialized_document_puts_id_first() {
    let users = repo("users");
    let created = users.create(attrs(json!({ "name": "Ada" }))).await.unwrap();

    let text = serde_json::to_string(&created).unwrap();
    assert!(text.starts_with(&format!("{{\"id\":\"{}\"", created.id)));
}

#[tokio::test]
async fn caller_id_is_kept_under_shadow_field() {
    let users = repo("users");
    let created = users
        .create(attrs(json!({ "id": "mine", "name": "Ada" })))
        .await
        .unwrap();

    assert_ne!(created.id, "mine");
    assert_eq!(created.get("_id"), Some(json!("mine")));
    assert_eq!(created.get("id"), Some(json!(created.id)));
}

#[tokio::test]
async fn caller_id_never_displaces_an_existing_shadow_field() {
    let users = repo("users");
    let created = users
        .create(attrs(json!({ "id": "mine", "_id": "mongo-1", "name": "Ada" })))
        .await
        .unwrap();

    let found = users
        .find_by_id(&created.id, FindOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.get("_id"), Some(json!("mongo-1")));
    assert_eq!(found.get("__id"), Some(json!("mine")));
    assert_eq!(found.get("name"), Some(json!("Ada")));
    assert_eq!(found, created);
}

#[tokio::test]
async fn create_with_id_overwrites_whole_document() {
    let users = repo("users");

    users
        .create_with_id("ada", attrs(json!({ "name": "Ada", "age": 36 })))
        .await
        .unwrap();
    let replaced = users
        .create_with_id("ada", attrs(json!({ "name": "Ada L." })))
        .await
        .unwrap();

    assert_eq!(replaced.id, "ada");
    assert_eq!(replaced.get("name"), Some(json!("Ada L.")));
    assert_eq!(replaced.get("age"), None);
}

#[tokio::test]
async fn update_merges_into_existing_fields() {
    let users = repo("users");
    let created = users
        .create(attrs(json!({ "name": "Ada", "age": 36 })))
        .await
        .unwrap();

    let updated = users
        .update(&created.id, attrs(json!({ "age": 37, "city": "London" })))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.get("name"), Some(json!("Ada")));
    assert_eq!(updated.get("age"), Some(json!(37)));
    assert_eq!(updated.get("city"), Some(json!("London")));
}

#[tokio::test]
async fn update_of_missing_document_is_none() {
    let users = repo("users");
    let updated = users
        .update("ghost", attrs(json!({ "age": 1 })))
        .await
        .unwrap();
    assert_eq!(updated, None);
    assert!(users.find_by_id("ghost", FindOptions::default()).await.unwrap().is_none());
}

#[tokio::test]
async fn create_many_preserves_input_order() {
    let users = repo("users");
    let created = users
        .create_many(vec![
            attrs(json!({ "name": "a" })),
            attrs(json!({ "name": "b" })),
            attrs(json!({ "name": "c" })),
        ])
        .await
        .unwrap();

    let names: Vec<_> = created.iter().map(|doc| doc.get("name").unwrap()).collect();
    assert_eq!(names, vec![json!("a"), json!("b"), json!("c")]);

    let all = users.find(Query::all(), FindOptions::default()).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn create_many_of_nothing_is_empty() {
    let users = repo("users");
    assert!(users.create_many(Vec::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_or_create_twice_creates_then_updates_one_document() {
    let items = repo("items");

    let first = items
        .update_or_create(Query::all().eq("a", 1), attrs(json!({ "a": 1, "b": 2 })))
        .await
        .unwrap();
    assert_eq!(first.get("a"), Some(json!(1)));
    assert_eq!(first.get("b"), Some(json!(2)));

    let second = items
        .update_or_create(Query::all().eq("a", 1), attrs(json!({ "a": 1, "b": 3 })))
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.get("b"), Some(json!(3)));

    let all = items.find(Query::all(), FindOptions::default()).await.unwrap();
    assert_eq!(all, vec![second]);
}

#[tokio::test]
async fn update_or_create_updates_first_match() {
    let users = repo("users");
    let existing = users
        .create(attrs(json!({ "email": "ada@example.com", "visits": 1 })))
        .await
        .unwrap();

    let upserted = users
        .update_or_create(
            Query::all().eq("email", "ada@example.com"),
            attrs(json!({ "visits": 2 })),
        )
        .await
        .unwrap();

    assert_eq!(upserted.id, existing.id);
    assert_eq!(upserted.get("visits"), Some(json!(2)));
    assert_eq!(
        users.find(Query::all(), FindOptions::default()).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn update_or_create_creates_when_nothing_matches() {
    let users = repo("users");

    let created = users
        .update_or_create(
            Query::all().eq("email", "grace@example.com"),
            attrs(json!({ "email": "grace@example.com", "visits": 1 })),
        )
        .await
        .unwrap();

    let found = users
        .find_one(
            Query::all().eq("email", "grace@example.com"),
            FindOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(found, Some(created));
}

#[tokio::test]
async fn delete_reports_whether_anything_was_removed() {
    let users = repo("users");
    let created = users.create(attrs(json!({ "name": "Ada" }))).await.unwrap();

    assert_eq!(
        users.delete(&created.id).await.unwrap(),
        DeleteResult { deleted: true }
    );
    assert!(users
        .find_by_id(&created.id, FindOptions::default())
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        users.delete(&created.id).await.unwrap(),
        DeleteResult { deleted: false }
    );
}

#[tokio::test]
async fn missing_documents_are_absent_not_errors() {
    let users = repo("users");

    assert!(users.find_by_id("nope", FindOptions::default()).await.unwrap().is_none());
    assert!(users
        .find_one(Query::all().eq("name", "nobody"), FindOptions::default())
        .await
        .unwrap()
        .is_none());
    assert!(users
        .find(Query::all().eq("name", "nobody"), FindOptions::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn collections_are_isolated() {
    let store = std::sync::Arc::new(instant_api::InMemoryDocumentStore::new());
    let users = instant_api::DocumentRepository::new(store.clone(), "users");
    let teams = instant_api::DocumentRepository::new(store, "teams");

    let user = users.create(attrs(json!({ "name": "Ada" }))).await.unwrap();

    assert!(teams.find_by_id(&user.id, FindOptions::default()).await.unwrap().is_none());
    assert!(teams.find(Query::all(), FindOptions::default()).await.unwrap().is_empty());
}
