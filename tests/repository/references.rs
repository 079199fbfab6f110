use std::sync::Arc;

use instant_api::{
    DocumentRepository, FindOptions, InMemoryDocumentStore, Query, Repository,
    MAX_REFERENCE_DEPTH,
};
use serde_json::{json, Value};

use crate::support::attrs;

fn repos() -> (
    DocumentRepository<InMemoryDocumentStore>,
    DocumentRepository<InMemoryDocumentStore>,
) {
    let store = Arc::new(InMemoryDocumentStore::new());
    (
        DocumentRepository::new(store.clone(), "users"),
        DocumentRepository::new(store, "teams"),
    )
}

#[tokio::test]
async fn reference_resolves_to_the_same_document_as_a_direct_read() {
    let (users, teams) = repos();
    let team = teams.create(attrs(json!({ "name": "core" }))).await.unwrap();

    let user = users
        .create(attrs(json!({ "name": "Ada", "team": format!("teams/{}", team.id) })))
        .await
        .unwrap();

    let direct = teams
        .find_by_id(&team.id, FindOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.get("team"), Some(direct.into_value()));
}

#[tokio::test]
async fn references_are_followed_transitively() {
    let (users, teams) = repos();
    let lead = users
        .create_with_id("lead", attrs(json!({ "name": "Grace" })))
        .await
        .unwrap();
    teams
        .create_with_id("core", attrs(json!({ "lead": "users/lead" })))
        .await
        .unwrap();

    let member = users
        .create(attrs(json!({ "name": "Ada", "team": "teams/core" })))
        .await
        .unwrap();

    assert_eq!(
        member.get("team"),
        Some(json!({ "id": "core", "lead": lead.into_value() }))
    );
}

#[tokio::test]
async fn dangling_reference_serializes_as_null() {
    let (users, _) = repos();
    let user = users
        .create(attrs(json!({ "name": "Ada", "team": "teams/gone" })))
        .await
        .unwrap();
    assert_eq!(user.get("team"), Some(Value::Null));
}

#[tokio::test]
async fn shallow_reads_leave_paths_untouched() {
    let (users, teams) = repos();
    teams
        .create_with_id("core", attrs(json!({ "name": "core" })))
        .await
        .unwrap();
    let user = users
        .create(attrs(json!({ "team": "teams/core" })))
        .await
        .unwrap();

    let shallow = users
        .find_by_id(&user.id, FindOptions::new().shallow())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shallow.get("team"), Some(json!("teams/core")));
}

#[tokio::test]
async fn malformed_paths_stay_strings() {
    let (users, _) = repos();
    let user = users
        .create(attrs(json!({ "site": "https://example.com/", "ratio": "a//b" })))
        .await
        .unwrap();
    assert_eq!(user.get("site"), Some(json!("https://example.com/")));
    assert_eq!(user.get("ratio"), Some(json!("a//b")));
}

#[tokio::test]
async fn queries_match_references_by_path() {
    let (users, teams) = repos();
    teams
        .create_with_id("core", attrs(json!({ "name": "core" })))
        .await
        .unwrap();
    users
        .create_many(vec![
            attrs(json!({ "name": "Ada", "team": "teams/core" })),
            attrs(json!({ "name": "Alan", "team": "teams/other" })),
        ])
        .await
        .unwrap();

    let members = users
        .find(Query::all().eq("team", "teams/core"), FindOptions::default())
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].get("name"), Some(json!("Ada")));
}

#[tokio::test]
async fn reference_cycles_terminate() {
    let (users, _) = repos();
    users
        .create_with_id("a", attrs(json!({ "friend": "users/b" })))
        .await
        .unwrap();
    users
        .create_with_id("b", attrs(json!({ "friend": "users/a" })))
        .await
        .unwrap();

    let a = users
        .find_by_id("a", FindOptions::default())
        .await
        .unwrap()
        .unwrap();

    // Walk the nesting until the depth limit leaves a plain path behind.
    let mut hops = 0;
    let mut current = a.get("friend").unwrap();
    while let Value::Object(object) = current {
        hops += 1;
        current = object.get("friend").cloned().unwrap();
    }
    assert_eq!(hops, MAX_REFERENCE_DEPTH);
    assert!(matches!(current, Value::String(ref path) if path.starts_with("users/")));
}
