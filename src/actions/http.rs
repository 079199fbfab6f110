//! HTTP transport for actions - maps REST requests onto an action set.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /` - find. Query string -> query; `_orderBy`, `_limit`, `_shallow` -> options.
//! - `POST /` - create from a JSON object body.
//! - `PUT /` - update or create. Body = `{ "query": {...}, "attributes": {...} }`.
//! - `POST /_batch` - create many from a JSON array body.
//! - `POST /_query` - find. Body = `{ "query": {...}, "orderBy", "limit", "resolveReferences" }`.
//! - `POST /_query/one` - find one, same body.
//! - `GET /:id` - find by id.
//! - `PUT /:id` - create with id (full overwrite).
//! - `PATCH /:id` - update (merge).
//! - `DELETE /:id` - delete.
//!
//! Collection operations live under `_`-prefixed segments, which document ids
//! may not start with, so they never shadow `/:id`. A body that is not valid
//! JSON is answered like any other bad request: 400 with `{"error": ...}`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use instant_api::{actions, Actions, DocumentRepository, InMemoryDocumentStore};
//!
//! let store = Arc::new(InMemoryDocumentStore::new());
//! let users = Arc::new(DocumentRepository::new(store, "users"));
//! let app = axum::Router::new().nest("/users", actions::router(Arc::new(Actions::for_repository(users))));
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query as QueryString, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use super::actions::Actions;
use super::error::ActionError;
use super::request::{ActionRequest, ActionResponse};
use crate::document::Attributes;
use crate::query::FindOptions;
use crate::repository::Repository;

const ORDER_BY_PARAM: &str = "_orderBy";
const LIMIT_PARAM: &str = "_limit";
const SHALLOW_PARAM: &str = "_shallow";

type Params = Vec<(String, String)>;
type SharedActions<R> = Arc<Actions<R>>;

/// Build an axum `Router` exposing the full action set of one resource.
pub fn router<R: Repository + ?Sized + 'static>(actions: SharedActions<R>) -> Router {
    Router::new()
        .route(
            "/",
            get(find_handler::<R>)
                .post(create_handler::<R>)
                .put(update_or_create_handler::<R>),
        )
        .route("/_batch", post(create_many_handler::<R>))
        .route("/_query", post(query_handler::<R>))
        .route("/_query/one", post(query_one_handler::<R>))
        .route(
            "/:id",
            get(find_by_id_handler::<R>)
                .put(create_with_id_handler::<R>)
                .patch(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(actions)
}

/// Write an `ActionResponse` out. A `Null` body becomes an empty body.
fn reply(response: ActionResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match response.body {
        Value::Null => status.into_response(),
        body => (status, Json(body)).into_response(),
    }
}

/// Parse a query-string value as JSON when it is valid JSON (`1`, `true`),
/// otherwise keep it as a string.
fn parse_param(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

/// Split query-string pairs into a lookup query and read options.
fn query_from_params(params: Params) -> Result<(Attributes, FindOptions), ActionError> {
    let mut query = Attributes::new();
    let mut options = FindOptions::default();
    for (key, raw) in params {
        match key.as_str() {
            ORDER_BY_PARAM => options.order_by = Some(raw),
            LIMIT_PARAM => {
                let limit = raw
                    .parse()
                    .map_err(|_| ActionError::BadRequest(format!("invalid {LIMIT_PARAM}: {raw}")))?;
                options.limit = Some(limit);
            }
            SHALLOW_PARAM => options.resolve_references = !matches!(raw.as_str(), "" | "true" | "1"),
            _ => {
                query.insert(key, parse_param(raw));
            }
        }
    }
    Ok((query, options))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QueryBody {
    query: Attributes,
    #[serde(flatten)]
    options: FindOptions,
}

impl QueryBody {
    fn into_request(self) -> ActionRequest {
        ActionRequest::new()
            .with_query(self.query)
            .with_options(self.options)
    }
}

/// A JSON body, or why it could not be read.
type JsonBody<T> = Result<Json<T>, JsonRejection>;

/// Unwrap a JSON body; malformed or mistyped bodies become `BadRequest`.
fn json_body<T>(body: JsonBody<T>) -> Result<T, ActionError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ActionError::BadRequest(rejection.body_text()))
}

/// Split an update-or-create body into lookup query and attributes.
fn upsert_request(body: Value) -> ActionRequest {
    let mut request = ActionRequest::new();
    if let Value::Object(mut object) = body {
        if let Some(Value::Object(query)) = object.remove("query") {
            request.query = query;
        }
        request.body = object.remove("attributes").unwrap_or(Value::Null);
    }
    request
}

/// `GET /` - find by query string.
async fn find_handler<R: Repository + ?Sized + 'static>(
    State(actions): State<SharedActions<R>>,
    QueryString(params): QueryString<Params>,
) -> Response {
    match query_from_params(params) {
        Ok((query, options)) => reply(
            actions
                .find(ActionRequest::new().with_query(query).with_options(options))
                .await,
        ),
        Err(err) => reply(err.into()),
    }
}

/// `POST /_query` - find by JSON body.
async fn query_handler<R: Repository + ?Sized + 'static>(
    State(actions): State<SharedActions<R>>,
    body: JsonBody<QueryBody>,
) -> Response {
    match json_body(body) {
        Ok(body) => reply(actions.find(body.into_request()).await),
        Err(err) => reply(err.into()),
    }
}

/// `POST /_query/one` - find one by JSON body.
async fn query_one_handler<R: Repository + ?Sized + 'static>(
    State(actions): State<SharedActions<R>>,
    body: JsonBody<QueryBody>,
) -> Response {
    match json_body(body) {
        Ok(body) => reply(actions.find_one(body.into_request()).await),
        Err(err) => reply(err.into()),
    }
}

/// `POST /` - create.
async fn create_handler<R: Repository + ?Sized + 'static>(
    State(actions): State<SharedActions<R>>,
    body: JsonBody<Value>,
) -> Response {
    match json_body(body) {
        Ok(body) => reply(actions.create(ActionRequest::new().with_body(body)).await),
        Err(err) => reply(err.into()),
    }
}

/// `POST /_batch` - create many.
async fn create_many_handler<R: Repository + ?Sized + 'static>(
    State(actions): State<SharedActions<R>>,
    body: JsonBody<Value>,
) -> Response {
    match json_body(body) {
        Ok(body) => reply(actions.create_many(ActionRequest::new().with_body(body)).await),
        Err(err) => reply(err.into()),
    }
}

/// `PUT /` - update or create.
async fn update_or_create_handler<R: Repository + ?Sized + 'static>(
    State(actions): State<SharedActions<R>>,
    body: JsonBody<Value>,
) -> Response {
    match json_body(body) {
        Ok(body) => reply(actions.update_or_create(upsert_request(body)).await),
        Err(err) => reply(err.into()),
    }
}

/// `GET /:id` - find by id.
async fn find_by_id_handler<R: Repository + ?Sized + 'static>(
    State(actions): State<SharedActions<R>>,
    Path(id): Path<String>,
    QueryString(params): QueryString<Params>,
) -> Response {
    match query_from_params(params) {
        Ok((_, options)) => reply(
            actions
                .find_by_id(ActionRequest::new().with_id(id).with_options(options))
                .await,
        ),
        Err(err) => reply(err.into()),
    }
}

/// `PUT /:id` - create with id.
async fn create_with_id_handler<R: Repository + ?Sized + 'static>(
    State(actions): State<SharedActions<R>>,
    Path(id): Path<String>,
    body: JsonBody<Value>,
) -> Response {
    match json_body(body) {
        Ok(body) => reply(
            actions
                .create_with_id(ActionRequest::new().with_id(id).with_body(body))
                .await,
        ),
        Err(err) => reply(err.into()),
    }
}

/// `PATCH /:id` - update.
async fn update_handler<R: Repository + ?Sized + 'static>(
    State(actions): State<SharedActions<R>>,
    Path(id): Path<String>,
    body: JsonBody<Value>,
) -> Response {
    match json_body(body) {
        Ok(body) => reply(
            actions
                .update(ActionRequest::new().with_id(id).with_body(body))
                .await,
        ),
        Err(err) => reply(err.into()),
    }
}

/// `DELETE /:id` - delete.
async fn delete_handler<R: Repository + ?Sized + 'static>(
    State(actions): State<SharedActions<R>>,
    Path(id): Path<String>,
) -> Response {
    reply(actions.delete(ActionRequest::new().with_id(id)).await)
}
