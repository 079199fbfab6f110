//! Actions - map decomposed requests onto controller calls.

use std::sync::Arc;

use serde::Serialize;

use super::error::ActionError;
use super::request::{ActionRequest, ActionResponse};
use crate::controller::Controller;
use crate::document::Document;
use crate::query::Query;
use crate::repository::{DeleteResult, Repository};

/// One action per controller operation.
///
/// Each action pulls what it needs out of the request, calls the controller
/// and turns the outcome into a response: 200 with the result, an empty 404
/// for an absent result, or the error's status with `{"error": ...}`.
pub struct Actions<R: ?Sized> {
    controller: Controller<R>,
}

impl<R: ?Sized> Clone for Actions<R> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
        }
    }
}

fn respond<T: Serialize>(result: Result<Option<T>, ActionError>) -> ActionResponse {
    let outcome = result.and_then(|found| {
        found
            .map(|value| {
                serde_json::to_value(value).map_err(|e| ActionError::Encode(e.to_string()))
            })
            .transpose()
    });
    match outcome {
        Ok(Some(body)) => ActionResponse::ok(body),
        Ok(None) => ActionResponse::not_found(),
        Err(err) => {
            tracing::warn!(status = err.status_code(), error = %err, "action failed");
            ActionResponse::from_error(&err)
        }
    }
}

impl<R: Repository + ?Sized> Actions<R> {
    pub fn new(controller: Controller<R>) -> Self {
        Self { controller }
    }

    /// Wire actions straight onto a repository.
    pub fn for_repository(repository: Arc<R>) -> Self {
        Self::new(Controller::new(repository))
    }

    pub fn controller(&self) -> &Controller<R> {
        &self.controller
    }

    /// Body object -> new document.
    pub async fn create(&self, request: ActionRequest) -> ActionResponse {
        respond(self.try_create(&request).await.map(Some))
    }

    /// Path id + body object -> document at that id (full overwrite).
    pub async fn create_with_id(&self, request: ActionRequest) -> ActionResponse {
        respond(self.try_create_with_id(&request).await.map(Some))
    }

    /// Body array of objects -> documents in input order.
    pub async fn create_many(&self, request: ActionRequest) -> ActionResponse {
        respond(self.try_create_many(&request).await.map(Some))
    }

    /// Query mapping + options -> matching documents (possibly empty).
    pub async fn find(&self, request: ActionRequest) -> ActionResponse {
        let query = Query::from_object(request.query);
        let result = self.controller.find(query, request.options).await;
        respond(result.map(Some).map_err(ActionError::from))
    }

    /// Query mapping + options -> first match or 404.
    pub async fn find_one(&self, request: ActionRequest) -> ActionResponse {
        let query = Query::from_object(request.query);
        let result = self.controller.find_one(query, request.options).await;
        respond(result.map_err(ActionError::from))
    }

    /// Path id -> document or 404.
    pub async fn find_by_id(&self, request: ActionRequest) -> ActionResponse {
        respond(self.try_find_by_id(&request).await)
    }

    /// Path id + body object -> merged document or 404.
    pub async fn update(&self, request: ActionRequest) -> ActionResponse {
        respond(self.try_update(&request).await)
    }

    /// Query mapping + body object -> updated or created document.
    pub async fn update_or_create(&self, request: ActionRequest) -> ActionResponse {
        respond(self.try_update_or_create(&request).await.map(Some))
    }

    /// Path id -> `{"deleted": bool}`.
    pub async fn delete(&self, request: ActionRequest) -> ActionResponse {
        respond(self.try_delete(&request).await.map(Some))
    }

    async fn try_create(&self, request: &ActionRequest) -> Result<Document, ActionError> {
        let attributes = request.body_object()?;
        Ok(self.controller.create(attributes).await?)
    }

    async fn try_create_with_id(&self, request: &ActionRequest) -> Result<Document, ActionError> {
        let id = request.id_param()?;
        let attributes = request.body_object()?;
        Ok(self.controller.create_with_id(id, attributes).await?)
    }

    async fn try_create_many(&self, request: &ActionRequest) -> Result<Vec<Document>, ActionError> {
        let items = request.body_objects()?;
        Ok(self.controller.create_many(items).await?)
    }

    async fn try_find_by_id(
        &self,
        request: &ActionRequest,
    ) -> Result<Option<Document>, ActionError> {
        let id = request.id_param()?;
        Ok(self
            .controller
            .find_by_id(id, request.options.clone())
            .await?)
    }

    async fn try_update(&self, request: &ActionRequest) -> Result<Option<Document>, ActionError> {
        let id = request.id_param()?;
        let attributes = request.body_object()?;
        Ok(self.controller.update(id, attributes).await?)
    }

    async fn try_update_or_create(
        &self,
        request: &ActionRequest,
    ) -> Result<Document, ActionError> {
        let query = Query::from_object(request.query.clone());
        let attributes = request.body_object()?;
        Ok(self.controller.update_or_create(query, attributes).await?)
    }

    async fn try_delete(&self, request: &ActionRequest) -> Result<DeleteResult, ActionError> {
        let id = request.id_param()?;
        Ok(self.controller.delete(id).await?)
    }
}
