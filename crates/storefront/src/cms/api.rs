//! Degrade-to-default wrapper over [`CmsClient`].
//!
//! Page handlers must render even when the backend is down, so every
//! method here returns data (possibly empty) plus an optional [`ApiError`].
//! Failures are logged and queued as a visitor notification.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{CmsClient, CmsError, Query};
use crate::services::notifications::{Notification, Notifications};

/// Display time of load error notifications, in milliseconds.
const ERROR_TIMEOUT_MS: u64 = 8000;

/// Where and how a call failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorDetails {
    pub operation: String,
    pub original_error: String,
}

/// User-facing rendition of a [`CmsError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub details: ApiErrorDetails,
}

impl ApiError {
    #[must_use]
    pub fn from_cms(error: &CmsError, operation: &str) -> Self {
        Self {
            message: error.user_message(),
            status: error.status().unwrap_or(500),
            details: ApiErrorDetails {
                operation: operation.to_string(),
                original_error: error.to_string(),
            },
        }
    }
}

/// Result of a [`ContentApi`] call: always some data, maybe an error.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    #[must_use]
    pub const fn failed(data: T, error: ApiError) -> Self {
        Self {
            data,
            error: Some(error),
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

/// Content API with error handling and visitor notifications.
#[derive(Clone)]
pub struct ContentApi {
    client: CmsClient,
    notifications: Option<Notifications>,
    notify_success: bool,
}

impl ContentApi {
    #[must_use]
    pub const fn new(client: CmsClient) -> Self {
        Self {
            client,
            notifications: None,
            notify_success: true,
        }
    }

    /// Queue notifications for the visitor owning `notifications`.
    #[must_use]
    pub fn with_notifications(mut self, notifications: Notifications) -> Self {
        self.notifications = Some(notifications);
        self
    }

    /// Skip the generic success notification after writes. Errors are
    /// still reported.
    #[must_use]
    pub const fn quiet_success(mut self) -> Self {
        self.notify_success = false;
        self
    }

    #[must_use]
    pub const fn client(&self) -> &CmsClient {
        &self.client
    }

    async fn notify(&self, notification: Notification) {
        if let Some(notifications) = &self.notifications {
            notifications.push(notification).await;
        }
    }

    async fn notify_success(&self, description: &str) {
        if self.notify_success {
            self.notify(Notification::success("Succès", description))
                .await;
        }
    }

    async fn handle_error(&self, error: &CmsError, operation: &str) -> ApiError {
        tracing::error!(operation = %operation, error = %error, "Content API call failed");

        let api_error = ApiError::from_cms(error, operation);
        self.notify(
            Notification::error("Erreur de chargement", api_error.message.clone())
                .with_timeout(ERROR_TIMEOUT_MS),
        )
        .await;
        api_error
    }

    /// Fetch a collection, or an empty list on failure.
    pub async fn fetch_entities<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &Query,
    ) -> ApiResponse<Vec<T>> {
        match self.client.find::<T>(collection, query).await {
            Ok(response) => ApiResponse::ok(response.data),
            Err(e) => {
                let error = self
                    .handle_error(&e, &format!("fetchEntities({collection})"))
                    .await;
                ApiResponse::failed(Vec::new(), error)
            }
        }
    }

    /// Fetch one entry, or `None` on failure.
    pub async fn fetch_entity<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        query: &Query,
    ) -> ApiResponse<Option<T>> {
        match self.client.find_one::<T>(collection, id, query).await {
            Ok(entity) => ApiResponse::ok(Some(entity)),
            Err(e) => {
                let error = self
                    .handle_error(&e, &format!("fetchEntity({collection}/{id})"))
                    .await;
                ApiResponse::failed(None, error)
            }
        }
    }

    /// Create an entry. `data` must be a JSON object.
    pub async fn create_entity<T: DeserializeOwned>(
        &self,
        collection: &str,
        data: &Value,
    ) -> ApiResponse<Option<T>> {
        let operation = format!("createEntity({collection})");

        if !data.is_object() {
            let e = CmsError::InvalidInput(
                "Les données sont requises pour créer une entité".to_string(),
            );
            let error = self.handle_error(&e, &operation).await;
            return ApiResponse::failed(None, error);
        }

        match self.client.create::<T>(collection, data).await {
            Ok(entity) => {
                self.notify_success("Élément créé avec succès").await;
                ApiResponse::ok(Some(entity))
            }
            Err(e) => {
                let error = self.handle_error(&e, &operation).await;
                ApiResponse::failed(None, error)
            }
        }
    }

    /// Update an entry. `data` must be a JSON object.
    pub async fn update_entity<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        data: &Value,
    ) -> ApiResponse<Option<T>> {
        let operation = format!("updateEntity({collection}/{id})");

        if !data.is_object() {
            let e = CmsError::InvalidInput(
                "Les données sont requises pour mettre à jour une entité".to_string(),
            );
            let error = self.handle_error(&e, &operation).await;
            return ApiResponse::failed(None, error);
        }

        match self.client.update::<T>(collection, id, data).await {
            Ok(entity) => {
                self.notify_success("Élément mis à jour avec succès").await;
                ApiResponse::ok(Some(entity))
            }
            Err(e) => {
                let error = self.handle_error(&e, &operation).await;
                ApiResponse::failed(None, error)
            }
        }
    }

    /// Delete an entry. `data` is `true` when the backend confirmed it.
    pub async fn delete_entity(&self, collection: &str, id: &str) -> ApiResponse<bool> {
        match self.client.delete(collection, id).await {
            Ok(()) => {
                self.notify_success("Élément supprimé avec succès").await;
                ApiResponse::ok(true)
            }
            Err(e) => {
                let error = self
                    .handle_error(&e, &format!("deleteEntity({collection}/{id})"))
                    .await;
                ApiResponse::failed(false, error)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::CmsConfig;
    use food_en_k_core::Severity;
    use std::sync::Arc;
    use std::time::Duration;
    use tower_sessions::{MemoryStore, Session};
    use url::Url;

    fn api() -> (ContentApi, Notifications) {
        // Nothing listens on the discard port
        let mut config = CmsConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        config.retry_attempts = 2;
        config.retry_base_delay = Duration::from_millis(1);
        let notifications =
            Notifications::new(Session::new(None, Arc::new(MemoryStore::default()), None));
        let api = ContentApi::new(CmsClient::new(&config)).with_notifications(notifications.clone());
        (api, notifications)
    }

    #[test]
    fn test_api_error_from_cms() {
        let err = CmsError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        let api_error = ApiError::from_cms(&err, "fetchEntities(products)");
        assert_eq!(api_error.status, 502);
        assert_eq!(api_error.details.operation, "fetchEntities(products)");
        assert!(api_error.details.original_error.contains("bad gateway"));
    }

    #[test]
    fn test_api_error_defaults_to_500() {
        let err: CmsError = serde_json::from_str::<Value>("{").unwrap_err().into();
        assert_eq!(ApiError::from_cms(&err, "op").status, 500);
    }

    #[tokio::test]
    async fn test_fetch_entities_degrades_to_empty() {
        let (api, notifications) = api();
        let response = api
            .fetch_entities::<Value>("products", &Query::new())
            .await;

        assert!(response.data.is_empty());
        assert!(!response.is_ok());

        let queued = notifications.take().await;
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].title, "Erreur de chargement");
        assert_eq!(queued[0].kind, Severity::Error);
        assert_eq!(queued[0].timeout_ms, ERROR_TIMEOUT_MS);
    }

    #[tokio::test]
    async fn test_fetch_entity_degrades_to_none() {
        let (api, _) = api();
        let response = api
            .fetch_entity::<Value>("locations", "abc", &Query::new())
            .await;
        assert!(response.data.is_none());
        assert_eq!(
            response.error.unwrap().details.operation,
            "fetchEntity(locations/abc)"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_non_object() {
        let (api, notifications) = api();
        let response = api
            .create_entity::<Value>("contact-requests", &Value::String("x".into()))
            .await;

        let error = response.error.unwrap();
        assert_eq!(error.message, "Les données sont requises pour créer une entité");
        assert_eq!(error.status, 400);
        assert_eq!(notifications.take().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_rejects_non_object() {
        let (api, _) = api();
        let response = api
            .update_entity::<Value>("contact-requests", "1", &Value::Null)
            .await;
        assert_eq!(
            response.error.unwrap().message,
            "Les données sont requises pour mettre à jour une entité"
        );
    }

    #[tokio::test]
    async fn test_delete_failure_is_false() {
        let (api, _) = api();
        let response = api.delete_entity("contact-requests", "1").await;
        assert!(!response.data);
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_without_notifications_still_degrades() {
        let mut config = CmsConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        config.retry_attempts = 1;
        let api = ContentApi::new(CmsClient::new(&config));
        let response = api.fetch_entities::<Value>("infos", &Query::new()).await;
        assert!(response.data.is_empty());
    }
}
