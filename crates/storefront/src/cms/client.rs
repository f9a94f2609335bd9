//! REST client for the Strapi content API.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::{CmsError, CollectionResponse, Query, RetryPolicy, SingleResponse};
use crate::config::CmsConfig;

/// Client for the Strapi REST API.
///
/// Reads are cached for the configured TTL (5 minutes by default); any
/// write clears the cache. Every request is retried per [`RetryPolicy`].
#[derive(Clone)]
pub struct CmsClient {
    inner: Arc<CmsClientInner>,
}

struct CmsClientInner {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<SecretString>,
    cache: Cache<String, Value>,
    retry: RetryPolicy,
}

impl CmsClient {
    /// Create a new content API client.
    #[must_use]
    pub fn new(config: &CmsConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CmsClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                api_token: config.api_token.clone(),
                cache,
                retry: RetryPolicy::from_config(config),
            }),
        }
    }

    /// Base URL without a trailing slash, used to resolve media paths.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.inner.retry
    }

    fn url(&self, path: &str, query: Option<&Query>) -> String {
        let mut url = format!("{}/api/{path}", self.inner.base_url);
        if let Some(query) = query
            && !query.is_empty()
        {
            url.push('?');
            url.push_str(&query.to_query_string());
        }
        url
    }

    /// Send one request and return the decoded JSON body.
    ///
    /// Empty bodies (204 on delete) decode to `Value::Null`.
    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, CmsError> {
        let mut request = self.inner.client.request(method, url);

        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CmsError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "CMS returned non-success status"
            );
            return Err(CmsError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        if response_text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse CMS response"
            );
            CmsError::Parse(e)
        })
    }

    async fn request(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, CmsError> {
        self.inner
            .retry
            .run(|| self.send(method.clone(), url, body))
            .await
    }

    /// Cached GET.
    async fn get(&self, url: String) -> Result<Value, CmsError> {
        if let Some(value) = self.inner.cache.get(&url).await {
            debug!(url = %url, "Cache hit");
            return Ok(value);
        }

        let value = self.request(Method::GET, &url, None).await?;
        self.inner.cache.insert(url, value.clone()).await;
        Ok(value)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetch a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if every attempt fails or the body does not decode
    /// as a collection of `T`.
    #[instrument(skip(self, query), fields(collection = %collection))]
    pub async fn find<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<CollectionResponse<T>, CmsError> {
        let value = self.get(self.url(collection, Some(query))).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch one entry by document id (or numeric id on older backends).
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::NotFound`] if the entry does not exist, or any
    /// transport/decoding error.
    #[instrument(skip(self, query), fields(collection = %collection, id = %id))]
    pub async fn find_one<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        query: &Query,
    ) -> Result<T, CmsError> {
        let path = format!("{collection}/{}", urlencoding::encode(id));
        let value = self.get(self.url(&path, Some(query))).await?;

        let response: SingleResponse<Option<T>> = serde_json::from_value(value)?;
        response
            .data
            .ok_or_else(|| CmsError::NotFound(format!("{collection}/{id}")))
    }

    /// Fetch a single type such as `footer-content`.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::NotFound`] if the single type is missing or
    /// empty, or any transport/decoding error.
    #[instrument(skip(self, query), fields(single_type = %name))]
    pub async fn find_single<T: DeserializeOwned>(
        &self,
        name: &str,
        query: &Query,
    ) -> Result<T, CmsError> {
        let value = self.get(self.url(name, Some(query))).await?;

        let response: SingleResponse<Option<T>> = serde_json::from_value(value)?;
        response
            .data
            .ok_or_else(|| CmsError::NotFound(name.to_string()))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create an entry. `data` is sent wrapped as `{ "data": ... }`.
    ///
    /// # Errors
    ///
    /// Returns an error if every attempt fails or the created entry does not
    /// decode as `T`.
    #[instrument(skip(self, data), fields(collection = %collection))]
    pub async fn create<T: DeserializeOwned>(
        &self,
        collection: &str,
        data: &Value,
    ) -> Result<T, CmsError> {
        let body = json!({ "data": data });
        let value = self
            .request(Method::POST, &self.url(collection, None), Some(&body))
            .await?;
        self.invalidate_cache();

        let response: SingleResponse<T> = serde_json::from_value(value)?;
        Ok(response.data)
    }

    /// Update an entry. `data` is sent wrapped as `{ "data": ... }`.
    ///
    /// # Errors
    ///
    /// Returns an error if every attempt fails or the updated entry does not
    /// decode as `T`.
    #[instrument(skip(self, data), fields(collection = %collection, id = %id))]
    pub async fn update<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        data: &Value,
    ) -> Result<T, CmsError> {
        let path = format!("{collection}/{}", urlencoding::encode(id));
        let body = json!({ "data": data });
        let value = self
            .request(Method::PUT, &self.url(&path, None), Some(&body))
            .await?;
        self.invalidate_cache();

        let response: SingleResponse<T> = serde_json::from_value(value)?;
        Ok(response.data)
    }

    /// Delete an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if every attempt fails.
    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), CmsError> {
        let path = format!("{collection}/{}", urlencoding::encode(id));
        self.request(Method::DELETE, &self.url(&path, None), None)
            .await?;
        self.invalidate_cache();
        Ok(())
    }

    // =========================================================================
    // Misc
    // =========================================================================

    /// Drop every cached read.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Check that the backend answers, without retrying.
    ///
    /// # Errors
    ///
    /// Returns an error if the health endpoint is unreachable or unhealthy.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), CmsError> {
        let url = format!("{}/_health", self.inner.base_url);
        self.send(Method::GET, &url, None).await.map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use url::Url;

    fn client(base: &str) -> CmsClient {
        let mut config = CmsConfig::new(Url::parse(base).unwrap());
        config.retry_base_delay = Duration::from_millis(1);
        CmsClient::new(&config)
    }

    #[test]
    fn test_base_url_trims_slash() {
        let client = client("http://localhost:1337/");
        assert_eq!(client.base_url(), "http://localhost:1337");
    }

    #[test]
    fn test_url_with_query() {
        let client = client("http://localhost:1337");
        let query = Query::new().populate_fields(["logo"]);
        assert_eq!(
            client.url("local-partners", Some(&query)),
            "http://localhost:1337/api/local-partners?populate[0]=logo"
        );
        assert_eq!(
            client.url("infos", Some(&Query::new())),
            "http://localhost:1337/api/infos"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        // Port 9 (discard) on loopback is closed in test environments
        let client = client("http://127.0.0.1:9");
        let result = client.find::<Value>("products", &Query::new()).await;
        assert!(matches!(result, Err(CmsError::Http(_))));
    }
}
