/// REST client for a remote board store.
///
/// Speaks the `/v1/...` JSON contract served by `kanban-backend`.
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{BoardStore, StoreError};
use crate::config::ClientConfig;
use crate::order::{OrderMap, OrderPatch};
use crate::types::{Card, CardId, ColumnRecord};

pub struct HttpStore {
    client: Client,
    endpoint: String,
}

impl HttpStore {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.endpoint, path)
    }

    async fn send(&self, method: Method, url: String, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("{} {}: {}", method, url, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            method: method.to_string(),
            url,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl serde::Serialize + Sync)>,
    ) -> Result<T, StoreError> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(method, url.clone(), request).await?;
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(format!("{}: {}", url, e)))?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl BoardStore for HttpStore {
    async fn load_columns(&self) -> Result<Vec<ColumnRecord>, StoreError> {
        self.request(Method::GET, "columns", None::<&()>).await
    }

    async fn load_cards(&self) -> Result<Vec<Card>, StoreError> {
        self.request(Method::GET, "cards", None::<&()>).await
    }

    async fn load_order(&self) -> Result<OrderMap, StoreError> {
        self.request(Method::GET, "cardsOrder", None::<&()>).await
    }

    async fn create_card(&self, card: &Card) -> Result<Card, StoreError> {
        self.request(Method::POST, "cards", Some(card)).await
    }

    async fn delete_card(&self, id: &CardId) -> Result<(), StoreError> {
        let path = format!("cards/{}", utf8_percent_encode(id.as_str(), NON_ALPHANUMERIC));
        let _: serde_json::Value = self.request(Method::DELETE, &path, None::<&()>).await?;
        Ok(())
    }

    async fn patch_order(&self, patch: &OrderPatch) -> Result<OrderMap, StoreError> {
        self.request(Method::PATCH, "cardsOrder", Some(patch)).await
    }
}
