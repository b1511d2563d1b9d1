//! # HTTP Client
//!
//! `reqwest`-backed implementation of the collaborator traits.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HttpApi::post("/transactions", body)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reqwest::Client ── JSON body ──► {base_url}/transactions               │
//! │       │                                                                 │
//! │       ├── transport failure ──► ApiError::Network                       │
//! │       ├── non-2xx status ─────► ApiError::Status (body preserved)       │
//! │       └── 2xx ────────────────► decode JSON or ApiError::Decode         │
//! │                                                                         │
//! │  No retry, no backoff: one call per invocation.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use duka_core::types::ProductSnapshot;

use crate::error::{ApiError, ApiResult};
use crate::gateway::{CatalogSource, DeviceGateway, NotificationStore, TransactionGateway};
use crate::payload::{NotificationRecord, PairedDevice, TransactionRequest, TransactionResponse};

// =============================================================================
// HttpApi
// =============================================================================

/// HTTP client for the remote POS API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Creates a client against the given base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(HttpApi {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Generic GET returning a decoded JSON body.
    async fn get<T>(&self, path: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        debug!(path = %path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        Self::decode(&format!("GET {}", path), response).await
    }

    /// Generic POST with a JSON body, returning a decoded JSON body.
    async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        debug!(path = %path, "POST");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(&format!("POST {}", path), response).await
    }

    /// POST where the caller does not need the response body.
    async fn post_ignore_body<B>(&self, path: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize + Sync,
    {
        debug!(path = %path, "POST");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::check_status(&format!("POST {}", path), response).await?;
        Ok(())
    }

    async fn check_status(
        endpoint: &str,
        response: reqwest::Response,
    ) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T>(endpoint: &str, response: reqwest::Response) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = Self::check_status(endpoint, response).await?;
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

#[async_trait]
impl CatalogSource for HttpApi {
    async fn fetch_products(&self) -> ApiResult<Vec<ProductSnapshot>> {
        self.get("/products").await
    }
}

#[async_trait]
impl TransactionGateway for HttpApi {
    async fn submit(&self, request: &TransactionRequest) -> ApiResult<TransactionResponse> {
        self.post("/transactions", request).await
    }
}

#[async_trait]
impl NotificationStore for HttpApi {
    async fn persist(&self, record: &NotificationRecord) -> ApiResult<()> {
        self.post_ignore_body("/notifications", record).await
    }
}

#[async_trait]
impl DeviceGateway for HttpApi {
    async fn fetch_devices(&self) -> ApiResult<Vec<PairedDevice>> {
        self.get("/devices").await
    }

    async fn revoke_device(&self, device_id: &str) -> ApiResult<()> {
        self.post_ignore_body(&format!("/devices/{}/revoke", device_id), &serde_json::json!({}))
            .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpApi::new("https://pos.example.com/api/", Duration::from_secs(10)).unwrap();
        assert_eq!(
            api.url("/products"),
            "https://pos.example.com/api/products"
        );
    }
}
