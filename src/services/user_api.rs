use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::models::{UserId, UserPayload};
use crate::utils::ApiError;

/// The user backend, as seen by the directory client.
///
/// List and create hand back raw JSON so that the caller decides how to
/// treat partial or malformed records.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// `GET /users`
    async fn list_users(&self) -> Result<Vec<Value>, ApiError>;
    /// `POST /add-user`
    async fn add_user(&self, payload: &UserPayload) -> Result<Value, ApiError>;
    /// `PUT /update-user/{id}`
    async fn update_user(&self, id: &UserId, payload: &UserPayload) -> Result<(), ApiError>;
    /// `DELETE /delete-user?id={id}`
    async fn delete_user(&self, id: &UserId) -> Result<(), ApiError>;
}

#[async_trait]
impl<T: UserApi + ?Sized> UserApi for Box<T> {
    async fn list_users(&self) -> Result<Vec<Value>, ApiError> {
        (**self).list_users().await
    }

    async fn add_user(&self, payload: &UserPayload) -> Result<Value, ApiError> {
        (**self).add_user(payload).await
    }

    async fn update_user(&self, id: &UserId, payload: &UserPayload) -> Result<(), ApiError> {
        (**self).update_user(id, payload).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), ApiError> {
        (**self).delete_user(id).await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// reqwest-backed [`UserApi`].
#[derive(Clone)]
pub struct HttpUserApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Passes 2xx responses through; turns anything else into
    /// `ApiError::Backend`, picking up the `error` field when the body has one.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|msg| !msg.trim().is_empty());

        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Network(format!("Request timed out: {}", e))
    } else {
        ApiError::Network(e.to_string())
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn list_users(&self) -> Result<Vec<Value>, ApiError> {
        log::info!("👥 Fetching users from {}", self.base_url);

        let response = self
            .client
            .get(self.url("/users"))
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        let users: Vec<Value> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("Failed to parse user list: {}", e)))?;

        log::info!("✅ Received {} user records", users.len());
        Ok(users)
    }

    async fn add_user(&self, payload: &UserPayload) -> Result<Value, ApiError> {
        log::info!("➕ Adding user '{}'", payload.username);

        let response = self
            .client
            .post(self.url("/add-user"))
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("Failed to parse created user: {}", e)))
    }

    async fn update_user(&self, id: &UserId, payload: &UserPayload) -> Result<(), ApiError> {
        log::info!("✏️  Updating user {}", id);

        let path = format!("/update-user/{}", urlencoding::encode(&id.to_string()));
        let response = self
            .client
            .put(self.url(&path))
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), ApiError> {
        log::info!("🗑️  Deleting user {}", id);

        let path = format!("/delete-user?id={}", urlencoding::encode(&id.to_string()));
        let response = self
            .client
            .delete(self.url(&path))
            .send()
            .await
            .map_err(transport_error)?;
        Self::check_status(response).await?;
        Ok(())
    }
}
