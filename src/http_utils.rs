use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt;

use crate::cli_utils;
use crate::commands::errors::UserError;
use handled::Handle;

/// A failed request: either no response at all, or a non-success status.
#[derive(Debug)]
pub struct HttpError {
    status: Option<u16>,
    message: String,
}

impl HttpError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    async fn from_response(response: Response) -> Self {
        let status = response.status().as_u16();
        let error = response.text().await.unwrap_or_default();
        let message = if error.is_empty() {
            "No error details".to_string()
        } else {
            error
        };
        Self {
            status: Some(status),
            message,
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for HttpError {}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

/// HTTP client for the `/api/company` endpoints.
pub struct CompanyClient {
    client: Client,
    base_url: String,
}

impl CompanyClient {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Constructs a full API URL from a path
    pub fn api_url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/api/{}", self.base_url, path)
    }

    /// Makes a GET request and handles the response
    pub async fn get<T>(&self, path: &str) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Makes a GET request that may answer `204 No Content`
    pub async fn get_optional<T>(&self, path: &str) -> Result<Option<T>, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// Makes a POST request with JSON body and handles the response
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let response = self.client.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Makes a PATCH request with JSON body (no response body expected)
    pub async fn patch<B>(&self, path: &str, body: &B) -> Result<(), HttpError>
    where
        B: Serialize,
    {
        let url = self.api_url(path);
        let response = self.client.patch(&url).json(body).send().await?;
        Self::expect_success(response).await
    }

    /// Makes a PUT request with JSON body (no response body expected)
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<(), HttpError>
    where
        B: Serialize,
    {
        let url = self.api_url(path);
        let response = self.client.put(&url).json(body).send().await?;
        Self::expect_success(response).await
    }

    /// Makes a DELETE request and handles the response (no body expected)
    pub async fn delete(&self, path: &str) -> Result<(), HttpError> {
        let url = self.api_url(path);
        let response = self.client.delete(&url).send().await?;
        Self::expect_success(response).await
    }

    async fn expect_success(response: Response) -> Result<(), HttpError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(HttpError::from_response(response).await)
        }
    }

    /// Handles HTTP response, deserializing success or returning error
    async fn handle_response<T>(&self, response: Response) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(HttpError::from_response(response).await)
        }
    }
}

/// Execute an HTTP operation and exit on error with formatted message
pub async fn execute_or_exit<T, F, Fut>(operation: F, context: &str) -> T
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, HttpError>>,
{
    match operation().await {
        Ok(result) => result,
        Err(e) => match Handle::<UserError>::handle(&e) {
            Some(UserError {
                message,
                usage_hint: Some(hint),
            }) => cli_utils::exit_with_usage_error(&format!("{}: {}", context, message), &hint),
            Some(user_error) => {
                cli_utils::exit_with_error(&format!("{}: {}", context, user_error.message))
            }
            None => cli_utils::exit_with_error(&format!("{}: {}", context, e)),
        },
    }
}
