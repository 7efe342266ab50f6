//! Persistence over the listsync HTTP API.

use crate::error::{failure_for_status, ClientError, Result};
use crate::service::PersistenceService;
use async_trait::async_trait;
use listsync_engine::{Ack, ApiResponse, Outcome, Task, TaskData, TodoPayload, TodoRecord};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Request timeout used unless the builder overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to a `listsync-server` instance.
#[derive(Debug, Clone)]
pub struct HttpPersistence {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// Builder for [`HttpPersistence`].
#[derive(Debug, Clone)]
pub struct HttpPersistenceBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpPersistenceBuilder {
    /// Bearer token identifying the user. Without one, the session is
    /// anonymous.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpPersistence> {
        let client = Client::builder().timeout(self.timeout).build()?;
        Ok(HttpPersistence {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            token: self.token,
        })
    }
}

impl HttpPersistence {
    pub fn builder(base_url: impl Into<String>) -> HttpPersistenceBuilder {
        HttpPersistenceBuilder {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn todo_url(&self, id: &str) -> String {
        self.url(&format!("/todos/{id}"))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a mutating request and read the `{success, message}` envelope.
    async fn mutate(&self, request: RequestBuilder) -> Outcome {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(ClientError::from)?;
        let status = response.status().as_u16();
        let body: ApiResponse = decode(response).await?;

        tracing::debug!(status, success = body.success, "mutation answered");

        if (200..300).contains(&status) && body.success {
            let ack = Ack::new(body.message);
            Ok(match body.todo {
                Some(todo) => ack.with_record(todo.into()),
                None => ack,
            })
        } else {
            Err(failure_for_status(status, body.message))
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl PersistenceService for HttpPersistence {
    async fn list(&self) -> Result<Vec<Task>> {
        let response = self
            .authorize(self.client.get(self.url("/todos")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = decode::<ApiResponse>(response)
                .await
                .map(|body| body.message)
                .unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let records: Vec<TodoRecord> = decode(response).await?;
        Ok(records.into_iter().map(Task::from).collect())
    }

    async fn create(&self, data: TaskData) -> Outcome {
        let request = self
            .client
            .post(self.url("/todos"))
            .json(&TodoPayload::from(data));
        self.mutate(request).await
    }

    async fn update(&self, id: &str, data: TaskData) -> Outcome {
        let request = self
            .client
            .put(self.todo_url(id))
            .json(&TodoPayload::from(data));
        self.mutate(request).await
    }

    async fn delete(&self, id: &str) -> Outcome {
        self.mutate(self.client.delete(self.todo_url(id))).await
    }
}
