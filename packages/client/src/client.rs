use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use taskmaster_core::{
    validate_task_create, validate_task_update, Task, TaskCreateInput, TaskId, TaskSearch,
    TaskUpdateInput,
};

use crate::error::{ClientError, ClientResult};
use crate::session::SessionManager;

/// Typed client for the task endpoints.
///
/// Every request carries `Authorization: Bearer <token>` while a session is
/// present. A 401 invalidates the session that sent the request. Each call
/// is one round trip: no retries, no caching. Dropping a returned future
/// cancels the request.
#[derive(Clone)]
pub struct TaskClient {
    session: Arc<SessionManager>,
}

impl TaskClient {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.session.api_url(), path)
    }

    /// Fetch tasks whose archived flag equals `archived`
    pub async fn list_tasks(&self, archived: bool) -> ClientResult<Vec<Task>> {
        let url = self.url("/tasks");
        debug!("GET {}?archived={}", url, archived);

        let request = self
            .session
            .http()
            .get(&url)
            .query(&[("archived", archived)]);
        self.send_json(request).await
    }

    pub async fn get_task(&self, id: TaskId) -> ClientResult<Task> {
        let url = self.url(&format!("/tasks/{}", id));
        debug!("GET {}", url);

        self.send_json(self.session.http().get(&url)).await
    }

    /// Create a task; the server assigns the id and the `todo` status
    pub async fn create_task(&self, input: &TaskCreateInput) -> ClientResult<Task> {
        validate_task_create(input)?;

        let url = self.url("/tasks");
        debug!("POST {}", url);

        self.send_json(self.session.http().post(&url).json(input)).await
    }

    /// Apply a partial update; fields left as `None` are not sent
    pub async fn update_task(&self, id: TaskId, patch: &TaskUpdateInput) -> ClientResult<Task> {
        validate_task_update(patch)?;

        let url = self.url(&format!("/tasks/{}", id));
        debug!("PUT {}", url);

        self.send_json(self.session.http().put(&url).json(patch)).await
    }

    /// Hard delete
    pub async fn delete_task(&self, id: TaskId) -> ClientResult<()> {
        let url = self.url(&format!("/tasks/{}", id));
        debug!("DELETE {}", url);

        self.send(self.session.http().delete(&url)).await?;
        Ok(())
    }

    /// Set the archived flag. The status is left alone.
    pub async fn archive_task(&self, id: TaskId, archive: bool) -> ClientResult<Task> {
        let url = self.url(&format!("/tasks/{}/archive", id));
        debug!("POST {}?archive={}", url, archive);

        let request = self
            .session
            .http()
            .post(&url)
            .query(&[("archive", archive)]);
        self.send_json(request).await
    }

    /// Mark a task done
    pub async fn complete_task(&self, id: TaskId) -> ClientResult<Task> {
        self.update_task(id, &TaskUpdateInput::complete()).await
    }

    /// Server-side search; results are returned unfiltered
    pub async fn search_tasks(&self, search: &TaskSearch) -> ClientResult<Vec<Task>> {
        let url = self.url("/tasks/search");
        debug!("POST {}", url);

        self.send_json(self.session.http().post(&url).json(search)).await
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let token = self.session.token().await;
        let request = match &token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(token) = &token {
                if let Err(e) = self.session.expire(token).await {
                    warn!("Failed to clear expired session: {}", e);
                }
            }
        }

        ensure_success(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        read_json(response).await
    }
}

/// Turn a non-2xx response into a server error carrying its detail
pub(crate) async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("Request failed with {}: {}", status, body);
    Err(ClientError::server(status, &body))
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
