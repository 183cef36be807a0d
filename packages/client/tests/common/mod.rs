// ABOUTME: Shared fixtures for client integration tests
// ABOUTME: A stateful in-memory fake of the task API served through wiremock

#![allow(dead_code)]

use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::{matchers::any, Mock, MockServer, Request, Respond, ResponseTemplate};

use taskmaster_client::{
    ClientConfig, ClientConfigBuilder, MemorySessionStore, SessionManager, SessionStore,
    StoredSession, TaskClient,
};
use taskmaster_core::datetime::parse_timestamp;

pub const EMAIL: &str = "user@example.com";
pub const PASSWORD: &str = "secret";
pub const USERNAME: &str = "milkman";
pub const TOKEN: &str = "test-token";

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfigBuilder::new()
        .api_url(server.uri())
        .request_timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Manager and client against `server`, persisting into `store`
pub async fn connect_with(
    server: &MockServer,
    store: Arc<dyn SessionStore>,
) -> (Arc<SessionManager>, TaskClient) {
    let session = Arc::new(
        SessionManager::restore(&config_for(server), store)
            .await
            .unwrap(),
    );
    let client = TaskClient::new(session.clone());
    (session, client)
}

/// Manager and client that start out signed in with [`TOKEN`]
pub async fn signed_in(server: &MockServer) -> (Arc<SessionManager>, TaskClient) {
    let store = MemorySessionStore::with_session(StoredSession {
        token: Some(TOKEN.to_string()),
        user_email: Some(EMAIL.to_string()),
        username: Some(USERNAME.to_string()),
    });
    connect_with(server, Arc::new(store)).await
}

pub fn task_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "tags": null,
        "status": "todo",
        "done": false,
        "archived": false,
        "owner_id": 1,
        "created_at": "2024-04-30T08:00:00",
        "due_date": null,
        "completed_at": null
    })
}

#[derive(Default)]
struct FakeState {
    next_id: i64,
    tasks: Vec<Value>,
}

/// Behaves like the real API for the routes the client uses
#[derive(Clone, Default)]
pub struct FakeTaskApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTaskApi {
    pub async fn start() -> (MockServer, FakeTaskApi) {
        let server = MockServer::start().await;
        let api = FakeTaskApi::default();
        Mock::given(any())
            .respond_with(api.clone())
            .mount(&server)
            .await;
        (server, api)
    }

    pub fn task_count(&self) -> usize {
        self.state.lock().unwrap().tasks.len()
    }

    fn error(status: u16, detail: &str) -> ResponseTemplate {
        ResponseTemplate::new(status).set_body_json(json!({ "detail": detail }))
    }

    fn token(request: &Request) -> ResponseTemplate {
        let form: Map<String, Value> = url::form_urlencoded::parse(&request.body)
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect();

        if form.get("username") == Some(&json!(EMAIL)) && form.get("password") == Some(&json!(PASSWORD)) {
            ResponseTemplate::new(200).set_body_json(json!({
                "access_token": TOKEN,
                "token_type": "bearer",
                "username": USERNAME
            }))
        } else {
            Self::error(401, "Invalid credentials")
        }
    }

    fn authorized(request: &Request) -> bool {
        request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", TOKEN))
            .unwrap_or(false)
    }

    fn query_flag(request: &Request, name: &str, default: bool) -> bool {
        request
            .url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v == "true")
            .unwrap_or(default)
    }

    /// Server stores naive UTC datetimes and echoes them without an offset
    fn naive(value: &Value) -> Value {
        match value.as_str().and_then(parse_timestamp) {
            Some(dt) => json!(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => Value::Null,
        }
    }

    fn tasks_route(&self, request: &Request, segments: &[&str]) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let method = request.method.as_str();

        match (method, segments) {
            ("GET", []) => {
                let archived = Self::query_flag(request, "archived", false);
                let tasks: Vec<Value> = state
                    .tasks
                    .iter()
                    .filter(|t| t["archived"] == json!(archived))
                    .cloned()
                    .collect();
                ResponseTemplate::new(200).set_body_json(tasks)
            }
            ("POST", []) => {
                let body: Value = match serde_json::from_slice(&request.body) {
                    Ok(body) => body,
                    Err(_) => return Self::error(422, "Invalid body"),
                };
                state.next_id += 1;
                let mut task = task_json(state.next_id, body["title"].as_str().unwrap_or_default());
                task["description"] = body["description"].clone();
                task["tags"] = body["tags"].clone();
                task["due_date"] = Self::naive(&body["due_date"]);
                state.tasks.push(task.clone());
                ResponseTemplate::new(200).set_body_json(task)
            }
            ("POST", ["search"]) => {
                let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
                let query = body["query"].as_str().unwrap_or_default().to_lowercase();
                let archived = body["archived"].as_bool();
                let tasks: Vec<Value> = state
                    .tasks
                    .iter()
                    .filter(|t| archived.map(|a| t["archived"] == json!(a)).unwrap_or(true))
                    .filter(|t| {
                        let title = t["title"].as_str().unwrap_or_default().to_lowercase();
                        let description = t["description"].as_str().unwrap_or_default().to_lowercase();
                        title.contains(&query) || description.contains(&query)
                    })
                    .cloned()
                    .collect();
                ResponseTemplate::new(200).set_body_json(tasks)
            }
            (_, [id, rest @ ..]) => {
                let id: i64 = match id.parse() {
                    Ok(id) => id,
                    Err(_) => return Self::error(422, "Invalid task id"),
                };
                let index = match state.tasks.iter().position(|t| t["id"] == json!(id)) {
                    Some(index) => index,
                    None => return Self::error(404, "Task not found"),
                };

                match (method, rest) {
                    ("GET", []) => ResponseTemplate::new(200).set_body_json(state.tasks[index].clone()),
                    ("PUT", []) => {
                        let body: Map<String, Value> =
                            serde_json::from_slice(&request.body).unwrap_or_default();
                        let task = &mut state.tasks[index];
                        for (key, value) in body {
                            let value = if key == "due_date" { Self::naive(&value) } else { value };
                            task[key.as_str()] = value;
                        }
                        if task["status"] == json!("done") {
                            task["done"] = json!(true);
                            task["completed_at"] = json!("2024-05-02T09:00:00");
                        }
                        ResponseTemplate::new(200).set_body_json(task.clone())
                    }
                    ("DELETE", []) => {
                        let task = state.tasks.remove(index);
                        ResponseTemplate::new(200).set_body_json(task)
                    }
                    ("POST", ["archive"]) => {
                        let archive = Self::query_flag(request, "archive", true);
                        let task = &mut state.tasks[index];
                        task["archived"] = json!(archive);
                        ResponseTemplate::new(200).set_body_json(task.clone())
                    }
                    _ => Self::error(405, "Method Not Allowed"),
                }
            }
            _ => Self::error(405, "Method Not Allowed"),
        }
    }
}

impl Respond for FakeTaskApi {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let segments: Vec<&str> = request
            .url
            .path()
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["token"]) => Self::token(request),
            ("POST", ["signup"]) => {
                let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
                ResponseTemplate::new(200).set_body_json(json!({
                    "id": 1,
                    "email": body["email"],
                    "username": body["username"],
                    "tasks": []
                }))
            }
            (_, ["tasks", rest @ ..]) => {
                if !Self::authorized(request) {
                    return Self::error(401, "Not authenticated");
                }
                self.tasks_route(request, rest)
            }
            _ => Self::error(404, "Not Found"),
        }
    }
}
