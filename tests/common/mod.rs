#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::Notify;

use brew_console::config::ConsoleConfig;
use brew_console::models::user::{LoginRequest, LoginResponse, StaffProfile};
use brew_console::session::{Authenticator, Claims, FileStorage, HttpAuthenticator, MemoryStorage};
use brew_console::{AppError, AppResult, Console};

/// Accounts known to the mock backend: (username, password, id, role).
pub const ACCOUNTS: &[(&str, &str, i64, &str)] = &[
    ("owner", "owner123", 1, "owner"),
    ("manager", "manager123", 2, "store_manager"),
    ("shift_lead", "shift123", 3, "shift_manager"),
    ("barista", "barista123", 4, "barista"),
    ("ghost", "ghost123", 5, "head_chef"),
    ("revoked", "revoked123", 6, "store_manager"),
    ("stale", "stale123", 7, "store_manager"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Value,
}

#[derive(Default)]
pub struct MockState {
    pub products: Mutex<Vec<Value>>,
    /// Every request that reached the server, login included.
    pub hits: AtomicUsize,
    pub requests: Mutex<Vec<Recorded>>,
    /// When set, `GET /products` waits for `release` after signalling `entered`.
    pub hold_products: AtomicBool,
    pub entered: Notify,
    pub release: Notify,
}

impl MockState {
    fn record(&self, method: &str, path: String, body: Value) {
        self.requests.lock().unwrap().push(Recorded {
            method: method.to_string(),
            path,
            body,
        });
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

fn seed_products() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Espresso", "price": 2.5, "category": "coffee", "specialtyItem": false, "limitedTimeOffer": false, "availability": true}),
        json!({"id": 2, "name": "Matcha Latte", "price": 4.75, "category": "tea", "specialtyItem": true, "limitedTimeOffer": false, "availability": false}),
    ]
}

fn authorized(headers: &HeaderMap) -> Result<String, Response> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    match token {
        Some(token) if token.starts_with("tok-") && token != "tok-revoked" => Ok(token),
        _ => Err((StatusCode::UNAUTHORIZED, Json(json!({"message": "invalid token"}))).into_response()),
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    match ACCOUNTS.iter().find(|(u, p, _, _)| *u == username && *p == password) {
        Some((username, _, id, role)) => Json(json!({
            "token": token_for(username),
            "staff": {"id": id, "username": username, "role": role, "shift": "morning"}
        }))
        .into_response(),
        None => (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid credentials"}))).into_response(),
    }
}

/// `stale` gets a JWT that expired an hour ago; everyone else an opaque token.
fn token_for(username: &str) -> String {
    if username != "stale" {
        return format!("tok-{username}");
    }
    let claims = Claims {
        exp: Some(chrono::Utc::now().timestamp() - 3600),
        iat: None,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"mock-secret"),
    )
    .unwrap()
}

async fn count_requests(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

/// Records the call and answers `200` with `reply`.
fn accept(state: &MockState, headers: &HeaderMap, method: &str, path: String, body: Value, reply: Value) -> Response {
    if let Err(rejection) = authorized(headers) {
        return rejection;
    }
    state.record(method, path, body);
    Json(reply).into_response()
}

async fn create_product(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut created = body.clone();
    created["id"] = json!(3);
    created["availability"] = json!(true);
    accept(&state, &headers, "POST", "/products".into(), body, created)
}

async fn list_inventory(headers: HeaderMap) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    Json(json!([
        {"id": 1, "name": "Oat milk", "category": "dairy", "quantity": 2.0, "unit": "l", "reorderLevel": 5.0},
        {"id": 2, "name": "Arabica beans", "category": "coffee", "quantity": 40.0, "unit": "kg", "reorderLevel": 10.0}
    ]))
    .into_response()
}

async fn create_inventory(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut created = body.clone();
    created["id"] = json!(3);
    accept(&state, &headers, "POST", "/inventory".into(), body, created)
}

async fn put_inventory(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let reply = body.clone();
    accept(&state, &headers, "PUT", format!("/inventory/{id}"), body, reply)
}

async fn delete_inventory(State(state): State<Arc<MockState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    accept(&state, &headers, "DELETE", format!("/inventory/{id}"), Value::Null, Value::Null)
}

async fn delete_staff(State(state): State<Arc<MockState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    accept(&state, &headers, "DELETE", format!("/staff/{id}"), Value::Null, Value::Null)
}

async fn put_settings(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let reply = body.clone();
    accept(&state, &headers, "PUT", "/settings".into(), body, reply)
}

async fn list_products(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    if state.hold_products.load(Ordering::SeqCst) {
        state.entered.notify_one();
        state.release.notified().await;
    }
    let products = state.products.lock().unwrap().clone();
    Json(Value::Array(products)).into_response()
}

async fn get_product(State(state): State<Arc<MockState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let products = state.products.lock().unwrap();
    match products.iter().find(|p| p["id"] == id) {
        Some(product) => Json(product.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Product not found"}))).into_response(),
    }
}

async fn put_product(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    state.record("PUT", format!("/products/{id}"), body);
    StatusCode::OK.into_response()
}

async fn delete_product(State(state): State<Arc<MockState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    state.record("DELETE", format!("/products/{id}"), Value::Null);
    state.products.lock().unwrap().retain(|p| p["id"] != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn patch_details(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    state.record("PATCH", format!("/products/{id}/details"), body);
    StatusCode::OK.into_response()
}

async fn patch_availability(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    state.record("PATCH", format!("/products/{id}/availability"), body);
    StatusCode::OK.into_response()
}

async fn list_staff(headers: HeaderMap) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let staff: Vec<Value> = ACCOUNTS
        .iter()
        .map(|(username, _, id, role)| json!({"id": id, "username": username, "role": role}))
        .collect();
    Json(Value::Array(staff)).into_response()
}

async fn put_staff(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    state.record("PUT", format!("/staff/{id}"), body.clone());
    Json(json!({"id": id, "username": body["username"], "role": body["role"]})).into_response()
}

async fn broken_settings(headers: HeaderMap) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "settings store unavailable"}))).into_response()
}

impl MockBackend {
    pub async fn start() -> Result<Self> {
        let state = Arc::new(MockState::default());
        *state.products.lock().unwrap() = seed_products();

        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/products", get(list_products).post(create_product))
            .route("/products/:id", get(get_product).put(put_product).delete(delete_product))
            .route("/products/:id/details", patch(patch_details))
            .route("/products/:id/availability", patch(patch_availability))
            .route("/staff", get(list_staff))
            .route("/staff/:id", put(put_staff).delete(delete_staff))
            .route("/inventory", get(list_inventory).post(create_inventory))
            .route("/inventory/:id", put(put_inventory).delete(delete_inventory))
            .route("/settings", get(broken_settings).put(put_settings))
            .layer(middleware::from_fn_with_state(state.clone(), count_requests))
            .with_state(state.clone());
        let app = Router::new().nest("/api", api);

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app.into_make_service()).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}/api"),
            state,
        })
    }

    /// A console wired to this backend with file storage under `dir`.
    pub fn console(&self, dir: &TempDir) -> Result<Console> {
        let config = ConsoleConfig::new(self.base_url.clone(), dir.path().join("session"));
        let storage = Arc::new(FileStorage::new(config.session_dir.clone()));
        let authenticator = Arc::new(HttpAuthenticator::new(&config)?);
        let console = Console::new(config, storage, authenticator)?;
        console.sessions.restore();
        Ok(console)
    }
}

/// Signs in anyone whose username is a role name, with that role.
pub struct RoleNameAuthenticator;

#[async_trait]
impl Authenticator for RoleNameAuthenticator {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        if request.password != "pw" {
            return Err(AppError::authentication("bad password"));
        }
        Ok(LoginResponse {
            token: Some(format!("tok-{}", request.username)),
            staff: StaffProfile {
                id: Some(10),
                username: request.username.clone(),
                role: request.username.clone(),
            },
        })
    }
}

/// Console that never touches the network.
pub fn offline_console() -> Result<Console> {
    let config = ConsoleConfig::new("http://127.0.0.1:9/api", "unused");
    Ok(Console::new(
        config,
        Arc::new(MemoryStorage::new()),
        Arc::new(RoleNameAuthenticator),
    )?)
}

pub async fn offline_console_as(role: &str) -> Result<Console> {
    let console = offline_console()?;
    console.sessions.sign_in(role, "pw").await?;
    Ok(console)
}
