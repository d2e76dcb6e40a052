//! In-process stand-in for the card game API, just faithful enough to drive
//! every branch of the contract runner.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::{RwLock, oneshot};

const SESSION_COOKIE: &str = "sb-session";

#[derive(Clone, Debug)]
pub struct StubOptions {
    /// When false, signin answers 400 "Email not confirmed".
    pub confirm_email: bool,
    /// When true, `GET /api/cards` also returns paid cards.
    pub leak_paid_cards: bool,
    /// When false, the admin routes answer 403 for signed-in users.
    pub admin: bool,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            confirm_email: true,
            leak_paid_cards: false,
            admin: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct StubData {
    pub users: HashMap<String, StubUser>,
    pub sessions: HashMap<String, String>,
    pub draws: Vec<Value>,
    pub cards: Vec<Value>,
    next_id: u64,
}

#[derive(Clone, Debug)]
pub struct StubUser {
    pub id: String,
    pub password: String,
}

impl StubData {
    fn seeded() -> Self {
        let cards = vec![
            json!({"id": "demo_black_1", "color": "black", "title": "What moment from today are you grateful for?", "isdemo": true}),
            json!({"id": "demo_white_1", "color": "white", "title": "Share a childhood memory that shaped you", "isDemo": true}),
            json!({"id": "demo_black_2", "color": "black", "title": "Who taught you kindness?", "isdemo": true}),
            json!({"id": "demo_white_2", "color": "white", "title": "Describe a place you feel safe", "isDemo": true}),
            json!({"id": "paid_black_1", "color": "black", "title": "What are you still carrying?", "isdemo": false}),
            json!({"id": "paid_white_1", "color": "white", "title": "Name a fear you outgrew", "isDemo": false}),
        ];
        Self {
            cards,
            ..Self::default()
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_{}", prefix, self.next_id)
    }
}

#[derive(Clone)]
struct AppState {
    options: StubOptions,
    data: Arc<RwLock<StubData>>,
}

pub struct StubServer {
    pub base_url: String,
    data: Arc<RwLock<StubData>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubServer {
    /// Read the server's data from a synchronous test.
    pub fn with_data<T>(&self, f: impl FnOnce(&StubData) -> T) -> T {
        f(&self.data.blocking_read())
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub fn spawn_stub(options: StubOptions) -> Result<StubServer> {
    let data = Arc::new(RwLock::new(StubData::seeded()));
    let state = AppState {
        options,
        data: data.clone(),
    };
    let (addr_tx, addr_rx) = std::sync::mpsc::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(err) => {
                let _ = addr_tx.send(Err(anyhow::Error::from(err)));
                return;
            }
        };
        rt.block_on(async move {
            let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
                Ok(l) => l,
                Err(err) => {
                    let _ = addr_tx.send(Err(anyhow::Error::from(err)));
                    return;
                }
            };
            let _ = addr_tx.send(listener.local_addr().map_err(anyhow::Error::from));
            let _ = axum::serve(listener, router(state))
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });
    });

    let addr = addr_rx
        .recv()
        .context("stub server thread exited before binding")??;

    Ok(StubServer {
        base_url: format!("http://{}", addr),
        data,
        shutdown: Some(shutdown_tx),
    })
}

/// A base URL nothing is listening on.
pub fn dead_base_url() -> Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").context("bind probe port")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

/// Clonable in-memory sink for the runner's progress output.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/cards", get(list_cards))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/signin", post(signin))
        .route("/api/auth/user", get(current_user))
        .route("/api/draws/save", post(save_draw))
        .route("/api/draws", get(list_draws))
        .route("/api/admin/cards", get(admin_list_cards).post(admin_create_card))
        .with_state(state)
}

fn error(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "error": msg }))).into_response()
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == SESSION_COOKIE)
        .map(|(_, v)| v.to_string())
}

async fn session_user(state: &AppState, headers: &HeaderMap) -> Option<(String, String)> {
    let token = session_token(headers)?;
    let data = state.data.read().await;
    let user_id = data.sessions.get(&token)?.clone();
    let email = data
        .users
        .iter()
        .find(|(_, u)| u.id == user_id)
        .map(|(email, _)| email.clone())?;
    Some((user_id, email))
}

async fn list_cards(State(state): State<AppState>) -> Response {
    let data = state.data.read().await;
    let cards: Vec<Value> = data
        .cards
        .iter()
        .filter(|c| {
            state.options.leak_paid_cards
                || c.get("isdemo") == Some(&json!(true))
                || c.get("isDemo") == Some(&json!(true))
        })
        .cloned()
        .collect();
    Json(json!({ "cards": cards })).into_response()
}

async fn signup(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let (Some(email), Some(password)) = (
        body.get("email").and_then(|v| v.as_str()),
        body.get("password").and_then(|v| v.as_str()),
    ) else {
        return error(StatusCode::BAD_REQUEST, "email and password are required");
    };

    let mut data = state.data.write().await;
    if data.users.contains_key(email) {
        return error(StatusCode::BAD_REQUEST, "User already registered");
    }
    let id = data.next_id("user");
    data.users.insert(
        email.to_string(),
        StubUser {
            id: id.clone(),
            password: password.to_string(),
        },
    );
    Json(json!({ "user": { "id": id, "email": email } })).into_response()
}

async fn signin(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let email = body.get("email").and_then(|v| v.as_str()).unwrap_or("");
    let password = body.get("password").and_then(|v| v.as_str()).unwrap_or("");

    let mut data = state.data.write().await;
    let Some(user) = data.users.get(email).cloned() else {
        return error(StatusCode::BAD_REQUEST, "Invalid login credentials");
    };
    if user.password != password {
        return error(StatusCode::BAD_REQUEST, "Invalid login credentials");
    }
    if !state.options.confirm_email {
        return error(StatusCode::BAD_REQUEST, "Email not confirmed");
    }

    let token = data.next_id("session");
    data.sessions.insert(token.clone(), user.id.clone());
    let cookie = format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, token);
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "user": { "id": user.id, "email": email } })),
    )
        .into_response()
}

async fn current_user(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = session_user(&state, &headers)
        .await
        .map(|(id, email)| json!({ "id": id, "email": email, "hasPaidAccess": false }));
    Json(json!({ "user": user })).into_response()
}

async fn save_draw(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some((user_id, _)) = session_user(&state, &headers).await else {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    };
    let mut data = state.data.write().await;
    let id = data.next_id("draw");
    let draw = json!({
        "id": id,
        "userid": user_id,
        "blackcardid": body.get("blackCardId"),
        "whitecardid": body.get("whiteCardId"),
        "blackcardtitle": body.get("blackCardTitle"),
        "whitecardtitle": body.get("whiteCardTitle"),
    });
    data.draws.push(draw.clone());
    Json(json!({ "draw": draw })).into_response()
}

async fn list_draws(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some((user_id, _)) = session_user(&state, &headers).await else {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    };
    let data = state.data.read().await;
    let draws: Vec<Value> = data
        .draws
        .iter()
        .filter(|d| d.get("userid") == Some(&json!(user_id)))
        .cloned()
        .collect();
    Json(json!({ "draws": draws })).into_response()
}

async fn require_admin(state: &AppState, headers: &HeaderMap) -> Option<Response> {
    if session_user(state, headers).await.is_none() {
        return Some(error(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }
    if !state.options.admin {
        return Some(error(StatusCode::FORBIDDEN, "Forbidden"));
    }
    None
}

async fn admin_list_cards(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(denied) = require_admin(&state, &headers).await {
        return denied;
    }
    let data = state.data.read().await;
    Json(json!({ "cards": data.cards })).into_response()
}

async fn admin_create_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = require_admin(&state, &headers).await {
        return denied;
    }
    let mut data = state.data.write().await;
    let mut card = body;
    if let Some(obj) = card.as_object_mut() {
        let id = data.next_id("card");
        obj.insert("id".to_string(), json!(id));
    }
    data.cards.push(card.clone());
    Json(json!({ "card": card })).into_response()
}
