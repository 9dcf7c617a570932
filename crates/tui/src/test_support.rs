//! In-process stand-in for the shipment backend, served by axum on an
//! ephemeral port.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use api_types::{
    auth::{AuthResponse, LoginRequest, Profile, RegisterRequest},
    shipment::{PageResult, Shipment, ShipmentFilter, ShipmentRequest, ShipmentType},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{Duration, NaiveDate};

pub const PASSWORD: &str = "secret";
pub const VALID_OTP: &str = "123456";
/// Title the fake server refuses, standing in for a business rule the
/// client cannot check.
pub const REJECTED_TITLE: &str = "DUPLICATE";
const SESSION_COOKIE: &str = "jwt=token-123";

pub fn sample_shipment(id: i64) -> Shipment {
    let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
    let shipment_type = match id % 3 {
        0 => ShipmentType::Air,
        1 => ShipmentType::Sea,
        _ => ShipmentType::Road,
    };
    Shipment {
        id,
        shipment_title: format!("Shipment {id}"),
        shipment_description: Some(format!("crate #{id}")),
        shipment_type,
        cost: 10.0 * id as f64,
        shipment_date: base + Duration::days(id),
        is_delivered: id % 2 == 0,
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Default)]
struct FakeState {
    shipments: Vec<Shipment>,
    next_id: i64,
    requests: Vec<RecordedRequest>,
    require_session: bool,
    verified: bool,
    fail_listing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn with_shipments(shipments: Vec<Shipment>) -> Self {
        let next_id = shipments.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self {
            state: Arc::new(Mutex::new(FakeState {
                shipments,
                next_id,
                ..FakeState::default()
            })),
        }
    }

    /// Shipment routes answer 401 unless the session cookie is present.
    pub fn requiring_session(self) -> Self {
        self.with_state(|state| state.require_session = true);
        self
    }

    pub fn set_fail_listing(&self, fail: bool) {
        self.with_state(|state| state.fail_listing = fail);
    }

    pub fn remove_shipment(&self, id: i64) {
        self.with_state(|state| state.shipments.retain(|s| s.id != id));
    }

    pub fn last_request(&self, method: &str, path: &str) -> Option<RecordedRequest> {
        self.with_state(|state| {
            state
                .requests
                .iter()
                .rev()
                .find(|req| req.method == method && req.path == path)
                .cloned()
        })
    }

    pub fn requests(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.with_state(|state| {
            state
                .requests
                .iter()
                .filter(|req| req.method == method && req.path == path)
                .cloned()
                .collect()
        })
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    fn record(&self, method: &str, path: &str, query: HashMap<String, String>, body: Option<serde_json::Value>) {
        self.with_state(|state| {
            state.requests.push(RecordedRequest {
                method: method.to_string(),
                path: path.to_string(),
                query,
                body,
            })
        });
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        !self.with_state(|state| state.require_session) || has_session(headers)
    }

    /// Serves the fake under `/api` and returns the base URL.
    pub async fn spawn(&self) -> String {
        let api = Router::new()
            .route("/shipments", get(list).post(create))
            .route("/shipments/filter", post(filter))
            .route("/shipments/{id}", put(update).delete(remove).get(fetch_one))
            .route("/login", post(login))
            .route("/register", post(register))
            .route("/logout", post(logout))
            .route("/is-authenticated", get(is_authenticated))
            .route("/profile", get(profile))
            .route("/send-otp", post(send_otp))
            .route("/verify-otp", post(verify_otp))
            .route("/send-reset-otp", post(send_reset_otp))
            .route("/reset-password", post(reset_password));
        let router = Router::new().nest("/api", api).with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}/api")
    }
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.split(';').any(|part| part.trim() == SESSION_COOKIE))
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": true, "message": message }))).into_response()
}

fn paginate(mut rows: Vec<Shipment>, query: &HashMap<String, String>) -> PageResult<Shipment> {
    let page: usize = query.get("page").and_then(|v| v.parse().ok()).unwrap_or(0);
    let size: usize = query.get("size").and_then(|v| v.parse().ok()).unwrap_or(5);
    rows.sort_by(|a, b| {
        b.shipment_date
            .cmp(&a.shipment_date)
            .then(b.id.cmp(&a.id))
    });
    let total_elements = rows.len();
    let total_pages = total_elements.div_ceil(size.max(1));
    let content = rows.into_iter().skip(page * size).take(size).collect();
    PageResult {
        content,
        total_pages: total_pages as u32,
        total_elements: total_elements as u64,
    }
}

fn matches(shipment: &Shipment, filter: &ShipmentFilter) -> bool {
    if let Some(keyword) = &filter.keyword {
        let keyword = keyword.to_lowercase();
        let title = shipment.shipment_title.to_lowercase();
        let description = shipment
            .shipment_description
            .as_deref()
            .unwrap_or("")
            .to_lowercase();
        if !title.contains(&keyword) && !description.contains(&keyword) {
            return false;
        }
    }
    filter
        .shipment_type
        .is_none_or(|kind| kind == shipment.shipment_type)
        && filter.start_date.is_none_or(|d| shipment.shipment_date >= d)
        && filter.end_date.is_none_or(|d| shipment.shipment_date <= d)
        && filter.min_cost.is_none_or(|c| shipment.cost >= c)
        && filter.max_cost.is_none_or(|c| shipment.cost <= c)
        && filter
            .is_delivered
            .is_none_or(|delivered| delivered == shipment.is_delivered)
}

fn from_request(id: i64, req: ShipmentRequest) -> Shipment {
    Shipment {
        id,
        shipment_title: req.shipment_title,
        shipment_description: Some(req.shipment_description),
        shipment_type: req.shipment_type,
        cost: req.cost,
        shipment_date: req.shipment_date,
        is_delivered: req.is_delivered,
    }
}

async fn list(
    State(fake): State<FakeBackend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    fake.record("GET", "/api/shipments", query.clone(), None);
    if !fake.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if fake.with_state(|state| state.fail_listing) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    let rows = fake.with_state(|state| state.shipments.clone());
    Json(paginate(rows, &query)).into_response()
}

async fn filter(
    State(fake): State<FakeBackend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    fake.record("POST", "/api/shipments/filter", query.clone(), Some(body.clone()));
    if !fake.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if fake.with_state(|state| state.fail_listing) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    let Ok(criteria) = serde_json::from_value::<ShipmentFilter>(body) else {
        return error(StatusCode::BAD_REQUEST, "malformed filter");
    };
    let rows = fake.with_state(|state| {
        state
            .shipments
            .iter()
            .filter(|s| matches(s, &criteria))
            .cloned()
            .collect()
    });
    Json(paginate(rows, &query)).into_response()
}

async fn fetch_one(State(fake): State<FakeBackend>, Path(id): Path<i64>) -> Response {
    match fake.with_state(|state| state.shipments.iter().find(|s| s.id == id).cloned()) {
        Some(shipment) => Json(shipment).into_response(),
        None => error(StatusCode::NOT_FOUND, "Shipment not found"),
    }
}

async fn create(
    State(fake): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    fake.record("POST", "/api/shipments", HashMap::new(), Some(body.clone()));
    if !fake.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Ok(req) = serde_json::from_value::<ShipmentRequest>(body) else {
        return error(StatusCode::BAD_REQUEST, "malformed shipment");
    };
    if req.shipment_title == REJECTED_TITLE {
        return error(
            StatusCode::BAD_REQUEST,
            "Shipment could not be created. Try later",
        );
    }
    let shipment = fake.with_state(|state| {
        let id = state.next_id.max(1);
        state.next_id = id + 1;
        let shipment = from_request(id, req);
        state.shipments.push(shipment.clone());
        shipment
    });
    Json(shipment).into_response()
}

async fn update(
    State(fake): State<FakeBackend>,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    fake.record("PUT", &format!("/api/shipments/{id}"), HashMap::new(), Some(body.clone()));
    let Ok(req) = serde_json::from_value::<ShipmentRequest>(body) else {
        return error(StatusCode::BAD_REQUEST, "malformed shipment");
    };
    let updated = fake.with_state(|state| {
        let slot = state.shipments.iter_mut().find(|s| s.id == id)?;
        *slot = from_request(id, req);
        Some(slot.clone())
    });
    match updated {
        Some(shipment) => Json(shipment).into_response(),
        None => error(StatusCode::NOT_FOUND, "Shipment not found"),
    }
}

async fn remove(State(fake): State<FakeBackend>, Path(id): Path<i64>) -> Response {
    fake.record("DELETE", &format!("/api/shipments/{id}"), HashMap::new(), None);
    let removed = fake.with_state(|state| {
        let before = state.shipments.len();
        state.shipments.retain(|s| s.id != id);
        before != state.shipments.len()
    });
    if removed {
        StatusCode::OK.into_response()
    } else {
        error(StatusCode::NOT_FOUND, "Shipment not found")
    }
}

async fn login(State(fake): State<FakeBackend>, Json(req): Json<LoginRequest>) -> Response {
    fake.record("POST", "/api/login", HashMap::new(), None);
    if req.password != PASSWORD {
        return error(StatusCode::BAD_REQUEST, "Email or password is incorrect");
    }
    let body = AuthResponse {
        email: req.email,
        token: "token-123".to_string(),
    };
    (
        [(
            header::SET_COOKIE,
            format!("{SESSION_COOKIE}; Path=/; HttpOnly; SameSite=Strict"),
        )],
        Json(body),
    )
        .into_response()
}

async fn register(State(fake): State<FakeBackend>, Json(req): Json<RegisterRequest>) -> Response {
    fake.record("POST", "/api/register", HashMap::new(), None);
    let profile = Profile {
        user_id: "u-1".to_string(),
        name: req.name,
        email: req.email,
        is_account_verified: false,
    };
    (StatusCode::CREATED, Json(profile)).into_response()
}

async fn logout() -> Response {
    (
        [(
            header::SET_COOKIE,
            "jwt=; Path=/; Max-Age=0; HttpOnly; SameSite=Strict".to_string(),
        )],
        "Logged out successfully!",
    )
        .into_response()
}

async fn is_authenticated(headers: HeaderMap) -> Json<bool> {
    Json(has_session(&headers))
}

async fn profile(State(fake): State<FakeBackend>, headers: HeaderMap) -> Response {
    if !has_session(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let verified = fake.with_state(|state| state.verified);
    Json(Profile {
        user_id: "u-1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        is_account_verified: verified,
    })
    .into_response()
}

async fn send_otp(State(fake): State<FakeBackend>) -> StatusCode {
    fake.record("POST", "/api/send-otp", HashMap::new(), None);
    StatusCode::OK
}

async fn verify_otp(
    State(fake): State<FakeBackend>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    fake.record("POST", "/api/verify-otp", HashMap::new(), Some(body.clone()));
    if body["otp"] == VALID_OTP {
        fake.with_state(|state| state.verified = true);
        StatusCode::OK.into_response()
    } else {
        error(StatusCode::BAD_REQUEST, "Invalid OTP")
    }
}

async fn send_reset_otp(
    State(fake): State<FakeBackend>,
    Query(query): Query<HashMap<String, String>>,
) -> StatusCode {
    fake.record("POST", "/api/send-reset-otp", query, None);
    StatusCode::OK
}

async fn reset_password(
    State(fake): State<FakeBackend>,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    fake.record("POST", "/api/reset-password", HashMap::new(), Some(body));
    StatusCode::OK
}
