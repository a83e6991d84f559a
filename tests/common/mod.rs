#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use mozello_zenopay_relay::config::{Config, MozelloConfig, ServerConfig, ZenopayConfig};
use mozello_zenopay_relay::mozello::signature::{self, SignatureOrder, SignedPayload};
use mozello_zenopay_relay::{api, AppState};

pub const MOZELLO_SECRET: &str = "mozello-secret";
pub const MERCHANT_KEY: &str = "zp-key-a";
pub const SUCCESS_URL: &str = "https://shop.example.com/ok";
pub const FAILURE_URL: &str = "https://shop.example.com/fail";

/// Bind to port 0 and return the base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub api_key: Option<String>,
    pub body: Value,
    pub query: HashMap<String, String>,
}

/// In-process stand-in for the ZenoPay API
#[derive(Clone)]
pub struct FakeZenopay {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    initiate_response: Arc<(StatusCode, Value)>,
    status_response: Arc<(StatusCode, Value)>,
}

impl FakeZenopay {
    pub fn new(initiate_response: (StatusCode, Value)) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            initiate_response: Arc::new(initiate_response),
            status_response: Arc::new((StatusCode::OK, json!({ "data": [] }))),
        }
    }

    pub fn accepting() -> Self {
        Self::new((
            StatusCode::OK,
            json!({
                "status": "success",
                "resultcode": "000",
                "message": "Request in progress. You will receive a callback shortly",
            }),
        ))
    }

    pub fn with_status_response(mut self, response: (StatusCode, Value)) -> Self {
        self.status_response = Arc::new(response);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/api/payments/mobile_money_tanzania", post(initiate))
            .route("/api/payments/order-status", get(order_status))
            .with_state(self.clone());
        serve(app).await
    }
}

fn api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn initiate(
    State(fake): State<FakeZenopay>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    fake.calls.lock().unwrap().push(RecordedCall {
        api_key: api_key(&headers),
        body,
        query: HashMap::new(),
    });
    let (status, response) = fake.initiate_response.as_ref().clone();
    (status, Json(response))
}

async fn order_status(
    State(fake): State<FakeZenopay>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    fake.calls.lock().unwrap().push(RecordedCall {
        api_key: api_key(&headers),
        body: Value::Null,
        query,
    });
    let (status, response) = fake.status_response.as_ref().clone();
    (status, Json(response))
}

/// In-process stand-in for Mozello's notification endpoint
#[derive(Clone)]
pub struct FakeMozello {
    pub notifications: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
}

impl FakeMozello {
    pub fn new(status: StatusCode) -> Self {
        Self {
            notifications: Arc::new(Mutex::new(Vec::new())),
            status,
        }
    }

    pub fn notifications(&self) -> Vec<Value> {
        self.notifications.lock().unwrap().clone()
    }

    /// Returns the notification URL.
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/notify", post(notify))
            .with_state(self.clone());
        format!("{}/notify", serve(app).await)
    }
}

async fn notify(State(fake): State<FakeMozello>, Json(body): Json<Value>) -> StatusCode {
    fake.notifications.lock().unwrap().push(body);
    fake.status
}

pub fn relay_config(zenopay_url: &str, notify_url: &str) -> Config {
    let mut merchant_keys = HashMap::new();
    merchant_keys.insert("shop-a".to_string(), MERCHANT_KEY.to_string());

    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            public_base_url: "https://relay.example.com".to_string(),
        },
        mozello: MozelloConfig {
            api_key: MOZELLO_SECRET.to_string(),
            signature_order: SignatureOrder::Insertion,
            notify_url: notify_url.to_string(),
            timeout_secs: 2,
        },
        zenopay: ZenopayConfig {
            base_url: zenopay_url.to_string(),
            timeout_secs: 2,
            merchant_keys,
            default_api_key: None,
        },
    }
}

/// Start the relay with its production collaborators.
pub async fn start_relay(config: Config) -> String {
    let state = AppState::from_config(config).unwrap();
    serve(api::router(state)).await
}

pub fn checkout_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("order_uuid", "9f1c2a"),
        ("website_alias", "shop-a"),
        ("billing_email", "asha@example.com"),
        ("billing_first_name", "Asha"),
        ("billing_last_name", "Mwangi"),
        ("billing_phone", "+255 744 963 858"),
        ("amount", "12.50"),
        ("currency", "TZS"),
        ("success_url", SUCCESS_URL),
        ("failure_url", FAILURE_URL),
    ]
}

/// JSON checkout body with the fields in the given order, signed with `secret`.
pub fn signed_body(fields: &[(&str, &str)], secret: &str, order: SignatureOrder) -> Value {
    let mut payload = SignedPayload::new();
    let mut object = Map::new();
    for (key, value) in fields {
        payload.push(*key, *value);
        object.insert(key.to_string(), Value::String(value.to_string()));
    }
    object.insert(
        "signature".to_string(),
        Value::String(signature::sign(&payload, secret, order)),
    );
    Value::Object(object)
}
