//! Shared fixtures for the HTTP integration tests.
//!
//! Builds the full router over in-memory adapters and mocks, with every
//! handler pinned to a frozen clock.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use diskarte::adapters::ai::MockAIProvider;
use diskarte::adapters::auth::MockSessionValidator;
use diskarte::adapters::http::{create_router, AppState, RouterConfig};
use diskarte::adapters::memory::{InMemoryChatLogRepository, InMemorySubscriptionStore};
use diskarte::adapters::paymongo::MockPaymentProvider;
use diskarte::application::handlers::{
    CheckAccessHandler, CreateCheckoutHandler, GetAdminStatsHandler,
    ProcessPaymentWebhookHandler, SendChatMessageHandler,
};
use diskarte::domain::foundation::{AdminAllowList, PaymentId, Timestamp, UserId};
use diskarte::domain::payment::{sign_webhook_payload, PayMongoWebhookVerifier, SigningMode};
use diskarte::domain::subscription::UserSubscription;
use secrecy::SecretString;

pub const WEBHOOK_SECRET: &str = "whsk_test_integration";

pub const PAID_TOKEN: &str = "paid-token";
pub const PAID_USER: &str = "paid-user";
pub const TRIAL_TOKEN: &str = "trial-token";
pub const TRIAL_USER: &str = "anon-user";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const ADMIN_USER: &str = "admin-uid";

pub fn frozen_now() -> Timestamp {
    Timestamp::from_unix_secs(1_700_000_000).unwrap()
}

pub struct TestApp {
    pub router: Router,
    pub store: InMemorySubscriptionStore,
    pub chat_log: InMemoryChatLogRepository,
    pub ai: MockAIProvider,
    pub payments: MockPaymentProvider,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_providers(
            MockAIProvider::new().with_response("Kaya mo yan!"),
            MockPaymentProvider::new(),
        )
    }

    pub fn with_ai(ai: MockAIProvider) -> Self {
        Self::with_providers(ai, MockPaymentProvider::new())
    }

    pub fn with_providers(ai: MockAIProvider, payments: MockPaymentProvider) -> Self {
        let store = InMemorySubscriptionStore::new();
        let chat_log = InMemoryChatLogRepository::new();

        let validator = MockSessionValidator::new()
            .with_registered_user(PAID_TOKEN, PAID_USER)
            .with_registered_user(ADMIN_TOKEN, ADMIN_USER)
            .with_anonymous_user(TRIAL_TOKEN, TRIAL_USER);

        let gate = Arc::new(
            CheckAccessHandler::new(Arc::new(store.clone())).with_clock(frozen_now),
        );
        let verifier = PayMongoWebhookVerifier::new(
            SecretString::new(WEBHOOK_SECRET.to_string()),
            300,
        );

        let state = AppState {
            session_validator: Arc::new(validator),
            chat: Arc::new(
                SendChatMessageHandler::new(
                    gate,
                    Arc::new(ai.clone()),
                    Arc::new(chat_log.clone()),
                )
                .with_clock(frozen_now),
            ),
            checkout: Arc::new(
                CreateCheckoutHandler::new(Arc::new(payments.clone())).with_clock(frozen_now),
            ),
            admin_stats: Arc::new(
                GetAdminStatsHandler::new(
                    Arc::new(store.clone()),
                    AdminAllowList::from_ids([ADMIN_USER]),
                    50,
                )
                .with_clock(frozen_now),
            ),
            webhooks: Arc::new(
                ProcessPaymentWebhookHandler::new(verifier, Arc::new(store.clone()))
                    .with_clock(frozen_now),
            ),
        };

        Self {
            router: create_router(state, &RouterConfig::default()),
            store,
            chat_log,
            ai,
            payments,
        }
    }

    /// Sends `request` and returns the status and body text.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Sends `request` and parses the body as JSON.
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    /// Stores a record whose pass ends at `end`.
    pub async fn give_pass(&self, user: &str, end: Timestamp) {
        let mut record = UserSubscription::empty(UserId::new(user).unwrap());
        record.subscription_end = Some(end);
        record.last_payment_id = Some(PaymentId::new("pay_seed").unwrap());
        record.is_active = true;
        self.store.insert(record).await;
    }

    pub async fn record(&self, user: &str) -> Option<UserSubscription> {
        self.store.get(&UserId::new(user).unwrap()).await
    }
}

pub fn chat_request(token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// A `payment.paid` event body as PayMongo sends it.
pub fn paid_event(payment_id: &str, uid: Option<&str>) -> Vec<u8> {
    let metadata = match uid {
        Some(uid) => json!({ "uid": uid }),
        None => json!({}),
    };
    event_body("payment.paid", payment_id, metadata)
}

pub fn event_body(event_type: &str, payment_id: &str, metadata: Value) -> Vec<u8> {
    json!({
        "data": {
            "id": "evt_test_1",
            "type": "event",
            "attributes": {
                "type": event_type,
                "livemode": false,
                "data": {
                    "id": payment_id,
                    "type": "payment",
                    "attributes": {
                        "amount": 100,
                        "currency": "PHP",
                        "metadata": metadata
                    }
                }
            }
        }
    })
    .to_string()
    .into_bytes()
}

/// Signs `body` with the test secret at `timestamp`.
pub fn signature_at(body: &[u8], timestamp: i64, mode: SigningMode) -> String {
    sign_webhook_payload(WEBHOOK_SECRET, timestamp, body, mode).unwrap()
}

pub fn webhook_request(body: Vec<u8>, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhooks/paymongo")
        .header("Content-Type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("Paymongo-Signature", signature);
    }
    builder.body(Body::from(body)).unwrap()
}

/// A correctly signed delivery of `body` at the frozen clock.
pub fn signed_webhook(body: Vec<u8>) -> Request<Body> {
    let signature = signature_at(&body, frozen_now().as_unix_secs(), SigningMode::Test);
    webhook_request(body, Some(signature))
}
