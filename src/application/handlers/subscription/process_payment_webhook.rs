//! ProcessPaymentWebhookHandler - applies PayMongo `payment.paid` events.
//!
//! Deliveries are at-least-once. A payment id is applied to a user's record
//! at most once: the handler reads the record, decides the grant, and writes
//! conditionally on the grant fields it read. On a lost race it re-reads,
//! which usually turns a duplicate delivery into `AlreadyProcessed`.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::foundation::{PaymentId, Timestamp, UserId};
use crate::domain::payment::{PayMongoEvent, PayMongoWebhookVerifier, WebhookError, WebhookOutcome};
use crate::domain::subscription::{decide_grant, GrantDecision};
use crate::ports::{GrantSnapshot, SubscriptionStore, WriteResult};

/// Attempts at the read-decide-write loop before giving up.
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Command carrying one webhook delivery.
#[derive(Debug, Clone)]
pub struct ProcessPaymentWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// `Paymongo-Signature` header, if sent.
    pub signature: Option<String>,
}

pub struct ProcessPaymentWebhookHandler {
    verifier: PayMongoWebhookVerifier,
    store: Arc<dyn SubscriptionStore>,
    clock: fn() -> Timestamp,
}

impl ProcessPaymentWebhookHandler {
    pub fn new(verifier: PayMongoWebhookVerifier, store: Arc<dyn SubscriptionStore>) -> Self {
        Self {
            verifier,
            store,
            clock: Timestamp::now,
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    pub async fn handle(
        &self,
        cmd: ProcessPaymentWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        let now = (self.clock)();

        self.verifier
            .verify(cmd.signature.as_deref(), &cmd.payload, now)
            .map_err(|e| {
                warn!(reason = %e, "Webhook signature rejected");
                WebhookError::from(e)
            })?;

        let event = PayMongoEvent::from_slice(&cmd.payload)?;

        if !event.is_payment_paid() {
            info!(
                event_id = event.event_id().unwrap_or("-"),
                event_type = event.event_type().unwrap_or("-"),
                "Ignoring webhook event"
            );
            return Ok(WebhookOutcome::Ignored {
                event_type: event.event_type().map(str::to_string),
            });
        }

        let Some(user_id) = event.user_id() else {
            error!(
                event_id = event.event_id().unwrap_or("-"),
                "No UID found in payment metadata"
            );
            return Ok(WebhookOutcome::MissingUser {
                payment_id: event.payment_id(),
            });
        };

        let payment_id = event
            .payment_id()
            .ok_or(WebhookError::MissingField("data.attributes.data.id"))?;

        info!(user_id = %user_id, payment_id = %payment_id, "Processing payment");
        self.apply_payment(&user_id, &payment_id, now).await
    }

    async fn apply_payment(
        &self,
        user_id: &UserId,
        payment_id: &PaymentId,
        now: Timestamp,
    ) -> Result<WebhookOutcome, WebhookError> {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let record = self.store.find(user_id).await.map_err(storage_error)?;

            let grant = match decide_grant(record.as_ref(), payment_id, now) {
                GrantDecision::AlreadyApplied => {
                    info!(user_id = %user_id, payment_id = %payment_id, "Payment already processed, skipping");
                    return Ok(WebhookOutcome::AlreadyProcessed {
                        user_id: user_id.clone(),
                        payment_id: payment_id.clone(),
                    });
                }
                GrantDecision::Apply(grant) => grant,
            };

            let expected = GrantSnapshot::of(record.as_ref());
            match self
                .store
                .apply_grant(user_id, &expected, &grant)
                .await
                .map_err(storage_error)?
            {
                WriteResult::Written => {
                    info!(
                        user_id = %user_id,
                        payment_id = %payment_id,
                        new_expiry = %grant.new_expiry,
                        basis = ?grant.basis,
                        "Subscription extended"
                    );
                    return Ok(WebhookOutcome::Applied {
                        user_id: user_id.clone(),
                        payment_id: grant.payment_id,
                        new_expiry: grant.new_expiry,
                        basis: grant.basis,
                    });
                }
                WriteResult::Conflict => {
                    warn!(user_id = %user_id, payment_id = %payment_id, attempt, "Subscription record changed concurrently, retrying");
                }
            }
        }

        error!(user_id = %user_id, payment_id = %payment_id, "Giving up after repeated write conflicts");
        Err(WebhookError::Conflict(format!(
            "record for {} kept changing after {} attempts",
            user_id, MAX_WRITE_ATTEMPTS
        )))
    }
}

fn storage_error(err: crate::domain::foundation::DomainError) -> WebhookError {
    error!(error = %err, "Subscription store failure during webhook processing");
    WebhookError::Storage(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionStore;
    use crate::domain::payment::{sign_webhook_payload, SignatureError, SigningMode};
    use crate::domain::subscription::{GrantBasis, UserSubscription};
    use secrecy::SecretString;

    const SECRET: &str = "whsk_test_secret";

    fn frozen_now() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn handler(store: &InMemorySubscriptionStore) -> ProcessPaymentWebhookHandler {
        let verifier = PayMongoWebhookVerifier::new(SecretString::new(SECRET.to_string()), 300);
        ProcessPaymentWebhookHandler::new(verifier, Arc::new(store.clone())).with_clock(frozen_now)
    }

    fn paid_body(payment_id: &str, uid: &str) -> Vec<u8> {
        serde_json::json!({
            "data": {
                "id": "evt_1",
                "attributes": {
                    "type": "payment.paid",
                    "data": {
                        "id": payment_id,
                        "attributes": { "metadata": { "uid": uid } }
                    }
                }
            }
        })
        .to_string()
        .into_bytes()
    }

    fn signed(body: Vec<u8>) -> ProcessPaymentWebhookCommand {
        let signature =
            sign_webhook_payload(SECRET, frozen_now().as_unix_secs(), &body, SigningMode::Test)
                .unwrap();
        ProcessPaymentWebhookCommand {
            payload: body,
            signature: Some(signature),
        }
    }

    async fn store_with_expiry(end: Timestamp, last_payment: &str) -> InMemorySubscriptionStore {
        let store = InMemorySubscriptionStore::new();
        let mut record = UserSubscription::empty(user());
        record.subscription_end = Some(end);
        record.last_payment_id = Some(PaymentId::new(last_payment).unwrap());
        record.is_active = true;
        store.insert(record).await;
        store
    }

    // ══════════════════════════════════════════════════════════════
    // Authentication
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn tampered_signature_is_rejected_and_store_untouched() {
        let store = InMemorySubscriptionStore::new();
        let mut cmd = signed(paid_body("pay_123", "user-1"));
        cmd.payload = paid_body("pay_999", "user-1");

        let result = handler(&store).handle(cmd).await;

        assert!(matches!(
            result,
            Err(WebhookError::InvalidSignature(SignatureError::Mismatch))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn missing_signature_is_rejected() {
        let store = InMemorySubscriptionStore::new();
        let cmd = ProcessPaymentWebhookCommand {
            payload: paid_body("pay_1", "user-1"),
            signature: None,
        };

        let result = handler(&store).handle(cmd).await;

        assert!(matches!(
            result,
            Err(WebhookError::InvalidSignature(SignatureError::MissingHeader))
        ));
    }

    #[tokio::test]
    async fn signed_non_json_body_is_a_parse_error() {
        let store = InMemorySubscriptionStore::new();

        let result = handler(&store).handle(signed(b"not json".to_vec())).await;

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Acknowledged Without Mutation
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn other_event_types_are_ignored() {
        let store = InMemorySubscriptionStore::new();
        let body = br#"{"data":{"attributes":{"type":"payment.failed","data":{"id":"pay_1","attributes":{"metadata":{"uid":"user-1"}}}}}}"#;

        let result = handler(&store).handle(signed(body.to_vec())).await.unwrap();

        assert_eq!(
            result,
            WebhookOutcome::Ignored {
                event_type: Some("payment.failed".to_string())
            }
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn oddly_typed_unrelated_events_are_ignored() {
        let store = InMemorySubscriptionStore::new();
        let bodies: [&[u8]; 3] = [
            br#"{"data":{"attributes":{"type":"source.chargeable","livemode":"false"}}}"#,
            br#"{"data":{"id":123,"attributes":{"type":"payment.failed"}}}"#,
            br#"{"data":{"attributes":{"type":7}}}"#,
        ];

        for body in bodies {
            let result = handler(&store).handle(signed(body.to_vec())).await.unwrap();
            assert!(matches!(result, WebhookOutcome::Ignored { .. }), "{:?}", result);
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn missing_uid_is_acknowledged() {
        let store = InMemorySubscriptionStore::new();
        let body = br#"{"data":{"attributes":{"type":"payment.paid","data":{"id":"pay_1","attributes":{}}}}}"#;

        let result = handler(&store).handle(signed(body.to_vec())).await.unwrap();

        assert!(matches!(result, WebhookOutcome::MissingUser { .. }));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn missing_payment_id_is_a_bad_request() {
        let store = InMemorySubscriptionStore::new();
        let body = br#"{"data":{"attributes":{"type":"payment.paid","data":{"attributes":{"metadata":{"uid":"user-1"}}}}}}"#;

        let result = handler(&store).handle(signed(body.to_vec())).await;

        assert!(matches!(result, Err(WebhookError::MissingField(_))));
        assert!(store.is_empty().await);
    }

    // ══════════════════════════════════════════════════════════════
    // Grant Application
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn first_payment_grants_fresh_pass() {
        let store = InMemorySubscriptionStore::new();

        let result = handler(&store).handle(signed(paid_body("pay_1", "user-1"))).await.unwrap();

        assert_eq!(
            result,
            WebhookOutcome::Applied {
                user_id: user(),
                payment_id: PaymentId::new("pay_1").unwrap(),
                new_expiry: frozen_now().plus_hours(24),
                basis: GrantBasis::Fresh,
            }
        );
        let record = store.get(&user()).await.unwrap();
        assert!(record.is_active);
        assert_eq!(record.subscription_end, Some(frozen_now().plus_hours(24)));
    }

    #[tokio::test]
    async fn payment_stacks_on_running_pass() {
        let old_expiry = frozen_now().plus_hours(10);
        let store = store_with_expiry(old_expiry, "pay_100").await;

        handler(&store).handle(signed(paid_body("pay_123", "user-1"))).await.unwrap();

        let record = store.get(&user()).await.unwrap();
        assert_eq!(record.subscription_end, Some(old_expiry.plus_hours(24)));
        assert_eq!(record.last_payment_id.unwrap().as_str(), "pay_123");
    }

    #[tokio::test]
    async fn payment_after_lapse_starts_from_now() {
        let store = store_with_expiry(frozen_now().plus_hours(-48), "pay_100").await;

        handler(&store).handle(signed(paid_body("pay_123", "user-1"))).await.unwrap();

        assert_eq!(
            store.get(&user()).await.unwrap().subscription_end,
            Some(frozen_now().plus_hours(24))
        );
    }

    #[tokio::test]
    async fn replayed_delivery_is_already_processed() {
        let old_expiry = frozen_now().plus_hours(10);
        let store = store_with_expiry(old_expiry, "pay_100").await;
        let processor = handler(&store);
        let cmd = signed(paid_body("pay_123", "user-1"));

        processor.handle(cmd.clone()).await.unwrap();
        let replay = processor.handle(cmd).await.unwrap();

        assert!(matches!(replay, WebhookOutcome::AlreadyProcessed { .. }));
        assert_eq!(
            store.get(&user()).await.unwrap().subscription_end,
            Some(old_expiry.plus_hours(24))
        );
    }

    #[tokio::test]
    async fn grant_preserves_last_request_timestamp() {
        let store = InMemorySubscriptionStore::new();
        let mut record = UserSubscription::empty(user());
        record.last_request_at = Some(frozen_now().plus_secs(-30));
        store.insert(record).await;

        handler(&store).handle(signed(paid_body("pay_1", "user-1"))).await.unwrap();

        assert_eq!(
            store.get(&user()).await.unwrap().last_request_at,
            Some(frozen_now().plus_secs(-30))
        );
    }

    #[tokio::test]
    async fn concurrent_duplicate_deliveries_apply_once() {
        let store = InMemorySubscriptionStore::new();
        let processor = Arc::new(handler(&store));
        let cmd = signed(paid_body("pay_1", "user-1"));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let processor = processor.clone();
            let cmd = cmd.clone();
            tasks.push(tokio::spawn(async move { processor.handle(cmd).await }));
        }

        let mut applied = 0;
        for task in tasks {
            if let WebhookOutcome::Applied { .. } = task.await.unwrap().unwrap() {
                applied += 1;
            }
        }

        assert_eq!(applied, 1);
        assert_eq!(
            store.get(&user()).await.unwrap().subscription_end,
            Some(frozen_now().plus_hours(24))
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Storage Failures
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn read_failure_is_retryable_storage_error() {
        let store = InMemorySubscriptionStore::new();
        store.fail_reads(true);

        let err = handler(&store)
            .handle(signed(paid_body("pay_1", "user-1")))
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::Storage(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn transient_conflict_is_retried() {
        let store = InMemorySubscriptionStore::new();
        store.force_conflicts(1);

        let result = handler(&store).handle(signed(paid_body("pay_1", "user-1"))).await.unwrap();

        assert!(matches!(result, WebhookOutcome::Applied { .. }));
    }

    #[tokio::test]
    async fn persistent_conflict_gives_up() {
        let store = InMemorySubscriptionStore::new();
        store.force_conflicts(MAX_WRITE_ATTEMPTS);

        let err = handler(&store)
            .handle(signed(paid_body("pay_1", "user-1")))
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::Conflict(_)));
        assert!(store.is_empty().await);
    }
}
