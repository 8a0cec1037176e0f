//! PayMongo webhook signature verification.
//!
//! The `Paymongo-Signature` header carries a unix timestamp and one or two
//! HMAC-SHA256 signatures: `t=<secs>,te=<hex>` for test mode and
//! `t=<secs>,li=<hex>` for live mode. The signed payload is the exact byte
//! string `"{t}.{raw_body}"`.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::domain::foundation::Timestamp;

/// Default maximum age of a signed delivery.
pub const DEFAULT_SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Allowed clock skew for timestamps in the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Which signature field authenticated the delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMode {
    /// Production signature (`li`).
    Live,
    /// Sandbox signature (`te`).
    Test,
}

impl SigningMode {
    /// Header key carrying this mode's signature.
    pub fn header_key(&self) -> &'static str {
        match self {
            SigningMode::Live => "li",
            SigningMode::Test => "te",
        }
    }
}

/// Reasons a delivery could not be authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature header missing")]
    MissingHeader,

    #[error("webhook secret not configured")]
    MissingSecret,

    #[error("malformed signature header: {0}")]
    MalformedHeader(&'static str),

    #[error("signature mismatch")]
    Mismatch,

    #[error("signature timestamp older than tolerance")]
    Stale,

    #[error("signature timestamp in the future")]
    FromFuture,
}

/// Parsed `Paymongo-Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Timestamp exactly as sent; it is part of the signed payload.
    pub raw_timestamp: String,
    /// Timestamp as unix seconds.
    pub timestamp: i64,
    /// Hex signature to compare against.
    pub signature: String,
    /// Mode the signature was taken from.
    pub mode: SigningMode,
}

impl SignatureHeader {
    /// Parses `t=<secs>,te=<hex>` / `t=<secs>,li=<hex>`.
    ///
    /// When both `li` and `te` are present, `li` wins. A repeated key keeps
    /// its first value. Unknown keys are ignored.
    pub fn parse(header: &str) -> Result<Self, SignatureError> {
        let mut raw_timestamp: Option<&str> = None;
        let mut live: Option<&str> = None;
        let mut test: Option<&str> = None;

        for part in header.split(',') {
            let Some((key, value)) = part.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" => {
                    raw_timestamp.get_or_insert(value);
                }
                "li" => {
                    live.get_or_insert(value);
                }
                "te" => {
                    test.get_or_insert(value);
                }
                _ => {}
            }
        }

        let raw_timestamp = raw_timestamp
            .filter(|t| !t.is_empty())
            .ok_or(SignatureError::MalformedHeader("missing timestamp"))?;
        let timestamp = raw_timestamp
            .parse::<i64>()
            .map_err(|_| SignatureError::MalformedHeader("invalid timestamp"))?;

        let (signature, mode) = match (live.filter(|s| !s.is_empty()), test.filter(|s| !s.is_empty())) {
            (Some(sig), _) => (sig, SigningMode::Live),
            (None, Some(sig)) => (sig, SigningMode::Test),
            (None, None) => return Err(SignatureError::MalformedHeader("missing signature")),
        };

        Ok(Self {
            raw_timestamp: raw_timestamp.to_string(),
            timestamp,
            signature: signature.to_string(),
            mode,
        })
    }
}

/// Verifier for PayMongo webhook deliveries.
///
/// `tolerance_secs` bounds how old a signed timestamp may be; `0` turns the
/// freshness check off.
pub struct PayMongoWebhookVerifier {
    secret: SecretString,
    tolerance_secs: i64,
}

impl PayMongoWebhookVerifier {
    pub fn new(secret: SecretString, tolerance_secs: i64) -> Self {
        Self {
            secret,
            tolerance_secs,
        }
    }

    /// Authenticates `body` against `header` at `now`.
    ///
    /// `body` must be the untouched request bytes.
    pub fn verify(
        &self,
        header: Option<&str>,
        body: &[u8],
        now: Timestamp,
    ) -> Result<SigningMode, SignatureError> {
        let header = header
            .filter(|h| !h.trim().is_empty())
            .ok_or(SignatureError::MissingHeader)?;
        let secret = self.secret.expose_secret();
        if secret.is_empty() {
            return Err(SignatureError::MissingSecret);
        }

        let parsed = SignatureHeader::parse(header)?;

        let expected = compute_signature(secret, &parsed.raw_timestamp, body)?;
        if !constant_time_eq(expected.as_bytes(), parsed.signature.as_bytes()) {
            return Err(SignatureError::Mismatch);
        }

        self.validate_timestamp(parsed.timestamp, now)?;

        Ok(parsed.mode)
    }

    fn validate_timestamp(&self, timestamp: i64, now: Timestamp) -> Result<(), SignatureError> {
        if self.tolerance_secs <= 0 {
            return Ok(());
        }

        let age = now.as_unix_secs() - timestamp;
        if age > self.tolerance_secs {
            return Err(SignatureError::Stale);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(SignatureError::FromFuture);
        }
        Ok(())
    }
}

/// Hex HMAC-SHA256 of `"{timestamp}.{body}"`.
fn compute_signature(secret: &str, timestamp: &str, body: &[u8]) -> Result<String, SignatureError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::MissingSecret)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Builds a valid `Paymongo-Signature` header value for `body`.
///
/// Used to sign local payloads when exercising the webhook endpoint.
pub fn sign_webhook_payload(
    secret: &str,
    timestamp: i64,
    body: &[u8],
    mode: SigningMode,
) -> Result<String, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::MissingSecret);
    }
    let signature = compute_signature(secret, &timestamp.to_string(), body)?;
    Ok(format!("t={},{}={}", timestamp, mode.header_key(), signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "whsk_test_secret_12345";
    const BODY: &[u8] = br#"{"data":{"attributes":{"type":"payment.paid"}}}"#;

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    fn verifier(secret: &str) -> PayMongoWebhookVerifier {
        PayMongoWebhookVerifier::new(
            SecretString::new(secret.to_string()),
            DEFAULT_SIGNATURE_TOLERANCE_SECS,
        )
    }

    fn signed(body: &[u8], mode: SigningMode) -> String {
        sign_webhook_payload(SECRET, now().as_unix_secs(), body, mode).unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // Header Parsing
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_test_mode_header() {
        let header = SignatureHeader::parse("t=1700000000,te=abc123").unwrap();

        assert_eq!(header.timestamp, 1_700_000_000);
        assert_eq!(header.raw_timestamp, "1700000000");
        assert_eq!(header.signature, "abc123");
        assert_eq!(header.mode, SigningMode::Test);
    }

    #[test]
    fn parse_live_takes_precedence_over_test() {
        let header = SignatureHeader::parse("t=1700000000,te=aaa,li=bbb").unwrap();

        assert_eq!(header.signature, "bbb");
        assert_eq!(header.mode, SigningMode::Live);
    }

    #[test]
    fn parse_empty_live_falls_back_to_test() {
        let header = SignatureHeader::parse("t=1700000000,te=aaa,li=").unwrap();

        assert_eq!(header.signature, "aaa");
        assert_eq!(header.mode, SigningMode::Test);
    }

    #[test]
    fn parse_missing_timestamp_fails() {
        assert_eq!(
            SignatureHeader::parse("te=abc"),
            Err(SignatureError::MalformedHeader("missing timestamp"))
        );
    }

    #[test]
    fn parse_missing_signature_fails() {
        assert_eq!(
            SignatureHeader::parse("t=1700000000"),
            Err(SignatureError::MalformedHeader("missing signature"))
        );
    }

    #[test]
    fn parse_non_numeric_timestamp_fails() {
        assert_eq!(
            SignatureHeader::parse("t=yesterday,te=abc"),
            Err(SignatureError::MalformedHeader("invalid timestamp"))
        );
    }

    #[test]
    fn parse_ignores_unknown_and_garbage_parts() {
        let header = SignatureHeader::parse("garbage,t=1700000000,v1=zzz,te=abc").unwrap();
        assert_eq!(header.signature, "abc");
    }

    #[test]
    fn parse_repeated_keys_keep_first_value() {
        let header = SignatureHeader::parse("t=1700000000,te=first,t=1,te=second").unwrap();

        assert_eq!(header.timestamp, 1_700_000_000);
        assert_eq!(header.signature, "first");
    }

    #[test]
    fn repeated_signature_key_verifies_against_first() {
        let valid = signed(BODY, SigningMode::Test);
        let with_decoy = format!("{},te=deadbeef", valid);
        let decoy_first = valid.replacen("te=", "te=deadbeef,te=", 1);

        assert_eq!(
            verifier(SECRET).verify(Some(&with_decoy), BODY, now()),
            Ok(SigningMode::Test)
        );
        assert_eq!(
            verifier(SECRET).verify(Some(&decoy_first), BODY, now()),
            Err(SignatureError::Mismatch)
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Verification
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn valid_test_signature_verifies() {
        let header = signed(BODY, SigningMode::Test);
        assert_eq!(
            verifier(SECRET).verify(Some(&header), BODY, now()),
            Ok(SigningMode::Test)
        );
    }

    #[test]
    fn valid_live_signature_verifies() {
        let header = signed(BODY, SigningMode::Live);
        assert_eq!(
            verifier(SECRET).verify(Some(&header), BODY, now()),
            Ok(SigningMode::Live)
        );
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(
            verifier(SECRET).verify(None, BODY, now()),
            Err(SignatureError::MissingHeader)
        );
        assert_eq!(
            verifier(SECRET).verify(Some("  "), BODY, now()),
            Err(SignatureError::MissingHeader)
        );
    }

    #[test]
    fn empty_secret_is_rejected() {
        let header = signed(BODY, SigningMode::Test);
        assert_eq!(
            verifier("").verify(Some(&header), BODY, now()),
            Err(SignatureError::MissingSecret)
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let header = signed(BODY, SigningMode::Test);
        assert_eq!(
            verifier("another_secret").verify(Some(&header), BODY, now()),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn uppercase_hex_does_not_match() {
        let parsed = SignatureHeader::parse(&signed(BODY, SigningMode::Test)).unwrap();
        let header = format!("t={},te={}", parsed.raw_timestamp, parsed.signature.to_uppercase());
        assert_eq!(
            verifier(SECRET).verify(Some(&header), BODY, now()),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn reserialized_body_does_not_match() {
        let header = signed(BODY, SigningMode::Test);
        let reformatted = br#"{ "data": { "attributes": { "type": "payment.paid" } } }"#;
        assert_eq!(
            verifier(SECRET).verify(Some(&header), reformatted, now()),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn non_utf8_body_is_signed_bytewise() {
        let body = [0xffu8, 0xfe, b'{', b'}'];
        let header = signed(&body, SigningMode::Test);
        assert!(verifier(SECRET).verify(Some(&header), &body, now()).is_ok());

        let other = [0xfdu8, 0xfe, b'{', b'}'];
        assert_eq!(
            verifier(SECRET).verify(Some(&header), &other, now()),
            Err(SignatureError::Mismatch)
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Freshness Window
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn delivery_at_tolerance_boundary_is_accepted() {
        let header = signed(BODY, SigningMode::Test);
        let later = now().plus_secs(DEFAULT_SIGNATURE_TOLERANCE_SECS);
        assert!(verifier(SECRET).verify(Some(&header), BODY, later).is_ok());
    }

    #[test]
    fn delivery_past_tolerance_is_stale() {
        let header = signed(BODY, SigningMode::Test);
        let later = now().plus_secs(DEFAULT_SIGNATURE_TOLERANCE_SECS + 1);
        assert_eq!(
            verifier(SECRET).verify(Some(&header), BODY, later),
            Err(SignatureError::Stale)
        );
    }

    #[test]
    fn delivery_far_in_future_is_rejected() {
        let header = signed(BODY, SigningMode::Test);
        let earlier = now().plus_secs(-(MAX_CLOCK_SKEW_SECS + 1));
        assert_eq!(
            verifier(SECRET).verify(Some(&header), BODY, earlier),
            Err(SignatureError::FromFuture)
        );
    }

    #[test]
    fn zero_tolerance_disables_freshness_check() {
        let verifier = PayMongoWebhookVerifier::new(SecretString::new(SECRET.to_string()), 0);
        let header = signed(BODY, SigningMode::Test);
        let much_later = now().plus_hours(24 * 30);
        assert!(verifier.verify(Some(&header), BODY, much_later).is_ok());
    }

    #[test]
    fn signing_helper_rejects_empty_secret() {
        assert_eq!(
            sign_webhook_payload("", 1, BODY, SigningMode::Test),
            Err(SignatureError::MissingSecret)
        );
    }

    proptest! {
        #[test]
        fn valid_signature_always_verifies(
            body in proptest::collection::vec(any::<u8>(), 0..256),
            secret in "[a-zA-Z0-9_]{1,40}",
        ) {
            let header = sign_webhook_payload(&secret, now().as_unix_secs(), &body, SigningMode::Test).unwrap();
            let verifier = PayMongoWebhookVerifier::new(SecretString::new(secret), DEFAULT_SIGNATURE_TOLERANCE_SECS);
            prop_assert!(verifier.verify(Some(&header), &body, now()).is_ok());
        }

        #[test]
        fn single_byte_mutation_fails_verification(
            body in proptest::collection::vec(any::<u8>(), 1..256),
            index in any::<proptest::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let header = signed(&body, SigningMode::Live);
            let mut tampered = body.clone();
            let i = index.index(tampered.len());
            tampered[i] ^= flip;

            prop_assert_eq!(
                verifier(SECRET).verify(Some(&header), &tampered, now()),
                Err(SignatureError::Mismatch)
            );
        }
    }
}
