//! Mock payment provider for testing.
//!
//! Records every checkout request and returns a canned session, or a
//! queued error.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider};

#[derive(Debug, Default)]
struct MockState {
    requests: Vec<CreateCheckoutRequest>,
    next_error: Option<PaymentError>,
}

#[derive(Debug, Clone, Default)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call fail with `error`.
    pub fn with_error(self, error: PaymentError) -> Self {
        self.state().next_error = Some(error);
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CreateCheckoutRequest> {
        self.state().requests.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let mut state = self.state();
        let session_id = format!("cs_mock_{}", state.requests.len() + 1);
        state.requests.push(request);

        if let Some(err) = state.next_error.take() {
            return Err(err);
        }

        Ok(CheckoutSession {
            checkout_url: format!("https://checkout.paymongo.test/{}", session_id),
            id: session_id,
        })
    }
}
