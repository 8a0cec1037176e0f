use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::adapters::http::error::CheckoutApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::CreateCheckoutCommand;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

/// `POST /checkout`
pub async fn create_checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CheckoutResponse>, CheckoutApiError> {
    let result = state
        .checkout
        .handle(CreateCheckoutCommand { user_id: user.id })
        .await
        .map_err(CheckoutApiError)?;

    Ok(Json(CheckoutResponse {
        checkout_url: result.checkout_url,
    }))
}
