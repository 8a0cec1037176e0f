use axum::{extract::State, Json};

use crate::adapters::http::error::AdminApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{AdminStats, GetAdminStatsQuery};

/// `GET /admin/stats`
pub async fn get_admin_stats(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<AdminStats>, AdminApiError> {
    state
        .admin_stats
        .handle(GetAdminStatsQuery {
            requested_by: user.id,
        })
        .await
        .map(Json)
        .map_err(AdminApiError)
}
