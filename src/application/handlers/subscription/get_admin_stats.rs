//! GetAdminStatsHandler - dashboard counts for allow-listed admins.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::domain::foundation::{AdminAllowList, Timestamp, UserId};
use crate::ports::SubscriptionReader;

/// Default price of one day pass, in pesos, used for the revenue proxy.
pub const DEFAULT_PASS_PRICE: u64 = 50;

#[derive(Debug, Clone)]
pub struct GetAdminStatsQuery {
    pub requested_by: UserId,
}

/// Dashboard numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_users: u64,
    pub active_now: u64,
    /// `active_now * pass_price`; a rough estimate, not booked revenue.
    pub revenue_proxy: u64,
}

#[derive(Debug, Clone, Error)]
pub enum AdminStatsError {
    #[error("caller is not an admin")]
    Forbidden,

    #[error("failed to fetch stats: {0}")]
    Storage(String),
}

pub struct GetAdminStatsHandler {
    reader: Arc<dyn SubscriptionReader>,
    admins: AdminAllowList,
    pass_price: u64,
    clock: fn() -> Timestamp,
}

impl GetAdminStatsHandler {
    pub fn new(reader: Arc<dyn SubscriptionReader>, admins: AdminAllowList, pass_price: u64) -> Self {
        Self {
            reader,
            admins,
            pass_price,
            clock: Timestamp::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    pub async fn handle(&self, query: GetAdminStatsQuery) -> Result<AdminStats, AdminStatsError> {
        if !self.admins.contains(&query.requested_by) {
            warn!(user_id = %query.requested_by, "Unauthorized admin access attempt");
            return Err(AdminStatsError::Forbidden);
        }

        let stats = self
            .reader
            .get_statistics((self.clock)())
            .await
            .map_err(|e| {
                error!(error = %e, "Admin stats query failed");
                AdminStatsError::Storage(e.to_string())
            })?;

        Ok(AdminStats {
            total_users: stats.total_users,
            active_now: stats.active_users,
            revenue_proxy: stats.active_users.saturating_mul(self.pass_price),
        })
    }
}
