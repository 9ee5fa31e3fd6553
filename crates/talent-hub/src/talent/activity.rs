use std::sync::Arc;

use tracing::info;

use super::domain::{ActivityAction, ActivityLog, UserId};
use super::ServiceError;
use crate::store::{NewActivity, Store, StoreError, UnitOfWork};

/// Appends one audit entry through the caller's unit of work.
pub(crate) fn record(
    unit: &dyn UnitOfWork,
    user_id: UserId,
    action: ActivityAction,
    description: &str,
) -> Result<(), StoreError> {
    unit.record_activity(&NewActivity {
        user_id,
        action,
        description,
    })?;
    info!(user_id, action = action.as_str(), "{description}");
    Ok(())
}

/// Read side of the audit trail, for operators only.
pub struct ActivityService<S> {
    store: Arc<S>,
}

impl<S: Store> ActivityService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<ActivityLog>, ServiceError> {
        self.store
            .read(|unit| unit.recent_activity(limit).map_err(ServiceError::from))
    }
}
