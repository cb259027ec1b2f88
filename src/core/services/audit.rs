use crate::core::models::audit::Insert as AuditInsert;
use crate::core::ports::repository::{AuditCommon, Manager};

/// Appends an audit entry. Failures are logged and dropped so they never
/// surface to the request that triggered them.
pub async fn record<M>(manager: &M, entry: AuditInsert)
where
    M: Manager,
{
    let event_type = entry.event_type.clone();
    let res = match manager.db().await {
        Ok(mut db) => AuditCommon::insert(&mut db, entry).await.map(|_| ()),
        Err(err) => Err(err),
    };
    if let Err(err) = res {
        log::warn!("failed to record audit event {}: {}", event_type, err);
    }
}
