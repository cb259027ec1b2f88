use crate::core::models::role::{HostStatus, HOST_ROLE};
use crate::core::ports::repository::{HostProfileCommon, RoleCommon, Store};
use crate::error::Error;

pub async fn roles_of<S>(db: &mut S, uid: i32) -> Result<Vec<String>, Error>
where
    S: Store,
{
    RoleCommon::roles(db, uid).await
}

pub async fn has_role<S>(db: &mut S, uid: i32, role: &str) -> Result<bool, Error>
where
    S: Store,
{
    let roles = RoleCommon::roles(db, uid).await?;
    Ok(roles.iter().any(|r| r.eq_ignore_ascii_case(role)))
}

/// Gives `uid` the Host role and an approved, active host profile.
/// Both writes are idempotent.
pub async fn grant_host<S>(store: &mut S, uid: i32) -> Result<(), Error>
where
    S: Store,
{
    let role_id = RoleCommon::role_id(store, HOST_ROLE).await?.ok_or_else(|| Error::RoleMissingError(HOST_ROLE.into()))?;
    RoleCommon::ensure_role(store, uid, role_id).await?;
    HostProfileCommon::activate(store, uid).await?;
    Ok(())
}

pub async fn host_status<S>(db: &mut S, uid: i32) -> Result<HostStatus, Error>
where
    S: Store,
{
    let profile = HostProfileCommon::get(db, uid).await?;
    Ok(HostStatus {
        active: profile.as_ref().map(|p| p.is_active).unwrap_or(false),
        profile,
    })
}
