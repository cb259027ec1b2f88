use crate::core::models::user::{UserSummary, UserUpdate, USER};
use crate::core::ports::repository::{Store, UserCommon};
use crate::error::Error;

pub async fn active_users<S>(db: &mut S) -> Result<Vec<UserSummary>, Error>
where
    S: Store,
{
    UserCommon::active(db).await
}

pub async fn update_user<S>(db: &mut S, id: i32, data: UserUpdate) -> Result<(), Error>
where
    S: Store,
{
    let text = |v: Option<String>| v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
    let (name, email) = (text(data.name), text(data.email));
    let mut missing = Vec::new();
    if name.is_none() {
        missing.push("name");
    }
    if email.is_none() {
        missing.push("email");
    }
    let (Some(name), Some(email)) = (name, email) else {
        return Err(Error::ValidationError(missing));
    };
    if !UserCommon::update(db, id, name, email).await? {
        return Err(Error::NotFoundError(USER, id));
    }
    Ok(())
}

pub async fn remove_user<S>(db: &mut S, admin_uid: i32, id: i32) -> Result<(), Error>
where
    S: Store,
{
    if !UserCommon::delete(db, id).await? {
        return Err(Error::NotFoundError(USER, id));
    }
    log::info!("user {} removed by admin {}", id, admin_uid);
    Ok(())
}
