use actix_web::web::{Data, Json};

use crate::context::UserInfo;
use crate::core::models::role::HostStatus;
use crate::core::ports::repository::Manager;
use crate::core::services::role;
use crate::error::Error;

pub async fn me<M>(user_info: UserInfo, manager: Data<M>) -> Result<Json<HostStatus>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    Ok(Json(role::host_status(&mut db, user_info.id).await?))
}
