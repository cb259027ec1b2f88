use actix_web::web::{Data, Json};

use crate::context::UserInfo;
use crate::core::ports::repository::Manager;
use crate::core::services::role;
use crate::error::Error;
use crate::response::List;

pub async fn roles<M>(user_info: UserInfo, manager: Data<M>) -> Result<Json<List<String>>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let roles = role::roles_of(&mut db, user_info.id).await?;
    Ok(Json(List::new(roles)))
}
