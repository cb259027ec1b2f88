use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;

use crate::context::Admin;
use crate::core::models::application::Summary;
use crate::core::models::user::{UserSummary, UserUpdate};
use crate::core::ports::repository::Manager;
use crate::core::services::{application, user};
use crate::error::Error;
use crate::response::List;

pub async fn host_summary<M>(_: Admin<M>, manager: Data<M>) -> Result<Json<Summary>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    Ok(Json(application::summary(&mut db).await?))
}

pub async fn users<M>(_: Admin<M>, manager: Data<M>) -> Result<Json<List<UserSummary>>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    Ok(Json(List::new(user::active_users(&mut db).await?)))
}

pub async fn update_user<M>(_: Admin<M>, manager: Data<M>, path: Path<(i32,)>, Json(data): Json<UserUpdate>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let (id,) = path.into_inner();
    let mut db = manager.db().await?;
    user::update_user(&mut db, id, data).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn remove_user<M>(admin: Admin<M>, manager: Data<M>, path: Path<(i32,)>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let (id,) = path.into_inner();
    let mut db = manager.db().await?;
    user::remove_user(&mut db, admin.id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
