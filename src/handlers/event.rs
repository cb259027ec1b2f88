use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;

use crate::context::ActiveHost;
use crate::core::models::event::{Event, EventInput, StatusInput};
use crate::core::ports::repository::Manager;
use crate::core::services::event;
use crate::error::Error;
use crate::response::{List, Single};

pub async fn list<M>(manager: Data<M>) -> Result<Json<List<Event>>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    Ok(Json(List::new(event::list(&mut db).await?)))
}

pub async fn get<M>(manager: Data<M>, path: Path<(i32,)>) -> Result<Json<Single<Event>>, Error>
where
    M: Manager + 'static,
{
    let (id,) = path.into_inner();
    let mut db = manager.db().await?;
    Ok(Json(Single::new(event::get(&mut db, id).await?)))
}

pub async fn create<M>(host: ActiveHost<M>, manager: Data<M>, Json(input): Json<EventInput>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let created = event::create(&mut db, host.id, input).await?;
    Ok(HttpResponse::Created().json(Single::new(created)))
}

pub async fn update<M>(host: ActiveHost<M>, manager: Data<M>, path: Path<(i32,)>, Json(input): Json<EventInput>) -> Result<Json<Single<Event>>, Error>
where
    M: Manager + 'static,
{
    let (id,) = path.into_inner();
    let mut db = manager.db().await?;
    Ok(Json(Single::new(event::update(&mut db, host.id, id, input).await?)))
}

pub async fn update_status<M>(host: ActiveHost<M>, manager: Data<M>, path: Path<(i32,)>, Json(input): Json<StatusInput>) -> Result<Json<Single<Event>>, Error>
where
    M: Manager + 'static,
{
    let (id,) = path.into_inner();
    let mut db = manager.db().await?;
    Ok(Json(Single::new(event::update_status(&mut db, host.id, id, input).await?)))
}

pub async fn delete<M>(host: ActiveHost<M>, manager: Data<M>, path: Path<(i32,)>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let (id,) = path.into_inner();
    let mut db = manager.db().await?;
    event::delete(&mut db, host.id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
