use crate::core::models::event::{Event, EventInput, EventStatus, Fields, Insert, StatusInput, EVENT};
use crate::core::ports::repository::{EventCommon, Store};
use crate::error::Error;

pub async fn list<S>(db: &mut S) -> Result<Vec<Event>, Error>
where
    S: Store,
{
    EventCommon::query(db).await
}

pub async fn get<S>(db: &mut S, id: i32) -> Result<Event, Error>
where
    S: Store,
{
    EventCommon::get(db, id).await?.ok_or(Error::NotFoundError(EVENT, id))
}

/// Loads an event the host is allowed to change.
async fn owned<S>(db: &mut S, host_uid: i32, id: i32) -> Result<Event, Error>
where
    S: Store,
{
    let event = get(db, id).await?;
    if event.host_user_id != host_uid {
        log::warn!("user {} tried to change event {} of host {}", host_uid, id, event.host_user_id);
        return Err(Error::Forbidden);
    }
    Ok(event)
}

pub async fn create<S>(db: &mut S, host_uid: i32, input: EventInput) -> Result<Event, Error>
where
    S: Store,
{
    let fields = Fields::try_from(input)?;
    let id = EventCommon::insert(
        db,
        Insert {
            host_user_id: host_uid,
            fields,
        },
    )
    .await?;
    log::info!("event created(id: {}, host: {})", id, host_uid);
    get(db, id).await
}

pub async fn update<S>(db: &mut S, host_uid: i32, id: i32, input: EventInput) -> Result<Event, Error>
where
    S: Store,
{
    owned(db, host_uid, id).await?;
    let fields = Fields::try_from(input)?;
    EventCommon::update(db, id, fields).await?;
    get(db, id).await
}

pub async fn update_status<S>(db: &mut S, host_uid: i32, id: i32, input: StatusInput) -> Result<Event, Error>
where
    S: Store,
{
    owned(db, host_uid, id).await?;
    let status: EventStatus = match input.status.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.parse()?,
        _ => return Err(Error::ValidationError(vec!["status"])),
    };
    EventCommon::update_status(db, id, status).await?;
    get(db, id).await
}

pub async fn delete<S>(db: &mut S, host_uid: i32, id: i32) -> Result<(), Error>
where
    S: Store,
{
    owned(db, host_uid, id).await?;
    EventCommon::delete(db, id).await?;
    log::info!("event deleted(id: {}, host: {})", id, host_uid);
    Ok(())
}
